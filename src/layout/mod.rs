//! Spatial layout reconstruction.
//!
//! One page goes through four steps, each page on its own:
//!
//! 1. [`binner`]: continuous coordinates to class indices over the page's range
//! 2. [`mapper`]: every fragment gets a (row, column) grid cell
//! 3. [`assembler`]: fragments grouped into rows and ordered left to right
//! 4. [`formatter`]: each row rendered with tab runs approximating the gaps

mod assembler;
mod binner;
mod formatter;
mod mapper;
mod options;

pub use assembler::assemble_lines;
pub use binner::{bin, AxisBinner, AxisRange};
pub use formatter::{format_line, LineFormatter, TAB_WIDTH};
pub use mapper::{map_positions, PageRanges, PositionMapper};
pub use options::{
    LayoutOptions, DEFAULT_FONT_SIZE_REGULATOR, DEFAULT_NUM_COLUMNS, DEFAULT_NUM_ROWS,
    DEFAULT_SPACE_REDUTOR,
};

use crate::error::Result;
use crate::model::{Detection, Fragment, PageText};

/// Runs the full layout pipeline for single pages.
///
/// The engine holds no per-page state and can be shared between threads.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    options: LayoutOptions,
    mapper: PositionMapper,
    formatter: LineFormatter,
}

impl LayoutEngine {
    /// Create an engine, validating the options.
    pub fn new(options: LayoutOptions) -> Result<Self> {
        options.validate()?;
        let mapper = PositionMapper::new(options.num_rows, options.num_columns)?;
        let formatter = LineFormatter::from_options(&options)?;
        Ok(Self {
            options,
            mapper,
            formatter,
        })
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Rebuild the text of one page from its fragments.
    pub fn layout(
        &self,
        page_id: u32,
        image_name: &str,
        fragments: Vec<Fragment>,
    ) -> Result<PageText> {
        let fragment_count = fragments.len();
        let (placed, ranges) = self.mapper.map(fragments)?;

        let mut page = PageText::empty(page_id, image_name);
        let Some(ranges) = ranges else {
            log::warn!("Page {} ({}) has no detections", page_id, image_name);
            return Ok(page);
        };

        log::debug!(
            "Page {}: {} fragments, x=[{:.1}, {:.1}], y=[{:.1}, {:.1}]",
            page_id,
            fragment_count,
            ranges.x.min,
            ranges.x.max,
            ranges.y.min,
            ranges.y.max
        );
        if ranges.is_degenerate() {
            log::warn!(
                "Page {} ({}): coordinate range collapsed to a point, using a single class",
                page_id,
                image_name
            );
            page.degenerate = true;
        }

        page.lines = assemble_lines(placed);
        page.formatted = page
            .lines
            .iter()
            .map(|line| self.formatter.format(line))
            .collect();

        log::debug!("Page {}: {} lines", page_id, page.lines.len());
        Ok(page)
    }

    /// Rebuild the text of one page from raw detections.
    pub fn layout_detections(
        &self,
        page_id: u32,
        image_name: &str,
        detections: Vec<Detection>,
    ) -> Result<PageText> {
        let fragments = detections
            .into_iter()
            .map(|d| Fragment::from_detection(d, page_id, image_name))
            .collect();
        self.layout(page_id, image_name, fragments)
    }
}

/// Rebuild one page's text with the given options.
///
/// Convenience wrapper that builds a [`LayoutEngine`] for a single call.
pub fn layout_page(
    page_id: u32,
    image_name: &str,
    detections: Vec<Detection>,
    options: &LayoutOptions,
) -> Result<PageText> {
    LayoutEngine::new(options.clone())?.layout_detections(page_id, image_name, detections)
}
