//! Conversion of source documents into page images.
//!
//! Images pass through as a single page. Multi-page formats such as PDF need
//! an external [`Rasterizer`], since drawing pages is outside this crate.

use crate::detect::{detect_kind_from_bytes, FileKind};
use crate::error::{Error, Result};
use crate::model::PageImage;
use crate::render::PageSelection;
use std::collections::HashMap;
use std::path::Path;

/// Turns source bytes into page images.
pub trait Rasterizer: Send + Sync {
    /// Name of this rasterizer.
    fn name(&self) -> &str;

    /// Whether this rasterizer can handle the given input kind.
    fn supports(&self, kind: FileKind) -> bool;

    /// Produce one image per page, in natural page order, numbered from 1.
    fn rasterize(&self, data: &[u8], kind: FileKind, source_name: &str) -> Result<Vec<PageImage>>;
}

/// Passes a single image through as page 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageRasterizer;

impl ImageRasterizer {
    pub fn new() -> Self {
        Self
    }
}

impl Rasterizer for ImageRasterizer {
    fn name(&self) -> &str {
        "image"
    }

    fn supports(&self, kind: FileKind) -> bool {
        kind.is_image()
    }

    fn rasterize(&self, data: &[u8], kind: FileKind, source_name: &str) -> Result<Vec<PageImage>> {
        if !self.supports(kind) {
            return Err(Error::UnsupportedFormat(kind.to_string()));
        }
        Ok(vec![
            PageImage::new(1, image_stem(source_name), data.to_vec()).with_kind(kind)
        ])
    }
}

/// File stem of a source name, or the name itself when it has none.
fn image_stem(source_name: &str) -> String {
    Path::new(source_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(source_name)
        .to_string()
}

/// Detect the input kind and convert it into page images.
///
/// A caller-supplied rasterizer is used when it supports the input; otherwise
/// images fall back to [`ImageRasterizer`] and anything else is unsupported.
pub fn load_pages(
    data: &[u8],
    source_name: &str,
    rasterizer: Option<&dyn Rasterizer>,
) -> Result<(FileKind, Vec<PageImage>)> {
    let kind = detect_kind_from_bytes(data)?;

    let pages = match rasterizer {
        Some(r) if r.supports(kind) => {
            log::debug!("Rasterizing {} ({}) with {}", source_name, kind, r.name());
            r.rasterize(data, kind, source_name)?
        }
        _ if kind.is_image() => ImageRasterizer.rasterize(data, kind, source_name)?,
        _ => {
            return Err(Error::UnsupportedFormat(format!(
                "{} input requires a rasterizer",
                kind
            )))
        }
    };

    log::debug!("{}: {} pages", source_name, pages.len());
    Ok((kind, pages))
}

/// Keep the selected pages, in the selection's order.
///
/// `All` keeps the natural order, `Range` is ascending and `Pages` follows the
/// caller's list. A requested page that does not exist is an error.
pub fn select_pages(pages: Vec<PageImage>, selection: &PageSelection) -> Result<Vec<PageImage>> {
    let total = pages.len() as u32;

    match selection {
        PageSelection::All => Ok(pages),
        PageSelection::Range(range) => {
            let last = pages.iter().map(|p| p.page_id).max().unwrap_or(0);
            if *range.start() > last {
                return Err(Error::PageOutOfRange(*range.start(), total));
            }
            let mut selected: Vec<PageImage> = pages
                .into_iter()
                .filter(|p| selection.includes(p.page_id))
                .collect();
            selected.sort_by_key(|p| p.page_id);
            Ok(selected)
        }
        PageSelection::Pages(ids) => {
            let mut by_id: HashMap<u32, PageImage> =
                pages.into_iter().map(|p| (p.page_id, p)).collect();
            ids.iter()
                .map(|id| {
                    by_id
                        .remove(id)
                        .ok_or(Error::PageOutOfRange(*id, total))
                })
                .collect()
        }
    }
}
