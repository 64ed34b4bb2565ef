//! Rendering options and configuration.

use super::CleanupOptions;
use crate::error::{Error, Result};
use std::ops::RangeInclusive;

/// Options for assembling the document text.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// How consecutive pages are separated
    pub separator: PageSeparator,

    /// Text cleanup applied to the assembled document
    pub cleanup: Option<CleanupOptions>,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page separator.
    pub fn with_separator(mut self, separator: PageSeparator) -> Self {
        self.separator = separator;
        self
    }

    /// Set cleanup options.
    pub fn with_cleanup(mut self, cleanup: CleanupOptions) -> Self {
        self.cleanup = Some(cleanup);
        self
    }

    /// Lowercase the whole document.
    pub fn lowercase(mut self) -> Self {
        let cleanup = self.cleanup.take().unwrap_or_default();
        self.cleanup = Some(cleanup.with_lowercase(true));
        self
    }
}

/// How pages are separated in the assembled text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSeparator {
    /// A blank line between pages
    #[default]
    BlankLine,
    /// An `End of page N` line after every page
    Marker,
}

impl PageSeparator {
    /// Parse a separator name (`blank` or `marker`).
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "blank" | "blank-line" | "blankline" => Ok(PageSeparator::BlankLine),
            "marker" => Ok(PageSeparator::Marker),
            other => Err(Error::Configuration(format!(
                "unknown page separator: {}",
                other
            ))),
        }
    }
}

/// Which pages to process, and in which order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// All pages in natural order
    #[default]
    All,
    /// A range of pages (inclusive, 1-indexed), ascending
    Range(RangeInclusive<u32>),
    /// Specific pages (1-indexed), in the given order
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Same selection with an explicit page list sorted ascending.
    pub fn sorted(self) -> Self {
        match self {
            PageSelection::Pages(mut pages) => {
                pages.sort_unstable();
                PageSelection::Pages(pages)
            }
            other => other,
        }
    }

    /// Parse a page selection string (e.g., "1-10", "3,1,5-7").
    ///
    /// A list keeps its order; repeated pages are kept once, at their first
    /// position.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        // Check for simple range (e.g., "1-10")
        if !s.contains(',') {
            if let Some((start, end)) = s.split_once('-') {
                let (start, end) = (parse_page(start)?, parse_page(end)?);
                if start > end {
                    return Err(Error::InvalidPageRange(s.to_string()));
                }
                return Ok(PageSelection::Range(start..=end));
            }
        }

        // Parse comma-separated list with possible ranges
        let mut pages = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if let Some((start, end)) = part.split_once('-') {
                let (start, end) = (parse_page(start)?, parse_page(end)?);
                if start > end {
                    return Err(Error::InvalidPageRange(part.to_string()));
                }
                for p in start..=end {
                    if !pages.contains(&p) {
                        pages.push(p);
                    }
                }
            } else {
                let p = parse_page(part)?;
                if !pages.contains(&p) {
                    pages.push(p);
                }
            }
        }

        Ok(PageSelection::Pages(pages))
    }
}

fn parse_page(s: &str) -> Result<u32> {
    match s.trim().parse::<u32>() {
        Ok(0) | Err(_) => Err(Error::InvalidPageRange(format!(
            "invalid page number: {:?}",
            s.trim()
        ))),
        Ok(page) => Ok(page),
    }
}
