//! Extraction statistics.

use crate::model::PageText;
use serde::{Deserialize, Serialize};

/// Statistics collected over the pages of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Pages processed successfully
    pub page_count: u32,

    /// Pages that failed
    pub failed_page_count: u32,

    /// Pages with no detections
    pub empty_page_count: u32,

    /// Pages whose coordinates collapsed to a point on some axis
    pub degenerate_page_count: u32,

    /// Rendered lines
    pub line_count: u32,

    /// Fragments placed into lines
    pub fragment_count: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,
}

impl ExtractionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a successfully processed page.
    pub fn count_page(&mut self, page: &PageText) {
        self.page_count += 1;
        if page.is_empty() {
            self.empty_page_count += 1;
        }
        if page.degenerate {
            self.degenerate_page_count += 1;
        }
        self.line_count += page.line_count() as u32;
        self.fragment_count += page.fragment_count() as u32;
        for line in &page.lines {
            for fragment in &line.fragments {
                self.count_text(fragment.text());
            }
        }
    }

    /// Count a failed page.
    pub fn add_failed_page(&mut self) {
        self.failed_page_count += 1;
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }
}
