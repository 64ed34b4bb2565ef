//! Document-level types.

use super::PageText;
use crate::detect::FileKind;
use crate::error::{Error, Result};
use crate::render::{self, ExtractionStats, RenderOptions};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of processing one requested page.
///
/// A failed page keeps its identity so the document can report it in place
/// instead of silently dropping it.
#[derive(Debug)]
pub struct PageOutcome {
    /// Page number (1-indexed)
    pub page_id: u32,
    /// Name of the page image
    pub image_name: String,
    /// Rebuilt text, or the page-attributed failure
    pub result: Result<PageText>,
}

impl PageOutcome {
    /// Successful outcome.
    pub fn done(page: PageText) -> Self {
        Self {
            page_id: page.page_id,
            image_name: page.image_name.clone(),
            result: Ok(page),
        }
    }

    /// Failed outcome.
    pub fn failed(page_id: u32, image_name: impl Into<String>, error: Error) -> Self {
        Self {
            page_id,
            image_name: image_name.into(),
            result: Err(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// The rebuilt page, if processing succeeded.
    pub fn page(&self) -> Option<&PageText> {
        self.result.as_ref().ok()
    }

    /// The failure, if processing failed.
    pub fn error(&self) -> Option<&Error> {
        self.result.as_ref().err()
    }
}

/// Information about an extraction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Name of the source document, if known
    pub source: Option<String>,

    /// Detected kind of the source document
    pub kind: Option<FileKind>,

    /// Number of pages requested
    pub requested_pages: u32,

    /// Worker threads used
    pub workers: usize,

    /// When processing started
    pub started_at: DateTime<Utc>,

    /// When processing finished
    pub finished_at: DateTime<Utc>,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            source: None,
            kind: None,
            requested_pages: 0,
            workers: 0,
            started_at: now,
            finished_at: now,
        }
    }
}

impl DocumentMetadata {
    /// Wall-clock duration of the run in milliseconds.
    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

/// Pages in the order the caller requested them.
#[derive(Debug, Default)]
pub struct Document {
    /// Run information
    pub metadata: DocumentMetadata,

    /// One outcome per requested page, in request order
    pub pages: Vec<PageOutcome>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Add a page outcome to the document.
    pub fn add_page(&mut self, outcome: PageOutcome) {
        self.pages.push(outcome);
    }

    /// Find the outcome of a page by its id.
    pub fn get_page(&self, page_id: u32) -> Option<&PageOutcome> {
        self.pages.iter().find(|p| p.page_id == page_id)
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Pages that could not be processed, with their errors.
    pub fn failures(&self) -> Vec<(u32, &Error)> {
        self.pages
            .iter()
            .filter_map(|p| p.error().map(|e| (p.page_id, e)))
            .collect()
    }

    /// Ids of the pages that could not be processed.
    pub fn failed_page_ids(&self) -> Vec<u32> {
        self.failures().into_iter().map(|(id, _)| id).collect()
    }

    /// Whether every requested page was processed.
    pub fn is_complete(&self) -> bool {
        self.pages.iter().all(PageOutcome::is_ok)
    }

    /// Whether any processed page produced at least one line.
    pub fn has_text(&self) -> bool {
        self.pages
            .iter()
            .filter_map(PageOutcome::page)
            .any(|p| !p.is_empty())
    }

    /// Summary counts over all pages.
    pub fn stats(&self) -> ExtractionStats {
        let mut stats = ExtractionStats::new();
        for outcome in &self.pages {
            match outcome.page() {
                Some(page) => stats.count_page(page),
                None => stats.add_failed_page(),
            }
        }
        stats
    }

    /// Render the best-effort text, with failed pages marked in place.
    pub fn to_text(&self, options: &RenderOptions) -> String {
        render::to_text(self, options)
    }

    /// Render the text, failing if any page failed or no page has text.
    pub fn into_text_strict(self, options: &RenderOptions) -> Result<String> {
        let failed = self.failed_page_ids();
        if !failed.is_empty() {
            return Err(Error::PartialFailure(failed));
        }
        if !self.has_text() {
            return Err(Error::EmptyDocument);
        }
        Ok(render::to_text(&self, options))
    }
}
