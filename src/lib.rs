//! # ocrtab
//!
//! Rebuilds the visual layout of scanned pages as tab-aligned plain text.
//!
//! A recognition engine reports text spans with positions but no reading
//! order. This library bins every span into a row/column grid fitted to its
//! page, groups spans into lines, and separates them with runs of tabs that
//! approximate the horizontal gaps, so tables and forms stay legible.
//!
//! ## Quick Start
//!
//! ```
//! use ocrtab::oracle::FnRecognizer;
//! use ocrtab::{Detection, Ocrtab, PageImage};
//! use std::sync::Arc;
//!
//! fn main() -> ocrtab::Result<()> {
//!     let recognizer = Arc::new(FnRecognizer::new("fixed", |_: &PageImage| {
//!         Ok(vec![
//!             Detection::new("Item", 0.0, 0.0),
//!             Detection::new("Price", 100.0, 0.0),
//!             Detection::new("Coffee", 0.0, 10.0),
//!             Detection::new("2.50", 100.0, 10.0),
//!         ])
//!     }));
//!
//!     let result = Ocrtab::new().run(recognizer, vec![PageImage::placeholder(1, "receipt")])?;
//!     assert_eq!(result.document().page_count(), 1);
//!     println!("{}", result.to_text());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Page-local grids**: each page is binned against its own coordinate range
//! - **Order preserving**: pages run in parallel but come back in request order
//! - **Partial failure**: a failed page is reported in place, never dropped
//! - **Pluggable recognition**: anything implementing [`Recognizer`]
//! - **Recorded output**: replay EasyOCR-style JSON with [`PrecomputedRecognizer`]

pub mod detect;
pub mod error;
pub mod layout;
pub mod model;
pub mod oracle;
pub mod pipeline;
pub mod render;
pub mod source;

// Re-export commonly used types
pub use detect::{detect_kind_from_bytes, detect_kind_from_path, FileKind};
pub use error::{Error, Result};
pub use layout::{layout_page, LayoutEngine, LayoutOptions};
pub use model::{
    AnchorPoint, BoundingBox, Detection, Document, DocumentMetadata, Fragment, GridCell, Line,
    PageImage, PageOutcome, PageText, PlacedFragment,
};
pub use oracle::{PrecomputedRecognizer, Recognizer, RecognizerRegistry};
pub use pipeline::{ExtractOptions, Extractor};
pub use render::{
    CleanupOptions, ExtractionStats, JsonFormat, PageSelection, PageSeparator, RenderOptions,
};
pub use source::{ImageRasterizer, Rasterizer};

use std::path::Path;
use std::sync::Arc;

/// Rebuild the text of a single page from detections, with default options.
///
/// # Example
///
/// ```
/// use ocrtab::{layout_text, Detection};
///
/// let text = layout_text(vec![
///     Detection::new("Hello", 0.0, 0.0),
///     Detection::new("World", 0.0, 50.0),
/// ])
/// .unwrap();
/// assert_eq!(text, "Hello\nWorld");
/// ```
pub fn layout_text(detections: Vec<Detection>) -> Result<String> {
    let page = layout_page(1, "page_1", detections, &LayoutOptions::default())?;
    Ok(page.text())
}

/// Run a recognizer over a file and return the document text.
///
/// Failed pages appear as markers in the text; use [`Ocrtab`] with
/// [`OcrtabResult::into_text_strict`] to turn them into an error instead.
///
/// # Example
///
/// ```no_run
/// use ocrtab::{extract_text, PrecomputedRecognizer};
/// use std::sync::Arc;
///
/// let recognizer = Arc::new(PrecomputedRecognizer::from_path("scan.json").unwrap());
/// let text = extract_text("scan.png", recognizer).unwrap();
/// println!("{}", text);
/// ```
pub fn extract_text<P: AsRef<Path>>(path: P, recognizer: Arc<dyn Recognizer>) -> Result<String> {
    let doc = Extractor::new(recognizer).extract_file(path)?;
    Ok(render::to_text(&doc, &RenderOptions::default()))
}

/// Rebuild every page of a recorded detections file.
///
/// # Example
///
/// ```no_run
/// use ocrtab::{extract_recorded, RenderOptions};
///
/// let doc = extract_recorded("detections.json").unwrap();
/// println!("{}", doc.to_text(&RenderOptions::default()));
/// ```
pub fn extract_recorded<P: AsRef<Path>>(path: P) -> Result<Document> {
    Ocrtab::new()
        .run_recorded(PrecomputedRecognizer::from_path(path)?)
        .map(OcrtabResult::into_document)
}

/// Builder for extraction runs.
///
/// # Example
///
/// ```no_run
/// use ocrtab::{Ocrtab, PageSelection, PrecomputedRecognizer};
///
/// let recognizer = PrecomputedRecognizer::from_path("detections.json")?;
/// let text = Ocrtab::new()
///     .with_rows(50)
///     .with_workers(4)
///     .with_pages(PageSelection::parse("3,1")?)
///     .lowercase()
///     .run_recorded(recognizer)?
///     .to_text();
/// # Ok::<(), ocrtab::Error>(())
/// ```
#[derive(Default)]
pub struct Ocrtab {
    extract_options: ExtractOptions,
    render_options: RenderOptions,
    rasterizer: Option<Arc<dyn Rasterizer>>,
}

impl Ocrtab {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all layout knobs.
    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.extract_options.layout = layout;
        self
    }

    /// Set the number of grid rows.
    pub fn with_rows(mut self, rows: usize) -> Self {
        self.extract_options.layout = self.extract_options.layout.with_rows(rows);
        self
    }

    /// Set the number of grid columns.
    pub fn with_columns(mut self, columns: usize) -> Self {
        self.extract_options.layout = self.extract_options.layout.with_columns(columns);
        self
    }

    /// Set the worker count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.extract_options.max_workers = workers;
        self
    }

    /// Process pages one at a time.
    pub fn sequential(self) -> Self {
        self.with_workers(1)
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.extract_options.pages = pages;
        self
    }

    /// Drop detections scoring below the threshold.
    pub fn with_min_confidence(mut self, min_confidence: f32) -> Self {
        self.extract_options.min_confidence = min_confidence;
        self
    }

    /// Set the page separator.
    pub fn with_separator(mut self, separator: PageSeparator) -> Self {
        self.render_options = self.render_options.with_separator(separator);
        self
    }

    /// Set text cleanup.
    pub fn with_cleanup(mut self, cleanup: CleanupOptions) -> Self {
        self.render_options = self.render_options.with_cleanup(cleanup);
        self
    }

    /// Lowercase the output.
    pub fn lowercase(mut self) -> Self {
        self.render_options = self.render_options.lowercase();
        self
    }

    /// Rasterizer for multi-page inputs.
    pub fn with_rasterizer(mut self, rasterizer: Arc<dyn Rasterizer>) -> Self {
        self.rasterizer = Some(rasterizer);
        self
    }

    fn extractor(&self, recognizer: Arc<dyn Recognizer>) -> Extractor {
        let extractor = Extractor::new(recognizer).with_options(self.extract_options.clone());
        match &self.rasterizer {
            Some(r) => extractor.with_rasterizer(r.clone()),
            None => extractor,
        }
    }

    /// Process page images.
    pub fn run(self, recognizer: Arc<dyn Recognizer>, pages: Vec<PageImage>) -> Result<OcrtabResult> {
        let document = self.extractor(recognizer).extract_pages(pages)?;
        Ok(self.finish(document))
    }

    /// Process a document or image file.
    pub fn run_file<P: AsRef<Path>>(
        self,
        recognizer: Arc<dyn Recognizer>,
        path: P,
    ) -> Result<OcrtabResult> {
        let document = self.extractor(recognizer).extract_file(path)?;
        Ok(self.finish(document))
    }

    /// Process every page recorded in a [`PrecomputedRecognizer`].
    pub fn run_recorded(self, recognizer: PrecomputedRecognizer) -> Result<OcrtabResult> {
        let pages = recognizer.page_images();
        self.run(Arc::new(recognizer), pages)
    }

    fn finish(self, document: Document) -> OcrtabResult {
        OcrtabResult {
            document,
            render_options: self.render_options,
        }
    }
}

/// Result of an extraction run.
#[derive(Debug)]
pub struct OcrtabResult {
    /// The processed document
    pub document: Document,
    /// Render options to use
    render_options: RenderOptions,
}

impl OcrtabResult {
    /// Best-effort text, failed pages marked in place.
    pub fn to_text(&self) -> String {
        render::to_text(&self.document, &self.render_options)
    }

    /// Text, or an error if any page failed or nothing was recognized.
    pub fn into_text_strict(self) -> Result<String> {
        self.document.into_text_strict(&self.render_options)
    }

    /// Convert to a JSON report.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Summary counts.
    pub fn stats(&self) -> ExtractionStats {
        self.document.stats()
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }
}
