//! Page-parallel extraction.
//!
//! Each requested page is one task on a bounded worker pool: recognition,
//! then binning, line assembly and formatting for that page alone. Tasks
//! finish in any order; their outcomes are put back into request order by
//! position before the document is built.

use crate::detect::FileKind;
use crate::error::{Error, Result};
use crate::layout::{LayoutEngine, LayoutOptions};
use crate::model::{Detection, Document, DocumentMetadata, PageImage, PageOutcome, PageText};
use crate::oracle::Recognizer;
use crate::render::PageSelection;
use crate::source::{load_pages, select_pages, Rasterizer};
use chrono::Utc;
use rayon::ThreadPoolBuilder;
use std::any::Any;
use std::fmt;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;

/// Default number of worker threads.
pub const DEFAULT_MAX_WORKERS: usize = 2;

/// Options for an extraction run.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Grid shape and spacing knobs
    pub layout: LayoutOptions,

    /// Worker threads, which also bounds concurrent recognizer calls
    pub max_workers: usize,

    /// Pages to process, and their order
    pub pages: PageSelection,

    /// Detections scoring below this are dropped before layout
    pub min_confidence: f32,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            layout: LayoutOptions::default(),
            max_workers: DEFAULT_MAX_WORKERS,
            pages: PageSelection::All,
            min_confidence: 0.0,
        }
    }
}

impl ExtractOptions {
    /// Create options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Single worker, pages processed one after another.
    pub fn sequential() -> Self {
        Self::default().with_workers(1)
    }

    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.max_workers = workers;
        self
    }

    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    pub fn with_min_confidence(mut self, min_confidence: f32) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    /// Check every knob before any page is touched.
    pub fn validate(&self) -> Result<()> {
        self.layout.validate()?;
        if self.max_workers == 0 {
            return Err(Error::Configuration(
                "max_workers must be at least 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(Error::Configuration(format!(
                "min_confidence must be within [0, 1], got {}",
                self.min_confidence
            )));
        }
        Ok(())
    }
}

/// Callback invoked on the calling thread as each page finishes, in completion order.
pub type ProgressFn = Arc<dyn Fn(&PageOutcome) + Send + Sync>;

/// Runs recognition and layout over the pages of a document.
#[derive(Clone)]
pub struct Extractor {
    recognizer: Arc<dyn Recognizer>,
    rasterizer: Option<Arc<dyn Rasterizer>>,
    options: ExtractOptions,
    progress: Option<ProgressFn>,
}

impl Extractor {
    /// Create an extractor with default options.
    pub fn new(recognizer: Arc<dyn Recognizer>) -> Self {
        Self {
            recognizer,
            rasterizer: None,
            options: ExtractOptions::default(),
            progress: None,
        }
    }

    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    /// Rasterizer for multi-page inputs such as PDF.
    pub fn with_rasterizer(mut self, rasterizer: Arc<dyn Rasterizer>) -> Self {
        self.rasterizer = Some(rasterizer);
        self
    }

    /// Report each page as it finishes.
    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    pub fn recognizer(&self) -> &dyn Recognizer {
        self.recognizer.as_ref()
    }

    /// Process already-rasterized pages.
    pub fn extract_pages(&self, pages: Vec<PageImage>) -> Result<Document> {
        self.run(pages, None, None)
    }

    /// Detect the input kind, rasterize it and process the selected pages.
    pub fn extract_bytes(&self, data: &[u8], source_name: &str) -> Result<Document> {
        self.options.validate()?;
        let (kind, pages) = load_pages(data, source_name, self.rasterizer.as_deref())?;
        self.run(pages, Some(source_name.to_string()), Some(kind))
    }

    /// Read a file and process it.
    pub fn extract_file(&self, path: impl AsRef<Path>) -> Result<Document> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("input")
            .to_string();
        self.extract_bytes(&data, &name)
    }

    /// Process pages without blocking the async runtime.
    #[cfg(feature = "async")]
    pub async fn extract_async(&self, pages: Vec<PageImage>) -> Result<Document> {
        let extractor = self.clone();
        tokio::task::spawn_blocking(move || extractor.extract_pages(pages))
            .await
            .map_err(|e| Error::Other(format!("Extraction task failed: {}", e)))?
    }

    fn run(
        &self,
        pages: Vec<PageImage>,
        source: Option<String>,
        kind: Option<FileKind>,
    ) -> Result<Document> {
        self.options.validate()?;
        let engine = LayoutEngine::new(self.options.layout.clone())?;
        let pages = select_pages(pages, &self.options.pages)?;

        let mut metadata = DocumentMetadata {
            source,
            kind,
            requested_pages: pages.len() as u32,
            workers: self.options.max_workers,
            ..Default::default()
        };

        log::info!(
            "Extracting {} pages with {} workers using {}",
            pages.len(),
            self.options.max_workers,
            self.recognizer.name()
        );

        let outcomes = self.process_all(&engine, &pages)?;

        metadata.finished_at = Utc::now();
        let mut doc = Document::new();
        doc.metadata = metadata;
        for outcome in outcomes {
            doc.add_page(outcome);
        }

        if !doc.is_complete() {
            log::warn!("Pages failed: {:?}", doc.failed_page_ids());
        }
        Ok(doc)
    }

    /// Run every page on the pool and collect outcomes by position.
    fn process_all(&self, engine: &LayoutEngine, pages: &[PageImage]) -> Result<Vec<PageOutcome>> {
        if pages.is_empty() {
            return Ok(Vec::new());
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(self.options.max_workers)
            .thread_name(|i| format!("ocrtab-worker-{}", i))
            .build()
            .map_err(|e| Error::Configuration(format!("Cannot build worker pool: {}", e)))?;

        let recognizer = self.recognizer.as_ref();
        let min_confidence = self.options.min_confidence;
        let mut slots: Vec<Option<PageOutcome>> = (0..pages.len()).map(|_| None).collect();

        pool.in_place_scope(|scope| {
            let (tx, rx) = crossbeam_channel::unbounded();

            for (position, image) in pages.iter().enumerate() {
                let tx = tx.clone();
                scope.spawn(move |_| {
                    let outcome = run_page(engine, recognizer, image, min_confidence);
                    // The receiver outlives every task.
                    let _ = tx.send((position, outcome));
                });
            }
            drop(tx);

            for (position, outcome) in rx.iter() {
                if let Some(progress) = &self.progress {
                    progress(&outcome);
                }
                slots[position] = Some(outcome);
            }
        });

        Ok(slots
            .into_iter()
            .zip(pages)
            .map(|(slot, image)| {
                slot.unwrap_or_else(|| {
                    PageOutcome::failed(
                        image.page_id,
                        image.image_name.clone(),
                        Error::PageFailed {
                            page_id: image.page_id,
                            message: "task produced no result".into(),
                        },
                    )
                })
            })
            .collect())
    }
}

impl fmt::Debug for Extractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extractor")
            .field("recognizer", &self.recognizer.name())
            .field("rasterizer", &self.rasterizer.as_ref().map(|r| r.name().to_string()))
            .field("options", &self.options)
            .finish()
    }
}

/// One page, start to finish. Never panics; failures become the page's outcome.
fn run_page(
    engine: &LayoutEngine,
    recognizer: &dyn Recognizer,
    image: &PageImage,
    min_confidence: f32,
) -> PageOutcome {
    log::info!("Page {} ({}) started", image.page_id, image.image_name);

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        process_page(engine, recognizer, image, min_confidence)
    }))
    .unwrap_or_else(|payload| {
        Err(Error::PageFailed {
            page_id: image.page_id,
            message: panic_message(payload.as_ref()),
        })
    });

    match result {
        Ok(page) => {
            log::info!(
                "Page {} ({}) finished: {} lines",
                image.page_id,
                image.image_name,
                page.line_count()
            );
            PageOutcome::done(page)
        }
        Err(e) => {
            log::warn!("Page {} ({}) failed: {}", image.page_id, image.image_name, e);
            PageOutcome::failed(image.page_id, image.image_name.clone(), e)
        }
    }
}

fn process_page(
    engine: &LayoutEngine,
    recognizer: &dyn Recognizer,
    image: &PageImage,
    min_confidence: f32,
) -> Result<PageText> {
    let detections = recognizer.recognize(image).map_err(|e| match e {
        Error::Oracle { .. } => e,
        other => Error::oracle(image.page_id, other.to_string()),
    })?;

    let total = detections.len();
    let kept: Vec<Detection> = detections
        .into_iter()
        .filter(|d| d.passes(min_confidence))
        .collect();
    if kept.len() < total {
        log::debug!(
            "Page {}: dropped {} of {} detections below confidence {}",
            image.page_id,
            total - kept.len(),
            total,
            min_confidence
        );
    }

    engine.layout_detections(image.page_id, &image.image_name, kept)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("task panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("task panicked: {}", s)
    } else {
        "task panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::FnRecognizer;

    fn echo() -> Arc<dyn Recognizer> {
        Arc::new(FnRecognizer::new("echo", |image: &PageImage| {
            Ok(vec![Detection::new(image.image_name.clone(), 0.0, 0.0)])
        }))
    }

    fn pages(n: u32) -> Vec<PageImage> {
        (1..=n)
            .map(|i| PageImage::placeholder(i, format!("p{}", i)))
            .collect()
    }

    #[test]
    fn test_options_validate() {
        assert!(ExtractOptions::default().validate().is_ok());
        assert!(matches!(
            ExtractOptions::new().with_workers(0).validate(),
            Err(Error::Configuration(_))
        ));
        assert!(ExtractOptions::new().with_min_confidence(1.5).validate().is_err());
        assert!(ExtractOptions::new()
            .with_min_confidence(f32::NAN)
            .validate()
            .is_err());
        assert_eq!(ExtractOptions::sequential().max_workers, 1);
    }

    #[test]
    fn test_extract_in_order() {
        let doc = Extractor::new(echo()).extract_pages(pages(5)).unwrap();
        let ids: Vec<u32> = doc.pages.iter().map(|p| p.page_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(doc.metadata.requested_pages, 5);
        assert_eq!(doc.metadata.workers, 2);
    }

    #[test]
    fn test_panic_becomes_page_failure() {
        let recognizer = Arc::new(FnRecognizer::new("flaky", |image: &PageImage| {
            if image.page_id == 2 {
                panic!("driver crashed");
            }
            Ok(vec![Detection::new("ok", 0.0, 0.0)])
        }));
        let doc = Extractor::new(recognizer).extract_pages(pages(3)).unwrap();
        assert_eq!(doc.failed_page_ids(), vec![2]);
        let err = doc.get_page(2).unwrap().error().unwrap();
        assert!(err.to_string().contains("driver crashed"));
    }

    #[test]
    fn test_non_oracle_error_is_attributed() {
        let recognizer = Arc::new(FnRecognizer::new("io", |_: &PageImage| {
            Err(Error::Other("camera offline".into()))
        }));
        let doc = Extractor::new(recognizer).extract_pages(pages(1)).unwrap();
        assert!(matches!(
            doc.get_page(1).unwrap().error(),
            Some(Error::Oracle { page_id: 1, .. })
        ));
    }

    #[test]
    fn test_min_confidence_filter() {
        let recognizer = Arc::new(FnRecognizer::new("scored", |_: &PageImage| {
            Ok(vec![
                Detection::new("keep", 0.0, 0.0).with_confidence(0.9),
                Detection::new("drop", 10.0, 0.0).with_confidence(0.1),
                Detection::new("unscored", 20.0, 0.0),
            ])
        }));
        let options = ExtractOptions::new().with_min_confidence(0.5);
        let doc = Extractor::new(recognizer)
            .with_options(options)
            .extract_pages(pages(1))
            .unwrap();
        let page = doc.get_page(1).unwrap().page().unwrap();
        assert_eq!(page.fragment_count(), 2);
        assert!(!page.text().contains("drop"));
    }

    #[test]
    fn test_empty_request() {
        let doc = Extractor::new(echo()).extract_pages(Vec::new()).unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn test_progress_sees_every_page() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let seen = Arc::new(AtomicUsize::new(0));
        let counter = seen.clone();
        let extractor = Extractor::new(echo()).with_progress(Arc::new(move |_: &PageOutcome| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        extractor.extract_pages(pages(4)).unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 4);
    }
}
