//! Recognition seam.
//!
//! The recognition engine is external to this crate. Anything that can turn a
//! page image into positioned text implements [`Recognizer`]; the pipeline
//! calls it once per page from inside the worker pool.
//!
//! # Example
//!
//! ```
//! use ocrtab::oracle::{FnRecognizer, Recognizer, RecognizerRegistry};
//! use ocrtab::{Detection, PageImage};
//! use std::sync::Arc;
//!
//! let mut registry = RecognizerRegistry::new();
//! registry.register(Arc::new(FnRecognizer::new("fixed", |_image: &PageImage| {
//!     Ok(vec![Detection::new("Total", 10.0, 20.0)])
//! })));
//!
//! let recognizer = registry.get("fixed").unwrap();
//! let detections = recognizer.recognize(&PageImage::placeholder(1, "p1")).unwrap();
//! assert_eq!(detections[0].text, "Total");
//! ```

mod json;
mod precomputed;

pub use json::{
    load_detections, parse_detections, PageDetections, RecordedDetection, RecordedPosition,
};
pub use precomputed::PrecomputedRecognizer;

use crate::error::Result;
use crate::model::{Detection, PageImage};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A recognition engine.
///
/// Implementations are shared between worker threads, so they must be
/// `Send + Sync`. An `Err` is attributed to the page being recognized and
/// does not affect other pages.
pub trait Recognizer: Send + Sync {
    /// Name of this recognizer.
    fn name(&self) -> &str;

    /// Detect text spans on one page image.
    fn recognize(&self, image: &PageImage) -> Result<Vec<Detection>>;
}

/// Recognizer backed by a closure.
pub struct FnRecognizer<F> {
    name: String,
    f: F,
}

impl<F> FnRecognizer<F>
where
    F: Fn(&PageImage) -> Result<Vec<Detection>> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> Recognizer for FnRecognizer<F>
where
    F: Fn(&PageImage) -> Result<Vec<Detection>> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn recognize(&self, image: &PageImage) -> Result<Vec<Detection>> {
        (self.f)(image)
    }
}

impl<F> fmt::Debug for FnRecognizer<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRecognizer")
            .field("name", &self.name)
            .finish()
    }
}

/// Registry of recognizers, selectable by name at construction time.
#[derive(Default)]
pub struct RecognizerRegistry {
    by_name: HashMap<String, Arc<dyn Recognizer>>,
}

impl RecognizerRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a recognizer under its lowercased name, replacing any previous one.
    pub fn register(&mut self, recognizer: Arc<dyn Recognizer>) {
        self.by_name
            .insert(recognizer.name().to_lowercase(), recognizer);
    }

    /// Get a recognizer by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Recognizer>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Check if a recognizer is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(&name.to_lowercase())
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_name.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl fmt::Debug for RecognizerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecognizerRegistry")
            .field("recognizers", &self.names())
            .finish()
    }
}
