//! Recognizer that replays recorded recognition output.

use super::{load_detections, parse_detections, PageDetections, Recognizer};
use crate::error::{Error, Result};
use crate::model::{AnchorPoint, Detection, PageImage};
use std::collections::HashMap;
use std::path::Path;

/// Replays detections recorded by an external engine, keyed by page id.
///
/// Boxes are reduced to points with one anchor for the whole run, so every
/// fragment of a page is binned against consistent coordinates.
#[derive(Debug, Clone, Default)]
pub struct PrecomputedRecognizer {
    pages: HashMap<u32, PageDetections>,
    anchor: AnchorPoint,
}

impl PrecomputedRecognizer {
    /// Create a recognizer from recorded pages.
    pub fn new(pages: Vec<PageDetections>) -> Self {
        Self {
            pages: pages.into_iter().map(|p| (p.page_id, p)).collect(),
            anchor: AnchorPoint::default(),
        }
    }

    /// Parse recorded pages from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(Self::new(parse_detections(json)?))
    }

    /// Load recorded pages from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(load_detections(path)?))
    }

    /// Set the anchor used to reduce boxes to points.
    pub fn with_anchor(mut self, anchor: AnchorPoint) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn anchor(&self) -> AnchorPoint {
        self.anchor
    }

    /// Number of recorded pages.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    pub fn contains(&self, page_id: u32) -> bool {
        self.pages.contains_key(&page_id)
    }

    /// Placeholder images for every recorded page, in page order.
    ///
    /// The recorded output already stands in for the pixels, so the images
    /// carry only identity and name.
    pub fn page_images(&self) -> Vec<PageImage> {
        let mut images: Vec<PageImage> = self
            .pages
            .values()
            .map(|p| PageImage::placeholder(p.page_id, p.image_name.clone()))
            .collect();
        images.sort_by_key(|image| image.page_id);
        images
    }
}

impl Recognizer for PrecomputedRecognizer {
    fn name(&self) -> &str {
        "precomputed"
    }

    fn recognize(&self, image: &PageImage) -> Result<Vec<Detection>> {
        self.pages
            .get(&image.page_id)
            .map(|page| page.detections(self.anchor))
            .ok_or_else(|| Error::oracle(image.page_id, "no recorded detections for this page"))
    }
}
