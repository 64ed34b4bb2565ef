//! Recognition output serialized as JSON.
//!
//! Two layouts are accepted:
//!
//! ```json
//! {"pages": [{"page_id": 1, "image_name": "page_1.jpg", "detections": [...]}]}
//! ```
//!
//! or a bare list of detections, which is taken as page 1. Each detection is
//! either an anchored point, a box, or an EasyOCR-style triple:
//!
//! ```json
//! {"text": "Total", "x": 10.0, "y": 20.0, "confidence": 0.9}
//! {"text": "Total", "bbox": [[10, 15], [60, 15], [60, 25], [10, 25]]}
//! [[[10, 15], [60, 15], [60, 25], [10, 25]], "Total", 0.9]
//! ```

use crate::error::{Error, Result};
use crate::model::{AnchorPoint, BoundingBox, Detection};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Where a recorded detection sits on the page.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedPosition {
    /// Already reduced to one point
    Point { x: f64, y: f64 },
    /// Full box, reduced when an anchor is chosen
    Box(BoundingBox),
}

/// One detection as it was recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDetection {
    pub text: String,
    pub position: RecordedPosition,
    pub confidence: Option<f32>,
}

impl RecordedDetection {
    /// Reduce to a [`Detection`] using the given anchor. Point detections ignore it.
    pub fn to_detection(&self, anchor: AnchorPoint) -> Detection {
        let detection = match &self.position {
            RecordedPosition::Point { x, y } => Detection::new(self.text.clone(), *x, *y),
            RecordedPosition::Box(bbox) => Detection::from_box(self.text.clone(), bbox, anchor),
        };
        match self.confidence {
            Some(c) => detection.with_confidence(c),
            None => detection,
        }
    }
}

/// Recorded detections of one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageDetections {
    pub page_id: u32,
    pub image_name: String,
    pub detections: Vec<RecordedDetection>,
}

impl PageDetections {
    /// Detections reduced with the given anchor, in recorded order.
    pub fn detections(&self, anchor: AnchorPoint) -> Vec<Detection> {
        self.detections
            .iter()
            .map(|d| d.to_detection(anchor))
            .collect()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDetection {
    Point {
        text: String,
        x: f64,
        y: f64,
        #[serde(default)]
        confidence: Option<f32>,
    },
    Boxed {
        text: String,
        bbox: [[f64; 2]; 4],
        #[serde(default)]
        confidence: Option<f32>,
    },
    Triple([[f64; 2]; 4], String, f32),
}

impl From<RawDetection> for RecordedDetection {
    fn from(raw: RawDetection) -> Self {
        match raw {
            RawDetection::Point {
                text,
                x,
                y,
                confidence,
            } => Self {
                text,
                position: RecordedPosition::Point { x, y },
                confidence,
            },
            RawDetection::Boxed {
                text,
                bbox,
                confidence,
            } => Self {
                text,
                position: RecordedPosition::Box(BoundingBox::new(bbox)),
                confidence,
            },
            RawDetection::Triple(bbox, text, confidence) => Self {
                text,
                position: RecordedPosition::Box(BoundingBox::new(bbox)),
                confidence: Some(confidence),
            },
        }
    }
}

#[derive(Deserialize)]
struct RawPage {
    page_id: u32,
    #[serde(default)]
    image_name: Option<String>,
    #[serde(default)]
    detections: Vec<Value>,
}

fn parse_detection(page_id: u32, index: usize, value: Value) -> Result<RecordedDetection> {
    serde_json::from_value::<RawDetection>(value)
        .map(RecordedDetection::from)
        .map_err(|_| {
            Error::Other(format!(
                "Detection {} on page {} is not a point, box or [box, text, confidence] triple",
                index, page_id
            ))
        })
}

fn parse_page(page_id: u32, image_name: Option<String>, values: Vec<Value>) -> Result<PageDetections> {
    let detections = values
        .into_iter()
        .enumerate()
        .map(|(i, v)| parse_detection(page_id, i, v))
        .collect::<Result<Vec<_>>>()?;

    Ok(PageDetections {
        page_id,
        image_name: image_name.unwrap_or_else(|| format!("page_{}", page_id)),
        detections,
    })
}

/// Parse recorded detections from a JSON string.
///
/// Pages are returned in the order they appear in the input. Page ids must be
/// unique and start at 1.
pub fn parse_detections(json: &str) -> Result<Vec<PageDetections>> {
    let value: Value = serde_json::from_str(json)?;

    let pages = match value {
        Value::Array(values) => vec![parse_page(1, None, values)?],
        Value::Object(mut map) => {
            let pages = map
                .remove("pages")
                .ok_or_else(|| Error::Other("Detection file has no \"pages\" field".into()))?;
            let raw_pages: Vec<RawPage> = serde_json::from_value(pages)?;

            let mut seen = HashSet::new();
            let mut parsed = Vec::with_capacity(raw_pages.len());
            for raw in raw_pages {
                if raw.page_id == 0 {
                    return Err(Error::Other("Page ids start at 1".into()));
                }
                if !seen.insert(raw.page_id) {
                    return Err(Error::Other(format!(
                        "Page {} appears more than once",
                        raw.page_id
                    )));
                }
                parsed.push(parse_page(raw.page_id, raw.image_name, raw.detections)?);
            }
            parsed
        }
        _ => {
            return Err(Error::Other(
                "Detection file must be an object or a list".into(),
            ))
        }
    };

    log::debug!(
        "Parsed {} pages, {} detections",
        pages.len(),
        pages.iter().map(|p| p.detections.len()).sum::<usize>()
    );
    Ok(pages)
}

/// Load recorded detections from a JSON file.
pub fn load_detections(path: impl AsRef<Path>) -> Result<Vec<PageDetections>> {
    let json = fs::read_to_string(path)?;
    parse_detections(&json)
}
