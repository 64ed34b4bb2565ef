//! Recognized text spans and their positions.

use serde::{Deserialize, Serialize};

/// Quadrilateral bounding region of a detection, in page-image pixels.
///
/// Points run clockwise from the top-left corner, which is how recognition
/// engines usually report rotated text boxes. Image coordinates grow
/// rightwards and downwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Corner points as `[x, y]` pairs
    pub points: [[f64; 2]; 4],
}

impl BoundingBox {
    /// Create a bounding box from four corner points.
    pub fn new(points: [[f64; 2]; 4]) -> Self {
        Self { points }
    }

    /// Create an axis-aligned bounding box.
    pub fn from_rect(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self::new([[left, top], [right, top], [right, bottom], [left, bottom]])
    }

    /// Smallest x of all corners.
    pub fn left(&self) -> f64 {
        self.points.iter().map(|p| p[0]).fold(f64::INFINITY, f64::min)
    }

    /// Largest x of all corners.
    pub fn right(&self) -> f64 {
        self.points
            .iter()
            .map(|p| p[0])
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Smallest y of all corners.
    pub fn top(&self) -> f64 {
        self.points.iter().map(|p| p[1]).fold(f64::INFINITY, f64::min)
    }

    /// Largest y of all corners.
    pub fn bottom(&self) -> f64 {
        self.points
            .iter()
            .map(|p| p[1])
            .fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn width(&self) -> f64 {
        self.right() - self.left()
    }

    pub fn height(&self) -> f64 {
        self.bottom() - self.top()
    }

    /// Representative point of the box for the given anchor.
    pub fn anchor(&self, anchor: AnchorPoint) -> (f64, f64) {
        match anchor {
            AnchorPoint::TopLeft => (self.left(), self.top()),
            AnchorPoint::LeftCenter => (self.left(), (self.top() + self.bottom()) / 2.0),
            AnchorPoint::Centroid => {
                let (sx, sy) = self
                    .points
                    .iter()
                    .fold((0.0, 0.0), |(sx, sy), p| (sx + p[0], sy + p[1]));
                (sx / 4.0, sy / 4.0)
            }
        }
    }
}

/// Which point of a bounding box stands in for the whole fragment.
///
/// Every fragment on a page has to use the same anchor, otherwise rows and
/// columns are binned against inconsistent coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorPoint {
    /// Top-left corner
    TopLeft,
    /// Left edge, vertical center
    #[default]
    LeftCenter,
    /// Mean of the four corners
    Centroid,
}

/// One raw detection returned by the recognition step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Recognized text
    pub text: String,
    /// Anchor x coordinate
    pub x: f64,
    /// Anchor y coordinate
    pub y: f64,
    /// Recognition confidence in `[0, 1]`, when the engine reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl Detection {
    /// Create a detection from an already-anchored point.
    pub fn new(text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            confidence: None,
        }
    }

    /// Create a detection from a bounding box.
    pub fn from_box(text: impl Into<String>, bbox: &BoundingBox, anchor: AnchorPoint) -> Self {
        let (x, y) = bbox.anchor(anchor);
        Self::new(text, x, y)
    }

    /// Attach a confidence score.
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Whether the detection passes a confidence threshold.
    ///
    /// Detections without a score always pass.
    pub fn passes(&self, min_confidence: f32) -> bool {
        self.confidence.map_or(true, |c| c >= min_confidence)
    }
}

/// A recognized text span on a specific page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// Recognized text, kept verbatim
    pub text: String,
    /// Anchor x coordinate
    pub x: f64,
    /// Anchor y coordinate
    pub y: f64,
    /// Page the fragment was found on
    pub page_id: u32,
    /// Name of the page image
    pub image_name: String,
}

impl Fragment {
    /// Create a fragment.
    pub fn new(text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            page_id: 1,
            image_name: String::new(),
        }
    }

    /// Attach a detection to its page.
    pub fn from_detection(detection: Detection, page_id: u32, image_name: &str) -> Self {
        Self {
            text: detection.text,
            x: detection.x,
            y: detection.y,
            page_id,
            image_name: image_name.to_string(),
        }
    }

    /// Set provenance.
    pub fn on_page(mut self, page_id: u32, image_name: impl Into<String>) -> Self {
        self.page_id = page_id;
        self.image_name = image_name.into();
        self
    }

    /// Number of characters in the text.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Discrete (row, column) label of a fragment on the page grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCell {
    pub row: usize,
    pub column: usize,
}

impl GridCell {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// A fragment together with its computed grid cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedFragment {
    pub fragment: Fragment,
    pub cell: GridCell,
}

impl PlacedFragment {
    pub fn new(fragment: Fragment, cell: GridCell) -> Self {
        Self { fragment, cell }
    }

    pub fn row(&self) -> usize {
        self.cell.row
    }

    pub fn column(&self) -> usize {
        self.cell.column
    }

    pub fn text(&self) -> &str {
        &self.fragment.text
    }
}
