//! Page-level types.

use super::PlacedFragment;
use crate::detect::FileKind;
use serde::{Deserialize, Serialize};

/// A page image handed to the recognition step.
#[derive(Debug, Clone)]
pub struct PageImage {
    /// Page number (1-indexed, natural order of the source)
    pub page_id: u32,
    /// Name of the image, used for logging and output grouping
    pub image_name: String,
    /// Encoded image bytes
    pub data: Vec<u8>,
    /// Detected image encoding, if known
    pub kind: Option<FileKind>,
}

impl PageImage {
    /// Create a page image.
    pub fn new(page_id: u32, image_name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            page_id,
            image_name: image_name.into(),
            data,
            kind: None,
        }
    }

    /// Create a page without image data, for recognizers that do not need pixels.
    pub fn placeholder(page_id: u32, image_name: impl Into<String>) -> Self {
        Self::new(page_id, image_name, Vec::new())
    }

    /// Set the image encoding.
    pub fn with_kind(mut self, kind: FileKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

/// Fragments sharing a grid row, ordered left to right.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Grid row of every fragment in the line
    pub row: usize,
    /// Fragments ordered by column, then raw x
    pub fragments: Vec<PlacedFragment>,
}

impl Line {
    /// Create a line.
    pub fn new(row: usize, fragments: Vec<PlacedFragment>) -> Self {
        Self { row, fragments }
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Column indices in line order.
    pub fn columns(&self) -> Vec<usize> {
        self.fragments.iter().map(|f| f.column()).collect()
    }

    /// Fragment texts joined by single spaces, without layout.
    pub fn plain_text(&self) -> String {
        self.fragments
            .iter()
            .map(|f| f.text())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// The rebuilt text of one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageText {
    /// Page number (1-indexed)
    pub page_id: u32,

    /// Name of the page image
    pub image_name: String,

    /// Non-empty rows in ascending row order
    pub lines: Vec<Line>,

    /// Formatted text of each line, parallel to `lines`
    pub formatted: Vec<String>,

    /// Whether an axis range collapsed to a single point
    pub degenerate: bool,
}

impl PageText {
    /// Create an empty page.
    pub fn empty(page_id: u32, image_name: impl Into<String>) -> Self {
        Self {
            page_id,
            image_name: image_name.into(),
            lines: Vec::new(),
            formatted: Vec::new(),
            degenerate: false,
        }
    }

    /// Page text with one line break between consecutive lines.
    pub fn text(&self) -> String {
        self.formatted.join("\n")
    }

    /// Check if the page has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn fragment_count(&self) -> usize {
        self.lines.iter().map(Line::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Fragment, GridCell};

    fn placed(text: &str, row: usize, column: usize) -> PlacedFragment {
        PlacedFragment::new(Fragment::new(text, 0.0, 0.0), GridCell::new(row, column))
    }

    #[test]
    fn test_line_accessors() {
        let line = Line::new(2, vec![placed("a", 2, 0), placed("b", 2, 4)]);
        assert_eq!(line.len(), 2);
        assert_eq!(line.columns(), vec![0, 4]);
        assert_eq!(line.plain_text(), "a b");
    }

    #[test]
    fn test_page_text_join() {
        let mut page = PageText::empty(1, "p1.png");
        assert!(page.is_empty());

        page.lines.push(Line::new(0, vec![placed("top", 0, 0)]));
        page.lines.push(Line::new(3, vec![placed("bottom", 3, 0)]));
        page.formatted = vec!["top".into(), "bottom".into()];

        assert_eq!(page.text(), "top\nbottom");
        assert_eq!(page.line_count(), 2);
        assert_eq!(page.fragment_count(), 2);
    }

    #[test]
    fn test_page_image_placeholder() {
        let image = PageImage::placeholder(4, "p4").with_kind(FileKind::Png);
        assert!(image.data.is_empty());
        assert_eq!(image.kind, Some(FileKind::Png));
    }
}
