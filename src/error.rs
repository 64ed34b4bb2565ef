//! Error types for the ocrtab library.

use std::io;
use thiserror::Error;

/// Result type alias for ocrtab operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while rebuilding page text.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid shape parameters or worker settings. Raised before any page is processed.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The recognition step failed or returned an unusable result for a page.
    #[error("Recognition failed on page {page_id}: {message}")]
    Oracle {
        /// Page the failure belongs to
        page_id: u32,
        /// What went wrong
        message: String,
    },

    /// A page task did not produce a result (panicked or was lost).
    #[error("Page {page_id} failed: {message}")]
    PageFailed {
        /// Page the failure belongs to
        page_id: u32,
        /// What went wrong
        message: String,
    },

    /// Some pages could not be processed.
    #[error("Pages failed: {}", join_ids(.0))]
    PartialFailure(Vec<u32>),

    /// No page produced any text.
    #[error("Document does not contain text")]
    EmptyDocument,

    /// The input bytes are not a recognized document or image format.
    #[error("Unknown file format")]
    UnknownFormat,

    /// The input format is recognized but no conversion path is available.
    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Invalid page range specification.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// Malformed detection or report JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Page the error is attributed to, if any.
    pub fn page_id(&self) -> Option<u32> {
        match self {
            Error::Oracle { page_id, .. } | Error::PageFailed { page_id, .. } => Some(*page_id),
            _ => None,
        }
    }

    /// Build a recognition failure for a page.
    pub fn oracle(page_id: u32, message: impl Into<String>) -> Self {
        Error::Oracle {
            page_id,
            message: message.into(),
        }
    }
}

fn join_ids(ids: &[u32]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::EmptyDocument;
        assert_eq!(err.to_string(), "Document does not contain text");

        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );

        let err = Error::PartialFailure(vec![2, 7]);
        assert_eq!(err.to_string(), "Pages failed: 2, 7");
    }

    #[test]
    fn test_page_attribution() {
        let err = Error::oracle(3, "engine crashed");
        assert_eq!(err.page_id(), Some(3));
        assert_eq!(
            err.to_string(),
            "Recognition failed on page 3: engine crashed"
        );
        assert_eq!(Error::UnknownFormat.page_id(), None);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        fn parse(input: &str) -> Result<u32> {
            Ok(serde_json::from_str(input)?)
        }
        let err = parse("not a number").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
        assert!(err.to_string().starts_with("JSON error:"));
    }
}
