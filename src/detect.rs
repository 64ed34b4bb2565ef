//! Input format detection.
//!
//! The source document decides the conversion path: images go straight to
//! recognition as a single page, while PDFs have to be rasterized first.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Kind of input document, detected from its leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Pdf,
    Png,
    Jpeg,
    Bmp,
    Tiff,
    Gif,
    Webp,
}

impl FileKind {
    /// Conventional file extension, lowercase without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            FileKind::Pdf => "pdf",
            FileKind::Png => "png",
            FileKind::Jpeg => "jpg",
            FileKind::Bmp => "bmp",
            FileKind::Tiff => "tiff",
            FileKind::Gif => "gif",
            FileKind::Webp => "webp",
        }
    }

    /// MIME type of the format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            FileKind::Pdf => "application/pdf",
            FileKind::Png => "image/png",
            FileKind::Jpeg => "image/jpeg",
            FileKind::Bmp => "image/bmp",
            FileKind::Tiff => "image/tiff",
            FileKind::Gif => "image/gif",
            FileKind::Webp => "image/webp",
        }
    }

    /// Whether the input is already a page image.
    pub fn is_image(&self) -> bool {
        !matches!(self, FileKind::Pdf)
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Number of leading bytes needed to tell every supported format apart.
const HEADER_LEN: usize = 12;

const PDF_MAGIC: &[u8] = b"%PDF-";
const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_MAGIC: &[u8] = b"\xFF\xD8\xFF";
const BMP_MAGIC: &[u8] = b"BM";
const TIFF_LE_MAGIC: &[u8] = b"II*\x00";
const TIFF_BE_MAGIC: &[u8] = b"MM\x00*";
const GIF87_MAGIC: &[u8] = b"GIF87a";
const GIF89_MAGIC: &[u8] = b"GIF89a";

/// Detect the input kind from a file path.
///
/// # Example
/// ```no_run
/// use ocrtab::detect::detect_kind_from_path;
///
/// let kind = detect_kind_from_path("scan.png").unwrap();
/// println!("Input is {}", kind);
/// ```
pub fn detect_kind_from_path<P: AsRef<Path>>(path: P) -> Result<FileKind> {
    let file = File::open(path)?;
    let mut header = Vec::with_capacity(HEADER_LEN);
    file.take(HEADER_LEN as u64).read_to_end(&mut header)?;
    detect_kind_from_bytes(&header)
}

/// Detect the input kind from bytes.
///
/// # Returns
/// * `Ok(FileKind)` if the data starts with a known signature
/// * `Err(Error::UnknownFormat)` otherwise
pub fn detect_kind_from_bytes(data: &[u8]) -> Result<FileKind> {
    if data.starts_with(PDF_MAGIC) {
        return Ok(FileKind::Pdf);
    }
    if data.starts_with(PNG_MAGIC) {
        return Ok(FileKind::Png);
    }
    if data.starts_with(JPEG_MAGIC) {
        return Ok(FileKind::Jpeg);
    }
    if data.starts_with(TIFF_LE_MAGIC) || data.starts_with(TIFF_BE_MAGIC) {
        return Ok(FileKind::Tiff);
    }
    if data.starts_with(GIF87_MAGIC) || data.starts_with(GIF89_MAGIC) {
        return Ok(FileKind::Gif);
    }
    if data.len() >= HEADER_LEN && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        return Ok(FileKind::Webp);
    }
    // "BM" alone is too weak; also require room for the file header.
    if data.len() >= 6 && data.starts_with(BMP_MAGIC) {
        return Ok(FileKind::Bmp);
    }

    Err(Error::UnknownFormat)
}

/// Check if a file is a supported input.
pub fn is_supported<P: AsRef<Path>>(path: P) -> bool {
    detect_kind_from_path(path).is_ok()
}

/// Check if bytes are a supported input.
pub fn is_supported_bytes(data: &[u8]) -> bool {
    detect_kind_from_bytes(data).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_pdf() {
        let data = b"%PDF-1.7\n%\xe2\xe3\xcf\xd3";
        assert_eq!(detect_kind_from_bytes(data).unwrap(), FileKind::Pdf);
    }

    #[test]
    fn test_detect_images() {
        assert_eq!(
            detect_kind_from_bytes(b"\x89PNG\r\n\x1a\n\x00\x00\x00\x0d").unwrap(),
            FileKind::Png
        );
        assert_eq!(
            detect_kind_from_bytes(b"\xFF\xD8\xFF\xE0\x00\x10JFIF").unwrap(),
            FileKind::Jpeg
        );
        assert_eq!(
            detect_kind_from_bytes(b"II*\x00\x08\x00\x00\x00").unwrap(),
            FileKind::Tiff
        );
        assert_eq!(
            detect_kind_from_bytes(b"GIF89a\x01\x00").unwrap(),
            FileKind::Gif
        );
        assert_eq!(
            detect_kind_from_bytes(b"RIFF\x24\x00\x00\x00WEBPVP8 ").unwrap(),
            FileKind::Webp
        );
        assert_eq!(
            detect_kind_from_bytes(b"BM\x36\x00\x0c\x00\x00\x00").unwrap(),
            FileKind::Bmp
        );
    }

    #[test]
    fn test_detect_unknown() {
        assert!(matches!(
            detect_kind_from_bytes(b"<!DOCTYPE html>"),
            Err(Error::UnknownFormat)
        ));
        assert!(matches!(
            detect_kind_from_bytes(b""),
            Err(Error::UnknownFormat)
        ));
        assert!(matches!(
            detect_kind_from_bytes(b"BM"),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_kind_properties() {
        assert!(!FileKind::Pdf.is_image());
        assert!(FileKind::Jpeg.is_image());
        assert_eq!(FileKind::Jpeg.extension(), "jpg");
        assert_eq!(FileKind::Png.mime_type(), "image/png");
    }

    #[test]
    fn test_is_supported_bytes() {
        assert!(is_supported_bytes(b"%PDF-1.4\n"));
        assert!(!is_supported_bytes(b"Not a document"));
    }
}
