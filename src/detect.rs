//! PDF input detection and validation.
//!
//! Used by the reader and the batch driver to reject inputs before any
//! parsing happens.

use crate::error::{Error, Result};
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

/// PDF header information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfFormat {
    /// PDF version (e.g., "1.7", "2.0")
    pub version: String,
}

impl std::fmt::Display for PdfFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PDF {}", self.version)
    }
}

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_MAGIC_LEN: usize = 5;
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Detect the PDF header of a file.
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<PdfFormat> {
    let mut file = File::open(path)?;
    let mut header = Vec::with_capacity(16);
    file.by_ref().take(16).read_to_end(&mut header)?;
    detect_format_from_bytes(&header)
}

/// Detect the PDF header from the leading bytes of a document.
///
/// # Returns
/// * `Ok(PdfFormat)` if the data starts with `%PDF-x.y`
/// * `Err(Error::UnknownFormat)` if the data is not a PDF
/// * `Err(Error::UnsupportedVersion)` if the version field is malformed
pub fn detect_format_from_bytes(data: &[u8]) -> Result<PdfFormat> {
    if data.len() < PDF_MAGIC_LEN + VERSION_LEN || !data.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let version_bytes = &data[PDF_MAGIC_LEN..PDF_MAGIC_LEN + VERSION_LEN];
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(&version) {
        return Err(Error::UnsupportedVersion(version));
    }

    Ok(PdfFormat { version })
}

fn is_valid_version(version: &str) -> bool {
    let bytes = version.as_bytes();
    bytes.len() == 3 && bytes[0].is_ascii_digit() && bytes[1] == b'.' && bytes[2].is_ascii_digit()
}

/// Check that a path names a readable, non-empty PDF file.
///
/// Performs the checks in order: existence, `.pdf` extension, non-zero
/// size, header. Each failure maps to [`Error::InvalidInput`] except a bad
/// header, which keeps the detection error.
pub fn validate_pdf_file<P: AsRef<Path>>(path: P) -> Result<PdfFormat> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(Error::InvalidInput(format!(
            "file does not exist: {}",
            path.display()
        )));
    }

    if !has_pdf_extension(path) {
        return Err(Error::InvalidInput(format!(
            "file is not a PDF: {}",
            path.display()
        )));
    }

    if fs::metadata(path)?.len() == 0 {
        return Err(Error::InvalidInput(format!(
            "PDF file is empty: {}",
            path.display()
        )));
    }

    detect_format_from_path(path)
}

/// Check whether a path carries a `.pdf` extension (case-insensitive).
pub fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// Check if a file is a valid PDF.
pub fn is_pdf<P: AsRef<Path>>(path: P) -> bool {
    detect_format_from_path(path).is_ok()
}

/// Check if bytes start with a valid PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_valid_pdf() {
        let data = b"%PDF-1.7\n%\xe2\xe3\xcf\xd3";
        let format = detect_format_from_bytes(data).unwrap();
        assert_eq!(format.version, "1.7");
        assert_eq!(format.to_string(), "PDF 1.7");
    }

    #[test]
    fn test_detect_invalid_format() {
        let result = detect_format_from_bytes(b"<!DOCTYPE html>");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_detect_too_short() {
        let result = detect_format_from_bytes(b"%PDF");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_detect_bad_version() {
        let result = detect_format_from_bytes(b"%PDF-x.y\n");
        assert!(matches!(result, Err(Error::UnsupportedVersion(_))));
    }

    #[test]
    fn test_has_pdf_extension() {
        assert!(has_pdf_extension(Path::new("report.pdf")));
        assert!(has_pdf_extension(Path::new("REPORT.PDF")));
        assert!(!has_pdf_extension(Path::new("report.txt")));
        assert!(!has_pdf_extension(Path::new("report")));
    }

    #[test]
    fn test_validate_missing_file() {
        let result = validate_pdf_file("/definitely/not/here.pdf");
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_validate_pdf_file() {
        let dir = tempfile::tempdir().unwrap();

        let empty = dir.path().join("empty.pdf");
        fs::write(&empty, b"").unwrap();
        assert!(matches!(
            validate_pdf_file(&empty),
            Err(Error::InvalidInput(_))
        ));

        let wrong_ext = dir.path().join("notes.txt");
        fs::write(&wrong_ext, b"%PDF-1.4\n").unwrap();
        assert!(matches!(
            validate_pdf_file(&wrong_ext),
            Err(Error::InvalidInput(_))
        ));

        let bad_header = dir.path().join("fake.pdf");
        fs::write(&bad_header, b"hello world, not a pdf").unwrap();
        assert!(matches!(
            validate_pdf_file(&bad_header),
            Err(Error::UnknownFormat)
        ));

        let good = dir.path().join("good.pdf");
        fs::write(&good, b"%PDF-1.4\n%%EOF\n").unwrap();
        assert_eq!(validate_pdf_file(&good).unwrap().version, "1.4");
    }
}
