//! PDF line reader using lopdf.

use std::io::Read;
use std::path::Path;

use crate::detect::{detect_format_from_bytes, detect_format_from_path};
use crate::error::{Error, Result};
use crate::model::TextLine;
use crate::source::LineSource;

use super::backend::{LopdfBackend, PdfBackend};
use super::layout::LineExtractor;
use super::options::{ErrorMode, PageSelection, ParseOptions};

/// Reads the text lines of a PDF document.
pub struct PdfParser {
    backend: LopdfBackend,
    options: ParseOptions,
}

impl PdfParser {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();
        detect_format_from_path(path)?;

        let backend = LopdfBackend::load_file(path)?;
        Ok(Self { backend, options })
    }

    /// Read a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Read a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        detect_format_from_bytes(data)?;

        let backend = LopdfBackend::load_bytes(data)?;
        Ok(Self { backend, options })
    }

    /// Read a PDF from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, ParseOptions::default())
    }

    /// Read a PDF from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: ParseOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Extract the lines of every selected page, in page order.
    ///
    /// Page indices on the returned lines are 0-based positions in the whole
    /// document, whatever the selection. In lenient mode a page that fails
    /// to decode is skipped with a warning.
    pub fn extract_lines(&self) -> Result<Vec<TextLine>> {
        let pages = self.backend.pages();
        let total = pages.len() as u32;
        self.check_selection(total)?;

        let extractor = LineExtractor::new(&self.backend);
        let mut lines = Vec::new();

        for (&page_num, &page_id) in &pages {
            if !self.options.pages.includes(page_num) {
                continue;
            }

            match extractor.extract_page_lines(page_id, page_num - 1) {
                Ok(page_lines) => lines.extend(page_lines),
                Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                    log::warn!("Skipping page {}: {}", page_num, e);
                }
                Err(e) => return Err(e),
            }
        }

        log::debug!("Read {} lines from {} pages", lines.len(), total);
        Ok(lines)
    }

    /// Reject explicit selections that name pages past the end.
    fn check_selection(&self, total: u32) -> Result<()> {
        let requested = match &self.options.pages {
            PageSelection::All => return Ok(()),
            PageSelection::Range(range) => *range.start(),
            PageSelection::Pages(pages) => pages.iter().copied().max().unwrap_or(0),
        };
        if requested > total {
            return Err(Error::PageOutOfRange(requested, total));
        }
        Ok(())
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> u32 {
        self.backend.pages().len() as u32
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.backend.is_encrypted()
    }

    /// Get PDF version.
    pub fn version(&self) -> String {
        self.backend.version()
    }

    /// The options this parser was opened with.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }
}

impl LineSource for PdfParser {
    fn lines(&self) -> Result<Vec<TextLine>> {
        self.extract_lines()
    }
}
