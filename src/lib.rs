//! # pdf-outline
//!
//! Infers a document outline, a title plus a flat list of leveled headings,
//! from the text and font geometry of a PDF.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdf_outline::{extract_outline, render};
//!
//! fn main() -> pdf_outline::Result<()> {
//!     let outline = extract_outline("document.pdf")?;
//!     println!("{}", render::to_json(&outline, render::JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! ## How it works
//!
//! - **Reading**: page content streams are decoded into merged text lines
//!   with font size, emphasis and position
//! - **Scoring**: each line is scored from font ratio, emphasis, shape
//!   patterns, keywords and layout
//! - **Levels**: numbering depth or font ratio give a first level, then a
//!   document-wide pass ranks the distinct heading sizes
//! - **Title**: the largest text near the top of the first page
//!
//! The inference step ([`OutlinePipeline`]) is a pure function of its input
//! lines and can be fed synthetic lines through [`LineSource`].

pub mod batch;
pub mod detect;
pub mod error;
pub mod infer;
pub mod model;
pub mod parser;
pub mod render;
pub mod source;

// Re-export commonly used types
pub use batch::{BatchOptions, BatchOutcome, BatchProcessor, BatchReport, FileResult, FileStatus};
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_pdf, PdfFormat};
pub use error::{Error, Result};
pub use infer::{
    DocumentStatistics, HeadingScorer, HeadingVocabulary, OutlineOptions, OutlinePipeline,
    RefinePolicy, TitleOptions,
};
pub use model::{
    BBox, DocumentOutline, HeadingCandidate, HeadingLevel, LevelSource, OutlineEntry, TextLine,
};
pub use parser::{ErrorMode, PageSelection, ParseOptions, PdfParser};
pub use render::{JsonFormat, OutlineValidator};
pub use source::LineSource;

use std::io::Read;
use std::path::Path;

/// Extract the outline of a PDF file.
///
/// When no title is found the file name stem is used.
///
/// # Example
///
/// ```no_run
/// use pdf_outline::extract_outline;
///
/// let outline = extract_outline("report.pdf").unwrap();
/// for entry in &outline.outline {
///     println!("{} {} (p. {})", entry.level, entry.text, entry.page);
/// }
/// ```
pub fn extract_outline<P: AsRef<Path>>(path: P) -> Result<DocumentOutline> {
    Outliner::new().outline(path)
}

/// Extract the outline of a PDF file with custom options.
///
/// # Example
///
/// ```no_run
/// use pdf_outline::{extract_outline_with_options, OutlineOptions, ParseOptions};
///
/// let parse = ParseOptions::new().lenient();
/// let outline = OutlineOptions::new().with_threshold(0.5).prefer_numbering();
/// let result = extract_outline_with_options("report.pdf", parse, outline).unwrap();
/// ```
pub fn extract_outline_with_options<P: AsRef<Path>>(
    path: P,
    parse: ParseOptions,
    outline: OutlineOptions,
) -> Result<DocumentOutline> {
    Outliner::new()
        .with_parse_options(parse)
        .with_outline_options(outline)
        .outline(path)
}

/// Extract the outline of a PDF held in memory.
///
/// No title fallback is applied, since there is no file name.
pub fn outline_from_bytes(data: &[u8]) -> Result<DocumentOutline> {
    Outliner::new().outline_bytes(data)
}

/// Extract the outline of a PDF read from a reader.
pub fn outline_from_reader<R: Read>(reader: R) -> Result<DocumentOutline> {
    let parser = PdfParser::from_reader(reader)?;
    outline_from_source(&parser)
}

/// Infer the outline of already extracted lines with default options.
pub fn outline_from_lines(lines: &[TextLine]) -> DocumentOutline {
    OutlinePipeline::default().run(lines)
}

/// Infer the outline of any [`LineSource`] with default options.
pub fn outline_from_source<S: LineSource + ?Sized>(source: &S) -> Result<DocumentOutline> {
    Ok(outline_from_lines(&source.lines()?))
}

/// Read the text lines of a PDF file.
pub fn extract_lines<P: AsRef<Path>>(path: P) -> Result<Vec<TextLine>> {
    PdfParser::open(path)?.extract_lines()
}

/// Builder for reading PDFs and inferring their outline.
///
/// # Example
///
/// ```no_run
/// use pdf_outline::{Outliner, PageSelection, RefinePolicy};
///
/// let outline = Outliner::new()
///     .lenient()
///     .with_pages(PageSelection::Range(1..=20))
///     .with_refine_policy(RefinePolicy::PreferNumbering)
///     .outline("document.pdf")?;
/// # Ok::<(), pdf_outline::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Outliner {
    parse_options: ParseOptions,
    outline_options: OutlineOptions,
}

impl Outliner {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable lenient reading (skip unreadable pages).
    pub fn lenient(mut self) -> Self {
        self.parse_options = self.parse_options.lenient();
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.parse_options = self.parse_options.with_pages(pages);
        self
    }

    /// Set reader options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    /// Set inference options.
    pub fn with_outline_options(mut self, options: OutlineOptions) -> Self {
        self.outline_options = options;
        self
    }

    /// Set the heading acceptance threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.outline_options = self.outline_options.with_threshold(threshold);
        self
    }

    /// Set the refinement policy.
    pub fn with_refine_policy(mut self, policy: RefinePolicy) -> Self {
        self.outline_options = self.outline_options.with_refine_policy(policy);
        self
    }

    /// Set the scoring vocabulary.
    pub fn with_vocabulary(mut self, vocabulary: HeadingVocabulary) -> Self {
        self.outline_options = self.outline_options.with_vocabulary(vocabulary);
        self
    }

    /// Set title detection options.
    pub fn with_title_options(mut self, title: TitleOptions) -> Self {
        self.outline_options = self.outline_options.with_title_options(title);
        self
    }

    /// Build the pipeline these options describe.
    pub fn pipeline(&self) -> OutlinePipeline {
        OutlinePipeline::new(self.outline_options.clone())
    }

    /// Outline a PDF file; an empty title falls back to the file stem.
    pub fn outline<P: AsRef<Path>>(&self, path: P) -> Result<DocumentOutline> {
        let path = path.as_ref();
        let parser = PdfParser::open_with_options(path, self.parse_options.clone())?;
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        Ok(self
            .pipeline()
            .run(&parser.extract_lines()?)
            .with_fallback_title(&stem))
    }

    /// Outline a PDF held in memory.
    pub fn outline_bytes(&self, data: &[u8]) -> Result<DocumentOutline> {
        let parser = PdfParser::from_bytes_with_options(data, self.parse_options.clone())?;
        Ok(self.pipeline().run(&parser.extract_lines()?))
    }

    /// Outline already extracted lines.
    pub fn outline_lines(&self, lines: &[TextLine]) -> DocumentOutline {
        self.pipeline().run(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outliner_builder() {
        let outliner = Outliner::new()
            .lenient()
            .with_threshold(0.55)
            .with_refine_policy(RefinePolicy::PreferNumbering)
            .with_pages(PageSelection::Range(1..=5));

        assert_eq!(outliner.parse_options.error_mode, ErrorMode::Lenient);
        assert_eq!(outliner.parse_options.pages, PageSelection::Range(1..=5));
        assert!((outliner.outline_options.threshold - 0.55).abs() < f32::EPSILON);
        assert_eq!(
            outliner.outline_options.refine_policy,
            RefinePolicy::PreferNumbering
        );
    }

    #[test]
    fn test_outline_bytes_rejects_garbage() {
        assert!(outline_from_bytes(b"").is_err());
        assert!(outline_from_bytes(b"%PDF").is_err());
        assert!(matches!(
            outline_from_bytes(b"<!DOCTYPE html><html></html>"),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_outline_from_lines_empty() {
        let outline = outline_from_lines(&[]);
        assert_eq!(outline, DocumentOutline::default());
    }

    #[test]
    fn test_outline_from_source() {
        let lines = vec![
            TextLine::new("Design Notes Volume", 24.0, BBox::new(72.0, 50.0, 400.0, 74.0), 0),
            TextLine::new(
                "plain body text line with several words",
                11.0,
                BBox::new(72.0, 300.0, 500.0, 311.0),
                0,
            ),
        ];
        let outline = outline_from_source(&lines).unwrap();
        assert_eq!(outline.title, "Design Notes Volume");
    }

    #[test]
    fn test_missing_file() {
        let result = extract_outline("definitely/not/here.pdf");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
