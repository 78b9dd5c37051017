//! PDF line reader.

mod backend;
mod layout;
mod options;
mod pdf_parser;

pub use backend::{
    decode_text_simple, ContentOp, LopdfBackend, PageFont, PageId, PdfBackend, PdfValue,
    DEFAULT_PAGE_SIZE,
};
pub use layout::{group_spans_into_lines, merge_spans, LineExtractor, TextSpan};
pub use options::{ErrorMode, PageSelection, ParseOptions};
pub use pdf_parser::PdfParser;
