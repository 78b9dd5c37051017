//! Sources of text line records.

use crate::error::Result;
use crate::model::TextLine;

/// Anything that can produce the text lines of one document.
///
/// The PDF reader implements this, and so do plain collections of lines,
/// which lets the pipeline run on synthetic input.
pub trait LineSource {
    /// Produce every line of the document, page by page.
    fn lines(&self) -> Result<Vec<TextLine>>;
}

impl LineSource for [TextLine] {
    fn lines(&self) -> Result<Vec<TextLine>> {
        Ok(self.to_vec())
    }
}

impl LineSource for Vec<TextLine> {
    fn lines(&self) -> Result<Vec<TextLine>> {
        Ok(self.clone())
    }
}

impl<T: LineSource + ?Sized> LineSource for &T {
    fn lines(&self) -> Result<Vec<TextLine>> {
        (**self).lines()
    }
}
