//! Final ordering and cleanup of headings into the outline record.

use std::cmp::Ordering;

use regex::Regex;

use crate::model::{DocumentOutline, HeadingCandidate, OutlineEntry};

/// Orders, cleans and numbers headings into a [`DocumentOutline`].
#[derive(Debug, Clone)]
pub struct OutlineBuilder {
    whitespace: Regex,
    number_letter: Regex,
}

impl OutlineBuilder {
    /// Create an outline builder.
    pub fn new() -> Self {
        Self {
            whitespace: Regex::new(r"\s+").unwrap(),
            number_letter: Regex::new(r"(\d)\.(\p{L})").unwrap(),
        }
    }

    /// Build the record from refined candidates and a title.
    ///
    /// Candidates are stably sorted by page, then by top edge, so headings on
    /// the same line keep their extraction order. Entries whose text is
    /// empty after cleaning are dropped.
    pub fn build(&self, mut candidates: Vec<HeadingCandidate>, title: &str) -> DocumentOutline {
        candidates.sort_by(|a, b| {
            a.page_index.cmp(&b.page_index).then(
                a.bbox
                    .top
                    .partial_cmp(&b.bbox.top)
                    .unwrap_or(Ordering::Equal),
            )
        });

        let outline = candidates
            .into_iter()
            .filter_map(|candidate| {
                let text = self.clean_text(&candidate.text);
                if text.is_empty() {
                    log::debug!("Dropping heading with no text left: {:?}", candidate.text);
                    return None;
                }
                Some(OutlineEntry::new(
                    candidate.level,
                    text,
                    candidate.page_index + 1,
                ))
            })
            .collect();

        DocumentOutline::new(title.trim(), outline)
    }

    /// Normalize heading text for presentation.
    ///
    /// Collapses whitespace, strips trailing `.` and `:` and separates a
    /// number from a directly following letter ("1.Scope" → "1. Scope").
    pub fn clean_text(&self, text: &str) -> String {
        let collapsed = self.whitespace.replace_all(text.trim(), " ");
        let stripped = collapsed.trim_end_matches(['.', ':']).trim_end();
        self.number_letter
            .replace_all(stripped, "$1. $2")
            .into_owned()
    }
}

impl Default for OutlineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
