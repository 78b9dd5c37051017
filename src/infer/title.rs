//! Document title detection from the first page.

use std::cmp::Ordering;

use crate::model::TextLine;

/// Tuning for title detection.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleOptions {
    /// Only lines whose top edge lies above this offset are considered
    pub region_limit: f32,
    /// Lines must have more than this many characters
    pub min_chars: usize,
    /// Lines at least this fraction of the largest size are joined
    pub size_ratio: f32,
    /// Maximum number of lines joined into the title
    pub max_parts: usize,
}

impl Default for TitleOptions {
    fn default() -> Self {
        Self {
            region_limit: 200.0,
            min_chars: 5,
            size_ratio: 0.9,
            max_parts: 3,
        }
    }
}

impl TitleOptions {
    /// Create title options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the vertical region limit.
    pub fn with_region_limit(mut self, limit: f32) -> Self {
        self.region_limit = limit;
        self
    }

    /// Set the maximum number of joined lines.
    pub fn with_max_parts(mut self, parts: usize) -> Self {
        self.max_parts = parts.max(1);
        self
    }
}

/// Picks the largest, topmost text on the first page as the title.
#[derive(Debug, Clone, Default)]
pub struct TitleExtractor {
    options: TitleOptions,
}

impl TitleExtractor {
    /// Create a title extractor.
    pub fn new(options: TitleOptions) -> Self {
        Self { options }
    }

    /// Extract a title from a document's lines; only page 0 is inspected.
    ///
    /// Returns an empty string when nothing qualifies.
    pub fn extract(&self, lines: &[TextLine]) -> String {
        let mut candidates: Vec<&TextLine> = lines
            .iter()
            .filter(|l| l.page_index == 0)
            .filter(|l| l.bbox.top < self.options.region_limit)
            .filter(|l| l.char_len() > self.options.min_chars)
            .collect();

        if candidates.is_empty() {
            return String::new();
        }

        // Largest first, topmost among equal sizes; stable for ties.
        candidates.sort_by(|a, b| {
            b.font_size
                .partial_cmp(&a.font_size)
                .unwrap_or(Ordering::Equal)
                .then(a.bbox.top.partial_cmp(&b.bbox.top).unwrap_or(Ordering::Equal))
        });

        let min_size = candidates[0].font_size * self.options.size_ratio;

        candidates
            .iter()
            .filter(|l| l.font_size >= min_size)
            .take(self.options.max_parts)
            .map(|l| l.trimmed())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
