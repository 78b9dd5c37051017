//! Document-wide font statistics.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::TextLine;

/// Font size assumed for body text when a document has no lines.
pub const DEFAULT_BODY_SIZE: f32 = 12.0;

/// Histogram key for a font size: the size rounded to 0.1 pt, in tenths.
pub fn size_key(size: f32) -> i32 {
    (size * 10.0).round() as i32
}

/// Font size for a histogram key.
pub fn key_size(key: i32) -> f32 {
    key as f32 / 10.0
}

/// Read-only summary of the font sizes used in one document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentStatistics {
    /// Mean of all line font sizes
    pub average_font_size: f32,
    /// Largest line font size
    pub max_font_size: f32,
    /// Smallest line font size
    pub min_font_size: f32,
    /// Occurrences per rounded font size, keyed by [`size_key`]
    pub font_size_histogram: BTreeMap<i32, usize>,
    /// Most frequent rounded font size (body text)
    pub body_text_size: f32,
    /// Number of lines observed
    pub line_count: usize,
    /// Number of distinct pages observed
    pub page_count: usize,
}

impl Default for DocumentStatistics {
    fn default() -> Self {
        Self {
            average_font_size: DEFAULT_BODY_SIZE,
            max_font_size: DEFAULT_BODY_SIZE,
            min_font_size: DEFAULT_BODY_SIZE,
            font_size_histogram: BTreeMap::new(),
            body_text_size: DEFAULT_BODY_SIZE,
            line_count: 0,
            page_count: 0,
        }
    }
}

impl DocumentStatistics {
    /// Compute statistics over every line of a document.
    pub fn from_lines(lines: &[TextLine]) -> Self {
        if lines.is_empty() {
            return Self::default();
        }

        let mut histogram: BTreeMap<i32, usize> = BTreeMap::new();
        let mut pages = BTreeSet::new();
        let mut sum = 0.0f64;
        let mut max = f32::MIN;
        let mut min = f32::MAX;

        for line in lines {
            *histogram.entry(size_key(line.font_size)).or_insert(0) += 1;
            pages.insert(line.page_index);
            sum += line.font_size as f64;
            max = max.max(line.font_size);
            min = min.min(line.font_size);
        }

        // Highest count wins; among equal counts the larger size wins.
        let body_key = histogram
            .iter()
            .max_by_key(|(key, count)| (**count, **key))
            .map(|(key, _)| *key);

        Self {
            average_font_size: (sum / lines.len() as f64) as f32,
            max_font_size: max,
            min_font_size: min,
            body_text_size: body_key.map(key_size).unwrap_or(DEFAULT_BODY_SIZE),
            font_size_histogram: histogram,
            line_count: lines.len(),
            page_count: pages.len(),
        }
    }

    /// Ratio of a font size to the body text size.
    ///
    /// Both sizes are compared at the histogram's 0.1 pt granularity, so
    /// 14.4 on a 12 pt body is exactly 1.2.
    pub fn font_ratio(&self, font_size: f32) -> f64 {
        let body = size_key(self.body_text_size);
        if body <= 0 {
            return font_size as f64 / self.body_text_size as f64;
        }
        size_key(font_size) as f64 / body as f64
    }

    /// Histogram entries as (font size, count), smallest size first.
    pub fn histogram(&self) -> impl Iterator<Item = (f32, usize)> + '_ {
        self.font_size_histogram
            .iter()
            .map(|(key, count)| (key_size(*key), *count))
    }

    /// Check whether the statistics were computed over no lines.
    pub fn is_empty(&self) -> bool {
        self.line_count == 0
    }
}
