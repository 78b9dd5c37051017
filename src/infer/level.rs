//! Provisional, per-line heading levels.

use regex::Regex;

use super::stats::DocumentStatistics;
use crate::model::{HeadingLevel, LevelSource};

const NUMBERED_PREFIX: &str = r"^\d+(?:\.\d+)*\.?\s";

const RATIO_LEVELS: &[(f64, HeadingLevel)] = &[
    (1.6, HeadingLevel::H1),
    (1.4, HeadingLevel::H2),
    (1.2, HeadingLevel::H3),
];

/// Assigns an initial level from numbering depth or font ratio.
#[derive(Debug, Clone)]
pub struct LevelAssigner {
    numbered: Regex,
}

impl LevelAssigner {
    /// Create a level assigner.
    pub fn new() -> Self {
        Self {
            numbered: Regex::new(NUMBERED_PREFIX).unwrap(),
        }
    }

    /// Initial level for a heading's text and font size.
    ///
    /// A numeric prefix decides the level by the number of dots it contains,
    /// a trailing dot included ("2" → H1, "2." and "2.3" → H2, "2.3.1" →
    /// H3, more → H4). Without a prefix the font ratio against body text
    /// decides.
    pub fn assign(
        &self,
        text: &str,
        font_size: f32,
        stats: &DocumentStatistics,
    ) -> (HeadingLevel, LevelSource) {
        if let Some(depth) = self.numbering_depth(text) {
            return (HeadingLevel::from_depth(depth.min(4)), LevelSource::Numbering);
        }

        let ratio = stats.font_ratio(font_size);
        let level = RATIO_LEVELS
            .iter()
            .find(|(min_ratio, _)| ratio >= *min_ratio)
            .map(|(_, level)| *level)
            .unwrap_or(HeadingLevel::H4);
        (level, LevelSource::FontRatio)
    }

    /// Depth of the numeric prefix (dots in the prefix plus one), if any.
    pub fn numbering_depth(&self, text: &str) -> Option<usize> {
        self.numbered
            .find(text.trim_start())
            .map(|prefix| prefix.as_str().matches('.').count() + 1)
    }
}

impl Default for LevelAssigner {
    fn default() -> Self {
        Self::new()
    }
}
