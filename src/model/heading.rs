//! Heading levels and heading candidates.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::BBox;

/// Heading level in the outline hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    /// Top level
    H1,
    /// Second level
    H2,
    /// Third level
    H3,
    /// Fourth level
    H4,
    /// Fifth level
    H5,
    /// Sixth level
    H6,
}

impl HeadingLevel {
    /// Build a level from a 1-based depth, clamped to H1..H6.
    pub fn from_depth(depth: usize) -> Self {
        match depth {
            0 | 1 => HeadingLevel::H1,
            2 => HeadingLevel::H2,
            3 => HeadingLevel::H3,
            4 => HeadingLevel::H4,
            5 => HeadingLevel::H5,
            _ => HeadingLevel::H6,
        }
    }

    /// 1-based depth of the level.
    pub fn depth(self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
            HeadingLevel::H4 => 4,
            HeadingLevel::H5 => 5,
            HeadingLevel::H6 => 6,
        }
    }

    /// Tag used in the output record ("H1".."H6").
    pub fn as_str(self) -> &'static str {
        match self {
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
            HeadingLevel::H4 => "H4",
            HeadingLevel::H5 => "H5",
            HeadingLevel::H6 => "H6",
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a candidate's current level came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelSource {
    /// Depth of an explicit numeric prefix such as "2.3"
    Numbering,
    /// Font size relative to body text
    FontRatio,
    /// Rank of the font size among all accepted headings
    FontRank,
}

/// A text line judged likely to be a heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingCandidate {
    /// Trimmed heading text
    pub text: String,
    /// Current level
    pub level: HeadingLevel,
    /// How `level` was derived
    pub level_source: LevelSource,
    /// Heading confidence in [0, 1]
    pub confidence: f32,
    /// Page index (0-based)
    pub page_index: u32,
    /// Position on the page
    pub bbox: BBox,
    /// Font size of the source line
    pub font_size: f32,
}

impl HeadingCandidate {
    /// Return a copy of this candidate at a different level.
    pub fn with_level(self, level: HeadingLevel, source: LevelSource) -> Self {
        Self {
            level,
            level_source: source,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_depth() {
        assert_eq!(HeadingLevel::from_depth(0), HeadingLevel::H1);
        assert_eq!(HeadingLevel::from_depth(1), HeadingLevel::H1);
        assert_eq!(HeadingLevel::from_depth(4), HeadingLevel::H4);
        assert_eq!(HeadingLevel::from_depth(9), HeadingLevel::H6);
        assert_eq!(HeadingLevel::H3.depth(), 3);
    }

    #[test]
    fn test_level_serializes_as_tag() {
        let json = serde_json::to_string(&HeadingLevel::H2).unwrap();
        assert_eq!(json, "\"H2\"");
        assert_eq!(HeadingLevel::H5.to_string(), "H5");
    }
}
