//! Multi-signal heading confidence scoring.
//!
//! Each line gets five independent signals that are summed and capped at
//! 1.0:
//!
//! | Signal              | Weight |
//! |---------------------|--------|
//! | Font ratio tier     | 0.35   |
//! | Emphasis            | 0.25   |
//! | Structural pattern  | 0.25   |
//! | Keyword             | 0.10   |
//! | Shape (length, `:`, margin) | 0.03 + 0.02 + 0.02 |

use regex::Regex;

use super::stats::DocumentStatistics;
use crate::error::{Error, Result};
use crate::model::TextLine;

/// Default acceptance threshold; biased toward recall.
pub const DEFAULT_THRESHOLD: f32 = 0.4;

/// Section names matched literally (case-insensitive) at the start of a line.
pub const SECTION_NAMES: &[&str] = &[
    "Chapter",
    "Section",
    "Part",
    "Appendix",
    "Table",
    "Figure",
    "Introduction",
    "Conclusion",
    "Summary",
    "Background",
    "Overview",
    "References",
    "Bibliography",
];

/// Structural nouns matched as case-insensitive substrings.
pub const HEADING_KEYWORDS: &[&str] = &[
    "introduction",
    "background",
    "overview",
    "summary",
    "conclusion",
    "references",
    "bibliography",
    "appendix",
    "table",
    "figure",
    "chapter",
    "section",
    "part",
    "acknowledgements",
    "acknowledgments",
    "abstract",
    "methodology",
    "results",
    "discussion",
    "future work",
    "contents",
    "revision",
    "history",
    "requirements",
    "specifications",
];

/// Shape patterns checked before the section-name pattern.
const STRUCTURAL_PATTERNS: &[&str] = &[
    // 1 Intro, 1.2. Scope, 3.1.4 Limits
    r"^\d+(\.\d+)*\.?\s+[A-Z]",
    // II. Method
    r"^[IVX]+\.?\s+[A-Z]",
    // B. Design
    r"^[A-Z]\.?\s+[A-Z]",
    // ALL CAPS
    r"^[A-Z][A-Z\s]{2,}$",
    // Title Case Words
    r"^[A-Z][a-z]+(\s[A-Z][a-z]+)*:?\s*$",
];

const FONT_RATIO_TIERS: &[(f64, f32)] = &[(1.4, 0.35), (1.2, 0.25), (1.1, 0.15)];
const EMPHASIS_WEIGHT: f32 = 0.25;
const PATTERN_WEIGHT: f32 = 0.25;
const KEYWORD_WEIGHT: f32 = 0.10;
const LENGTH_WEIGHT: f32 = 0.03;
const COLON_WEIGHT: f32 = 0.02;
const MARGIN_WEIGHT: f32 = 0.02;
const MARGIN_LIMIT: f32 = 100.0;

/// Immutable pattern and keyword lists used by the scorer.
#[derive(Debug, Clone)]
pub struct HeadingVocabulary {
    patterns: Vec<Regex>,
    keywords: Vec<String>,
}

impl HeadingVocabulary {
    /// Build a vocabulary from section names and keywords.
    ///
    /// The structural shape patterns are always included; `section_names`
    /// become one anchored, case-insensitive alternation.
    pub fn new(section_names: &[&str], keywords: &[&str]) -> Self {
        let mut patterns: Vec<Regex> = STRUCTURAL_PATTERNS
            .iter()
            .map(|p| Regex::new(p).unwrap())
            .collect();

        if !section_names.is_empty() {
            let alternation = section_names
                .iter()
                .map(|name| regex::escape(name))
                .collect::<Vec<_>>()
                .join("|");
            patterns.push(Regex::new(&format!(r"(?i)^({})\b", alternation)).unwrap());
        }

        Self {
            patterns,
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// Register an additional structural pattern, checked after the others.
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| Error::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        self.patterns.push(regex);
        Ok(self)
    }

    /// Register an additional keyword.
    pub fn with_keyword(mut self, keyword: &str) -> Self {
        self.keywords.push(keyword.to_lowercase());
        self
    }

    /// Check whether the text matches any structural pattern.
    pub fn matches_pattern(&self, text: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(text))
    }

    /// Check whether the text contains any keyword.
    pub fn contains_keyword(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.keywords.iter().any(|k| lower.contains(k.as_str()))
    }

    /// Number of patterns (shape patterns, section names, custom).
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }
}

impl Default for HeadingVocabulary {
    fn default() -> Self {
        Self::new(SECTION_NAMES, HEADING_KEYWORDS)
    }
}

/// Scores text lines as heading candidates.
#[derive(Debug, Clone)]
pub struct HeadingScorer {
    vocabulary: HeadingVocabulary,
    threshold: f32,
}

impl HeadingScorer {
    /// Create a scorer with the given vocabulary and the default threshold.
    pub fn new(vocabulary: HeadingVocabulary) -> Self {
        Self {
            vocabulary,
            threshold: DEFAULT_THRESHOLD,
        }
    }

    /// Set the acceptance threshold (clamped to [0, 1]).
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// The acceptance threshold.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// The vocabulary in use.
    pub fn vocabulary(&self) -> &HeadingVocabulary {
        &self.vocabulary
    }

    /// Score a line in [0, 1].
    ///
    /// Lines whose trimmed text is shorter than two characters score 0.
    pub fn score(&self, line: &TextLine, stats: &DocumentStatistics) -> f32 {
        let text = line.trimmed();
        let len = text.chars().count();
        if len < 2 {
            return 0.0;
        }

        let mut score = font_ratio_score(stats.font_ratio(line.font_size));

        if line.is_emphasized {
            score += EMPHASIS_WEIGHT;
        }

        if self.vocabulary.matches_pattern(text) {
            score += PATTERN_WEIGHT;
        }

        if self.vocabulary.contains_keyword(text) {
            score += KEYWORD_WEIGHT;
        }

        if (3..=100).contains(&len) {
            score += LENGTH_WEIGHT;
        }
        if text.ends_with(':') {
            score += COLON_WEIGHT;
        }
        if line.bbox.left < MARGIN_LIMIT {
            score += MARGIN_WEIGHT;
        }

        score.min(1.0)
    }

    /// Score a line and report whether it clears the threshold.
    pub fn accept(&self, line: &TextLine, stats: &DocumentStatistics) -> Option<f32> {
        let score = self.score(line, stats);
        (score > 0.0 && score >= self.threshold).then_some(score)
    }
}

impl Default for HeadingScorer {
    fn default() -> Self {
        Self::new(HeadingVocabulary::default())
    }
}

fn font_ratio_score(ratio: f64) -> f32 {
    FONT_RATIO_TIERS
        .iter()
        .find(|(min_ratio, _)| ratio >= *min_ratio)
        .map(|(_, weight)| *weight)
        .unwrap_or(0.0)
}
