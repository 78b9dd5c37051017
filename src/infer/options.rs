//! Outline inference options.

use super::refine::RefinePolicy;
use super::scorer::{HeadingVocabulary, DEFAULT_THRESHOLD};
use super::title::TitleOptions;

/// Options for inferring an outline from text lines.
#[derive(Debug, Clone)]
pub struct OutlineOptions {
    /// Minimum confidence for a line to become a heading
    pub threshold: f32,

    /// Patterns and keywords used for scoring
    pub vocabulary: HeadingVocabulary,

    /// How refinement treats numbered headings
    pub refine_policy: RefinePolicy,

    /// Title detection tuning
    pub title: TitleOptions,
}

impl OutlineOptions {
    /// Create new outline options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the acceptance threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set the scoring vocabulary.
    pub fn with_vocabulary(mut self, vocabulary: HeadingVocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    /// Set the refinement policy.
    pub fn with_refine_policy(mut self, policy: RefinePolicy) -> Self {
        self.refine_policy = policy;
        self
    }

    /// Keep levels derived from explicit numbering during refinement.
    pub fn prefer_numbering(mut self) -> Self {
        self.refine_policy = RefinePolicy::PreferNumbering;
        self
    }

    /// Set title detection options.
    pub fn with_title_options(mut self, title: TitleOptions) -> Self {
        self.title = title;
        self
    }
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            vocabulary: HeadingVocabulary::default(),
            refine_policy: RefinePolicy::default(),
            title: TitleOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_options_builder() {
        let options = OutlineOptions::new()
            .with_threshold(0.6)
            .prefer_numbering()
            .with_title_options(TitleOptions::new().with_region_limit(150.0));

        assert!((options.threshold - 0.6).abs() < f32::EPSILON);
        assert_eq!(options.refine_policy, RefinePolicy::PreferNumbering);
        assert_eq!(options.title.region_limit, 150.0);
    }

    #[test]
    fn test_default_options() {
        let options = OutlineOptions::default();
        assert!((options.threshold - 0.4).abs() < f32::EPSILON);
        assert_eq!(options.refine_policy, RefinePolicy::PreferFontRank);
        assert_eq!(options.title, TitleOptions::default());
    }
}
