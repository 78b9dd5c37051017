//! Document-global refinement of heading levels.

use std::collections::{BTreeSet, HashMap};
use std::str::FromStr;

use super::stats::size_key;
use crate::model::{HeadingCandidate, HeadingLevel, LevelSource};

/// Maximum number of distinct font sizes that receive a rank level.
pub const MAX_RANKED_SIZES: usize = 4;

/// How refinement treats levels that came from explicit numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefinePolicy {
    /// Font-size rank overrides every level whose size is ranked
    #[default]
    PreferFontRank,
    /// Levels derived from a numeric prefix are kept
    ///
    /// Numbered headings still take part in ranking, so their sizes use up
    /// rank slots and push un-numbered headings down.
    PreferNumbering,
}

impl RefinePolicy {
    /// Name used on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            RefinePolicy::PreferFontRank => "prefer-font-rank",
            RefinePolicy::PreferNumbering => "prefer-numbering",
        }
    }
}

impl FromStr for RefinePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prefer-font-rank" | "font-rank" | "font" => Ok(RefinePolicy::PreferFontRank),
            "prefer-numbering" | "numbering" => Ok(RefinePolicy::PreferNumbering),
            other => Err(format!("unknown refine policy: {}", other)),
        }
    }
}

/// Re-derives levels from the distinct font sizes among accepted headings.
#[derive(Debug, Clone, Copy, Default)]
pub struct HierarchyRefiner {
    policy: RefinePolicy,
}

impl HierarchyRefiner {
    /// Create a refiner with the given policy.
    pub fn new(policy: RefinePolicy) -> Self {
        Self { policy }
    }

    /// The policy in use.
    pub fn policy(&self) -> RefinePolicy {
        self.policy
    }

    /// Map each of the (up to four) largest distinct sizes to H1..H4.
    ///
    /// Sizes are compared at 0.1 pt granularity, the same rounding the
    /// document histogram uses.
    pub fn rank_sizes(candidates: &[HeadingCandidate]) -> HashMap<i32, HeadingLevel> {
        let distinct: BTreeSet<i32> = candidates.iter().map(|c| size_key(c.font_size)).collect();

        distinct
            .into_iter()
            .rev()
            .take(MAX_RANKED_SIZES)
            .enumerate()
            .map(|(rank, key)| (key, HeadingLevel::from_depth(rank + 1)))
            .collect()
    }

    /// Rewrite candidate levels by font-size rank.
    ///
    /// Fewer than two candidates are returned unchanged. Candidates whose
    /// size falls outside the ranked sizes keep their level.
    pub fn refine(&self, candidates: Vec<HeadingCandidate>) -> Vec<HeadingCandidate> {
        if candidates.len() < 2 {
            return candidates;
        }

        let ranks = Self::rank_sizes(&candidates);
        log::debug!(
            "Refining {} headings over {} ranked font sizes",
            candidates.len(),
            ranks.len()
        );

        candidates
            .into_iter()
            .map(|candidate| {
                if self.policy == RefinePolicy::PreferNumbering
                    && candidate.level_source == LevelSource::Numbering
                {
                    return candidate;
                }
                match ranks.get(&size_key(candidate.font_size)) {
                    Some(level) => candidate.with_level(*level, LevelSource::FontRank),
                    None => candidate,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BBox;

    fn candidate(text: &str, size: f32, level: HeadingLevel, source: LevelSource) -> HeadingCandidate {
        HeadingCandidate {
            text: text.to_string(),
            level,
            level_source: source,
            confidence: 0.5,
            page_index: 0,
            bbox: BBox::default(),
            font_size: size,
        }
    }

    #[test]
    fn test_single_candidate_unchanged() {
        let input = vec![candidate("Only", 30.0, HeadingLevel::H3, LevelSource::FontRatio)];
        let output = HierarchyRefiner::default().refine(input.clone());
        assert_eq!(output, input);
    }

    #[test]
    fn test_levels_follow_size_rank() {
        let input = vec![
            candidate("A", 14.0, HeadingLevel::H4, LevelSource::FontRatio),
            candidate("B", 24.0, HeadingLevel::H2, LevelSource::FontRatio),
            candidate("C", 18.0, HeadingLevel::H1, LevelSource::FontRatio),
            candidate("D", 24.0, HeadingLevel::H3, LevelSource::FontRatio),
        ];
        let output = HierarchyRefiner::default().refine(input);
        let levels: Vec<HeadingLevel> = output.iter().map(|c| c.level).collect();
        assert_eq!(
            levels,
            vec![HeadingLevel::H3, HeadingLevel::H1, HeadingLevel::H2, HeadingLevel::H1]
        );
        assert!(output.iter().all(|c| c.level_source == LevelSource::FontRank));
        // order is preserved
        assert_eq!(output[0].text, "A");
        assert_eq!(output[3].text, "D");
    }

    #[test]
    fn test_sizes_beyond_top_four_keep_level() {
        let input = vec![
            candidate("s30", 30.0, HeadingLevel::H4, LevelSource::FontRatio),
            candidate("s26", 26.0, HeadingLevel::H4, LevelSource::FontRatio),
            candidate("s22", 22.0, HeadingLevel::H4, LevelSource::FontRatio),
            candidate("s18", 18.0, HeadingLevel::H4, LevelSource::FontRatio),
            candidate("s14", 14.0, HeadingLevel::H3, LevelSource::FontRatio),
        ];
        let output = HierarchyRefiner::default().refine(input);
        assert_eq!(output[0].level, HeadingLevel::H1);
        assert_eq!(output[3].level, HeadingLevel::H4);
        assert_eq!(output[4].level, HeadingLevel::H3);
        assert_eq!(output[4].level_source, LevelSource::FontRatio);
    }

    #[test]
    fn test_near_equal_sizes_share_level() {
        let input = vec![
            candidate("a", 16.02, HeadingLevel::H2, LevelSource::FontRatio),
            candidate("b", 15.98, HeadingLevel::H3, LevelSource::FontRatio),
            candidate("c", 12.0, HeadingLevel::H4, LevelSource::FontRatio),
        ];
        let output = HierarchyRefiner::default().refine(input);
        assert_eq!(output[0].level, output[1].level);
        assert_eq!(output[2].level, HeadingLevel::H2);
    }

    #[test]
    fn test_prefer_font_rank_overrides_numbering() {
        let input = vec![
            candidate("1.1 Scope", 24.0, HeadingLevel::H2, LevelSource::Numbering),
            candidate("Body heading", 14.0, HeadingLevel::H4, LevelSource::FontRatio),
        ];
        let output = HierarchyRefiner::new(RefinePolicy::PreferFontRank).refine(input);
        assert_eq!(output[0].level, HeadingLevel::H1);
    }

    #[test]
    fn test_prefer_numbering_keeps_numbered_levels() {
        let input = vec![
            candidate("1.1 Scope", 24.0, HeadingLevel::H2, LevelSource::Numbering),
            candidate("Body heading", 14.0, HeadingLevel::H4, LevelSource::FontRatio),
        ];
        let output = HierarchyRefiner::new(RefinePolicy::PreferNumbering).refine(input);
        assert_eq!(output[0].level, HeadingLevel::H2);
        assert_eq!(output[0].level_source, LevelSource::Numbering);
        assert_eq!(output[1].level, HeadingLevel::H2);
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(
            "prefer-numbering".parse::<RefinePolicy>().unwrap(),
            RefinePolicy::PreferNumbering
        );
        assert_eq!(
            "Prefer-Font-Rank".parse::<RefinePolicy>().unwrap(),
            RefinePolicy::PreferFontRank
        );
        assert!("sideways".parse::<RefinePolicy>().is_err());
        assert_eq!(RefinePolicy::default().as_str(), "prefer-font-rank");
    }
}
