//! Outline inference.
//!
//! Statistics, scoring, level assignment, refinement, title detection and
//! final assembly. Everything in this module is a pure function of the
//! input lines.

mod builder;
mod level;
mod options;
mod pipeline;
mod refine;
mod scorer;
mod stats;
mod title;

pub use builder::OutlineBuilder;
pub use level::LevelAssigner;
pub use options::OutlineOptions;
pub use pipeline::OutlinePipeline;
pub use refine::{HierarchyRefiner, RefinePolicy, MAX_RANKED_SIZES};
pub use scorer::{
    HeadingScorer, HeadingVocabulary, DEFAULT_THRESHOLD, HEADING_KEYWORDS, SECTION_NAMES,
};
pub use stats::{key_size, size_key, DocumentStatistics, DEFAULT_BODY_SIZE};
pub use title::{TitleExtractor, TitleOptions};
