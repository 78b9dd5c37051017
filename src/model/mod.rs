//! Value types flowing through the outline pipeline.
//!
//! Lines, candidates and entries are plain records held in ordered `Vec`s;
//! they reference each other only by position, page and order.

mod heading;
mod line;
mod outline;

pub use heading::{HeadingCandidate, HeadingLevel, LevelSource};
pub use line::{BBox, TextLine};
pub use outline::{DocumentOutline, OutlineEntry};
