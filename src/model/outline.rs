//! The outline record handed to downstream consumers.

use serde::{Deserialize, Serialize};

use super::HeadingLevel;

/// One heading in the final outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Heading level
    pub level: HeadingLevel,
    /// Cleaned heading text (never empty)
    pub text: String,
    /// Page number (1-based)
    pub page: u32,
}

impl OutlineEntry {
    /// Create a new entry.
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
        }
    }
}

/// Document title plus the page-ordered heading list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentOutline {
    /// Document title (may be empty until a fallback is applied)
    pub title: String,
    /// Headings in reading order
    pub outline: Vec<OutlineEntry>,
}

impl DocumentOutline {
    /// Create an outline record.
    pub fn new(title: impl Into<String>, outline: Vec<OutlineEntry>) -> Self {
        Self {
            title: title.into(),
            outline,
        }
    }

    /// Replace an empty title with `fallback` (usually the file stem).
    pub fn with_fallback_title(mut self, fallback: &str) -> Self {
        if self.title.trim().is_empty() {
            self.title = fallback.to_string();
        }
        self
    }

    /// Number of headings.
    pub fn len(&self) -> usize {
        self.outline.len()
    }

    /// Check if the outline has no headings.
    pub fn is_empty(&self) -> bool {
        self.outline.is_empty()
    }

    /// Highest page number referenced by any heading.
    pub fn max_page(&self) -> Option<u32> {
        self.outline.iter().map(|e| e.page).max()
    }
}
