//! Text line records produced by a document reader.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in top-down page units.
///
/// `top` grows downward from the top edge of the page, so `top <= bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BBox {
    /// Left edge
    pub left: f32,
    /// Top edge
    pub top: f32,
    /// Right edge
    pub right: f32,
    /// Bottom edge
    pub bottom: f32,
}

impl BBox {
    /// Create a bounding box, swapping coordinates given in the wrong order.
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left: left.min(right),
            top: top.min(bottom),
            right: left.max(right),
            bottom: top.max(bottom),
        }
    }

    /// Width of the box.
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Height of the box.
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// One visually merged line of text on one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    /// Line text
    pub text: String,
    /// Font size in points (always positive)
    pub font_size: f32,
    /// Whether the dominant font is bold or otherwise emphasized
    pub is_emphasized: bool,
    /// Font name of the dominant span (informational only)
    pub font_name: String,
    /// Position on the page
    pub bbox: BBox,
    /// Page index (0-based)
    pub page_index: u32,
}

impl TextLine {
    /// Create a plain, non-emphasized line.
    ///
    /// Non-positive or non-finite font sizes are replaced with 1.0 so that
    /// every line satisfies the positive-size invariant.
    pub fn new(text: impl Into<String>, font_size: f32, bbox: BBox, page_index: u32) -> Self {
        let font_size = if font_size.is_finite() && font_size > 0.0 {
            font_size
        } else {
            1.0
        };

        Self {
            text: text.into(),
            font_size,
            is_emphasized: false,
            font_name: String::new(),
            bbox,
            page_index,
        }
    }

    /// Mark the line as emphasized.
    pub fn emphasized(mut self, emphasized: bool) -> Self {
        self.is_emphasized = emphasized;
        self
    }

    /// Set the font name.
    pub fn with_font_name(mut self, name: impl Into<String>) -> Self {
        self.font_name = name.into();
        self
    }

    /// Trimmed text of the line.
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    /// Number of characters in the trimmed text.
    pub fn char_len(&self) -> usize {
        self.trimmed().chars().count()
    }
}
