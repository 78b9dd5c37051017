//! Text line extraction from page content streams.
//!
//! Spans are collected with their baseline position and font, grouped into
//! visual lines by baseline proximity, and merged into [`TextLine`] records
//! in top-down page coordinates.

use std::cmp::Ordering;
use std::collections::HashMap;

use unicode_normalization::UnicodeNormalization;

use super::backend::{ContentOp, PageId, PdfBackend, PdfValue};
use crate::error::Result;
use crate::model::{BBox, TextLine};

/// Font size assumed before the first `Tf` operator.
const DEFAULT_FONT_SIZE: f32 = 12.0;

/// Spans whose baselines differ by at most this fraction of the font size
/// belong to the same line.
const BASELINE_TOLERANCE: f32 = 0.3;

/// TJ adjustments beyond this (thousandths of a text unit) read as a space.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// A run of text drawn with one font at one position.
#[derive(Debug, Clone)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline, bottom-up PDF space)
    pub y: f32,
    /// Estimated advance width of the text
    pub width: f32,
    /// Effective font size in points
    pub font_size: f32,
    /// Font name (e.g., "Helvetica-Bold")
    pub font_name: String,
    /// Whether the font name suggests a bold weight
    pub is_bold: bool,
}

impl TextSpan {
    /// Create a new text span; width is estimated from the character count.
    pub fn new(text: String, x: f32, y: f32, font_size: f32, font_name: String) -> Self {
        let lower = font_name.to_lowercase();
        let is_bold = lower.contains("bold") || lower.contains("black") || lower.contains("heavy");
        let width = text.chars().count() as f32 * font_size * 0.5;

        Self {
            text,
            x,
            y,
            width,
            font_size,
            font_name,
            is_bold,
        }
    }

    /// Top of the span (approximate ascender), bottom-up.
    pub fn top(&self) -> f32 {
        self.y + self.font_size * 0.8
    }

    /// Bottom of the span (approximate descender), bottom-up.
    pub fn bottom(&self) -> f32 {
        self.y - self.font_size * 0.2
    }

    /// Right edge of the span.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Extracts text lines from the pages of a [`PdfBackend`].
pub struct LineExtractor<'a, B: PdfBackend + ?Sized> {
    backend: &'a B,
}

impl<'a, B: PdfBackend + ?Sized> LineExtractor<'a, B> {
    /// Create an extractor over a backend.
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Extract the merged lines of one page, in reading order.
    ///
    /// `page_index` is the 0-based index recorded on every line.
    pub fn extract_page_lines(&self, page_id: PageId, page_index: u32) -> Result<Vec<TextLine>> {
        let (_, page_height) = self.backend.page_size(page_id);
        let spans = self.extract_page_spans(page_id)?;
        let span_count = spans.len();

        let lines: Vec<TextLine> = group_spans_into_lines(spans)
            .into_iter()
            .filter_map(|spans| merge_spans(spans, page_height, page_index))
            .collect();

        log::debug!(
            "Page {}: {} spans merged into {} lines",
            page_index + 1,
            span_count,
            lines.len()
        );
        Ok(lines)
    }

    /// Extract raw text spans from one page.
    pub fn extract_page_spans(&self, page_id: PageId) -> Result<Vec<TextSpan>> {
        let fonts: HashMap<Vec<u8>, String> = self
            .backend
            .page_fonts(page_id)?
            .into_iter()
            .map(|f| (f.resource, f.base_font))
            .collect();

        let content = self.backend.page_content(page_id)?;
        let ops = self.backend.decode_content(&content)?;
        Ok(self.collect_spans(page_id, &ops, &fonts))
    }

    fn collect_spans(
        &self,
        page_id: PageId,
        ops: &[ContentOp],
        fonts: &HashMap<Vec<u8>, String>,
    ) -> Vec<TextSpan> {
        let mut spans = Vec::new();
        let mut font_resource: Vec<u8> = Vec::new();
        let mut font_name = String::new();
        let mut font_size = DEFAULT_FONT_SIZE;
        let mut matrix = TextMatrix::default();
        let mut in_text = false;

        for op in ops {
            match op.operator.as_str() {
                "BT" => {
                    in_text = true;
                    matrix.reset();
                }
                "ET" => in_text = false,
                "Tf" => {
                    if let Some(PdfValue::Name(name)) = op.operands.first() {
                        font_resource = name.clone();
                        font_name = fonts
                            .get(name)
                            .cloned()
                            .unwrap_or_else(|| String::from_utf8_lossy(name).to_string());
                    }
                    font_size = op.number(1, DEFAULT_FONT_SIZE).abs();
                }
                "TL" => matrix.leading = op.number(0, matrix.leading),
                "Td" => matrix.translate(op.number(0, 0.0), op.number(1, 0.0)),
                "TD" => {
                    let ty = op.number(1, 0.0);
                    matrix.leading = -ty;
                    matrix.translate(op.number(0, 0.0), ty);
                }
                "Tm" => matrix.set(
                    op.number(0, 1.0),
                    op.number(1, 0.0),
                    op.number(2, 0.0),
                    op.number(3, 1.0),
                    op.number(4, 0.0),
                    op.number(5, 0.0),
                ),
                "T*" => matrix.next_line(),
                "Tj" | "TJ" | "'" | "\"" => {
                    if matches!(op.operator.as_str(), "'" | "\"") {
                        matrix.next_line();
                    }
                    if !in_text {
                        continue;
                    }

                    let text = self.show_text(page_id, &font_resource, op);
                    if !text.trim().is_empty() {
                        let (x, y) = matrix.position();
                        spans.push(TextSpan::new(
                            text,
                            x,
                            y,
                            font_size * matrix.scale(),
                            font_name.clone(),
                        ));
                    }
                }
                _ => {}
            }
        }

        spans
    }

    /// Decode the string operands of a text-showing operator.
    fn show_text(&self, page_id: PageId, font: &[u8], op: &ContentOp) -> String {
        let decode = |bytes: &[u8]| self.backend.decode_text(page_id, font, bytes);

        match op.operator.as_str() {
            "TJ" => {
                let Some(PdfValue::Array(items)) = op.operands.first() else {
                    return String::new();
                };
                let mut combined = String::new();
                for item in items {
                    match item {
                        PdfValue::Str(bytes) => combined.push_str(&decode(bytes)),
                        other => {
                            // Large negative adjustments move right: a word gap.
                            let adjustment = -other.as_number().unwrap_or(0.0);
                            if adjustment > TJ_SPACE_THRESHOLD && needs_space_after(&combined) {
                                combined.push(' ');
                            }
                        }
                    }
                }
                combined
            }
            "\"" => match op.operands.get(2) {
                Some(PdfValue::Str(bytes)) => decode(bytes),
                _ => String::new(),
            },
            _ => match op.operands.first() {
                Some(PdfValue::Str(bytes)) => decode(bytes),
                _ => String::new(),
            },
        }
    }
}

/// Group spans into lines by baseline, top of the page first.
///
/// Within a line spans are ordered left to right.
pub fn group_spans_into_lines(mut spans: Vec<TextSpan>) -> Vec<Vec<TextSpan>> {
    spans.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal))
    });

    let mut lines: Vec<Vec<TextSpan>> = Vec::new();
    let mut current: Vec<TextSpan> = Vec::new();
    let mut current_y: Option<f32> = None;

    for span in spans {
        let tolerance = span.font_size * BASELINE_TOLERANCE;
        match current_y {
            Some(y) if (span.y - y).abs() <= tolerance => current.push(span),
            _ => {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                current_y = Some(span.y);
                current.push(span);
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    for line in &mut lines {
        line.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal));
    }
    lines
}

/// Merge the spans of one visual line into a [`TextLine`].
///
/// The line takes the font of its largest span. Returns `None` when the
/// merged text is blank.
pub fn merge_spans(spans: Vec<TextSpan>, page_height: f32, page_index: u32) -> Option<TextLine> {
    let text: String = join_span_text(&spans).nfc().collect();
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    // First of the largest spans wins.
    let dominant = spans.iter().fold(None::<&TextSpan>, |best, span| match best {
        Some(b) if b.font_size >= span.font_size => Some(b),
        _ => Some(span),
    })?;

    let left = spans.iter().map(|s| s.x).fold(f32::INFINITY, f32::min);
    let right = spans.iter().map(|s| s.right()).fold(f32::NEG_INFINITY, f32::max);
    let top = spans.iter().map(|s| s.top()).fold(f32::NEG_INFINITY, f32::max);
    let bottom = spans.iter().map(|s| s.bottom()).fold(f32::INFINITY, f32::min);

    let bbox = BBox::new(left, page_height - top, right, page_height - bottom);

    Some(
        TextLine::new(text, dominant.font_size, bbox, page_index)
            .emphasized(dominant.is_bold)
            .with_font_name(dominant.font_name.clone()),
    )
}

/// Join span texts, inserting a space where the horizontal gap between two
/// spans is wider than a fraction of a character.
fn join_span_text(spans: &[TextSpan]) -> String {
    let mut result = String::new();

    for (i, span) in spans.iter().enumerate() {
        if i > 0 {
            let prev = &spans[i - 1];
            let gap = span.x - prev.right();
            let char_count = span.text.chars().count().max(1);
            let avg_char_width = span.width / char_count as f32;

            let spaceless = matches!(
                (prev.text.chars().last(), span.text.chars().next()),
                (Some(a), Some(b)) if is_spaceless_script_char(a) && is_spaceless_script_char(b)
            );
            let has_space = prev.text.ends_with([' ', '\u{00A0}'])
                || span.text.starts_with([' ', '\u{00A0}']);

            if gap > avg_char_width * 0.2 && !spaceless && !has_space {
                result.push(' ');
            }
        }
        result.push_str(&span.text);
    }

    result
}

fn needs_space_after(text: &str) -> bool {
    match text.chars().last() {
        Some(c) => c != ' ' && c != '\u{00A0}' && !is_spaceless_script_char(c),
        None => false,
    }
}

/// Text matrix state for tracking position in a content stream.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
    // Start of the current line, for Td/T* which are relative to it.
    line_e: f32,
    line_f: f32,
    leading: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            line_e: 0.0,
            line_f: 0.0,
            leading: DEFAULT_FONT_SIZE,
        }
    }
}

impl TextMatrix {
    fn reset(&mut self) {
        *self = Self {
            leading: self.leading,
            ..Self::default()
        };
    }

    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
        self.line_e = e;
        self.line_f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.line_e += tx * self.a + ty * self.c;
        self.line_f += tx * self.b + ty * self.d;
        self.e = self.line_e;
        self.f = self.line_f;
    }

    fn next_line(&mut self) {
        self.translate(0.0, -self.leading);
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    /// Vertical scale applied to the font size.
    fn scale(&self) -> f32 {
        let scale = (self.c * self.c + self.d * self.d).sqrt();
        if scale > 0.0 {
            scale
        } else {
            1.0
        }
    }
}

/// Check if a character is from a script that doesn't use word spaces.
///
/// Chinese and Japanese don't use spaces between words; Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and extensions
    (0x4E00..=0x9FFF).contains(&code)
        || (0x3400..=0x4DBF).contains(&code)
        || (0x20000..=0x2EBEF).contains(&code)
        // Hiragana, Katakana
        || (0x3040..=0x30FF).contains(&code)
        // CJK Symbols and Punctuation
        || (0x3000..=0x303F).contains(&code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, x: f32, y: f32, size: f32, font: &str) -> TextSpan {
        TextSpan::new(text.to_string(), x, y, size, font.to_string())
    }

    #[test]
    fn test_text_span_bold_detection() {
        assert!(span("T", 0.0, 0.0, 12.0, "Helvetica-Bold").is_bold);
        assert!(span("T", 0.0, 0.0, 12.0, "Arial-Black").is_bold);
        assert!(!span("T", 0.0, 0.0, 12.0, "Helvetica-Oblique").is_bold);
    }

    #[test]
    fn test_group_spans_by_baseline() {
        let spans = vec![
            span("body", 72.0, 600.0, 10.0, "Helvetica"),
            span("world", 140.0, 701.0, 12.0, "Helvetica"),
            span("Hello", 72.0, 700.0, 12.0, "Helvetica"),
        ];
        let lines = group_spans_into_lines(spans);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0][0].text, "Hello");
        assert_eq!(lines[0][1].text, "world");
        assert_eq!(lines[1][0].text, "body");
    }

    #[test]
    fn test_merge_spans_uses_largest_font() {
        let spans = vec![
            span("2.3", 72.0, 700.0, 10.0, "Helvetica"),
            span("Methodology", 100.0, 700.0, 14.0, "Helvetica-Bold"),
        ];
        let line = merge_spans(spans, 792.0, 3).unwrap();

        assert_eq!(line.text, "2.3 Methodology");
        assert_eq!(line.font_size, 14.0);
        assert!(line.is_emphasized);
        assert_eq!(line.font_name, "Helvetica-Bold");
        assert_eq!(line.page_index, 3);
        assert_eq!(line.bbox.left, 72.0);
        // top-down: 792 - (700 + 14 * 0.8)
        assert!((line.bbox.top - 80.8).abs() < 1e-3);
        assert!(line.bbox.top <= line.bbox.bottom);
    }

    #[test]
    fn test_merge_blank_spans() {
        let spans = vec![span("  ", 72.0, 700.0, 10.0, "Helvetica")];
        assert!(merge_spans(spans, 792.0, 0).is_none());
    }

    #[test]
    fn test_merge_normalizes_to_nfc() {
        // "e" followed by a combining acute accent
        let spans = vec![span("Re\u{301}sume\u{301}", 72.0, 700.0, 12.0, "Times")];
        let line = merge_spans(spans, 792.0, 0).unwrap();
        assert_eq!(line.text, "Résumé");
    }

    #[test]
    fn test_join_no_space_between_cjk() {
        let spans = vec![
            span("概要", 72.0, 700.0, 12.0, "Mincho"),
            span("説明", 120.0, 700.0, 12.0, "Mincho"),
        ];
        assert_eq!(join_span_text(&spans), "概要説明");
    }

    #[test]
    fn test_text_matrix_moves() {
        let mut m = TextMatrix::default();
        m.set(1.0, 0.0, 0.0, 1.0, 72.0, 720.0);
        m.translate(0.0, -14.0);
        assert_eq!(m.position(), (72.0, 706.0));

        m.leading = 20.0;
        m.next_line();
        assert_eq!(m.position(), (72.0, 686.0));

        m.set(2.0, 0.0, 0.0, 2.0, 0.0, 0.0);
        assert_eq!(m.scale(), 2.0);
    }
}
