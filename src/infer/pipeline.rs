//! The outline inference pipeline.

use super::builder::OutlineBuilder;
use super::level::LevelAssigner;
use super::options::OutlineOptions;
use super::refine::HierarchyRefiner;
use super::scorer::HeadingScorer;
use super::stats::DocumentStatistics;
use super::title::TitleExtractor;
use crate::model::{DocumentOutline, HeadingCandidate, TextLine};

/// Turns a document's text lines into a title and leveled heading list.
///
/// Running the pipeline is a pure function of its input lines: it performs
/// no I/O and keeps no state between documents, so one pipeline can be
/// shared across threads.
#[derive(Debug, Clone)]
pub struct OutlinePipeline {
    scorer: HeadingScorer,
    assigner: LevelAssigner,
    refiner: HierarchyRefiner,
    title: TitleExtractor,
    builder: OutlineBuilder,
}

impl OutlinePipeline {
    /// Create a pipeline from options.
    pub fn new(options: OutlineOptions) -> Self {
        Self {
            scorer: HeadingScorer::new(options.vocabulary).with_threshold(options.threshold),
            assigner: LevelAssigner::new(),
            refiner: HierarchyRefiner::new(options.refine_policy),
            title: TitleExtractor::new(options.title),
            builder: OutlineBuilder::new(),
        }
    }

    /// Infer the outline of one document.
    ///
    /// The title is empty when the first page has no suitable text; callers
    /// usually follow up with [`DocumentOutline::with_fallback_title`].
    pub fn run(&self, lines: &[TextLine]) -> DocumentOutline {
        let stats = DocumentStatistics::from_lines(lines);
        log::debug!(
            "{} lines on {} pages, body text size {:.1}",
            stats.line_count,
            stats.page_count,
            stats.body_text_size
        );

        let candidates = self.detect(lines, &stats);
        let candidates = self.refiner.refine(candidates);
        let title = self.title.extract(lines);

        self.builder.build(candidates, &title)
    }

    /// Score every line and give accepted lines their initial level.
    pub fn detect(&self, lines: &[TextLine], stats: &DocumentStatistics) -> Vec<HeadingCandidate> {
        let candidates: Vec<HeadingCandidate> = lines
            .iter()
            .filter_map(|line| {
                let confidence = self.scorer.accept(line, stats)?;
                let text = line.trimmed();
                let (level, level_source) = self.assigner.assign(text, line.font_size, stats);
                Some(HeadingCandidate {
                    text: text.to_string(),
                    level,
                    level_source,
                    confidence,
                    page_index: line.page_index,
                    bbox: line.bbox,
                    font_size: line.font_size,
                })
            })
            .collect();

        log::debug!(
            "Accepted {} of {} lines as headings",
            candidates.len(),
            lines.len()
        );
        candidates
    }

    /// The scorer used by this pipeline.
    pub fn scorer(&self) -> &HeadingScorer {
        &self.scorer
    }
}

impl Default for OutlinePipeline {
    fn default() -> Self {
        Self::new(OutlineOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, HeadingLevel};

    fn line(text: &str, size: f32, top: f32, page: u32) -> TextLine {
        TextLine::new(text, size, BBox::new(72.0, top, 500.0, top + size), page)
    }

    fn body(page: u32, count: usize) -> Vec<TextLine> {
        (0..count)
            .map(|i| {
                line(
                    "the quick brown fox jumps over the lazy dog again and again",
                    11.0,
                    300.0 + i as f32 * 14.0,
                    page,
                )
            })
            .collect()
    }

    #[test]
    fn test_empty_document() {
        let outline = OutlinePipeline::default().run(&[]);
        assert_eq!(outline.title, "");
        assert!(outline.outline.is_empty());
    }

    #[test]
    fn test_detect_marks_headings() {
        let mut lines = vec![line("1 Introduction", 18.0, 100.0, 0).emphasized(true)];
        lines.extend(body(0, 10));
        let stats = DocumentStatistics::from_lines(&lines);
        let candidates = OutlinePipeline::default().detect(&lines, &stats);

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].text, "1 Introduction");
        assert_eq!(candidates[0].level, HeadingLevel::H1);
        assert!(candidates[0].confidence >= 0.4);
    }

    #[test]
    fn test_run_builds_ordered_outline() {
        let mut lines = vec![line("Project Handbook 2024", 26.0, 40.0, 0).emphasized(true)];
        lines.extend(body(0, 8));
        lines.push(line("2 Methods", 16.0, 80.0, 1).emphasized(true));
        lines.extend(body(1, 8));
        lines.push(line("1 Introduction", 16.0, 150.0, 0).emphasized(true));

        let outline = OutlinePipeline::default().run(&lines);
        assert_eq!(outline.title, "Project Handbook 2024");

        let texts: Vec<&str> = outline.outline.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["Project Handbook 2024", "1 Introduction", "2 Methods"]
        );
        assert_eq!(outline.outline[0].level, HeadingLevel::H1);
        assert_eq!(outline.outline[1].level, HeadingLevel::H2);
        assert_eq!(outline.outline[2].page, 2);
    }
}
