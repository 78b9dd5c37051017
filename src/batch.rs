//! Batch processing of a directory of PDFs.
//!
//! Every `*.pdf` file in the input directory becomes `<stem>.json` in the
//! output directory. Documents are independent: each one is read, outlined,
//! written and checked on its own, optionally in parallel.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::detect::{has_pdf_extension, validate_pdf_file};
use crate::error::{Error, Result};
use crate::infer::{OutlineOptions, OutlinePipeline};
use crate::model::DocumentOutline;
use crate::parser::{ParseOptions, PdfParser};
use crate::render::{write_json, JsonFormat, OutlineValidator, DEFAULT_MAX_PAGE};

/// Advisory per-document processing time.
pub const DEFAULT_TIME_BUDGET: Duration = Duration::from_secs(10);

/// Options for a batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Outline inference options
    pub outline: OutlineOptions,

    /// Reader options
    pub parse: ParseOptions,

    /// Keep going after a document fails
    pub continue_on_error: bool,

    /// Process documents in parallel
    pub parallel: bool,

    /// Warn when a document takes longer than this
    pub time_budget: Duration,

    /// Warn when a document has more pages than this
    pub max_pages: u32,

    /// Output JSON format
    pub format: JsonFormat,
}

impl BatchOptions {
    /// Create new batch options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set outline inference options.
    pub fn with_outline_options(mut self, outline: OutlineOptions) -> Self {
        self.outline = outline;
        self
    }

    /// Set reader options.
    pub fn with_parse_options(mut self, parse: ParseOptions) -> Self {
        self.parse = parse;
        self
    }

    /// Stop at the first failing document.
    pub fn fail_fast(mut self) -> Self {
        self.continue_on_error = false;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Process one document at a time.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set the advisory time budget per document.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = budget;
        self
    }

    /// Set the page ceiling.
    pub fn with_max_pages(mut self, pages: u32) -> Self {
        self.max_pages = pages;
        self
    }

    /// Set the output JSON format.
    pub fn with_format(mut self, format: JsonFormat) -> Self {
        self.format = format;
        self
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            outline: OutlineOptions::default(),
            parse: ParseOptions::default(),
            continue_on_error: true,
            parallel: true,
            time_budget: DEFAULT_TIME_BUDGET,
            max_pages: DEFAULT_MAX_PAGE as u32,
            format: JsonFormat::Pretty,
        }
    }
}

/// Outcome of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    /// The outline was written
    Succeeded {
        /// Written JSON file
        output: PathBuf,
        /// Number of headings in the outline
        headings: usize,
    },
    /// The document could not be processed
    Failed {
        /// Error message
        error: String,
    },
}

/// Result of processing one document.
#[derive(Debug, Clone)]
pub struct FileResult {
    /// Input PDF
    pub input: PathBuf,
    /// What happened
    pub status: FileStatus,
    /// Time spent on the document
    pub elapsed: Duration,
    /// Non-fatal problems (page ceiling, time budget, output validation)
    pub warnings: Vec<String>,
}

impl FileResult {
    /// Check if the document was processed.
    pub fn is_success(&self) -> bool {
        matches!(self.status, FileStatus::Succeeded { .. })
    }
}

/// Overall result of a batch run, mapped to process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    /// No input documents were found
    Empty,
    /// Every document succeeded
    AllSucceeded,
    /// Some documents failed
    Partial,
    /// Every document failed
    AllFailed,
}

impl BatchOutcome {
    /// Process exit code: 0 success, 1 total failure, 2 partial success.
    pub fn exit_code(self) -> i32 {
        match self {
            BatchOutcome::Empty | BatchOutcome::AllSucceeded => 0,
            BatchOutcome::AllFailed => 1,
            BatchOutcome::Partial => 2,
        }
    }
}

/// Per-document results of a batch run, in input order.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// One result per input document
    pub results: Vec<FileResult>,
}

impl BatchReport {
    /// Number of documents processed.
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Number of documents that succeeded.
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    /// Number of documents that failed.
    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    /// Total warnings across documents.
    pub fn warning_count(&self) -> usize {
        self.results.iter().map(|r| r.warnings.len()).sum()
    }

    /// Summarize the run.
    pub fn outcome(&self) -> BatchOutcome {
        match (self.succeeded(), self.failed()) {
            (0, 0) => BatchOutcome::Empty,
            (_, 0) => BatchOutcome::AllSucceeded,
            (0, _) => BatchOutcome::AllFailed,
            _ => BatchOutcome::Partial,
        }
    }
}

/// Output file name for an input PDF: `<stem>.json`.
pub fn output_filename(input: &Path) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    format!("{}.json", stem)
}

/// List the PDF files of a directory, sorted by path.
pub fn find_pdf_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::InvalidInput(format!(
            "input directory does not exist: {}",
            dir.display()
        )));
    }

    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && has_pdf_extension(p))
        .collect();
    files.sort();
    Ok(files)
}

/// Outline a single PDF file, applying the file-stem title fallback.
pub fn outline_file(
    path: &Path,
    pipeline: &OutlinePipeline,
    parse: &ParseOptions,
) -> Result<(DocumentOutline, u32)> {
    validate_pdf_file(path)?;

    let parser = PdfParser::open_with_options(path, parse.clone())?;
    let lines = parser.extract_lines()?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let outline = pipeline.run(&lines).with_fallback_title(&stem);
    Ok((outline, parser.page_count()))
}

/// Runs the outline pipeline over every PDF in a directory.
pub struct BatchProcessor {
    options: BatchOptions,
    pipeline: OutlinePipeline,
    validator: OutlineValidator,
}

impl BatchProcessor {
    /// Create a processor.
    pub fn new(options: BatchOptions) -> Self {
        let pipeline = OutlinePipeline::new(options.outline.clone());
        let validator = OutlineValidator::new().with_max_page(options.max_pages as u64);
        Self {
            options,
            pipeline,
            validator,
        }
    }

    /// The options in use.
    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// Process every PDF in `input_dir`, writing into `output_dir`.
    pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_dir: P,
        output_dir: Q,
    ) -> Result<BatchReport> {
        self.run_with_progress(input_dir, output_dir, |_| {})
    }

    /// Like [`run`](Self::run), calling `progress` after each document.
    pub fn run_with_progress<P, Q, F>(
        &self,
        input_dir: P,
        output_dir: Q,
        progress: F,
    ) -> Result<BatchReport>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
        F: Fn(&FileResult) + Sync,
    {
        let inputs = find_pdf_files(input_dir)?;
        self.run_files(&inputs, output_dir, progress)
    }

    /// Process an explicit list of PDFs.
    pub fn run_files<Q, F>(&self, inputs: &[PathBuf], output_dir: Q, progress: F) -> Result<BatchReport>
    where
        Q: AsRef<Path>,
        F: Fn(&FileResult) + Sync,
    {
        let output_dir = output_dir.as_ref();
        fs::create_dir_all(output_dir)?;

        if inputs.is_empty() {
            log::warn!("No PDF files to process");
            return Ok(BatchReport::default());
        }
        log::info!("Found {} PDF file(s) to process", inputs.len());

        let process = |input: &PathBuf| -> Result<FileResult> {
            let result = self.process_file(input, output_dir);
            progress(&result);
            match &result.status {
                FileStatus::Failed { error } if !self.options.continue_on_error => {
                    Err(Error::Other(format!("{}: {}", input.display(), error)))
                }
                _ => Ok(result),
            }
        };

        let results = if self.options.parallel {
            inputs.par_iter().map(process).collect::<Result<Vec<_>>>()?
        } else {
            inputs.iter().map(process).collect::<Result<Vec<_>>>()?
        };

        let report = BatchReport { results };
        log::info!(
            "Batch finished: {} succeeded, {} failed",
            report.succeeded(),
            report.failed()
        );
        Ok(report)
    }

    /// Process one document; failures are captured in the result.
    pub fn process_file(&self, input: &Path, output_dir: &Path) -> FileResult {
        let start = Instant::now();
        let mut warnings = Vec::new();

        let status = match self.write_outline(input, output_dir, &mut warnings) {
            Ok((output, headings)) => FileStatus::Succeeded { output, headings },
            Err(e) => {
                log::error!("Error processing {}: {}", input.display(), e);
                FileStatus::Failed {
                    error: e.to_string(),
                }
            }
        };

        let elapsed = start.elapsed();
        if elapsed > self.options.time_budget {
            let warning = format!(
                "processing took {:.2}s, over the {:.0}s budget",
                elapsed.as_secs_f64(),
                self.options.time_budget.as_secs_f64()
            );
            log::warn!("{}: {}", input.display(), warning);
            warnings.push(warning);
        }

        FileResult {
            input: input.to_path_buf(),
            status,
            elapsed,
            warnings,
        }
    }

    fn write_outline(
        &self,
        input: &Path,
        output_dir: &Path,
        warnings: &mut Vec<String>,
    ) -> Result<(PathBuf, usize)> {
        let (outline, page_count) = outline_file(input, &self.pipeline, &self.options.parse)?;

        if page_count > self.options.max_pages {
            let warning = format!(
                "document has {} pages, over the {}-page limit",
                page_count, self.options.max_pages
            );
            log::warn!("{}: {}", input.display(), warning);
            warnings.push(warning);
        }

        let output = output_dir.join(output_filename(input));
        write_json(&output, &outline, self.options.format)?;

        let report = self.validator.validate_file(&output)?;
        for problem in report.problems {
            log::warn!("{}: output validation: {}", input.display(), problem);
            warnings.push(problem);
        }

        log::info!(
            "Processed {} -> {} ({} headings)",
            input.display(),
            output.display(),
            outline.len()
        );
        Ok((output, outline.len()))
    }
}
