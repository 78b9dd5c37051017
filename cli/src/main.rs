//! pdf-outline CLI - infer PDF outlines as JSON

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdf_outline::batch::{find_pdf_files, FileStatus};
use pdf_outline::render::{self, JsonFormat, OutlineValidator};
use pdf_outline::{
    BatchOptions, BatchOutcome, BatchProcessor, DocumentStatistics, OutlineOptions, Outliner,
    PageSelection, ParseOptions, PdfParser, RefinePolicy,
};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "pdf-outline")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Infer a title and heading outline from PDF files", long_about = None)]
struct Cli {
    /// Input PDF file (same as `extract FILE`)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Show debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only show errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Infer the outline of one PDF
    Extract {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        #[command(flatten)]
        tuning: Tuning,
    },

    /// Infer outlines for every PDF in a directory
    Batch {
        /// Directory containing PDF files
        #[arg(value_name = "INPUT_DIR", env = "PDF_OUTLINE_INPUT")]
        input: PathBuf,

        /// Directory for the JSON outlines
        #[arg(value_name = "OUTPUT_DIR", env = "PDF_OUTLINE_OUTPUT")]
        output: PathBuf,

        /// Stop at the first failing document
        #[arg(long)]
        fail_fast: bool,

        /// Process one document at a time
        #[arg(long)]
        sequential: bool,

        /// Warn when a document takes longer than this many seconds
        #[arg(long, value_name = "SECS", default_value = "10")]
        time_budget: u64,

        /// Warn when a document has more pages than this
        #[arg(long, value_name = "N", default_value = "50")]
        max_pages: u32,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        tuning: Tuning,
    },

    /// Validate outline JSON files
    Validate {
        /// A JSON file or a directory of JSON files
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Highest accepted page number
        #[arg(long, value_name = "N", default_value = "50")]
        max_pages: u64,

        /// Report outlines without headings
        #[arg(long)]
        require_headings: bool,
    },

    /// Dump the text lines and font statistics of a PDF
    Lines {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        /// Print lines as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

/// Inference tuning shared by `extract` and `batch`.
#[derive(Args, Clone)]
struct Tuning {
    /// How levels from numbering interact with font-size ranking
    #[arg(long, value_name = "POLICY", default_value = "prefer-font-rank")]
    refine_policy: RefinePolicy,

    /// Minimum heading confidence (0.0 - 1.0)
    #[arg(long, value_name = "SCORE", default_value = "0.4")]
    threshold: f32,

    /// Extra heading pattern (regex); may be repeated
    #[arg(long = "pattern", value_name = "REGEX")]
    patterns: Vec<String>,
}

impl Tuning {
    fn outline_options(&self) -> CliResult<OutlineOptions> {
        let mut vocabulary = pdf_outline::HeadingVocabulary::default();
        for pattern in &self.patterns {
            vocabulary = vocabulary.with_pattern(pattern)?;
        }
        Ok(OutlineOptions::new()
            .with_threshold(self.threshold)
            .with_refine_policy(self.refine_policy)
            .with_vocabulary(vocabulary))
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Some(Commands::Extract {
            input,
            output,
            compact,
            pages,
            tuning,
        }) => cmd_extract(&input, output.as_deref(), compact, pages.as_deref(), &tuning).map(|_| 0),
        Some(Commands::Batch {
            input,
            output,
            fail_fast,
            sequential,
            time_budget,
            max_pages,
            compact,
            tuning,
        }) => {
            let options = BatchOptions::new()
                .with_parallel(!sequential)
                .with_time_budget(Duration::from_secs(time_budget))
                .with_max_pages(max_pages)
                .with_format(json_format(compact));
            let options = if fail_fast { options.fail_fast() } else { options };
            cmd_batch(&input, &output, options, &tuning, cli.quiet)
        }
        Some(Commands::Validate {
            path,
            max_pages,
            require_headings,
        }) => cmd_validate(&path, max_pages, require_headings),
        Some(Commands::Lines { input, pages, json }) => {
            cmd_lines(&input, pages.as_deref(), json).map(|_| 0)
        }
        Some(Commands::Version) => {
            cmd_version();
            Ok(0)
        }
        None => {
            if let Some(input) = cli.input {
                let tuning = Tuning {
                    refine_policy: RefinePolicy::default(),
                    threshold: pdf_outline::infer::DEFAULT_THRESHOLD,
                    patterns: Vec::new(),
                };
                cmd_extract(&input, None, false, None, &tuning).map(|_| 0)
            } else {
                println!("{}", "Usage: pdf-outline <FILE>".yellow());
                println!("       pdf-outline --help for more information");
                Ok(0)
            }
        }
    };

    match result {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

fn page_selection(pages: Option<&str>) -> CliResult<PageSelection> {
    Ok(match pages {
        Some(p) => PageSelection::parse(p)?,
        None => PageSelection::All,
    })
}

fn cmd_extract(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    pages: Option<&str>,
    tuning: &Tuning,
) -> CliResult<()> {
    let outline = Outliner::new()
        .lenient()
        .with_pages(page_selection(pages)?)
        .with_outline_options(tuning.outline_options()?)
        .outline(input)?;
    log::debug!("{}: {} headings", input.display(), outline.len());

    let format = json_format(compact);
    match output {
        Some(path) => {
            render::write_json(path, &outline, format)?;
            println!(
                "{} {} ({} headings)",
                "Saved to".green(),
                path.display(),
                outline.len()
            );
        }
        None => println!("{}", render::to_json(&outline, format)?),
    }

    Ok(())
}

fn cmd_batch(
    input: &Path,
    output: &Path,
    options: BatchOptions,
    tuning: &Tuning,
    quiet: bool,
) -> CliResult<i32> {
    let options = options
        .with_outline_options(tuning.outline_options()?)
        .with_parse_options(ParseOptions::new().lenient());
    let processor = BatchProcessor::new(options);

    let inputs = find_pdf_files(input)?;
    if inputs.is_empty() {
        println!(
            "{} {}",
            "No PDF files found in".yellow(),
            input.display()
        );
        return Ok(0);
    }
    log::info!(
        "Writing outlines for {} PDF file(s) to {}",
        inputs.len(),
        output.display()
    );

    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(inputs.len() as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let report = processor.run_files(&inputs, output, |result| {
        if let Some(name) = result.input.file_name() {
            pb.set_message(name.to_string_lossy().to_string());
        }
        pb.inc(1);
    })?;
    pb.finish_and_clear();

    println!("{}", "Batch Summary".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for result in &report.results {
        let name = result.input.display();
        match &result.status {
            FileStatus::Succeeded { output, headings } => println!(
                "{} {} -> {} ({} headings, {:.2}s)",
                "✓".green(),
                name,
                output.display(),
                headings,
                result.elapsed.as_secs_f64()
            ),
            FileStatus::Failed { error } => {
                println!("{} {}: {}", "✗".red(), name, error)
            }
        }
        for warning in &result.warnings {
            println!("    {} {}", "warning:".yellow(), warning);
        }
    }

    println!();
    println!("{}: {}", "Succeeded".bold(), report.succeeded());
    println!("{}: {}", "Failed".bold(), report.failed());
    println!("{}: {}", "Output".bold(), output.display());

    let outcome = report.outcome();
    match outcome {
        BatchOutcome::AllFailed => eprintln!("{}", "All documents failed".red().bold()),
        BatchOutcome::Partial => eprintln!("{}", "Some documents failed".yellow()),
        _ => {}
    }
    Ok(outcome.exit_code())
}

fn cmd_validate(path: &Path, max_pages: u64, require_headings: bool) -> CliResult<i32> {
    let validator = OutlineValidator::new()
        .with_max_page(max_pages)
        .allow_empty_outline(!require_headings);

    let reports = if fs::metadata(path)?.is_dir() {
        validator.validate_dir(path)?
    } else {
        vec![validator.validate_file(path)?]
    };

    let mut invalid = 0;
    for report in &reports {
        if report.is_valid() {
            println!("{} {}", "✓".green(), report.path.display());
        } else {
            invalid += 1;
            log::warn!(
                "{}: {} problem(s)",
                report.path.display(),
                report.problems.len()
            );
            println!("{} {}", "✗".red(), report.path.display());
            for problem in &report.problems {
                println!("    {}", problem);
            }
        }
    }

    println!(
        "\n{}: {}/{} files passed",
        "Validation".bold(),
        reports.len() - invalid,
        reports.len()
    );

    Ok(if invalid == 0 { 0 } else { 1 })
}

fn cmd_lines(input: &Path, pages: Option<&str>, json: bool) -> CliResult<()> {
    let options = ParseOptions::new()
        .lenient()
        .with_pages(page_selection(pages)?);
    let parser = PdfParser::open_with_options(input, options)?;
    let lines = parser.extract_lines()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&lines)?);
        return Ok(());
    }

    let stats = DocumentStatistics::from_lines(&lines);

    println!("{}", "Document Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), parser.version());
    println!("{}: {}", "Pages".bold(), parser.page_count());
    println!("{}: {}", "Lines".bold(), stats.line_count);
    println!("{}: {:.1}", "Body size".bold(), stats.body_text_size);
    println!(
        "{}: {:.1} - {:.1} (avg {:.1})",
        "Font sizes".bold(),
        stats.min_font_size,
        stats.max_font_size,
        stats.average_font_size
    );

    println!();
    println!("{}", "Lines".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for line in &lines {
        let marker = if line.is_emphasized { "B" } else { " " };
        println!(
            "p{:<3} {:>5.1} {} {:>6.1} {}",
            line.page_index + 1,
            line.font_size,
            marker.bold(),
            line.bbox.top,
            line.text
        );
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdf-outline".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF outline inference tool");
    println!();
    println!("License: MIT");
}
