//! Integration tests for directory batch processing.

mod common;

use std::fs;

use common::report_pdf;
use pdf_outline::batch::{find_pdf_files, output_filename};
use pdf_outline::render::from_json;
use pdf_outline::{BatchOptions, BatchOutcome, BatchProcessor, FileStatus, OutlineValidator};

#[test]
fn test_batch_all_succeeded() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    fs::write(input.path().join("report.pdf"), report_pdf()).unwrap();
    fs::write(input.path().join("copy.PDF"), report_pdf()).unwrap();
    fs::write(input.path().join("notes.txt"), "not a pdf").unwrap();

    let processor = BatchProcessor::new(BatchOptions::new());
    let report = processor.run(input.path(), output.path()).unwrap();

    assert_eq!(report.total(), 2);
    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.outcome(), BatchOutcome::AllSucceeded);
    assert_eq!(report.outcome().exit_code(), 0);
    assert_eq!(report.warning_count(), 0);

    let written = output.path().join("report.json");
    let outline = from_json(&fs::read_to_string(&written).unwrap()).unwrap();
    assert_eq!(outline.title, "Annual Design Report");
    assert_eq!(outline.len(), 3);
    assert!(output.path().join("copy.json").is_file());

    let reports = OutlineValidator::new().validate_dir(output.path()).unwrap();
    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(|r| r.is_valid()));
}

#[test]
fn test_batch_partial_failure() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    fs::write(input.path().join("a_good.pdf"), report_pdf()).unwrap();
    fs::write(input.path().join("b_broken.pdf"), b"%PDF-1.4\ntruncated").unwrap();

    let processor = BatchProcessor::new(BatchOptions::new().sequential());
    let progress = std::sync::atomic::AtomicUsize::new(0);
    let report = processor
        .run_with_progress(input.path(), output.path(), |_| {
            progress.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        })
        .unwrap();

    assert_eq!(progress.into_inner(), 2);
    assert_eq!(report.outcome(), BatchOutcome::Partial);
    assert_eq!(report.outcome().exit_code(), 2);

    // Results follow input order
    assert!(report.results[0].input.ends_with("a_good.pdf"));
    assert!(matches!(
        report.results[0].status,
        FileStatus::Succeeded { headings: 3, .. }
    ));
    assert!(matches!(report.results[1].status, FileStatus::Failed { .. }));
    assert!(!output.path().join("b_broken.json").exists());
}

#[test]
fn test_batch_all_failed_and_fail_fast() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    fs::write(input.path().join("broken.pdf"), b"<html></html>").unwrap();

    let report = BatchProcessor::new(BatchOptions::new())
        .run(input.path(), output.path())
        .unwrap();
    assert_eq!(report.outcome(), BatchOutcome::AllFailed);
    assert_eq!(report.outcome().exit_code(), 1);

    let fail_fast = BatchProcessor::new(BatchOptions::new().fail_fast().sequential());
    assert!(fail_fast.run(input.path(), output.path()).is_err());
}

#[test]
fn test_batch_empty_and_missing_dirs() {
    let input = tempfile::tempdir().unwrap();
    let output = input.path().join("nested").join("out");

    let report = BatchProcessor::new(BatchOptions::new())
        .run(input.path(), &output)
        .unwrap();
    assert_eq!(report.outcome(), BatchOutcome::Empty);
    assert_eq!(report.outcome().exit_code(), 0);
    assert!(output.is_dir());

    let missing = input.path().join("missing");
    assert!(BatchProcessor::new(BatchOptions::new())
        .run(&missing, &output)
        .is_err());
}

#[test]
fn test_page_ceiling_warning() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    fs::write(input.path().join("report.pdf"), report_pdf()).unwrap();

    let processor = BatchProcessor::new(BatchOptions::new().with_max_pages(1));
    let report = processor.run(input.path(), output.path()).unwrap();

    assert_eq!(report.outcome(), BatchOutcome::AllSucceeded);
    // Over the page limit, and page 2 is out of range for the validator
    assert!(report.warning_count() >= 2);
}

#[test]
fn test_file_helpers() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("b.pdf"), b"").unwrap();
    fs::write(dir.path().join("a.pdf"), b"").unwrap();
    fs::write(dir.path().join("c.json"), b"").unwrap();

    let files = find_pdf_files(dir.path()).unwrap();
    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["a.pdf", "b.pdf"]);

    assert_eq!(output_filename(&dir.path().join("file03.pdf")), "file03.json");
}
