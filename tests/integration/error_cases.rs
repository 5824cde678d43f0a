//! Fatal and per-item error behavior through the full pipeline.

use crate::common::{base_config, save_pdf, tree_snapshot};

use pdfbates::config::PipelineConfig;
use pdfbates::convert::NoConversion;
use pdfbates::error::BatesError;
use pdfbates::output::OutputFormatter;
use pdfbates::pipeline::Pipeline;

use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_blocked_extensions_abort_before_any_rename() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    save_pdf(&root.join("fine.pdf"), 1);
    std::fs::write(root.join("legacy.doc"), b"old word").unwrap();
    std::fs::write(root.join("mail.eml"), b"mail").unwrap();

    let before = tree_snapshot(root);

    let config = base_config(root);
    let gateway = NoConversion;
    let out = OutputFormatter::quiet();
    let err = Pipeline::new(&config, &gateway, &out).run().unwrap_err();

    assert!(err.is_fatal());
    match err {
        BatesError::BlockedFiles { files } => {
            assert_eq!(files.len(), 2);
        }
        other => panic!("expected BlockedFiles, got: {other:?}"),
    }

    // Zero files touched: eager check runs before planning.
    assert_eq!(tree_snapshot(root), before);
}

#[test]
fn test_invalid_root_is_fatal() {
    let config = PipelineConfig {
        root: PathBuf::from("/no/such/tree"),
        ..Default::default()
    };
    let gateway = NoConversion;
    let out = OutputFormatter::quiet();
    let err = Pipeline::new(&config, &gateway, &out).run().unwrap_err();

    assert!(matches!(err, BatesError::InvalidRoot { .. }));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_empty_tree_reports_not_aborts() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    std::fs::write(root.join("notes.txt"), b"invisible to the core").unwrap();

    let config = base_config(root);
    let gateway = NoConversion;
    let out = OutputFormatter::quiet();
    let result = Pipeline::new(&config, &gateway, &out).run().unwrap();

    assert_eq!(result.total_items, 0);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("no eligible files"));
}

#[test]
fn test_unreadable_pdf_skipped_run_continues() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    std::fs::write(root.join("a-broken.pdf"), b"garbage bytes").unwrap();
    save_pdf(&root.join("b-good.pdf"), 1);

    let config = base_config(root);
    let gateway = NoConversion;
    let out = OutputFormatter::quiet();
    let result = Pipeline::new(&config, &gateway, &out).run().unwrap();

    // The broken file is dropped and logged (at planning and again as a
    // stamp-phase skip); the good one gets CF 0001.
    assert_eq!(result.total_items, 1);
    assert!(!result.skipped.is_empty());
    assert!(result.skipped.iter().all(|s| s.contains("a-broken")));
    assert!(!result.errors.is_empty());
    assert!(root.join("CF 0001.pdf").exists());
    assert!(root.join("a-broken.pdf").exists(), "skipped file untouched");
}
