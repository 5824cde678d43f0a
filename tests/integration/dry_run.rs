//! Dry-run behavior: full preview, zero mutation, stable across runs.

use crate::common::{base_config, save_pdf, tree_snapshot};

use pdfbates::convert::NoConversion;
use pdfbates::output::OutputFormatter;
use pdfbates::pipeline::Pipeline;

use pdfbates::config::PipelineConfig;
use tempfile::TempDir;

fn run(config: &PipelineConfig) -> pdfbates::PipelineResult {
    let gateway = NoConversion;
    let out = OutputFormatter::quiet();
    Pipeline::new(config, &gateway, &out).run().unwrap()
}

#[test]
fn test_dry_run_leaves_tree_untouched() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    save_pdf(&root.join("alpha.pdf"), 1);
    save_pdf(&root.join("sub").join("beta.pdf"), 2);
    std::fs::write(root.join("clip.mp4"), b"video").unwrap();

    let before = tree_snapshot(root);

    let config = PipelineConfig {
        dry_run: true,
        backup: true,
        rename_folders: true,
        combine_final: true,
        ..base_config(root)
    };
    let result = run(&config);

    assert_eq!(tree_snapshot(root), before, "dry run must not mutate");
    assert_eq!(result.total_items, 3);
    assert_eq!(result.total_pages, 4);
    assert!(result.errors.is_empty());
}

#[test]
fn test_dry_run_plans_in_traversal_order() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    save_pdf(&root.join("f10.pdf"), 1);
    save_pdf(&root.join("f2.pdf"), 1);
    save_pdf(&root.join("f1.pdf"), 2);

    let config = PipelineConfig {
        dry_run: true,
        ..base_config(root)
    };
    let result = run(&config);

    let destinations: Vec<&str> = result
        .rename_log
        .iter()
        .map(|(_, dst)| dst.rsplit('/').next().unwrap())
        .collect();

    // Natural order: f1, f2, f10; ranges contiguous across them.
    assert_eq!(
        destinations,
        vec!["CF 0001-0002.pdf", "CF 0003.pdf", "CF 0004.pdf"]
    );
}

#[test]
fn test_dry_run_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    save_pdf(&root.join("a.pdf"), 1);
    save_pdf(&root.join("docs").join("b.pdf"), 3);

    let config = PipelineConfig {
        dry_run: true,
        rename_folders: true,
        combine_final: true,
        ..base_config(root)
    };

    let first = serde_json::to_string(&run(&config)).unwrap();
    let second = serde_json::to_string(&run(&config)).unwrap();

    assert_eq!(first, second, "identical tree must produce identical preview");
}

#[test]
fn test_dry_run_previews_word_conversion_without_converting() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    std::fs::write(root.join("memo.docx"), b"word bytes").unwrap();

    let config = PipelineConfig {
        dry_run: true,
        ..base_config(root)
    };
    let result = run(&config);

    // The conversion is in the log, but nothing was produced on disk.
    assert!(result
        .rename_log
        .iter()
        .any(|(src, dst)| src.ends_with("memo.docx") && dst.ends_with("memo.pdf")));
    assert!(!root.join("memo.pdf").exists());
    assert_eq!(result.total_items, 1);
}
