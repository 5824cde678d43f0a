//! Folder range rollup/renaming and final assembly.

use crate::common::{base_config, save_pdf};

use pdfbates::config::PipelineConfig;
use pdfbates::convert::NoConversion;
use pdfbates::io::PdfReader;
use pdfbates::output::OutputFormatter;
use pdfbates::pipeline::Pipeline;

use tempfile::TempDir;

fn run(config: &PipelineConfig) -> pdfbates::PipelineResult {
    let gateway = NoConversion;
    let out = OutputFormatter::quiet();
    Pipeline::new(config, &gateway, &out).run().unwrap()
}

#[test]
fn test_folders_renamed_with_aggregated_range() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    save_pdf(&root.join("docs").join("x.pdf"), 1);
    save_pdf(&root.join("docs").join("y.pdf"), 2);

    let config = PipelineConfig {
        rename_folders: true,
        keep_folder_name: true,
        ..base_config(root)
    };
    let result = run(&config);

    let renamed = root.join("CF 0001-0003 - docs");
    assert!(renamed.is_dir(), "folder not renamed");
    assert!(renamed.join("CF 0001.pdf").exists());
    assert!(renamed.join("CF 0002-0003.pdf").exists());
    assert!(result
        .rename_log
        .iter()
        .any(|(src, dst)| src.ends_with("docs") && dst.ends_with("CF 0001-0003 - docs")));
}

#[test]
fn test_folder_rename_without_original_name() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    save_pdf(&root.join("docs").join("x.pdf"), 2);

    let config = PipelineConfig {
        rename_folders: true,
        keep_folder_name: false,
        ..base_config(root)
    };
    run(&config);

    assert!(root.join("CF 0001-0002").is_dir());
}

#[test]
fn test_combined_pdf_covers_full_range_in_label_order() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    save_pdf(&root.join("a.pdf"), 1);
    save_pdf(&root.join("sub").join("b.pdf"), 2);

    let config = PipelineConfig {
        combine_final: true,
        ..base_config(root)
    };
    let result = run(&config);

    let combined = root.join("CF 0001- CF 0003.pdf");
    assert!(combined.exists(), "combined output missing");
    assert_eq!(PdfReader::new().page_count(&combined).unwrap(), 3);
    assert!(result
        .rename_log
        .iter()
        .any(|(tag, path)| tag == "COMBINED" && path.ends_with("CF 0001- CF 0003.pdf")));
}

#[test]
fn test_combine_with_folder_renames_still_finds_files() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    save_pdf(&root.join("docs").join("x.pdf"), 1);
    save_pdf(&root.join("zeta.pdf"), 1);

    let config = PipelineConfig {
        rename_folders: true,
        combine_final: true,
        ..base_config(root)
    };
    run(&config);

    let combined = root.join("CF 0001- CF 0002.pdf");
    assert!(combined.exists());
    assert_eq!(PdfReader::new().page_count(&combined).unwrap(), 2);
}
