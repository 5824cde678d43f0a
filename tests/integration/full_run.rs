//! Apply-mode runs: rename, backup, reformat, stamp.

use crate::common::{base_config, file_names, save_pdf};

use pdfbates::config::{PipelineConfig, BACKUP_DIR_NAME};
use pdfbates::convert::NoConversion;
use pdfbates::io::PdfReader;
use pdfbates::output::OutputFormatter;
use pdfbates::pipeline::Pipeline;

use std::path::Path;
use tempfile::TempDir;

fn run(config: &PipelineConfig) -> pdfbates::PipelineResult {
    let gateway = NoConversion;
    let out = OutputFormatter::quiet();
    Pipeline::new(config, &gateway, &out).run().unwrap()
}

fn page_content(path: &Path, page_index: usize) -> String {
    let doc = PdfReader::new().load(path).unwrap();
    let pages: Vec<_> = doc.get_pages().into_values().collect();
    String::from_utf8_lossy(&doc.get_page_content(pages[page_index]).unwrap()).into_owned()
}

#[test]
fn test_rename_and_stamp_across_directories() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    save_pdf(&root.join("alpha.pdf"), 1);
    save_pdf(&root.join("sub").join("beta.pdf"), 2);

    let config = base_config(root);
    let result = run(&config);

    assert_eq!(result.total_items, 2);
    assert_eq!(result.total_pages, 3);
    assert!(result.errors.is_empty(), "errors: {:?}", result.errors);

    let renamed_root = root.join("CF 0001.pdf");
    let renamed_sub = root.join("sub").join("CF 0002-0003.pdf");
    assert!(renamed_root.exists());
    assert!(renamed_sub.exists());
    assert!(!root.join("alpha.pdf").exists());

    // Each page carries its own number, right where the label grammar says.
    assert!(page_content(&renamed_root, 0).contains("(CF 0001) Tj"));
    assert!(page_content(&renamed_sub, 0).contains("(CF 0002) Tj"));
    assert!(page_content(&renamed_sub, 1).contains("(CF 0003) Tj"));

    // Reformatted to Letter portrait before stamping.
    let doc = PdfReader::new().load(&renamed_sub).unwrap();
    assert_eq!(doc.get_pages().len(), 2);
}

#[test]
fn test_backup_snapshots_originals_before_mutation() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    save_pdf(&root.join("alpha.pdf"), 1);
    let original_bytes = std::fs::read(root.join("alpha.pdf")).unwrap();

    let config = PipelineConfig {
        backup: true,
        ..base_config(root)
    };
    run(&config);

    let backup = root.join(BACKUP_DIR_NAME).join("alpha.pdf");
    assert_eq!(std::fs::read(backup).unwrap(), original_bytes);
    // The working copy was renamed and stamped; the backup was not.
    assert!(root.join("CF 0001.pdf").exists());
}

#[test]
fn test_keep_original_name() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    save_pdf(&root.join("Exhibit A.pdf"), 1);

    let config = PipelineConfig {
        keep_original_name: true,
        ..base_config(root)
    };
    run(&config);

    assert!(root.join("CF 0001 - Exhibit A.pdf").exists());
}

#[test]
fn test_videos_numbered_at_end() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    std::fs::write(root.join("a-clip.mp4"), b"video").unwrap();
    save_pdf(&root.join("b-doc.pdf"), 1);
    std::fs::write(root.join("c-sheet.xlsx"), b"sheet").unwrap();

    let config = base_config(root);
    run(&config);

    let names = file_names(root);
    // PDF and spreadsheet take 0001/0002 in traversal order, video moves
    // to the end.
    assert!(names.contains(&"CF 0001.pdf".to_string()), "{names:?}");
    assert!(names.contains(&"CF 0002.xlsx".to_string()), "{names:?}");
    assert!(names.contains(&"CF 0003.mp4".to_string()), "{names:?}");
}

#[test]
fn test_videos_inline_keep_traversal_position() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    std::fs::write(root.join("a-clip.mp4"), b"video").unwrap();
    save_pdf(&root.join("b-doc.pdf"), 1);

    let config = PipelineConfig {
        videos_at_end: false,
        ..base_config(root)
    };
    run(&config);

    let names = file_names(root);
    assert!(names.contains(&"CF 0001.mp4".to_string()), "{names:?}");
    assert!(names.contains(&"CF 0002.pdf".to_string()), "{names:?}");
}

#[test]
fn test_unconverted_word_document_keeps_a_slot() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    std::fs::write(root.join("a-memo.docx"), b"word").unwrap();
    save_pdf(&root.join("b-doc.pdf"), 1);

    // NoConversion gateway: the docx cannot become a PDF, but it still
    // consumes CF 0001 so nothing is silently lost.
    let config = base_config(root);
    let result = run(&config);

    let names = file_names(root);
    assert!(names.contains(&"CF 0001.docx".to_string()), "{names:?}");
    assert!(names.contains(&"CF 0002.pdf".to_string()), "{names:?}");
    assert_eq!(result.errors.len(), 1);
}

#[test]
fn test_conversion_only_mode_reformats_without_renaming() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    save_pdf(&root.join("wide.pdf"), 1);

    let config = PipelineConfig {
        conversion_only: true,
        ..base_config(root)
    };
    let result = run(&config);

    // Name untouched, no stamp, but the file was letter-formatted.
    assert!(root.join("wide.pdf").exists());
    assert!(result.rename_log.is_empty());
    let content = page_content(&root.join("wide.pdf"), 0);
    assert!(content.contains("/P0 Do"), "got: {content}");
    assert!(!content.contains("Tj"), "no stamp expected: {content}");
}
