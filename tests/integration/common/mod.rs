//! Integration test fixtures.
//!
//! Tests build their trees inside a `TempDir` and generate real PDF files
//! with lopdf, so the full pipeline runs against documents it can actually
//! load, rebuild, and stamp.

use lopdf::{dictionary, Document, Object, Stream};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use pdfbates::config::PipelineConfig;

/// Write a valid PDF with `pages` pages at `path`, creating parents.
pub fn save_pdf(path: &Path, pages: usize) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }

    let mut doc = Document::with_version("1.4");

    let pages_id = doc.new_object_id();
    let mut kids: Vec<Object> = Vec::new();
    for i in 0..pages {
        let ops = format!("0 0 m {} {} l S\n", 100 + i, 100 + i);
        let content_id = doc.add_object(Object::Stream(Stream::new(
            lopdf::Dictionary::new(),
            ops.into_bytes(),
        )));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => pages as i64,
    };
    doc.objects.insert(pages_id, pages_dict.into());
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

/// A quiet configuration rooted at `root`, with backups off so tests opt in
/// explicitly.
pub fn base_config(root: &Path) -> PipelineConfig {
    PipelineConfig {
        root: root.to_path_buf(),
        prefix: "CF".to_string(),
        digits: 4,
        start: 1,
        dry_run: false,
        backup: false,
        keep_original_name: false,
        rename_folders: false,
        keep_folder_name: true,
        videos_at_end: true,
        combine_final: false,
        conversion_only: false,
        quiet: true,
        verbose: false,
    }
}

/// Snapshot every file under `root`: relative path -> contents.
pub fn tree_snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    let mut snapshot = BTreeMap::new();
    for entry in walk_all(root) {
        let rel = entry.strip_prefix(root).unwrap().to_path_buf();
        snapshot.insert(rel, fs::read(&entry).unwrap());
    }
    snapshot
}

fn walk_all(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in fs::read_dir(&dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                stack.push(path);
            } else {
                files.push(path);
            }
        }
    }
    files.sort();
    files
}

/// All file names (not paths) currently under `root`, sorted.
pub fn file_names(root: &Path) -> Vec<String> {
    let mut names: Vec<String> = walk_all(root)
        .into_iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
