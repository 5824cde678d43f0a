//! Deterministic tree traversal.
//!
//! Depth-first, pre-order, children visited in natural sort order. This
//! ordering is the sole source of determinism for Bates numbering: an
//! unchanged tree must always produce the same file sequence.
//!
//! Excluded everywhere: names starting with `.` or `~`, OS junk files
//! (`Thumbs.db`, `desktop.ini`), and the reserved backup subtree.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::config::BACKUP_DIR_NAME;

const JUNK_NAMES: &[&str] = &["Thumbs.db", "desktop.ini"];

/// One run of a natural-sort key: digits compare numerically, text runs
/// case-insensitively. A digit run always sorts before a text run.
#[derive(Debug, PartialEq, Eq)]
enum KeyPart {
    Number(u128),
    Text(String),
}

impl Ord for KeyPart {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (KeyPart::Number(a), KeyPart::Number(b)) => a.cmp(b),
            (KeyPart::Text(a), KeyPart::Text(b)) => a.cmp(b),
            (KeyPart::Number(_), KeyPart::Text(_)) => Ordering::Less,
            (KeyPart::Text(_), KeyPart::Number(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for KeyPart {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn natural_key(name: &str) -> Vec<KeyPart> {
    let mut parts = Vec::new();
    let mut run = String::new();
    let mut run_is_digit = false;

    for c in name.chars() {
        let is_digit = c.is_ascii_digit();
        if !run.is_empty() && is_digit != run_is_digit {
            parts.push(finish_run(run, run_is_digit));
            run = String::new();
        }
        run_is_digit = is_digit;
        run.push(c);
    }
    if !run.is_empty() {
        parts.push(finish_run(run, run_is_digit));
    }

    parts
}

fn finish_run(run: String, is_digit: bool) -> KeyPart {
    if is_digit {
        match run.parse::<u128>() {
            Ok(n) => KeyPart::Number(n),
            Err(_) => KeyPart::Text(run),
        }
    } else {
        KeyPart::Text(run.to_lowercase())
    }
}

/// Compare two file names in natural order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    natural_key(a).cmp(&natural_key(b))
}

fn is_excluded(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.')
        || name.starts_with('~')
        || JUNK_NAMES.contains(&name.as_ref())
        || name == BACKUP_DIR_NAME
}

/// All files under `root` in deterministic traversal order.
///
/// Directories are entered at their sorted position; only files are yielded.
/// The root itself is never excluded regardless of its name.
pub fn ordered_files(root: &Path) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(root)
        .sort_by(|a, b| {
            natural_cmp(
                &a.file_name().to_string_lossy(),
                &b.file_name().to_string_lossy(),
            )
        })
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_excluded(e))
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
}

/// Lowercased extension of a path, if any.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}
