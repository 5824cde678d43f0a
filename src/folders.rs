//! Folder range aggregation and renaming.
//!
//! After files carry their labels, every directory's range is the min/max of
//! all labeled descendants. Aggregation is an explicit two-pass fold:
//! collect the labeled leaves first, then expand each ancestor — no map
//! mutation while traversing. Renaming goes deepest-first so a renamed
//! directory never invalidates a not-yet-processed descendant's path.

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::PipelineConfig;
use crate::label::BatesLabel;
use crate::transform::stamp::label_of;
use crate::walk::ordered_files;

/// Min/max Bates numbers of all labeled files under one directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FolderRange {
    /// Smallest start number seen.
    pub min: u32,
    /// Largest end number seen.
    pub max: u32,
}

impl FolderRange {
    fn expand(&mut self, start: u32, end: u32) {
        self.min = self.min.min(start);
        self.max = self.max.max(end);
    }

    /// A usable range: positive and not inverted.
    pub fn is_valid(&self) -> bool {
        self.min >= 1 && self.max >= self.min
    }
}

/// Aggregate ranges from the labeled files currently on disk.
///
/// Reads current names, so this must run after file renames. The backup
/// subtree is excluded by the traversal itself.
pub fn aggregate(root: &Path) -> BTreeMap<PathBuf, FolderRange> {
    let leaves: Vec<(PathBuf, u32, u32)> = ordered_files(root)
        .filter_map(|path| {
            let label = label_of(&path)?;
            let parent = path.parent()?.to_path_buf();
            Some((parent, label.start, label.last()))
        })
        .collect();

    fold_ranges(root, &leaves)
}

/// Fold labeled leaves upward: every ancestor from the leaf's directory to
/// the root (inclusive) absorbs the leaf's range.
pub fn fold_ranges(root: &Path, leaves: &[(PathBuf, u32, u32)]) -> BTreeMap<PathBuf, FolderRange> {
    let mut ranges: BTreeMap<PathBuf, FolderRange> = BTreeMap::new();

    for (dir, start, end) in leaves {
        let mut current = dir.as_path();
        loop {
            if !current.starts_with(root) {
                break;
            }

            ranges
                .entry(current.to_path_buf())
                .and_modify(|r| r.expand(*start, *end))
                .or_insert(FolderRange {
                    min: *start,
                    max: *end,
                });

            if current == root {
                break;
            }
            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }
    }

    ranges
}

/// Everything the folder-rename pass did.
#[derive(Debug, Default)]
pub struct FolderRenameOutcome {
    /// Completed renames: (old, new).
    pub renamed: Vec<(PathBuf, PathBuf)>,

    /// Directories skipped because the destination already exists.
    pub skipped: Vec<String>,

    /// Per-directory failures; never fatal.
    pub errors: Vec<String>,
}

/// Renames directories from their aggregated ranges.
pub struct FolderRenamer<'a> {
    config: &'a PipelineConfig,
}

impl<'a> FolderRenamer<'a> {
    /// Create a renamer for one run.
    pub fn new(config: &'a PipelineConfig) -> Self {
        Self { config }
    }

    /// Compute the rename list, deepest directories first.
    ///
    /// Skips the root itself, hidden/temp directories, invalid ranges, and
    /// directories already carrying their computed name. Does not touch the
    /// filesystem; the dry-run preview prints exactly this list.
    pub fn plan(
        &self,
        root: &Path,
        ranges: &BTreeMap<PathBuf, FolderRange>,
    ) -> Vec<(PathBuf, PathBuf)> {
        let mut dirs: Vec<&PathBuf> = ranges.keys().collect();
        dirs.sort_by_key(|p| Reverse(p.components().count()));

        let mut plans = Vec::new();

        for dir in dirs {
            if dir.as_path() == root {
                continue;
            }

            let Some(name) = dir.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };
            if name.starts_with('.') || name.starts_with('~') {
                continue;
            }

            let range = &ranges[dir];
            if !range.is_valid() {
                continue;
            }

            let label = BatesLabel::range(
                &self.config.prefix,
                range.min,
                range.max,
                self.config.digits,
            );
            let new_name = if self.config.keep_folder_name {
                format!("{} - {}", label.text(), name)
            } else {
                label.text()
            };

            if new_name == name {
                continue;
            }

            plans.push((dir.clone(), dir.with_file_name(new_name)));
        }

        plans
    }

    /// Apply a rename list produced by [`FolderRenamer::plan`].
    ///
    /// An existing destination or a failed rename is logged and skipped;
    /// the directory keeps its old name.
    pub fn apply(&self, plans: &[(PathBuf, PathBuf)]) -> FolderRenameOutcome {
        let mut outcome = FolderRenameOutcome::default();

        for (src, dst) in plans {
            if dst.exists() {
                outcome.skipped.push(format!(
                    "folder rename skipped (target exists): {} -> {}",
                    src.display(),
                    dst.display()
                ));
                continue;
            }

            match fs::rename(src, dst) {
                Ok(()) => outcome.renamed.push((src.clone(), dst.clone())),
                Err(e) => outcome.errors.push(format!(
                    "failed to rename folder {} -> {}: {e}",
                    src.display(),
                    dst.display()
                )),
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_rollup_single_directory() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(&root.join("docs").join("CF 0001.pdf"));
        touch(&root.join("docs").join("CF 0010-0012.pdf"));

        let ranges = aggregate(root);

        let docs = &ranges[&root.join("docs")];
        assert_eq!((docs.min, docs.max), (1, 12));
        let top = &ranges[&root.to_path_buf()];
        assert_eq!((top.min, top.max), (1, 12));
    }

    #[test]
    fn test_rollup_reaches_every_ancestor() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(&root.join("a").join("b").join("CF 0005-0008.pdf"));
        touch(&root.join("a").join("CF 0002.pdf"));

        let ranges = aggregate(root);

        assert_eq!(ranges[&root.join("a").join("b")].min, 5);
        assert_eq!(ranges[&root.join("a").join("b")].max, 8);
        assert_eq!(ranges[&root.join("a")].min, 2);
        assert_eq!(ranges[&root.join("a")].max, 8);
        assert_eq!(ranges[&root.to_path_buf()].min, 2);
        assert_eq!(ranges[&root.to_path_buf()].max, 8);
    }

    #[test]
    fn test_unlabeled_files_ignored() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(&root.join("notes.pdf"));

        assert!(aggregate(root).is_empty());
    }

    #[test]
    fn test_non_pdf_labeled_files_counted() {
        // Videos and spreadsheets carry labels too.
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(&root.join("CF 0003.mp4"));

        let ranges = aggregate(root);
        assert_eq!(ranges[&root.to_path_buf()].min, 3);
    }

    #[test]
    fn test_rename_plan_deepest_first_and_applies() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(&root.join("outer").join("inner").join("CF 0001-0002.pdf"));

        let config = PipelineConfig {
            root: root.to_path_buf(),
            keep_folder_name: true,
            ..Default::default()
        };
        let ranges = aggregate(root);
        let renamer = FolderRenamer::new(&config);

        let plans = renamer.plan(root, &ranges);
        assert_eq!(plans.len(), 2);
        // Deepest first.
        assert_eq!(plans[0].0, root.join("outer").join("inner"));
        assert_eq!(
            plans[0].1,
            root.join("outer").join("CF 0001-0002 - inner")
        );
        assert_eq!(plans[1].1, root.join("CF 0001-0002 - outer"));

        let outcome = renamer.apply(&plans);
        assert_eq!(outcome.renamed.len(), 2);
        assert!(root
            .join("CF 0001-0002 - outer")
            .join("CF 0001-0002 - inner")
            .join("CF 0001-0002.pdf")
            .exists());
    }

    #[test]
    fn test_rename_without_keeping_name() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(&root.join("docs").join("CF 0007.pdf"));

        let config = PipelineConfig {
            root: root.to_path_buf(),
            keep_folder_name: false,
            ..Default::default()
        };
        let ranges = aggregate(root);
        let plans = FolderRenamer::new(&config).plan(root, &ranges);

        assert_eq!(plans, vec![(root.join("docs"), root.join("CF 0007"))]);
    }

    #[test]
    fn test_existing_destination_skipped() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(&root.join("docs").join("CF 0001.pdf"));
        fs::create_dir(root.join("CF 0001 - docs")).unwrap();

        let config = PipelineConfig {
            root: root.to_path_buf(),
            ..Default::default()
        };
        let ranges = aggregate(root);
        let renamer = FolderRenamer::new(&config);
        let outcome = renamer.apply(&renamer.plan(root, &ranges));

        assert!(outcome.renamed.is_empty());
        assert_eq!(outcome.skipped.len(), 1);
        assert!(root.join("docs").exists());
    }

    #[test]
    fn test_directory_already_carrying_computed_name_left_alone() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(&root.join("CF 0001").join("CF 0001.pdf"));

        let config = PipelineConfig {
            root: root.to_path_buf(),
            keep_folder_name: false,
            ..Default::default()
        };
        let ranges = aggregate(root);
        let plans = FolderRenamer::new(&config).plan(root, &ranges);

        assert!(plans.is_empty());
    }
}
