//! Pre-mutation tree snapshot.
//!
//! Runs once, before any conversion, rename, or stamp: every traversed file
//! is copied into the reserved backup directory under its relative path.
//! Files already present in the backup are left untouched, so an aborted
//! run can be restarted without clobbering the original snapshot.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::PipelineConfig;
use crate::walk::ordered_files;

/// Result of a backup pass.
#[derive(Debug, Default)]
pub struct BackupOutcome {
    /// Files copied into the backup directory.
    pub copied: usize,

    /// Files skipped because a backup already exists.
    pub already_present: usize,

    /// Per-file copy failures; never fatal.
    pub errors: Vec<String>,
}

/// Snapshots the untouched tree before processing.
pub struct BackupService<'a> {
    config: &'a PipelineConfig,
}

impl<'a> BackupService<'a> {
    /// Create a backup service for one run.
    pub fn new(config: &'a PipelineConfig) -> Self {
        Self { config }
    }

    /// The copy list: (source, backup destination) for every eligible file.
    ///
    /// The traversal already excludes the backup directory itself.
    pub fn plan(&self) -> Vec<(PathBuf, PathBuf)> {
        let backup_root = self.config.backup_dir();

        ordered_files(&self.config.root)
            .filter_map(|path| {
                let rel = path.strip_prefix(&self.config.root).ok()?.to_path_buf();
                Some((path, backup_root.join(rel)))
            })
            .collect()
    }

    /// Copy every file into the backup directory.
    pub fn run(&self) -> BackupOutcome {
        let mut outcome = BackupOutcome::default();

        for (source, dest) in self.plan() {
            if dest.exists() {
                outcome.already_present += 1;
                continue;
            }

            let copy = dest
                .parent()
                .map(|parent| fs::create_dir_all(parent))
                .unwrap_or(Ok(()))
                .and_then(|_| fs::copy(&source, &dest));

            match copy {
                Ok(_) => outcome.copied += 1,
                Err(e) => outcome
                    .errors
                    .push(format!("backup failed for {}: {e}", source.display())),
            }
        }

        outcome
    }
}
