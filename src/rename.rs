//! Collision-safe rename execution.
//!
//! Applying a rename plan directly can destroy data when destinations
//! intersect sources (`A -> B` while `B -> C`). The executor therefore runs
//! a two-step transaction: every source is first staged to a uniquely-named
//! hidden sibling, then every staged file is committed to its final
//! destination. No destination is overwritten mid-sequence and no source is
//! lost, whatever the overlap between the two sets.
//!
//! If a stage step fails, everything staged so far is rolled back to its
//! original name. A crash between stage and commit leaves `.stage-*`
//! siblings on disk; no cross-process recovery pass is attempted.

use std::fs;
use std::path::PathBuf;

use uuid::Uuid;

use crate::allocate::RenameOperation;
use crate::error::{BatesError, Result};

/// Applies rename plans with two-phase staging.
#[derive(Debug, Default)]
pub struct RenameExecutor;

impl RenameExecutor {
    /// Create a new executor.
    pub fn new() -> Self {
        Self
    }

    /// Apply every operation whose source differs from its destination.
    ///
    /// Returns the completed renames in operation order.
    ///
    /// # Errors
    ///
    /// Returns [`BatesError::RenameFailed`] (fatal) if a stage or commit
    /// step fails. A stage failure rolls back all prior stages first.
    pub fn apply(&self, operations: &[RenameOperation]) -> Result<Vec<(PathBuf, PathBuf)>> {
        // Phase 1: move each source aside to a unique hidden sibling.
        // The log of completed stages is what makes rollback possible.
        let mut staged: Vec<(PathBuf, &RenameOperation)> = Vec::new();

        for op in operations {
            if op.source == op.destination || !op.source.exists() {
                continue;
            }

            let name = op
                .source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let stage_path = op
                .source
                .with_file_name(format!(".stage-{}-{}", Uuid::new_v4().simple(), name));

            if let Err(e) = fs::rename(&op.source, &stage_path) {
                self.rollback(&staged);
                return Err(BatesError::RenameFailed {
                    path: op.source.clone(),
                    source: e,
                });
            }
            staged.push((stage_path, op));
        }

        // Phase 2: commit each staged file to its destination.
        let mut completed = Vec::with_capacity(staged.len());

        for (index, (stage_path, op)) in staged.iter().enumerate() {
            if let Some(parent) = op.destination.parent() {
                if let Err(e) = fs::create_dir_all(parent) {
                    self.rollback(&staged[index..]);
                    return Err(BatesError::RenameFailed {
                        path: op.destination.clone(),
                        source: e,
                    });
                }
            }

            if let Err(e) = fs::rename(stage_path, &op.destination) {
                self.rollback(&staged[index..]);
                return Err(BatesError::RenameFailed {
                    path: op.destination.clone(),
                    source: e,
                });
            }
            completed.push((op.source.clone(), op.destination.clone()));
        }

        Ok(completed)
    }

    /// Return staged files to their original names. Failures here are
    /// ignored; the staged names are recognizable for manual cleanup.
    fn rollback(&self, staged: &[(PathBuf, &RenameOperation)]) {
        for (stage_path, op) in staged {
            let _ = fs::rename(stage_path, &op.source);
        }
    }
}
