//! Bates range allocation and rename planning.
//!
//! Given the planned items in order, assign each a contiguous block starting
//! at the configured counter, derive the destination filename from the label,
//! and verify up front that no two operations collide on a destination.
//! Blocks never overlap and never leave gaps within one run.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::PipelineConfig;
use crate::error::{BatesError, Result};
use crate::label::BatesLabel;
use crate::plan::{Item, ItemKind};

/// One planned filesystem rename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameOperation {
    /// Current path of the file.
    pub source: PathBuf,

    /// Path the file will carry after the run.
    pub destination: PathBuf,
}

/// One item with its assigned label and rename.
#[derive(Debug, Clone)]
pub struct Assignment {
    /// Classification carried over from planning.
    pub kind: ItemKind,

    /// Bates slots consumed.
    pub pages: usize,

    /// The label assigned to this item.
    pub label: BatesLabel,

    /// The rename that encodes the label into the filename.
    pub operation: RenameOperation,
}

/// Result of an allocation pass.
#[derive(Debug)]
pub struct Allocation {
    /// Per-item assignments in allocation order.
    pub assignments: Vec<Assignment>,

    /// First unused counter value after this pass.
    pub next_counter: u32,

    /// Total Bates slots consumed.
    pub total_pages: usize,
}

/// Move all video items after all other items, preserving relative order
/// within each group.
pub fn reorder_videos_last(items: Vec<Item>) -> Vec<Item> {
    let (videos, others): (Vec<Item>, Vec<Item>) = items
        .into_iter()
        .partition(|item| item.kind == ItemKind::VideoDocument);

    let mut ordered = others;
    ordered.extend(videos);
    ordered
}

/// Assign contiguous Bates ranges and build rename operations.
///
/// # Errors
///
/// Returns [`BatesError::DuplicateDestinations`] (fatal, nothing renamed) if
/// two operations resolve to the same destination path.
pub fn allocate(items: &[Item], config: &PipelineConfig) -> Result<Allocation> {
    let mut assignments = Vec::with_capacity(items.len());
    let mut counter = config.start;
    let mut total_pages = 0usize;

    for item in items {
        let start = counter;
        let end = counter + item.pages as u32 - 1;
        counter = end + 1;
        total_pages += item.pages;

        let label = BatesLabel::range(&config.prefix, start, end, config.digits);
        let destination = destination_for(&item.path, &label, config);

        assignments.push(Assignment {
            kind: item.kind,
            pages: item.pages,
            label,
            operation: RenameOperation {
                source: item.path.clone(),
                destination,
            },
        });
    }

    verify_unique_destinations(&assignments)?;

    Ok(Allocation {
        assignments,
        next_counter: counter,
        total_pages,
    })
}

fn destination_for(path: &PathBuf, label: &BatesLabel, config: &PipelineConfig) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let name = if config.keep_original_name {
        format!("{} - {}{}", label.text(), stem, ext)
    } else {
        format!("{}{}", label.text(), ext)
    };

    path.with_file_name(name)
}

/// The multiset of destinations must be a set; a duplicate is fatal before
/// any file is touched.
fn verify_unique_destinations(assignments: &[Assignment]) -> Result<()> {
    let mut seen: BTreeMap<&PathBuf, usize> = BTreeMap::new();
    for assignment in assignments {
        *seen.entry(&assignment.operation.destination).or_insert(0) += 1;
    }

    let duplicates: Vec<PathBuf> = seen
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(path, _)| path.clone())
        .collect();

    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(BatesError::DuplicateDestinations {
            destinations: duplicates,
        })
    }
}
