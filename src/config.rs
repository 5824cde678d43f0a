//! Configuration for a pipeline run.
//!
//! All toggles live in one immutable [`PipelineConfig`] that is passed
//! explicitly into every phase; no phase reads ambient state. The module also
//! owns the file-type groups and the fixed page/stamp geometry constants.

use anyhow::{bail, Result};
use std::path::PathBuf;

/// Reserved backup directory name, created inside the root.
///
/// Excluded from traversal, aggregation, and allocation.
pub const BACKUP_DIR_NAME: &str = "_bates_backups";

/// US Letter portrait size in points (8.5 x 11 in).
pub const LETTER_PORTRAIT: (f64, f64) = (612.0, 792.0);

/// US Letter landscape size in points (11 x 8.5 in).
pub const LETTER_LANDSCAPE: (f64, f64) = (792.0, 612.0);

/// Stamp font size in points.
pub const STAMP_FONT_SIZE: f64 = 12.0;

/// Distance of the stamp baseline from the bottom edge (0.5 in).
pub const STAMP_MARGIN_BOTTOM: f64 = 36.0;

/// Distance of the stamp's right edge from the page's right edge (1 in).
pub const STAMP_MARGIN_RIGHT: f64 = 72.0;

/// Footer band reserved for the stamp (0.75 in), clamped to a third of the
/// page height for very short pages.
pub const STAMP_FOOTER_BAND: f64 = 54.0;

/// PDF file extension.
pub const PDF_EXT: &str = "pdf";

/// Word-processor extensions routed through the conversion gateway.
pub const WORD_EXTS: &[&str] = &["docx"];

/// Spreadsheet extensions (not paginated, one Bates slot each).
pub const EXCEL_EXTS: &[&str] = &["xls", "xlsx", "xlsm", "xlsb"];

/// Video extensions (one Bates slot each).
pub const VIDEO_EXTS: &[&str] = &["mp4", "mov", "m4v", "avi", "mkv", "wmv", "flv"];

/// Extensions that abort the run before allocation: legacy binary Word and
/// mail-message formats.
pub const BLOCKED_EXTS: &[&str] = &["doc", "eml", "msg"];

/// Complete configuration for one pipeline run.
///
/// Immutable value object; construct it once (normally from the CLI), call
/// [`PipelineConfig::validate`], then thread it through every phase.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Root of the tree to process.
    pub root: PathBuf,

    /// Bates prefix, e.g. `CF`. Must be non-empty and alphanumeric so that
    /// generated names re-parse under the label grammar.
    pub prefix: String,

    /// Zero-padding width for sequence numbers (4 -> `0001`).
    pub digits: usize,

    /// Starting sequence number.
    pub start: u32,

    /// Preview only; no filesystem mutation anywhere.
    pub dry_run: bool,

    /// Snapshot the untouched tree into the backup directory first.
    pub backup: bool,

    /// Append the original file stem after the label:
    /// `CF 0001-0008 - Exhibit A.pdf` instead of `CF 0001-0008.pdf`.
    pub keep_original_name: bool,

    /// Rename directories using the aggregated range of their contents.
    pub rename_folders: bool,

    /// When renaming folders, append the original folder name.
    pub keep_folder_name: bool,

    /// Allocate video items after all other items instead of inline.
    pub videos_at_end: bool,

    /// Concatenate all labeled PDFs into one final document.
    pub combine_final: bool,

    /// Convert and letter-format only; no allocation, renaming, or stamping.
    pub conversion_only: bool,

    /// Suppress non-error output.
    pub quiet: bool,

    /// Show per-file detail while running.
    pub verbose: bool,
}

impl PipelineConfig {
    /// Validate the configuration.
    ///
    /// Checks the value ranges the label grammar and allocator depend on.
    /// Root-path existence is the pipeline's own fatal check, not done here.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The prefix is empty or contains non-alphanumeric characters
    /// - The padding width is zero or implausibly large
    /// - The start counter is zero
    /// - Verbose and quiet are both requested
    pub fn validate(&self) -> Result<()> {
        if self.prefix.is_empty() {
            bail!("Prefix must not be empty");
        }

        if !self.prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
            bail!(
                "Prefix must be alphanumeric (got {:?}): generated names must \
                 re-parse under the label grammar",
                self.prefix
            );
        }

        if self.digits == 0 || self.digits > 9 {
            bail!("Padding width must be between 1 and 9 (got {})", self.digits);
        }

        if self.start == 0 {
            bail!("Starting number must be at least 1");
        }

        if self.verbose && self.quiet {
            bail!("Cannot use both --verbose and --quiet");
        }

        Ok(())
    }

    /// Check if output should be displayed.
    ///
    /// Dry runs always print; that preview is the whole point.
    pub fn should_print(&self) -> bool {
        !self.quiet || self.dry_run
    }

    /// The backup directory for this run's root.
    pub fn backup_dir(&self) -> PathBuf {
        self.root.join(BACKUP_DIR_NAME)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::new(),
            prefix: "CF".to_string(),
            digits: 4,
            start: 1,
            dry_run: true,
            backup: true,
            keep_original_name: true,
            rename_folders: false,
            keep_folder_name: true,
            videos_at_end: true,
            combine_final: false,
            conversion_only: false,
            quiet: false,
            verbose: false,
        }
    }
}
