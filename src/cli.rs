//! CLI argument parsing.
//!
//! Defines the command-line surface with `clap` and converts it into the
//! immutable [`PipelineConfig`] the library consumes. All validation beyond
//! clap's own lives in [`PipelineConfig::validate`].

use clap::Parser;
use std::path::PathBuf;

use crate::config::PipelineConfig;

/// Bates-number, rename, and stamp a document production tree.
///
/// pdfbates assigns a gapless, page-level sequence to every document under
/// a root folder, renames files (and optionally folders) to encode the
/// assigned range, normalizes PDF pages to US Letter, stamps each page with
/// its label, and can roll everything into one combined PDF.
#[derive(Parser, Debug)]
#[command(name = "pdfbates")]
#[command(version)]
#[command(about = "Bates-number, rename, and stamp a document production tree", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Root folder to process
    ///
    /// Every eligible file underneath is numbered in deterministic
    /// depth-first natural order. Hidden files, OS junk, and the
    /// _bates_backups directory are ignored.
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// Bates prefix for labels and filenames
    ///
    /// Must be alphanumeric so generated names re-parse under the label
    /// grammar, e.g. "CF 0001-0008 - Exhibit A.pdf".
    #[arg(short, long, value_name = "TEXT", default_value = "CF")]
    pub prefix: String,

    /// Zero-padding width for sequence numbers (4 -> 0001)
    #[arg(short, long, value_name = "N", default_value_t = 4)]
    pub digits: usize,

    /// Starting sequence number
    #[arg(short, long, value_name = "N", default_value_t = 1)]
    pub start: u32,

    /// Dry run - preview every planned change without touching anything
    ///
    /// Walks the full pipeline (conversions, renames, folder renames,
    /// stamping, combining) in preview mode. Running twice on an unchanged
    /// tree prints the identical plan.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Disable the pre-run backup snapshot
    ///
    /// By default the untouched tree is copied into _bates_backups/ inside
    /// the root before any mutation.
    #[arg(long)]
    pub no_backup: bool,

    /// Do NOT append the original filename after the Bates label
    ///
    /// Renames produce "CF 0001-0008.pdf" instead of
    /// "CF 0001-0008 - Original Name.pdf".
    #[arg(long)]
    pub no_keep_name: bool,

    /// Rename folders using the Bates range of their contents
    #[arg(long)]
    pub rename_folders: bool,

    /// When renaming folders, do NOT append the original folder name
    #[arg(long)]
    pub no_folder_keep_name: bool,

    /// Number videos inline instead of after all other items
    #[arg(long)]
    pub videos_inline: bool,

    /// Create a single combined PDF covering the full Bates range
    #[arg(long)]
    pub combine_final: bool,

    /// Conversion-only mode: convert and letter-format, nothing else
    ///
    /// No allocation, no renaming, no stamping, no combining.
    #[arg(long)]
    pub conversion_only: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Show per-file detail while running
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Convert parsed arguments into a validated pipeline configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when a value fails [`PipelineConfig::validate`],
    /// e.g. a non-alphanumeric prefix or a zero padding width.
    pub fn to_config(&self) -> anyhow::Result<PipelineConfig> {
        let config = PipelineConfig {
            root: self.root.clone(),
            prefix: self.prefix.clone(),
            digits: self.digits,
            start: self.start,
            dry_run: self.dry_run,
            backup: !self.no_backup,
            keep_original_name: !self.no_keep_name,
            rename_folders: self.rename_folders,
            keep_folder_name: !self.no_folder_keep_name,
            videos_at_end: !self.videos_inline,
            combine_final: self.combine_final,
            conversion_only: self.conversion_only,
            quiet: self.quiet,
            verbose: self.verbose,
        };

        config.validate()?;
        Ok(config)
    }
}
