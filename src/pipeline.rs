//! Phase orchestration.
//!
//! Runs the full sequence: backup, blocked-type scan, planning, allocation,
//! rename, folder rollup, letter normalization, stamping, and final
//! assembly — strictly sequentially, because Bates numbering is a global
//! order-dependent invariant. Every phase supports a preview path; a dry run
//! walks the same sequence and produces the same summary shape with zero
//! filesystem mutation.

use serde::Serialize;

use crate::allocate::{allocate, reorder_videos_last, Allocation, RenameOperation};
use crate::backup::BackupService;
use crate::combine::CombinedPdfAssembler;
use crate::config::{PipelineConfig, BACKUP_DIR_NAME, PDF_EXT, WORD_EXTS};
use crate::convert::ConversionGateway;
use crate::error::{BatesError, Result};
use crate::folders::{aggregate, fold_ranges, FolderRenamer};
use crate::output::OutputFormatter;
use crate::plan::{find_blocking_files, ItemKind, ItemPlanner};
use crate::rename::RenameExecutor;
use crate::transform::{BatesStamper, LetterReformatter, StampOutcome};
use crate::walk::{extension_of, ordered_files};

/// Summary of one pipeline run: the only thing surfaced to callers.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineResult {
    /// Items that received a Bates range.
    pub total_items: usize,

    /// Bates slots consumed.
    pub total_pages: usize,

    /// Renames and conversions, performed or planned: (old, new).
    pub rename_log: Vec<(String, String)>,

    /// Informational skips (unreadable PDFs, non-label files at stamping).
    pub skipped: Vec<String>,

    /// Accumulated per-item errors; the run continued past these.
    pub errors: Vec<String>,
}

/// One pipeline run over one tree.
pub struct Pipeline<'a> {
    config: &'a PipelineConfig,
    gateway: &'a dyn ConversionGateway,
    out: &'a OutputFormatter,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline from its explicit collaborators.
    pub fn new(
        config: &'a PipelineConfig,
        gateway: &'a dyn ConversionGateway,
        out: &'a OutputFormatter,
    ) -> Self {
        Self {
            config,
            gateway,
            out,
        }
    }

    /// Run all phases.
    ///
    /// # Errors
    ///
    /// Returns an error only for fatal conditions: invalid root, blocked
    /// file types, duplicate rename destinations, a failed rename
    /// transaction, or a page-count mismatch during stamping. Per-item
    /// failures land in the result's error list instead.
    pub fn run(&self) -> Result<PipelineResult> {
        let config = self.config;
        let out = self.out;

        if !config.root.is_dir() {
            return Err(BatesError::invalid_root(config.root.clone()));
        }

        out.info(&format!(
            "Scanning recursively: {}",
            config.root.display()
        ));
        out.debug(&format!("Keep original filename: {}", config.keep_original_name));
        out.debug(&format!("Rename folders: {}", config.rename_folders));
        out.debug(&format!("Number videos at end: {}", config.videos_at_end));
        out.debug(&format!("Combined final PDF: {}", config.combine_final));

        let mut result = PipelineResult::default();

        self.run_backup(&mut result);

        if config.conversion_only {
            self.run_conversion_only(&mut result)?;
            return Ok(result);
        }

        // Eager fatal check: either the whole rename plan commits or
        // nothing is touched.
        let blocking = find_blocking_files(&config.root);
        if !blocking.is_empty() {
            return Err(BatesError::BlockedFiles { files: blocking });
        }

        let planner = ItemPlanner::new(self.gateway, config.dry_run);
        let planned = planner.plan(&config.root);
        result.errors.extend(planned.errors);
        result
            .skipped
            .extend(planned.skipped.iter().map(|p| p.display().to_string()));
        for (src, dst) in &planned.converted {
            result
                .rename_log
                .push((src.display().to_string(), dst.display().to_string()));
        }

        if planned.items.is_empty() {
            out.warning("No eligible files found to process.");
            result
                .errors
                .push("no eligible files found to process".to_string());
            return Ok(result);
        }

        let items = if config.videos_at_end {
            reorder_videos_last(planned.items)
        } else {
            planned.items
        };

        let allocation = allocate(&items, config)?;
        result.total_items = allocation.assignments.len();
        result.total_pages = allocation.total_pages;

        if config.dry_run {
            self.preview(&allocation, &mut result);
            return Ok(result);
        }

        self.apply(&allocation, &mut result)?;
        Ok(result)
    }

    fn run_backup(&self, result: &mut PipelineResult) {
        if !self.config.backup {
            return;
        }

        let service = BackupService::new(self.config);
        if self.config.dry_run {
            let plan = service.plan();
            self.out.info(&format!(
                "Would back up {} file(s) to {}/",
                plan.len(),
                BACKUP_DIR_NAME
            ));
        } else {
            self.out.section("BACKUP ORIGINAL TREE");
            let outcome = service.run();
            result.errors.extend(outcome.errors);
            self.out.success(&format!(
                "Backed up {} file(s) ({} already present)",
                outcome.copied, outcome.already_present
            ));
        }
    }

    /// Conversion-only mode: convert word documents and letter-format every
    /// PDF. No allocation, no renaming, no stamping.
    fn run_conversion_only(&self, result: &mut PipelineResult) -> Result<()> {
        let config = self.config;
        let out = self.out;

        let word_docs: Vec<_> = ordered_files(&config.root)
            .filter(|p| match extension_of(p) {
                Some(ext) => WORD_EXTS.contains(&ext.as_str()),
                None => false,
            })
            .collect();

        for doc in word_docs {
            if config.dry_run {
                out.info(&format!(
                    "Would convert to PDF: {} -> {}",
                    doc.display(),
                    doc.with_extension(PDF_EXT).display()
                ));
                result.rename_log.push((
                    doc.display().to_string(),
                    doc.with_extension(PDF_EXT).display().to_string(),
                ));
                continue;
            }

            match self.gateway.convert(&doc) {
                Ok(pdf) => {
                    out.success(&format!(
                        "Converted: {} -> {}",
                        doc.display(),
                        pdf.display()
                    ));
                    result
                        .rename_log
                        .push((doc.display().to_string(), pdf.display().to_string()));
                }
                Err(e) => result.errors.push(e.to_string()),
            }
        }

        let pdfs: Vec<_> = ordered_files(&config.root)
            .filter(|p| extension_of(p).as_deref() == Some(PDF_EXT))
            .collect();
        result.total_items = pdfs.len();

        if config.dry_run {
            out.info(&format!(
                "Would reformat {} PDF(s) to US Letter (conversion-only mode).",
                pdfs.len()
            ));
        } else {
            out.section("REFORMAT ALL PDFs TO US LETTER");
            let reformatter = LetterReformatter::new();
            for pdf in &pdfs {
                match reformatter.reformat_in_place(pdf) {
                    Ok(()) => out.debug(&format!("Reformatted: {}", pdf.display())),
                    Err(e) => result.errors.push(e.to_string()),
                }
            }
        }

        out.success("Conversion-only pipeline complete (no renaming, no stamping).");
        Ok(())
    }

    /// Dry-run preview: every later phase simulated from the allocation.
    fn preview(&self, allocation: &Allocation, result: &mut PipelineResult) {
        let config = self.config;
        let out = self.out;

        out.section("RENAME PLAN");
        for assignment in &allocation.assignments {
            let op = &assignment.operation;
            if op.source != op.destination {
                out.info(&format!(
                    "{} -> {}",
                    op.source.display(),
                    op.destination.display()
                ));
                result.rename_log.push((
                    op.source.display().to_string(),
                    op.destination.display().to_string(),
                ));
            }
        }

        if config.rename_folders {
            let ranges = self.planned_ranges(allocation);
            let plans = FolderRenamer::new(config).plan(&config.root, &ranges);
            for (src, dst) in &plans {
                out.info(&format!(
                    "Would rename folder: {} -> {}",
                    src.display(),
                    dst.display()
                ));
            }
        }

        out.section("STAMP PLAN");
        for assignment in &allocation.assignments {
            if assignment.kind != ItemKind::PdfDocument {
                continue;
            }
            let label = &assignment.label;
            out.info(&format!(
                "Would reformat to Letter and stamp {} from {} to {}",
                assignment.operation.destination.display(),
                label.page_label(0),
                label.page_label(assignment.pages.saturating_sub(1)),
            ));
        }

        if config.combine_final {
            let ranges = self.planned_ranges(allocation);
            match ranges.get(&config.root) {
                Some(range) if range.is_valid() => {
                    let output =
                        CombinedPdfAssembler::output_path(&config.root, range, config);
                    out.info(&format!(
                        "Would create combined PDF: {}",
                        output.display()
                    ));
                }
                _ => out.info("No Bates range for root; combined PDF would be skipped."),
            }
        }

        out.success("Dry run complete - no files or folders were modified.");
    }

    /// Folder ranges computed from planned destinations instead of on-disk
    /// names; the dry-run counterpart of [`aggregate`].
    fn planned_ranges(
        &self,
        allocation: &Allocation,
    ) -> std::collections::BTreeMap<std::path::PathBuf, crate::folders::FolderRange> {
        let leaves: Vec<_> = allocation
            .assignments
            .iter()
            .filter_map(|a| {
                let parent = a.operation.destination.parent()?.to_path_buf();
                Some((parent, a.label.start, a.label.last()))
            })
            .collect();
        fold_ranges(&self.config.root, &leaves)
    }

    /// Apply mode: commit renames, roll up folders, normalize, stamp, and
    /// assemble.
    fn apply(&self, allocation: &Allocation, result: &mut PipelineResult) -> Result<()> {
        let config = self.config;
        let out = self.out;

        let operations: Vec<RenameOperation> = allocation
            .assignments
            .iter()
            .map(|a| a.operation.clone())
            .collect();

        out.section("RENAME");
        let completed = RenameExecutor::new().apply(&operations)?;
        for (src, dst) in &completed {
            out.debug(&format!("{} -> {}", src.display(), dst.display()));
            result
                .rename_log
                .push((src.display().to_string(), dst.display().to_string()));
        }
        out.success(&format!("Renamed {} file(s).", completed.len()));

        if config.rename_folders {
            let ranges = aggregate(&config.root);
            let renamer = FolderRenamer::new(config);
            let outcome = renamer.apply(&renamer.plan(&config.root, &ranges));
            for (src, dst) in &outcome.renamed {
                out.info(&format!(
                    "Renamed folder: {} -> {}",
                    src.display(),
                    dst.display()
                ));
                result
                    .rename_log
                    .push((src.display().to_string(), dst.display().to_string()));
            }
            result.skipped.extend(outcome.skipped);
            result.errors.extend(outcome.errors);
        }

        // Letter-format every PDF in the tree, then stamp. Stamping assumes
        // uniform geometry, so the order matters.
        let pdfs: Vec<_> = ordered_files(&config.root)
            .filter(|p| extension_of(p).as_deref() == Some(PDF_EXT))
            .collect();

        out.section("REFORMAT ALL PDFs TO US LETTER");
        let reformatter = LetterReformatter::new();
        for pdf in &pdfs {
            match reformatter.reformat_in_place(pdf) {
                Ok(()) => out.debug(&format!("Reformatted: {}", pdf.display())),
                Err(e) => result.errors.push(e.to_string()),
            }
        }

        out.section("BATES STAMP");
        let stamper = BatesStamper::new();
        let mut stamped = 0usize;
        for pdf in &pdfs {
            match stamper.stamp(pdf) {
                Ok(StampOutcome::Stamped { pages }) => {
                    stamped += 1;
                    out.debug(&format!("Stamped {} page(s): {}", pages, pdf.display()));
                }
                Ok(StampOutcome::SkippedNonLabel) => {
                    result.skipped.push(format!(
                        "skipping stamp (name pattern mismatch): {}",
                        pdf.display()
                    ));
                }
                // The filename/page-count contract is the pipeline's core
                // consistency check; a violation halts the phase.
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => result.errors.push(e.to_string()),
            }
        }
        out.success(&format!("Stamped {stamped} PDF(s)."));

        if config.combine_final {
            let ranges = aggregate(&config.root);
            match CombinedPdfAssembler::new().assemble(&config.root, &ranges, config)? {
                Some(outcome) => {
                    result.errors.extend(outcome.errors);
                    out.success(&format!(
                        "Created combined PDF ({} pages): {}",
                        outcome.pages,
                        outcome.output.display()
                    ));
                    result
                        .rename_log
                        .push(("COMBINED".to_string(), outcome.output.display().to_string()));
                }
                None => out.info("No Bates range found for root; skipping combined PDF."),
            }
        }

        out.success("All steps complete.");
        Ok(())
    }
}
