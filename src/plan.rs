//! Item planning: classify every file into a typed item with a page count.
//!
//! The planner walks the ordered tree and turns each eligible file into an
//! [`Item`] that will consume one contiguous block of Bates numbers. Word
//! documents are routed through the conversion gateway first; everything the
//! gateway cannot produce a PDF for still gets a single Bates slot so no
//! file is silently lost.

use std::path::{Path, PathBuf};

use crate::config::{BLOCKED_EXTS, EXCEL_EXTS, PDF_EXT, VIDEO_EXTS, WORD_EXTS};
use crate::convert::ConversionGateway;
use crate::io::PdfReader;
use crate::walk::{extension_of, ordered_files};

/// What kind of content an item carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    /// A readable PDF (native or freshly converted).
    PdfDocument,
    /// A word-processor document the gateway could not convert.
    UnconvertedDocument,
    /// A spreadsheet; not paginated, one Bates slot.
    SpreadsheetDocument,
    /// A video file; one Bates slot.
    VideoDocument,
}

/// One logical unit of content consuming a contiguous Bates block.
#[derive(Debug, Clone)]
pub struct Item {
    /// Classification of the primary file.
    pub kind: ItemKind,

    /// Number of Bates slots the item consumes (>= 1).
    pub pages: usize,

    /// Primary (post-conversion) path; the rename target.
    pub path: PathBuf,
}

/// Everything the planning pass produced.
#[derive(Debug, Default)]
pub struct PlanOutcome {
    /// Items in final traversal order (before any video reorder).
    pub items: Vec<Item>,

    /// Conversions performed or previewed: (source, produced PDF).
    pub converted: Vec<(PathBuf, PathBuf)>,

    /// Files dropped without an item (unreadable or empty PDFs).
    pub skipped: Vec<PathBuf>,

    /// Per-item failures; the run continues past these.
    pub errors: Vec<String>,
}

/// Scan for files whose extension blocks the whole run.
pub fn find_blocking_files(root: &Path) -> Vec<PathBuf> {
    ordered_files(root)
        .filter(|path| match extension_of(path) {
            Some(ext) => BLOCKED_EXTS.contains(&ext.as_str()),
            None => false,
        })
        .collect()
}

/// Walks the ordered tree and classifies files into items.
pub struct ItemPlanner<'a> {
    reader: PdfReader,
    gateway: &'a dyn ConversionGateway,
    dry_run: bool,
}

impl<'a> ItemPlanner<'a> {
    /// Create a planner.
    ///
    /// In dry-run mode conversions are only previewed: word documents keep a
    /// single Bates slot as unconverted items and nothing touches disk.
    pub fn new(gateway: &'a dyn ConversionGateway, dry_run: bool) -> Self {
        Self {
            reader: PdfReader::new(),
            gateway,
            dry_run,
        }
    }

    /// Classify every file under `root` in traversal order.
    pub fn plan(&self, root: &Path) -> PlanOutcome {
        let mut outcome = PlanOutcome::default();

        for path in ordered_files(root) {
            let Some(ext) = extension_of(&path) else {
                continue;
            };

            if ext == PDF_EXT {
                self.plan_pdf(path, &mut outcome);
            } else if WORD_EXTS.contains(&ext.as_str()) {
                self.plan_word(path, &mut outcome);
            } else if EXCEL_EXTS.contains(&ext.as_str()) {
                outcome.items.push(Item {
                    kind: ItemKind::SpreadsheetDocument,
                    pages: 1,
                    path,
                });
            } else if VIDEO_EXTS.contains(&ext.as_str()) {
                outcome.items.push(Item {
                    kind: ItemKind::VideoDocument,
                    pages: 1,
                    path,
                });
            }
            // Anything else was either converted to PDF upstream or is
            // invisible to the pipeline.
        }

        outcome
    }

    fn plan_pdf(&self, path: PathBuf, outcome: &mut PlanOutcome) {
        match self.reader.page_count(&path) {
            Ok(0) => outcome.skipped.push(path),
            Ok(pages) => outcome.items.push(Item {
                kind: ItemKind::PdfDocument,
                pages,
                path,
            }),
            Err(e) => {
                outcome.errors.push(e.to_string());
                outcome.skipped.push(path);
            }
        }
    }

    fn plan_word(&self, path: PathBuf, outcome: &mut PlanOutcome) {
        if self.dry_run {
            // Preview only: the conversion would produce a sibling PDF, but
            // until it runs the item keeps a single slot.
            outcome
                .converted
                .push((path.clone(), path.with_extension(PDF_EXT)));
            outcome.items.push(Item {
                kind: ItemKind::UnconvertedDocument,
                pages: 1,
                path,
            });
            return;
        }

        match self.gateway.convert(&path) {
            Ok(pdf_path) => {
                let pages = self.reader.page_count(&pdf_path).unwrap_or(1).max(1);
                outcome.converted.push((path, pdf_path.clone()));
                outcome.items.push(Item {
                    kind: ItemKind::PdfDocument,
                    pages,
                    path: pdf_path,
                });
            }
            Err(e) => {
                outcome.errors.push(e.to_string());
                outcome.items.push(Item {
                    kind: ItemKind::UnconvertedDocument,
                    pages: 1,
                    path,
                });
            }
        }
    }
}
