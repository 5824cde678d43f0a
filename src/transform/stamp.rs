//! Bates stamping.
//!
//! A file's name is a contract about its page count: `CF 0001-0008.pdf` must
//! contain exactly eight pages. The stamper validates that contract first
//! and refuses to continue the phase on any mismatch. Matching files get
//! every page relabeled: the original content is scaled up out of a reserved
//! footer band and the page's own Bates number is drawn right-aligned inside
//! it, so the label never overlaps content.

use std::path::Path;

use crate::config::{
    STAMP_FONT_SIZE, STAMP_FOOTER_BAND, STAMP_MARGIN_BOTTOM, STAMP_MARGIN_RIGHT,
};
use crate::error::{BatesError, Result};
use crate::io::{PdfReader, PdfWriter};
use crate::label::BatesLabel;
use crate::transform::{rebuild_pages, text_width, Placement, StampText};

/// What happened to one PDF during stamping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StampOutcome {
    /// The file was stamped; carries the page count.
    Stamped {
        /// Pages stamped.
        pages: usize,
    },
    /// The file's name does not match the label grammar; left untouched.
    /// Expected for non-Bates PDFs such as the combined output.
    SkippedNonLabel,
}

/// Stamps Bates labels onto labeled PDFs.
pub struct BatesStamper {
    reader: PdfReader,
    writer: PdfWriter,
}

impl BatesStamper {
    /// Create a new stamper.
    pub fn new() -> Self {
        Self {
            reader: PdfReader::without_verification(),
            writer: PdfWriter::new(),
        }
    }

    /// Stamp the PDF at `path` according to its filename label.
    ///
    /// # Errors
    ///
    /// Returns the fatal [`BatesError::PageCountMismatch`] if the filename
    /// range disagrees with the actual page count; other load/write
    /// failures are per-item errors for the caller to accumulate.
    pub fn stamp(&self, path: &Path) -> Result<StampOutcome> {
        let Some(label) = label_of(path) else {
            return Ok(StampOutcome::SkippedNonLabel);
        };

        let doc_pages = self.reader.page_count(path)?;
        let expected = label.expected_pages();
        if expected != doc_pages {
            return Err(BatesError::PageCountMismatch {
                path: path.to_path_buf(),
                expected,
                actual: doc_pages,
            });
        }

        let mut doc = self.reader.load(path)?;

        rebuild_pages(&mut doc, |index, width, height| {
            let band = STAMP_FOOTER_BAND.min(height / 3.0);
            let scale = ((height - band) / height).min(1.0);
            let tx = (width - width * scale) / 2.0;
            let ty = band + (height - band - height * scale) / 2.0;

            let text = label.page_label(index);
            let x = width - STAMP_MARGIN_RIGHT - text_width(&text, STAMP_FONT_SIZE);

            (
                Placement {
                    canvas_width: width,
                    canvas_height: height,
                    scale,
                    tx,
                    ty,
                },
                Some(StampText {
                    text,
                    x,
                    y: STAMP_MARGIN_BOTTOM,
                    size: STAMP_FONT_SIZE,
                }),
            )
        })?;

        self.writer.save(&mut doc, path)?;

        Ok(StampOutcome::Stamped { pages: doc_pages })
    }

    /// Validate the filename contract without touching the file; used by the
    /// dry-run preview for files already carrying labels.
    pub fn check(&self, path: &Path) -> Result<StampOutcome> {
        let Some(label) = label_of(path) else {
            return Ok(StampOutcome::SkippedNonLabel);
        };

        let doc_pages = self.reader.page_count(path)?;
        let expected = label.expected_pages();
        if expected != doc_pages {
            return Err(BatesError::PageCountMismatch {
                path: path.to_path_buf(),
                expected,
                actual: doc_pages,
            });
        }

        Ok(StampOutcome::Stamped { pages: doc_pages })
    }
}

impl Default for BatesStamper {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse the label out of a file name, if it matches the grammar.
pub fn label_of(path: &Path) -> Option<BatesLabel> {
    path.file_stem()
        .and_then(|stem| BatesLabel::parse(&stem.to_string_lossy()))
}
