//! Letter normalization.
//!
//! Every page is scaled onto a US Letter canvas, landscape when the source
//! page is wider than tall, portrait otherwise. The scale is uniform
//! (`min(target_w/w, target_h/h)`) so aspect ratio is preserved exactly and
//! content is never distorted; the scaled page is centered on both axes.
//! Runs before stamping, which assumes uniform page geometry.

use std::path::Path;

use crate::config::{LETTER_LANDSCAPE, LETTER_PORTRAIT};
use crate::error::Result;
use crate::io::{PdfReader, PdfWriter};
use crate::transform::{rebuild_pages, Placement};

/// Pick the Letter orientation matching the source page.
fn choose_letter_size(width: f64, height: f64) -> (f64, f64) {
    if width >= height {
        LETTER_LANDSCAPE
    } else {
        LETTER_PORTRAIT
    }
}

/// Normalizes PDF page geometry in place.
pub struct LetterReformatter {
    reader: PdfReader,
    writer: PdfWriter,
}

impl LetterReformatter {
    /// Create a new reformatter.
    pub fn new() -> Self {
        Self {
            reader: PdfReader::new(),
            writer: PdfWriter::new(),
        }
    }

    /// Reformat every page of the PDF at `path` to Letter, atomically
    /// replacing the original file.
    ///
    /// # Errors
    ///
    /// Returns an error if the PDF cannot be loaded, rebuilt, or written.
    pub fn reformat_in_place(&self, path: &Path) -> Result<()> {
        let mut doc = self.reader.load(path)?;

        rebuild_pages(&mut doc, |_, width, height| {
            let (target_w, target_h) = choose_letter_size(width, height);
            let scale = (target_w / width).min(target_h / height);
            let tx = (target_w - width * scale) / 2.0;
            let ty = (target_h - height * scale) / 2.0;

            (
                Placement {
                    canvas_width: target_w,
                    canvas_height: target_h,
                    scale,
                    tx,
                    ty,
                },
                None,
            )
        })?;

        self.writer.save(&mut doc, path)
    }
}

impl Default for LetterReformatter {
    fn default() -> Self {
        Self::new()
    }
}
