//! The conversion seam.
//!
//! Turning a foreign document (Word, image, HTML, text) into a PDF is an
//! external concern; the core only depends on this trait. The planner calls
//! it for word-processor documents and degrades gracefully when it fails:
//! the file still receives a single Bates slot as an unconverted document
//! rather than being silently lost.

use std::path::{Path, PathBuf};

use crate::error::{BatesError, Result};

/// Converts one foreign document into a PDF file on disk.
///
/// Implementations own the fate of the source file; the production backend
/// removes the original after a successful conversion.
pub trait ConversionGateway {
    /// Convert `path` to a PDF, returning the path of the PDF produced.
    fn convert(&self, path: &Path) -> Result<PathBuf>;
}

/// Gateway used when no conversion backend is wired up.
///
/// Always fails, so word-processor documents fall back to
/// `UnconvertedDocument` items.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoConversion;

impl ConversionGateway for NoConversion {
    fn convert(&self, path: &Path) -> Result<PathBuf> {
        Err(BatesError::ConversionUnavailable {
            path: path.to_path_buf(),
        })
    }
}
