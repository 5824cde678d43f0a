//! PDF loading and page counting.

use lopdf::Document;
use std::path::Path;

use crate::error::{BatesError, Result};

/// PDF reader with configurable load-time verification.
#[derive(Debug, Clone)]
pub struct PdfReader {
    /// Whether to reject documents with no readable pages.
    verify: bool,
}

impl PdfReader {
    /// Create a new PDF reader with default settings.
    pub fn new() -> Self {
        Self { verify: true }
    }

    /// Create a reader that accepts page-less documents.
    pub fn without_verification() -> Self {
        Self { verify: false }
    }

    /// Load a single PDF document.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not a valid PDF, or
    /// (with verification on) has no pages.
    pub fn load(&self, path: &Path) -> Result<Document> {
        let doc = Document::load(path)
            .map_err(|e| BatesError::failed_to_load_pdf(path.to_path_buf(), e.to_string()))?;

        if self.verify && doc.get_pages().is_empty() {
            return Err(BatesError::failed_to_load_pdf(
                path.to_path_buf(),
                "PDF has no pages",
            ));
        }

        Ok(doc)
    }

    /// Number of pages in the PDF at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded; a loadable PDF with
    /// zero pages yields `Ok(0)` so callers can drop it as a skip rather
    /// than an error.
    pub fn page_count(&self, path: &Path) -> Result<usize> {
        let doc = Document::load(path)
            .map_err(|e| BatesError::failed_to_load_pdf(path.to_path_buf(), e.to_string()))?;
        Ok(doc.get_pages().len())
    }
}

impl Default for PdfReader {
    fn default() -> Self {
        Self::new()
    }
}
