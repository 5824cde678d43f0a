//! Atomic PDF writing.
//!
//! Every PDF this pipeline produces is written to a uniquely-named hidden
//! sibling first and then renamed over the destination, so a crash mid-write
//! never leaves a half-written document under a final name. Hidden temp
//! names also keep in-flight files out of the traversal order.

use lopdf::Document;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use uuid::Uuid;

use crate::error::{BatesError, Result};

/// PDF writer with configurable output processing.
#[derive(Debug, Clone)]
pub struct PdfWriter {
    /// Compress streams before writing.
    compress: bool,
}

impl PdfWriter {
    /// Create a new PDF writer with default options.
    pub fn new() -> Self {
        Self { compress: true }
    }

    /// Create a writer that skips compression (faster, larger files).
    pub fn without_compression() -> Self {
        Self { compress: false }
    }

    /// Save a document, atomically replacing whatever is at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary file cannot be created, written,
    /// or renamed into place.
    pub fn save(&self, doc: &mut Document, path: &Path) -> Result<()> {
        if self.compress {
            doc.compress();
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "out.pdf".to_string());
        let temp_path =
            path.with_file_name(format!(".tmp-{}-{}", Uuid::new_v4().simple(), file_name));

        let file = fs::File::create(&temp_path).map_err(|e| BatesError::FailedToWrite {
            path: temp_path.clone(),
            source: e,
        })?;

        let mut writer = BufWriter::new(file);
        doc.save_to(&mut writer)
            .map_err(|e| BatesError::FailedToWrite {
                path: temp_path.clone(),
                source: std::io::Error::other(e),
            })?;
        writer.flush().map_err(|e| BatesError::FailedToWrite {
            path: temp_path.clone(),
            source: e,
        })?;

        fs::rename(&temp_path, path).map_err(|e| BatesError::FailedToWrite {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}
