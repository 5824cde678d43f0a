//! Error types for pdfbates.
//!
//! Two families of failure exist in a production run and they propagate
//! differently:
//!
//! - **Fatal** conditions halt the whole run before further mutation:
//!   blocked file types, duplicate rename destinations, a page-count
//!   mismatch during stamping, an invalid root, or a failed rename
//!   transaction. `is_fatal` identifies these.
//! - **Per-item** conditions (a single unreadable PDF, one failed
//!   conversion, one folder that would not rename) are accumulated into the
//!   pipeline result and the run continues.

use std::io;
use std::path::PathBuf;

/// Result type alias for pdfbates operations.
pub type Result<T> = std::result::Result<T, BatesError>;

/// Main error type for pdfbates operations.
#[derive(Debug, thiserror::Error)]
pub enum BatesError {
    /// Root path does not exist or is not a directory.
    #[error("root folder not found or not a directory: {}", .path.display())]
    InvalidRoot {
        /// The offending root path.
        path: PathBuf,
    },

    /// Files with blocked extensions (.doc/.eml/.msg) are present.
    #[error("blocked file types detected (.doc/.eml/.msg):\n{}", join_paths(.files))]
    BlockedFiles {
        /// Every blocking file found in the tree.
        files: Vec<PathBuf>,
    },

    /// Two or more rename operations share a destination.
    #[error("multiple files planned for the same destination:\n{}", join_paths(.destinations))]
    DuplicateDestinations {
        /// The contested destination paths.
        destinations: Vec<PathBuf>,
    },

    /// A filename's declared Bates range disagrees with the PDF's page count.
    #[error(
        "bates mismatch for {}: filename implies {expected} page(s), PDF has {actual}",
        .path.display()
    )]
    PageCountMismatch {
        /// The PDF whose name states the wrong range.
        path: PathBuf,
        /// Pages implied by the filename range.
        expected: usize,
        /// Pages actually in the PDF.
        actual: usize,
    },

    /// The two-phase rename transaction failed.
    #[error("rename failed for {}: {source}", .path.display())]
    RenameFailed {
        /// Path being staged or committed.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to load or parse a PDF file.
    #[error("failed to load PDF {}: {reason}", .path.display())]
    FailedToLoadPdf {
        /// Path to the PDF file.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// Failed to write an output file.
    #[error("failed to write {}: {source}", .path.display())]
    FailedToWrite {
        /// Path being written.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// No conversion backend is configured for this document type.
    #[error("no conversion backend available for {}", .path.display())]
    ConversionUnavailable {
        /// Document that needed converting.
        path: PathBuf,
    },

    /// A document conversion was attempted and failed.
    #[error("conversion failed for {}: {reason}", .path.display())]
    ConversionFailed {
        /// Document that failed to convert.
        path: PathBuf,
        /// Reason reported by the gateway.
        reason: String,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// What is wrong with the configuration.
        message: String,
    },

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n")
}

impl From<lopdf::Error> for BatesError {
    fn from(err: lopdf::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl BatesError {
    /// Create an InvalidRoot error.
    pub fn invalid_root(path: PathBuf) -> Self {
        Self::InvalidRoot { path }
    }

    /// Create a FailedToLoadPdf error.
    pub fn failed_to_load_pdf(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::FailedToLoadPdf {
            path,
            reason: reason.into(),
        }
    }

    /// Create a ConversionFailed error.
    pub fn conversion_failed(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::ConversionFailed {
            path,
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Check if this error must halt the entire run.
    ///
    /// Fatal errors short-circuit before any further mutation; everything
    /// else is accumulated per item and the run continues.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InvalidRoot { .. }
                | Self::BlockedFiles { .. }
                | Self::DuplicateDestinations { .. }
                | Self::PageCountMismatch { .. }
                | Self::RenameFailed { .. }
        )
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidConfig { .. } => 1,
            Self::Other { .. } => 1,
            Self::InvalidRoot { .. } => 2,
            Self::FailedToLoadPdf { .. } => 3,
            Self::ConversionUnavailable { .. } => 3,
            Self::ConversionFailed { .. } => 3,
            Self::BlockedFiles { .. } => 4,
            Self::DuplicateDestinations { .. } => 4,
            Self::FailedToWrite { .. } => 5,
            Self::RenameFailed { .. } => 5,
            Self::Io { .. } => 5,
            Self::PageCountMismatch { .. } => 6,
        }
    }
}
