//! pdfbates - Bates-number, rename, and stamp a document production tree.
//!
//! This library implements the sequencing, renaming, and stamping pipeline
//! used for legal-style document productions:
//!
//! - Deterministic natural-order traversal
//! - Item classification and page accounting
//! - Contiguous, gapless Bates range allocation
//! - Collision-safe two-phase renaming
//! - US Letter page normalization
//! - Per-page label stamping with a filename/page-count consistency check
//! - Directory range rollup and renaming
//! - Final combined-PDF assembly
//!
//! # Examples
//!
//! ```no_run
//! use pdfbates::config::PipelineConfig;
//! use pdfbates::convert::NoConversion;
//! use pdfbates::output::OutputFormatter;
//! use pdfbates::pipeline::Pipeline;
//! use std::path::PathBuf;
//!
//! # fn example() -> pdfbates::Result<()> {
//! let config = PipelineConfig {
//!     root: PathBuf::from("/cases/production"),
//!     dry_run: true,
//!     ..Default::default()
//! };
//!
//! let gateway = NoConversion;
//! let out = OutputFormatter::from_config(&config);
//! let result = Pipeline::new(&config, &gateway, &out).run()?;
//! println!("{} items, {} pages", result.total_items, result.total_pages);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod allocate;
pub mod backup;
pub mod cli;
pub mod combine;
pub mod config;
pub mod convert;
pub mod error;
pub mod folders;
pub mod io;
pub mod label;
pub mod output;
pub mod pipeline;
pub mod plan;
pub mod rename;
pub mod transform;
pub mod walk;

// Re-export commonly used types
pub use config::PipelineConfig;
pub use error::{BatesError, Result};
pub use pipeline::{Pipeline, PipelineResult};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
