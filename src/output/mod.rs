//! User-facing output.
//!
//! Every message the pipeline prints goes through [`OutputFormatter`], which
//! owns quiet/verbose handling and terminal coloring. The library itself
//! never prints directly.

pub mod formatter;

pub use formatter::{MessageLevel, OutputFormatter};
