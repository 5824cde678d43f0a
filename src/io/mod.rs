//! Low-level PDF file I/O.
//!
//! Reading (with page-count verification) and atomic writing are shared by
//! every phase that touches a PDF on disk.

pub mod reader;
pub mod writer;

pub use reader::PdfReader;
pub use writer::PdfWriter;
