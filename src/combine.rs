//! Final assembly: concatenate all labeled PDFs into one document.
//!
//! Files are ordered by their label's start number — numeric order, not
//! traversal order; the two coincide only because allocation and traversal
//! stayed consistent. The output is named from the root's aggregated range:
//! `CF 0001- CF 0244.pdf`, preserved literally with no space normalization.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use lopdf::{Document, Object, ObjectId};

use crate::config::{PipelineConfig, PDF_EXT};
use crate::error::{BatesError, Result};
use crate::folders::FolderRange;
use crate::io::{PdfReader, PdfWriter};
use crate::transform::stamp::label_of;
use crate::walk::{extension_of, ordered_files};

/// Result of an assembly pass.
#[derive(Debug)]
pub struct AssembleOutcome {
    /// Path of the combined document.
    pub output: PathBuf,

    /// Number of source files concatenated.
    pub files: usize,

    /// Total pages in the combined document.
    pub pages: usize,

    /// Per-file read failures; their pages were skipped.
    pub errors: Vec<String>,
}

/// Concatenates labeled PDFs in label order.
pub struct CombinedPdfAssembler {
    reader: PdfReader,
    writer: PdfWriter,
}

impl CombinedPdfAssembler {
    /// Create a new assembler.
    pub fn new() -> Self {
        Self {
            reader: PdfReader::new(),
            writer: PdfWriter::new(),
        }
    }

    /// The combined output path for a root with the given range.
    pub fn output_path(root: &Path, range: &FolderRange, config: &PipelineConfig) -> PathBuf {
        let name = format!(
            "{p} {min:0w$}- {p} {max:0w$}.pdf",
            p = config.prefix,
            min = range.min,
            max = range.max,
            w = config.digits,
        );
        root.join(name)
    }

    /// Collect the labeled PDFs under `root`, sorted by start number.
    pub fn collect_sources(root: &Path) -> Vec<(u32, PathBuf)> {
        let mut sources: Vec<(u32, PathBuf)> = ordered_files(root)
            .filter(|path| extension_of(path).as_deref() == Some(PDF_EXT))
            .filter_map(|path| {
                let label = label_of(&path)?;
                Some((label.start, path))
            })
            .collect();
        sources.sort_by_key(|(start, _)| *start);
        sources
    }

    /// Assemble the combined PDF.
    ///
    /// Returns `Ok(None)` when the root has no valid aggregated range or no
    /// labeled PDFs exist — informational, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error only if the output document cannot be written.
    /// Individual source failures are collected into the outcome.
    pub fn assemble(
        &self,
        root: &Path,
        ranges: &BTreeMap<PathBuf, FolderRange>,
        config: &PipelineConfig,
    ) -> Result<Option<AssembleOutcome>> {
        let Some(root_range) = ranges.get(root) else {
            return Ok(None);
        };
        if !root_range.is_valid() {
            return Ok(None);
        }

        let sources = Self::collect_sources(root);
        if sources.is_empty() {
            return Ok(None);
        }

        let mut errors = Vec::new();
        let mut merged: Option<Document> = None;
        let mut files = 0usize;

        for (_, path) in &sources {
            let doc = match self.reader.load(path) {
                Ok(doc) => doc,
                Err(e) => {
                    errors.push(format!("skipping {} while combining: {e}", path.display()));
                    continue;
                }
            };

            files += 1;
            match merged.as_mut() {
                None => merged = Some(doc),
                Some(base) => {
                    if let Err(e) = append_document(base, doc) {
                        errors.push(format!(
                            "skipping {} while combining: {e}",
                            path.display()
                        ));
                        files -= 1;
                    }
                }
            }
        }

        let Some(mut merged) = merged else {
            return Ok(None);
        };

        merged.renumber_objects();
        let pages = merged.get_pages().len();

        let output = Self::output_path(root, root_range, config);
        self.writer.save(&mut merged, &output)?;

        Ok(Some(AssembleOutcome {
            output,
            files,
            pages,
            errors,
        }))
    }
}

impl Default for CombinedPdfAssembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Append every page of `doc` to `base`.
///
/// Objects are renumbered past `base.max_id` to avoid ID conflicts, the
/// object maps merged, and the new page references spliced into the base
/// page tree's Kids array with the Count fixed up.
fn append_document(base: &mut Document, mut doc: Document) -> Result<()> {
    doc.renumber_objects_with(base.max_id + 1);
    base.max_id = doc.max_id;

    let new_pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
    base.objects.extend(doc.objects);

    let pages_id = base
        .catalog_mut()
        .map_err(|e| BatesError::other(format!("failed to get catalog: {e}")))?
        .get(b"Pages")
        .and_then(|p| p.as_reference())
        .map_err(|e| BatesError::other(format!("failed to get pages reference: {e}")))?;

    let pages_obj = base
        .get_object_mut(pages_id)
        .map_err(|e| BatesError::other(format!("failed to get pages object: {e}")))?;

    match pages_obj {
        Object::Dictionary(dict) => {
            let kids = dict
                .get_mut(b"Kids")
                .map_err(|_| BatesError::other("pages dictionary missing Kids array"))?;

            match kids {
                Object::Array(kids_array) => {
                    for page_id in &new_pages {
                        kids_array.push(Object::Reference(*page_id));
                    }
                }
                _ => return Err(BatesError::other("Kids is not an array")),
            }

            let current = dict.get(b"Count").and_then(|c| c.as_i64()).unwrap_or(0);
            dict.set("Count", Object::Integer(current + new_pages.len() as i64));
        }
        _ => return Err(BatesError::other("pages object is not a dictionary")),
    }

    Ok(())
}
