// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF inspection — open existing PDF documents and report page counts and
// page geometry using the `lopdf` crate.

use std::path::Path;

use lopdf::{Document, Object, ObjectId};
use tracing::{debug, instrument};

use scanwerk_core::error::{Result, ScanwerkError};

/// Read-only view of an existing PDF file.
///
/// Wraps `lopdf::Document` for sanity-checking combined output: page counts
/// and per-page media box sizes.
pub struct PdfInspector {
    /// The underlying lopdf document.
    document: Document,
}

impl PdfInspector {
    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();
        let document = Document::load(path_ref).map_err(|err| {
            ScanwerkError::Combine(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");
        Ok(Self { document })
    }

    /// Create an inspector from raw PDF bytes already in memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data).map_err(|err| {
            ScanwerkError::Combine(format!("failed to load PDF from memory: {}", err))
        })?;
        Ok(Self { document })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Width and height of each page in PDF points, in page order.
    pub fn page_sizes_pt(&self) -> Result<Vec<(f32, f32)>> {
        self.document
            .get_pages()
            .values()
            .map(|&page_id| self.media_box(page_id))
            .collect()
    }

    /// Resolve a page's /MediaBox, walking up the page tree for inherited
    /// values.
    fn media_box(&self, page_id: ObjectId) -> Result<(f32, f32)> {
        let mut current = page_id;
        loop {
            let dict = self.document.get_dictionary(current).map_err(|err| {
                ScanwerkError::Combine(format!("cannot read page dictionary: {err}"))
            })?;

            if let Ok(media_box) = dict.get(b"MediaBox") {
                let media_box = match media_box {
                    Object::Reference(id) => self.document.get_object(*id).map_err(|err| {
                        ScanwerkError::Combine(format!("cannot resolve /MediaBox: {err}"))
                    })?,
                    other => other,
                };
                let Object::Array(values) = media_box else {
                    return Err(ScanwerkError::Combine("/MediaBox is not an array".into()));
                };
                let coords: Vec<f32> = values.iter().filter_map(|v| v.as_float().ok()).collect();
                if coords.len() != 4 {
                    return Err(ScanwerkError::Combine(format!(
                        "malformed /MediaBox with {} entries",
                        values.len()
                    )));
                }
                return Ok((coords[2] - coords[0], coords[3] - coords[1]));
            }

            // MediaBox may be inherited from an ancestor /Pages node.
            match dict.get(b"Parent") {
                Ok(Object::Reference(parent)) => current = *parent,
                _ => {
                    return Err(ScanwerkError::Combine(format!(
                        "page {page_id:?} has no /MediaBox"
                    )));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_garbage_is_an_error() {
        assert!(matches!(
            PdfInspector::from_bytes(b"certainly not a PDF"),
            Err(ScanwerkError::Combine(_))
        ));
    }
}
