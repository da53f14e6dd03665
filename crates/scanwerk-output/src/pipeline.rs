// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output pipeline — from the ordered page files of one finished session to
// placed archive artifacts.
//
// PDF output combines all pages into one document, staged in a temp file and
// placed once.  Every other format places each page image as its own
// artifact.  A session that produced zero pages is a failure for every
// format, never a silent no-op.

use std::io::Write;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use scanwerk_core::error::{Result, ScanwerkError};
use scanwerk_core::types::{OutputFormat, PageFile, PlacementResult};
use scanwerk_core::ScanOptions;

use crate::combine::PdfCombiner;
use crate::placement::{open_path, Placer};

/// What the pipeline produced, in placement order.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub placements: Vec<PlacementResult>,
}

impl PipelineReport {
    /// Primary artifact paths, one per placement.
    pub fn primary_paths(&self) -> impl Iterator<Item = &std::path::Path> {
        self.placements.iter().map(|p| p.primary.as_path())
    }
}

/// Runs format selection, combination, and placement for one session.
pub struct OutputPipeline {
    options: ScanOptions,
}

impl OutputPipeline {
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    /// Place the session's pages according to the configured format.
    ///
    /// Returns the placements in output order.  Every page is attempted; the
    /// run still fails when any primary artifact could not be placed, and
    /// artifacts already placed stay where they are.
    #[instrument(skip_all, fields(pages = pages.len(), format = ?self.options.format))]
    pub fn run(&self, pages: &[PageFile]) -> Result<PipelineReport> {
        if pages.is_empty() {
            return Err(ScanwerkError::NoPages);
        }
        debug!(pages = pages.len(), "placing scan output");

        let placer = Placer::from_options(&self.options);
        let placements = if self.options.format.is_pdf() {
            vec![self.place_combined(&placer, pages)?]
        } else {
            let extension = self.options.format.extension();
            let mut placements = Vec::with_capacity(pages.len());
            let mut failed = 0usize;
            for page in pages {
                match placer.place(&page.path, extension) {
                    Ok(placement) => placements.push(placement),
                    Err(err) => {
                        failed += 1;
                        warn!(page = %page.path.display(), %err, "page not placed; continuing");
                    }
                }
            }
            if failed > 0 {
                return Err(ScanwerkError::Placement(format!(
                    "{failed} of {} pages could not be placed",
                    pages.len()
                )));
            }
            placements
        };

        info!(artifacts = placements.len(), "scan output placed");

        if self.options.open_after_save {
            for placement in &placements {
                open_path(&placement.primary);
            }
        }

        Ok(PipelineReport { placements })
    }

    /// Combine all pages into one PDF, stage it in a temp file, place once.
    fn place_combined(&self, placer: &Placer, pages: &[PageFile]) -> Result<PlacementResult> {
        let title = self
            .options
            .name
            .clone()
            .unwrap_or_else(|| "Scanned document".into());
        let bytes = PdfCombiner::new(title, self.options.resolution_dpi).combine(pages)?;

        let mut staged = tempfile::Builder::new()
            .prefix("scanwerk-")
            .suffix(".pdf")
            .tempfile()?;
        staged.write_all(&bytes)?;
        staged.flush()?;

        placer.place(staged.path(), OutputFormat::Pdf.extension())
    }
}
