// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanwerk Output — PDF combination, archive placement, and the pipeline
// that turns a finished session's page files into final artifacts.

pub mod combine;
pub mod inspect;
pub mod pipeline;
pub mod placement;

pub use combine::PdfCombiner;
pub use inspect::PdfInspector;
pub use pipeline::{OutputPipeline, PipelineReport};
pub use placement::Placer;
