// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanwerk — Core types, configuration, and error definitions shared across
// all crates.

pub mod catalog;
pub mod config;
pub mod error;
pub mod types;

pub use config::ScanOptions;
pub use error::{Result, ScanwerkError};
pub use types::{
    ColorMode, DiscoveredScanner, OutputFormat, PageFile, PlacementResult, SessionId, UnitKind,
};
