// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Scanwerk.

use thiserror::Error;

/// Top-level error type for all Scanwerk operations.
#[derive(Debug, Error)]
pub enum ScanwerkError {
    // -- Discovery / session errors --
    #[error("scanner discovery failed: {0}")]
    Discovery(String),

    #[error("could not open a session with the scanner: {0}")]
    SessionOpen(String),

    #[error("scanner session closed before the scan completed: {0}")]
    SessionClosed(String),

    #[error("scanner reported an error: {0}")]
    Device(String),

    #[error("scan did not complete: {0}")]
    ScanFailed(String),

    // -- Configuration errors --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("unknown document type: {0}")]
    UnknownDocumentType(String),

    // -- Output errors --
    #[error("no usable pages to output")]
    NoPages,

    #[error("PDF combination failed: {0}")]
    Combine(String),

    #[error("placement failed: {0}")]
    Placement(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Storage / serialization --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ScanwerkError>;
