// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-run scan configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, ScanwerkError};
use crate::types::{ColorMode, OutputFormat, UnitKind};

/// Everything one scan run needs to know, assembled by the CLI and treated as
/// immutable from there on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanOptions {
    /// Which functional unit to drive. The feeder is the default; `--flatbed`
    /// switches to the glass bed.
    pub unit_kind: UnitKind,
    /// Requested resolution in DPI. The session rounds this up to the nearest
    /// value the unit supports.
    pub resolution_dpi: u32,
    pub color_mode: ColorMode,
    pub format: OutputFormat,
    /// Explicitly named document type (catalog key, e.g. "a4", "uslegal").
    /// Takes precedence over the shorthand flags below.
    pub document_type: Option<String>,
    pub use_legal: bool,
    pub use_a4: bool,
    pub use_ledger: bool,
    /// Scan both sides of each sheet (feeder only, and only if the unit
    /// supports it).
    pub duplex: bool,
    /// Interactive batch mode: prompt after every pass whether to keep going.
    pub batch: bool,
    /// Root directory artifacts are filed under. Required.
    pub output_root: PathBuf,
    /// Directory the device downloads page images into.
    pub download_dir: PathBuf,
    /// Explicit base file name; a `scan_HHMMSS` timestamp is used when absent.
    pub name: Option<String>,
    /// Ordered tag list. The first tag owns the physical file, later tags get
    /// symlink aliases.
    pub tags: Vec<String>,
    pub open_after_save: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            unit_kind: UnitKind::Feeder,
            resolution_dpi: 150,
            color_mode: ColorMode::Color,
            format: OutputFormat::Pdf,
            document_type: None,
            use_legal: false,
            use_a4: false,
            use_ledger: false,
            duplex: false,
            batch: false,
            output_root: PathBuf::new(),
            download_dir: std::env::temp_dir(),
            name: None,
            tags: Vec::new(),
            open_after_save: false,
        }
    }
}

impl ScanOptions {
    /// Check the options before any device work starts.
    ///
    /// The output root is a required value: running without one would leave
    /// placement with no idea where artifacts belong.
    pub fn validate(&self) -> Result<()> {
        if self.output_root.as_os_str().is_empty() {
            return Err(ScanwerkError::Config(
                "no output directory configured".into(),
            ));
        }
        if self.resolution_dpi == 0 {
            return Err(ScanwerkError::Config(
                "resolution must be at least 1 dpi".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_prefer_feeder_pdf_color() {
        let opts = ScanOptions::default();
        assert_eq!(opts.unit_kind, UnitKind::Feeder);
        assert_eq!(opts.resolution_dpi, 150);
        assert_eq!(opts.color_mode, ColorMode::Color);
        assert_eq!(opts.format, OutputFormat::Pdf);
        assert!(!opts.batch);
        assert!(opts.tags.is_empty());
    }

    #[test]
    fn validate_rejects_missing_output_root() {
        let opts = ScanOptions::default();
        assert!(matches!(
            opts.validate(),
            Err(ScanwerkError::Config(_))
        ));
    }

    #[test]
    fn validate_rejects_zero_resolution() {
        let opts = ScanOptions {
            output_root: PathBuf::from("/tmp/archive"),
            resolution_dpi: 0,
            ..ScanOptions::default()
        };
        assert!(opts.validate().is_err());
    }

    #[test]
    fn validate_accepts_complete_options() {
        let opts = ScanOptions {
            output_root: PathBuf::from("/tmp/archive"),
            ..ScanOptions::default()
        };
        assert!(opts.validate().is_ok());
    }
}
