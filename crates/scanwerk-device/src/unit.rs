// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Functional-unit model and configuration.
//
// A scanner exposes one or more functional units (flatbed, document feeder),
// each with its own resolution ladder and supported document types. Settings
// for a scan pass are derived here from the run options and the selected
// unit's capabilities.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use scanwerk_core::catalog::{self, DocumentTypeId};
use scanwerk_core::error::{Result, ScanwerkError};
use scanwerk_core::types::{ColorMode, UnitKind};
use scanwerk_core::ScanOptions;

/// Base name the device uses for page files it downloads.
const DOCUMENT_NAME: &str = "scan";

/// A rectangle on the scan bed, in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanArea {
    pub width_in: f32,
    pub height_in: f32,
}

/// Per-kind capabilities of a functional unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UnitDetail {
    /// Glass bed with a fixed physical size.
    Flatbed { bed: ScanArea },
    /// Automatic document feeder.
    Feeder { duplex_capable: bool },
}

/// One hardware scanning mode as reported by the device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionalUnit {
    /// Supported resolutions in DPI, ascending.
    pub resolutions: Vec<u32>,
    /// Document types the unit declares support for.
    pub document_types: Vec<DocumentTypeId>,
    pub detail: UnitDetail,
}

impl FunctionalUnit {
    pub fn kind(&self) -> UnitKind {
        match self.detail {
            UnitDetail::Flatbed { .. } => UnitKind::Flatbed,
            UnitDetail::Feeder { .. } => UnitKind::Feeder,
        }
    }

    pub fn duplex_capable(&self) -> bool {
        matches!(self.detail, UnitDetail::Feeder {
            duplex_capable: true
        })
    }
}

/// Everything `ScanDevice::configure` needs for one scan pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSettings {
    /// Resolved resolution, guaranteed to be one the unit supports.
    pub resolution_dpi: u32,
    pub color_mode: ColorMode,
    /// Document type to feed through (feeder only).
    pub document_type: Option<DocumentTypeId>,
    /// Scan both sides of each sheet (feeder only).
    pub duplex: bool,
    /// Area to expose (flatbed only; the full bed).
    pub scan_area: Option<ScanArea>,
    /// Directory the device downloads page images into.
    pub download_dir: PathBuf,
    /// Base name for downloaded page files.
    pub document_name: String,
    /// Extension of the per-page image format the device should produce.
    pub page_extension: &'static str,
}

/// Pick the resolution the unit will actually run at.
///
/// Returns the smallest supported value that is at least `requested`; a
/// request above everything the unit supports clamps to the maximum. `None`
/// only when the unit reports no resolutions at all.
pub fn resolve_resolution(supported: &[u32], requested: u32) -> Option<u32> {
    supported
        .iter()
        .copied()
        .find(|&dpi| dpi >= requested)
        .or_else(|| supported.last().copied())
}

/// Derive the settings for a scan pass from the run options and the selected
/// unit.
///
/// For feeders the document type is chosen with the precedence: explicitly
/// named type, then the legal / a4 / ledger shorthands, then US Letter. An
/// explicit name the catalog cannot resolve is a fatal configuration error —
/// the caller must not start a scan after it.
pub fn build_unit_settings(unit: &FunctionalUnit, options: &ScanOptions) -> Result<UnitSettings> {
    let resolution_dpi = resolve_resolution(&unit.resolutions, options.resolution_dpi)
        .ok_or_else(|| {
            ScanwerkError::Device("functional unit reports no supported resolutions".into())
        })?;

    let (document_type, duplex, scan_area) = match unit.detail {
        UnitDetail::Feeder { .. } => (
            Some(feeder_document_type(options)?),
            options.duplex,
            None,
        ),
        UnitDetail::Flatbed { bed } => (None, false, Some(bed)),
    };

    Ok(UnitSettings {
        resolution_dpi,
        color_mode: options.color_mode,
        document_type,
        duplex,
        scan_area,
        download_dir: options.download_dir.clone(),
        document_name: DOCUMENT_NAME.to_string(),
        page_extension: options.format.page_extension(),
    })
}

/// Document type for a feeder pass.
fn feeder_document_type(options: &ScanOptions) -> Result<DocumentTypeId> {
    if let Some(name) = &options.document_type {
        return catalog::resolve(name)
            .ok_or_else(|| ScanwerkError::UnknownDocumentType(name.clone()));
    }
    if options.use_legal {
        return Ok(DocumentTypeId::UsLegal);
    }
    if options.use_a4 {
        return Ok(DocumentTypeId::A4);
    }
    if options.use_ledger {
        return Ok(DocumentTypeId::UsLedger);
    }
    Ok(DocumentTypeId::UsLetter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanwerk_core::types::OutputFormat;

    fn feeder() -> FunctionalUnit {
        FunctionalUnit {
            resolutions: vec![75, 100, 150, 200, 300, 600],
            document_types: vec![
                DocumentTypeId::UsLetter,
                DocumentTypeId::UsLegal,
                DocumentTypeId::A4,
            ],
            detail: UnitDetail::Feeder {
                duplex_capable: true,
            },
        }
    }

    fn flatbed() -> FunctionalUnit {
        FunctionalUnit {
            resolutions: vec![75, 150, 300],
            document_types: vec![DocumentTypeId::Default],
            detail: UnitDetail::Flatbed {
                bed: ScanArea {
                    width_in: 8.5,
                    height_in: 11.69,
                },
            },
        }
    }

    #[test]
    fn resolution_exact_match_is_kept() {
        assert_eq!(resolve_resolution(&[75, 150, 300], 150), Some(150));
    }

    #[test]
    fn resolution_rounds_up_to_next_supported() {
        assert_eq!(resolve_resolution(&[75, 150, 300], 151), Some(300));
        assert_eq!(resolve_resolution(&[75, 150, 300], 80), Some(150));
    }

    #[test]
    fn resolution_below_minimum_picks_smallest() {
        assert_eq!(resolve_resolution(&[75, 150, 300], 10), Some(75));
    }

    #[test]
    fn resolution_above_maximum_clamps() {
        assert_eq!(resolve_resolution(&[75, 150, 300], 1200), Some(300));
    }

    #[test]
    fn resolution_none_for_empty_ladder() {
        assert_eq!(resolve_resolution(&[], 150), None);
    }

    #[test]
    fn feeder_defaults_to_us_letter() {
        let settings = build_unit_settings(&feeder(), &ScanOptions::default())
            .expect("settings");
        assert_eq!(settings.document_type, Some(DocumentTypeId::UsLetter));
        assert_eq!(settings.resolution_dpi, 150);
        assert!(settings.scan_area.is_none());
    }

    #[test]
    fn explicit_name_beats_shorthand_flags() {
        let options = ScanOptions {
            document_type: Some("a5".into()),
            use_legal: true,
            use_a4: true,
            use_ledger: true,
            ..ScanOptions::default()
        };
        let settings = build_unit_settings(&feeder(), &options).expect("settings");
        assert_eq!(settings.document_type, Some(DocumentTypeId::A5));
    }

    #[test]
    fn shorthand_precedence_is_legal_a4_ledger() {
        let options = ScanOptions {
            use_legal: true,
            use_a4: true,
            use_ledger: true,
            ..ScanOptions::default()
        };
        let settings = build_unit_settings(&feeder(), &options).expect("settings");
        assert_eq!(settings.document_type, Some(DocumentTypeId::UsLegal));

        let options = ScanOptions {
            use_a4: true,
            use_ledger: true,
            ..ScanOptions::default()
        };
        let settings = build_unit_settings(&feeder(), &options).expect("settings");
        assert_eq!(settings.document_type, Some(DocumentTypeId::A4));

        let options = ScanOptions {
            use_ledger: true,
            ..ScanOptions::default()
        };
        let settings = build_unit_settings(&feeder(), &options).expect("settings");
        assert_eq!(settings.document_type, Some(DocumentTypeId::UsLedger));
    }

    #[test]
    fn unresolvable_explicit_name_is_fatal() {
        let options = ScanOptions {
            document_type: Some("letterish".into()),
            ..ScanOptions::default()
        };
        assert!(matches!(
            build_unit_settings(&feeder(), &options),
            Err(ScanwerkError::UnknownDocumentType(name)) if name == "letterish"
        ));
    }

    #[test]
    fn flatbed_exposes_full_bed_and_no_document_type() {
        let options = ScanOptions {
            unit_kind: UnitKind::Flatbed,
            use_a4: true,
            duplex: true,
            ..ScanOptions::default()
        };
        let settings = build_unit_settings(&flatbed(), &options).expect("settings");
        assert_eq!(settings.document_type, None);
        assert!(!settings.duplex);
        assert_eq!(
            settings.scan_area,
            Some(ScanArea {
                width_in: 8.5,
                height_in: 11.69,
            })
        );
    }

    #[test]
    fn page_extension_follows_output_format() {
        let options = ScanOptions {
            format: OutputFormat::Tiff,
            ..ScanOptions::default()
        };
        let settings = build_unit_settings(&feeder(), &options).expect("settings");
        assert_eq!(settings.page_extension, "tif");

        let settings = build_unit_settings(&feeder(), &ScanOptions::default())
            .expect("settings");
        assert_eq!(settings.page_extension, "jpg");
    }

    #[test]
    fn duplex_flag_is_carried_for_feeders() {
        let options = ScanOptions {
            duplex: true,
            ..ScanOptions::default()
        };
        let settings = build_unit_settings(&feeder(), &options).expect("settings");
        assert!(settings.duplex);
    }
}
