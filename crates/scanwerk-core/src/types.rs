// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Scanwerk scanner driver.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;
use uuid::Uuid;

/// Unique identifier for one scan session, used to correlate log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two hardware scanning modes a scanner can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    /// Fixed glass bed; one sheet per pass.
    Flatbed,
    /// Automatic document feeder; many sheets per pass.
    Feeder,
}

impl std::fmt::Display for UnitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flatbed => write!(f, "flatbed"),
            Self::Feeder => write!(f, "feeder"),
        }
    }
}

/// Pixel format requested from the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorMode {
    /// Black-and-white, 1 bit per pixel.
    Monochrome,
    /// RGB, 8 bits per channel.
    Color,
}

impl ColorMode {
    /// Bit depth the scanner is configured with for this mode.
    pub fn bit_depth(&self) -> u8 {
        match self {
            Self::Monochrome => 1,
            Self::Color => 8,
        }
    }
}

/// Final output format for a scan run.
///
/// PDF is the default; the image formats place each page as its own file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Pdf,
    Jpeg,
    Tiff,
    Png,
}

impl OutputFormat {
    /// File extension of the final placed artifact.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Jpeg => "jpg",
            Self::Tiff => "tif",
            Self::Png => "png",
        }
    }

    /// Extension of the intermediate per-page image the device produces.
    ///
    /// PDF output is assembled from JPEG pages; TIFF and PNG are scanned
    /// natively in that format.
    pub fn page_extension(&self) -> &'static str {
        match self {
            Self::Tiff => "tif",
            Self::Png => "png",
            Self::Pdf | Self::Jpeg => "jpg",
        }
    }

    pub fn is_pdf(&self) -> bool {
        matches!(self, Self::Pdf)
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Pdf
    }
}

/// Reference to a temporary page image produced by one scan pass.
///
/// Ownership of the reference moves from the device to the session and on to
/// the output pipeline; the file itself is left to the OS temp-directory
/// lifecycle and never deleted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageFile {
    pub path: PathBuf,
}

impl PageFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl From<PathBuf> for PageFile {
    fn from(path: PathBuf) -> Self {
        Self { path }
    }
}

/// Where one placed artifact ended up.
///
/// The primary path is always a real file; every alias is a symbolic link
/// pointing at it, never a second copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementResult {
    pub primary: PathBuf,
    pub aliases: Vec<PathBuf>,
}

/// A scanner discovered on the local network via mDNS (eSCL/AirScan).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveredScanner {
    pub name: String,
    pub uri: String,
    pub ip: IpAddr,
    pub port: u16,
    pub make_and_model: Option<String>,
    pub location: Option<String>,
    /// Input sources advertised in the `is` TXT record (platen/adf).
    pub sources: Vec<UnitKind>,
    /// Color spaces advertised in the `cs` TXT record.
    pub color_spaces: Vec<String>,
    pub supports_duplex: bool,
    pub supports_tls: bool,
    /// When this scanner was last seen on the network.
    pub last_seen: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_format_extensions() {
        assert_eq!(OutputFormat::Pdf.extension(), "pdf");
        assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
        assert_eq!(OutputFormat::Tiff.extension(), "tif");
        assert_eq!(OutputFormat::Png.extension(), "png");
    }

    #[test]
    fn pdf_pages_are_scanned_as_jpeg() {
        assert_eq!(OutputFormat::Pdf.page_extension(), "jpg");
        assert_eq!(OutputFormat::Jpeg.page_extension(), "jpg");
        assert_eq!(OutputFormat::Tiff.page_extension(), "tif");
        assert_eq!(OutputFormat::Png.page_extension(), "png");
    }

    #[test]
    fn color_mode_bit_depths() {
        assert_eq!(ColorMode::Monochrome.bit_depth(), 1);
        assert_eq!(ColorMode::Color.bit_depth(), 8);
    }

    #[test]
    fn session_ids_are_unique() {
        assert_ne!(SessionId::new(), SessionId::new());
    }
}
