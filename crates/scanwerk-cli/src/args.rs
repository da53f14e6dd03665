// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line surface.  Argument structs map one-to-one onto `ScanOptions`;
// nothing here validates device capabilities, that happens when the unit is
// configured.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use scanwerk_core::types::{ColorMode, OutputFormat, UnitKind};
use scanwerk_core::ScanOptions;

#[derive(Debug, Parser)]
#[command(name = "scanwerk", version, about = "Scan documents and file them into a tagged archive")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbose logging (or set RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a scan and place the result in the archive
    Scan(ScanArgs),
    /// List scanners advertised on the local network
    List(ListArgs),
}

#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Tags to file the scan under; the first tag owns the file, later tags
    /// become links
    pub tags: Vec<String>,

    /// Scan from the flatbed glass instead of the document feeder
    #[arg(long)]
    pub flatbed: bool,

    /// Scan both sides of each sheet (feeder only)
    #[arg(long)]
    pub duplex: bool,

    /// Prompt between scan passes and keep appending pages
    #[arg(long)]
    pub batch: bool,

    /// 1-bit monochrome instead of color
    #[arg(long)]
    pub mono: bool,

    /// Scan resolution in DPI; rounds up to the nearest supported value
    #[arg(short, long, default_value_t = 150)]
    pub resolution: u32,

    /// Output format
    #[arg(long, value_enum, default_value_t = FormatArg::Pdf)]
    pub format: FormatArg,

    /// Paper size by catalog name (e.g. a4, uslegal, 4r)
    #[arg(long)]
    pub doctype: Option<String>,

    /// Shorthand for --doctype uslegal
    #[arg(long)]
    pub legal: bool,

    /// Shorthand for --doctype a4
    #[arg(long)]
    pub a4: bool,

    /// Shorthand for --doctype usledger
    #[arg(long)]
    pub ledger: bool,

    /// Base file name instead of the scan_HHMMSS default
    #[arg(short, long)]
    pub name: Option<String>,

    /// Archive root directory
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Open the result in its default handler after filing
    #[arg(long)]
    pub open: bool,

    /// Sheets the virtual feeder loads per pass
    #[arg(long, default_value_t = 1)]
    pub pages: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Pdf,
    Jpeg,
    Tiff,
    Png,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Pdf => OutputFormat::Pdf,
            FormatArg::Jpeg => OutputFormat::Jpeg,
            FormatArg::Tiff => OutputFormat::Tiff,
            FormatArg::Png => OutputFormat::Png,
        }
    }
}

impl ScanArgs {
    /// Build the run options.  Page images download to the system temp
    /// directory before placement copies them into the archive.
    pub fn to_options(&self) -> ScanOptions {
        ScanOptions {
            unit_kind: if self.flatbed {
                UnitKind::Flatbed
            } else {
                UnitKind::Feeder
            },
            resolution_dpi: self.resolution,
            color_mode: if self.mono {
                ColorMode::Monochrome
            } else {
                ColorMode::Color
            },
            format: self.format.into(),
            document_type: self.doctype.clone(),
            use_legal: self.legal,
            use_a4: self.a4,
            use_ledger: self.ledger,
            duplex: self.duplex,
            batch: self.batch,
            output_root: self.dir.clone().unwrap_or_else(default_output_root),
            download_dir: std::env::temp_dir(),
            name: self.name.clone(),
            tags: self.tags.clone(),
            open_after_save: self.open,
        }
    }
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Seconds to browse before reporting
    #[arg(long, default_value_t = 5)]
    pub browse_secs: u64,

    /// Emit JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// `~/Documents/Archive`, matching where the placement layer expects to file.
fn default_output_root() -> PathBuf {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("Archive")
}
