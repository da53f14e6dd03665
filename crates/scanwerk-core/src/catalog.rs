// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Static catalog of named paper-size document types.
//
// Pure data: lowercase lookup keys mapped to standard paper-size identifiers
// with their metric (and, where customary, imperial) dimensions. Feeder
// configuration resolves user-supplied names against this table; everything
// else only reads it for diagnostics.

use serde::{Deserialize, Serialize};

/// Standard paper-size identifiers a functional unit can declare support for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentTypeId {
    /// The platen size. Not valid for scanners without a platen.
    Default,
    A4,
    B5Jis,
    UsLetter,
    UsLegal,
    A5,
    IsoB4,
    IsoB6,
    UsLedger,
    UsExecutive,
    A3,
    IsoB3,
    A6,
    C4,
    C5,
    C6,
    FourA0,
    TwoA0,
    A0,
    A1,
    A2,
    A7,
    A8,
    A9,
    A10,
    IsoB0,
    IsoB1,
    IsoB2,
    IsoB5,
    IsoB7,
    IsoB8,
    IsoB9,
    IsoB10,
    JisB0,
    JisB1,
    JisB2,
    JisB3,
    JisB4,
    JisB6,
    JisB7,
    JisB8,
    JisB9,
    JisB10,
    C0,
    C1,
    C2,
    C3,
    C7,
    C8,
    C9,
    C10,
    UsStatement,
    BusinessCard,
    JapaneseE,
    Photo3R,
    Photo4R,
    Photo5R,
    Photo6R,
    Photo8R,
    Photo10R,
    PhotoS10R,
    Photo11R,
    Photo12R,
    PhotoS12R,
}

/// One row of the document-type table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DocumentTypeSpec {
    /// Lowercase lookup key as typed by the user.
    pub key: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    pub id: DocumentTypeId,
    /// Width x height in millimetres.
    pub metric_mm: Option<(f32, f32)>,
    /// Width x height in inches, for sizes customarily given imperial.
    pub imperial_in: Option<(f32, f32)>,
    /// Aspect ratio for photo print sizes.
    pub ratio: Option<&'static str>,
    pub notes: Option<&'static str>,
}

const fn entry(
    key: &'static str,
    name: &'static str,
    id: DocumentTypeId,
    metric_mm: Option<(f32, f32)>,
    imperial_in: Option<(f32, f32)>,
    ratio: Option<&'static str>,
) -> DocumentTypeSpec {
    DocumentTypeSpec {
        key,
        name,
        id,
        metric_mm,
        imperial_in,
        ratio,
        notes: None,
    }
}

use DocumentTypeId as Id;

/// Every document type this system knows about.
pub static DOCUMENT_TYPES: &[DocumentTypeSpec] = &[
    DocumentTypeSpec {
        key: "default",
        name: "Default",
        id: Id::Default,
        metric_mm: None,
        imperial_in: None,
        ratio: None,
        notes: Some("The platen size. Not valid for scanners without a platen."),
    },
    entry("a4", "A4", Id::A4, Some((210.0, 297.0)), None, None),
    entry("b5", "B5/JIS B5", Id::B5Jis, Some((182.0, 257.0)), None, None),
    entry("usletter", "US Letter", Id::UsLetter, Some((215.9, 279.4)), Some((8.5, 11.0)), None),
    entry("uslegal", "US Legal", Id::UsLegal, Some((215.9, 355.6)), Some((8.5, 14.0)), None),
    entry("a5", "A5", Id::A5, Some((148.0, 210.0)), None, None),
    entry("isob4", "B4/ISO B4", Id::IsoB4, Some((250.0, 353.0)), None, None),
    entry("isob6", "B6/ISO B6", Id::IsoB6, Some((125.0, 176.0)), None, None),
    entry("usledger", "US Ledger", Id::UsLedger, Some((279.4, 431.8)), Some((11.0, 17.0)), None),
    entry("usexecutive", "US Executive", Id::UsExecutive, Some((184.15, 266.7)), Some((7.25, 10.5)), None),
    entry("a3", "A3", Id::A3, Some((297.0, 420.0)), None, None),
    entry("isob3", "B3/ISO B3", Id::IsoB3, Some((353.0, 500.0)), None, None),
    entry("a6", "A6", Id::A6, Some((105.0, 148.0)), None, None),
    entry("c4", "C4", Id::C4, Some((229.0, 324.0)), None, None),
    entry("c5", "C5", Id::C5, Some((162.0, 229.0)), None, None),
    entry("c6", "C6", Id::C6, Some((114.0, 162.0)), None, None),
    entry("4a0", "4A0", Id::FourA0, Some((1682.0, 2378.0)), None, None),
    entry("2a0", "2A0", Id::TwoA0, Some((1189.0, 1682.0)), None, None),
    entry("a0", "A0", Id::A0, Some((841.0, 1189.0)), None, None),
    entry("a1", "A1", Id::A1, Some((594.0, 841.0)), None, None),
    entry("a2", "A2", Id::A2, Some((420.0, 594.0)), None, None),
    entry("a7", "A7", Id::A7, Some((74.0, 105.0)), None, None),
    entry("a8", "A8", Id::A8, Some((52.0, 74.0)), None, None),
    entry("a9", "A9", Id::A9, Some((37.0, 52.0)), None, None),
    entry("a10", "A10", Id::A10, Some((26.0, 37.0)), None, None),
    entry("isob0", "ISO B0", Id::IsoB0, Some((1000.0, 1414.0)), None, None),
    entry("isob1", "ISO B1", Id::IsoB1, Some((707.0, 1000.0)), None, None),
    entry("isob2", "ISO B2", Id::IsoB2, Some((500.0, 707.0)), None, None),
    entry("isob5", "ISO B5", Id::IsoB5, Some((176.0, 250.0)), None, None),
    entry("isob7", "ISO B7", Id::IsoB7, Some((88.0, 125.0)), None, None),
    entry("isob8", "ISO B8", Id::IsoB8, Some((62.0, 88.0)), None, None),
    entry("isob9", "ISO B9", Id::IsoB9, Some((44.0, 62.0)), None, None),
    entry("isob10", "ISO B10", Id::IsoB10, Some((31.0, 44.0)), None, None),
    entry("jisb0", "JIS B0", Id::JisB0, Some((1030.0, 1456.0)), None, None),
    entry("jisb1", "JIS B1", Id::JisB1, Some((728.0, 1030.0)), None, None),
    entry("jisb2", "JIS B2", Id::JisB2, Some((515.0, 728.0)), None, None),
    entry("jisb3", "JIS B3", Id::JisB3, Some((364.0, 515.0)), None, None),
    entry("jisb4", "JIS B4", Id::JisB4, Some((257.0, 364.0)), None, None),
    entry("jisb6", "JIS B6", Id::JisB6, Some((128.0, 182.0)), None, None),
    entry("jisb7", "JIS B7", Id::JisB7, Some((91.0, 128.0)), None, None),
    entry("jisb8", "JIS B8", Id::JisB8, Some((64.0, 91.0)), None, None),
    entry("jisb9", "JIS B9", Id::JisB9, Some((45.0, 64.0)), None, None),
    entry("jisb10", "JIS B10", Id::JisB10, Some((32.0, 45.0)), None, None),
    entry("c0", "C0", Id::C0, Some((917.0, 1297.0)), None, None),
    entry("c1", "C1", Id::C1, Some((648.0, 917.0)), None, None),
    entry("c2", "C2", Id::C2, Some((458.0, 648.0)), None, None),
    entry("c3", "C3", Id::C3, Some((324.0, 458.0)), None, None),
    entry("c7", "C7", Id::C7, Some((81.0, 114.0)), None, None),
    entry("c8", "C8", Id::C8, Some((57.0, 81.0)), None, None),
    entry("c9", "C9", Id::C9, Some((40.0, 57.0)), None, None),
    entry("c10", "C10", Id::C10, Some((28.0, 40.0)), None, None),
    entry("usstatement", "US Statement", Id::UsStatement, Some((139.7, 215.9)), Some((5.5, 8.5)), None),
    entry("businesscard", "Business Card", Id::BusinessCard, Some((90.0, 55.0)), None, None),
    entry("e", "Japanese E", Id::JapaneseE, Some((82.55, 120.65)), Some((3.25, 4.75)), None),
    entry("3r", "3R", Id::Photo3R, Some((88.9, 127.0)), Some((3.5, 5.0)), Some("7:10")),
    entry("4r", "4R", Id::Photo4R, Some((101.6, 152.4)), Some((4.0, 6.0)), Some("2:3")),
    entry("5r", "5R", Id::Photo5R, Some((127.0, 177.8)), Some((5.0, 7.0)), Some("5:7")),
    entry("6r", "6R", Id::Photo6R, Some((152.4, 203.2)), Some((6.0, 8.0)), Some("3:4")),
    entry("8r", "8R", Id::Photo8R, Some((203.2, 254.0)), Some((8.0, 10.0)), Some("4:5")),
    entry("10r", "10R", Id::Photo10R, Some((254.0, 304.8)), Some((10.0, 12.0)), Some("5:6")),
    entry("s10r", "S10R", Id::PhotoS10R, Some((254.0, 381.0)), Some((10.0, 15.0)), Some("2:3")),
    entry("11r", "11R", Id::Photo11R, Some((279.4, 355.6)), Some((11.0, 14.0)), None),
    entry("12r", "12R", Id::Photo12R, Some((304.8, 381.0)), Some((12.0, 15.0)), Some("4:5")),
    entry("s12r", "S12R", Id::PhotoS12R, Some((304.8, 457.2)), Some((12.0, 18.0)), Some("2:3")),
];

/// Resolve a user-supplied document-type name to its identifier.
///
/// Lookup is case-insensitive and ignores surrounding whitespace.
pub fn resolve(name: &str) -> Option<DocumentTypeId> {
    let key = name.trim().to_ascii_lowercase();
    DOCUMENT_TYPES.iter().find(|e| e.key == key).map(|e| e.id)
}

/// Full table row for an identifier.
pub fn spec_for(id: DocumentTypeId) -> Option<&'static DocumentTypeSpec> {
    DOCUMENT_TYPES.iter().find(|e| e.id == id)
}

/// Sorted lookup keys for the document types in `ids`.
///
/// Used for diagnostics when a functional unit reports what it supports; the
/// selection logic never consults this.
pub fn supported_names(ids: &[DocumentTypeId]) -> Vec<&'static str> {
    let mut names: Vec<&'static str> = DOCUMENT_TYPES
        .iter()
        .filter(|e| ids.contains(&e.id))
        .map(|e| e.key)
        .collect();
    names.sort_unstable();
    names
}
