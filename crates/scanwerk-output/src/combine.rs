// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF combiner — turn a sequence of scanned page images into one multi-page
// PDF using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.  Each page image becomes an XObject drawn at its
// native size for the scan resolution, so a 300 DPI letter page renders as a
// letter-sized PDF page.

use std::path::Path;

use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument, warn};

use scanwerk_core::error::{Result, ScanwerkError};
use scanwerk_core::types::PageFile;

const MM_PER_INCH: f32 = 25.4;

/// Combines scanned page images into a single PDF document.
///
/// Page order in the output matches the order of the input slice.  Pages that
/// cannot be loaded are skipped with a warning; a document with zero usable
/// pages is an error, never an empty PDF.
pub struct PdfCombiner {
    /// Title metadata embedded in the PDF /Info dictionary.
    title: String,
    /// Resolution the pages were scanned at, for sizing.
    dpi: u32,
}

impl PdfCombiner {
    pub fn new(title: impl Into<String>, dpi: u32) -> Self {
        Self {
            title: title.into(),
            dpi,
        }
    }

    /// Combine the page images into one PDF, returned as bytes.
    #[instrument(skip_all, fields(pages = pages.len(), dpi = self.dpi))]
    pub fn combine(&self, pages: &[PageFile]) -> Result<Vec<u8>> {
        if pages.is_empty() {
            return Err(ScanwerkError::NoPages);
        }

        info!(title = %self.title, "combining pages into PDF");

        let mut doc = PdfDocument::new(&self.title);
        let mut pdf_pages: Vec<PdfPage> = Vec::new();
        let mut skipped: usize = 0;

        for page in pages {
            match self.page_ops(&mut doc, &page.path) {
                Ok(pdf_page) => pdf_pages.push(pdf_page),
                Err(err) => {
                    warn!(page = %page.path.display(), %err, "skipping unloadable page");
                    skipped += 1;
                }
            }
        }

        if pdf_pages.is_empty() {
            return Err(ScanwerkError::Combine(format!(
                "none of the {} page images could be loaded",
                pages.len()
            )));
        }
        if skipped > 0 {
            warn!(skipped, usable = pdf_pages.len(), "some pages were dropped");
        }

        doc.with_pages(pdf_pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        debug!(
            bytes = output.len(),
            warnings = warnings.len(),
            "PDF serialised"
        );

        Ok(output)
    }

    /// Load one page image and build a PDF page sized to it.
    fn page_ops(&self, doc: &mut PdfDocument, path: &Path) -> Result<PdfPage> {
        let dynamic_image = image::open(path)
            .map_err(|err| ScanwerkError::ImageError(format!("{}: {err}", path.display())))?;

        let img_width = dynamic_image.width() as usize;
        let img_height = dynamic_image.height() as usize;

        // Convert to RGB8 for printpdf.
        let rgb_image = dynamic_image.to_rgb8();
        let raw = RawImage {
            pixels: RawImageData::U8(rgb_image.into_raw()),
            width: img_width,
            height: img_height,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };
        let xobject_id = doc.add_image(&raw);

        // Page size: the physical size of the scan at its resolution.
        let dpi = self.dpi as f32;
        let page_w = Mm(img_width as f32 * MM_PER_INCH / dpi);
        let page_h = Mm(img_height as f32 * MM_PER_INCH / dpi);

        let ops = vec![Op::UseXobject {
            id: xobject_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(0.0)),
                translate_y: Some(Pt(0.0)),
                scale_x: Some(1.0),
                scale_y: Some(1.0),
                dpi: Some(dpi),
                rotate: None,
            },
        }];

        Ok(PdfPage::new(page_w, page_h, ops))
    }
}
