// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for output assembly in the scanwerk-output crate.
// Benchmarks PDF combination of small synthetic page images, the hot path of
// every PDF-format scan run.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use image::{Rgb, RgbImage};

use scanwerk_core::types::PageFile;
use scanwerk_core::ScanOptions;
use scanwerk_output::{PdfCombiner, Placer};

/// Benchmark combining four small page images into one PDF.
///
/// Pages are written to a temp directory once; each iteration re-reads and
/// re-encodes them, which matches what one scan run actually does.
fn bench_pdf_combine(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("tempdir");
    let pages: Vec<PageFile> = (0..4u32)
        .map(|n| {
            let mut img = RgbImage::new(160, 220);
            for (x, y, px) in img.enumerate_pixels_mut() {
                *px = Rgb([((x + y + n * 31) % 256) as u8, 120, 90]);
            }
            let path = dir.path().join(format!("page-{n}.jpg"));
            img.save(&path).expect("write page");
            PageFile::new(path)
        })
        .collect();

    c.bench_function("pdf_combine (4 pages, 160x220)", |b| {
        b.iter(|| {
            let combiner = PdfCombiner::new("bench", 150);
            let bytes = combiner.combine(black_box(&pages)).expect("combine");
            black_box(bytes);
        });
    });
}

/// Benchmark collision-safe placement with a fixed base name.
///
/// Each iteration starts from a fresh archive directory and places the same
/// artifact eight times, so the numeric-suffix probe runs against a growing
/// set of existing files.
fn bench_collision_placement(c: &mut Criterion) {
    let source_dir = tempfile::tempdir().expect("tempdir");
    let source = source_dir.path().join("artifact.pdf");
    std::fs::write(&source, vec![0u8; 16 * 1024]).expect("write source");

    c.bench_function("placement (8 collisions)", |b| {
        b.iter_batched(
            || tempfile::tempdir().expect("tempdir"),
            |archive| {
                let options = ScanOptions {
                    output_root: archive.path().to_path_buf(),
                    name: Some("bench".into()),
                    ..ScanOptions::default()
                };
                let placer = Placer::from_options(&options);
                for _ in 0..8 {
                    let placed = placer.place(black_box(&source), "pdf").expect("place");
                    black_box(placed);
                }
                archive
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_pdf_combine, bench_collision_placement);
criterion_main!(benches);
