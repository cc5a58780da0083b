// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the folio-document crate: block statistics at the
// block and chunk window sizes, and page-frame location on a synthetic mask.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use folio_core::config::FrameConfig;
use folio_core::FrameStrategy;
use folio_document::{GrayView, PageFrameLocator, compute_block_stats};
use image::{GrayImage, Luma};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// 1024x768 photo-like image: a light page with a repeating texture on a
/// darker table.
fn synthetic_photo() -> GrayImage {
    GrayImage::from_fn(1024, 768, |x, y| {
        let page = (120..900).contains(&x) && (80..700).contains(&y);
        let base: u8 = if page { 200 } else { 60 };
        Luma([base.wrapping_add(((x * 7 + y * 13) % 17) as u8)])
    })
}

/// Edge mask of the same page: a 6-px thick outline.
fn synthetic_mask() -> GrayImage {
    GrayImage::from_fn(1024, 768, |x, y| {
        let inside = (120..900).contains(&x) && (80..700).contains(&y);
        let border = x < 126 || x >= 894 || y < 86 || y >= 694;
        Luma([if inside && border { 255 } else { 0 }])
    })
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Block statistics cost should not grow with the window size.
fn bench_block_stats(c: &mut Criterion) {
    let photo = synthetic_photo();
    let mut group = c.benchmark_group("block_stats (1024x768)");
    for window in [9usize, 37] {
        group.bench_with_input(BenchmarkId::from_parameter(window), &window, |b, &window| {
            b.iter(|| {
                let grid = compute_block_stats(&GrayView::new(black_box(&photo)), window);
                black_box(grid.map(|g| g.mean_variance(0)).ok());
            });
        });
    }
    group.finish();
}

fn bench_locate(c: &mut Criterion) {
    let mask = synthetic_mask();
    let locator = match PageFrameLocator::new(FrameConfig::default()) {
        Ok(locator) => locator,
        Err(err) => panic!("default frame config rejected: {err}"),
    };

    let mut group = c.benchmark_group("locate_frame (1024x768)");
    for strategy in [FrameStrategy::Chase, FrameStrategy::Erosion] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{strategy:?}")),
            &strategy,
            |b, &strategy| {
                b.iter(|| black_box(locator.locate_with(black_box(&mask), strategy)));
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_block_stats, bench_locate);
criterion_main!(benches);
