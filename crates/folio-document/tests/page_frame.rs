// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// End-to-end page-frame tests on synthetic masks and photographs.

use folio_core::config::{FrameConfig, PipelineConfig};
use folio_core::{FrameStrategy, Rect};
use folio_document::{PageFrameLocator, PageScanner};
use image::{GrayImage, Luma};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

const WIDTH: u32 = 700;
const HEIGHT: u32 = 520;

/// The page: rows 50..450, columns 80..600.
fn page() -> Rect {
    Rect::new(80, 50, 520, 400)
}

fn contains(rect: Rect, x: u32, y: u32) -> bool {
    x >= rect.x && x < rect.right() && y >= rect.y && y < rect.bottom()
}

/// Solid white page on a black background.
fn solid_mask() -> GrayImage {
    let page = page();
    GrayImage::from_fn(WIDTH, HEIGHT, |x, y| {
        Luma([if contains(page, x, y) { 255 } else { 0 }])
    })
}

/// Light page on a dark table, with a block of thin dark strokes standing in
/// for text at rows 200..300, columns 250..450.
fn photo() -> GrayImage {
    let page = page();
    let text = Rect::new(250, 200, 200, 100);
    GrayImage::from_fn(WIDTH, HEIGHT, |x, y| {
        let value = if contains(text, x, y) && (x - text.x) % 6 < 2 {
            40
        } else if contains(page, x, y) {
            210
        } else {
            40
        };
        Luma([value])
    })
}

fn frame_config() -> FrameConfig {
    FrameConfig {
        chase_depth: 200,
        ..Default::default()
    }
}

fn assert_close(got: Rect, expected: Rect, tolerance: u32) {
    let near = |a: u32, b: u32| a.abs_diff(b) <= tolerance;
    assert!(
        near(got.x, expected.x)
            && near(got.y, expected.y)
            && near(got.right(), expected.right())
            && near(got.bottom(), expected.bottom()),
        "{got} is not within {tolerance}px of {expected}"
    );
}

// ---------------------------------------------------------------------------
// Locator on a clean mask
// ---------------------------------------------------------------------------

#[test]
fn every_strategy_finds_the_solid_page() {
    let mask = solid_mask();
    let locator = PageFrameLocator::new(frame_config()).unwrap();
    for strategy in [
        FrameStrategy::Chase,
        FrameStrategy::Erosion,
        FrameStrategy::ChaseThenErode,
    ] {
        let frame = locator.locate_with(&mask, strategy);
        assert_eq!(frame.strategy, strategy);
        assert_close(frame.rect, page(), 2);
        assert!(frame.rect.fits_within(WIDTH, HEIGHT));
    }
}

#[test]
fn located_corners_are_all_observed() {
    let locator = PageFrameLocator::new(frame_config()).unwrap();
    let frame = locator.locate_detailed(&solid_mask());
    let corners = frame.corners.unwrap();
    assert_eq!((corners.top_left.col, corners.top_left.row), (80, 50));
    assert_eq!((corners.bottom_right.col, corners.bottom_right.row), (599, 449));
    assert!(corners.top_right.col_confident && corners.top_right.row_confident);
}

#[test]
fn frame_serializes_to_json() {
    let locator = PageFrameLocator::new(frame_config()).unwrap();
    let frame = locator.locate_detailed(&solid_mask());
    let json = serde_json::to_value(frame).unwrap();
    assert_eq!(json["rect"]["x"], 80);
    assert_eq!(json["strategy"], "chase");
    assert_eq!(json["corners"]["top_left"]["col_confident"], true);
}

// ---------------------------------------------------------------------------
// Full pipeline on a photograph
// ---------------------------------------------------------------------------

fn pipeline_config(strategy: FrameStrategy) -> PipelineConfig {
    let mut config = PipelineConfig {
        frame: frame_config(),
        strategy,
        ..Default::default()
    };
    config.preprocess.median_radius = 3;
    config.preprocess.blur_sigma = 3.0;
    config
}

#[test]
fn scanner_locates_the_page_in_a_photo() {
    for strategy in [
        FrameStrategy::Chase,
        FrameStrategy::Erosion,
        FrameStrategy::ChaseThenErode,
    ] {
        let scanner = PageScanner::new(photo(), pipeline_config(strategy)).unwrap();
        let frame = scanner.locate_frame().unwrap();
        assert_close(frame.rect, page(), 20);
    }
}

#[test]
fn scanner_binarizes_the_cropped_page() {
    let scanner = PageScanner::new(photo(), pipeline_config(FrameStrategy::Chase)).unwrap();
    let output = scanner.process().unwrap();
    let rect = output.frame.rect;
    assert_eq!(output.page.dimensions(), (rect.width, rect.height));

    // A stroke pixel turns black, plain paper next to it stays white.
    let (stroke_x, y) = (340, 250);
    assert_eq!(output.page.get_pixel(stroke_x - rect.x, y - rect.y).0[0], 0);
    assert_eq!(output.page.get_pixel(stroke_x + 3 - rect.x, y - rect.y).0[0], 255);
    // Blank paper far from the text stays white.
    assert_eq!(output.page.get_pixel(300 - rect.x, 400 - rect.y).0[0], 255);
}

#[test]
fn scanner_reads_a_photo_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("photo.png");
    photo().save(&path).unwrap();

    let scanner = PageScanner::open(&path, pipeline_config(FrameStrategy::Chase)).unwrap();
    assert_eq!(scanner.image().dimensions(), (WIDTH, HEIGHT));
    assert_close(scanner.locate_frame().unwrap().rect, page(), 20);
}
