// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Margin erosion: a confidence-free frame finder that looks for solid,
// perfectly straight foreground runs from each side of the mask.

use folio_core::config::FrameConfig;
use folio_core::{Corner, CornerCandidate, Rect};
use tracing::{debug, instrument, warn};

use super::corners::FrameCorners;
use super::scan_order;
use crate::image::GrayView;

/// Finds the page frame by eroding inward until a solid line is met.
#[derive(Debug, Clone, Copy)]
pub struct MarginEroder<'c> {
    config: &'c FrameConfig,
}

impl<'c> MarginEroder<'c> {
    pub fn new(config: &'c FrameConfig) -> Self {
        Self { config }
    }

    /// Frame rectangle of the whole `mask`.
    #[instrument(skip_all, fields(width = mask.width(), height = mask.height()))]
    pub fn erode(&self, mask: &GrayView<'_>) -> Rect {
        let corners = self.erode_corners(mask);
        let rect = corners.to_rect(mask.width() as u32, mask.height() as u32);
        debug!(%rect, "Erosion frame");
        rect
    }

    /// Erode inside `rect` (in `mask` coordinates) and return the tighter
    /// frame, also in `mask` coordinates.
    pub fn refine(&self, mask: &GrayView<'_>, rect: Rect) -> Rect {
        let (width, height) = (mask.width() as u32, mask.height() as u32);
        // Frame edges are inclusive pixel positions; keep the right and bottom
        // edge lines inside the search window.
        let window = Rect::new(rect.x, rect.y, rect.width + 1, rect.height + 1).clamp_to(width, height);
        let inner = self.erode(&mask.sub_view(window));
        Rect::new(window.x + inner.x, window.y + inner.y, inner.width, inner.height)
            .clamp_to(width, height)
    }

    /// The four corners found by erosion. A corner with any solid run is
    /// fully confident; a corner with none stays unresolved at the image
    /// extreme.
    pub fn erode_corners(&self, mask: &GrayView<'_>) -> FrameCorners {
        FrameCorners {
            top_left: self.corner_stop(mask, Corner::TopLeft),
            top_right: self.corner_stop(mask, Corner::TopRight),
            bottom_left: self.corner_stop(mask, Corner::BottomLeft),
            bottom_right: self.corner_stop(mask, Corner::BottomRight),
        }
    }

    /// Combine the first vertical-run stop (row-major scan) and the first
    /// horizontal-run stop (column-major scan) of one quadrant.
    fn corner_stop(&self, mask: &GrayView<'_>, corner: Corner) -> CornerCandidate {
        let (width, height) = (mask.width(), mask.height());
        let (half_w, half_h) = (width / 2, height / 2);
        let boundary = self.config.erosion_boundary;
        let (from_bottom, from_right) = (!corner.is_top(), !corner.is_left());
        let vertical: (isize, isize) = if corner.is_top() { (1, 0) } else { (-1, 0) };
        let horizontal: (isize, isize) = if corner.is_left() { (0, 1) } else { (0, -1) };
        let extreme = corner.image_extreme(width as u32, height as u32);

        let vertical_stop = scan_order(height, half_h + boundary, from_bottom).find_map(|row| {
            scan_order(width, half_w, from_right)
                .find(|&col| solid_run(mask, row, col, vertical, boundary))
                .map(|col| (col as u32, row as u32))
        });
        let horizontal_stop = scan_order(width, half_w + boundary, from_right).find_map(|col| {
            scan_order(height, half_h, from_bottom)
                .find(|&row| solid_run(mask, row, col, horizontal, boundary))
                .map(|row| (col as u32, row as u32))
        });

        if vertical_stop.is_none() && horizontal_stop.is_none() {
            warn!(?corner, "No solid margin found; using the image extreme");
            return CornerCandidate::unresolved(extreme.0, extreme.1);
        }
        let (vc, vr) = vertical_stop.unwrap_or(extreme);
        let (hc, hr) = horizontal_stop.unwrap_or(extreme);
        CornerCandidate::new(
            corner.col_tie_break().apply(vc, hc),
            corner.row_tie_break().apply(vr, hr),
            true,
            true,
        )
    }
}

/// Whether `length` consecutive pixels from `(row, col)` stepping by `step`
/// are all foreground. Runs leaving the mask are not solid.
fn solid_run(mask: &GrayView<'_>, row: usize, col: usize, step: (isize, isize), length: usize) -> bool {
    let (row, col) = (row as isize, col as isize);
    (0..length as isize).all(|k| mask.is_foreground(row + k * step.0, col + k * step.1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn solid_rect(width: u32, height: u32, rect: Rect) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            let inside = x >= rect.x && x < rect.right() && y >= rect.y && y < rect.bottom();
            Luma([if inside { 255 } else { 0 }])
        })
    }

    fn config(boundary: usize) -> FrameConfig {
        FrameConfig {
            erosion_boundary: boundary,
            ..Default::default()
        }
    }

    #[test]
    fn finds_a_solid_rectangle() {
        let img = solid_rect(300, 200, Rect::new(40, 30, 200, 120));
        let cfg = config(50);
        let rect = MarginEroder::new(&cfg).erode(&GrayView::new(&img));
        // Right and bottom are the last foreground column and row.
        assert_eq!(rect, Rect::new(40, 30, 199, 119));
    }

    #[test]
    fn thin_lines_are_not_solid_margins() {
        let mut img = solid_rect(300, 200, Rect::new(40, 30, 200, 120));
        // A 20-px stub near the top-left is shorter than the boundary.
        for y in 5..25 {
            img.put_pixel(10, y, Luma([255]));
        }
        let cfg = config(50);
        let rect = MarginEroder::new(&cfg).erode(&GrayView::new(&img));
        assert_eq!((rect.x, rect.y), (40, 30));
    }

    #[test]
    fn empty_mask_degenerates_to_full_image() {
        let img = GrayImage::new(120, 90);
        let cfg = config(20);
        let rect = MarginEroder::new(&cfg).erode(&GrayView::new(&img));
        assert_eq!(rect, Rect::full(120, 90));
    }

    #[test]
    fn solid_run_stops_at_the_mask_edge() {
        let img = GrayImage::from_pixel(10, 10, Luma([255]));
        let view = GrayView::new(&img);
        assert!(solid_run(&view, 0, 0, (1, 0), 10));
        assert!(!solid_run(&view, 1, 0, (1, 0), 10));
        assert!(solid_run(&view, 9, 9, (0, -1), 10));
    }

    #[test]
    fn refine_tightens_inside_a_loose_rectangle() {
        let img = solid_rect(400, 300, Rect::new(100, 80, 200, 150));
        let cfg = config(40);
        let eroder = MarginEroder::new(&cfg);
        let refined = eroder.refine(&GrayView::new(&img), Rect::new(60, 50, 300, 220));
        assert_eq!(refined, Rect::new(100, 80, 199, 149));

        // A rectangle already on the frame is kept.
        assert_eq!(eroder.refine(&GrayView::new(&img), refined), refined);
    }
}
