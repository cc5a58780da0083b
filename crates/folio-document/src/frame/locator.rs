// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page-frame locator: scans each quadrant of the edge mask for the page
// corners and turns them into one bounding rectangle.

use folio_core::config::FrameConfig;
use folio_core::error::Result;
use folio_core::{Corner, CornerCandidate, Direction, FrameStrategy, Rect};
use image::GrayImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::chase::CornerChaser;
use super::corners::{FrameCorners, resolve_corner};
use super::erosion::MarginEroder;
use super::scan_order;
use crate::image::GrayView;

/// A located page frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageFrame {
    /// Bounding rectangle in mask coordinates. Always inside the mask and
    /// non-empty for a non-empty mask.
    pub rect: Rect,
    pub strategy: FrameStrategy,
    /// Resolved corners, with the axes that were actually observed flagged
    /// as confident.
    pub corners: Option<FrameCorners>,
}

/// Locates the page frame in a binary edge mask.
#[derive(Debug, Clone)]
pub struct PageFrameLocator {
    config: FrameConfig,
}

impl PageFrameLocator {
    /// Create a locator. The configuration is validated up front.
    pub fn new(config: FrameConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    /// Bounding rectangle of the page found by edge chasing.
    pub fn locate(&self, mask: &GrayImage) -> Rect {
        self.locate_detailed(mask).rect
    }

    /// Edge-chasing frame, including the resolved corners.
    pub fn locate_detailed(&self, mask: &GrayImage) -> PageFrame {
        self.locate_view(&GrayView::new(mask), FrameStrategy::Chase)
    }

    /// Locate the frame with an explicit strategy.
    pub fn locate_with(&self, mask: &GrayImage, strategy: FrameStrategy) -> PageFrame {
        self.locate_view(&GrayView::new(mask), strategy)
    }

    #[instrument(skip(self, mask), fields(width = mask.width(), height = mask.height()))]
    pub fn locate_view(&self, mask: &GrayView<'_>, strategy: FrameStrategy) -> PageFrame {
        let (width, height) = (mask.width() as u32, mask.height() as u32);
        let eroder = MarginEroder::new(&self.config);

        let frame = match strategy {
            FrameStrategy::Chase => {
                let corners = self.chase_corners(mask);
                PageFrame {
                    rect: corners.to_rect(width, height),
                    strategy,
                    corners: Some(corners),
                }
            }
            FrameStrategy::Erosion => {
                let corners = eroder.erode_corners(mask);
                PageFrame {
                    rect: corners.to_rect(width, height),
                    strategy,
                    corners: Some(corners),
                }
            }
            FrameStrategy::ChaseThenErode => {
                let corners = self.chase_corners(mask);
                let chased = corners.to_rect(width, height);
                PageFrame {
                    rect: eroder.refine(mask, chased),
                    strategy,
                    corners: Some(corners),
                }
            }
        };

        info!(rect = %frame.rect, ?strategy, "Page frame located");
        frame
    }

    /// Search the four corners concurrently and resolve each one.
    pub fn chase_corners(&self, mask: &GrayView<'_>) -> FrameCorners {
        let chaser = CornerChaser::new(*mask, &self.config);
        let search = |corner| search_corner(&chaser, corner);

        let ((top_left, top_right), (bottom_left, bottom_right)) = rayon::join(
            || rayon::join(|| search(Corner::TopLeft), || search(Corner::TopRight)),
            || rayon::join(|| search(Corner::BottomLeft), || search(Corner::BottomRight)),
        );
        FrameCorners {
            top_left,
            top_right,
            bottom_left,
            bottom_right,
        }
    }
}

/// Scan one quadrant twice, up to the image midlines:
///
/// * row-major, chasing vertically away from the corner. The first hit pins
///   the column of the page's side edge (column-confident);
/// * column-major, chasing horizontally away from the corner. The first hit
///   pins the row of the page's top or bottom edge (row-confident).
///
/// Both scans stop at their first accepted chase.
fn search_corner(chaser: &CornerChaser<'_, '_>, corner: Corner) -> CornerCandidate {
    let mask = chaser.mask();
    let (width, height) = (mask.width(), mask.height());
    let (from_bottom, from_right) = (!corner.is_top(), !corner.is_left());
    let vertical = if corner.is_top() {
        Direction::NorthSouth
    } else {
        Direction::SouthNorth
    };
    let horizontal = if corner.is_left() {
        Direction::WestEast
    } else {
        Direction::EastWest
    };
    let (ext_col, ext_row) = corner.image_extreme(width as u32, height as u32);
    let fallback = CornerCandidate::unresolved(ext_col, ext_row);

    let row_major = scan_order(height, height / 2, from_bottom)
        .find_map(|row| {
            scan_order(width, width / 2, from_right)
                .find(|&col| chaser.is_edge(row, col, vertical))
                .map(|col| CornerCandidate::new(col as u32, row as u32, true, false))
        })
        .unwrap_or(fallback);

    let col_major = scan_order(width, width / 2, from_right)
        .find_map(|col| {
            scan_order(height, height / 2, from_bottom)
                .find(|&row| chaser.is_edge(row, col, horizontal))
                .map(|row| CornerCandidate::new(col as u32, row as u32, false, true))
        })
        .unwrap_or(fallback);

    let resolved = resolve_corner(corner, width as u32, height as u32, &row_major, &col_major);
    debug!(
        ?corner,
        col = resolved.col,
        row = resolved.row,
        col_confident = resolved.col_confident,
        row_confident = resolved.row_confident,
        "Corner resolved"
    );
    if !resolved.is_resolved() {
        warn!(?corner, "Corner not found; defaulting to the image extreme");
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::FolioError;
    use image::Luma;

    fn solid_rect(width: u32, height: u32, rect: Rect) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            let inside = x >= rect.x && x < rect.right() && y >= rect.y && y < rect.bottom();
            Luma([if inside { 255 } else { 0 }])
        })
    }

    fn locator(depth: usize) -> PageFrameLocator {
        PageFrameLocator::new(FrameConfig {
            chase_depth: depth,
            erosion_boundary: depth / 2,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = PageFrameLocator::new(FrameConfig {
            chase_depth: 0,
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, FolioError::InvalidParameter(_)));
    }

    #[test]
    fn empty_mask_yields_the_full_image() {
        let mask = GrayImage::new(160, 120);
        let frame = locator(40).locate_detailed(&mask);
        assert_eq!(frame.rect, Rect::full(160, 120));
        let corners = frame.corners.unwrap();
        assert!(!corners.any_resolved());
    }

    #[test]
    fn page_corners_are_observed_on_both_axes() {
        let mask = solid_rect(320, 240, Rect::new(30, 20, 250, 190));
        let frame = locator(60).locate_detailed(&mask);
        let corners = frame.corners.unwrap();
        for corner in Corner::ALL {
            let c = corners.get(corner);
            assert!(c.col_confident && c.row_confident, "{corner:?} not observed");
        }
        assert_eq!(corners.top_left, CornerCandidate::new(30, 20, true, true));
        assert_eq!(corners.bottom_right, CornerCandidate::new(279, 209, true, true));
        assert_eq!(frame.rect, Rect::new(30, 20, 249, 189));
    }

    #[test]
    fn outline_mask_is_located() {
        // A 3-px thick outline, as a real edge mask looks.
        let page = Rect::new(40, 30, 220, 170);
        let mask = GrayImage::from_fn(300, 240, |x, y| {
            let inside = x >= page.x && x < page.right() && y >= page.y && y < page.bottom();
            let border = x < page.x + 3 || x + 3 >= page.right() || y < page.y + 3 || y + 3 >= page.bottom();
            Luma([if inside && border { 255 } else { 0 }])
        });
        let rect = locator(80).locate(&mask);
        assert_eq!(rect, Rect::new(40, 30, 219, 169));
    }

    #[test]
    fn short_clutter_does_not_stop_the_scan() {
        let mut mask = solid_rect(320, 240, Rect::new(60, 50, 200, 150));
        // Short strokes outside the page, much shorter than the chase depth.
        for i in 0..20 {
            mask.put_pixel(10 + i, 12, Luma([255]));
            mask.put_pixel(15, 10 + i, Luma([255]));
        }
        let rect = locator(60).locate(&mask);
        assert_eq!((rect.x, rect.y), (60, 50));
    }

    #[test]
    fn strategies_agree_on_a_clean_page() {
        let mask = solid_rect(320, 240, Rect::new(30, 20, 250, 190));
        let locator = locator(60);
        let chased = locator.locate_with(&mask, FrameStrategy::Chase).rect;
        let eroded = locator.locate_with(&mask, FrameStrategy::Erosion).rect;
        let both = locator.locate_with(&mask, FrameStrategy::ChaseThenErode).rect;
        assert_eq!(chased, eroded);
        assert_eq!(chased, both);
    }
}
