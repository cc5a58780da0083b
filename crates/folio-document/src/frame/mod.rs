// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page-frame localization over a binary edge mask.

pub mod chase;
pub mod corners;
pub mod erosion;
pub mod locator;

pub use chase::CornerChaser;
pub use corners::{FrameCorners, pick_col, pick_row, resolve_corner};
pub use erosion::MarginEroder;
pub use locator::{PageFrame, PageFrameLocator};

/// Indices `0..limit` of an axis of length `len`, walked inward from the
/// start or, when `from_end` is set, from the end.
pub(crate) fn scan_order(len: usize, limit: usize, from_end: bool) -> impl Iterator<Item = usize> {
    (0..limit.min(len)).map(move |i| if from_end { len - 1 - i } else { i })
}
