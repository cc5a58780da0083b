// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// folio-document: image algorithms for locating and cleaning up a photographed
// document page.
//
// Provides borrowed grayscale views, sliding-window block statistics, the
// page-frame locator (edge chasing, corner resolution, margin erosion) and a
// scanning pipeline (edge mask, binarization, crop).

pub mod frame;
pub mod image;
pub mod scan;
pub mod stats;

// Re-export the primary types so callers can use `folio_document::PageScanner` etc.
pub use crate::frame::{CornerChaser, FrameCorners, MarginEroder, PageFrame, PageFrameLocator};
pub use crate::image::{GrayView, ImageProcessor};
pub use crate::scan::{FilteringBinarizer, PageScanner, ScanOutput, StatisticsBinarizer, build_edge_mask};
pub use crate::stats::{StatsGrid, compute_block_stats};
