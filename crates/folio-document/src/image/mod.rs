// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module: borrowed grayscale views plus decode/crop/encode helpers.

pub mod processor;
pub mod view;

pub use processor::ImageProcessor;
pub use view::GrayView;
