// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanning pipeline: edge-mask pre-processing, page binarization and the
// end-to-end page scanner.

pub mod binarize;
pub mod preprocess;
pub mod scanner;

pub use binarize::{FilteringBinarizer, StatisticsBinarizer};
pub use preprocess::{build_edge_mask, high_pass_response};
pub use scanner::{PageScanner, ScanOutput};
