// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Local image statistics shared by frame refinement and binarization.

pub mod block;

pub use block::{StatsGrid, compute_block_stats};
