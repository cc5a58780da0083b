// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Folio.

use thiserror::Error;

/// Top-level error type for all Folio operations.
#[derive(Debug, Error)]
pub enum FolioError {
    // -- Configuration errors --
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("window size must be odd, got {size}")]
    EvenWindowSize { size: usize },

    #[error("unknown chase direction code: {0:?} (expected N_S, S_N, W_E or E_W)")]
    UnknownDirection(String),

    // -- Input errors --
    #[error("edge mask is {mask:?} but the image is {image:?} (width, height)")]
    DimensionMismatch {
        image: (u32, u32),
        mask: (u32, u32),
    },

    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FolioError>;
