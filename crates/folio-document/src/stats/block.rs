// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Sliding-window block statistics: per-pixel local mean and variance over a
// square window, in time proportional to the image area regardless of the
// window size.

use folio_core::config::ensure_odd_window;
use folio_core::error::Result;
use tracing::{debug, instrument};

use crate::image::GrayView;

/// Local mean and variance for every pixel at least `window / 2` pixels away
/// from the image border.
///
/// Both grids are stored in flat row-major buffers with the same dimensions
/// as the source. Border pixels carry no statistics; the accessors return
/// `None` for them and callers treat such pixels as non-text.
#[derive(Debug, Clone)]
pub struct StatsGrid {
    width: usize,
    height: usize,
    window: usize,
    mean: Vec<u8>,
    variance: Vec<f32>,
}

impl StatsGrid {
    fn empty(width: usize, height: usize, window: usize) -> Self {
        Self {
            width,
            height,
            window,
            mean: vec![0; width * height],
            variance: vec![0.0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Width of the undefined frame around the grid.
    pub fn border(&self) -> usize {
        self.window / 2
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    /// Whether the whole window centred on `(row, col)` fits in the image.
    #[inline]
    pub fn is_interior(&self, row: usize, col: usize) -> bool {
        let b = self.border();
        row >= b && col >= b && row + b < self.height && col + b < self.width
    }

    /// Truncated 8-bit window mean at `(row, col)`.
    #[inline]
    pub fn mean(&self, row: usize, col: usize) -> Option<u8> {
        self.is_interior(row, col)
            .then(|| self.mean[self.index(row, col)])
    }

    /// Population variance of the window at `(row, col)`; never negative.
    #[inline]
    pub fn variance(&self, row: usize, col: usize) -> Option<f32> {
        self.is_interior(row, col)
            .then(|| self.variance[self.index(row, col)])
    }

    /// Average variance over pixels at least `margin` pixels from every
    /// border (and inside this grid's own interior). Returns 0 when no pixel
    /// qualifies.
    pub fn mean_variance(&self, margin: usize) -> f32 {
        let margin = margin.max(self.border());
        if 2 * margin >= self.height || 2 * margin >= self.width {
            return 0.0;
        }
        let mut total = 0.0f64;
        let mut count = 0usize;
        for row in margin..self.height - margin {
            let start = self.index(row, margin);
            let end = self.index(row, self.width - margin);
            total += self.variance[start..end]
                .iter()
                .map(|&v| v as f64)
                .sum::<f64>();
            count += end - start;
        }
        (total / count as f64) as f32
    }
}

/// Compute the local mean and variance of every interior pixel of `image`
/// over a `window` x `window` neighbourhood.
///
/// Each column keeps a running sum (and sum of squares) over the current
/// band of `window` rows. Moving to the next row updates every column in
/// O(1) by removing the row that leaves the band and adding the row that
/// enters it. Inside a row the window sum slides horizontally the same way,
/// so each pixel costs O(1) whatever the window size.
///
/// `window` must be odd. A window larger than the image yields a grid with
/// no interior.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn compute_block_stats(image: &GrayView<'_>, window: usize) -> Result<StatsGrid> {
    ensure_odd_window(window)?;

    let (width, height) = (image.width(), image.height());
    let mut grid = StatsGrid::empty(width, height, window);
    if window > width || window > height {
        debug!(window, "window larger than image; no interior statistics");
        return Ok(grid);
    }

    let half = window / 2;
    let area = (window * window) as u64;
    let area_f = area as f64;

    let mut col_sum = vec![0u64; width];
    let mut col_sq = vec![0u64; width];
    for row in 0..window {
        for (col, &v) in image.row(row).iter().enumerate() {
            let v = v as u64;
            col_sum[col] += v;
            col_sq[col] += v * v;
        }
    }

    for center in half..height - half {
        if center != half {
            let leaving = image.row(center - half - 1);
            let entering = image.row(center + half);
            for col in 0..width {
                let (out, inc) = (leaving[col] as u64, entering[col] as u64);
                col_sum[col] = col_sum[col] - out + inc;
                col_sq[col] = col_sq[col] - out * out + inc * inc;
            }
        }

        let mut sum: u64 = col_sum[..window].iter().sum();
        let mut sq: u64 = col_sq[..window].iter().sum();
        for col in half..width - half {
            if col != half {
                sum = sum - col_sum[col - half - 1] + col_sum[col + half];
                sq = sq - col_sq[col - half - 1] + col_sq[col + half];
            }
            let mean = sum as f64 / area_f;
            // Cancellation in E[x^2] - E[x]^2 can dip just below zero on flat
            // regions.
            let variance = (sq as f64 / area_f - mean * mean).max(0.0);

            let i = grid.index(center, col);
            grid.mean[i] = (sum / area) as u8;
            grid.variance[i] = variance as f32;
        }
    }

    Ok(grid)
}
