// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Edge-mask pre-processing: a wide median filter flattens text and texture
// while keeping the page outline, a directional high-pass picks out the
// outline, and blur plus threshold turn it into a thick binary mask.

use folio_core::config::{PreprocessConfig, ensure_odd_window};
use folio_core::error::{FolioError, Result};
use image::GrayImage;
use imageproc::filter::{gaussian_blur_f32, median_filter};
use tracing::{debug, info, instrument};

/// Build the binary (0/255) edge mask consumed by the frame locator.
#[instrument(skip_all, fields(width = gray.width(), height = gray.height()))]
pub fn build_edge_mask(gray: &GrayImage, config: &PreprocessConfig) -> Result<GrayImage> {
    config.validate()?;
    info!(
        median_radius = config.median_radius,
        high_pass_size = config.high_pass_size,
        "Building edge mask"
    );

    let smoothed = median_filter(gray, config.median_radius, config.median_radius);
    let response = high_pass_response(&smoothed, config.high_pass_size)?;
    let blurred = gaussian_blur_f32(&response, config.blur_sigma);
    let mask = threshold_mask(&blurred, config.threshold);

    debug!(
        foreground = mask.pixels().filter(|p| p.0[0] != 0).count(),
        "Edge mask built"
    );
    Ok(mask)
}

/// Saturated edge strength from a `[-1 .. -1, 0, +1 .. +1]` kernel of length
/// `size`, applied along rows and along columns.
///
/// The four one-sided responses (left-to-right, right-to-left, top-to-bottom
/// and bottom-to-top) are each clipped to `0..=255` and summed with
/// saturation, i.e. `min(255, min(255, |dh|) + min(255, |dv|))`. Samples
/// beyond the border repeat the edge sample.
pub fn high_pass_response(gray: &GrayImage, size: usize) -> Result<GrayImage> {
    ensure_odd_window(size)?;
    let (width, height) = gray.dimensions();
    let (w, h) = (width as usize, height as usize);
    if w == 0 || h == 0 {
        return Ok(gray.clone());
    }
    let half = size / 2;
    let raw = gray.as_raw();

    let mut horizontal = Vec::with_capacity(w * h);
    for line in raw.chunks_exact(w) {
        horizontal.extend(line_response(line, half));
    }

    let mut out = vec![0u8; w * h];
    let mut column = vec![0u8; h];
    for x in 0..w {
        for (y, v) in column.iter_mut().enumerate() {
            *v = raw[y * w + x];
        }
        for (y, dv) in line_response(&column, half).into_iter().enumerate() {
            let i = y * w + x;
            let dh = horizontal[i];
            out[i] = (dh.unsigned_abs().min(255) + dv.unsigned_abs().min(255)).min(255) as u8;
        }
    }

    GrayImage::from_raw(width, height, out)
        .ok_or_else(|| FolioError::ImageError("high-pass buffer size mismatch".into()))
}

/// Map samples strictly above `threshold` to 255 and the rest to 0.
pub fn threshold_mask(image: &GrayImage, threshold: u8) -> GrayImage {
    let mut out = image.clone();
    for p in out.pixels_mut() {
        p.0[0] = if p.0[0] > threshold { 255 } else { 0 };
    }
    out
}

/// `sum(line[c+1..=c+half]) - sum(line[c-half..c])` for every `c`, with
/// clamp-to-edge padding, via a prefix sum over the padded line.
fn line_response(line: &[u8], half: usize) -> Vec<i32> {
    let n = line.len();
    if n == 0 {
        return Vec::new();
    }
    let padded = |i: usize| line[i.saturating_sub(half).min(n - 1)] as i64;
    let mut prefix = vec![0i64; n + 2 * half + 1];
    for i in 0..n + 2 * half {
        prefix[i + 1] = prefix[i] + padded(i);
    }
    (0..n)
        .map(|c| {
            let right = prefix[c + 2 * half + 1] - prefix[c + half + 1];
            let left = prefix[c + half] - prefix[c];
            (right - left) as i32
        })
        .collect()
}
