// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Binarization of the cropped page. Both policies threshold each pixel
// against its local mean, but only inside regions judged to hold text;
// everything else becomes white.

use folio_core::config::{FilteringConfig, PreprocessConfig, StatsConfig};
use folio_core::error::Result;
use image::{GrayImage, Luma};
use imageproc::filter::gaussian_blur_f32;
use tracing::{debug, info, instrument};

use super::preprocess::{high_pass_response, threshold_mask};
use crate::image::GrayView;
use crate::stats::{StatsGrid, compute_block_stats};

const WHITE: u8 = 255;
const BLACK: u8 = 0;

fn local_threshold(value: u8, mean: u8, offset: i32) -> u8 {
    if value as i32 > mean as i32 - offset { WHITE } else { BLACK }
}

// -- Statistics-based ---------------------------------------------------------

/// Text regions are those where the large-window (chunk) variance reaches the
/// average small-window (block) variance of the page.
#[derive(Debug, Clone, Copy)]
pub struct StatisticsBinarizer<'c> {
    config: &'c StatsConfig,
}

impl<'c> StatisticsBinarizer<'c> {
    pub fn new(config: &'c StatsConfig) -> Self {
        Self { config }
    }

    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn binarize(&self, image: &GrayView<'_>) -> Result<GrayImage> {
        self.config.validate()?;
        info!(
            block = self.config.block_size,
            chunk = self.config.chunk_size,
            "Statistics binarization"
        );

        let (block, chunk) = rayon::join(
            || compute_block_stats(image, self.config.block_size),
            || compute_block_stats(image, self.config.chunk_size),
        );
        let (block, chunk) = (block?, chunk?);
        let var_threshold = block.mean_variance(chunk.border());
        debug!(var_threshold, "Text variance threshold");

        Ok(map_pixels(image, |row, col, value| {
            match (chunk.mean(row, col), chunk.variance(row, col)) {
                (Some(mean), Some(variance)) if variance >= var_threshold => {
                    local_threshold(value, mean, self.config.correction_offset)
                }
                _ => WHITE,
            }
        }))
    }
}

// -- Filtering-based ----------------------------------------------------------

/// Text regions are those where the high-pass response of the blurred page
/// exceeds a threshold.
#[derive(Debug, Clone, Copy)]
pub struct FilteringBinarizer<'c> {
    config: &'c FilteringConfig,
    preprocess: &'c PreprocessConfig,
}

impl<'c> FilteringBinarizer<'c> {
    /// `preprocess` supplies the high-pass kernel length.
    pub fn new(config: &'c FilteringConfig, preprocess: &'c PreprocessConfig) -> Self {
        Self { config, preprocess }
    }

    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn binarize(&self, image: &GrayView<'_>) -> Result<GrayImage> {
        self.config.validate()?;
        self.preprocess.validate()?;
        info!(block = self.config.block_size, "Filtering binarization");

        let block: StatsGrid = compute_block_stats(image, self.config.block_size)?;
        let blurred = gaussian_blur_f32(&image.to_image(), self.config.blur_sigma);
        let response = high_pass_response(&blurred, self.preprocess.high_pass_size)?;
        let text = threshold_mask(&response, self.config.mask_threshold);

        Ok(map_pixels(image, |row, col, value| {
            let in_text = text.get_pixel(col as u32, row as u32).0[0] != 0;
            match block.mean(row, col) {
                Some(mean) if in_text => local_threshold(value, mean, self.config.correction_offset),
                _ => WHITE,
            }
        }))
    }
}

fn map_pixels(image: &GrayView<'_>, f: impl Fn(usize, usize, u8) -> u8) -> GrayImage {
    let (width, height) = (image.width(), image.height());
    let mut out = GrayImage::new(width as u32, height as u32);
    for row in 0..height {
        for (col, &value) in image.row(row).iter().enumerate() {
            out.put_pixel(col as u32, row as u32, Luma([f(row, col, value)]));
        }
    }
    out
}
