// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tunable parameters. Every algorithm receives its configuration by reference;
// nothing here is global or mutated after construction.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FolioError, Result};
use crate::types::{BinarizationPolicy, BorderPolicy, ChaseMode, FrameStrategy};

/// Reject even (or zero) window sizes.
pub fn ensure_odd_window(size: usize) -> Result<()> {
    if size % 2 == 0 {
        return Err(FolioError::EvenWindowSize { size });
    }
    Ok(())
}

fn ensure_at_least(name: &str, value: usize, min: usize) -> Result<()> {
    if value < min {
        return Err(FolioError::InvalidParameter(format!(
            "{name} must be at least {min}, got {value}"
        )));
    }
    Ok(())
}

/// Page-frame search parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Foreground pixels a chase must follow before the start pixel is
    /// accepted as lying on a page edge.
    pub chase_depth: usize,
    /// Look-ahead budget divisor: a gap may be bridged over at most
    /// `chase_depth / tolerance_factor` pixels.
    pub tolerance_factor: usize,
    /// Successful steps required between two lateral shifts.
    pub allow_shift: usize,
    /// Length of the solid run the erosion fallback looks for.
    pub erosion_boundary: usize,
    pub chase_mode: ChaseMode,
    pub border_policy: BorderPolicy,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            chase_depth: 300,
            tolerance_factor: 20,
            allow_shift: 4,
            erosion_boundary: 150,
            chase_mode: ChaseMode::Tolerant,
            border_policy: BorderPolicy::Reject,
        }
    }
}

impl FrameConfig {
    pub fn validate(&self) -> Result<()> {
        ensure_at_least("chase_depth", self.chase_depth, 2)?;
        ensure_at_least("tolerance_factor", self.tolerance_factor, 1)?;
        ensure_at_least("allow_shift", self.allow_shift, 1)?;
        ensure_at_least("erosion_boundary", self.erosion_boundary, 1)?;
        Ok(())
    }

    /// Maximum number of pixels probed while bridging one gap.
    pub fn look_ahead_budget(&self) -> usize {
        (self.chase_depth / self.tolerance_factor.max(1)).max(1)
    }
}

/// Window sizes for the statistics-based binarizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Small window (local brightness and the variance baseline).
    pub block_size: usize,
    /// Large window (text-region detection).
    pub chunk_size: usize,
    /// Subtracted from the local mean before thresholding.
    pub correction_offset: i32,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            block_size: 9,
            chunk_size: 37,
            correction_offset: 10,
        }
    }
}

impl StatsConfig {
    pub fn validate(&self) -> Result<()> {
        ensure_odd_window(self.block_size)?;
        ensure_odd_window(self.chunk_size)?;
        if self.block_size > self.chunk_size {
            return Err(FolioError::InvalidParameter(format!(
                "block_size ({}) must not exceed chunk_size ({})",
                self.block_size, self.chunk_size
            )));
        }
        Ok(())
    }
}

/// Edge-mask pre-processing parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Median filter radius (kernel side is `2 * radius + 1`).
    pub median_radius: u32,
    /// Length of the `[-1 .. 0 .. +1]` high-pass kernel; must be odd.
    pub high_pass_size: usize,
    /// Gaussian sigma applied to the high-pass response.
    pub blur_sigma: f32,
    /// Responses strictly above this become foreground.
    pub threshold: u8,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            median_radius: 25,
            high_pass_size: 11,
            blur_sigma: 8.0,
            threshold: 30,
        }
    }
}

impl PreprocessConfig {
    pub fn validate(&self) -> Result<()> {
        ensure_odd_window(self.high_pass_size)?;
        ensure_at_least("high_pass_size", self.high_pass_size, 3)?;
        if !self.blur_sigma.is_finite() || self.blur_sigma <= 0.0 {
            return Err(FolioError::InvalidParameter(format!(
                "blur_sigma must be positive, got {}",
                self.blur_sigma
            )));
        }
        Ok(())
    }
}

/// Parameters of the filtering-based binarizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilteringConfig {
    pub block_size: usize,
    pub correction_offset: i32,
    pub blur_sigma: f32,
    pub mask_threshold: u8,
}

impl Default for FilteringConfig {
    fn default() -> Self {
        Self {
            block_size: 19,
            correction_offset: 10,
            blur_sigma: 8.0,
            mask_threshold: 10,
        }
    }
}

impl FilteringConfig {
    pub fn validate(&self) -> Result<()> {
        ensure_odd_window(self.block_size)?;
        if !self.blur_sigma.is_finite() || self.blur_sigma <= 0.0 {
            return Err(FolioError::InvalidParameter(format!(
                "blur_sigma must be positive, got {}",
                self.blur_sigma
            )));
        }
        Ok(())
    }
}

/// Complete pipeline configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub frame: FrameConfig,
    pub stats: StatsConfig,
    pub preprocess: PreprocessConfig,
    pub filtering: FilteringConfig,
    pub strategy: FrameStrategy,
    pub binarization: BinarizationPolicy,
}

impl PipelineConfig {
    /// Parse and validate a JSON configuration. Missing fields take their
    /// defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.frame.validate()?;
        self.stats.validate()?;
        self.preprocess.validate()?;
        self.filtering.validate()?;
        Ok(())
    }
}
