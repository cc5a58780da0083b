// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for page-frame localization.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FolioError;

/// Axis-aligned rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The rectangle covering a whole `width` x `height` image.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Exclusive right edge (`x + width`).
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge (`y + height`).
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether the rectangle lies entirely inside a `width` x `height` image.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= width && self.bottom() <= height
    }

    /// Clamp the rectangle to image bounds. An empty result falls back to the
    /// full image, so the returned rectangle always has a positive area when
    /// the image does.
    pub fn clamp_to(&self, width: u32, height: u32) -> Self {
        let x = self.x.min(width.saturating_sub(1));
        let y = self.y.min(height.saturating_sub(1));
        let clamped = Self::new(
            x,
            y,
            self.width.min(width - x),
            self.height.min(height - y),
        );
        if clamped.is_empty() {
            Self::full(width, height)
        } else {
            clamped
        }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// Travel direction of a chase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Top to bottom (row increases).
    #[serde(rename = "N_S")]
    NorthSouth,
    /// Bottom to top (row decreases).
    #[serde(rename = "S_N")]
    SouthNorth,
    /// Left to right (column increases).
    #[serde(rename = "W_E")]
    WestEast,
    /// Right to left (column decreases).
    #[serde(rename = "E_W")]
    EastWest,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::NorthSouth,
        Direction::SouthNorth,
        Direction::WestEast,
        Direction::EastWest,
    ];

    /// Short code used in configuration and logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NorthSouth => "N_S",
            Self::SouthNorth => "S_N",
            Self::WestEast => "W_E",
            Self::EastWest => "E_W",
        }
    }

    /// True for north/south travel.
    pub fn is_vertical(&self) -> bool {
        matches!(self, Self::NorthSouth | Self::SouthNorth)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Direction {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "N_S" | "NS" => Ok(Self::NorthSouth),
            "S_N" | "SN" => Ok(Self::SouthNorth),
            "W_E" | "WE" => Ok(Self::WestEast),
            "E_W" | "EW" => Ok(Self::EastWest),
            _ => Err(FolioError::UnknownDirection(s.to_string())),
        }
    }
}

/// Result of a single chase attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChaseOutcome {
    /// A run of the configured depth was followed: the start pixel lies on a
    /// page-like edge.
    Edge,
    /// The start pixel is background, or the line broke off for longer than
    /// the look-ahead budget allows.
    Rejected,
    /// A probe would have left the image before the run was long enough.
    ReachedBorder,
}

/// What a chase that reaches the image border counts as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BorderPolicy {
    #[default]
    Reject,
    Accept,
}

impl BorderPolicy {
    /// Collapse a chase outcome into an accept/reject verdict.
    pub fn verdict(&self, outcome: ChaseOutcome) -> bool {
        match outcome {
            ChaseOutcome::Edge => true,
            ChaseOutcome::Rejected => false,
            ChaseOutcome::ReachedBorder => *self == Self::Accept,
        }
    }
}

/// Chasing behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChaseMode {
    /// Lateral shifts and line-fit look-ahead across gaps.
    #[default]
    Tolerant,
    /// Only perfectly straight, unbroken runs are accepted.
    Exact,
}

/// A provisional corner position plus which axis was directly observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CornerCandidate {
    pub col: u32,
    pub row: u32,
    pub col_confident: bool,
    pub row_confident: bool,
}

impl CornerCandidate {
    pub fn new(col: u32, row: u32, col_confident: bool, row_confident: bool) -> Self {
        Self {
            col,
            row,
            col_confident,
            row_confident,
        }
    }

    /// A candidate with no observed axis.
    pub fn unresolved(col: u32, row: u32) -> Self {
        Self::new(col, row, false, false)
    }

    /// Whether either axis was observed.
    pub fn is_resolved(&self) -> bool {
        self.col_confident || self.row_confident
    }
}

/// How two equally trusted coordinates are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TieBreak {
    Min,
    Max,
}

impl TieBreak {
    pub fn apply(&self, a: u32, b: u32) -> u32 {
        match self {
            Self::Min => a.min(b),
            Self::Max => a.max(b),
        }
    }
}

/// One of the four page corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    pub fn is_top(&self) -> bool {
        matches!(self, Self::TopLeft | Self::TopRight)
    }

    pub fn is_left(&self) -> bool {
        matches!(self, Self::TopLeft | Self::BottomLeft)
    }

    /// Column tie-break: the outermost column wins.
    pub fn col_tie_break(&self) -> TieBreak {
        if self.is_left() { TieBreak::Min } else { TieBreak::Max }
    }

    /// Row tie-break: the outermost row wins.
    pub fn row_tie_break(&self) -> TieBreak {
        if self.is_top() { TieBreak::Min } else { TieBreak::Max }
    }

    /// The image extreme this corner defaults to when nothing is observed.
    pub fn image_extreme(&self, width: u32, height: u32) -> (u32, u32) {
        let col = if self.is_left() { 0 } else { width.saturating_sub(1) };
        let row = if self.is_top() { 0 } else { height.saturating_sub(1) };
        (col, row)
    }
}

/// How the page frame is located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrameStrategy {
    /// Edge chasing with confidence-weighted corner resolution.
    #[default]
    Chase,
    /// Straight-run erosion from each side.
    Erosion,
    /// Edge chasing, then erosion inside the chased rectangle.
    ChaseThenErode,
}

impl FromStr for FrameStrategy {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "chase" => Ok(Self::Chase),
            "erosion" | "erode" => Ok(Self::Erosion),
            "chase-then-erode" => Ok(Self::ChaseThenErode),
            other => Err(FolioError::InvalidParameter(format!(
                "unknown frame strategy: {other}"
            ))),
        }
    }
}

/// Which binarizer consumes the located page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BinarizationPolicy {
    /// Local mean thresholding inside high-variance (text) regions.
    #[default]
    Statistics,
    /// Local mean thresholding inside a high-pass edge mask.
    Filtering,
}

impl FromStr for BinarizationPolicy {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "statistics" | "stats" => Ok(Self::Statistics),
            "filtering" | "filter" => Ok(Self::Filtering),
            other => Err(FolioError::InvalidParameter(format!(
                "unknown binarization policy: {other}"
            ))),
        }
    }
}
