// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Borrowed, read-only grayscale views. Algorithms address pixels as
// `(row, col)` relative to the view origin; the pixels stay owned by the
// caller's `GrayImage`.

use folio_core::error::{FolioError, Result};
use folio_core::Rect;
use image::GrayImage;

/// Read-only window onto an 8-bit grayscale buffer.
#[derive(Debug, Clone, Copy)]
pub struct GrayView<'a> {
    data: &'a [u8],
    /// Samples between consecutive rows of the backing buffer.
    stride: usize,
    /// Offset of the view's (0, 0) inside the backing buffer.
    origin: (usize, usize),
    width: usize,
    height: usize,
}

impl<'a> GrayView<'a> {
    /// View covering a whole image.
    pub fn new(image: &'a GrayImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            data: image.as_raw(),
            stride: width as usize,
            origin: (0, 0),
            width: width as usize,
            height: height as usize,
        }
    }

    /// View over a tightly packed row-major buffer.
    pub fn from_raw(data: &'a [u8], width: usize, height: usize) -> Result<Self> {
        if data.len() < width * height {
            return Err(FolioError::InvalidParameter(format!(
                "buffer holds {} samples, {}x{} needs {}",
                data.len(),
                width,
                height,
                width * height
            )));
        }
        Ok(Self {
            data,
            stride: width,
            origin: (0, 0),
            width,
            height,
        })
    }

    /// Sub-rectangle of this view. `rect` is relative to the view and is
    /// clamped to it.
    pub fn sub_view(&self, rect: Rect) -> Self {
        let rect = rect.clamp_to(self.width as u32, self.height as u32);
        Self {
            data: self.data,
            stride: self.stride,
            origin: (
                self.origin.0 + rect.x as usize,
                self.origin.1 + rect.y as usize,
            ),
            width: rect.width as usize,
            height: rect.height as usize,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// `(x, y)` of this view inside the backing buffer.
    pub fn origin(&self) -> (usize, usize) {
        self.origin
    }

    /// One row of the view. Panics if `row` is out of range.
    #[inline]
    pub fn row(&self, row: usize) -> &'a [u8] {
        assert!(row < self.height, "row {row} outside view of height {}", self.height);
        let start = (self.origin.1 + row) * self.stride + self.origin.0;
        &self.data[start..start + self.width]
    }

    /// Sample at `(row, col)`, or `None` outside the view.
    #[inline]
    pub fn get(&self, row: isize, col: isize) -> Option<u8> {
        if row < 0 || col < 0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        if row >= self.height || col >= self.width {
            return None;
        }
        Some(self.data[(self.origin.1 + row) * self.stride + self.origin.0 + col])
    }

    /// Non-zero samples are foreground. Out-of-view coordinates are not.
    #[inline]
    pub fn is_foreground(&self, row: isize, col: isize) -> bool {
        matches!(self.get(row, col), Some(v) if v != 0)
    }

    /// Copy the viewed pixels into an owned image.
    pub fn to_image(&self) -> GrayImage {
        let mut buffer = Vec::with_capacity(self.width * self.height);
        for row in 0..self.height {
            buffer.extend_from_slice(self.row(row));
        }
        GrayImage::from_raw(self.width as u32, self.height as u32, buffer)
            .unwrap_or_else(|| GrayImage::new(self.width as u32, self.height as u32))
    }
}
