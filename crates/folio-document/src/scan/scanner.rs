// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page scanning pipeline: photo -> edge mask -> page frame -> crop ->
// binarized page.

use std::borrow::Cow;
use std::path::Path;

use folio_core::config::PipelineConfig;
use folio_core::error::{FolioError, Result};
use folio_core::{BinarizationPolicy, Rect};
use image::{DynamicImage, GrayImage};
use serde::Serialize;
use tracing::{info, instrument};

use super::binarize::{FilteringBinarizer, StatisticsBinarizer};
use super::preprocess::build_edge_mask;
use crate::frame::{PageFrame, PageFrameLocator};
use crate::image::{GrayView, ImageProcessor};

/// Result of a full pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct ScanOutput {
    pub frame: PageFrame,
    /// The binarized page, cropped to `frame.rect`.
    #[serde(skip)]
    pub page: GrayImage,
}

/// Runs the page pipeline over one grayscale photograph.
///
/// The photo and the configuration are fixed at construction; every stage
/// reads them and allocates its own working buffers.
pub struct PageScanner {
    image: GrayImage,
    /// Caller-supplied edge mask. Built from the photo when absent.
    mask: Option<GrayImage>,
    config: PipelineConfig,
    locator: PageFrameLocator,
}

impl PageScanner {
    // -- Construction ---------------------------------------------------------

    /// Wrap a grayscale photo. The configuration is validated here, before
    /// any pixel is touched.
    pub fn new(image: GrayImage, config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let locator = PageFrameLocator::new(config.frame.clone())?;
        Ok(Self {
            image,
            mask: None,
            config,
            locator,
        })
    }

    /// Load a photo from a file. Colour images are reduced to luma.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>, config: PipelineConfig) -> Result<Self> {
        Self::new(ImageProcessor::open(path)?.to_gray(), config)
    }

    /// Decode a photo from encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data, config), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8], config: PipelineConfig) -> Result<Self> {
        Self::new(ImageProcessor::from_bytes(data)?.to_gray(), config)
    }

    pub fn from_dynamic(image: DynamicImage, config: PipelineConfig) -> Result<Self> {
        Self::new(image.to_luma8(), config)
    }

    /// Use a precomputed edge mask instead of building one.
    pub fn with_mask(mut self, mask: GrayImage) -> Result<Self> {
        if mask.dimensions() != self.image.dimensions() {
            return Err(FolioError::DimensionMismatch {
                image: self.image.dimensions(),
                mask: mask.dimensions(),
            });
        }
        self.mask = Some(mask);
        Ok(self)
    }

    // -- Accessors ------------------------------------------------------------

    pub fn image(&self) -> &GrayImage {
        &self.image
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    // -- Stages ---------------------------------------------------------------

    /// The caller's mask, or one built from the photo.
    pub fn edge_mask(&self) -> Result<Cow<'_, GrayImage>> {
        match &self.mask {
            Some(mask) => Ok(Cow::Borrowed(mask)),
            None => build_edge_mask(&self.image, &self.config.preprocess).map(Cow::Owned),
        }
    }

    /// Locate the page frame using the configured strategy.
    pub fn locate_frame(&self) -> Result<PageFrame> {
        let mask = self.edge_mask()?;
        Ok(self
            .locator
            .locate_view(&GrayView::new(&mask), self.config.strategy))
    }

    /// The photo cropped to `rect` (clamped to the photo).
    pub fn crop_to_frame(&self, rect: Rect) -> GrayImage {
        GrayView::new(&self.image).sub_view(rect).to_image()
    }

    /// Binarize `page` with the configured policy.
    pub fn binarize(&self, page: &GrayImage) -> Result<GrayImage> {
        let view = GrayView::new(page);
        match self.config.binarization {
            BinarizationPolicy::Statistics => StatisticsBinarizer::new(&self.config.stats).binarize(&view),
            BinarizationPolicy::Filtering => {
                FilteringBinarizer::new(&self.config.filtering, &self.config.preprocess).binarize(&view)
            }
        }
    }

    /// Run every stage.
    #[instrument(skip(self), fields(width = self.image.width(), height = self.image.height()))]
    pub fn process(&self) -> Result<ScanOutput> {
        let frame = self.locate_frame()?;
        let cropped = self.crop_to_frame(frame.rect);
        let page = self.binarize(&cropped)?;
        info!(rect = %frame.rect, "Page processed");
        Ok(ScanOutput { frame, page })
    }
}
