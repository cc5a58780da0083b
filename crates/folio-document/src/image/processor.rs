// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor: decoding, grayscale conversion, cropping and encoding of
// in-memory images using the `image` crate.

use folio_core::error::FolioError;
use folio_core::Rect;
use image::{DynamicImage, GrayImage, ImageFormat};
use tracing::{debug, info, instrument};

/// Image I/O wrapper around a single in-memory image.
///
/// Transformations consume `self` and return a new `ImageProcessor`, enabling
/// method chaining:
///
/// ```ignore
/// let page = ImageProcessor::open("photo.jpg")?
///     .crop(frame.rect)
///     .to_png_bytes()?;
/// ```
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, FolioError> {
        let img = image::open(path.as_ref()).map_err(|err| {
            FolioError::ImageError(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        info!(
            width = img.width(),
            height = img.height(),
            "Image loaded"
        );
        Ok(Self { image: img })
    }

    /// Create a processor from raw encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, FolioError> {
        let img = image::load_from_memory(data).map_err(|err| {
            FolioError::ImageError(format!("failed to decode image: {}", err))
        })?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    /// Wrap an 8-bit grayscale buffer.
    pub fn from_gray(image: GrayImage) -> Self {
        Self {
            image: DynamicImage::ImageLuma8(image),
        }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Single-channel 8-bit copy of the image. Colour input is reduced to luma.
    pub fn to_gray(&self) -> GrayImage {
        self.image.to_luma8()
    }

    // -- Transformations -------------------------------------------------------

    /// Crop to `rect`, clamped to the image bounds.
    #[instrument(skip(self))]
    pub fn crop(self, rect: Rect) -> Self {
        let safe = rect.clamp_to(self.image.width(), self.image.height());
        info!(
            x = safe.x,
            y = safe.y,
            width = safe.width,
            height = safe.height,
            "Cropping image"
        );
        let cropped = self.image.crop_imm(safe.x, safe.y, safe.width, safe.height);
        Self { image: cropped }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, FolioError> {
        encode_to_format(&self.image, ImageFormat::Png)
    }

    /// Write the image to a file. The format is inferred from the file extension.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<(), FolioError> {
        self.image.save(path.as_ref()).map_err(|err| {
            FolioError::ImageError(format!(
                "failed to save image to {}: {}",
                path.as_ref().display(),
                err
            ))
        })
    }
}

/// Encode a `DynamicImage` into the specified format, returning the raw bytes.
fn encode_to_format(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, FolioError> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    image
        .write_to(&mut cursor, format)
        .map_err(|err| FolioError::ImageError(format!("image encoding failed: {}", err)))?;
    Ok(buffer)
}
