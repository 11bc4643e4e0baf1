//! Input decoding through the `image` crate.
//!
//! PNG, JPEG, BMP and WEBP inputs are recognised from their content, converted to
//! 8-bit RGB and normalized to `[0, 1]` floating point.

use std::path::Path;

use tracing::debug;

use crate::deblur_pipeline::common::error::{RestoreError, Result};
use crate::deblur_pipeline::io::source::ImageSource;
use crate::deblur_pipeline::io::types::FloatImage;

/// Default [`ImageSource`] backed by the `image` crate's format detection.
pub struct ImageCrateSource;

impl ImageSource for ImageCrateSource {
    /// Reads and decodes an image file.
    ///
    /// A missing or unreadable file yields [`RestoreError::InputReadError`]; bytes
    /// that no enabled codec understands yield [`RestoreError::DecodeError`]. Both
    /// are treated as skips by the batch runner.
    fn read_image(&self, path: &Path) -> Result<FloatImage> {
        let bytes = std::fs::read(path).map_err(|e| {
            RestoreError::InputReadError(format!("{}: {}", path.display(), e))
        })?;

        debug!("Decoding {}, {} bytes", path.display(), bytes.len());

        let decoded = image::load_from_memory(&bytes)
            .map_err(|e| RestoreError::DecodeError(format!("{}: {}", path.display(), e)))?;

        let rgb = decoded.to_rgb8();
        let (width, height) = rgb.dimensions();
        if width == 0 || height == 0 {
            return Err(RestoreError::InvalidDimensions(width as usize, height as usize));
        }

        debug!("Decoded image: {}x{}", width, height);

        Ok(FloatImage::from_rgb8(&rgb))
    }
}
