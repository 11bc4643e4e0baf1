//! Floating-point image types

use image::{Rgb, RgbImage};
use ndarray::{Array2, Zip};

use crate::deblur_pipeline::common::error::{RestoreError, Result};

/// A single color plane, indexed `[[row, col]]`, samples nominally in [0, 1].
pub type Channel = Array2<f32>;

/// Planar RGB image with `f32` samples in [0, 1].
///
/// Channel order is R, G, B everywhere in the crate. Every plane has the same
/// `height x width` shape, which is checked on construction.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatImage {
    channels: [Channel; 3],
}

impl FloatImage {
    pub fn from_channels(channels: [Channel; 3]) -> Result<Self> {
        let expected = channels[0].dim();
        if expected.0 == 0 || expected.1 == 0 {
            return Err(RestoreError::InvalidDimensions(expected.1, expected.0));
        }
        for channel in &channels[1..] {
            if channel.dim() != expected {
                return Err(RestoreError::ShapeMismatch {
                    expected,
                    actual: channel.dim(),
                });
            }
        }
        Ok(Self { channels })
    }

    pub fn from_channel_vec(channels: Vec<Channel>) -> Result<Self> {
        let count = channels.len();
        let channels: [Channel; 3] = channels.try_into().map_err(|_| {
            RestoreError::invalid_parameter("channels", format!("expected 3 planes, got {count}"))
        })?;
        Self::from_channels(channels)
    }

    /// Uniform image. Zero dimensions are rejected like in [`FloatImage::from_channels`].
    pub fn filled(height: usize, width: usize, value: f32) -> Result<Self> {
        Self::from_channels(std::array::from_fn(|_| Array2::from_elem((height, width), value)))
    }

    pub fn height(&self) -> usize {
        self.channels[0].nrows()
    }

    pub fn width(&self) -> usize {
        self.channels[0].ncols()
    }

    /// `(height, width)`
    pub fn dimensions(&self) -> (usize, usize) {
        self.channels[0].dim()
    }

    pub fn channel(&self, index: usize) -> &Channel {
        &self.channels[index]
    }

    pub fn channels(&self) -> &[Channel; 3] {
        &self.channels
    }

    pub fn into_channels(self) -> [Channel; 3] {
        self.channels
    }

    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(f32) -> f32,
    {
        Self {
            channels: std::array::from_fn(|c| self.channels[c].mapv(&f)),
        }
    }

    /// Normalizes 8-bit samples by 1/255.
    pub fn from_rgb8(image: &RgbImage) -> Self {
        let (width, height) = image.dimensions();
        let channels = std::array::from_fn(|c| {
            Array2::from_shape_fn((height as usize, width as usize), |(y, x)| {
                image.get_pixel(x as u32, y as u32)[c] as f32 / 255.0
            })
        });
        Self { channels }
    }

    /// Quantizes to 8 bits: clip to [0, 1], scale by 255, truncate.
    pub fn to_rgb8(&self) -> RgbImage {
        let (height, width) = self.dimensions();
        RgbImage::from_fn(width as u32, height as u32, |x, y| {
            let (x, y) = (x as usize, y as usize);
            Rgb(std::array::from_fn(|c| {
                quantize(self.channels[c][[y, x]])
            }))
        })
    }

    /// Mean squared error over every sample of both images.
    pub fn mse(&self, other: &FloatImage) -> Result<f64> {
        if self.dimensions() != other.dimensions() {
            return Err(RestoreError::ShapeMismatch {
                expected: self.dimensions(),
                actual: other.dimensions(),
            });
        }

        let mut total = 0.0f64;
        for (a, b) in self.channels.iter().zip(other.channels.iter()) {
            Zip::from(a).and(b).for_each(|&a, &b| {
                let diff = f64::from(a) - f64::from(b);
                total += diff * diff;
            });
        }
        let count = (self.height() * self.width() * 3) as f64;
        Ok(total / count)
    }
}

fn quantize(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_mismatched_planes() {
        let result = FloatImage::from_channels([
            Array2::zeros((4, 4)),
            Array2::zeros((4, 4)),
            Array2::zeros((4, 5)),
        ]);
        assert!(matches!(
            result,
            Err(RestoreError::ShapeMismatch {
                expected: (4, 4),
                actual: (4, 5)
            })
        ));
    }

    #[test]
    fn test_rejects_empty_planes() {
        let result = FloatImage::from_channels(std::array::from_fn(|_| Array2::zeros((0, 3))));
        assert!(matches!(result, Err(RestoreError::InvalidDimensions(3, 0))));
    }

    #[test]
    fn test_filled_rejects_zero_dimensions() {
        assert!(matches!(FloatImage::filled(0, 4, 0.5), Err(RestoreError::InvalidDimensions(4, 0))));
        assert!(matches!(FloatImage::filled(4, 0, 0.5), Err(RestoreError::InvalidDimensions(0, 4))));
        assert_eq!(FloatImage::filled(2, 3, 0.5).unwrap().dimensions(), (2, 3));
    }

    #[test]
    fn test_from_channel_vec_requires_three_planes() {
        let planes = vec![Array2::zeros((2, 2)), Array2::zeros((2, 2))];
        assert!(FloatImage::from_channel_vec(planes).is_err());
    }

    #[test]
    fn test_rgb8_conversion_keeps_channel_order() {
        let mut rgb = RgbImage::new(3, 2);
        rgb.put_pixel(2, 1, Rgb([255, 51, 0]));

        let image = FloatImage::from_rgb8(&rgb);
        assert_eq!(image.dimensions(), (2, 3));
        assert_eq!(image.channel(0)[[1, 2]], 1.0);
        assert!((image.channel(1)[[1, 2]] - 0.2).abs() < 1e-6);
        assert_eq!(image.channel(2)[[1, 2]], 0.0);

        assert_eq!(image.to_rgb8(), rgb);
    }

    #[test]
    fn test_quantize_clips_and_truncates() {
        assert_eq!(quantize(-0.5), 0);
        assert_eq!(quantize(2.0), 255);
        assert_eq!(quantize(0.999), 254);
        assert_eq!(quantize(f32::NAN), 0);
    }

    #[test]
    fn test_mse() {
        let a = FloatImage::filled(4, 4, 0.25).unwrap();
        let b = FloatImage::filled(4, 4, 0.75).unwrap();
        assert!((a.mse(&b).unwrap() - 0.25).abs() < 1e-12);
        assert_eq!(a.mse(&a).unwrap(), 0.0);
        assert!(a.mse(&FloatImage::filled(4, 5, 0.0).unwrap()).is_err());
    }
}
