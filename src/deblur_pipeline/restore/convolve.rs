//! Same-size linear convolution with replicated borders.
//!
//! The channel is padded by the kernel radius using edge replication, convolved
//! circularly on the padded grid through [`Fft2d`], and the interior is cropped
//! back out. Because the padding is at least the kernel radius, no output pixel
//! sees wrapped-around data, so the result equals a direct spatial convolution
//! with `clamp-to-edge` boundary handling.

use ndarray::{Array2, s};

use crate::deblur_pipeline::common::error::{RestoreError, Result};
use crate::deblur_pipeline::psf::embed_psf;
use crate::deblur_pipeline::restore::fft::{Fft2d, Spectrum};

pub struct FftConvolver {
    shape: (usize, usize),
    radius: (usize, usize),
    fft: Fft2d,
    kernel_spectrum: Spectrum,
    flipped_spectrum: Spectrum,
}

impl FftConvolver {
    /// Prepares spectra of `kernel` and of its 180° rotation for channels of `shape`.
    pub fn new(kernel: &Array2<f64>, shape: (usize, usize)) -> Result<Self> {
        let (kh, kw) = kernel.dim();
        if kh % 2 == 0 || kw % 2 == 0 {
            return Err(RestoreError::invalid_parameter(
                "kernel",
                format!("side lengths must be odd, got {kh}x{kw}"),
            ));
        }
        if shape.0 == 0 || shape.1 == 0 {
            return Err(RestoreError::InvalidDimensions(shape.1, shape.0));
        }

        let radius = (kh / 2, kw / 2);
        let padded = (shape.0 + 2 * radius.0, shape.1 + 2 * radius.1);
        let fft = Fft2d::new(padded);

        let kernel_spectrum = fft.forward_real(&embed_psf(kernel, padded)?)?;
        let flipped = kernel.slice(s![..;-1, ..;-1]).to_owned();
        let flipped_spectrum = fft.forward_real(&embed_psf(&flipped, padded)?)?;

        Ok(Self {
            shape,
            radius,
            fft,
            kernel_spectrum,
            flipped_spectrum,
        })
    }

    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    /// `channel * kernel`
    pub fn convolve(&self, channel: &Array2<f64>) -> Result<Array2<f64>> {
        self.apply(channel, &self.kernel_spectrum)
    }

    /// `channel * flip(kernel)`, i.e. correlation with the kernel.
    pub fn correlate(&self, channel: &Array2<f64>) -> Result<Array2<f64>> {
        self.apply(channel, &self.flipped_spectrum)
    }

    fn apply(&self, channel: &Array2<f64>, spectrum: &Spectrum) -> Result<Array2<f64>> {
        if channel.dim() != self.shape {
            return Err(RestoreError::ShapeMismatch {
                expected: self.shape,
                actual: channel.dim(),
            });
        }

        let padded = pad_replicate(channel, self.radius);
        let mut frequencies = self.fft.forward_real(&padded)?;
        frequencies *= spectrum;
        let filtered = self.fft.inverse_real(frequencies)?;

        let (ry, rx) = self.radius;
        let (rows, cols) = self.shape;
        Ok(filtered.slice(s![ry..ry + rows, rx..rx + cols]).to_owned())
    }
}

fn pad_replicate(channel: &Array2<f64>, radius: (usize, usize)) -> Array2<f64> {
    let (rows, cols) = channel.dim();
    let (ry, rx) = radius;
    Array2::from_shape_fn((rows + 2 * ry, cols + 2 * rx), |(y, x)| {
        let sy = y.saturating_sub(ry).min(rows - 1);
        let sx = x.saturating_sub(rx).min(cols - 1);
        channel[[sy, sx]]
    })
}
