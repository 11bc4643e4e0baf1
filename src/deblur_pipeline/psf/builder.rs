use ndarray::Array2;
use tracing::debug;

use crate::deblur_pipeline::common::error::{RestoreError, Result};
use crate::deblur_pipeline::psf::Kernel;

/// Largest accepted spread. Keeps kernel lengths derived from sigma well
/// inside `usize`.
pub const MAX_SIGMA: f32 = 1.0e6;

/// Kernel side length covering about three standard deviations on each side.
///
/// Truncates `6 * sigma` and forces the result odd, so `sigma = 7` gives 43.
pub fn psf_size_for_sigma(sigma: f32) -> usize {
    ((6.0 * sigma) as usize) | 1
}

/// Builds a normalized `size x size` Gaussian kernel.
///
/// The entry at offset `(dx, dy)` from the center is
/// `exp(-(dx² + dy²) / (2·sigma²))` before the whole kernel is divided by its sum.
///
/// # Errors
///
/// * [`RestoreError::InvalidParameter`] when `size` is zero or even, or when
///   `sigma` is not a finite positive number.
pub fn build_gaussian_psf(size: usize, sigma: f32) -> Result<Kernel> {
    if size == 0 || size % 2 == 0 {
        return Err(RestoreError::invalid_parameter(
            "psf_size",
            format!("must be odd and positive, got {size}"),
        ));
    }
    if !sigma.is_finite() || sigma <= 0.0 || sigma > MAX_SIGMA {
        return Err(RestoreError::invalid_parameter(
            "sigma",
            format!("must be in (0, {MAX_SIGMA}], got {sigma}"),
        ));
    }

    let center = (size / 2) as f64;
    let two_sigma_sq = 2.0 * f64::from(sigma).powi(2);

    let mut kernel = Array2::from_shape_fn((size, size), |(y, x)| {
        let dy = y as f64 - center;
        let dx = x as f64 - center;
        (-(dx * dx + dy * dy) / two_sigma_sq).exp()
    });

    let sum = kernel.sum();
    kernel.mapv_inplace(|v| v / sum);

    debug!("Built Gaussian PSF: size={}, sigma={}", size, sigma);
    Ok(kernel)
}
