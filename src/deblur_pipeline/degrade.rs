//! Synthetic Gaussian degradation
//!
//! Separable Gaussian blur used to produce the "blurred" half of the round trip.
//! Kernel length and border handling follow the common OpenCV convention for
//! floating-point images: `round(8·sigma + 1) | 1` taps and reflect-101 borders
//! (`gfedcb|abcdefgh|gfedcba`).

use ndarray::Array2;
use tracing::debug;

use crate::deblur_pipeline::common::error::{RestoreError, Result};
use crate::deblur_pipeline::io::types::{Channel, FloatImage};
use crate::deblur_pipeline::psf::MAX_SIGMA;

pub fn blur_kernel_len(sigma: f32) -> usize {
    ((8.0 * f64::from(sigma) + 1.0).round() as usize) | 1
}

/// Normalized 1-D Gaussian taps.
pub fn gaussian_kernel_1d(sigma: f32) -> Result<Vec<f64>> {
    if !sigma.is_finite() || sigma <= 0.0 || sigma > MAX_SIGMA {
        return Err(RestoreError::invalid_parameter(
            "sigma",
            format!("must be in (0, {MAX_SIGMA}], got {sigma}"),
        ));
    }

    let len = blur_kernel_len(sigma);
    let center = (len / 2) as f64;
    let two_sigma_sq = 2.0 * f64::from(sigma).powi(2);
    let mut taps: Vec<f64> = (0..len)
        .map(|i| {
            let d = i as f64 - center;
            (-(d * d) / two_sigma_sq).exp()
        })
        .collect();
    let sum: f64 = taps.iter().sum();
    taps.iter_mut().for_each(|t| *t /= sum);
    Ok(taps)
}

fn reflect101(index: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let len = len as isize;
    let period = 2 * (len - 1);
    let wrapped = index.rem_euclid(period);
    if wrapped >= len {
        (period - wrapped) as usize
    } else {
        wrapped as usize
    }
}

pub fn blur_channel(channel: &Channel, taps: &[f64]) -> Channel {
    let (rows, cols) = channel.dim();
    let radius = (taps.len() / 2) as isize;

    let horizontal = Array2::from_shape_fn((rows, cols), |(y, x)| {
        taps.iter()
            .enumerate()
            .map(|(i, &t)| {
                let sx = reflect101(x as isize + i as isize - radius, cols);
                t * f64::from(channel[[y, sx]])
            })
            .sum::<f64>()
    });

    Array2::from_shape_fn((rows, cols), |(y, x)| {
        taps.iter()
            .enumerate()
            .map(|(i, &t)| {
                let sy = reflect101(y as isize + i as isize - radius, rows);
                t * horizontal[[sy, x]]
            })
            .sum::<f64>() as f32
    })
}

/// Blurs every channel independently with a Gaussian of spread `sigma`.
pub fn gaussian_blur(image: &FloatImage, sigma: f32) -> Result<FloatImage> {
    let taps = gaussian_kernel_1d(sigma)?;
    debug!("Synthetic blur: sigma={}, taps={}", sigma, taps.len());
    FloatImage::from_channels(std::array::from_fn(|c| blur_channel(image.channel(c), &taps)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_kernel_length_follows_sigma() {
        assert_eq!(blur_kernel_len(7.0), 57);
        assert_eq!(blur_kernel_len(1.0), 9);
        assert_eq!(blur_kernel_len(0.5), 5);
    }

    #[test]
    fn test_kernel_is_normalized_and_symmetric() {
        let taps = gaussian_kernel_1d(7.0).unwrap();
        assert_abs_diff_eq!(taps.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        for i in 0..taps.len() {
            assert_abs_diff_eq!(taps[i], taps[taps.len() - 1 - i], epsilon = 1e-15);
        }
        assert!(gaussian_kernel_1d(0.0).is_err());
    }

    #[test]
    fn test_reflect101() {
        let len = 5;
        let mapped: Vec<usize> = (-6..11).map(|i| reflect101(i, len)).collect();
        assert_eq!(mapped, vec![2, 3, 4, 3, 2, 1, 0, 1, 2, 3, 4, 3, 2, 1, 0, 1, 2]);
        assert_eq!(reflect101(-3, 1), 0);
    }

    #[test]
    fn test_constant_image_is_unchanged() {
        let image = FloatImage::filled(12, 9, 0.3).unwrap();
        let blurred = gaussian_blur(&image, 2.0).unwrap();
        for channel in blurred.channels() {
            for &v in channel.iter() {
                assert_abs_diff_eq!(v, 0.3, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_rejects_out_of_range_sigma() {
        assert!(gaussian_kernel_1d(0.0).is_err());
        assert!(gaussian_kernel_1d(f32::NAN).is_err());
        assert!(gaussian_kernel_1d(1.0e30).is_err());
    }

    #[test]
    fn test_blur_spreads_an_impulse_and_keeps_mass() {
        let mut channel = Array2::zeros((31, 31));
        channel[[15, 15]] = 1.0;
        let taps = gaussian_kernel_1d(2.0).unwrap();
        let blurred = blur_channel(&channel, &taps);

        assert_abs_diff_eq!(blurred.sum(), 1.0, epsilon = 1e-5);
        assert!(blurred[[15, 15]] < 0.1);
        assert_abs_diff_eq!(blurred[[15, 12]], blurred[[15, 18]], epsilon = 1e-7);
        assert_abs_diff_eq!(blurred[[12, 15]], blurred[[15, 12]], epsilon = 1e-7);
    }
}
