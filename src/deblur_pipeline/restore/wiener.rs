//! Frequency-domain Wiener deconvolution.

use ndarray::{Array2, Zip};
use rustfft::num_complex::Complex;
use tracing::debug;

use crate::deblur_pipeline::common::error::{RestoreError, Result};
use crate::deblur_pipeline::restore::fft::{Fft2d, Spectrum};

/// Regularized inverse filter for one embedded PSF.
///
/// The transfer function `conj(H) / (|H|² + K)` is computed once and reused
/// for every channel; each call to [`WienerFilter::apply`] is an independent
/// closed-form pass.
pub struct WienerFilter {
    fft: Fft2d,
    transfer: Spectrum,
    k: f64,
}

impl WienerFilter {
    /// # Arguments
    ///
    /// * `embedded_psf` - PSF already embedded and rolled to the channel shape (see [`crate::deblur_pipeline::psf::embed_psf`])
    /// * `k` - Noise-to-signal regularization constant, must be positive
    pub fn new(embedded_psf: &Array2<f64>, k: f64) -> Result<Self> {
        if !k.is_finite() || k <= 0.0 {
            return Err(RestoreError::invalid_parameter(
                "wiener_k",
                format!("must be > 0, got {k}"),
            ));
        }

        let fft = Fft2d::new(embedded_psf.dim());
        let psf_spectrum = fft.forward_real(embedded_psf)?;
        let transfer = psf_spectrum.mapv(|h: Complex<f64>| h.conj() / (h.norm_sqr() + k));

        debug!(
            "Prepared Wiener transfer function: shape={:?}, K={}",
            embedded_psf.dim(),
            k
        );
        Ok(Self { fft, transfer, k })
    }

    pub fn k(&self) -> f64 {
        self.k
    }

    /// Restores one channel and clips the result to `[0, 1]`.
    pub fn apply(&self, channel: &Array2<f32>) -> Result<Array2<f32>> {
        if channel.dim() != self.fft.shape() {
            return Err(RestoreError::ShapeMismatch {
                expected: self.fft.shape(),
                actual: channel.dim(),
            });
        }

        let mut spectrum = self
            .fft
            .forward_real(&channel.mapv(f64::from))?;
        Zip::from(&mut spectrum)
            .and(&self.transfer)
            .for_each(|g, &w| *g *= w);
        let restored = self.fft.inverse_real(spectrum)?;

        Ok(restored.mapv(|v| v.clamp(0.0, 1.0) as f32))
    }
}

/// One-shot Wiener restoration of a single channel.
pub fn wiener_filter(channel: &Array2<f32>, embedded_psf: &Array2<f64>, k: f64) -> Result<Array2<f32>> {
    WienerFilter::new(embedded_psf, k)?.apply(channel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deblur_pipeline::psf::{build_gaussian_psf, embed_psf};
    use crate::deblur_pipeline::restore::convolve::FftConvolver;

    fn embedded(shape: (usize, usize)) -> Array2<f64> {
        embed_psf(&build_gaussian_psf(9, 1.5).unwrap(), shape).unwrap()
    }

    #[test]
    fn test_all_zero_restores_to_zero() {
        let out = wiener_filter(&Array2::zeros((16, 24)), &embedded((16, 24)), 0.002).unwrap();
        assert!(out.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_all_one_stays_in_range() {
        let out = wiener_filter(&Array2::ones((16, 24)), &embedded((16, 24)), 0.002).unwrap();
        assert!(out.iter().all(|&v| (0.0..=1.0).contains(&v)));
        assert!(out.iter().all(|&v| v > 0.99));
    }

    #[test]
    fn test_output_always_in_unit_range() {
        let channel = Array2::from_shape_fn((20, 20), |(y, x)| if (y / 4 + x / 4) % 2 == 0 { 1.0 } else { 0.0 });
        for &k in &[1e-6, 0.002, 0.5] {
            let out = wiener_filter(&channel, &embedded((20, 20)), k).unwrap();
            assert!(out.iter().all(|&v| (0.0..=1.0).contains(&v)));
        }
    }

    #[test]
    fn test_undoes_circular_blur() {
        let shape = (32, 32);
        let psf = build_gaussian_psf(5, 1.0).unwrap();
        let sharp = Array2::from_shape_fn(shape, |(y, x)| {
            if (10..22).contains(&y) && (10..22).contains(&x) { 0.8 } else { 0.2 }
        });

        // Flat margins wider than the kernel make replicated and circular borders agree.
        let blurred = FftConvolver::new(&psf, shape)
            .unwrap()
            .convolve(&sharp)
            .unwrap()
            .mapv(|v| v as f32);
        let restored = wiener_filter(&blurred, &embed_psf(&psf, shape).unwrap(), 1e-4).unwrap();

        let error = |a: &Array2<f32>| {
            a.iter()
                .zip(sharp.iter())
                .map(|(&a, &b)| (f64::from(a) - b).powi(2))
                .sum::<f64>()
        };
        assert!(error(&restored) < 0.25 * error(&blurred));
    }

    #[test]
    fn test_rejects_non_positive_k() {
        assert!(WienerFilter::new(&embedded((12, 12)), 0.0).is_err());
        assert!(WienerFilter::new(&embedded((12, 12)), -0.1).is_err());
        assert!(WienerFilter::new(&embedded((12, 12)), f64::NAN).is_err());
    }

    #[test]
    fn test_rejects_shape_mismatch() {
        let filter = WienerFilter::new(&embedded((12, 12)), 0.01).unwrap();
        let err = filter.apply(&Array2::zeros((12, 13))).unwrap_err();
        assert!(matches!(err, RestoreError::ShapeMismatch { .. }));
    }
}
