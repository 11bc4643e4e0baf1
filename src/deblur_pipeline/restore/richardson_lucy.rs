//! Richardson–Lucy multiplicative refinement.
//!
//! Each iteration computes
//!
//! ```text
//! c     = u_t * K
//! r     = observed / max(c, ε)
//! u_t+1 = u_t · (r * flip(K))
//! ```
//!
//! In the hybrid pipeline the starting estimate `u_0` is the Wiener output while
//! `observed` is the blurred input itself, not the Wiener output. Textbook RL
//! starts from the observation; seeding from the Wiener estimate changes the
//! convergence path and is what the comparison output is built from.
//!
//! Convolutions use replicated borders (see [`FftConvolver`]).

use ndarray::{Array2, Zip};
use tracing::trace;

use crate::deblur_pipeline::common::error::{RestoreError, Result};
use crate::deblur_pipeline::restore::convolve::FftConvolver;

/// Floor applied to the re-blurred estimate before dividing.
pub const RL_EPSILON: f64 = 1e-12;

pub struct RichardsonLucy {
    convolver: FftConvolver,
    iterations: usize,
}

impl RichardsonLucy {
    /// `psf` is the small, un-embedded kernel.
    pub fn new(psf: &Array2<f64>, shape: (usize, usize), iterations: usize) -> Result<Self> {
        Ok(Self {
            convolver: FftConvolver::new(psf, shape)?,
            iterations,
        })
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Runs exactly `iterations` updates starting from `estimate`; there is no early stop.
    ///
    /// With zero iterations the estimate is returned untouched. Otherwise the
    /// final estimate is clipped to `[0, 1]`.
    pub fn refine(&self, estimate: &Array2<f32>, observed: &Array2<f32>) -> Result<Array2<f32>> {
        if estimate.dim() != observed.dim() {
            return Err(RestoreError::ShapeMismatch {
                expected: observed.dim(),
                actual: estimate.dim(),
            });
        }
        if self.iterations == 0 {
            return Ok(estimate.clone());
        }

        let observed = observed.mapv(f64::from);
        let mut current = estimate.mapv(f64::from);

        for iteration in 0..self.iterations {
            let reblurred = self.convolver.convolve(&current)?;
            let ratio = Zip::from(&observed)
                .and(&reblurred)
                .map_collect(|&o, &c| o / c.max(RL_EPSILON));
            let correction = self.convolver.correlate(&ratio)?;
            current *= &correction;

            trace!(iteration, mean = current.mean().unwrap_or(0.0), "Richardson-Lucy step");
        }

        Ok(current.mapv(|v| v.clamp(0.0, 1.0) as f32))
    }
}

/// One-shot refinement of a single channel.
pub fn richardson_lucy(
    estimate: &Array2<f32>,
    observed: &Array2<f32>,
    psf: &Array2<f64>,
    iterations: usize,
) -> Result<Array2<f32>> {
    RichardsonLucy::new(psf, observed.dim(), iterations)?.refine(estimate, observed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deblur_pipeline::psf::build_gaussian_psf;
    use approx::assert_abs_diff_eq;

    fn blocks(shape: (usize, usize)) -> Array2<f32> {
        Array2::from_shape_fn(shape, |(y, x)| if (y / 5 + x / 3) % 2 == 0 { 0.9 } else { 0.1 })
    }

    #[test]
    fn test_zero_iterations_is_identity() {
        let psf = build_gaussian_psf(7, 1.2).unwrap();
        let estimate = blocks((18, 14));
        let observed = Array2::from_elem((18, 14), 0.5);
        let out = richardson_lucy(&estimate, &observed, &psf, 0).unwrap();
        assert_eq!(out, estimate);
    }

    #[test]
    fn test_consistent_estimate_is_a_fixed_point() {
        let psf = build_gaussian_psf(5, 1.0).unwrap();
        let estimate = blocks((16, 16));
        let observed = FftConvolver::new(&psf, (16, 16))
            .unwrap()
            .convolve(&estimate.mapv(f64::from))
            .unwrap()
            .mapv(|v| v as f32);

        let out = richardson_lucy(&estimate, &observed, &psf, 5).unwrap();
        for (a, b) in out.iter().zip(estimate.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_output_is_clipped_and_non_negative() {
        let psf = build_gaussian_psf(7, 1.5).unwrap();
        let observed = blocks((20, 20));
        let estimate = Array2::from_elem((20, 20), 0.5);
        let out = richardson_lucy(&estimate, &observed, &psf, 12).unwrap();
        assert!(out.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_zero_observation_drives_estimate_to_zero() {
        let psf = build_gaussian_psf(3, 0.8).unwrap();
        let estimate = Array2::from_elem((8, 8), 0.7);
        let observed = Array2::zeros((8, 8));
        let out = richardson_lucy(&estimate, &observed, &psf, 1).unwrap();
        assert!(out.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_iterations_sharpen_towards_observation_model() {
        let psf = build_gaussian_psf(7, 1.5).unwrap();
        let sharp = blocks((24, 24));
        let convolver = FftConvolver::new(&psf, (24, 24)).unwrap();
        let observed = convolver
            .convolve(&sharp.mapv(f64::from))
            .unwrap()
            .mapv(|v| v as f32);

        let residual = |estimate: &Array2<f32>| {
            let reblurred = convolver.convolve(&estimate.mapv(f64::from)).unwrap();
            reblurred
                .iter()
                .zip(observed.iter())
                .map(|(&a, &b)| (a - f64::from(b)).powi(2))
                .sum::<f64>()
        };

        let start = Array2::from_elem((24, 24), 0.5);
        let refined = richardson_lucy(&start, &observed, &psf, 20).unwrap();
        assert!(residual(&refined) < residual(&start));
    }

    #[test]
    fn test_rejects_mismatched_inputs() {
        let psf = build_gaussian_psf(3, 1.0).unwrap();
        let err = richardson_lucy(&Array2::zeros((8, 9)), &Array2::zeros((8, 8)), &psf, 1).unwrap_err();
        assert!(matches!(err, RestoreError::ShapeMismatch { .. }));
    }
}
