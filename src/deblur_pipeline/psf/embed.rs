use ndarray::Array2;

use crate::deblur_pipeline::common::error::{RestoreError, Result};

/// Places `kernel` into a zero `shape` buffer and rolls it so the kernel center sits at `(0, 0)`.
///
/// Frequency-domain multiplication is a circular convolution; rolling the
/// kernel by `(-h/2, -w/2)` keeps the filtered image from drifting.
pub fn embed_psf(kernel: &Array2<f64>, shape: (usize, usize)) -> Result<Array2<f64>> {
    let (kh, kw) = kernel.dim();
    let (rows, cols) = shape;
    if kh > rows || kw > cols {
        return Err(RestoreError::PsfTooLarge {
            psf: (kh, kw),
            target: shape,
        });
    }

    let (shift_y, shift_x) = (kh / 2, kw / 2);
    let mut embedded = Array2::zeros(shape);
    for ((y, x), &value) in kernel.indexed_iter() {
        let ty = (y + rows - shift_y) % rows;
        let tx = (x + cols - shift_x) % cols;
        embedded[[ty, tx]] = value;
    }
    Ok(embedded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deblur_pipeline::psf::build_gaussian_psf;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_embedding_preserves_energy() {
        let psf = build_gaussian_psf(9, 2.0).unwrap();
        let embedded = embed_psf(&psf, (32, 20)).unwrap();
        assert_eq!(embedded.dim(), (32, 20));
        assert_abs_diff_eq!(embedded.sum(), psf.sum(), epsilon = 1e-12);
    }

    #[test]
    fn test_peak_lands_at_origin() {
        let psf = build_gaussian_psf(43, 7.0).unwrap();
        let embedded = embed_psf(&psf, (64, 50)).unwrap();
        let peak = embedded.iter().cloned().fold(f64::MIN, f64::max);
        assert_eq!(embedded[[0, 0]], peak);
        assert_eq!(embedded[[0, 0]], psf[[21, 21]]);
    }

    #[test]
    fn test_wraps_kernel_around_edges() {
        let mut kernel = Array2::zeros((3, 3));
        kernel[[0, 0]] = 1.0;
        kernel[[1, 1]] = 2.0;
        kernel[[2, 2]] = 3.0;
        kernel[[0, 2]] = 4.0;

        let embedded = embed_psf(&kernel, (5, 6)).unwrap();
        assert_eq!(embedded[[0, 0]], 2.0);
        assert_eq!(embedded[[4, 5]], 1.0);
        assert_eq!(embedded[[1, 1]], 3.0);
        assert_eq!(embedded[[4, 1]], 4.0);
        assert_eq!(embedded.iter().filter(|&&v| v != 0.0).count(), 4);
    }

    #[test]
    fn test_exact_fit_is_allowed() {
        let psf = build_gaussian_psf(5, 1.0).unwrap();
        let embedded = embed_psf(&psf, (5, 5)).unwrap();
        assert_abs_diff_eq!(embedded.sum(), 1.0, epsilon = 1e-12);
        assert_eq!(embedded[[0, 0]], psf[[2, 2]]);
    }

    #[test]
    fn test_rejects_kernel_larger_than_target() {
        let psf = build_gaussian_psf(7, 1.0).unwrap();
        let err = embed_psf(&psf, (6, 40)).unwrap_err();
        assert!(matches!(
            err,
            RestoreError::PsfTooLarge {
                psf: (7, 7),
                target: (6, 40)
            }
        ));
    }
}
