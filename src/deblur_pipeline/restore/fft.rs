//! Two-dimensional FFT over `ndarray` buffers.

use std::sync::Arc;

use ndarray::Array2;
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::deblur_pipeline::common::error::{RestoreError, Result};

pub type Spectrum = Array2<Complex<f64>>;

/// Pre-planned row/column transforms for one fixed `(rows, cols)` shape.
///
/// Plans are `Send + Sync`, so a single `Fft2d` can be shared by the
/// per-channel workers.
pub struct Fft2d {
    rows: usize,
    cols: usize,
    row_forward: Arc<dyn Fft<f64>>,
    row_inverse: Arc<dyn Fft<f64>>,
    col_forward: Arc<dyn Fft<f64>>,
    col_inverse: Arc<dyn Fft<f64>>,
}

impl Fft2d {
    pub fn new(shape: (usize, usize)) -> Self {
        let (rows, cols) = shape;
        let mut planner = FftPlanner::new();
        Self {
            rows,
            cols,
            row_forward: planner.plan_fft_forward(cols),
            row_inverse: planner.plan_fft_inverse(cols),
            col_forward: planner.plan_fft_forward(rows),
            col_inverse: planner.plan_fft_inverse(rows),
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn forward(&self, data: &mut Spectrum) -> Result<()> {
        self.check_shape(data.dim())?;
        self.transform(data, &self.row_forward, &self.col_forward);
        Ok(())
    }

    /// Inverse transform, scaled by `1 / (rows * cols)` so that it undoes [`Fft2d::forward`].
    pub fn inverse(&self, data: &mut Spectrum) -> Result<()> {
        self.check_shape(data.dim())?;
        self.transform(data, &self.row_inverse, &self.col_inverse);
        let scale = 1.0 / (self.rows * self.cols) as f64;
        data.mapv_inplace(|v| v * scale);
        Ok(())
    }

    pub fn forward_real(&self, data: &Array2<f64>) -> Result<Spectrum> {
        let mut spectrum = data.mapv(|v| Complex::new(v, 0.0));
        self.forward(&mut spectrum)?;
        Ok(spectrum)
    }

    /// Inverse transform keeping only the real part.
    pub fn inverse_real(&self, mut spectrum: Spectrum) -> Result<Array2<f64>> {
        self.inverse(&mut spectrum)?;
        Ok(spectrum.mapv(|v| v.re))
    }

    fn check_shape(&self, actual: (usize, usize)) -> Result<()> {
        if actual != self.shape() {
            return Err(RestoreError::ShapeMismatch {
                expected: self.shape(),
                actual,
            });
        }
        Ok(())
    }

    fn transform(&self, data: &mut Spectrum, row_plan: &Arc<dyn Fft<f64>>, col_plan: &Arc<dyn Fft<f64>>) {
        let mut line = vec![Complex::new(0.0, 0.0); self.cols];
        for mut row in data.rows_mut() {
            line.iter_mut().zip(row.iter()).for_each(|(dst, src)| *dst = *src);
            row_plan.process(&mut line);
            row.iter_mut().zip(line.iter()).for_each(|(dst, src)| *dst = *src);
        }

        let mut line = vec![Complex::new(0.0, 0.0); self.rows];
        for mut column in data.columns_mut() {
            line.iter_mut().zip(column.iter()).for_each(|(dst, src)| *dst = *src);
            col_plan.process(&mut line);
            column.iter_mut().zip(line.iter()).for_each(|(dst, src)| *dst = *src);
        }
    }
}
