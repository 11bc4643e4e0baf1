use ndarray::Array2;
use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::deblur_pipeline::common::error::{RestoreError, Result};
use crate::deblur_pipeline::io::types::{Channel, FloatImage};
use crate::deblur_pipeline::psf::embed_psf;
use crate::deblur_pipeline::restore::richardson_lucy::RichardsonLucy;
use crate::deblur_pipeline::restore::wiener::WienerFilter;

/// Wiener pre-restoration followed by Richardson–Lucy refinement, per channel.
///
/// Both stages share one PSF. Filters are prepared once for an image shape and
/// hold no mutable state, so channels can be restored concurrently.
pub struct HybridRestorer {
    shape: (usize, usize),
    wiener: WienerFilter,
    refiner: RichardsonLucy,
    parallel: bool,
}

impl HybridRestorer {
    /// # Errors
    ///
    /// * [`RestoreError::PsfTooLarge`] if `psf` does not fit into `shape`
    /// * [`RestoreError::InvalidParameter`] if `k` is not positive
    pub fn new(psf: &Array2<f64>, shape: (usize, usize), k: f64, iterations: usize) -> Result<Self> {
        let embedded = embed_psf(psf, shape)?;
        Ok(Self {
            shape,
            wiener: WienerFilter::new(&embedded, k)?,
            refiner: RichardsonLucy::new(psf, shape, iterations)?,
            parallel: true,
        })
    }

    /// Restore the three channels on the rayon pool (default) or one after another.
    pub fn parallel(mut self, enable: bool) -> Self {
        self.parallel = enable;
        self
    }

    pub fn restore_channel(&self, blurred: &Channel) -> Result<Channel> {
        let estimate = self.wiener.apply(blurred)?;
        self.refiner.refine(&estimate, blurred)
    }

    #[instrument(skip_all, fields(shape = ?self.shape, parallel = self.parallel))]
    pub fn restore(&self, blurred: &FloatImage) -> Result<FloatImage> {
        if blurred.dimensions() != self.shape {
            return Err(RestoreError::ShapeMismatch {
                expected: self.shape,
                actual: blurred.dimensions(),
            });
        }

        let channels = if self.parallel {
            blurred
                .channels()
                .par_iter()
                .map(|channel| self.restore_channel(channel))
                .collect::<Result<Vec<_>>>()?
        } else {
            blurred
                .channels()
                .iter()
                .map(|channel| self.restore_channel(channel))
                .collect::<Result<Vec<_>>>()?
        };

        debug!(
            "Hybrid restoration done: K={}, iterations={}",
            self.wiener.k(),
            self.refiner.iterations()
        );
        FloatImage::from_channel_vec(channels)
    }
}

/// Restores `blurred` with a fresh [`HybridRestorer`].
pub fn hybrid_wiener_lucy(blurred: &FloatImage, psf: &Array2<f64>, k: f64, iterations: usize) -> Result<FloatImage> {
    HybridRestorer::new(psf, blurred.dimensions(), k, iterations)?.restore(blurred)
}
