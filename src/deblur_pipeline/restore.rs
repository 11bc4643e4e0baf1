//! Restoration module
//!
//! Frequency-domain Wiener pre-restoration, FFT-backed linear convolution and the
//! Richardson–Lucy refiner, combined by [`HybridRestorer`].

pub mod fft;
pub mod convolve;
pub mod wiener;
pub mod richardson_lucy;
mod hybrid;

pub use convolve::FftConvolver;
pub use fft::Fft2d;
pub use hybrid::{HybridRestorer, hybrid_wiener_lucy};
pub use richardson_lucy::{RichardsonLucy, richardson_lucy};
pub use wiener::{WienerFilter, wiener_filter};
