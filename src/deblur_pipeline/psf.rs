//! Point-spread-function module
//!
//! Construction of normalized Gaussian kernels and their embedding into
//! image-sized buffers for FFT-based circular convolution.

mod builder;
mod embed;

pub use builder::{MAX_SIGMA, build_gaussian_psf, psf_size_for_sigma};
pub use embed::embed_psf;

/// Square, odd-sized, non-negative kernel summing to one.
pub type Kernel = ndarray::Array2<f64>;
