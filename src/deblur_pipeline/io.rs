//! Image I/O module
//!
//! Decoding of input files into floating-point RGB images and atomic PNG output.

mod source;
mod image_crate_source;
mod sink;
mod atomic_png_sink;
pub mod types;

pub use source::ImageSource;
pub use image_crate_source::ImageCrateSource;
pub use sink::ImageSink;
pub use atomic_png_sink::AtomicPngSink;
pub use types::{Channel, FloatImage};
