//! Image restoration pipeline module
//!
//! This module blurs each input with a known Gaussian, restores it with a hybrid
//! Wiener + Richardson–Lucy deconvolution and writes a side-by-side comparison,
//! with separate modules for PSFs, restoration, display and orchestration.

pub mod common;
pub mod config;
pub mod degrade;
pub mod display;
pub mod io;
pub mod orchestration;
pub mod psf;
pub mod restore;

pub use common::{
    RestoreError,
    Result,
};

pub use config::{
    RestorationConfig,
    RestorationConfigBuilder,
};

pub use degrade::gaussian_blur;

pub use display::{
    CanvasMargins,
    ComparisonLayout,
    Compositor,
    TitleRenderer,
    adjust_gamma,
};

pub use io::{
    AtomicPngSink,
    FloatImage,
    ImageCrateSource,
    ImageSink,
    ImageSource,
};

pub use orchestration::{
    BatchItem,
    BatchReport,
    ComparisonPipeline,
    ImageReport,
};

pub use psf::{
    Kernel,
    build_gaussian_psf,
    embed_psf,
    psf_size_for_sigma,
};

pub use restore::{
    HybridRestorer,
    hybrid_wiener_lucy,
    richardson_lucy,
    wiener_filter,
};
