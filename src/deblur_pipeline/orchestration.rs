//! Pipeline orchestration module
//!
//! Sequences decode, synthetic blur, PSF construction, hybrid restoration,
//! gamma adjustment, compositing and output for each input image.

mod comparison_pipeline;
mod batch;
pub mod timing;

pub use batch::{BatchItem, BatchReport};
pub use comparison_pipeline::{ComparisonPipeline, ImageReport};
pub use timing::{PipelineTimings, StepTiming, Timer};
