//! Restoration configuration module
//!
//! Parameters of the restoration pipeline, passed explicitly to the orchestrator.

pub mod types;

pub use types::{RestorationConfig, RestorationConfigBuilder};
