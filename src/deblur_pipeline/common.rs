//! Common utilities module
//!
//! This module contains shared utilities used across the restoration pipeline.

pub mod error;

pub use error::{RestoreError, Result};
