//! Restoration configuration types

use std::path::PathBuf;

use crate::deblur_pipeline::common::error::{RestoreError, Result};
use crate::deblur_pipeline::display::gamma::DEFAULT_GAMMA;
use crate::deblur_pipeline::psf::MAX_SIGMA;

/// Configuration for one restoration run
#[derive(Debug, Clone, PartialEq)]
pub struct RestorationConfig {
    /// Spread of both the synthetic blur and the restoration PSF
    pub sigma: f32,
    /// Wiener regularization (approximate noise-to-signal ratio)
    pub wiener_k: f64,
    /// Richardson–Lucy steps
    pub iterations: usize,
    /// Display exponent applied to all three images before compositing
    pub gamma: f32,
    /// Directory receiving `<stem>_comparison.png`
    pub output_dir: PathBuf,
    /// Title font; `None` searches the usual system font directories
    pub font_path: Option<PathBuf>,
    /// Restore the three color channels concurrently
    pub parallel_channels: bool,
}

impl Default for RestorationConfig {
    fn default() -> Self {
        Self {
            sigma: 7.0,
            wiener_k: 0.002,
            iterations: 8,
            gamma: DEFAULT_GAMMA,
            output_dir: PathBuf::from("Outputs"),
            font_path: None,
            parallel_channels: true,
        }
    }
}

impl RestorationConfig {
    pub fn builder() -> RestorationConfigBuilder {
        RestorationConfigBuilder::default()
    }

    /// Rejects parameters that would make the numerical stages meaningless.
    pub fn validate(&self) -> Result<()> {
        if !self.sigma.is_finite() || self.sigma <= 0.0 || self.sigma > MAX_SIGMA {
            return Err(RestoreError::invalid_parameter(
                "sigma",
                format!("must be in (0, {}], got {}", MAX_SIGMA, self.sigma),
            ));
        }
        if !self.wiener_k.is_finite() || self.wiener_k <= 0.0 {
            return Err(RestoreError::invalid_parameter(
                "wiener_k",
                format!("must be > 0, got {}", self.wiener_k),
            ));
        }
        if !self.gamma.is_finite() || self.gamma <= 0.0 {
            return Err(RestoreError::invalid_parameter(
                "gamma",
                format!("must be > 0, got {}", self.gamma),
            ));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(RestoreError::invalid_parameter("output_dir", "must not be empty"));
        }
        Ok(())
    }
}

/// Builder for RestorationConfig
#[derive(Default)]
pub struct RestorationConfigBuilder {
    sigma: Option<f32>,
    wiener_k: Option<f64>,
    iterations: Option<usize>,
    gamma: Option<f32>,
    output_dir: Option<PathBuf>,
    font_path: Option<Option<PathBuf>>,
    parallel_channels: Option<bool>,
}

impl RestorationConfigBuilder {
    pub fn sigma(mut self, sigma: f32) -> Self {
        self.sigma = Some(sigma);
        self
    }

    pub fn wiener_k(mut self, k: f64) -> Self {
        self.wiener_k = Some(k);
        self
    }

    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = Some(iterations);
        self
    }

    pub fn gamma(mut self, gamma: f32) -> Self {
        self.gamma = Some(gamma);
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn font_path(mut self, path: Option<PathBuf>) -> Self {
        self.font_path = Some(path);
        self
    }

    pub fn parallel_channels(mut self, enable: bool) -> Self {
        self.parallel_channels = Some(enable);
        self
    }

    pub fn build(self) -> RestorationConfig {
        let default = RestorationConfig::default();
        RestorationConfig {
            sigma: self.sigma.unwrap_or(default.sigma),
            wiener_k: self.wiener_k.unwrap_or(default.wiener_k),
            iterations: self.iterations.unwrap_or(default.iterations),
            gamma: self.gamma.unwrap_or(default.gamma),
            output_dir: self.output_dir.unwrap_or(default.output_dir),
            font_path: self.font_path.unwrap_or(default.font_path),
            parallel_channels: self.parallel_channels.unwrap_or(default.parallel_channels),
        }
    }
}
