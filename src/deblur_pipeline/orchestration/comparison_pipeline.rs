use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::deblur_pipeline::{
    common::error::{RestoreError, Result},
    config::RestorationConfig,
    degrade::gaussian_blur,
    display::{CanvasMargins, ComparisonImages, Compositor, TitleRenderer, adjust_gamma},
    io::{AtomicPngSink, ImageCrateSource, ImageSink, ImageSource},
    orchestration::timing::{PipelineTimings, Timer},
    psf::{build_gaussian_psf, psf_size_for_sigma},
    restore::HybridRestorer,
};

/// What happened to one successfully processed image.
#[derive(Debug, Clone)]
pub struct ImageReport {
    pub input: PathBuf,
    pub output: PathBuf,
    /// `(height, width)` of the source image
    pub dimensions: (usize, usize),
    pub blurred_mse: f64,
    pub restored_mse: f64,
    pub timings: PipelineTimings,
}

pub struct ComparisonPipeline<S: ImageSource, W: ImageSink> {
    source: S,
    sink: W,
    config: RestorationConfig,
    compositor: Compositor,
}

impl ComparisonPipeline<ImageCrateSource, AtomicPngSink> {
    /// File-backed pipeline. Titles use `config.font_path` when set, otherwise
    /// the first system font found; with neither, panels are left unlabeled.
    ///
    /// # Errors
    ///
    /// * [`RestoreError::InvalidParameter`] if the config does not validate
    /// * [`RestoreError::FontError`] if an explicit font cannot be loaded
    pub fn new(config: RestorationConfig) -> Result<Self> {
        config.validate()?;

        let titles = match &config.font_path {
            Some(path) => Some(TitleRenderer::from_file(path)?),
            None => {
                let found = TitleRenderer::discover();
                if found.is_none() {
                    warn!("No title font available, comparison panels will be unlabeled");
                }
                found
            }
        };

        Ok(Self {
            source: ImageCrateSource,
            sink: AtomicPngSink,
            compositor: Compositor::new(CanvasMargins::default(), titles),
            config,
        })
    }
}

impl<S: ImageSource, W: ImageSink> ComparisonPipeline<S, W> {
    /// Pipeline over caller-provided I/O, rendering without titles.
    pub fn with_custom(source: S, sink: W, config: RestorationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            source,
            sink,
            compositor: Compositor::new(CanvasMargins::default(), None),
            config,
        })
    }

    pub fn with_titles(mut self, titles: TitleRenderer) -> Self {
        self.compositor = Compositor::new(self.compositor.margins(), Some(titles));
        self
    }

    pub fn config(&self) -> &RestorationConfig {
        &self.config
    }

    /// Replaces the numerical parameters. The title font chosen at
    /// construction is kept.
    pub fn set_config(&mut self, config: RestorationConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn has_titles(&self) -> bool {
        self.compositor.has_titles()
    }

    /// `<output_dir>/<input stem>_comparison.png`
    pub fn output_path_for(&self, input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        self.config.output_dir.join(format!("{stem}_comparison.png"))
    }

    pub fn prepare_output_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config.output_dir).map_err(|e| {
            RestoreError::OutputWriteError(format!("{}: {}", self.config.output_dir.display(), e))
        })
    }

    /// Blurs, restores and composites one image, then writes the comparison.
    ///
    /// Nothing is written unless every earlier stage succeeded.
    #[instrument(skip(self, input), fields(input = %input.as_ref().display()))]
    pub fn process_image<P: AsRef<Path>>(&self, input: P) -> Result<ImageReport> {
        let input = input.as_ref();
        let config = &self.config;
        let mut timings = PipelineTimings::new();

        let original = stage(&mut timings, "decode_input", || self.source.read_image(input))?;
        let dimensions = original.dimensions();
        info!(height = dimensions.0, width = dimensions.1, "Decoded input");

        let psf_size = psf_size_for_sigma(config.sigma);
        if psf_size > dimensions.0 || psf_size > dimensions.1 {
            return Err(RestoreError::PsfTooLarge {
                psf: (psf_size, psf_size),
                target: dimensions,
            });
        }

        let blurred = stage(&mut timings, "synthetic_blur", || gaussian_blur(&original, config.sigma))?;

        let psf = stage(&mut timings, "build_psf", || build_gaussian_psf(psf_size, config.sigma))?;

        let recovered = stage(&mut timings, "hybrid_restore", || {
            HybridRestorer::new(&psf, dimensions, config.wiener_k, config.iterations)?
                .parallel(config.parallel_channels)
                .restore(&blurred)
        })?;

        let blurred_mse = blurred.mse(&original)?;
        let restored_mse = recovered.mse(&original)?;

        let (original, blurred, recovered) = stage(&mut timings, "gamma_adjust", || {
            Ok((
                adjust_gamma(&original, config.gamma),
                adjust_gamma(&blurred, config.gamma),
                adjust_gamma(&recovered, config.gamma),
            ))
        })?;

        let canvas = stage(&mut timings, "composite", || {
            self.compositor.render(&ComparisonImages {
                original: &original,
                blurred: &blurred,
                recovered: &recovered,
            })
        })?;

        let output = self.output_path_for(input);
        stage(&mut timings, "encode_output", || {
            self.prepare_output_dir()?;
            self.sink.write_png(&canvas, &output)
        })?;

        timings.log_summary();
        info!(
            output = %output.display(),
            blurred_mse,
            restored_mse,
            "Processed and saved"
        );

        Ok(ImageReport {
            input: input.to_path_buf(),
            output,
            dimensions,
            blurred_mse,
            restored_mse,
            timings,
        })
    }
}

fn stage<T>(timings: &mut PipelineTimings, name: &'static str, run: impl FnOnce() -> Result<T>) -> Result<T> {
    let _span = tracing::info_span!("stage", name).entered();
    let timer = Timer::start(name);
    let result = run();
    let (name, duration) = timer.stop();
    timings.add_step(name, duration);
    result
}
