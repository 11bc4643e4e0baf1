use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use hybrid_deblur_rs::deblur_pipeline::{ComparisonPipeline, RestorationConfig};
use hybrid_deblur_rs::logger;

use tracing::info;

#[derive(Parser)]
#[command(name = "hybrid_deblur_rs")]
#[command(version, about = "Gaussian blur, hybrid Wiener + Richardson-Lucy restoration and side-by-side comparison", long_about = None)]
struct Cli {
    /// Input images (PNG, JPEG, BMP, WebP)
    #[arg(value_name = "INPUT", required = true)]
    inputs: Vec<PathBuf>,

    /// Standard deviation of the synthetic blur and of the restoration PSF
    #[arg(long, value_name = "FLOAT", default_value = "7.0")]
    sigma: f32,

    /// Wiener regularization constant
    #[arg(short, long, value_name = "FLOAT", default_value = "0.002")]
    k: f64,

    /// Richardson-Lucy iterations
    #[arg(long, value_name = "N", default_value = "8")]
    iterations: usize,

    /// Display gamma applied before compositing
    #[arg(long, value_name = "FLOAT", default_value = "0.9")]
    gamma: f32,

    /// Output directory
    #[arg(short, long, value_name = "DIR", default_value = "Outputs")]
    output_dir: PathBuf,

    /// TrueType font for panel titles
    #[arg(long, value_name = "FILE")]
    font: Option<PathBuf>,

    /// Restore the color channels one after another
    #[arg(long)]
    sequential: bool,

    /// Process several images at once
    #[arg(long)]
    parallel: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init();

    info!("Starting hybrid_deblur_rs...");

    let config = RestorationConfig::builder()
        .sigma(cli.sigma)
        .wiener_k(cli.k)
        .iterations(cli.iterations)
        .gamma(cli.gamma)
        .output_dir(cli.output_dir)
        .font_path(cli.font)
        .parallel_channels(!cli.sequential)
        .build();

    let pipeline = ComparisonPipeline::new(config).context("Failed to initialize pipeline")?;
    pipeline
        .prepare_output_dir()
        .context("Failed to create output directory")?;

    let config = pipeline.config();
    info!(
        sigma = config.sigma,
        k = config.wiener_k,
        iterations = config.iterations,
        gamma = config.gamma,
        output_dir = %config.output_dir.display(),
        titles = pipeline.has_titles(),
        "Pipeline initialized"
    );

    let report = if cli.parallel {
        pipeline.process_batch_parallel(&cli.inputs)
    } else {
        pipeline.process_batch(&cli.inputs)
    };

    if report.processed() == 0 {
        bail!("No image was processed ({} inputs)", cli.inputs.len());
    }

    Ok(())
}
