//! Batch grayscale enhancement, noise and denoising.
//!
//! ```bash
//! # Defaults: read ./images, write ./processed_images
//! denoise-bench
//!
//! # Reproducible run with a 3x3 window and the Gaussian filter added
//! denoise-bench scans out --seed 7 --kernel-size 3 \
//!     --filters arithmetic,geometric,harmonic,gaussian --montage
//! ```
//!
//! Per-file status goes through the logger; set `RUST_LOG=debug` for stage
//! detail.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use denoise_bench::pipeline::config::{DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_DIR};
use denoise_bench::{
    FilterWindow, GaussianNoise, MeanFilter, Pipeline, PipelineConfig, SaltPepperNoise,
};

#[derive(Parser, Debug)]
#[command(
    name = "denoise-bench",
    version,
    about = "Equalize, corrupt and denoise every grayscale image in a directory"
)]
struct Args {
    /// Directory containing input images (png, jpg, jpeg, tif, tiff)
    #[arg(value_name = "INPUT_DIR", default_value = DEFAULT_INPUT_DIR)]
    input_dir: PathBuf,

    /// Directory receiving processed images (created if missing)
    #[arg(value_name = "OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Odd side length of the filter window
    #[arg(short = 'k', long, default_value = "5", value_parser = parse_window)]
    kernel_size: FilterWindow,

    /// Mean of the additive Gaussian noise
    #[arg(long, default_value_t = GaussianNoise::DEFAULT_MEAN, allow_negative_numbers = true)]
    gaussian_mean: f64,

    /// Standard deviation of the additive Gaussian noise
    #[arg(long, default_value_t = GaussianNoise::DEFAULT_SIGMA)]
    gaussian_sigma: f64,

    /// Fraction of pixels set to white
    #[arg(long, default_value_t = SaltPepperNoise::DEFAULT_PROBABILITY)]
    salt: f64,

    /// Fraction of pixels set to black
    #[arg(long, default_value_t = SaltPepperNoise::DEFAULT_PROBABILITY)]
    pepper: f64,

    /// Filters applied to the Gaussian-noisy image
    #[arg(long, value_delimiter = ',', default_value = "arithmetic,geometric,harmonic")]
    filters: Vec<MeanFilter>,

    /// Base random seed for reproducible noise
    #[arg(long)]
    seed: Option<u64>,

    /// Process files concurrently
    #[arg(long)]
    parallel: bool,

    /// Also write a side-by-side montage per image
    #[arg(long)]
    montage: bool,

    /// Also write a per-image histogram CSV
    #[arg(long)]
    histograms: bool,
}

fn parse_window(s: &str) -> std::result::Result<FilterWindow, String> {
    let size: usize = s
        .parse()
        .map_err(|_| format!("`{s}` is not a positive integer"))?;
    FilterWindow::new(size).map_err(|e| e.to_string())
}

impl Args {
    fn into_config(self) -> Result<PipelineConfig> {
        let gaussian = GaussianNoise::new(self.gaussian_mean, self.gaussian_sigma)?;
        let salt_pepper = SaltPepperNoise::new(self.salt, self.pepper)?;

        let mut config = PipelineConfig::new(self.input_dir, self.output_dir)
            .with_window(self.kernel_size)
            .with_filters(self.filters)
            .with_gaussian(gaussian)
            .with_salt_pepper(salt_pepper)
            .with_parallel(self.parallel)
            .with_montage(self.montage)
            .with_histograms(self.histograms);
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Args::parse().into_config()?;
    let input_dir = config.input_dir.clone();
    let pipeline = Pipeline::new(config);

    let report = pipeline
        .run()
        .with_context(|| format!("Failed to process images in {}", input_dir.display()))?;

    log::info!(
        "{} processed, {} skipped, {} failed",
        report.processed(),
        report.skipped(),
        report.failed()
    );
    println!("Processed images saved in {}", report.output_dir.display());
    Ok(())
}
