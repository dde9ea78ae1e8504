//! Batch orchestration.
//!
//! Each input file runs through a fixed sequence of stages:
//!
//! ```text
//! Loaded -> Enhanced -> Noised -> Filtered -> Persisted
//!    \
//!     `-> Skipped (decode failure)
//! ```
//!
//! Files never share grids or generators. A failing file is logged and
//! reported; the batch always moves on to the next one. Only preparing the
//! output directory or listing the input directory can fail a whole batch.

pub mod artifacts;
pub mod codec;
pub mod config;
pub mod report;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ndarray::ArrayView2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::filters::{add_gaussian_noise, add_salt_and_pepper_noise, equalize_histogram, Grid};

pub use self::artifacts::{Artifact, ArtifactKind, ArtifactSet, NoiseModel};
pub use self::codec::{is_supported, FileCodec, ImageCodec, SUPPORTED_EXTENSIONS};
pub use self::config::PipelineConfig;

/// Shared flag checked before each file starts.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Terminal state of one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Every artifact was written.
    Processed {
        name: String,
        width: usize,
        height: usize,
        written: Vec<PathBuf>,
    },
    /// Decoding failed; nothing was written.
    Skipped { name: String, reason: String },
    /// Decoded, but a later stage or a write failed.
    Failed { name: String, reason: String },
    /// Cancellation was requested before the file started.
    Cancelled { name: String },
}

impl FileOutcome {
    pub fn name(&self) -> &str {
        match self {
            FileOutcome::Processed { name, .. }
            | FileOutcome::Skipped { name, .. }
            | FileOutcome::Failed { name, .. }
            | FileOutcome::Cancelled { name } => name,
        }
    }
}

/// Outcomes of a batch, in input order.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub output_dir: PathBuf,
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    fn count(&self, pred: impl Fn(&FileOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|&o| pred(o)).count()
    }

    pub fn processed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Processed { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Failed { .. }))
    }

    pub fn cancelled(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Cancelled { .. }))
    }
}

/// List supported image files directly inside `dir`, sorted by name.
pub fn discover_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| Error::io(dir, e))?.path();
        if path.is_file() && is_supported(&path) {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}

/// Generator for the file at `index`; a fixed base seed gives each file a
/// fixed, distinct stream regardless of scheduling.
fn file_rng(seed: Option<u64>, index: usize) -> StdRng {
    match seed {
        Some(seed) => {
            StdRng::seed_from_u64(seed ^ (index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
        }
        None => StdRng::from_entropy(),
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub struct Pipeline<C: ImageCodec = FileCodec> {
    config: PipelineConfig,
    codec: C,
    cancel: CancelToken,
}

impl Pipeline<FileCodec> {
    pub fn new(config: PipelineConfig) -> Self {
        Self::with_codec(config, FileCodec)
    }
}

impl<C: ImageCodec> Pipeline<C> {
    pub fn with_codec(config: PipelineConfig, codec: C) -> Self {
        Self {
            config,
            codec,
            cancel: CancelToken::new(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Handle that stops the batch before the next file starts.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Discover inputs in the configured directory and process them.
    pub fn run(&self) -> Result<BatchReport> {
        let paths = discover_images(&self.config.input_dir)?;
        log::debug!(
            "found {} image(s) in {}",
            paths.len(),
            self.config.input_dir.display()
        );
        self.run_batch(&paths)
    }

    /// Process an explicit list of files in order.
    pub fn run_batch(&self, paths: &[PathBuf]) -> Result<BatchReport> {
        let output_dir = &self.config.output_dir;
        fs::create_dir_all(output_dir).map_err(|e| Error::io(output_dir, e))?;

        let outcomes: Vec<FileOutcome> = if self.config.parallel {
            paths
                .par_iter()
                .enumerate()
                .map(|(index, path)| self.process_file(index, path))
                .collect()
        } else {
            paths
                .iter()
                .enumerate()
                .map(|(index, path)| self.process_file(index, path))
                .collect()
        };

        Ok(BatchReport {
            output_dir: output_dir.clone(),
            outcomes,
        })
    }

    /// Run one file to a terminal state. Never returns an error.
    pub fn process_file(&self, index: usize, path: &Path) -> FileOutcome {
        let name = display_name(path);
        if self.cancel.is_cancelled() {
            log::debug!("cancelled before {name}");
            return FileOutcome::Cancelled { name };
        }

        // Loaded
        let grid = match self.codec.read(path) {
            Ok(grid) => grid,
            Err(e) => {
                log::warn!("Could not read {name}, skipping... ({e})");
                return FileOutcome::Skipped {
                    name,
                    reason: e.to_string(),
                };
            }
        };
        let (height, width) = grid.dim();
        log::info!("Processing {name} - Original Resolution: {width}x{height} pixels");

        let mut rng = file_rng(self.config.seed, index);
        let result = self
            .compute(&name, grid, &mut rng)
            .and_then(|set| self.persist(&set));

        match result {
            Ok(written) => FileOutcome::Processed {
                name,
                width,
                height,
                written,
            },
            Err(e) => {
                log::warn!("Failed to process {name}: {e}");
                FileOutcome::Failed {
                    name,
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Enhanced -> Noised -> Filtered, without touching the filesystem.
    pub fn compute(&self, name: &str, grid: Grid, rng: &mut StdRng) -> Result<ArtifactSet> {
        let config = &self.config;
        let mut set = ArtifactSet::new(name, grid);

        let enhanced = equalize_histogram(set.original())?;
        set.push(ArtifactKind::Enhanced, enhanced);
        log::debug!("{name}: enhanced");

        let gaussian_noisy = add_gaussian_noise(set.original(), &config.gaussian, rng)?;
        let salt_pepper_noisy = add_salt_and_pepper_noise(set.original(), &config.salt_pepper, rng)?;
        set.push(ArtifactKind::Noisy(NoiseModel::Gaussian), gaussian_noisy);
        set.push(ArtifactKind::Noisy(NoiseModel::SaltPepper), salt_pepper_noisy);
        log::debug!(
            "{name}: noised (sigma={}, salt={}, pepper={})",
            config.gaussian.sigma(),
            config.salt_pepper.salt_probability(),
            config.salt_pepper.pepper_probability()
        );

        let filter_input = set
            .get(ArtifactKind::Noisy(NoiseModel::Gaussian))
            .ok_or_else(|| Error::InvalidInput(format!("{name}: no gaussian-noisy grid")))?;
        let filtered = config
            .filters
            .iter()
            .map(|&filter| {
                filter
                    .apply(filter_input, config.window)
                    .map(|grid| (filter, grid))
            })
            .collect::<Result<Vec<_>>>()?;
        log::debug!(
            "{name}: filtered with {} filter(s), k={}",
            filtered.len(),
            config.window.size()
        );

        for (filter, grid) in filtered {
            set.push(ArtifactKind::Filtered(filter), grid);
        }
        Ok(set)
    }

    /// Write every artifact (and optional reports); returns written paths.
    pub fn persist(&self, set: &ArtifactSet) -> Result<Vec<PathBuf>> {
        let output_dir = &self.config.output_dir;
        let source = set.source_name();
        let mut written = Vec::new();

        for artifact in set.iter() {
            let path = output_dir.join(artifact.kind.file_name(source));
            self.write_grid(&path, artifact.grid.view())?;
            written.push(path);
        }

        if self.config.write_montage {
            let path = output_dir.join(format!("montage_{source}"));
            self.write_grid(&path, report::montage(set).view())?;
            written.push(path);
        }

        if self.config.write_histograms {
            let path = output_dir.join(format!("histogram_{source}.csv"));
            let csv_err = |e: csv::Error| Error::io(&path, e.into());
            let mut wtr = csv::Writer::from_path(&path).map_err(csv_err)?;
            report::write_histogram_csv(set, &mut wtr).map_err(csv_err)?;
            written.push(path);
        }

        Ok(written)
    }

    fn write_grid(&self, path: &Path, grid: ArrayView2<u8>) -> Result<()> {
        self.codec.write(path, grid)?;
        log::debug!("wrote {}", path.display());
        Ok(())
    }
}
