//! Pipeline configuration.

use std::path::PathBuf;

use crate::filters::{FilterWindow, GaussianNoise, MeanFilter, SaltPepperNoise};

pub const DEFAULT_INPUT_DIR: &str = "images";
pub const DEFAULT_OUTPUT_DIR: &str = "processed_images";

/// Everything the orchestrator needs for one batch.
///
/// Parameter types validate on construction, so a built config is always
/// usable as-is.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory scanned for inputs (non-recursive).
    pub input_dir: PathBuf,
    /// Directory receiving artifacts; created if absent.
    pub output_dir: PathBuf,
    pub gaussian: GaussianNoise,
    pub salt_pepper: SaltPepperNoise,
    /// Window shared by every filter in the bank.
    pub window: FilterWindow,
    /// Filters applied to the Gaussian-noisy grid, in output order.
    pub filters: Vec<MeanFilter>,
    /// Base seed; each file derives its own generator from it. `None`
    /// seeds from OS entropy.
    pub seed: Option<u64>,
    /// Process files concurrently.
    pub parallel: bool,
    /// Also write `montage_X.ext`.
    pub write_montage: bool,
    /// Also write `histogram_X.ext.csv`.
    pub write_histograms: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            gaussian: GaussianNoise::default(),
            salt_pepper: SaltPepperNoise::default(),
            window: FilterWindow::default(),
            filters: MeanFilter::DEFAULT_BANK.to_vec(),
            seed: None,
            parallel: false,
            write_montage: false,
            write_histograms: false,
        }
    }
}

impl PipelineConfig {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_window(mut self, window: FilterWindow) -> Self {
        self.window = window;
        self
    }

    /// Replace the filter bank, dropping repeated entries.
    pub fn with_filters(mut self, filters: impl IntoIterator<Item = MeanFilter>) -> Self {
        self.filters.clear();
        for filter in filters {
            if !self.filters.contains(&filter) {
                self.filters.push(filter);
            }
        }
        self
    }

    pub fn with_gaussian(mut self, gaussian: GaussianNoise) -> Self {
        self.gaussian = gaussian;
        self
    }

    pub fn with_salt_pepper(mut self, salt_pepper: SaltPepperNoise) -> Self {
        self.salt_pepper = salt_pepper;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_montage(mut self, enabled: bool) -> Self {
        self.write_montage = enabled;
        self
    }

    pub fn with_histograms(mut self, enabled: bool) -> Self {
        self.write_histograms = enabled;
        self
    }
}
