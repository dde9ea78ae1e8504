//! Local-mean denoising filters: arithmetic, geometric, harmonic.
//!
//! Every filter reduces to the same replicate-border box mean, applied in a
//! different domain:
//!
//! | Filter | Forward | Inverse | Output |
//! |--------|---------|---------|--------|
//! | Arithmetic | `v` | `m` | round |
//! | Geometric | `ln(v + 1)` | `exp(m) - 1` | truncate |
//! | Harmonic | `1 / (v + 1e-9)` | `1 / m - 1e-9` | clamp, truncate |
//!
//! The shifts keep `ln` and the reciprocal finite on black pixels. Near-black
//! regions still amplify rounding in the harmonic filter.

use std::fmt;
use std::str::FromStr;

use ndarray::{Array2, ArrayView2};

use super::blur::gaussian_blur;
use super::core::{box_mean, ensure_not_empty, round_to_u8, to_plane, truncate_to_u8, FilterWindow};
use crate::error::{Error, Result};

/// Shift applied before the logarithm.
pub const GEOMETRIC_EPSILON: f64 = 1.0;
/// Shift applied before the reciprocal.
pub const HARMONIC_EPSILON: f64 = 1e-9;

/// Arithmetic mean over the window, rounded to nearest.
pub fn arithmetic_mean(input: ArrayView2<u8>, window: FilterWindow) -> Result<Array2<u8>> {
    ensure_not_empty(&input, "arithmetic mean")?;
    let mean = box_mean(&to_plane(&input).view(), window.size());
    Ok(mean.mapv(round_to_u8))
}

/// Geometric mean over the window.
///
/// Edges survive better than with the arithmetic mean, but outliers are
/// still mixed into their neighborhood.
pub fn geometric_mean(input: ArrayView2<u8>, window: FilterWindow) -> Result<Array2<u8>> {
    ensure_not_empty(&input, "geometric mean")?;
    let log_plane = input.mapv(|v| (f64::from(v) + GEOMETRIC_EPSILON).ln());
    let mean_log = box_mean(&log_plane.view(), window.size());
    Ok(mean_log.mapv(|m| truncate_to_u8(m.exp() - GEOMETRIC_EPSILON)))
}

/// Harmonic mean over the window.
///
/// Strongly pulled toward the darkest samples in each neighborhood.
pub fn harmonic_mean(input: ArrayView2<u8>, window: FilterWindow) -> Result<Array2<u8>> {
    ensure_not_empty(&input, "harmonic mean")?;
    let inv_plane = input.mapv(|v| 1.0 / (f64::from(v) + HARMONIC_EPSILON));
    let mean_inv = box_mean(&inv_plane.view(), window.size());
    Ok(mean_inv.mapv(|m| truncate_to_u8(1.0 / m - HARMONIC_EPSILON)))
}

// ============================================================================
// Filter bank
// ============================================================================

/// Denoising filters selectable in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeanFilter {
    Arithmetic,
    Geometric,
    Harmonic,
    /// Gaussian-weighted mean, kept for comparison with the box means.
    Gaussian,
}

impl MeanFilter {
    pub const ALL: [MeanFilter; 4] = [
        MeanFilter::Arithmetic,
        MeanFilter::Geometric,
        MeanFilter::Harmonic,
        MeanFilter::Gaussian,
    ];

    /// Bank used when nothing else is configured.
    pub const DEFAULT_BANK: [MeanFilter; 3] = [
        MeanFilter::Arithmetic,
        MeanFilter::Geometric,
        MeanFilter::Harmonic,
    ];

    /// Stable lowercase name, used in artifact file names.
    pub fn name(self) -> &'static str {
        match self {
            MeanFilter::Arithmetic => "arithmetic",
            MeanFilter::Geometric => "geometric",
            MeanFilter::Harmonic => "harmonic",
            MeanFilter::Gaussian => "gaussian",
        }
    }

    pub fn apply(self, input: ArrayView2<u8>, window: FilterWindow) -> Result<Array2<u8>> {
        match self {
            MeanFilter::Arithmetic => arithmetic_mean(input, window),
            MeanFilter::Geometric => geometric_mean(input, window),
            MeanFilter::Harmonic => harmonic_mean(input, window),
            MeanFilter::Gaussian => gaussian_blur(input, window),
        }
    }
}

impl fmt::Display for MeanFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MeanFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        MeanFilter::ALL
            .into_iter()
            .find(|filter| filter.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::invalid_parameter("filters", format!("unknown filter `{s}`")))
    }
}
