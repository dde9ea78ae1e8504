//! Noise synthesis: additive Gaussian and impulse (salt-and-pepper).
//!
//! Both models copy the clean grid and return a corrupted one; the input is
//! never modified. The random generator is always supplied by the caller so
//! runs can be reproduced with a seeded `StdRng`.

use ndarray::{Array2, ArrayView2};
use rand::Rng;
use rand_distr::{Distribution, Normal};

use super::core::ensure_not_empty;
use crate::error::{Error, Result};

// ============================================================================
// Parameters
// ============================================================================

/// Normal distribution added to every pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianNoise {
    mean: f64,
    sigma: f64,
}

impl GaussianNoise {
    pub const DEFAULT_MEAN: f64 = 0.0;
    pub const DEFAULT_SIGMA: f64 = 40.0;

    /// # Errors
    /// `Error::InvalidParameter` if `mean` is not finite or `sigma` is
    /// negative or not finite.
    pub fn new(mean: f64, sigma: f64) -> Result<Self> {
        if !mean.is_finite() {
            return Err(Error::invalid_parameter(
                "gaussian_mean",
                format!("must be finite, got {mean}"),
            ));
        }
        if !sigma.is_finite() || sigma < 0.0 {
            return Err(Error::invalid_parameter(
                "gaussian_sigma",
                format!("must be a finite value >= 0, got {sigma}"),
            ));
        }
        Ok(Self { mean, sigma })
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }
}

impl Default for GaussianNoise {
    fn default() -> Self {
        Self {
            mean: Self::DEFAULT_MEAN,
            sigma: Self::DEFAULT_SIGMA,
        }
    }
}

/// Fractions of pixels forced to white (salt) and black (pepper).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaltPepperNoise {
    salt_probability: f64,
    pepper_probability: f64,
}

impl SaltPepperNoise {
    pub const DEFAULT_PROBABILITY: f64 = 0.02;

    /// # Errors
    /// `Error::InvalidParameter` if either probability lies outside [0, 1].
    pub fn new(salt_probability: f64, pepper_probability: f64) -> Result<Self> {
        check_probability("salt_probability", salt_probability)?;
        check_probability("pepper_probability", pepper_probability)?;
        Ok(Self {
            salt_probability,
            pepper_probability,
        })
    }

    pub fn salt_probability(&self) -> f64 {
        self.salt_probability
    }

    pub fn pepper_probability(&self) -> f64 {
        self.pepper_probability
    }
}

impl Default for SaltPepperNoise {
    fn default() -> Self {
        Self {
            salt_probability: Self::DEFAULT_PROBABILITY,
            pepper_probability: Self::DEFAULT_PROBABILITY,
        }
    }
}

fn check_probability(name: &'static str, p: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&p) {
        return Err(Error::invalid_parameter(
            name,
            format!("must lie in [0, 1], got {p}"),
        ));
    }
    Ok(())
}

// ============================================================================
// Additive Gaussian
// ============================================================================

/// Add Gaussian noise to every pixel.
///
/// Samples are truncated toward zero into `i16`, added in `i16` so no value
/// wraps, then clamped back into 0-255.
///
/// # Errors
/// `Error::InvalidInput` for an empty grid.
pub fn add_gaussian_noise<R: Rng + ?Sized>(
    input: ArrayView2<u8>,
    params: &GaussianNoise,
    rng: &mut R,
) -> Result<Array2<u8>> {
    ensure_not_empty(&input, "gaussian noise")?;
    let normal = Normal::new(params.mean, params.sigma)
        .map_err(|e| Error::invalid_parameter("gaussian_sigma", e.to_string()))?;

    let output = input.mapv(|v| {
        let noise = normal.sample(&mut *rng) as i16;
        (v as i16).saturating_add(noise).clamp(0, 255) as u8
    });
    Ok(output)
}

// ============================================================================
// Salt and Pepper
// ============================================================================

/// Number of coordinates to draw for a given probability.
fn impulse_count(probability: f64, total: usize) -> usize {
    ((probability * total as f64).round() as usize).min(total)
}

/// Force `count` randomly drawn pixels to `value`.
///
/// Rows and columns are drawn independently with replacement, so duplicate
/// coordinates are possible and fewer than `count` distinct pixels may
/// change. A count covering the whole grid sets every pixel.
fn scatter<R: Rng + ?Sized>(output: &mut Array2<u8>, count: usize, value: u8, rng: &mut R) {
    let (height, width) = output.dim();
    if count >= height * width {
        output.fill(value);
        return;
    }
    for _ in 0..count {
        let y = rng.gen_range(0..height);
        let x = rng.gen_range(0..width);
        output[[y, x]] = value;
    }
}

/// Add impulse noise: salt (255) first, then pepper (0).
///
/// Where salt and pepper land on the same pixel the pepper wins.
///
/// # Errors
/// `Error::InvalidInput` for an empty grid.
pub fn add_salt_and_pepper_noise<R: Rng + ?Sized>(
    input: ArrayView2<u8>,
    params: &SaltPepperNoise,
    rng: &mut R,
) -> Result<Array2<u8>> {
    ensure_not_empty(&input, "salt-and-pepper noise")?;
    let total = input.len();
    let mut output = input.to_owned();

    scatter(
        &mut output,
        impulse_count(params.salt_probability, total),
        255,
        rng,
    );
    scatter(
        &mut output,
        impulse_count(params.pepper_probability, total),
        0,
        rng,
    );

    Ok(output)
}
