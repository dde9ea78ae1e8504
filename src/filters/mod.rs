//! Pixel-level operators on 8-bit grayscale grids.
//!
//! ## Grid Format
//!
//! | Type | Shape | Description |
//! |------|-------|-------------|
//! | `Grid` (`Array2<u8>`) | (H, W) | Single luminance channel, 0-255 |
//! | Working plane (`Array2<f64>`) | (H, W) | Intermediate domain for window means |
//!
//! Color inputs are collapsed to luma once, at decode time (`grayscale`).
//!
//! ## Architecture
//!
//! All operators follow these principles:
//! - **Pure** - Take a view, return a new grid; inputs are never mutated
//! - **Shape preserving** - Output dimensions always equal input dimensions
//! - **Replicate borders** - Windows past the edge reuse the nearest pixel
//! - **Row parallel** - Window passes run through ndarray's rayon integration
//!
//! ## Operator Categories
//!
//! - **Enhancement**: histogram equalization (`equalize`)
//! - **Noise**: additive Gaussian, salt-and-pepper (`noise`)
//! - **Denoising**: arithmetic, geometric, harmonic mean (`mean`), Gaussian blur (`blur`)

pub mod core;
pub mod grayscale;
pub mod equalize;
pub mod noise;
pub mod blur;
pub mod mean;

pub use self::core::{FilterWindow, Grid};
pub use self::equalize::{equalize_histogram, histogram};
pub use self::mean::{arithmetic_mean, geometric_mean, harmonic_mean, MeanFilter};
pub use self::noise::{add_gaussian_noise, add_salt_and_pepper_noise, GaussianNoise, SaltPepperNoise};
