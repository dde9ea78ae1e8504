//! Core utilities shared by the grid operators.
//!
//! This module provides:
//! - The `Grid` alias and input validation
//! - `FilterWindow`, the validated odd kernel size
//! - Replicate-border window math (`box_mean`, `separable_convolve`)
//! - Gaussian kernel generation
//! - Conversions between `f64` working planes and 8-bit grids

use ndarray::{Array2, ArrayView2, Zip};

use crate::error::{Error, Result};

/// Single-channel 8-bit grid, shape `(height, width)`.
pub type Grid = Array2<u8>;

/// Added before truncating so exact means survive floating-point round-off.
const TRUNCATION_GUARD: f64 = 1e-6;

/// Odd, positive side length of the square neighborhood a filter averages over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilterWindow(usize);

impl FilterWindow {
    pub const DEFAULT_SIZE: usize = 5;

    /// Validate a kernel size.
    ///
    /// # Errors
    /// `Error::InvalidParameter` when `size` is zero or even.
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::invalid_parameter(
                "kernel_size",
                "window size must be positive",
            ));
        }
        if size % 2 == 0 {
            return Err(Error::invalid_parameter(
                "kernel_size",
                format!("window size must be odd, got {size}"),
            ));
        }
        Ok(Self(size))
    }

    pub fn size(self) -> usize {
        self.0
    }

    pub fn radius(self) -> usize {
        self.0 / 2
    }
}

impl Default for FilterWindow {
    fn default() -> Self {
        Self(Self::DEFAULT_SIZE)
    }
}

/// Reject grids with a zero dimension.
pub fn ensure_not_empty(grid: &ArrayView2<u8>, operation: &str) -> Result<()> {
    let (height, width) = grid.dim();
    if height == 0 || width == 0 {
        return Err(Error::InvalidInput(format!(
            "{operation} requires a non-empty grid, got {width}x{height}"
        )));
    }
    Ok(())
}

#[inline]
fn clamp_index(i: isize, len: usize) -> usize {
    i.clamp(0, len as isize - 1) as usize
}

/// Unweighted mean over a `size x size` window with replicate borders.
///
/// Computed as two separable passes (horizontal, then vertical), each summing
/// `size` samples before dividing so that uniform neighborhoods stay exact.
pub fn box_mean(plane: &ArrayView2<f64>, size: usize) -> Array2<f64> {
    let (height, width) = plane.dim();
    if size <= 1 || height == 0 || width == 0 {
        return plane.to_owned();
    }
    let half = (size / 2) as isize;
    let norm = size as f64;

    // Horizontal pass
    let mut temp = Array2::<f64>::zeros((height, width));
    Zip::indexed(&mut temp).par_for_each(|(y, x), out| {
        let mut sum = 0.0f64;
        for d in -half..=half {
            sum += plane[[y, clamp_index(x as isize + d, width)]];
        }
        *out = sum / norm;
    });

    // Vertical pass
    let mut result = Array2::<f64>::zeros((height, width));
    Zip::indexed(&mut result).par_for_each(|(y, x), out| {
        let mut sum = 0.0f64;
        for d in -half..=half {
            sum += temp[[clamp_index(y as isize + d, height), x]];
        }
        *out = sum / norm;
    });

    result
}

/// Convolve with a symmetric 1D kernel along both axes, replicate borders.
///
/// `kernel` must have odd length and is expected to be normalized.
pub fn separable_convolve(plane: &ArrayView2<f64>, kernel: &[f64]) -> Array2<f64> {
    let (height, width) = plane.dim();
    if kernel.len() <= 1 || height == 0 || width == 0 {
        return plane.to_owned();
    }
    let half = (kernel.len() / 2) as isize;

    let mut temp = Array2::<f64>::zeros((height, width));
    Zip::indexed(&mut temp).par_for_each(|(y, x), out| {
        let mut sum = 0.0f64;
        for (ki, &kv) in kernel.iter().enumerate() {
            sum += plane[[y, clamp_index(x as isize + ki as isize - half, width)]] * kv;
        }
        *out = sum;
    });

    let mut result = Array2::<f64>::zeros((height, width));
    Zip::indexed(&mut result).par_for_each(|(y, x), out| {
        let mut sum = 0.0f64;
        for (ki, &kv) in kernel.iter().enumerate() {
            sum += temp[[clamp_index(y as isize + ki as isize - half, height), x]] * kv;
        }
        *out = sum;
    });

    result
}

/// Generate a normalized 1D Gaussian kernel with `size` taps.
///
/// A non-positive `sigma` is derived from the size the same way common
/// imaging libraries do: `0.3 * ((size - 1) * 0.5 - 1) + 0.8`.
pub fn gaussian_kernel_1d(size: usize, sigma: f64) -> Vec<f64> {
    if size <= 1 {
        return vec![1.0];
    }
    let sigma = if sigma > 0.0 {
        sigma
    } else {
        0.3 * ((size as f64 - 1.0) * 0.5 - 1.0) + 0.8
    };
    let half = (size / 2) as f64;

    let mut kernel: Vec<f64> = (0..size)
        .map(|i| {
            let x = i as f64 - half;
            (-x * x / (2.0 * sigma * sigma)).exp()
        })
        .collect();

    // Normalize
    let sum: f64 = kernel.iter().sum();
    for v in kernel.iter_mut() {
        *v /= sum;
    }

    kernel
}

/// Widen a grid into an `f64` working plane.
pub fn to_plane(grid: &ArrayView2<u8>) -> Array2<f64> {
    grid.mapv(f64::from)
}

/// Round to nearest and saturate into 8 bits.
#[inline]
pub fn round_to_u8(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Truncate toward zero and saturate into 8 bits.
#[inline]
pub fn truncate_to_u8(v: f64) -> u8 {
    (v + TRUNCATION_GUARD).clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_filter_window_rejects_even_and_zero() {
        assert!(matches!(
            FilterWindow::new(0),
            Err(Error::InvalidParameter { .. })
        ));
        assert!(matches!(
            FilterWindow::new(4),
            Err(Error::InvalidParameter { .. })
        ));
        assert_eq!(FilterWindow::new(3).unwrap().radius(), 1);
        assert_eq!(FilterWindow::default().size(), 5);
    }

    #[test]
    fn test_box_mean_replicates_border() {
        let plane = array![[0.0, 3.0], [6.0, 9.0]];
        let result = box_mean(&plane.view(), 3);

        // Corner (0,0) sees rows {0,0,1} x cols {0,0,1}:
        // (0+0+3 + 0+0+3 + 6+6+9) / 9 = 3.0
        assert!((result[[0, 0]] - 3.0).abs() < 1e-12);
        assert!((result[[1, 1]] - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_box_mean_size_one_is_identity() {
        let plane = array![[1.5, 2.5], [3.5, 4.5]];
        assert_eq!(box_mean(&plane.view(), 1), plane);
    }

    #[test]
    fn test_gaussian_kernel_normalized_and_symmetric() {
        let kernel = gaussian_kernel_1d(5, 0.0);
        assert_eq!(kernel.len(), 5);
        let sum: f64 = kernel.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        assert!((kernel[0] - kernel[4]).abs() < 1e-12);
        assert!(kernel[2] > kernel[1]);
    }

    #[test]
    fn test_truncate_guard_keeps_exact_values() {
        assert_eq!(truncate_to_u8(9.999_999_999_999_998), 10);
        assert_eq!(truncate_to_u8(10.7), 10);
        assert_eq!(truncate_to_u8(-3.0), 0);
        assert_eq!(truncate_to_u8(400.0), 255);
    }

    #[test]
    fn test_ensure_not_empty() {
        let empty = Grid::zeros((0, 4));
        assert!(matches!(
            ensure_not_empty(&empty.view(), "test"),
            Err(Error::InvalidInput(_))
        ));
        let grid = Grid::zeros((1, 1));
        assert!(ensure_not_empty(&grid.view(), "test").is_ok());
    }
}
