//! Histogram equalization (global contrast enhancement).
//!
//! Intensities are remapped through the cumulative distribution of the grid
//! so the output histogram spreads toward uniform coverage of 0-255:
//!
//! ```text
//! v' = round((cdf(v) - cdf_min) / (N - cdf_min) * 255)
//! ```
//!
//! where `cdf_min` is the count of the lowest occupied bin and `N` the
//! number of pixels. A constant grid has nothing to redistribute and maps
//! to itself.

use ndarray::{Array2, ArrayView2};

use super::core::ensure_not_empty;
use crate::error::Result;

const BINS: usize = 256;

/// Count pixels per intensity.
pub fn histogram(input: &ArrayView2<u8>) -> [u64; BINS] {
    let mut hist = [0u64; BINS];
    for &v in input.iter() {
        hist[v as usize] += 1;
    }
    hist
}

/// Build the 256-entry equalization lookup table for a histogram.
fn equalization_lut(hist: &[u64; BINS], total: u64) -> [u8; BINS] {
    let mut lut = [0u8; BINS];

    let first = match hist.iter().position(|&count| count > 0) {
        Some(i) => i,
        None => return lut,
    };

    let cdf_min = hist[first];
    if cdf_min == total {
        // Single occupied bin: identity on that value
        lut[first] = first as u8;
        return lut;
    }

    let scale = 255.0 / (total - cdf_min) as f64;
    let mut cdf = 0u64;
    for (entry, &count) in lut.iter_mut().zip(hist.iter()).skip(first) {
        cdf += count;
        *entry = ((cdf - cdf_min) as f64 * scale).round().clamp(0.0, 255.0) as u8;
    }
    lut
}

/// Apply global histogram equalization.
///
/// # Errors
/// `Error::InvalidInput` if the grid has a zero dimension.
pub fn equalize_histogram(input: ArrayView2<u8>) -> Result<Array2<u8>> {
    ensure_not_empty(&input, "histogram equalization")?;

    let hist = histogram(&input);
    let lut = equalization_lut(&hist, input.len() as u64);

    Ok(input.mapv(|v| lut[v as usize]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use ndarray::Array2;

    fn low_contrast_ramp() -> Array2<u8> {
        // 16x16 grid with values 100..=131
        Array2::from_shape_fn((16, 16), |(y, x)| 100 + ((y * 16 + x) % 32) as u8)
    }

    #[test]
    fn test_histogram_counts() {
        let img = Array2::from_shape_vec((2, 2), vec![0u8, 0, 7, 255]).unwrap();
        let hist = histogram(&img.view());
        assert_eq!(hist[0], 2);
        assert_eq!(hist[7], 1);
        assert_eq!(hist[255], 1);
        assert_eq!(hist.iter().sum::<u64>(), 4);
    }

    #[test]
    fn test_equalize_stretches_full_range() {
        let img = low_contrast_ramp();
        let result = equalize_histogram(img.view()).unwrap();

        assert_eq!(result.dim(), img.dim());
        assert_eq!(*result.iter().min().unwrap(), 0);
        assert_eq!(*result.iter().max().unwrap(), 255);
    }

    #[test]
    fn test_equalize_preserves_ordering() {
        let img = low_contrast_ramp();
        let result = equalize_histogram(img.view()).unwrap();

        // Monotonic mapping: larger input never maps below a smaller one
        let pairs: Vec<(u8, u8)> = img.iter().copied().zip(result.iter().copied()).collect();
        for &(vi, ri) in &pairs {
            for &(vj, rj) in &pairs {
                if vi < vj {
                    assert!(ri <= rj);
                }
            }
        }
    }

    #[test]
    fn test_equalize_twice_is_stable() {
        let img = low_contrast_ramp();
        let once = equalize_histogram(img.view()).unwrap();
        let twice = equalize_histogram(once.view()).unwrap();

        let max_diff = once
            .iter()
            .zip(twice.iter())
            .map(|(&a, &b)| (a as i32 - b as i32).abs())
            .max()
            .unwrap();
        assert!(max_diff <= 2, "second pass moved values by {max_diff}");
    }

    #[test]
    fn test_equalize_constant_grid_unchanged() {
        let img = Array2::<u8>::from_elem((4, 4), 10);
        let result = equalize_histogram(img.view()).unwrap();
        assert_eq!(result, img);
    }

    #[test]
    fn test_equalize_empty_grid_rejected() {
        let img = Array2::<u8>::zeros((0, 3));
        assert!(matches!(
            equalize_histogram(img.view()),
            Err(Error::InvalidInput(_))
        ));
    }
}
