//! Gaussian blur for 8-bit grids.
//!
//! Uses a separable 2-pass convolution with replicate borders. The kernel
//! has exactly `window.size()` taps and its sigma is derived from the size.

use ndarray::{Array2, ArrayView2};

use super::core::{
    ensure_not_empty, gaussian_kernel_1d, round_to_u8, separable_convolve, to_plane,
    FilterWindow,
};
use crate::error::Result;

/// Apply Gaussian blur.
///
/// # Arguments
/// * `input` - Grayscale grid (height, width)
/// * `window` - Kernel size; sigma follows `0.3 * ((k - 1) * 0.5 - 1) + 0.8`
///
/// # Returns
/// Blurred grid with same dimensions
pub fn gaussian_blur(input: ArrayView2<u8>, window: FilterWindow) -> Result<Array2<u8>> {
    ensure_not_empty(&input, "gaussian blur")?;
    if window.size() == 1 {
        return Ok(input.to_owned());
    }

    let kernel = gaussian_kernel_1d(window.size(), 0.0);
    let blurred = separable_convolve(&to_plane(&input).view(), &kernel);

    Ok(blurred.mapv(round_to_u8))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gaussian_blur_constant_grid() {
        let img = Array2::<u8>::from_elem((6, 7), 90);
        let result = gaussian_blur(img.view(), FilterWindow::new(5).unwrap()).unwrap();
        assert_eq!(result, img);
    }

    #[test]
    fn test_gaussian_blur_spreads_impulse() {
        let mut img = Array2::<u8>::zeros((7, 7));
        img[[3, 3]] = 255;

        let result = gaussian_blur(img.view(), FilterWindow::new(3).unwrap()).unwrap();

        assert!(result[[3, 3]] < 255);
        assert!(result[[3, 2]] > 0);
        assert!(result[[2, 3]] > 0);
        assert_eq!(result[[0, 0]], 0);
    }
}
