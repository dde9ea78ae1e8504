//! Luminance conversion for color inputs.
//!
//! Decoded color images arrive as interleaved RGB arrays of shape
//! `(height, width, 3)` and collapse to a single BT.601 luma value:
//! 0.299 R + 0.587 G + 0.114 B, the conversion common imaging libraries use
//! when reading color files as grayscale.

use ndarray::{Array2, ArrayView3};

use crate::error::{Error, Result};

/// BT.601 weights for R, G, B.
pub const BT601_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

/// Collapse an interleaved RGB image to an 8-bit luma grid.
///
/// # Errors
/// `Error::InvalidInput` unless the last axis holds exactly 3 channels.
pub fn rgb_to_luma(input: ArrayView3<u8>) -> Result<Array2<u8>> {
    let (height, width, channels) = input.dim();
    if channels != 3 {
        return Err(Error::InvalidInput(format!(
            "expected 3 interleaved RGB channels, got {channels}"
        )));
    }

    let [wr, wg, wb] = BT601_WEIGHTS;
    let output = Array2::from_shape_fn((height, width), |(y, x)| {
        let luma = wr * input[[y, x, 0]] as f32
            + wg * input[[y, x, 1]] as f32
            + wb * input[[y, x, 2]] as f32;
        luma.round().clamp(0.0, 255.0) as u8
    });
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_luma_bt601_primaries() {
        let mut img = Array3::<u8>::zeros((1, 3, 3));
        img[[0, 0, 0]] = 255; // R
        img[[0, 1, 1]] = 255; // G
        img[[0, 2, 2]] = 255; // B

        let result = rgb_to_luma(img.view()).unwrap();

        // 0.299 * 255 ≈ 76, 0.587 * 255 ≈ 150, 0.114 * 255 ≈ 29
        assert_eq!(result[[0, 0]], 76);
        assert_eq!(result[[0, 1]], 150);
        assert_eq!(result[[0, 2]], 29);
    }

    #[test]
    fn test_luma_neutral_gray_unchanged() {
        let img = Array3::<u8>::from_elem((2, 2, 3), 200);
        let result = rgb_to_luma(img.view()).unwrap();
        assert_eq!(result.dim(), (2, 2));
        assert!(result.iter().all(|&v| v == 200));
    }

    #[test]
    fn test_luma_rejects_non_rgb() {
        for channels in [1, 2, 4] {
            let img = Array3::<u8>::zeros((1, 1, channels));
            assert!(matches!(
                rgb_to_luma(img.view()),
                Err(Error::InvalidInput(_))
            ));
        }
    }
}
