//! WebAssembly exports for the grid operators.
//!
//! Grids cross the boundary as flat row-major byte arrays
//! (length = width * height) plus their dimensions. Noise functions take an
//! explicit seed since there is no OS entropy source in the browser.

use ndarray::{Array2, ArrayView2};
use rand::rngs::StdRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;

use crate::error::Error;
use crate::filters::{self, FilterWindow, GaussianNoise, MeanFilter, SaltPepperNoise};

fn js_err(err: Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn view(data: &[u8], width: usize, height: usize) -> Result<ArrayView2<'_, u8>, JsValue> {
    ArrayView2::from_shape((height, width), data)
        .map_err(|e| JsValue::from_str(&format!("invalid dimensions {width}x{height}: {e}")))
}

fn into_flat(grid: Array2<u8>) -> Vec<u8> {
    grid.into_raw_vec_and_offset().0
}

// ============================================================================
// Enhancement
// ============================================================================

/// Histogram-equalize a grayscale image.
#[wasm_bindgen]
pub fn equalize_hist_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    let input = view(data, width, height)?;
    filters::equalize_histogram(input).map(into_flat).map_err(js_err)
}

// ============================================================================
// Noise
// ============================================================================

#[wasm_bindgen]
pub fn gaussian_noise_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    mean: f64,
    sigma: f64,
    seed: u64,
) -> Result<Vec<u8>, JsValue> {
    let input = view(data, width, height)?;
    let params = GaussianNoise::new(mean, sigma).map_err(js_err)?;
    let mut rng = StdRng::seed_from_u64(seed);
    filters::add_gaussian_noise(input, &params, &mut rng)
        .map(into_flat)
        .map_err(js_err)
}

#[wasm_bindgen]
pub fn salt_and_pepper_noise_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    salt_prob: f64,
    pepper_prob: f64,
    seed: u64,
) -> Result<Vec<u8>, JsValue> {
    let input = view(data, width, height)?;
    let params = SaltPepperNoise::new(salt_prob, pepper_prob).map_err(js_err)?;
    let mut rng = StdRng::seed_from_u64(seed);
    filters::add_salt_and_pepper_noise(input, &params, &mut rng)
        .map(into_flat)
        .map_err(js_err)
}

// ============================================================================
// Denoising
// ============================================================================

/// Apply a named filter (`arithmetic`, `geometric`, `harmonic`, `gaussian`).
#[wasm_bindgen]
pub fn mean_filter_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    filter: &str,
    kernel_size: usize,
) -> Result<Vec<u8>, JsValue> {
    let input = view(data, width, height)?;
    let filter: MeanFilter = filter.parse().map_err(js_err)?;
    let window = FilterWindow::new(kernel_size).map_err(js_err)?;
    filter.apply(input, window).map(into_flat).map_err(js_err)
}
