//! denoise-bench
//!
//! Batch pipeline over grayscale images: histogram equalization, synthetic
//! noise (Gaussian, salt-and-pepper) and local-mean denoising (arithmetic,
//! geometric, harmonic), with every intermediate grid written to disk.
//!
//! ## Grid Format
//! All operators work on `Array2<u8>` grids of shape (height, width).
//! Color inputs are reduced to luma when decoded.
//!
//! ## Layout
//! - [`filters`]: pure pixel operators, no I/O
//! - [`pipeline`]: codec seam, per-file orchestration, reports
//!
//! Optional bindings expose the operators to Python (`python` feature, PyO3)
//! and JavaScript (`wasm` feature, wasm-bindgen).

pub mod error;
pub mod filters;
pub mod pipeline;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{Error, Result};
pub use filters::{FilterWindow, GaussianNoise, Grid, MeanFilter, SaltPepperNoise};
pub use pipeline::{BatchReport, CancelToken, FileOutcome, Pipeline, PipelineConfig};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray2, PyReadonlyArray2};
    use pyo3::exceptions::{PyIOError, PyValueError};
    use pyo3::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::error::Error;
    use crate::filters::{self, FilterWindow, GaussianNoise, MeanFilter, SaltPepperNoise};

    impl From<Error> for PyErr {
        fn from(err: Error) -> PyErr {
            match err {
                Error::Io { .. } | Error::Format { .. } => PyIOError::new_err(err.to_string()),
                Error::InvalidParameter { .. } | Error::InvalidInput(_) => {
                    PyValueError::new_err(err.to_string())
                }
            }
        }
    }

    fn rng(seed: Option<u64>) -> StdRng {
        seed.map(StdRng::seed_from_u64)
            .unwrap_or_else(StdRng::from_entropy)
    }

    fn filter<'py>(
        py: Python<'py>,
        image: PyReadonlyArray2<'py, u8>,
        kernel_size: usize,
        kind: MeanFilter,
    ) -> PyResult<Bound<'py, PyArray2<u8>>> {
        let window = FilterWindow::new(kernel_size)?;
        let result = kind.apply(image.as_array(), window)?;
        Ok(result.into_pyarray(py))
    }

    // ========================================================================
    // Enhancement
    // ========================================================================

    /// Global histogram equalization of a 2-D uint8 array.
    #[pyfunction]
    pub fn equalize_hist<'py>(
        py: Python<'py>,
        image: PyReadonlyArray2<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray2<u8>>> {
        let result = filters::equalize_histogram(image.as_array())?;
        Ok(result.into_pyarray(py))
    }

    // ========================================================================
    // Noise
    // ========================================================================

    /// Add Gaussian noise. Pass `seed` for reproducible output.
    #[pyfunction]
    #[pyo3(signature = (image, mean=0.0, sigma=40.0, seed=None))]
    pub fn gaussian_noise<'py>(
        py: Python<'py>,
        image: PyReadonlyArray2<'py, u8>,
        mean: f64,
        sigma: f64,
        seed: Option<u64>,
    ) -> PyResult<Bound<'py, PyArray2<u8>>> {
        let params = GaussianNoise::new(mean, sigma)?;
        let result = filters::add_gaussian_noise(image.as_array(), &params, &mut rng(seed))?;
        Ok(result.into_pyarray(py))
    }

    /// Add salt (255) and pepper (0) impulse noise.
    #[pyfunction]
    #[pyo3(signature = (image, salt_prob=0.02, pepper_prob=0.02, seed=None))]
    pub fn salt_and_pepper_noise<'py>(
        py: Python<'py>,
        image: PyReadonlyArray2<'py, u8>,
        salt_prob: f64,
        pepper_prob: f64,
        seed: Option<u64>,
    ) -> PyResult<Bound<'py, PyArray2<u8>>> {
        let params = SaltPepperNoise::new(salt_prob, pepper_prob)?;
        let result =
            filters::add_salt_and_pepper_noise(image.as_array(), &params, &mut rng(seed))?;
        Ok(result.into_pyarray(py))
    }

    // ========================================================================
    // Denoising
    // ========================================================================

    #[pyfunction]
    #[pyo3(signature = (image, kernel_size=5))]
    pub fn arithmetic_mean_filter<'py>(
        py: Python<'py>,
        image: PyReadonlyArray2<'py, u8>,
        kernel_size: usize,
    ) -> PyResult<Bound<'py, PyArray2<u8>>> {
        filter(py, image, kernel_size, MeanFilter::Arithmetic)
    }

    #[pyfunction]
    #[pyo3(signature = (image, kernel_size=5))]
    pub fn geometric_mean_filter<'py>(
        py: Python<'py>,
        image: PyReadonlyArray2<'py, u8>,
        kernel_size: usize,
    ) -> PyResult<Bound<'py, PyArray2<u8>>> {
        filter(py, image, kernel_size, MeanFilter::Geometric)
    }

    #[pyfunction]
    #[pyo3(signature = (image, kernel_size=5))]
    pub fn harmonic_mean_filter<'py>(
        py: Python<'py>,
        image: PyReadonlyArray2<'py, u8>,
        kernel_size: usize,
    ) -> PyResult<Bound<'py, PyArray2<u8>>> {
        filter(py, image, kernel_size, MeanFilter::Harmonic)
    }

    #[pyfunction]
    #[pyo3(signature = (image, kernel_size=5))]
    pub fn gaussian_filter<'py>(
        py: Python<'py>,
        image: PyReadonlyArray2<'py, u8>,
        kernel_size: usize,
    ) -> PyResult<Bound<'py, PyArray2<u8>>> {
        filter(py, image, kernel_size, MeanFilter::Gaussian)
    }

    /// denoise-bench extension module
    #[pymodule]
    pub fn denoise_bench(m: &Bound<'_, PyModule>) -> PyResult<()> {
        // Enhancement
        m.add_function(wrap_pyfunction!(equalize_hist, m)?)?;

        // Noise
        m.add_function(wrap_pyfunction!(gaussian_noise, m)?)?;
        m.add_function(wrap_pyfunction!(salt_and_pepper_noise, m)?)?;

        // Denoising
        m.add_function(wrap_pyfunction!(arithmetic_mean_filter, m)?)?;
        m.add_function(wrap_pyfunction!(geometric_mean_filter, m)?)?;
        m.add_function(wrap_pyfunction!(harmonic_mean_filter, m)?)?;
        m.add_function(wrap_pyfunction!(gaussian_filter, m)?)?;

        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::denoise_bench;
