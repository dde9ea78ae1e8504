//! Image codec seam.
//!
//! The pipeline only sees 8-bit grayscale grids. `FileCodec` bridges to the
//! `image` crate for PNG, JPEG and TIFF; tests can plug in their own
//! `ImageCodec` to stay off the filesystem.

use std::path::Path;

use image::{DynamicImage, GrayImage, ImageError};
use ndarray::{Array2, Array3, ArrayView2};

use crate::error::{Error, Result};
use crate::filters::grayscale::rgb_to_luma;
use crate::filters::Grid;

/// Extensions the pipeline reads and writes (compared case-insensitively).
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "tif", "tiff"];

/// Whether `path` carries one of [`SUPPORTED_EXTENSIONS`].
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| supported.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// Decode files into grids and encode grids back into files.
pub trait ImageCodec: Send + Sync {
    /// # Errors
    /// `Error::Format` for unsupported extensions or undecodable content.
    fn read(&self, path: &Path) -> Result<Grid>;

    /// # Errors
    /// `Error::Io` if encoding or writing fails.
    fn write(&self, path: &Path, grid: ArrayView2<u8>) -> Result<()>;
}

/// `image`-crate backed codec. Color files are reduced to BT.601 luma.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileCodec;

impl FileCodec {
    fn to_grid(path: &Path, img: DynamicImage) -> Result<Grid> {
        let (width, height) = (img.width() as usize, img.height() as usize);
        let shape_err =
            |e: ndarray::ShapeError| Error::InvalidInput(format!("{}: {e}", path.display()));

        if img.color().has_color() {
            let rgb = img.to_rgb8().into_raw();
            let interleaved =
                Array3::from_shape_vec((height, width, 3), rgb).map_err(shape_err)?;
            rgb_to_luma(interleaved.view())
        } else {
            let luma = img.into_luma8().into_raw();
            Array2::from_shape_vec((height, width), luma).map_err(shape_err)
        }
    }
}

impl ImageCodec for FileCodec {
    fn read(&self, path: &Path) -> Result<Grid> {
        if !is_supported(path) {
            return Err(Error::Format {
                path: path.to_path_buf(),
                detail: format!(
                    "extension not in {{{}}}",
                    SUPPORTED_EXTENSIONS.join(", ")
                ),
            });
        }

        let img = image::open(path).map_err(|e| Error::Format {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        Self::to_grid(path, img)
    }

    fn write(&self, path: &Path, grid: ArrayView2<u8>) -> Result<()> {
        let (height, width) = grid.dim();
        let raw: Vec<u8> = grid.iter().copied().collect();
        let img = GrayImage::from_raw(width as u32, height as u32, raw).ok_or_else(|| {
            Error::InvalidInput(format!("grid {width}x{height} does not fit an image buffer"))
        })?;

        img.save(path).map_err(|e| match e {
            ImageError::IoError(source) => Error::io(path, source),
            other => Error::io(path, std::io::Error::other(other)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use std::path::PathBuf;

    #[test]
    fn test_supported_extensions_case_insensitive() {
        assert!(is_supported(Path::new("a.png")));
        assert!(is_supported(Path::new("dir/B.JPG")));
        assert!(is_supported(Path::new("scan.TiFf")));
        assert!(!is_supported(Path::new("photo.bmp")));
        assert!(!is_supported(Path::new("README")));
    }

    #[test]
    fn test_read_unsupported_extension_is_format_error() {
        let codec = FileCodec;
        let err = codec.read(Path::new("photo.bmp")).unwrap_err();
        assert!(matches!(err, Error::Format { ref path, .. } if path == &PathBuf::from("photo.bmp")));
    }

    #[test]
    fn test_read_garbage_is_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        let err = FileCodec.read(&path).unwrap_err();
        assert!(matches!(err, Error::Format { .. }));
    }

    #[test]
    fn test_png_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ramp.png");
        let grid = Array2::from_shape_fn((6, 9), |(y, x)| (y * 40 + x) as u8);

        let codec = FileCodec;
        codec.write(&path, grid.view()).unwrap();
        let back = codec.read(&path).unwrap();

        assert_eq!(back, grid);
    }

    #[test]
    fn test_tiff_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ramp.tif");
        let grid = Array2::from_shape_fn((5, 4), |(y, x)| (y * 50 + x * 3) as u8);

        let codec = FileCodec;
        codec.write(&path, grid.view()).unwrap();
        assert_eq!(codec.read(&path).unwrap(), grid);
    }

    #[test]
    fn test_color_input_converted_to_luma() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("red.png");
        RgbImage::from_pixel(3, 2, Rgb([255, 0, 0])).save(&path).unwrap();

        let grid = FileCodec.read(&path).unwrap();

        assert_eq!(grid.dim(), (2, 3));
        assert!(grid.iter().all(|&v| v == 76));
    }

    #[test]
    fn test_rgba_input_drops_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("green.png");
        RgbaImage::from_pixel(2, 2, Rgba([0, 255, 0, 10])).save(&path).unwrap();

        let grid = FileCodec.read(&path).unwrap();

        assert!(grid.iter().all(|&v| v == 150));
    }

    #[test]
    fn test_write_into_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.png");
        let grid = Array2::<u8>::zeros((2, 2));

        let err = FileCodec.write(&path, grid.view()).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
