//! Pure Rust image backend on the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF, WebP) | `image::ImageReader` |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` |
//! | Encode | `DynamicImage::save`, format from the output extension |

use super::backend::{Dimensions, ImageBackend, MediaError};
use super::params::ResizeParams;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::path::Path;

/// Raster formats that get a `-small` variant.
const RASTER_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Whether `path` is a raster image this backend can resize.
pub fn is_raster_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| RASTER_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

/// Pure Rust backend using the `image` crate.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn load_image(path: &Path) -> Result<DynamicImage, MediaError> {
    ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| {
            MediaError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

fn save_image(img: DynamicImage, path: &Path) -> Result<(), MediaError> {
    let format = ImageFormat::from_path(path).map_err(|e| {
        MediaError::ProcessingFailed(format!("Unsupported output {}: {}", path.display(), e))
    })?;
    // JPEG has no alpha channel.
    let img = if format == ImageFormat::Jpeg {
        DynamicImage::ImageRgb8(img.to_rgb8())
    } else {
        img
    };
    img.save_with_format(path, format).map_err(|e| {
        MediaError::ProcessingFailed(format!("Failed to write {}: {}", path.display(), e))
    })
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, MediaError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| {
            MediaError::ProcessingFailed(format!(
                "Failed to read dimensions of {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(Dimensions { width, height })
    }

    fn resize(&self, params: &ResizeParams) -> Result<(), MediaError> {
        let img = load_image(&params.source)?;
        let resized = img.resize_exact(params.width, params.height, FilterType::Lanczos3);
        save_image(resized, &params.output)
    }
}
