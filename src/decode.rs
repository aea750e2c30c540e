//! Image decoding in "unchanged" mode.
//!
//! Files are decoded with the `image` crate and converted to a [`Image`]
//! array without any color-space conversion or resizing: grayscale stays
//! 2-dimensional, alpha channels are kept and 16-bit or float samples keep
//! their depth.
//!
//! # Example
//!
//! ```ignore
//! use image_concordance::decode::load_unchanged;
//!
//! let image = load_unchanged("photo.png")?;
//! println!("{} {}", image.shape(), image.sample_type());
//! ```

use std::path::Path;

use ::image::{DynamicImage, ImageReader};
use log::debug;

use crate::error::{Error, Result};
use crate::raster::{Image, ImageShape};

/// Decode an image file, keeping its channel layout and bit depth.
///
/// The format is guessed from the file content, falling back to the
/// extension.
///
/// # Errors
///
/// Returns [`Error::ImageLoad`] if the file cannot be opened or decoded, and
/// [`Error::UnsupportedFormat`] if the decoded pixel layout has no array
/// representation.
pub fn load_unchanged(path: impl AsRef<Path>) -> Result<Image> {
    let path = path.as_ref();
    let load_error = |reason: String| Error::ImageLoad {
        path: path.to_path_buf(),
        reason,
    };

    let reader = ImageReader::open(path)
        .and_then(ImageReader::with_guessed_format)
        .map_err(|e| load_error(e.to_string()))?;
    let decoded = reader.decode().map_err(|e| load_error(e.to_string()))?;

    let image = from_dynamic(decoded)?;
    debug!(
        "Decoded {}: shape {}, {} samples",
        path.display(),
        image.shape(),
        image.sample_type()
    );
    Ok(image)
}

/// Convert a decoded `DynamicImage` into an [`Image`] array.
///
/// Single-channel layouts become 2-dimensional arrays; every other layout
/// gets an explicit channel axis.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] for pixel layouts without a
/// mapping.
pub fn from_dynamic(decoded: DynamicImage) -> Result<Image> {
    let width = decoded.width() as usize;
    let height = decoded.height() as usize;
    let channels = |c| ImageShape::with_channels(height, width, c);

    match decoded {
        DynamicImage::ImageLuma8(buf) => Image::new(ImageShape::gray(height, width), buf.into_raw()),
        DynamicImage::ImageLuma16(buf) => {
            Image::new(ImageShape::gray(height, width), buf.into_raw())
        }
        DynamicImage::ImageLumaA8(buf) => Image::new(channels(2), buf.into_raw()),
        DynamicImage::ImageLumaA16(buf) => Image::new(channels(2), buf.into_raw()),
        DynamicImage::ImageRgb8(buf) => Image::new(channels(3), buf.into_raw()),
        DynamicImage::ImageRgb16(buf) => Image::new(channels(3), buf.into_raw()),
        DynamicImage::ImageRgb32F(buf) => Image::new(channels(3), buf.into_raw()),
        DynamicImage::ImageRgba8(buf) => Image::new(channels(4), buf.into_raw()),
        DynamicImage::ImageRgba16(buf) => Image::new(channels(4), buf.into_raw()),
        DynamicImage::ImageRgba32F(buf) => Image::new(channels(4), buf.into_raw()),
        other => Err(Error::UnsupportedFormat(format!(
            "pixel layout {:?}",
            other.color()
        ))),
    }
}
