//! Peak Signal-to-Noise Ratio.

use log::warn;

use crate::error::{Error, Result};
use crate::metrics::ensure_same_shape;
use crate::raster::Image;

/// Peak value assumed by [`psnr_opencv`].
const OPENCV_PEAK: f64 = 255.0;

/// Mean squared error over every element of two same-shaped images.
fn mean_squared_error(a: &Image, b: &Image) -> f64 {
    let sum: f64 = a
        .values()
        .zip(b.values())
        .map(|(x, y)| {
            let diff = x - y;
            diff * diff
        })
        .sum();
    sum / a.len() as f64
}

/// Calculate PSNR with the peak taken from the sample type of `a`.
///
/// The data range is 255 for `u8`, 65535 for `u16` and 1 for float images
/// whose values are non-negative (2 if `a` contains negative values).
///
/// # Returns
///
/// PSNR value in decibels. Higher is better. Returns `f64::INFINITY` if
/// images are identical.
///
/// # Errors
///
/// Returns [`Error::ShapeMismatch`] if the shapes differ, and
/// [`Error::MetricCalculation`] if the images are empty or `a` holds values
/// outside its type's nominal range.
pub fn psnr(a: &Image, b: &Image) -> Result<f64> {
    ensure_same_shape(a, b)?;
    if a.sample_type() != b.sample_type() {
        warn!(
            "PSNR inputs have different sample types ({} vs {}); using the range of {}",
            a.sample_type(),
            b.sample_type(),
            a.sample_type()
        );
    }

    let (lo, hi) = a.min_max().ok_or_else(|| Error::metric("PSNR", "image has no elements"))?;
    let (type_min, type_max) = a.sample_type().range();
    if hi > type_max || lo < type_min {
        return Err(Error::metric(
            "PSNR",
            format!(
                "values [{lo}, {hi}] fall outside the {} range [{type_min}, {type_max}]",
                a.sample_type()
            ),
        ));
    }
    let data_range = if lo >= 0.0 { type_max } else { type_max - type_min };

    let mse = mean_squared_error(a, b);
    if mse == 0.0 {
        return Ok(f64::INFINITY);
    }
    Ok(10.0 * (data_range * data_range / mse).log10())
}

/// Calculate PSNR the way OpenCV does: fixed peak of 255 and an epsilon
/// added to the RMS error.
///
/// Identical images give roughly 361.2 dB instead of infinity.
///
/// # Errors
///
/// Returns [`Error::SampleTypeMismatch`] or [`Error::ShapeMismatch`] if the
/// images are not directly comparable, and [`Error::MetricCalculation`] for
/// empty images.
pub fn psnr_opencv(a: &Image, b: &Image) -> Result<f64> {
    if a.sample_type() != b.sample_type() {
        return Err(Error::SampleTypeMismatch {
            expected: a.sample_type(),
            actual: b.sample_type(),
        });
    }
    ensure_same_shape(a, b)?;
    if a.is_empty() {
        return Err(Error::metric("PSNR(OpenCV)", "image has no elements"));
    }

    let rms = mean_squared_error(a, b).sqrt();
    Ok(20.0 * (OPENCV_PEAK / (rms + f64::EPSILON)).log10())
}
