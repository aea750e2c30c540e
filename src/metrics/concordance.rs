//! Exact element-wise agreement between two arrays.

use crate::error::{Error, Result};
use crate::metrics::ensure_same_shape;
use crate::raster::Image;

/// True if both images have the same shape and every element is equal.
///
/// Values are compared numerically, so samples of different types can still
/// be equal. NaN never equals anything.
#[must_use]
pub fn images_equal(a: &Image, b: &Image) -> bool {
    a.shape() == b.shape() && a.values().zip(b.values()).all(|(x, y)| x == y)
}

/// Fraction of elements that are equal between the two images.
///
/// The denominator is the element count of `a`.
///
/// # Errors
///
/// Returns [`Error::ShapeMismatch`] if the shapes differ and
/// [`Error::MetricCalculation`] if the images are empty.
pub fn element_match_rate(a: &Image, b: &Image) -> Result<f64> {
    ensure_same_shape(a, b)?;
    if a.is_empty() {
        return Err(Error::metric("match rate", "image has no elements"));
    }

    let equal = a.values().zip(b.values()).filter(|(x, y)| x == y).count();
    Ok(equal as f64 / a.len() as f64)
}
