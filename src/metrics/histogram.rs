//! Intensity histogram comparison.
//!
//! Histograms use [`HISTOGRAM_BINS`] unit-width bins over `[0, 256)`.
//! Samples outside that range are not counted, which means 16-bit images
//! only contribute their darkest values and float images in `[0, 1]` land
//! entirely in bin 0.

use crate::error::{Error, Result};
use crate::raster::Image;

/// Number of histogram bins.
pub const HISTOGRAM_BINS: usize = 256;

/// Histogram of one channel.
///
/// # Errors
///
/// Returns [`Error::MetricCalculation`] if `channel` does not exist.
pub fn channel_histogram(image: &Image, channel: usize) -> Result<Vec<f64>> {
    if channel >= image.shape().channel_count() {
        return Err(Error::metric(
            "histogram",
            format!("channel {} out of range for shape {}", channel, image.shape()),
        ));
    }

    let mut bins = vec![0.0; HISTOGRAM_BINS];
    for v in image.channel_values(channel) {
        if (0.0..HISTOGRAM_BINS as f64).contains(&v) {
            bins[v as usize] += 1.0;
        }
    }
    Ok(bins)
}

/// Pearson correlation between two histograms, in `[-1, 1]`.
///
/// Returns 1.0 when either histogram has (near) zero variance across bins.
#[must_use]
pub fn histogram_correlation(h1: &[f64], h2: &[f64]) -> f64 {
    let n = h1.len().min(h2.len());
    if n == 0 {
        return 1.0;
    }
    let scale = 1.0 / n as f64;

    let (mut s1, mut s2, mut s11, mut s22, mut s12) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for (&a, &b) in h1.iter().zip(h2) {
        s1 += a;
        s2 += b;
        s11 += a * a;
        s22 += b * b;
        s12 += a * b;
    }

    let num = s12 - s1 * s2 * scale;
    let denom2 = (s11 - s1 * s1 * scale) * (s22 - s2 * s2 * scale);
    if denom2.abs() > f64::EPSILON {
        (num / denom2.sqrt()).clamp(-1.0, 1.0)
    } else {
        1.0
    }
}

/// Storage index of the first channel in BGR(A) order.
///
/// Color images are decoded as RGB(A), so the first BGR channel is blue.
/// Gray and gray+alpha images start with the gray channel either way.
fn first_bgr_channel(image: &Image) -> usize {
    match image.shape().channels {
        Some(3 | 4) => 2,
        _ => 0,
    }
}

/// Correlation of the first-channel histograms of two images.
///
/// The first channel is taken in BGR(A) order: blue for color images, gray
/// otherwise. Shapes may differ; only the distributions are compared.
pub fn histogram_match_rate(a: &Image, b: &Image) -> Result<f64> {
    let h1 = channel_histogram(a, first_bgr_channel(a))?;
    let h2 = channel_histogram(b, first_bgr_channel(b))?;
    Ok(histogram_correlation(&h1, &h2))
}
