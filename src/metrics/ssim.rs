//! Structural Similarity Index (SSIM).
//!
//! Mean SSIM over a 7×7 uniform window with sample covariance, computed per
//! channel on the last array axis and averaged. Local statistics use
//! symmetric border extension (`d c b a | a b c d`), and the SSIM map is
//! cropped by half a window on every side before averaging.

use imgref::ImgVec;
use log::debug;

use crate::error::{Error, Result};
use crate::metrics::ensure_same_shape;
use crate::raster::Image;

/// Side length of the sliding window.
pub const WINDOW_SIZE: usize = 7;

const K1: f64 = 0.01;
const K2: f64 = 0.03;

/// Calculate SSIM between two 3-dimensional images.
///
/// The data range is `max(a ∪ b) - min(a ∪ b)`, taken over both images
/// together.
///
/// Every entry of the last axis counts as a channel, so the alpha channel of
/// RGBA or gray+alpha images is averaged in with the color channels.
///
/// # Returns
///
/// SSIM in `[-1, 1]`, 1.0 for identical images.
///
/// # Errors
///
/// - [`Error::Dimensionality`] if either image has no channel axis
/// - [`Error::ShapeMismatch`] if the shapes differ
/// - [`Error::MetricCalculation`] if height or width is below
///   [`WINDOW_SIZE`]
pub fn ssim(a: &Image, b: &Image) -> Result<f64> {
    for image in [a, b] {
        let ndim = image.shape().ndim();
        if ndim != 3 {
            return Err(Error::Dimensionality {
                expected: 3,
                actual: ndim,
            });
        }
    }
    ensure_same_shape(a, b)?;

    let shape = a.shape();
    if shape.height < WINDOW_SIZE || shape.width < WINDOW_SIZE {
        return Err(Error::metric(
            "SSIM",
            format!("window of {WINDOW_SIZE} exceeds image extent {shape}"),
        ));
    }

    let (min_a, max_a) = a.min_max().ok_or_else(|| Error::metric("SSIM", "image has no samples"))?;
    let (min_b, max_b) = b.min_max().ok_or_else(|| Error::metric("SSIM", "image has no samples"))?;
    let data_range = max_a.max(max_b) - min_a.min(min_b);
    if data_range == 0.0 {
        // Both images are the same constant.
        return Ok(1.0);
    }

    let channels = shape.channel_count();
    let mut total = 0.0;
    for channel in 0..channels {
        let x = a.channel_plane(channel)?;
        let y = b.channel_plane(channel)?;
        let value = channel_ssim(&x, &y, data_range);
        debug!("SSIM channel {channel}: {value}");
        total += value;
    }
    Ok(total / channels as f64)
}

/// Mean SSIM of one pair of planes.
fn channel_ssim(x: &ImgVec<f64>, y: &ImgVec<f64>, data_range: f64) -> f64 {
    let width = x.width();
    let height = x.height();

    let xx = pointwise(x, x);
    let yy = pointwise(y, y);
    let xy = pointwise(x, y);

    let ux = uniform_filter(x);
    let uy = uniform_filter(y);
    let uxx = uniform_filter(&xx);
    let uyy = uniform_filter(&yy);
    let uxy = uniform_filter(&xy);

    let np = (WINDOW_SIZE * WINDOW_SIZE) as f64;
    let cov_norm = np / (np - 1.0);
    let c1 = (K1 * data_range).powi(2);
    let c2 = (K2 * data_range).powi(2);

    let pad = (WINDOW_SIZE - 1) / 2;
    let mut sum = 0.0;
    let mut count = 0usize;
    for row in pad..height - pad {
        for col in pad..width - pad {
            let i = row * width + col;
            let (mx, my) = (ux.buf()[i], uy.buf()[i]);
            let vx = cov_norm * (uxx.buf()[i] - mx * mx);
            let vy = cov_norm * (uyy.buf()[i] - my * my);
            let vxy = cov_norm * (uxy.buf()[i] - mx * my);

            let numerator = (2.0 * mx * my + c1) * (2.0 * vxy + c2);
            let denominator = (mx * mx + my * my + c1) * (vx + vy + c2);
            sum += numerator / denominator;
            count += 1;
        }
    }
    sum / count as f64
}

fn pointwise(a: &ImgVec<f64>, b: &ImgVec<f64>) -> ImgVec<f64> {
    let buf = a.buf().iter().zip(b.buf()).map(|(p, q)| p * q).collect();
    ImgVec::new(buf, a.width(), a.height())
}

/// Map an out-of-bounds index back into `0..len` by mirroring about the edge.
fn reflect(index: isize, len: usize) -> usize {
    let len = len as isize;
    let mut i = index;
    loop {
        if i < 0 {
            i = -i - 1;
        } else if i >= len {
            i = 2 * len - i - 1;
        } else {
            return i as usize;
        }
    }
}

/// Box filter of [`WINDOW_SIZE`], applied separably along rows then columns.
fn uniform_filter(plane: &ImgVec<f64>) -> ImgVec<f64> {
    let width = plane.width();
    let height = plane.height();
    let src = plane.buf();
    let radius = (WINDOW_SIZE / 2) as isize;
    let norm = WINDOW_SIZE as f64;

    let mut horizontal = vec![0.0; width * height];
    for row in 0..height {
        let line = &src[row * width..(row + 1) * width];
        for col in 0..width {
            let sum: f64 = (-radius..=radius)
                .map(|k| line[reflect(col as isize + k, width)])
                .sum();
            horizontal[row * width + col] = sum / norm;
        }
    }

    let mut out = vec![0.0; width * height];
    for row in 0..height {
        for col in 0..width {
            let sum: f64 = (-radius..=radius)
                .map(|k| horizontal[reflect(row as isize + k, height) * width + col])
                .sum();
            out[row * width + col] = sum / norm;
        }
    }
    ImgVec::new(out, width, height)
}
