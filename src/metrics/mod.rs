//! Concordance and similarity metrics for image pairs.
//!
//! Supported metrics:
//!
//! - **Concordance**: exact array equality and per-element match rate
//! - **Histogram correlation**: similarity of the intensity distribution of
//!   the first channel in BGR(A) order, independent of spatial layout
//! - **PSNR**: Peak Signal-to-Noise Ratio, with a type-range variant and an
//!   OpenCV-compatible fixed-peak variant (higher is better)
//! - **SSIM**: Structural Similarity Index over 7×7 windows (1 = identical)
//!
//! ## Value ranges
//!
//! | Metric | Range | Identical images |
//! |--------|-------|------------------|
//! | Match rate | 0 to 1 | 1.0 |
//! | Histogram | -1 to 1 | 1.0 |
//! | PSNR | dB | +inf (≈361 dB for the OpenCV variant) |
//! | SSIM | -1 to 1 | 1.0 |

pub mod concordance;
pub mod histogram;
pub mod psnr;
pub mod ssim;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::raster::Image;

pub use concordance::{element_match_rate, images_equal};
pub use histogram::{HISTOGRAM_BINS, channel_histogram, histogram_correlation, histogram_match_rate};
pub use psnr::{psnr, psnr_opencv};
pub use ssim::ssim;

/// Which PSNR formulation to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PsnrMethod {
    /// Peak inferred from the sample type (255, 65535, or 1 for floats).
    #[default]
    #[serde(rename = "skimage")]
    Skimage,
    /// Fixed peak of 255 with an epsilon guard, as OpenCV computes it.
    ///
    /// Never returns infinity and assumes 8-bit data, so it is less reliable
    /// for deeper images.
    #[serde(rename = "cv2")]
    OpenCv,
}

impl PsnrMethod {
    /// Name used on the command line and in reports.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Skimage => "skimage",
            Self::OpenCv => "cv2",
        }
    }
}

impl fmt::Display for PsnrMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PsnrMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "skimage" => Ok(Self::Skimage),
            "cv2" | "opencv" => Ok(Self::OpenCv),
            _ => Err(Error::UnknownPsnrMethod(s.to_string())),
        }
    }
}

pub(crate) const MATCH_LABEL: &str = "Image match";
pub(crate) const ARRAY_RATE_LABEL: &str = "Matrix matching rate";
pub(crate) const HISTOGRAM_LABEL: &str = "Histgram matching rate";
pub(crate) const PSNR_LABEL: &str = "PSNR[dB]";
pub(crate) const PSNR_OPENCV_LABEL: &str = "PSNR(OpenCV)[dB](low reliability)";
pub(crate) const SSIM_LABEL: &str = "SSIM";

/// Text form of a boolean in reports.
pub(crate) fn bool_text(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

/// All metrics for one image pair.
///
/// Non-finite PSNR values serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricResult {
    /// Whether the two arrays are exactly equal.
    pub concordant: bool,
    /// Fraction of equal elements.
    pub array_match_rate: f64,
    /// Correlation of the first-channel (blue or gray) histograms.
    pub histogram_match_rate: f64,
    /// PSNR in dB with the type-inferred peak.
    pub psnr: f64,
    /// PSNR in dB as OpenCV computes it.
    pub psnr_opencv: f64,
    /// Mean structural similarity.
    pub ssim: f64,
}

impl MetricResult {
    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for MetricResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{MATCH_LABEL}: {}", bool_text(self.concordant))?;
        writeln!(f, "{ARRAY_RATE_LABEL}: {:?}", self.array_match_rate)?;
        writeln!(f, "{HISTOGRAM_LABEL}: {:?}", self.histogram_match_rate)?;
        writeln!(f, "{PSNR_LABEL}: {:?}", self.psnr)?;
        writeln!(f, "{PSNR_OPENCV_LABEL}: {:?}", self.psnr_opencv)?;
        writeln!(f, "{SSIM_LABEL}: {:?}", self.ssim)
    }
}

/// Fail with [`Error::ShapeMismatch`] unless both images have the same shape.
pub(crate) fn ensure_same_shape(a: &Image, b: &Image) -> Result<()> {
    if a.shape() == b.shape() {
        Ok(())
    } else {
        Err(Error::ShapeMismatch {
            expected: a.shape(),
            actual: b.shape(),
        })
    }
}
