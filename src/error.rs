//! Error types for image-concordance operations.

use std::path::PathBuf;
use thiserror::Error;

use crate::raster::{ImageShape, SampleType};

/// Result type alias for image-concordance operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or comparing images.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// An input path does not exist.
    #[error("File not found: {}", path.display())]
    FileNotFound {
        /// The path that was checked.
        path: PathBuf,
    },

    /// Failed to decode an image file.
    #[error("Image load failed: {}: {reason}", path.display())]
    ImageLoad {
        /// Path to the image that failed to load.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// Decoded pixel layout has no array representation here.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The two images do not have the same shape.
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Shape of the first image.
        expected: ImageShape,
        /// Shape of the second image.
        actual: ImageShape,
    },

    /// The two images do not share a sample type.
    #[error("Sample type mismatch: expected {expected}, got {actual}")]
    SampleTypeMismatch {
        /// Sample type of the first image.
        expected: SampleType,
        /// Sample type of the second image.
        actual: SampleType,
    },

    /// A metric needs a different number of array dimensions.
    #[error("Dimensionality error: expected a {expected}-dimensional image, got {actual} dimensions")]
    Dimensionality {
        /// Required number of dimensions.
        expected: usize,
        /// Dimensions of the offending image.
        actual: usize,
    },

    /// A PSNR method name that is not recognized.
    #[error("Unknown PSNR method: '{0}' (expected 'skimage' or 'cv2')")]
    UnknownPsnrMethod(String),

    /// Failed to calculate a quality metric.
    #[error("Metric calculation failed: {metric}: {reason}")]
    MetricCalculation {
        /// Name of the metric that failed.
        metric: String,
        /// Reason for the failure.
        reason: String,
    },

    /// I/O error wrapper.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn metric(metric: &str, reason: impl Into<String>) -> Self {
        Self::MetricCalculation {
            metric: metric.to_string(),
            reason: reason.into(),
        }
    }
}
