//! # image-concordance
//!
//! Concordance and similarity metrics for a pair of images.
//!
//! Two images are decoded as-is (no color conversion, no resizing) and
//! compared with a handful of independent metrics: exact equality,
//! element match rate, histogram correlation, PSNR and SSIM.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use image_concordance::{ConcordanceAnalyzer, PsnrMethod};
//!
//! let analyzer = ConcordanceAnalyzer::open("a.png", "b.png")?;
//!
//! println!("identical: {}", analyzer.is_concordant());
//! println!("PSNR: {} dB", analyzer.psnr(PsnrMethod::Skimage)?);
//! println!("SSIM: {}", analyzer.ssim()?);
//! ```
//!
//! ## Modules
//!
//! - [`error`]: Error types for the library
//! - [`raster`]: n-dimensional image arrays
//! - [`decode`]: Loading files without changing their layout
//! - [`metrics`]: Concordance, histogram, PSNR and SSIM metrics
//! - [`analyzer`]: The pairwise analyzer

pub mod analyzer;
pub mod decode;
pub mod error;
pub mod metrics;
pub mod raster;

// Re-export commonly used types
pub use analyzer::ConcordanceAnalyzer;
pub use error::{Error, Result};
pub use metrics::{MetricResult, PsnrMethod};
pub use raster::{Image, ImageShape, SampleType, Samples};
