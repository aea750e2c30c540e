//! Pairwise image analysis.
//!
//! [`ConcordanceAnalyzer`] is the main entry point: it loads two images once
//! and answers independent metric queries about the pair. Every query
//! recomputes from the held images; nothing is cached.

use std::io::Write;
use std::path::Path;

use log::debug;

use crate::decode::load_unchanged;
use crate::error::{Error, Result};
use crate::metrics::{
    self, ARRAY_RATE_LABEL, HISTOGRAM_LABEL, MATCH_LABEL, MetricResult, PSNR_LABEL,
    PSNR_OPENCV_LABEL, PsnrMethod, SSIM_LABEL, bool_text,
};
use crate::raster::Image;

/// Two decoded images and the metrics that compare them.
#[derive(Debug, Clone)]
pub struct ConcordanceAnalyzer {
    image_a: Image,
    image_b: Image,
}

impl ConcordanceAnalyzer {
    /// Load both images from disk.
    ///
    /// Both paths are checked for existence before either is decoded,
    /// `path_a` first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileNotFound`] naming the first missing path,
    /// [`Error::Io`] if existence cannot be determined, or a decode error
    /// from [`load_unchanged`].
    pub fn open(path_a: impl AsRef<Path>, path_b: impl AsRef<Path>) -> Result<Self> {
        let (path_a, path_b) = (path_a.as_ref(), path_b.as_ref());
        for path in [path_a, path_b] {
            if !path.try_exists()? {
                return Err(Error::FileNotFound {
                    path: path.to_path_buf(),
                });
            }
        }

        let image_a = load_unchanged(path_a)?;
        let image_b = load_unchanged(path_b)?;
        Ok(Self::from_images(image_a, image_b))
    }

    /// Build an analyzer from already decoded images.
    #[must_use]
    pub fn from_images(image_a: Image, image_b: Image) -> Self {
        Self { image_a, image_b }
    }

    /// The first image.
    #[must_use]
    pub fn image_a(&self) -> &Image {
        &self.image_a
    }

    /// The second image.
    #[must_use]
    pub fn image_b(&self) -> &Image {
        &self.image_b
    }

    /// Whether the two images are exactly equal in shape and every value.
    #[must_use]
    pub fn is_concordant(&self) -> bool {
        metrics::images_equal(&self.image_a, &self.image_b)
    }

    /// Fraction of array elements that are equal.
    pub fn array_match_rate(&self) -> Result<f64> {
        metrics::element_match_rate(&self.image_a, &self.image_b)
    }

    /// Correlation of the blue (or gray) intensity histograms.
    pub fn histogram_match_rate(&self) -> Result<f64> {
        metrics::histogram_match_rate(&self.image_a, &self.image_b)
    }

    /// PSNR in dB using the given formulation.
    pub fn psnr(&self, method: PsnrMethod) -> Result<f64> {
        match method {
            PsnrMethod::Skimage => metrics::psnr(&self.image_a, &self.image_b),
            PsnrMethod::OpenCv => metrics::psnr_opencv(&self.image_a, &self.image_b),
        }
    }

    /// Mean structural similarity over all channels, alpha included.
    pub fn ssim(&self) -> Result<f64> {
        metrics::ssim(&self.image_a, &self.image_b)
    }

    /// Compute every metric, in report order.
    ///
    /// The first failing metric aborts the report.
    pub fn report(&self) -> Result<MetricResult> {
        let result = MetricResult {
            concordant: self.is_concordant(),
            array_match_rate: self.array_match_rate()?,
            histogram_match_rate: self.histogram_match_rate()?,
            psnr: self.psnr(PsnrMethod::Skimage)?,
            psnr_opencv: self.psnr(PsnrMethod::OpenCv)?,
            ssim: self.ssim()?,
        };
        debug!("Metrics: {result:?}");
        Ok(result)
    }

    /// Write the text report one line per metric, each line as soon as its
    /// metric is computed.
    ///
    /// Lines for metrics that succeeded before a failure stay written; the
    /// failing metric's error is returned.
    pub fn write_report<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "{MATCH_LABEL}: {}", bool_text(self.is_concordant()))?;
        writeln!(out, "{ARRAY_RATE_LABEL}: {:?}", self.array_match_rate()?)?;
        writeln!(out, "{HISTOGRAM_LABEL}: {:?}", self.histogram_match_rate()?)?;
        writeln!(out, "{PSNR_LABEL}: {:?}", self.psnr(PsnrMethod::Skimage)?)?;
        writeln!(out, "{PSNR_OPENCV_LABEL}: {:?}", self.psnr(PsnrMethod::OpenCv)?)?;
        writeln!(out, "{SSIM_LABEL}: {:?}", self.ssim()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::ImageShape;
    use ::image::{GrayImage, Luma, Rgb, RgbImage};
    use approx::assert_relative_eq;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn gradient(width: u32, height: u32, shift: u8) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            let v = (x * 20 + y * 7) as u8;
            Rgb([v.wrapping_add(shift), 255 - v, v / 2])
        })
    }

    fn write_rgb(dir: &TempDir, name: &str, img: &RgbImage) -> PathBuf {
        let path = dir.path().join(name);
        img.save(&path).unwrap();
        path
    }

    fn write_gray(dir: &TempDir, name: &str, value: u8) -> PathBuf {
        let path = dir.path().join(name);
        GrayImage::from_pixel(4, 4, Luma([value])).save(&path).unwrap();
        path
    }

    #[test]
    fn test_missing_first_path() {
        let dir = tempfile::tempdir().unwrap();
        let present = write_gray(&dir, "present.png", 1);
        let result = ConcordanceAnalyzer::open("missing.png", &present);
        match result {
            Err(Error::FileNotFound { path }) => assert_eq!(path, PathBuf::from("missing.png")),
            other => panic!("expected FileNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_second_path() {
        let dir = tempfile::tempdir().unwrap();
        let present = write_gray(&dir, "present.png", 1);
        let missing = dir.path().join("missing.png");
        let result = ConcordanceAnalyzer::open(&present, &missing);
        assert!(matches!(result, Err(Error::FileNotFound { path }) if path == missing));
    }

    #[test]
    fn test_first_path_checked_first() {
        let result = ConcordanceAnalyzer::open("first-missing.png", "second-missing.png");
        assert!(
            matches!(result, Err(Error::FileNotFound { path }) if path == PathBuf::from("first-missing.png"))
        );
    }

    #[test]
    fn test_error_message_names_path() {
        let err = ConcordanceAnalyzer::open("missing.png", "missing.png").unwrap_err();
        assert!(err.to_string().contains("missing.png"));
    }

    #[test]
    fn test_constant_gray_pair() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_gray(&dir, "a.png", 100);
        let b = write_gray(&dir, "b.png", 100);
        let analyzer = ConcordanceAnalyzer::open(&a, &b).unwrap();

        assert_eq!(analyzer.image_a().shape(), ImageShape::gray(4, 4));
        assert!(analyzer.is_concordant());
        assert_eq!(analyzer.array_match_rate().unwrap(), 1.0);
    }

    #[test]
    fn test_black_white_pair() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_gray(&dir, "black.png", 0);
        let b = write_gray(&dir, "white.png", 255);
        let analyzer = ConcordanceAnalyzer::open(&a, &b).unwrap();

        assert!(!analyzer.is_concordant());
        assert_eq!(analyzer.array_match_rate().unwrap(), 0.0);
    }

    #[test]
    fn test_gray_ssim_is_dimensionality_error() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_gray(&dir, "a.png", 10);
        let analyzer = ConcordanceAnalyzer::open(&a, &a).unwrap();
        assert!(matches!(analyzer.ssim(), Err(Error::Dimensionality { .. })));
        assert!(analyzer.report().is_err());
    }

    #[test]
    fn test_histogram_follows_blue_channel() {
        let dir = tempfile::tempdir().unwrap();
        let same_blue = |red: fn(u32, u32) -> u8| {
            RgbImage::from_fn(8, 8, move |x, y| Rgb([red(x, y), 40, (x * 30) as u8]))
        };
        let a = write_rgb(&dir, "a.png", &same_blue(|x, y| (x * 11 + y * 5) as u8));
        let b = write_rgb(&dir, "b.png", &same_blue(|_, y| (y * 2) as u8));
        let analyzer = ConcordanceAnalyzer::open(&a, &b).unwrap();

        assert_relative_eq!(analyzer.histogram_match_rate().unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_write_report_matches_display() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_rgb(&dir, "a.png", &gradient(9, 9, 0));
        let b = write_rgb(&dir, "b.png", &gradient(9, 9, 5));
        let analyzer = ConcordanceAnalyzer::open(&a, &b).unwrap();

        let mut out = Vec::new();
        analyzer.write_report(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), analyzer.report().unwrap().to_string());
    }

    #[test]
    fn test_write_report_keeps_lines_before_failure() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_gray(&dir, "a.png", 10);
        let b = write_gray(&dir, "b.png", 20);
        let analyzer = ConcordanceAnalyzer::open(&a, &b).unwrap();

        let mut out = Vec::new();
        let result = analyzer.write_report(&mut out);
        assert!(matches!(result, Err(Error::Dimensionality { .. })));

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "Image match: False");
        assert_eq!(lines[1], "Matrix matching rate: 0.0");
        assert!(lines[4].starts_with("PSNR(OpenCV)[dB](low reliability): "));
    }

    #[test]
    fn test_self_comparison() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_rgb(&dir, "self.png", &gradient(12, 10, 0));
        let analyzer = ConcordanceAnalyzer::open(&path, &path).unwrap();

        assert!(analyzer.is_concordant());
        assert_eq!(analyzer.array_match_rate().unwrap(), 1.0);
        assert_relative_eq!(analyzer.histogram_match_rate().unwrap(), 1.0, epsilon = 1e-12);
        assert!(analyzer.psnr(PsnrMethod::Skimage).unwrap().is_infinite());
        assert!(analyzer.psnr(PsnrMethod::OpenCv).unwrap() > 361.0);
        assert_eq!(analyzer.ssim().unwrap(), 1.0);
    }

    #[test]
    fn test_distinct_pair_metrics_in_range() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_rgb(&dir, "a.png", &gradient(12, 10, 0));
        let b = write_rgb(&dir, "b.png", &gradient(12, 10, 40));
        let analyzer = ConcordanceAnalyzer::open(&a, &b).unwrap();

        let rate = analyzer.array_match_rate().unwrap();
        assert!((0.0..1.0).contains(&rate));
        assert!(!analyzer.is_concordant());

        let hist = analyzer.histogram_match_rate().unwrap();
        assert!((-1.0..=1.0).contains(&hist));

        let psnr = analyzer.psnr(PsnrMethod::default()).unwrap();
        assert!(psnr.is_finite() && psnr > 0.0);

        let ssim = analyzer.ssim().unwrap();
        assert!((-1.0..1.0).contains(&ssim));
    }

    #[test]
    fn test_concordance_matches_full_rate() {
        let base = gradient(8, 8, 0);
        let mut tweaked = base.clone();
        tweaked.put_pixel(3, 3, Rgb([1, 2, 3]));

        let to_image = |img: &RgbImage| {
            Image::new(ImageShape::with_channels(8, 8, 3), img.as_raw().clone()).unwrap()
        };

        let same = ConcordanceAnalyzer::from_images(to_image(&base), to_image(&base));
        assert!(same.is_concordant());
        assert_eq!(same.array_match_rate().unwrap(), 1.0);

        let differ = ConcordanceAnalyzer::from_images(to_image(&base), to_image(&tweaked));
        assert!(!differ.is_concordant());
        assert!(differ.array_match_rate().unwrap() < 1.0);
    }

    #[test]
    fn test_concordance_symmetric() {
        let a = Image::new(ImageShape::gray(2, 2), vec![1u8, 2, 3, 4]).unwrap();
        let b = Image::new(ImageShape::gray(2, 2), vec![1u8, 2, 3, 5]).unwrap();
        let ab = ConcordanceAnalyzer::from_images(a.clone(), b.clone());
        let ba = ConcordanceAnalyzer::from_images(b, a.clone());
        assert_eq!(ab.is_concordant(), ba.is_concordant());

        let aa = ConcordanceAnalyzer::from_images(a.clone(), a);
        assert!(aa.is_concordant());
    }

    #[test]
    fn test_report_matches_individual_queries() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_rgb(&dir, "a.png", &gradient(9, 9, 0));
        let b = write_rgb(&dir, "b.png", &gradient(9, 9, 3));
        let analyzer = ConcordanceAnalyzer::open(&a, &b).unwrap();

        let report = analyzer.report().unwrap();
        assert_eq!(report.concordant, analyzer.is_concordant());
        assert_eq!(report.array_match_rate, analyzer.array_match_rate().unwrap());
        assert_eq!(report.psnr, analyzer.psnr(PsnrMethod::Skimage).unwrap());
        assert_eq!(report.psnr_opencv, analyzer.psnr(PsnrMethod::OpenCv).unwrap());
        assert_eq!(report.ssim, analyzer.ssim().unwrap());
    }

    #[test]
    fn test_undecodable_file() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.png");
        std::fs::write(&bad, b"\x89PNG truncated").unwrap();
        let good = write_gray(&dir, "good.png", 1);
        assert!(matches!(
            ConcordanceAnalyzer::open(&bad, &good),
            Err(Error::ImageLoad { .. })
        ));
    }
}
