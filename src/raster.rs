//! Decoded raster arrays.
//!
//! An [`Image`] is a row-major, channel-interleaved array of samples with a
//! shape of `height × width` (single-channel decodes) or
//! `height × width × channels`. The decoded sample type is kept as-is, so an
//! 8-bit PNG stays `u8` and a 16-bit PNG stays `u16`.

use std::fmt;

use imgref::ImgVec;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Array shape of a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageShape {
    /// Number of rows.
    pub height: usize,
    /// Number of columns.
    pub width: usize,
    /// Size of the channel axis, or `None` for a 2-dimensional array.
    pub channels: Option<usize>,
}

impl ImageShape {
    /// Shape of a 2-dimensional (single-channel) array.
    #[must_use]
    pub fn gray(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            channels: None,
        }
    }

    /// Shape of a 3-dimensional array with an explicit channel axis.
    #[must_use]
    pub fn with_channels(height: usize, width: usize, channels: usize) -> Self {
        Self {
            height,
            width,
            channels: Some(channels),
        }
    }

    /// Number of array dimensions (2 or 3).
    #[must_use]
    pub fn ndim(&self) -> usize {
        if self.channels.is_some() { 3 } else { 2 }
    }

    /// Number of interleaved samples per pixel.
    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.channels.unwrap_or(1)
    }

    /// Total number of array elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.height * self.width * self.channel_count()
    }

    /// True if the array holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for ImageShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.channels {
            Some(c) => write!(f, "({}, {}, {})", self.height, self.width, c),
            None => write!(f, "({}, {})", self.height, self.width),
        }
    }
}

/// Element type of the decoded samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleType {
    /// 8-bit unsigned integer.
    U8,
    /// 16-bit unsigned integer.
    U16,
    /// 32-bit float.
    F32,
}

impl SampleType {
    /// Nominal value range of the type, `(min, max)`.
    ///
    /// Floats use `[-1, 1]`, the conventional range for float image data.
    #[must_use]
    pub fn range(self) -> (f64, f64) {
        match self {
            Self::U8 => (0.0, f64::from(u8::MAX)),
            Self::U16 => (0.0, f64::from(u16::MAX)),
            Self::F32 => (-1.0, 1.0),
        }
    }
}

impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::U8 => write!(f, "u8"),
            Self::U16 => write!(f, "u16"),
            Self::F32 => write!(f, "f32"),
        }
    }
}

/// Owned sample buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    /// 8-bit samples.
    U8(Vec<u8>),
    /// 16-bit samples.
    U16(Vec<u16>),
    /// Float samples.
    F32(Vec<f32>),
}

impl Samples {
    fn len(&self) -> usize {
        match self {
            Self::U8(v) => v.len(),
            Self::U16(v) => v.len(),
            Self::F32(v) => v.len(),
        }
    }

    fn sample_type(&self) -> SampleType {
        match self {
            Self::U8(_) => SampleType::U8,
            Self::U16(_) => SampleType::U16,
            Self::F32(_) => SampleType::F32,
        }
    }
}

impl From<Vec<u8>> for Samples {
    fn from(v: Vec<u8>) -> Self {
        Self::U8(v)
    }
}

impl From<Vec<u16>> for Samples {
    fn from(v: Vec<u16>) -> Self {
        Self::U16(v)
    }
}

impl From<Vec<f32>> for Samples {
    fn from(v: Vec<f32>) -> Self {
        Self::F32(v)
    }
}

/// A decoded image held as an n-dimensional sample array.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    shape: ImageShape,
    samples: Samples,
}

impl Image {
    /// Create an image from a shape and a matching sample buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] if the buffer length does not
    /// equal the number of elements the shape describes, or if the channel
    /// axis is present but zero-sized.
    pub fn new(shape: ImageShape, samples: impl Into<Samples>) -> Result<Self> {
        let samples = samples.into();
        if shape.channels == Some(0) {
            return Err(Error::UnsupportedFormat(
                "channel axis must not be empty".to_string(),
            ));
        }
        if samples.len() != shape.len() {
            return Err(Error::UnsupportedFormat(format!(
                "buffer of {} samples does not fit shape {}",
                samples.len(),
                shape
            )));
        }
        Ok(Self { shape, samples })
    }

    /// Array shape.
    #[must_use]
    pub fn shape(&self) -> ImageShape {
        self.shape
    }

    /// Element type of the samples.
    #[must_use]
    pub fn sample_type(&self) -> SampleType {
        self.samples.sample_type()
    }

    /// Raw sample buffer.
    #[must_use]
    pub fn samples(&self) -> &Samples {
        &self.samples
    }

    /// Total element count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shape.len()
    }

    /// True if the image has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shape.is_empty()
    }

    /// Iterate over all elements in storage order, widened to `f64`.
    pub fn values(&self) -> Values<'_> {
        match &self.samples {
            Samples::U8(v) => Values::U8(v.iter()),
            Samples::U16(v) => Values::U16(v.iter()),
            Samples::F32(v) => Values::F32(v.iter()),
        }
    }

    /// Smallest and largest element, or `None` for an empty image.
    ///
    /// NaN samples are skipped.
    #[must_use]
    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.values()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Iterate over the samples of one channel in row-major order.
    ///
    /// For a 2-dimensional image channel 0 is the whole array.
    pub fn channel_values(&self, channel: usize) -> impl Iterator<Item = f64> + '_ {
        self.values()
            .skip(channel)
            .step_by(self.shape.channel_count())
    }

    /// Copy one channel into a `height × width` plane of `f64`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] if `channel` is out of range.
    pub fn channel_plane(&self, channel: usize) -> Result<ImgVec<f64>> {
        if channel >= self.shape.channel_count() {
            return Err(Error::UnsupportedFormat(format!(
                "channel {} out of range for shape {}",
                channel, self.shape
            )));
        }
        let buf: Vec<f64> = self.channel_values(channel).collect();
        Ok(ImgVec::new(buf, self.shape.width, self.shape.height))
    }
}

/// Iterator over image samples as `f64`, returned by [`Image::values`].
#[derive(Debug, Clone)]
pub enum Values<'a> {
    /// 8-bit source.
    U8(std::slice::Iter<'a, u8>),
    /// 16-bit source.
    U16(std::slice::Iter<'a, u16>),
    /// Float source.
    F32(std::slice::Iter<'a, f32>),
}

impl Iterator for Values<'_> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        match self {
            Self::U8(it) => it.next().map(|&v| f64::from(v)),
            Self::U16(it) => it.next().map(|&v| f64::from(v)),
            Self::F32(it) => it.next().map(|&v| f64::from(v)),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::U8(it) => it.size_hint(),
            Self::U16(it) => it.size_hint(),
            Self::F32(it) => it.size_hint(),
        }
    }

    fn nth(&mut self, n: usize) -> Option<f64> {
        match self {
            Self::U8(it) => it.nth(n).map(|&v| f64::from(v)),
            Self::U16(it) => it.nth(n).map(|&v| f64::from(v)),
            Self::F32(it) => it.nth(n).map(|&v| f64::from(v)),
        }
    }
}

impl ExactSizeIterator for Values<'_> {}
