//! Pixel and feature-map storage.
//!
//! Both buffers keep the flat, row-major, 4-channel layout of the decoded
//! image (`[row][col][channel]`). Pixels stay in the decoded `Vec<u8>`;
//! feature maps live in a contiguous `ndarray::Array3`. Access goes through
//! `(x, y, channel)` accessors so callers never compute offsets by hand.
use ndarray::{Array3, ArrayView2, ArrayViewMut2, Axis};

use crate::error::{Error, Result};
use crate::types::AnalysisChannel;

/// Decoded RGBA8 image, row-major, top-to-bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    rgba: Vec<u8>,
}

impl PixelBuffer {
    /// Wraps `w*h*4` interleaved RGBA bytes.
    pub fn new(width: usize, height: usize, rgba: Vec<u8>) -> Result<Self> {
        let expected = width * height * 4;
        if width == 0 || height == 0 || rgba.len() != expected {
            return Err(Error::InputShape {
                width,
                height,
                expected,
                actual: rgba.len(),
            });
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    /// Buffer filled with a single RGBA color.
    pub fn filled(width: usize, height: usize, rgba: [u8; 4]) -> Result<Self> {
        let bytes = rgba.iter().copied().cycle().take(width * height * 4).collect();
        Self::new(width, height, bytes)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.width + x) * 4
    }

    /// `(r, g, b)` at column `x`, row `y`.
    #[inline]
    pub fn rgb(&self, x: usize, y: usize) -> (u8, u8, u8) {
        let i = self.offset(x, y);
        (self.rgba[i], self.rgba[i + 1], self.rgba[i + 2])
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, channel: usize) -> u8 {
        assert!(x < self.width && channel < 4, "pixel index out of bounds");
        self.rgba[self.offset(x, y) + channel]
    }

    /// Raw interleaved bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.rgba
    }
}

/// Four independent f64 feature maps sharing one grid.
///
/// Used for the full-resolution analysis buffer and for the block-reduced
/// scoring buffer. Values are unclamped: the edge map can be negative or
/// exceed 255.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMap {
    data: Array3<f64>,
}

pub type AnalysisBuffer = FeatureMap;
pub type ReducedBuffer = FeatureMap;

impl FeatureMap {
    pub fn zeros(width: usize, height: usize) -> Self {
        Self {
            data: Array3::zeros((height, width, 4)),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, channel: AnalysisChannel) -> f64 {
        self.data[(y, x, channel.index())]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, channel: AnalysisChannel, value: f64) {
        self.data[(y, x, channel.index())] = value;
    }

    /// One feature map as a `[row, col]` view.
    pub fn channel(&self, channel: AnalysisChannel) -> ArrayView2<'_, f64> {
        self.data.index_axis(Axis(2), channel.index())
    }

    pub fn channel_mut(&mut self, channel: AnalysisChannel) -> ArrayViewMut2<'_, f64> {
        self.data.index_axis_mut(Axis(2), channel.index())
    }

    pub(crate) fn inner(&self) -> &Array3<f64> {
        &self.data
    }

    pub(crate) fn inner_mut(&mut self) -> &mut Array3<f64> {
        &mut self.data
    }
}
