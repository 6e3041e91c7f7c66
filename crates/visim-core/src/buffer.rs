//! Floating-point RGB pixel buffers.
//!
//! [`RgbBuffer`] is the currency of every transform: a flat, row-major
//! sequence of `f32` triplets, one per pixel, indexed as
//! `data[pixel * 3 + channel]`.
//!
//! # Memory Layout
//!
//! ```text
//! Memory: [R G B R G B R G B ...]  <- Row 0
//!         [R G B R G B R G B ...]  <- Row 1
//!         ...
//! ```
//!
//! The buffer does not carry alpha. Alpha lives in [`crate::RgbaImage`] and
//! is merged back in by the boundary conversion, never by a transform.
//!
//! # Usage
//!
//! ```rust
//! use visim_core::RgbBuffer;
//!
//! let mut buf = RgbBuffer::new(2, 2);
//! buf.set_pixel(1, [0.25, 0.5, 0.75]);
//! assert_eq!(buf.pixel(1), [0.25, 0.5, 0.75]);
//! assert_eq!(buf.data().len(), 12);
//! ```

use crate::{Error, Result};

/// Number of channels stored per pixel.
pub const RGB_CHANNELS: usize = 3;

/// Flat row-major buffer of RGB triplets.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbBuffer {
    data: Vec<f32>,
    width: u32,
    height: u32,
}

impl RgbBuffer {
    /// Creates a zero-filled buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0.0; width as usize * height as usize * RGB_CHANNELS],
            width,
            height,
        }
    }

    /// Wraps existing samples.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferSize`] if `data.len() != width * height * 3`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use visim_core::RgbBuffer;
    ///
    /// let buf = RgbBuffer::from_data(2, 1, vec![0.0; 6]).unwrap();
    /// assert_eq!(buf.pixel_count(), 2);
    /// assert!(RgbBuffer::from_data(2, 2, vec![0.0; 6]).is_err());
    /// ```
    pub fn from_data(width: u32, height: u32, data: Vec<f32>) -> Result<Self> {
        let expected = width as usize * height as usize * RGB_CHANNELS;
        if data.len() != expected {
            return Err(Error::buffer_size(expected, data.len()));
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Creates a buffer filled with a single color.
    pub fn filled(width: u32, height: u32, rgb: [f32; 3]) -> Self {
        let n = width as usize * height as usize;
        let mut data = Vec::with_capacity(n * RGB_CHANNELS);
        for _ in 0..n {
            data.extend_from_slice(&rgb);
        }
        Self {
            data,
            width,
            height,
        }
    }

    /// Creates a buffer by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> [f32; 3]) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize * RGB_CHANNELS);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self {
            data,
            width,
            height,
        }
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of pixels (`width * height`).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns `true` if width or height is zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Fails with [`Error::EmptyImage`] if the buffer has no pixels.
    #[inline]
    pub fn ensure_non_empty(&self) -> Result<()> {
        if self.is_empty() {
            return Err(Error::empty_image(self.width, self.height));
        }
        Ok(())
    }

    /// Raw samples.
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Mutable raw samples.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Consumes the buffer, returning its samples.
    #[inline]
    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    /// Returns the triplet at linear pixel index `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= pixel_count()`.
    #[inline]
    pub fn pixel(&self, i: usize) -> [f32; 3] {
        let o = i * RGB_CHANNELS;
        [self.data[o], self.data[o + 1], self.data[o + 2]]
    }

    /// Overwrites the triplet at linear pixel index `i`.
    #[inline]
    pub fn set_pixel(&mut self, i: usize, rgb: [f32; 3]) {
        let o = i * RGB_CHANNELS;
        self.data[o..o + RGB_CHANNELS].copy_from_slice(&rgb);
    }

    /// Iterates over pixel triplets in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = [f32; 3]> + '_ {
        self.data
            .chunks_exact(RGB_CHANNELS)
            .map(|p| [p[0], p[1], p[2]])
    }

    /// Number of samples in one row.
    #[inline]
    pub fn row_len(&self) -> usize {
        self.width as usize * RGB_CHANNELS
    }

    /// Largest absolute per-sample difference to another buffer.
    ///
    /// Returns `f32::INFINITY` when the dimensions differ.
    pub fn max_abs_diff(&self, other: &Self) -> f32 {
        if self.dimensions() != other.dimensions() {
            return f32::INFINITY;
        }
        self.data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f32::max)
    }
}
