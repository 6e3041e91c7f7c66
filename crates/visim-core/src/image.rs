//! Interleaved 8-bit RGBA images.
//!
//! [`RgbaImage`] is the shape in which pixels arrive from, and return to,
//! the acquisition and display layers: `[R G B A R G B A ...]`, row-major,
//! top-to-bottom. The transforms never alter the alpha channel; it is
//! copied through by the boundary conversions in `visim-color` and by the
//! infant-vision blur.
//!
//! Decoding files and downscaling oversized inputs happen upstream; this
//! type only holds already-decoded bytes.

use crate::{Error, Result};

/// Number of interleaved channels per pixel.
pub const RGBA_CHANNELS: usize = 4;

/// Interleaved 8-bit RGBA image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaImage {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl RgbaImage {
    /// Creates a transparent black image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0; width as usize * height as usize * RGBA_CHANNELS],
            width,
            height,
        }
    }

    /// Wraps existing RGBA bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferSize`] if `data.len() != width * height * 4`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use visim_core::RgbaImage;
    ///
    /// let img = RgbaImage::from_raw(1, 1, vec![255, 0, 0, 255]).unwrap();
    /// assert_eq!(img.pixel(0), [255, 0, 0, 255]);
    /// ```
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * RGBA_CHANNELS;
        if data.len() != expected {
            return Err(Error::buffer_size(expected, data.len()));
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Creates an image filled with one RGBA value.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let n = width as usize * height as usize;
        Self {
            data: rgba.repeat(n),
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

    /// Number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns `true` if width or height is zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns `true` if `width == height`.
    #[inline]
    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    /// Raw interleaved bytes.
    #[inline]
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the image, returning its bytes.
    #[inline]
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// RGBA at linear pixel index `i`.
    #[inline]
    pub fn pixel(&self, i: usize) -> [u8; 4] {
        let o = i * RGBA_CHANNELS;
        [self.data[o], self.data[o + 1], self.data[o + 2], self.data[o + 3]]
    }

    /// Overwrites the RGBA value at linear pixel index `i`.
    #[inline]
    pub fn set_pixel(&mut self, i: usize, rgba: [u8; 4]) {
        let o = i * RGBA_CHANNELS;
        self.data[o..o + RGBA_CHANNELS].copy_from_slice(&rgba);
    }

    /// Iterates over RGBA pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        self.data
            .chunks_exact(RGBA_CHANNELS)
            .map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// Alpha channel, one byte per pixel.
    pub fn alpha(&self) -> Vec<u8> {
        self.data.chunks_exact(RGBA_CHANNELS).map(|p| p[3]).collect()
    }

    /// Largest centred square, for callers that retry a square-only
    /// transform after [`Error::NonSquareImage`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use visim_core::RgbaImage;
    ///
    /// let wide = RgbaImage::new(6, 4);
    /// let sq = wide.center_square_crop();
    /// assert_eq!((sq.width(), sq.height()), (4, 4));
    /// ```
    pub fn center_square_crop(&self) -> Self {
        let side = self.width.min(self.height);
        let x0 = ((self.width - side) / 2) as usize;
        let y0 = ((self.height - side) / 2) as usize;
        let src_row = self.width as usize * RGBA_CHANNELS;
        let dst_row = side as usize * RGBA_CHANNELS;

        let mut data = Vec::with_capacity(side as usize * dst_row);
        for y in y0..y0 + side as usize {
            let start = y * src_row + x0 * RGBA_CHANNELS;
            data.extend_from_slice(&self.data[start..start + dst_row]);
        }
        Self {
            data,
            width: side,
            height: side,
        }
    }
}
