//! Basis conversions and the RGBA boundary.
//!
//! Triplet-level functions change basis for one color. The image-level
//! functions move between [`RgbaImage`] bytes and float [`RgbBuffer`]s;
//! they split alpha off on the way in and merge it back on the way out, so
//! no transform ever sees it.
//!
//! # Example
//!
//! ```rust
//! use visim_color::convert::{linear_to_rgba, rgba_to_linear};
//! use visim_core::RgbaImage;
//!
//! let img = RgbaImage::filled(2, 2, [200, 100, 50, 77]);
//! let linear = rgba_to_linear(&img);
//! let back = linear_to_rgba(&linear, &img.alpha()).unwrap();
//! assert_eq!(back, img);
//! ```

use visim_core::{Error, RgbBuffer, RgbaImage};
use visim_math::Vec3;
use visim_transfer::{normalized, srgb};

use crate::ColorResult;
use crate::matrices::{
    DICHROMACY_LMS_TO_RGB, DICHROMACY_RGB_TO_LMS, INFANT_LMS_TO_RGB, INFANT_RGB_TO_LMS,
    LMS_TO_OPP, opponent_to_lms as opp_to_lms_matrix,
};

/// Linear RGB -> LMS (dichromacy pair).
#[inline]
pub fn linear_rgb_to_lms(rgb: Vec3) -> Vec3 {
    DICHROMACY_RGB_TO_LMS * rgb
}

/// LMS -> linear RGB (dichromacy pair).
#[inline]
pub fn lms_to_linear_rgb(lms: Vec3) -> Vec3 {
    DICHROMACY_LMS_TO_RGB * lms
}

/// Normalised RGB -> LMS (infant pair).
#[inline]
pub fn infant_rgb_to_lms(rgb: Vec3) -> Vec3 {
    INFANT_RGB_TO_LMS * rgb
}

/// LMS -> normalised RGB (infant pair).
#[inline]
pub fn infant_lms_to_rgb(lms: Vec3) -> Vec3 {
    INFANT_LMS_TO_RGB * lms
}

/// LMS -> opponent.
#[inline]
pub fn lms_to_opponent(lms: Vec3) -> Vec3 {
    LMS_TO_OPP * lms
}

/// Opponent -> LMS, through the cached inverse.
#[inline]
pub fn opponent_to_lms(opp: Vec3) -> Vec3 {
    opp_to_lms_matrix() * opp
}

fn check_alpha(expected: usize, alpha: &[u8]) -> ColorResult<()> {
    if alpha.len() != expected {
        return Err(Error::buffer_size(expected, alpha.len()).into());
    }
    Ok(())
}

fn decode(img: &RgbaImage, f: impl Fn(u8) -> f32) -> RgbBuffer {
    let mut buf = RgbBuffer::new(img.width(), img.height());
    for (dst, px) in buf.data_mut().chunks_exact_mut(3).zip(img.pixels()) {
        dst[0] = f(px[0]);
        dst[1] = f(px[1]);
        dst[2] = f(px[2]);
    }
    buf
}

fn encode(buf: &RgbBuffer, alpha: &[u8], f: impl Fn(f32) -> u8) -> ColorResult<RgbaImage> {
    check_alpha(buf.pixel_count(), alpha)?;
    let mut out = RgbaImage::new(buf.width(), buf.height());
    for (i, (px, &a)) in buf.pixels().zip(alpha).enumerate() {
        out.set_pixel(i, [f(px[0]), f(px[1]), f(px[2]), a]);
    }
    Ok(out)
}

/// Decodes sRGB bytes to linear `[0, 1]`, dropping alpha.
pub fn rgba_to_linear(img: &RgbaImage) -> RgbBuffer {
    decode(img, srgb::srgb_byte_to_linear)
}

/// Encodes linear RGB to sRGB bytes with the given alpha.
///
/// Values are clamped to `[0, 1]` before encoding.
///
/// # Errors
///
/// Returns a `BufferSize` error if `alpha` has a different pixel count.
pub fn linear_to_rgba(buf: &RgbBuffer, alpha: &[u8]) -> ColorResult<RgbaImage> {
    encode(buf, alpha, srgb::linear_to_srgb_byte)
}

/// Maps bytes to `[-1, 1]` via `(v - 128) / 128`, dropping alpha.
pub fn rgba_to_normalized(img: &RgbaImage) -> RgbBuffer {
    decode(img, normalized::byte_to_normalized)
}

/// Maps `[-1, 1]` values back to bytes with the given alpha.
///
/// # Errors
///
/// Returns a `BufferSize` error if `alpha` has a different pixel count.
pub fn normalized_to_rgba(buf: &RgbBuffer, alpha: &[u8]) -> ColorResult<RgbaImage> {
    encode(buf, alpha, normalized::normalized_to_byte)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ColorError;

    /// 10x10x10 lattice over [-2, 2]^3, offset off the axes.
    fn lattice() -> impl Iterator<Item = Vec3> {
        let step = |i: u32| -2.0 + (i as f64 + 0.37) * 0.4;
        (0..1000u32).map(move |i| Vec3::new(step(i % 10), step(i / 10 % 10), step(i / 100)))
    }

    #[test]
    fn test_opponent_roundtrip_lattice() {
        for lms in lattice() {
            let back = opponent_to_lms(lms_to_opponent(lms));
            assert!((back - lms).abs().max_element() < 1e-6, "{lms:?} -> {back:?}");

            let opp = lms;
            let back = lms_to_opponent(opponent_to_lms(opp));
            assert!((back - opp).abs().max_element() < 1e-6, "{opp:?} -> {back:?}");
        }
    }

    #[test]
    fn test_lms_roundtrip() {
        let rgb = Vec3::new(0.9, 0.1, 0.4);
        let back = lms_to_linear_rgb(linear_rgb_to_lms(rgb));
        assert!((back - rgb).abs().max_element() < 1e-6);

        let rgb = Vec3::new(-0.5, 0.25, 0.75);
        let back = infant_lms_to_rgb(infant_rgb_to_lms(rgb));
        assert!((back - rgb).abs().max_element() < 1e-6);
    }

    #[test]
    fn test_linear_boundary_keeps_alpha() {
        let mut img = RgbaImage::filled(3, 1, [255, 128, 0, 255]);
        img.set_pixel(2, [10, 20, 30, 0]);
        let linear = rgba_to_linear(&img);
        assert_eq!(linear.pixel(0)[0], 1.0);
        let back = linear_to_rgba(&linear, &img.alpha()).unwrap();
        assert_eq!(back, img);
    }

    #[test]
    fn test_linear_encode_clamps() {
        let buf = RgbBuffer::from_data(1, 1, vec![-0.5, 0.0, 4.0]).unwrap();
        let img = linear_to_rgba(&buf, &[9]).unwrap();
        assert_eq!(img.pixel(0), [0, 0, 255, 9]);
    }

    #[test]
    fn test_normalized_boundary() {
        let img = RgbaImage::filled(2, 1, [128, 0, 255, 200]);
        let n = rgba_to_normalized(&img);
        assert_eq!(n.pixel(1), [0.0, -1.0, 127.0 / 128.0]);
        assert_eq!(normalized_to_rgba(&n, &img.alpha()).unwrap(), img);
    }

    #[test]
    fn test_alpha_length_mismatch() {
        let buf = RgbBuffer::new(2, 2);
        let err = linear_to_rgba(&buf, &[255; 3]).unwrap_err();
        assert_eq!(
            err,
            ColorError::Core(Error::BufferSize {
                expected: 4,
                got: 3
            })
        );
    }
}
