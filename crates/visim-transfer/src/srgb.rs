//! sRGB transfer function.
//!
//! The sRGB standard uses a piecewise function combining a linear segment
//! near black with a 2.4 power curve (with the 1.055/0.055 offset) for the
//! rest.
//!
//! # Range
//!
//! - Input/Output: [0, 1]
//!
//! # Reference
//!
//! IEC 61966-2-1:1999

use std::sync::OnceLock;

/// sRGB EOTF: Decodes sRGB encoded values to linear light.
///
/// # Formula
///
/// ```text
/// if V <= 0.04045:
///     L = V / 12.92
/// else:
///     L = ((V + 0.055) / 1.055)^2.4
/// ```
///
/// # Example
///
/// ```rust
/// use visim_transfer::srgb::eotf;
///
/// let linear = eotf(0.5);
/// assert!((linear - 0.214).abs() < 0.01);
/// ```
#[inline]
pub fn eotf(v: f32) -> f32 {
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// sRGB OETF: Encodes linear light to sRGB.
///
/// # Formula
///
/// ```text
/// if L <= 0.0031308:
///     V = L * 12.92
/// else:
///     V = 1.055 * L^(1/2.4) - 0.055
/// ```
#[inline]
pub fn oetf(l: f32) -> f32 {
    if l <= 0.0031308 {
        l * 12.92
    } else {
        1.055 * l.powf(1.0 / 2.4) - 0.055
    }
}

fn decode_table() -> &'static [f32; 256] {
    static TABLE: OnceLock<[f32; 256]> = OnceLock::new();
    TABLE.get_or_init(|| std::array::from_fn(|i| eotf(i as f32 / 255.0)))
}

/// Decodes an 8-bit sRGB code value to linear `[0, 1]`.
///
/// Backed by a 256-entry table built on first use.
#[inline]
pub fn srgb_byte_to_linear(byte: u8) -> f32 {
    decode_table()[byte as usize]
}

/// Encodes linear light to an 8-bit sRGB code value.
///
/// Input is clamped to `[0, 1]` (NaN maps to 0) before encoding; the result
/// is rounded to the nearest integer.
///
/// # Example
///
/// ```rust
/// use visim_transfer::srgb::linear_to_srgb_byte;
///
/// assert_eq!(linear_to_srgb_byte(1.0), 255);
/// assert_eq!(linear_to_srgb_byte(-0.2), 0);
/// assert_eq!(linear_to_srgb_byte(7.0), 255);
/// ```
#[inline]
pub fn linear_to_srgb_byte(linear: f32) -> u8 {
    let l = if linear.is_nan() { 0.0 } else { linear.clamp(0.0, 1.0) };
    (oetf(l) * 255.0).round() as u8
}
