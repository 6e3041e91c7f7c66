//! Byte <-> `[-1, 1]` normalisation used by the infant-vision blur.
//!
//! ```text
//! n = (v - 128) / 128
//! v = clamp(round(n * 128 + 128), 0, 255)
//! ```
//!
//! No gamma is involved: the blur operates on display-encoded values.

/// Maps a byte to `[-1, 0.9921875]`.
#[inline]
pub fn byte_to_normalized(v: u8) -> f32 {
    (v as f32 - 128.0) / 128.0
}

/// Maps a normalised value back to a byte, rounding and saturating.
///
/// # Example
///
/// ```rust
/// use visim_transfer::normalized::normalized_to_byte;
///
/// assert_eq!(normalized_to_byte(-1.0), 0);
/// assert_eq!(normalized_to_byte(1.0), 255);
/// assert_eq!(normalized_to_byte(0.5), 192);
/// ```
#[inline]
pub fn normalized_to_byte(n: f32) -> u8 {
    if n.is_nan() {
        return 128;
    }
    (n * 128.0 + 128.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_byte_roundtrips() {
        for b in 0..=255u8 {
            assert_eq!(normalized_to_byte(byte_to_normalized(b)), b);
        }
    }

    #[test]
    fn test_mid_gray_is_zero() {
        assert_eq!(byte_to_normalized(128), 0.0);
        assert_eq!(byte_to_normalized(0), -1.0);
    }

    #[test]
    fn test_out_of_range_clamps() {
        assert_eq!(normalized_to_byte(3.0), 255);
        assert_eq!(normalized_to_byte(-3.0), 0);
        assert_eq!(normalized_to_byte(f32::NAN), 128);
    }
}
