//! Fixed color-basis matrices.
//!
//! Two independent RGB <-> LMS pairs are in use and they are not
//! interchangeable:
//!
//! - the **dichromacy** pair, used by the dichromacy simulator and the
//!   Daltonize corrector on linear `[0, 1]` RGB;
//! - the **infant** pair, used by the infant-vision blur on `[-1, 1]`
//!   normalised RGB.
//!
//! Both share [`LMS_TO_OPP`]. Its inverse is computed, not tabulated, and
//! cached on first use.

use std::sync::OnceLock;

use visim_core::Error;
use visim_math::{Mat3, Vec3};

use crate::{ColorError, ColorResult};

/// Linear RGB -> LMS for dichromacy simulation.
#[rustfmt::skip]
pub const DICHROMACY_RGB_TO_LMS: Mat3 = Mat3::from_flat([
    0.31399022, 0.63951294, 0.04649755,
    0.15537241, 0.75789446, 0.08670142,
    0.01775239, 0.10944209, 0.87256922,
]);

/// LMS -> linear RGB for dichromacy simulation.
#[rustfmt::skip]
pub const DICHROMACY_LMS_TO_RGB: Mat3 = Mat3::from_flat([
    5.47221206, -4.6419601, 0.16963708,
    -1.1252419, 2.29317094, -0.1678952,
    0.02980165, -0.19318073, 1.16364789,
]);

/// Normalised RGB -> LMS for infant vision.
#[rustfmt::skip]
pub const INFANT_RGB_TO_LMS: Mat3 = Mat3::from_flat([
    0.05059983, 0.08585369, 0.00952420,
    0.01893033, 0.08925308, 0.01370054,
    0.00292202, 0.00975732, 0.07145979,
]);

/// LMS -> normalised RGB for infant vision.
#[rustfmt::skip]
pub const INFANT_LMS_TO_RGB: Mat3 = Mat3::from_flat([
    30.83086094, -29.83266362, 1.61047654,
    -6.48147088, 17.71557918, -2.53264355,
    -0.37568830, -1.19906503, 14.27384504,
]);

/// LMS -> opponent (luminance, red-green, blue-yellow).
#[rustfmt::skip]
pub const LMS_TO_OPP: Mat3 = Mat3::from_flat([
    0.5, 0.5, 0.0,
    -0.669, 0.742, -0.027,
    -0.212, -0.354, 0.911,
]);

static OPP_TO_LMS: OnceLock<Result<Mat3, Error>> = OnceLock::new();

/// Inverse of [`LMS_TO_OPP`], computed once.
///
/// # Errors
///
/// Returns [`ColorError::MatrixError`] if [`LMS_TO_OPP`] is singular.
pub fn try_opponent_to_lms() -> ColorResult<Mat3> {
    OPP_TO_LMS
        .get_or_init(|| LMS_TO_OPP.inverse())
        .clone()
        .map_err(|source| ColorError::MatrixError {
            name: "LMS_TO_OPP",
            source,
        })
}

/// Inverse of [`LMS_TO_OPP`], computed once.
///
/// # Panics
///
/// Panics if [`LMS_TO_OPP`] is singular. The matrix is a compile-time
/// constant, so this can only fire after an edit to the table.
pub fn opponent_to_lms() -> Mat3 {
    match try_opponent_to_lms() {
        Ok(m) => m,
        Err(e) => panic!("fixed opponent matrix is not invertible: {e}"),
    }
}

/// LMS response of the dichromacy model to RGB `(1, 1, 1)`.
///
/// This is the equal-energy white the confusion planes pass through.
#[inline]
pub fn white_point() -> Vec3 {
    DICHROMACY_RGB_TO_LMS.row_sums()
}

/// Which RGB <-> LMS pair a pipeline uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConeModel {
    /// Linear `[0, 1]` RGB; dichromacy and Daltonize.
    Dichromacy,
    /// Normalised `[-1, 1]` RGB; infant vision.
    Infant,
}

impl ConeModel {
    /// RGB -> LMS matrix.
    #[inline]
    pub fn rgb_to_lms(self) -> &'static Mat3 {
        match self {
            Self::Dichromacy => &DICHROMACY_RGB_TO_LMS,
            Self::Infant => &INFANT_RGB_TO_LMS,
        }
    }

    /// LMS -> RGB matrix.
    #[inline]
    pub fn lms_to_rgb(self) -> &'static Mat3 {
        match self {
            Self::Dichromacy => &DICHROMACY_LMS_TO_RGB,
            Self::Infant => &INFANT_LMS_TO_RGB,
        }
    }

    /// RGB -> opponent, i.e. `LMS_TO_OPP * rgb_to_lms`.
    #[inline]
    pub fn rgb_to_opponent(self) -> Mat3 {
        LMS_TO_OPP * *self.rgb_to_lms()
    }

    /// Opponent -> RGB, i.e. `lms_to_rgb * opponent_to_lms`.
    #[inline]
    pub fn opponent_to_rgb(self) -> Mat3 {
        *self.lms_to_rgb() * opponent_to_lms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_dichromacy_pair_is_inverse() {
        let p = DICHROMACY_LMS_TO_RGB * DICHROMACY_RGB_TO_LMS;
        assert!(p.max_abs_diff(&Mat3::IDENTITY) < 1e-6);
    }

    #[test]
    fn test_infant_pair_is_inverse() {
        let p = INFANT_LMS_TO_RGB * INFANT_RGB_TO_LMS;
        assert!(p.max_abs_diff(&Mat3::IDENTITY) < 1e-6);
    }

    #[test]
    fn test_opponent_inverse_is_cached_and_exact() {
        let inv = try_opponent_to_lms().unwrap();
        assert_eq!(inv, opponent_to_lms());
        assert!((inv * LMS_TO_OPP).max_abs_diff(&Mat3::IDENTITY) < 1e-12);
        assert!((LMS_TO_OPP * inv).max_abs_diff(&Mat3::IDENTITY) < 1e-12);
    }

    #[test]
    fn test_white_point() {
        let e = white_point();
        assert_abs_diff_eq!(e.x, 1.0000007, epsilon = 1e-9);
        assert_abs_diff_eq!(e.y, 0.99996829, epsilon = 1e-9);
        assert_abs_diff_eq!(e.z, 0.9997637, epsilon = 1e-9);
    }

    #[test]
    fn test_cone_model_composites() {
        let rgb = Vec3::new(0.2, 0.5, 0.9);
        for model in [ConeModel::Dichromacy, ConeModel::Infant] {
            let opp = model.rgb_to_opponent() * rgb;
            let back = model.opponent_to_rgb() * opp;
            assert!((back - rgb).abs().max_element() < 1e-6);
        }
    }
}
