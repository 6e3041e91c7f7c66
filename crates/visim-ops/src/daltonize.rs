//! Daltonize correction driven by opponent-space statistics.
//!
//! The correction runs in two passes over the image:
//!
//! 1. **Statistics.** Every pixel goes linear RGB -> LMS -> opponent
//!    `(o0, o1, o2)` = (luminance, red-green, blue-yellow). Per-channel mean
//!    and variance are accumulated in `f64`, row by row, and the row
//!    partials are reduced pairwise in row order.
//! 2. **Apply.** With `c = o1 - mean1`:
//!
//! ```text
//! o0' = o0 + amount_to_lm * c
//! o1' = lm_scale * c + mean1
//! o2' = o2 + amount_to_s  * c
//! ```
//!
//! The coefficients come from the user strengths and the measured standard
//! deviations:
//!
//! ```text
//! amount_to_lm = clamp(-gain * luminance_gain   * lum_scale * sd0 / max(sd1, std_floor), +-max_projection)
//! amount_to_s  = clamp(-gain * blue_yellow_gain * s_scale   * sd2 / max(sd1, std_floor), +-max_projection)
//! lm_scale     = 1 + lm_stretch_gain * lm_stretch
//! ```
//!
//! # Example
//!
//! ```rust
//! use visim_core::RgbBuffer;
//! use visim_ops::{daltonize_correct, DaltonizeParams};
//!
//! let img = RgbBuffer::from_fn(8, 8, |x, _| if x < 4 { [0.8, 0.2, 0.1] } else { [0.2, 0.7, 0.1] });
//! let out = daltonize_correct(&img, &DaltonizeParams::default()).unwrap();
//! assert_eq!(out.dimensions(), (8, 8));
//! ```

use std::ops::Add;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use visim_color::ConeModel;
use visim_core::{Error, RgbBuffer};
use visim_math::{Mat3, Vec3};

use crate::parallel::{map_pixels, map_rows, pairwise_sum};
use crate::{DeficiencyType, OpsResult, simulate_deficiency};

/// User-facing strengths, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaltonizeParams {
    /// Stretch of the red-green channel around its mean.
    pub lm_stretch: f64,
    /// Red-green contrast injected into luminance.
    pub lum_scale: f64,
    /// Red-green contrast injected into blue-yellow.
    pub s_scale: f64,
}

impl Default for DaltonizeParams {
    fn default() -> Self {
        Self {
            lm_stretch: 0.5,
            lum_scale: 0.5,
            s_scale: 0.5,
        }
    }
}

impl DaltonizeParams {
    /// All strengths zero; the correction is then the identity.
    pub const ZERO: Self = Self {
        lm_stretch: 0.0,
        lum_scale: 0.0,
        s_scale: 0.0,
    };

    /// Creates params from `[0, 1]` strengths.
    pub fn new(lm_stretch: f64, lum_scale: f64, s_scale: f64) -> Self {
        Self {
            lm_stretch,
            lum_scale,
            s_scale,
        }
    }

    /// Creates params from slider values in `[0, 100]`.
    ///
    /// ```rust
    /// use visim_ops::DaltonizeParams;
    ///
    /// let p = DaltonizeParams::from_percent(50.0, 100.0, 0.0);
    /// assert_eq!(p, DaltonizeParams::new(0.5, 1.0, 0.0));
    /// ```
    pub fn from_percent(lm_stretch: f64, lum_scale: f64, s_scale: f64) -> Self {
        Self::new(lm_stretch / 100.0, lum_scale / 100.0, s_scale / 100.0)
    }

    /// Checks every strength is finite and within `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` naming the offending knob.
    pub fn validate(&self) -> visim_core::Result<()> {
        for (name, v) in [
            ("lm_stretch", self.lm_stretch),
            ("lum_scale", self.lum_scale),
            ("s_scale", self.s_scale),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(Error::invalid_parameter(format!(
                    "{name} must be within [0, 1], got {v}"
                )));
            }
        }
        Ok(())
    }
}

/// Empirical constants of the correction.
///
/// These are tuning values, not derived quantities; override them through
/// settings rather than editing the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaltonizeTuning {
    /// Overall gain on both projections.
    pub gain: f64,
    /// Extra gain on the luminance projection.
    pub luminance_gain: f64,
    /// Extra gain on the blue-yellow projection.
    pub blue_yellow_gain: f64,
    /// Red-green stretch per unit of `lm_stretch`.
    pub lm_stretch_gain: f64,
    /// Bound on `|amount_to_lm|` and `|amount_to_s|`.
    pub max_projection: f64,
    /// Floor on the red-green standard deviation used as a divisor.
    pub std_floor: f64,
}

impl Default for DaltonizeTuning {
    fn default() -> Self {
        Self {
            gain: 1.35,
            luminance_gain: 1.15,
            blue_yellow_gain: 0.9,
            lm_stretch_gain: 0.5,
            max_projection: 3.5,
            std_floor: 1e-6,
        }
    }
}

impl DaltonizeTuning {
    /// Checks the constants keep the correction finite.
    ///
    /// Gains must be finite, `max_projection` finite and `>= 0`,
    /// `std_floor` finite and `> 0`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` naming the offending field.
    pub fn validate(&self) -> visim_core::Result<()> {
        for (name, v) in [
            ("gain", self.gain),
            ("luminance_gain", self.luminance_gain),
            ("blue_yellow_gain", self.blue_yellow_gain),
            ("lm_stretch_gain", self.lm_stretch_gain),
        ] {
            if !v.is_finite() {
                return Err(Error::invalid_parameter(format!(
                    "{name} must be finite, got {v}"
                )));
            }
        }
        if !(self.max_projection.is_finite() && self.max_projection >= 0.0) {
            return Err(Error::invalid_parameter(format!(
                "max_projection must be finite and >= 0, got {}",
                self.max_projection
            )));
        }
        if !(self.std_floor.is_finite() && self.std_floor > 0.0) {
            return Err(Error::invalid_parameter(format!(
                "std_floor must be finite and > 0, got {}",
                self.std_floor
            )));
        }
        Ok(())
    }
}

/// Opponent-space mean and variance of an image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpponentStats {
    /// Per-channel mean.
    pub mean: Vec3,
    /// Per-channel variance, clamped to `>= 0`.
    pub variance: Vec3,
    /// Pixels accumulated.
    pub pixel_count: usize,
}

impl OpponentStats {
    /// Per-channel standard deviation.
    #[inline]
    pub fn std_dev(&self) -> Vec3 {
        self.variance.sqrt()
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Moments {
    sum: Vec3,
    sum_sq: Vec3,
}

impl Add for Moments {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            sum: self.sum + rhs.sum,
            sum_sq: self.sum_sq + rhs.sum_sq,
        }
    }
}

/// First pass: opponent mean and variance of a linear-RGB buffer.
///
/// Bit-identical across runs and thread counts.
///
/// # Errors
///
/// Returns `EmptyImage` if the buffer has no pixels.
pub fn opponent_statistics(rgb: &RgbBuffer) -> OpsResult<OpponentStats> {
    rgb.ensure_non_empty()?;
    let to_opp = ConeModel::Dichromacy.rgb_to_opponent();
    let row_len = rgb.row_len();
    let data = rgb.data();

    let rows = map_rows(rgb.height() as usize, |y| {
        data[y * row_len..(y + 1) * row_len]
            .chunks_exact(3)
            .fold(Moments::default(), |acc, px| {
                let o = to_opp * Vec3::from_f32([px[0], px[1], px[2]]);
                Moments {
                    sum: acc.sum + o,
                    sum_sq: acc.sum_sq + o * o,
                }
            })
    });
    let total = pairwise_sum(&rows);

    let n = rgb.pixel_count() as f64;
    let mean = total.sum / n;
    let variance = (total.sum_sq / n - mean * mean).max(Vec3::ZERO);
    Ok(OpponentStats {
        mean,
        variance,
        pixel_count: rgb.pixel_count(),
    })
}

/// Affine map `out = matrix * rgb + offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    /// Linear part.
    pub matrix: Mat3,
    /// Translation.
    pub offset: Vec3,
}

impl AffineTransform {
    /// Applies the transform to one triplet.
    #[inline]
    pub fn apply(&self, v: Vec3) -> Vec3 {
        self.matrix * v + self.offset
    }

    /// Row-major 4x4 homogeneous form, for renderers that take one.
    pub fn to_homogeneous(&self) -> [[f64; 4]; 4] {
        let m = &self.matrix.m;
        let t = self.offset;
        [
            [m[0][0], m[0][1], m[0][2], t.x],
            [m[1][0], m[1][1], m[1][2], t.y],
            [m[2][0], m[2][1], m[2][2], t.z],
            [0.0, 0.0, 0.0, 1.0],
        ]
    }
}

/// Per-image coefficients derived from statistics and strengths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DaltonizeCorrection {
    /// Red-green mean the stretch pivots around.
    pub lm_mean: f64,
    /// Red-green contrast injected into luminance.
    pub amount_to_lm: f64,
    /// Red-green contrast injected into blue-yellow.
    pub amount_to_s: f64,
    /// Red-green stretch factor.
    pub lm_scale: f64,
}

impl DaltonizeCorrection {
    /// Derives the coefficients.
    pub fn new(stats: &OpponentStats, params: &DaltonizeParams, tuning: &DaltonizeTuning) -> Self {
        let sd = stats.std_dev();
        let lm_sd = sd.y.max(tuning.std_floor);
        let bound = tuning.max_projection.abs();

        // clamp() panics on NaN bounds
        let amount_to_lm = (-tuning.gain * tuning.luminance_gain * params.lum_scale * sd.x / lm_sd)
            .max(-bound)
            .min(bound);
        let amount_to_s = (-tuning.gain * tuning.blue_yellow_gain * params.s_scale * sd.z / lm_sd)
            .max(-bound)
            .min(bound);
        let lm_scale = 1.0 + tuning.lm_stretch_gain * params.lm_stretch;

        Self {
            lm_mean: stats.mean.y,
            amount_to_lm,
            amount_to_s,
            lm_scale,
        }
    }

    /// Second-pass update of one opponent triplet.
    #[inline]
    pub fn apply_opponent(&self, o: Vec3) -> Vec3 {
        let c = o.y - self.lm_mean;
        Vec3::new(
            o.x + self.amount_to_lm * c,
            self.lm_scale * c + self.lm_mean,
            o.z + self.amount_to_s * c,
        )
    }

    /// The opponent-space update as an affine map.
    pub fn opponent_affine(&self) -> AffineTransform {
        let m = self.lm_mean;
        AffineTransform {
            matrix: Mat3::from_rows([
                [1.0, self.amount_to_lm, 0.0],
                [0.0, self.lm_scale, 0.0],
                [0.0, self.amount_to_s, 1.0],
            ]),
            offset: Vec3::new(
                -self.amount_to_lm * m,
                (1.0 - self.lm_scale) * m,
                -self.amount_to_s * m,
            ),
        }
    }

    /// The whole correction as an affine map on linear RGB.
    ///
    /// Applying it equals [`Daltonizer::correct`] up to float rounding.
    pub fn to_linear_rgb_affine(&self) -> AffineTransform {
        let model = ConeModel::Dichromacy;
        let inner = self.opponent_affine();
        let back = model.opponent_to_rgb();
        AffineTransform {
            matrix: back * inner.matrix * model.rgb_to_opponent(),
            offset: back * inner.offset,
        }
    }
}

/// Daltonize corrector with explicit tuning.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Daltonizer {
    params: DaltonizeParams,
    tuning: DaltonizeTuning,
}

impl Daltonizer {
    /// Creates a corrector with default tuning.
    pub fn new(params: DaltonizeParams) -> Self {
        Self {
            params,
            tuning: DaltonizeTuning::default(),
        }
    }

    /// Replaces the tuning constants.
    pub fn with_tuning(mut self, tuning: DaltonizeTuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// Strengths in use.
    pub fn params(&self) -> &DaltonizeParams {
        &self.params
    }

    /// Tuning in use.
    pub fn tuning(&self) -> &DaltonizeTuning {
        &self.tuning
    }

    /// Runs the statistics pass and derives the coefficients.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` for out-of-range strengths or tuning, `EmptyImage`
    /// for an empty buffer.
    pub fn analyze(&self, rgb: &RgbBuffer) -> OpsResult<DaltonizeCorrection> {
        self.params.validate()?;
        self.tuning.validate()?;
        let stats = opponent_statistics(rgb)?;
        debug!(
            mean = ?stats.mean.to_array(),
            variance = ?stats.variance.to_array(),
            "daltonize statistics"
        );
        let corr = DaltonizeCorrection::new(&stats, &self.params, &self.tuning);
        debug!(
            amount_to_lm = corr.amount_to_lm,
            amount_to_s = corr.amount_to_s,
            lm_scale = corr.lm_scale,
            "daltonize coefficients"
        );
        Ok(corr)
    }

    /// Corrects a linear-RGB buffer. The output is not clamped.
    ///
    /// # Errors
    ///
    /// See [`analyze`](Self::analyze).
    pub fn correct(&self, rgb: &RgbBuffer) -> OpsResult<RgbBuffer> {
        trace!(width = rgb.width(), height = rgb.height(), params = ?self.params, "daltonize");
        let corr = self.analyze(rgb)?;
        Ok(Self::apply(&corr, rgb))
    }

    /// Second pass only: applies an already derived correction.
    ///
    /// Lets a caller that needs the coefficients run the statistics pass
    /// once through [`analyze`](Self::analyze).
    pub fn apply(corr: &DaltonizeCorrection, rgb: &RgbBuffer) -> RgbBuffer {
        let model = ConeModel::Dichromacy;
        let to_opp = model.rgb_to_opponent();
        let to_rgb = model.opponent_to_rgb();
        map_pixels(rgb, |v| to_rgb * corr.apply_opponent(to_opp * v))
    }
}

/// Corrects a linear-RGB buffer with default tuning.
///
/// # Errors
///
/// `InvalidParameter` for out-of-range strengths, `EmptyImage` for an
/// empty buffer.
pub fn daltonize_correct(rgb: &RgbBuffer, params: &DaltonizeParams) -> OpsResult<RgbBuffer> {
    Daltonizer::new(*params).correct(rgb)
}

/// Corrects a buffer, then simulates how `kind` sees the result.
///
/// Returns `(corrected, corrected_as_seen)`.
///
/// # Errors
///
/// As [`daltonize_correct`].
pub fn daltonize_and_simulate(
    rgb: &RgbBuffer,
    params: &DaltonizeParams,
    kind: DeficiencyType,
) -> OpsResult<(RgbBuffer, RgbBuffer)> {
    let corrected = daltonize_correct(rgb, params)?;
    let seen = simulate_deficiency(&corrected, kind)?;
    Ok((corrected, seen))
}
