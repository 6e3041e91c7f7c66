//! Infant-vision simulation.
//!
//! An infant's optics and retina blur each opponent channel by a different,
//! age-dependent amount. The age table gives one blur coefficient per
//! opponent channel in degrees of visual angle; the viewing geometry turns
//! degrees into pixels.
//!
//! Pipeline per image:
//!
//! ```text
//! RGBA bytes -> (v-128)/128 -> INFANT_RGB_TO_LMS -> LMS_TO_OPP -> 3 planes
//!     -> blur_plane(sigma_c) each -> opponent -> LMS -> RGB -> bytes (+ alpha)
//! ```
//!
//! # Example
//!
//! ```rust
//! use visim_core::RgbaImage;
//! use visim_ops::infant::{simulate_infant_vision, AgePreset};
//!
//! let gray = RgbaImage::filled(4, 4, [128, 128, 128, 255]);
//! let out = simulate_infant_vision(&gray, AgePreset::Week0, 50.0, 50.0).unwrap();
//! assert_eq!(out, gray);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use visim_color::ConeModel;
use visim_color::convert::{normalized_to_rgba, rgba_to_normalized};
use visim_core::{Error, RgbBuffer, RgbaImage};

use crate::OpsResult;
use crate::filter::{ChannelTreatment, blur_plane};
use crate::parallel::map_pixels;

/// Smallest field of view, in degrees, used as a divisor.
const MIN_FOV_DEGREES: f64 = 1e-12;

/// Developmental stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgePreset {
    /// Newborn.
    Week0,
    /// One month.
    Week4,
    /// Two months.
    Week8,
    /// Three months.
    Week12,
    /// Six months.
    Week24,
    /// Adult reference.
    Adult,
}

impl AgePreset {
    /// All presets, youngest first.
    pub const ALL: [Self; 6] = [
        Self::Week0,
        Self::Week4,
        Self::Week8,
        Self::Week12,
        Self::Week24,
        Self::Adult,
    ];

    /// Preset name as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Week0 => "week0",
            Self::Week4 => "week4",
            Self::Week8 => "week8",
            Self::Week12 => "week12",
            Self::Week24 => "week24",
            Self::Adult => "adult",
        }
    }

    /// Blur coefficients (degrees) for the luminance, red-green and
    /// blue-yellow channels.
    pub fn coefficients(self) -> [f64; 3] {
        match self {
            Self::Week0 => [0.6821, 100.0, 1000.0],
            Self::Week4 => [0.48, 4.77, 100.0],
            Self::Week8 => [0.24, 2.4, 4.0],
            Self::Week12 => [0.1, 0.53, 2.0],
            Self::Week24 => [0.04, 0.12, 1.0],
            Self::Adult => [0.01, 0.015, 0.02],
        }
    }
}

impl fmt::Display for AgePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AgePreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|a| a.name() == key)
            .ok_or_else(|| Error::UnknownAgePreset(s.to_string()))
    }
}

/// Physical display size and viewing distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewingGeometry {
    /// Width of the displayed image, cm.
    pub display_width_cm: f64,
    /// Eye-to-screen distance, cm.
    pub view_dist_cm: f64,
}

impl Default for ViewingGeometry {
    fn default() -> Self {
        Self {
            display_width_cm: 50.0,
            view_dist_cm: 60.0,
        }
    }
}

impl ViewingGeometry {
    /// Creates a geometry.
    pub fn new(display_width_cm: f64, view_dist_cm: f64) -> Self {
        Self {
            display_width_cm,
            view_dist_cm,
        }
    }

    /// Both lengths must be finite and positive.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` naming the bad length.
    pub fn validate(&self) -> visim_core::Result<()> {
        for (name, v) in [
            ("display_width_cm", self.display_width_cm),
            ("view_dist_cm", self.view_dist_cm),
        ] {
            if !(v.is_finite() && v > 0.0) {
                return Err(Error::invalid_parameter(format!(
                    "{name} must be finite and positive, got {v}"
                )));
            }
        }
        Ok(())
    }

    /// Horizontal field of view in degrees.
    pub fn field_of_view_deg(&self) -> f64 {
        2.0 * (self.display_width_cm / 2.0 / self.view_dist_cm).atan().to_degrees()
    }

    /// Pixels per degree for an image `width_px` wide.
    pub fn pixels_per_degree(&self, width_px: u32) -> f64 {
        let fov = self.field_of_view_deg();
        let fov = if fov.abs() < MIN_FOV_DEGREES {
            MIN_FOV_DEGREES
        } else {
            fov
        };
        width_px as f64 / fov
    }
}

/// Pixels per degree for an image `width_px` wide shown `display_width_cm`
/// wide at `view_dist_cm`.
///
/// ```rust
/// use visim_ops::infant::pixels_per_degree;
///
/// // 50 cm at 50 cm spans 2 * atan(0.5) = 53.13 degrees
/// let ppd = pixels_per_degree(512, 50.0, 50.0);
/// assert!((ppd - 9.637).abs() < 1e-3);
/// ```
pub fn pixels_per_degree(width_px: u32, display_width_cm: f64, view_dist_cm: f64) -> f64 {
    ViewingGeometry::new(display_width_cm, view_dist_cm).pixels_per_degree(width_px)
}

/// What [`InfantVision::simulate`] would do to an image, without doing it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BlurPlan {
    /// Age preset.
    pub age: AgePreset,
    /// Pixels per degree.
    pub pixels_per_degree: f64,
    /// Sigma in pixels per opponent channel.
    pub sigmas: [f64; 3],
    /// Treatment per opponent channel.
    pub treatments: [ChannelTreatment; 3],
}

/// Infant-vision simulator for one age and viewing geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InfantVision {
    age: AgePreset,
    geometry: ViewingGeometry,
}

impl InfantVision {
    /// Creates a simulator.
    pub fn new(age: AgePreset, geometry: ViewingGeometry) -> Self {
        Self { age, geometry }
    }

    /// Age preset.
    pub fn age(&self) -> AgePreset {
        self.age
    }

    /// Viewing geometry.
    pub fn geometry(&self) -> &ViewingGeometry {
        &self.geometry
    }

    /// Computes sigmas and per-channel treatments for a `width x height` image.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` for bad geometry, `EmptyImage` for zero size.
    pub fn plan(&self, width: u32, height: u32) -> OpsResult<BlurPlan> {
        self.geometry.validate()?;
        if width == 0 || height == 0 {
            return Err(Error::empty_image(width, height).into());
        }
        let ppd = self.geometry.pixels_per_degree(width);
        let sigmas = self.age.coefficients().map(|c| c * ppd);
        let treatments =
            sigmas.map(|s| ChannelTreatment::for_sigma(s, width as usize, height as usize));
        debug!(
            age = %self.age,
            ppd,
            sigmas = ?sigmas,
            treatments = ?treatments,
            "infant vision plan"
        );
        Ok(BlurPlan {
            age: self.age,
            pixels_per_degree: ppd,
            sigmas,
            treatments,
        })
    }

    /// Blurs a square RGBA image. Alpha is copied through.
    ///
    /// # Errors
    ///
    /// `EmptyImage`, `NonSquareImage`, or `InvalidParameter` for bad
    /// geometry.
    pub fn simulate(&self, img: &RgbaImage) -> OpsResult<RgbaImage> {
        trace!(
            width = img.width(),
            height = img.height(),
            age = %self.age,
            geometry = ?self.geometry,
            "simulate_infant_vision"
        );
        if img.is_empty() {
            return Err(Error::empty_image(img.width(), img.height()).into());
        }
        if !img.is_square() {
            return Err(Error::NonSquareImage {
                width: img.width(),
                height: img.height(),
            }
            .into());
        }
        let plan = self.plan(img.width(), img.height())?;
        let (w, h) = (img.width() as usize, img.height() as usize);

        let model = ConeModel::Infant;
        let to_opp = model.rgb_to_opponent();
        let opp = map_pixels(&rgba_to_normalized(img), |v| to_opp * v);

        let planes = split_planes(&opp);
        let mut blurred = Vec::with_capacity(3);
        for (plane, sigma) in planes.iter().zip(plan.sigmas) {
            blurred.push(blur_plane(plane, w, h, sigma)?);
        }

        let merged = merge_planes(&blurred, img.width(), img.height())?;
        let to_rgb = model.opponent_to_rgb();
        let rgb = map_pixels(&merged, |o| to_rgb * o);
        Ok(normalized_to_rgba(&rgb, &img.alpha())?)
    }
}

fn split_planes(buf: &RgbBuffer) -> [Vec<f32>; 3] {
    let n = buf.pixel_count();
    let mut planes = [
        Vec::with_capacity(n),
        Vec::with_capacity(n),
        Vec::with_capacity(n),
    ];
    for px in buf.pixels() {
        for (plane, v) in planes.iter_mut().zip(px) {
            plane.push(v);
        }
    }
    planes
}

fn merge_planes(planes: &[Vec<f32>], width: u32, height: u32) -> visim_core::Result<RgbBuffer> {
    let n = width as usize * height as usize;
    let mut data = Vec::with_capacity(n * 3);
    for i in 0..n {
        data.extend(planes.iter().map(|p| p[i]));
    }
    RgbBuffer::from_data(width, height, data)
}

/// Simulates infant vision on a square RGBA image.
///
/// # Errors
///
/// `EmptyImage`, `NonSquareImage`, or `InvalidParameter` for non-finite or
/// non-positive lengths.
pub fn simulate_infant_vision(
    img: &RgbaImage,
    age: AgePreset,
    display_width_cm: f64,
    view_dist_cm: f64,
) -> OpsResult<RgbaImage> {
    InfantVision::new(age, ViewingGeometry::new(display_width_cm, view_dist_cm)).simulate(img)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn pattern(size: u32) -> RgbaImage {
        let mut img = RgbaImage::new(size, size);
        for y in 0..size {
            for x in 0..size {
                let i = (y * size + x) as usize;
                let v = ((x * 37 + y * 91) % 256) as u8;
                img.set_pixel(i, [v, 255 - v, (x * 8 % 256) as u8, (y % 256) as u8]);
            }
        }
        img
    }

    #[test]
    fn test_parse_presets() {
        for age in AgePreset::ALL {
            assert_eq!(age.name().parse::<AgePreset>().unwrap(), age);
        }
        assert_eq!(
            "week3".parse::<AgePreset>().unwrap_err(),
            Error::UnknownAgePreset("week3".into())
        );
    }

    #[test]
    fn test_pixels_per_degree() {
        // 2 * atan(0.5) = 53.130 degrees
        assert_abs_diff_eq!(pixels_per_degree(512, 50.0, 50.0), 512.0 / 53.130_102_354, epsilon = 1e-6);
        let g = ViewingGeometry::new(10.0, 1000.0);
        assert_abs_diff_eq!(g.pixels_per_degree(64), 111.702, epsilon = 1e-3);
    }

    #[test]
    fn test_geometry_validation() {
        let img = RgbaImage::filled(4, 4, [1, 2, 3, 4]);
        for (w, d) in [(0.0, 50.0), (50.0, -1.0), (f64::NAN, 50.0), (50.0, f64::INFINITY)] {
            let err = simulate_infant_vision(&img, AgePreset::Week4, w, d).unwrap_err();
            assert!(matches!(err.as_core(), Some(Error::InvalidParameter(_))), "{w} {d}");
        }
    }

    #[test]
    fn test_plan_mixed_treatments() {
        let plan = InfantVision::new(AgePreset::Week12, ViewingGeometry::new(50.0, 60.0))
            .plan(256, 256)
            .unwrap();
        assert_abs_diff_eq!(plan.pixels_per_degree, 5.6587, epsilon = 1e-4);
        assert_eq!(
            plan.treatments,
            [
                ChannelTreatment::Gaussian { radius: 2 },
                ChannelTreatment::Gaussian { radius: 9 },
                ChannelTreatment::Gaussian { radius: 34 },
            ]
        );
    }

    #[test]
    fn test_plan_rejects_empty() {
        let v = InfantVision::new(AgePreset::Adult, ViewingGeometry::default());
        assert!(v.plan(0, 0).is_err());
    }

    #[test]
    fn test_mid_gray_week0_unchanged() {
        let gray = RgbaImage::filled(4, 4, [128, 128, 128, 255]);
        let out = simulate_infant_vision(&gray, AgePreset::Week0, 50.0, 50.0).unwrap();
        assert_eq!(out, gray);
    }

    #[test]
    fn test_non_square_rejected() {
        let img = RgbaImage::new(6, 4);
        let err = simulate_infant_vision(&img, AgePreset::Week8, 50.0, 60.0).unwrap_err();
        assert!(matches!(
            err.as_core(),
            Some(Error::NonSquareImage { width: 6, height: 4 })
        ));
        // caller-side retry on the centred square
        assert!(simulate_infant_vision(&img.center_square_crop(), AgePreset::Week8, 50.0, 60.0).is_ok());
    }

    #[test]
    fn test_empty_rejected() {
        let err = simulate_infant_vision(&RgbaImage::new(0, 0), AgePreset::Adult, 50.0, 60.0).unwrap_err();
        assert!(matches!(err.as_core(), Some(Error::EmptyImage { .. })));
    }

    #[test]
    fn test_adult_passthrough() {
        let img = pattern(8);
        let plan = InfantVision::new(AgePreset::Adult, ViewingGeometry::new(50.0, 10.0))
            .plan(8, 8)
            .unwrap();
        assert_eq!(plan.treatments, [ChannelTreatment::PassThrough; 3]);

        let out = simulate_infant_vision(&img, AgePreset::Adult, 50.0, 10.0).unwrap();
        for (a, b) in img.pixels().zip(out.pixels()) {
            for c in 0..3 {
                assert!((a[c] as i32 - b[c] as i32).abs() <= 1, "{a:?} vs {b:?}");
            }
            assert_eq!(a[3], b[3]);
        }
    }

    #[test]
    fn test_huge_blur_flattens_to_mean() {
        let img = pattern(64);
        let plan = InfantVision::new(AgePreset::Week0, ViewingGeometry::new(10.0, 1000.0))
            .plan(64, 64)
            .unwrap();
        assert_eq!(plan.treatments, [ChannelTreatment::Flatten; 3]);

        let out = simulate_infant_vision(&img, AgePreset::Week0, 10.0, 1000.0).unwrap();
        let first = out.pixel(0);
        let n = img.pixel_count() as f64;
        for c in 0..3 {
            let mean = img.pixels().map(|p| p[c] as f64).sum::<f64>() / n;
            assert!((first[c] as f64 - mean).abs() <= 1.0, "channel {c}: {} vs {mean}", first[c]);
        }
        for (i, (src, px)) in img.pixels().zip(out.pixels()).enumerate() {
            assert_eq!(px[..3], first[..3], "pixel {i}");
            assert_eq!(px[3], src[3]);
        }
    }

    #[test]
    fn test_blur_reduces_contrast() {
        let img = pattern(32);
        let out = simulate_infant_vision(&img, AgePreset::Week4, 50.0, 60.0).unwrap();
        let spread = |im: &RgbaImage| {
            let g: Vec<u8> = im.pixels().map(|p| p[1]).collect();
            g.iter().max().copied().unwrap_or(0) as i32 - g.iter().min().copied().unwrap_or(0) as i32
        };
        assert!(spread(&out) < spread(&img));
        assert_eq!(out.alpha(), img.alpha());
    }
}
