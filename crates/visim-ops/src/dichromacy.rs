//! Dichromacy simulation (Brettel, Vienot & Mollon 1997).
//!
//! A dichromat confuses every color lying on a line parallel to the missing
//! cone's axis in LMS space. The model collapses each color onto a surface
//! made of two half-planes. Both pass through black and the equal-energy
//! white `E`; each also contains one spectral anchor:
//!
//! | Deficiency | Rewrites | Wing 1 anchor | Wing 2 anchor | Ratio tested |
//! |------------|----------|---------------|---------------|--------------|
//! | protanope | L | 575 nm | 475 nm | S/M |
//! | deuteranope | M | 575 nm | 475 nm | S/L |
//! | tritanope | S | 660 nm | 485 nm | M/L |
//!
//! A pixel uses wing 1 when its ratio is below the white point's, wing 2
//! otherwise. The plane normal of each wing is `E x anchor`; the missing
//! channel is solved from the plane equation with the other two held fixed.
//!
//! # Example
//!
//! ```rust
//! use visim_ops::dichromacy::{Dichromat, Wing};
//! use visim_ops::DeficiencyType;
//! use visim_math::Vec3;
//!
//! let d = Dichromat::new(DeficiencyType::Deuteranope);
//! let p = d.project(Vec3::new(0.31, 0.16, 0.02));
//! assert_eq!(p.wing, Wing::First);
//! assert_eq!(p.lms.x, 0.31);
//! assert_eq!(p.lms.z, 0.02);
//! ```

use tracing::trace;
use visim_color::ConeModel;
use visim_color::white_point;
use visim_core::RgbBuffer;
use visim_math::Vec3;

use crate::parallel::map_pixels;
use crate::{DeficiencyType, OpsResult};

/// LMS of the 475 nm spectral anchor.
pub const ANCHOR_475: Vec3 = Vec3::new(0.08008, 0.1579, 0.5897);
/// LMS of the 485 nm spectral anchor.
pub const ANCHOR_485: Vec3 = Vec3::new(0.1284, 0.2237, 0.3636);
/// LMS of the 575 nm spectral anchor.
pub const ANCHOR_575: Vec3 = Vec3::new(0.9856, 0.7325, 0.001079);
/// LMS of the 660 nm spectral anchor.
pub const ANCHOR_660: Vec3 = Vec3::new(0.0914, 0.007009, 0.0);

/// Smallest magnitude allowed for a divisor.
pub const MIN_DENOMINATOR: f64 = 1e-12;

#[inline]
fn guard(d: f64) -> f64 {
    if d.abs() < MIN_DENOMINATOR {
        MIN_DENOMINATOR.copysign(d)
    } else {
        d
    }
}

/// Which half-plane a color was projected onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wing {
    /// No projection (normal vision).
    Identity,
    /// Ratio below the white point's.
    First,
    /// Ratio at or above the white point's.
    Second,
}

/// Result of projecting one LMS triplet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Perceived LMS.
    pub lms: Vec3,
    /// Wing used.
    pub wing: Wing,
}

/// Precomputed confusion surface for one deficiency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dichromat {
    kind: DeficiencyType,
    normals: [Vec3; 2],
    inflection: f64,
}

impl Dichromat {
    /// Builds the two plane normals and the inflection ratio for `kind`.
    pub fn new(kind: DeficiencyType) -> Self {
        let e = white_point();
        let (anchors, inflection) = match kind {
            DeficiencyType::Normal => ([Vec3::ZERO, Vec3::ZERO], 0.0),
            DeficiencyType::Protanope => ([ANCHOR_575, ANCHOR_475], e.z / e.y),
            DeficiencyType::Deuteranope => ([ANCHOR_575, ANCHOR_475], e.z / e.x),
            DeficiencyType::Tritanope => ([ANCHOR_660, ANCHOR_485], e.y / e.x),
        };
        Self {
            kind,
            normals: [e.cross(anchors[0]), e.cross(anchors[1])],
            inflection,
        }
    }

    /// Deficiency this projector simulates.
    #[inline]
    pub fn kind(&self) -> DeficiencyType {
        self.kind
    }

    /// White-point ratio separating the two wings.
    #[inline]
    pub fn inflection(&self) -> f64 {
        self.inflection
    }

    /// Normal `(a, b, c)` of the given wing's plane.
    pub fn plane_normal(&self, wing: Wing) -> Option<Vec3> {
        match (self.kind, wing) {
            (DeficiencyType::Normal, _) | (_, Wing::Identity) => None,
            (_, Wing::First) => Some(self.normals[0]),
            (_, Wing::Second) => Some(self.normals[1]),
        }
    }

    /// Projects one LMS triplet onto the confusion surface.
    ///
    /// Only the missing channel changes; the other two are returned
    /// bit-for-bit.
    pub fn project(&self, lms: Vec3) -> Projection {
        let Vec3 { x: l, y: m, z: s } = lms;
        let ratio = match self.kind {
            DeficiencyType::Normal => {
                return Projection {
                    lms,
                    wing: Wing::Identity,
                };
            }
            DeficiencyType::Protanope => s / guard(m),
            DeficiencyType::Deuteranope => s / guard(l),
            DeficiencyType::Tritanope => m / guard(l),
        };
        let (wing, n) = if ratio < self.inflection {
            (Wing::First, self.normals[0])
        } else {
            (Wing::Second, self.normals[1])
        };

        let out = match self.kind {
            DeficiencyType::Protanope => Vec3::new(-(n.y * m + n.z * s) / guard(n.x), m, s),
            DeficiencyType::Deuteranope => Vec3::new(l, -(n.x * l + n.z * s) / guard(n.y), s),
            _ => Vec3::new(l, m, -(n.x * l + n.y * m) / guard(n.z)),
        };
        Projection { lms: out, wing }
    }
}

/// Projects a buffer that is already in LMS.
///
/// # Errors
///
/// Returns `EmptyImage` if the buffer has no pixels.
pub fn simulate_lms(lms: &RgbBuffer, kind: DeficiencyType) -> OpsResult<RgbBuffer> {
    trace!(width = lms.width(), height = lms.height(), %kind, "simulate_lms");
    lms.ensure_non_empty()?;
    if kind == DeficiencyType::Normal {
        return Ok(lms.clone());
    }
    let d = Dichromat::new(kind);
    Ok(map_pixels(lms, |v| d.project(v).lms))
}

/// Simulates how a dichromat perceives a linear-RGB buffer.
///
/// Each pixel goes RGB -> LMS, is projected, and comes back to linear RGB.
/// `Normal` returns a copy of the input. The output is not clamped.
///
/// # Errors
///
/// Returns `EmptyImage` if the buffer has no pixels.
///
/// # Example
///
/// ```rust
/// use visim_core::RgbBuffer;
/// use visim_ops::{simulate_deficiency, DeficiencyType};
///
/// let gray = RgbBuffer::filled(4, 4, [0.5, 0.5, 0.5]);
/// let seen = simulate_deficiency(&gray, DeficiencyType::Protanope).unwrap();
/// assert!(seen.max_abs_diff(&gray) < 1e-3);
/// ```
pub fn simulate_deficiency(rgb: &RgbBuffer, kind: DeficiencyType) -> OpsResult<RgbBuffer> {
    trace!(width = rgb.width(), height = rgb.height(), %kind, "simulate_deficiency");
    rgb.ensure_non_empty()?;
    if kind == DeficiencyType::Normal {
        return Ok(rgb.clone());
    }
    let d = Dichromat::new(kind);
    let model = ConeModel::Dichromacy;
    let to_lms = *model.rgb_to_lms();
    let to_rgb = *model.lms_to_rgb();
    Ok(map_pixels(rgb, |v| to_rgb * d.project(to_lms * v).lms))
}
