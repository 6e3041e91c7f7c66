//! # visim-math
//!
//! Math primitives for the colorimetric pipeline:
//!
//! - [`Mat3`] - 3x3 basis-change matrices (RGB -> LMS, LMS -> Opponent, ...)
//! - [`Vec3`] - color triplets (RGB, LMS, opponent)
//!
//! # Design
//!
//! All matrix operations assume **row-major** storage and **column vectors**:
//!
//! ```text
//! result = matrix * vector
//! ```
//!
//! Arithmetic is done in `f64`. Pixel buffers store `f32`; the transforms
//! widen each triplet on load and narrow it on store, so the fixed matrices
//! keep their published precision and a round trip through two bases loses
//! nothing measurable at `f32` resolution.
//!
//! # Usage
//!
//! ```rust
//! use visim_math::{Mat3, Vec3};
//!
//! let m = Mat3::from_flat([
//!     0.5, 0.5, 0.0,
//!     -0.669, 0.742, -0.027,
//!     -0.212, -0.354, 0.911,
//! ]);
//! let inv = m.inverse().unwrap();
//! let v = Vec3::new(0.2, 0.4, 0.6);
//! let back = inv * (m * v);
//! assert!((back - v).abs().max_element() < 1e-12);
//! ```
//!
//! # Dependencies
//!
//! - [`visim-core`] - Error type for singular matrices
//!
//! # Used By
//!
//! - `visim-color` - Fixed color matrices and conversions
//! - `visim-ops` - Brettel projection planes, Daltonize affine export

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod mat3;
mod vec3;

pub use mat3::*;
pub use vec3::*;
