//! # visim-color
//!
//! Colorimetric core shared by every vision transform.
//!
//! - [`matrices`] - the fixed RGB <-> LMS pairs, the opponent matrix and
//!   its cached inverse
//! - [`convert`] - triplet basis changes and the RGBA byte boundary
//!
//! # Architecture
//!
//! ```text
//!                  visim-color
//!                       |
//!        +--------------+--------------+
//!        |              |              |
//! visim-transfer   visim-math      visim-core
//! ```
//!
//! # Bases
//!
//! ```text
//! sRGB bytes --eotf--> linear RGB --DICHROMACY_RGB_TO_LMS--> LMS --LMS_TO_OPP--> opponent
//! bytes --(v-128)/128--> normalised RGB --INFANT_RGB_TO_LMS--> LMS --LMS_TO_OPP--> opponent
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use visim_color::convert::{linear_rgb_to_lms, lms_to_opponent, opponent_to_lms};
//! use visim_math::Vec3;
//!
//! let lms = linear_rgb_to_lms(Vec3::new(1.0, 0.0, 0.0));
//! let opp = lms_to_opponent(lms);
//! let back = opponent_to_lms(opp);
//! assert!((back - lms).abs().max_element() < 1e-9);
//! ```
//!
//! # Used By
//!
//! - `visim-ops` - Dichromacy, Daltonize and infant-vision transforms

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod convert;
pub mod matrices;

pub use error::{ColorError, ColorResult};
pub use matrices::{ConeModel, try_opponent_to_lms, white_point};

// Re-export sub-crates for convenience
pub use visim_math as math;
pub use visim_transfer as transfer;

/// Prelude with commonly used types
pub mod prelude {
    pub use crate::convert::{
        linear_rgb_to_lms, lms_to_linear_rgb, lms_to_opponent, opponent_to_lms,
    };
    pub use crate::matrices::ConeModel;
    pub use crate::{ColorError, ColorResult};
    pub use visim_math::{Mat3, Vec3};
}
