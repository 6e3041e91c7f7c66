//! # visim-ops
//!
//! Vision simulation transforms on pixel buffers.
//!
//! # Modules
//!
//! - [`dichromacy`] - what a protanope, deuteranope or tritanope sees
//! - [`daltonize`] - statistics-driven correction for dichromats
//! - [`infant`] - age-dependent opponent-channel blur
//! - [`filter`] - separable Gaussian with edge clamping
//! - [`settings`] - YAML parameters for all of the above
//!
//! Every transform is a pure function: it reads its input, allocates a new
//! output and either returns it whole or fails with an [`OpsError`].
//!
//! # Example
//!
//! ```rust
//! use visim_core::RgbBuffer;
//! use visim_ops::{daltonize_correct, simulate_deficiency, DaltonizeParams, DeficiencyType};
//!
//! let img = RgbBuffer::filled(8, 8, [0.7, 0.3, 0.2]);
//! let seen = simulate_deficiency(&img, DeficiencyType::Deuteranope).unwrap();
//! let fixed = daltonize_correct(&img, &DaltonizeParams::default()).unwrap();
//! assert_eq!(seen.dimensions(), fixed.dimensions());
//! ```
//!
//! # Features
//!
//! - `parallel` (default) - row-parallel passes through Rayon

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod deficiency;
mod error;
pub mod daltonize;
pub mod dichromacy;
pub mod filter;
pub mod infant;
pub mod parallel;
pub mod settings;

pub use daltonize::{
    AffineTransform, DaltonizeCorrection, DaltonizeParams, DaltonizeTuning, Daltonizer,
    OpponentStats, daltonize_and_simulate, daltonize_correct, opponent_statistics,
};
pub use deficiency::DeficiencyType;
pub use dichromacy::{Dichromat, Projection, Wing, simulate_deficiency, simulate_lms};
pub use error::{OpsError, OpsResult};
pub use filter::ChannelTreatment;
pub use infant::{
    AgePreset, BlurPlan, InfantVision, ViewingGeometry, pixels_per_degree, simulate_infant_vision,
};
pub use settings::Settings;
