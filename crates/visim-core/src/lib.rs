//! # visim-core
//!
//! Core types shared by every visim crate.
//!
//! - [`RgbBuffer`] - flat row-major buffer of floating-point RGB triplets
//! - [`RgbaImage`] - interleaved 8-bit RGBA image as delivered by a decoder
//! - [`Error`] / [`Result`] - failure modes of the simulation transforms
//!
//! ## Crate Structure
//!
//! This crate has no internal dependencies. The rest of the workspace
//! builds on it:
//!
//! ```text
//! visim-core (this crate)
//!    ^
//!    |
//!    +-- visim-math (Vec3, Mat3)
//!    +-- visim-transfer (sRGB encode/decode)
//!    +-- visim-color (colorimetric core)
//!    +-- visim-ops (dichromacy, daltonize, infant vision)
//! ```
//!
//! ## Value domains
//!
//! An [`RgbBuffer`] does not record what its numbers mean. The dichromacy
//! simulator and Daltonize corrector expect linear RGB in `[0, 1]`; the
//! infant-vision blur works on bytes normalized to `[-1, 1]`. Conversions
//! between domains live in `visim-color`.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod buffer;
pub mod error;
pub mod image;

pub use buffer::RgbBuffer;
pub use error::{Error, Result};
pub use image::RgbaImage;

/// Prelude module for convenient imports.
///
/// ```
/// use visim_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::buffer::RgbBuffer;
    pub use crate::error::{Error, Result};
    pub use crate::image::RgbaImage;
}
