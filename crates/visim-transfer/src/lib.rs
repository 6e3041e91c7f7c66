//! # visim-transfer
//!
//! Transfer functions and byte encodings used at the edges of the
//! simulation pipeline.
//!
//! | Module | Domain | Used by |
//! |--------|--------|---------|
//! | [`srgb`] | sRGB gamma <-> linear `[0, 1]`, bytes <-> linear | dichromacy, Daltonize |
//! | [`normalized`] | bytes <-> `[-1, 1]` | infant-vision blur |
//!
//! # Usage
//!
//! ```rust
//! use visim_transfer::{normalized, srgb};
//!
//! let linear = srgb::srgb_byte_to_linear(188);
//! assert_eq!(srgb::linear_to_srgb_byte(linear), 188);
//!
//! assert_eq!(normalized::byte_to_normalized(128), 0.0);
//! assert_eq!(normalized::normalized_to_byte(0.0), 128);
//! ```
//!
//! # Used By
//!
//! - `visim-color` - Boundary conversions between RGBA bytes and float buffers

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod normalized;
pub mod srgb;
