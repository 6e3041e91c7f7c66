//! Error types for visim operations.
//!
//! Every transform in the workspace either returns a complete output buffer
//! or fails synchronously with one of the variants below. Nothing is retried
//! internally and there is no partial result: retrying (for example after
//! cropping an image to a square) is left to the caller.
//!
//! # Usage
//!
//! ```rust
//! use visim_core::{Error, Result};
//!
//! fn check_square(width: u32, height: u32) -> Result<()> {
//!     if width != height {
//!         return Err(Error::NonSquareImage { width, height });
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_square(4, 4).is_ok());
//! assert!(check_square(4, 3).is_err());
//! ```
//!
//! # Dependencies
//!
//! - [`thiserror`] - For derive macro error implementation
//!
//! # Used By
//!
//! - [`crate::buffer::RgbBuffer`] - Buffer length checks
//! - `visim-math` - Matrix inversion
//! - `visim-color`, `visim-ops` - Wrapped in their own error enums

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during vision simulation.
///
/// # Categories
///
/// - **Constant errors**: [`SingularMatrix`](Error::SingularMatrix). A fixed
///   color matrix is not invertible; this indicates a broken constant and is
///   effectively fatal.
/// - **Selector errors**: [`UnknownDeficiencyType`](Error::UnknownDeficiencyType),
///   [`UnknownAgePreset`](Error::UnknownAgePreset)
/// - **Precondition errors**: [`NonSquareImage`](Error::NonSquareImage),
///   [`EmptyImage`](Error::EmptyImage), [`BufferSize`](Error::BufferSize),
///   [`InvalidParameter`](Error::InvalidParameter)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A 3x3 matrix could not be inverted.
    ///
    /// Returned when `|det| < 1e-12`.
    #[error("singular matrix: determinant {determinant:e} is below the inversion threshold")]
    SingularMatrix {
        /// Determinant of the rejected matrix
        determinant: f64,
    },

    /// The deficiency selector is not one of
    /// `normal`, `protanope`, `deuteranope`, `tritanope`.
    #[error("unknown deficiency type: {0:?}")]
    UnknownDeficiencyType(String),

    /// The age selector is not one of the six infant-vision presets.
    #[error("unknown age preset: {0:?}")]
    UnknownAgePreset(String),

    /// The infant-vision blur requires `width == height`.
    #[error("image must be square, got {width}x{height}")]
    NonSquareImage {
        /// Image width
        width: u32,
        /// Image height
        height: u32,
    },

    /// Width or height is zero.
    ///
    /// Statistics-based transforms cannot compute a mean or variance over
    /// zero pixels, so every transform rejects empty input up front.
    #[error("image is empty ({width}x{height})")]
    EmptyImage {
        /// Image width
        width: u32,
        /// Image height
        height: u32,
    },

    /// Buffer length does not match `width * height * channels`.
    #[error("buffer size mismatch: expected {expected} elements, got {got}")]
    BufferSize {
        /// Expected element count
        expected: usize,
        /// Actual element count
        got: usize,
    },

    /// A numeric parameter is out of its valid range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl Error {
    /// Creates an [`Error::EmptyImage`] error.
    #[inline]
    pub fn empty_image(width: u32, height: u32) -> Self {
        Self::EmptyImage { width, height }
    }

    /// Creates an [`Error::BufferSize`] error.
    #[inline]
    pub fn buffer_size(expected: usize, got: usize) -> Self {
        Self::BufferSize { expected, got }
    }

    /// Creates an [`Error::InvalidParameter`] error.
    #[inline]
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Returns `true` if the caller supplied an unknown enum selector.
    #[inline]
    pub fn is_selector_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownDeficiencyType(_) | Self::UnknownAgePreset(_)
        )
    }

    /// Returns `true` if the input image violated a shape precondition.
    #[inline]
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            Self::NonSquareImage { .. } | Self::EmptyImage { .. } | Self::BufferSize { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_square_message() {
        let err = Error::NonSquareImage {
            width: 640,
            height: 480,
        };
        assert!(err.to_string().contains("640x480"));
        assert!(err.is_shape_error());
    }

    #[test]
    fn test_selector_errors() {
        let err = Error::UnknownAgePreset("week3".into());
        assert!(err.to_string().contains("week3"));
        assert!(err.is_selector_error());
        assert!(!Error::empty_image(0, 4).is_selector_error());
    }

    #[test]
    fn test_singular_matrix_message() {
        let err = Error::SingularMatrix { determinant: 0.0 };
        assert!(err.to_string().contains("singular"));
    }

    #[test]
    fn test_buffer_size() {
        let err = Error::buffer_size(48, 47);
        let msg = err.to_string();
        assert!(msg.contains("48"));
        assert!(msg.contains("47"));
    }
}
