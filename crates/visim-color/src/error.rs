//! Error types for color operations.

use thiserror::Error;

/// Color operation error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColorError {
    /// Error raised by a core type (buffer shape, singular matrix).
    #[error(transparent)]
    Core(#[from] visim_core::Error),

    /// A fixed color matrix could not be derived.
    #[error("matrix error in {name}: {source}")]
    MatrixError {
        /// Name of the constant being derived.
        name: &'static str,
        /// Underlying failure.
        source: visim_core::Error,
    },
}

/// Result type for color operations.
pub type ColorResult<T> = Result<T, ColorError>;
