//! Error types for vision operations.

use thiserror::Error;

/// Error type for vision operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Precondition or selector failure from a core type.
    #[error(transparent)]
    Core(#[from] visim_core::Error),

    /// Colorimetric failure (only a broken fixed matrix can cause this).
    #[error(transparent)]
    Color(#[from] visim_color::ColorError),

    /// Settings document could not be parsed.
    #[error("settings error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Settings file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl OpsError {
    /// The wrapped core error, if any.
    pub fn as_core(&self) -> Option<&visim_core::Error> {
        match self {
            Self::Core(e) => Some(e),
            Self::Color(visim_color::ColorError::Core(e)) => Some(e),
            _ => None,
        }
    }
}

/// Result type for vision operations.
pub type OpsResult<T> = Result<T, OpsError>;
