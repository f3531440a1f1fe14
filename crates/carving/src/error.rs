//! Error types for the carving engine.

use thiserror::Error;

/// Result type for carving operations.
pub type ChiselResult<T> = Result<T, ChiselError>;

/// Errors surfaced to the host.
///
/// Carving itself never fails; these come from construction, file
/// access, and host preconditions.
#[derive(Debug, Error)]
pub enum ChiselError {
    #[error("Dimension mismatch: expected {expected:?}, found {found:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        found: (u32, u32),
    },

    #[error("Cell ({x}, {y}) is outside the {width}x{height} field")]
    OutOfBounds {
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    },

    #[error("Corrupt project data: {0}")]
    CorruptData(String),

    #[error("Unsupported project format version {found} (expected {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] chisel_config::ConfigError),
}

impl From<image::ImageError> for ChiselError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(io) => ChiselError::Io(io),
            other => ChiselError::Io(std::io::Error::other(other)),
        }
    }
}

impl ChiselError {
    /// Shorthand for a dimension mismatch between two `(width, height)` pairs.
    pub fn dimensions(expected: (u32, u32), found: (u32, u32)) -> Self {
        ChiselError::DimensionMismatch { expected, found }
    }
}
