//! Error types for primitive parsing and conversion.

use thiserror::Error;

/// Errors that can occur while parsing or converting primitive values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrimitiveError {
    /// Invalid format.
    #[error("Invalid format: {message}")]
    InvalidFormat {
        /// Error message.
        message: String,
    },

    /// Value out of range.
    #[error("Value out of range: {message}")]
    OutOfRange {
        /// Error message.
        message: String,
    },
}

impl PrimitiveError {
    /// Create an invalid format error.
    pub fn invalid_format<S: Into<String>>(message: S) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Create an out of range error.
    pub fn out_of_range<S: Into<String>>(message: S) -> Self {
        Self::OutOfRange {
            message: message.into(),
        }
    }
}

/// Result type for primitive operations.
pub type PrimitiveResult<T> = std::result::Result<T, PrimitiveError>;
