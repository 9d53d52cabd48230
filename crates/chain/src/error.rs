//! Error types for chain operations.

use thiserror::Error;

/// Errors that can occur while talking to the chain node.
#[derive(Error, Debug)]
pub enum ChainError {
    /// Transport failed (endpoint unreachable, timeout, malformed HTTP).
    #[error("Transport error: {message}")]
    Transport {
        /// Error message.
        message: String,
    },

    /// The node answered with a JSON-RPC error object. Contract-rejected
    /// transactions (reverts, access-control denials, insufficient fees)
    /// surface here.
    #[error("RPC error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code.
        code: i64,
        /// Error message.
        message: String,
    },

    /// The node answered, but with a payload this client cannot use.
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// Error message.
        message: String,
    },

    /// ABI encoding or decoding failed.
    #[error("ABI error: {message}")]
    Abi {
        /// Error message.
        message: String,
    },
}

impl ChainError {
    /// Create a transport error.
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create an RPC error.
    pub fn rpc<S: Into<String>>(code: i64, message: S) -> Self {
        Self::Rpc {
            code,
            message: message.into(),
        }
    }

    /// Create an invalid response error.
    pub fn invalid_response<S: Into<String>>(message: S) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Create an ABI error.
    pub fn abi<S: Into<String>>(message: S) -> Self {
        Self::Abi {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for ChainError {
    fn from(err: reqwest::Error) -> Self {
        Self::transport(err.to_string())
    }
}

impl From<surety_primitives::PrimitiveError> for ChainError {
    fn from(err: surety_primitives::PrimitiveError) -> Self {
        Self::invalid_response(err.to_string())
    }
}

/// Result type for chain operations.
pub type ChainResult<T> = std::result::Result<T, ChainError>;
