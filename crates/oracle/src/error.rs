//! Error types for the relay.

use thiserror::Error;

/// Errors that abort the relay bootstrap.
///
/// Everything past the account fetch is best-effort and surfaces as log
/// events instead of errors.
#[derive(Error, Debug)]
pub enum OracleError {
    /// The node manages no accounts, so there is no owner and no pool.
    #[error("The node reports no managed accounts")]
    NoAccounts,

    /// The account list could not be fetched at all.
    #[error(transparent)]
    Chain(#[from] surety_chain::ChainError),
}

/// Result type for relay operations.
pub type OracleResult<T> = std::result::Result<T, OracleError>;
