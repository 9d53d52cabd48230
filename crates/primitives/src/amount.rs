//! Wei amount newtype.

use crate::error::{PrimitiveError, PrimitiveResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An amount of chain currency in wei.
///
/// 128 bits cover every fee and premium this system handles; amounts above
/// `u128::MAX` wei are rejected at the decoding boundary rather than
/// silently truncated.
#[derive(Clone, Copy, Default, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Wei(pub u128);

impl Wei {
    /// Returns a zero amount.
    #[inline]
    #[must_use]
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Checks if the amount is zero.
    #[inline]
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Raw wei value.
    #[inline]
    #[must_use]
    pub const fn value(&self) -> u128 {
        self.0
    }

    /// Decodes an amount from a 32-byte big-endian word.
    ///
    /// # Errors
    ///
    /// Returns `PrimitiveError::OutOfRange` if the high 16 bytes are
    /// non-zero.
    pub fn from_be_word(word: &[u8; 32]) -> PrimitiveResult<Self> {
        if word[..16].iter().any(|b| *b != 0) {
            return Err(PrimitiveError::out_of_range(
                "amount exceeds 128 bits".to_string(),
            ));
        }
        let mut low = [0u8; 16];
        low.copy_from_slice(&word[16..]);
        Ok(Self(u128::from_be_bytes(low)))
    }

    /// Encodes the amount as a 32-byte big-endian word.
    #[must_use]
    pub fn to_be_word(&self) -> [u8; 32] {
        let mut word = [0u8; 32];
        word[16..].copy_from_slice(&self.0.to_be_bytes());
        word
    }
}

impl From<u128> for Wei {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl From<u64> for Wei {
    fn from(value: u64) -> Self {
        Self(u128::from(value))
    }
}

impl fmt::Display for Wei {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} wei", self.0)
    }
}
