//! Implementation of `Address`, a 160-bit account identifier.

use crate::error::{PrimitiveError, PrimitiveResult};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The length of `Address` values in bytes.
pub const ADDRESS_SIZE: usize = 20;

/// Represents a 160-bit account identifier.
///
/// Addresses are rendered as `0x`-prefixed lowercase hex, the form the
/// JSON-RPC endpoint and the deployment config use.
#[derive(Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Address([u8; ADDRESS_SIZE]);

impl Address {
    /// Alias for the byte length of an address.
    pub const LENGTH: usize = ADDRESS_SIZE;

    /// Returns a zero `Address`.
    #[inline]
    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }

    /// Checks if this address is zero.
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_SIZE]
    }

    /// Returns the bytes representation of this address.
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_SIZE] {
        &self.0
    }

    /// Creates a new `Address` from a byte slice.
    ///
    /// # Errors
    ///
    /// Returns `PrimitiveError::InvalidFormat` if the input length is not
    /// exactly 20 bytes.
    #[inline]
    pub fn from_bytes(value: &[u8]) -> PrimitiveResult<Self> {
        if value.len() != ADDRESS_SIZE {
            return Err(PrimitiveError::invalid_format(format!(
                "Invalid length: {}",
                value.len()
            )));
        }

        let mut bytes = [0u8; ADDRESS_SIZE];
        bytes.copy_from_slice(value);
        Ok(Self(bytes))
    }

    /// Parses an address from a hex string, with or without a `0x` prefix.
    ///
    /// # Errors
    ///
    /// Returns `PrimitiveError::InvalidFormat` if the string is not 40 hex
    /// characters after the optional prefix.
    pub fn parse(s: &str) -> PrimitiveResult<Self> {
        let stripped = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
        let bytes = hex::decode(stripped)
            .map_err(|e| PrimitiveError::invalid_format(format!("Invalid hex: {e}")))?;
        Self::from_bytes(&bytes)
    }
}

impl From<[u8; ADDRESS_SIZE]> for Address {
    fn from(value: [u8; ADDRESS_SIZE]) -> Self {
        Self(value)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl FromStr for Address {
    type Err = PrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(D::Error::custom)
    }
}
