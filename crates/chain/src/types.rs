//! Wire types for the JSON-RPC chain boundary.

use crate::error::{ChainError, ChainResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use surety_primitives::{Address, Wei};

/// Hash of a submitted transaction, as returned by the node.
pub type TxHash = String;

/// Formats an integer as a `0x`-prefixed hex quantity.
#[must_use]
pub fn quantity(value: u128) -> String {
    format!("0x{value:x}")
}

/// Parses a `0x`-prefixed hex quantity.
///
/// # Errors
///
/// Returns `ChainError::InvalidResponse` if the string is not a hex
/// quantity.
pub fn parse_quantity(s: &str) -> ChainResult<u64> {
    let stripped = s.strip_prefix("0x").unwrap_or(s);
    u64::from_str_radix(stripped, 16)
        .map_err(|e| ChainError::invalid_response(format!("bad quantity {s:?}: {e}")))
}

/// A read-only contract call.
#[derive(Debug, Clone)]
pub struct CallRequest {
    /// Caller account, when the contract checks `msg.sender`.
    pub from: Option<Address>,
    /// Contract being called.
    pub to: Address,
    /// Attached value, for calls that quote payable methods.
    pub value: Option<Wei>,
    /// ABI-encoded calldata.
    pub data: Vec<u8>,
}

impl CallRequest {
    /// Builds the JSON-RPC parameter object.
    #[must_use]
    pub fn to_wire(&self) -> Value {
        let mut obj = json!({
            "to": self.to.to_string(),
            "data": format!("0x{}", hex::encode(&self.data)),
        });
        if let Some(from) = &self.from {
            obj["from"] = json!(from.to_string());
        }
        if let Some(value) = &self.value {
            obj["value"] = json!(quantity(value.value()));
        }
        obj
    }
}

/// A state-changing transaction submitted through a node-managed account.
#[derive(Debug, Clone)]
pub struct TransactionRequest {
    /// Sending account. The node signs with its managed key.
    pub from: Address,
    /// Contract being called.
    pub to: Address,
    /// Attached value.
    pub value: Option<Wei>,
    /// Gas limit; the node estimates when absent.
    pub gas: Option<u64>,
    /// ABI-encoded calldata.
    pub data: Vec<u8>,
}

impl TransactionRequest {
    /// Builds the JSON-RPC parameter object.
    #[must_use]
    pub fn to_wire(&self) -> Value {
        let mut obj = json!({
            "from": self.from.to_string(),
            "to": self.to.to_string(),
            "data": format!("0x{}", hex::encode(&self.data)),
        });
        if let Some(value) = &self.value {
            obj["value"] = json!(quantity(value.value()));
        }
        if let Some(gas) = self.gas {
            obj["gas"] = json!(quantity(u128::from(gas)));
        }
        obj
    }
}

/// Filter for a log query.
#[derive(Debug, Clone)]
pub struct LogFilter {
    /// Contract address the logs must come from.
    pub address: Address,
    /// Topic-0 values to match; empty matches every event of the contract.
    pub topics: Vec<String>,
    /// First block of the query range.
    pub from_block: u64,
}

impl LogFilter {
    /// Builds the JSON-RPC filter object.
    #[must_use]
    pub fn to_wire(&self) -> Value {
        let mut obj = json!({
            "address": self.address.to_string(),
            "fromBlock": quantity(u128::from(self.from_block)),
            "toBlock": "latest",
        });
        if !self.topics.is_empty() {
            obj["topics"] = json!([self.topics]);
        }
        obj
    }
}

/// A log entry observed on the chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    /// Emitting contract.
    pub address: Address,
    /// Topic hashes; topic 0 identifies the event.
    #[serde(default)]
    pub topics: Vec<String>,
    /// Hex-encoded event payload.
    pub data: String,
    /// Block the log was included in.
    #[serde(default)]
    pub block_number: Option<String>,
}

impl Log {
    /// Topic-0 hash, when present.
    #[must_use]
    pub fn topic0(&self) -> Option<&str> {
        self.topics.first().map(String::as_str)
    }

    /// Decodes the hex payload into bytes.
    ///
    /// # Errors
    ///
    /// Returns `ChainError::InvalidResponse` on malformed hex.
    pub fn data_bytes(&self) -> ChainResult<Vec<u8>> {
        let stripped = self.data.strip_prefix("0x").unwrap_or(&self.data);
        hex::decode(stripped)
            .map_err(|e| ChainError::invalid_response(format!("bad log data: {e}")))
    }

    /// Block number of the log, when the node reported one.
    ///
    /// # Errors
    ///
    /// Returns `ChainError::InvalidResponse` on a malformed quantity.
    pub fn block(&self) -> ChainResult<Option<u64>> {
        self.block_number
            .as_deref()
            .map(parse_quantity)
            .transpose()
    }
}
