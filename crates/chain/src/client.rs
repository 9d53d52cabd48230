// Copyright (C) 2015-2025 The Surety Project.
//
// client.rs file belongs to the surety project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! The `Chain` trait seam and its JSON-RPC implementation.

use crate::error::{ChainError, ChainResult};
use crate::rpc::RpcTransport;
use crate::types::{parse_quantity, CallRequest, Log, LogFilter, TransactionRequest, TxHash};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::str::FromStr;
use surety_primitives::Address;
use url::Url;

/// Chain access as the facades and the relay consume it.
///
/// The deployed node provides account management, read-only calls,
/// state-changing transaction submission, and log queries; nothing else is
/// required. Tests substitute this trait with local mocks.
#[async_trait]
pub trait Chain: Send + Sync {
    /// Accounts managed by the node, in its configured order.
    async fn accounts(&self) -> ChainResult<Vec<Address>>;

    /// Executes a read-only contract call and returns the raw return data.
    async fn call(&self, request: CallRequest) -> ChainResult<Vec<u8>>;

    /// Submits a state-changing transaction and returns its hash.
    ///
    /// Per-account submission ordering is the node's guarantee, not this
    /// client's.
    async fn send_transaction(&self, request: TransactionRequest) -> ChainResult<TxHash>;

    /// Current chain head height.
    async fn block_number(&self) -> ChainResult<u64>;

    /// Logs matching the filter.
    async fn logs(&self, filter: &LogFilter) -> ChainResult<Vec<Log>>;
}

/// `Chain` implementation backed by the JSON-RPC transport.
pub struct RpcChain {
    transport: RpcTransport,
}

impl RpcChain {
    /// Creates a client against the given endpoint.
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self {
            transport: RpcTransport::new(url),
        }
    }

    /// Creates a client over an existing transport.
    #[must_use]
    pub fn with_transport(transport: RpcTransport) -> Self {
        Self { transport }
    }

    fn result_as_string(value: Value, method: &str) -> ChainResult<String> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(ChainError::invalid_response(format!(
                "{method} returned a non-string result: {other}"
            ))),
        }
    }

    fn result_as_bytes(value: Value, method: &str) -> ChainResult<Vec<u8>> {
        let text = Self::result_as_string(value, method)?;
        let stripped = text.strip_prefix("0x").unwrap_or(&text);
        hex::decode(stripped)
            .map_err(|e| ChainError::invalid_response(format!("{method} returned bad hex: {e}")))
    }
}

#[async_trait]
impl Chain for RpcChain {
    async fn accounts(&self) -> ChainResult<Vec<Address>> {
        let result = self.transport.rpc_send("eth_accounts", vec![]).await?;
        let entries = result.as_array().ok_or_else(|| {
            ChainError::invalid_response("eth_accounts returned a non-array result".to_string())
        })?;

        entries
            .iter()
            .map(|entry| {
                let text = entry.as_str().ok_or_else(|| {
                    ChainError::invalid_response("non-string account entry".to_string())
                })?;
                Address::from_str(text).map_err(ChainError::from)
            })
            .collect()
    }

    async fn call(&self, request: CallRequest) -> ChainResult<Vec<u8>> {
        let result = self
            .transport
            .rpc_send("eth_call", vec![request.to_wire(), json!("latest")])
            .await?;
        Self::result_as_bytes(result, "eth_call")
    }

    async fn send_transaction(&self, request: TransactionRequest) -> ChainResult<TxHash> {
        let result = self
            .transport
            .rpc_send("eth_sendTransaction", vec![request.to_wire()])
            .await?;
        Self::result_as_string(result, "eth_sendTransaction")
    }

    async fn block_number(&self) -> ChainResult<u64> {
        let result = self.transport.rpc_send("eth_blockNumber", vec![]).await?;
        let text = Self::result_as_string(result, "eth_blockNumber")?;
        parse_quantity(&text)
    }

    async fn logs(&self, filter: &LogFilter) -> ChainResult<Vec<Log>> {
        let result = self
            .transport
            .rpc_send("eth_getLogs", vec![filter.to_wire()])
            .await?;
        serde_json::from_value(result)
            .map_err(|e| ChainError::invalid_response(format!("eth_getLogs: {e}")))
    }
}
