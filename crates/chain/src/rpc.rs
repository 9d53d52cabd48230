// Copyright (C) 2015-2025 The Surety Project.
//
// rpc.rs file belongs to the surety project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! JSON-RPC 2.0 transport over HTTP.

use crate::error::{ChainError, ChainResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

/// JSON-RPC 2.0 request.
#[derive(Debug, Clone, Serialize)]
pub struct RpcRequest {
    /// Protocol version, always `"2.0"`.
    pub jsonrpc: &'static str,
    /// Method name.
    pub method: String,
    /// Positional parameters.
    pub params: Vec<Value>,
    /// Request identifier.
    pub id: u64,
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcResponseError {
    /// Error code.
    pub code: i64,
    /// Error message.
    pub message: String,
}

/// JSON-RPC 2.0 response.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcResponse {
    /// Result payload, absent on error.
    #[serde(default)]
    pub result: Option<Value>,
    /// Error object, absent on success.
    #[serde(default)]
    pub error: Option<RpcResponseError>,
}

/// The transport used to call chain RPC methods.
pub struct RpcTransport {
    base_address: Url,
    http_client: Client,
}

impl RpcTransport {
    /// Creates a new transport against the given endpoint.
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self {
            base_address: url,
            http_client: Client::new(),
        }
    }

    /// Creates a new transport with an existing HTTP client.
    #[must_use]
    pub fn with_client(client: Client, url: Url) -> Self {
        Self {
            base_address: url,
            http_client: client,
        }
    }

    /// Endpoint this transport talks to.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.base_address
    }

    fn as_rpc_request(method: &str, params: Vec<Value>) -> RpcRequest {
        RpcRequest {
            jsonrpc: "2.0",
            method: method.to_string(),
            params,
            id: 1,
        }
    }

    fn as_rpc_result(response: RpcResponse) -> ChainResult<Value> {
        if let Some(error) = response.error {
            return Err(ChainError::rpc(error.code, error.message));
        }
        response
            .result
            .ok_or_else(|| ChainError::invalid_response("No result returned".to_string()))
    }

    /// Sends an RPC request and returns the raw result value.
    ///
    /// # Errors
    ///
    /// Returns `ChainError::Transport` on HTTP failure, `ChainError::Rpc`
    /// when the node answers with an error object, and
    /// `ChainError::InvalidResponse` on an unparseable body.
    pub async fn rpc_send(&self, method: &str, params: Vec<Value>) -> ChainResult<Value> {
        let request = Self::as_rpc_request(method, params);

        let response = self
            .http_client
            .post(self.base_address.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| ChainError::transport(format!("HTTP error: {e}")))?;

        let parsed: RpcResponse = response
            .json()
            .await
            .map_err(|e| ChainError::invalid_response(format!("Parse error: {e}")))?;

        Self::as_rpc_result(parsed)
    }
}
