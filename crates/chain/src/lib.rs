//! Surety Chain Client Library
//!
//! This crate provides the boundary to the chain node: a JSON-RPC 2.0
//! transport, the contract ABI codec, the `Chain` trait consumed by the
//! contract facades and the relay, and a polling log subscription.

mod abi;
mod client;
mod error;
mod events;
mod rpc;
mod types;

pub use abi::{decode, encode, encode_function, event_topic, selector, ParamType, Token};
pub use client::{Chain, RpcChain};
pub use error::{ChainError, ChainResult};
pub use events::{LogPoller, LogSubscription, DEFAULT_POLL_INTERVAL};
pub use rpc::{RpcRequest, RpcResponse, RpcResponseError, RpcTransport};
pub use types::{
    parse_quantity, quantity, CallRequest, Log, LogFilter, TransactionRequest, TxHash,
};
