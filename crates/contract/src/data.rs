// Copyright (C) 2015-2025 The Surety Project.
//
// data.rs file belongs to the surety project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Facade over the deployed data-storage contract.

use std::sync::Arc;
use surety_chain::{encode_function, Chain, ChainResult, Token, TransactionRequest, TxHash};
use surety_primitives::Address;

const SIG_AUTHORIZE_CALLER: &str = "authorizeCaller(address)";

/// Data contract operations through the chain client.
///
/// The storage contract enforces its own access control; the only
/// operation this system performs against it is authorizing the
/// application contract as a caller.
pub struct SuretyData {
    chain: Arc<dyn Chain>,
    address: Address,
}

impl SuretyData {
    /// SuretyData Constructor
    pub fn new(chain: Arc<dyn Chain>, address: Address) -> Self {
        Self { chain, address }
    }

    /// Deployed contract address.
    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// Authorizes the application contract to call into storage.
    pub async fn authorize_caller(&self, from: Address, app: Address) -> ChainResult<TxHash> {
        let data = encode_function(SIG_AUTHORIZE_CALLER, &[Token::Address(app)])?;
        self.chain
            .send_transaction(TransactionRequest {
                from,
                to: self.address,
                value: None,
                gas: None,
                data,
            })
            .await
    }
}
