// Copyright (C) 2015-2025 The Surety Project.
//
// app.rs file belongs to the surety project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Facade over the deployed application contract.

use std::sync::Arc;
use std::sync::OnceLock;
use surety_chain::{
    decode, encode_function, event_topic, CallRequest, Chain, ChainError, ChainResult, Log,
    LogFilter, ParamType, Token, TransactionRequest, TxHash,
};
use surety_config::{ORACLE_INDEX_COUNT, REGISTER_ORACLE_GAS};
use surety_primitives::{Address, Wei};

const SIG_IS_OPERATIONAL: &str = "isOperational()";
const SIG_REGISTRATION_FEE: &str = "REGISTRATION_FEE()";
const SIG_REGISTER_ORACLE: &str = "registerOracle()";
const SIG_MY_INDEXES: &str = "getMyIndexes()";
const SIG_SUBMIT_RESPONSE: &str = "submitOracleResponse(uint8,address,string,uint256,uint8)";
const SIG_FETCH_FLIGHT_STATUS: &str = "fetchFlightStatus(address,string,uint256)";
const SIG_REGISTER_AIRLINE: &str = "registerAirline(uint256,string,address)";
const SIG_PAY_REGISTRATION_FEE: &str = "payRegistrationFee(address)";
const SIG_REGISTER_FLIGHT: &str = "registerFlight(address,string,uint256)";
const SIG_BUY: &str = "buy(address,address,string,uint256,uint256)";
const SIG_PAY_INSURANCE: &str = "payInsurance(address,uint256)";
const SIG_FETCH_AIRLINE: &str = "fetchAirline(address)";
const SIG_FETCH_REGISTERED_AIRLINES: &str = "fetchRegisteredAirlines()";

const EV_ORACLE_REQUEST: &str = "OracleRequest(uint8,address,string,uint256)";
const EV_ORACLE_REPORT: &str = "OracleReport(address,string,uint256,uint8)";
const EV_FLIGHT_STATUS_INFO: &str = "FlightStatusInfo(address,string,uint256,uint8)";

static EVENT_TOPICS: OnceLock<[String; 3]> = OnceLock::new();

fn event_topics() -> &'static [String; 3] {
    EVENT_TOPICS.get_or_init(|| {
        [
            event_topic(EV_ORACLE_REQUEST),
            event_topic(EV_ORACLE_REPORT),
            event_topic(EV_FLIGHT_STATUS_INFO),
        ]
    })
}

/// An event emitted by the application contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The contract needs external status data for a flight.
    OracleRequest {
        /// Index the responding oracles must hold.
        index: u8,
        /// Airline operating the flight.
        airline: Address,
        /// Flight identifier.
        flight: String,
        /// Scheduled departure timestamp.
        timestamp: u64,
    },
    /// A single oracle response was accepted.
    OracleReport {
        /// Airline operating the flight.
        airline: Address,
        /// Flight identifier.
        flight: String,
        /// Scheduled departure timestamp.
        timestamp: u64,
        /// Reported status code.
        status: u8,
    },
    /// The contract reached a verdict on a flight's status.
    FlightStatusInfo {
        /// Airline operating the flight.
        airline: Address,
        /// Flight identifier.
        flight: String,
        /// Scheduled departure timestamp.
        timestamp: u64,
        /// Final status code.
        status: u8,
    },
}

/// Application contract operations through the chain client.
pub struct SuretyApp {
    chain: Arc<dyn Chain>,
    address: Address,
}

impl SuretyApp {
    /// SuretyApp Constructor
    pub fn new(chain: Arc<dyn Chain>, address: Address) -> Self {
        Self { chain, address }
    }

    /// Deployed contract address.
    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    async fn read(
        &self,
        from: Option<Address>,
        signature: &str,
        args: &[Token],
    ) -> ChainResult<Vec<u8>> {
        let data = encode_function(signature, args)?;
        self.chain
            .call(CallRequest {
                from,
                to: self.address,
                value: None,
                data,
            })
            .await
    }

    async fn submit(
        &self,
        from: Address,
        signature: &str,
        args: &[Token],
        value: Option<Wei>,
        gas: Option<u64>,
    ) -> ChainResult<TxHash> {
        let data = encode_function(signature, args)?;
        self.chain
            .send_transaction(TransactionRequest {
                from,
                to: self.address,
                value,
                gas,
                data,
            })
            .await
    }

    /// Whether the contract's operational flag is set.
    pub async fn is_operational(&self, from: Address) -> ChainResult<bool> {
        let raw = self.read(Some(from), SIG_IS_OPERATIONAL, &[]).await?;
        decode(&[ParamType::Bool], &raw)?
            .remove(0)
            .into_bool()
    }

    /// Fee an oracle must pay to register.
    pub async fn registration_fee(&self) -> ChainResult<Wei> {
        let raw = self.read(None, SIG_REGISTRATION_FEE, &[]).await?;
        let fee = decode(&[ParamType::Uint], &raw)?.remove(0).into_uint()?;
        Ok(Wei(fee))
    }

    /// Registers `from` as an oracle, paying the registration fee.
    pub async fn register_oracle(&self, from: Address, fee: Wei) -> ChainResult<TxHash> {
        self.submit(
            from,
            SIG_REGISTER_ORACLE,
            &[],
            Some(fee),
            Some(REGISTER_ORACLE_GAS),
        )
        .await
    }

    /// Indexes the contract assigned to the calling oracle account.
    pub async fn my_indexes(&self, from: Address) -> ChainResult<[u8; ORACLE_INDEX_COUNT]> {
        let raw = self.read(Some(from), SIG_MY_INDEXES, &[]).await?;
        let kinds = [ParamType::FixedArray(
            Box::new(ParamType::Uint),
            ORACLE_INDEX_COUNT,
        )];
        let items = decode(&kinds, &raw)?.remove(0).into_array()?;

        let mut indexes = [0u8; ORACLE_INDEX_COUNT];
        for (slot, item) in indexes.iter_mut().zip(items) {
            let value = item.into_uint()?;
            *slot = u8::try_from(value)
                .map_err(|_| ChainError::abi(format!("oracle index {value} exceeds u8")))?;
        }
        Ok(indexes)
    }

    /// Submits one oracle's status response for a request.
    pub async fn submit_oracle_response(
        &self,
        from: Address,
        index: u8,
        airline: Address,
        flight: &str,
        timestamp: u64,
        status: u8,
    ) -> ChainResult<TxHash> {
        self.submit(
            from,
            SIG_SUBMIT_RESPONSE,
            &[
                Token::Uint(u128::from(index)),
                Token::Address(airline),
                Token::String(flight.to_string()),
                Token::Uint(u128::from(timestamp)),
                Token::Uint(u128::from(status)),
            ],
            None,
            None,
        )
        .await
    }

    /// Asks the contract to gather oracle status reports for a flight.
    pub async fn fetch_flight_status(
        &self,
        from: Address,
        airline: Address,
        flight: &str,
        timestamp: u64,
    ) -> ChainResult<TxHash> {
        self.submit(
            from,
            SIG_FETCH_FLIGHT_STATUS,
            &[
                Token::Address(airline),
                Token::String(flight.to_string()),
                Token::Uint(u128::from(timestamp)),
            ],
            None,
            None,
        )
        .await
    }

    /// Registers an airline. Quoted read-style, as the dapp issues it; the
    /// registering account must already be funded.
    pub async fn register_airline(
        &self,
        from: Address,
        id: u128,
        name: &str,
        account: Address,
    ) -> ChainResult<Vec<u8>> {
        self.read(
            Some(from),
            SIG_REGISTER_AIRLINE,
            &[
                Token::Uint(id),
                Token::String(name.to_string()),
                Token::Address(account),
            ],
        )
        .await
    }

    /// Quotes the airline funding fee payment.
    pub async fn pay_registration_fee(
        &self,
        from: Address,
        airline: Address,
        value: Wei,
    ) -> ChainResult<Vec<u8>> {
        let data = encode_function(SIG_PAY_REGISTRATION_FEE, &[Token::Address(airline)])?;
        self.chain
            .call(CallRequest {
                from: Some(from),
                to: self.address,
                value: Some(value),
                data,
            })
            .await
    }

    /// Adds a flight for an airline.
    pub async fn register_flight(
        &self,
        from: Address,
        airline: Address,
        flight: &str,
        timestamp: u64,
    ) -> ChainResult<Vec<u8>> {
        self.read(
            Some(from),
            SIG_REGISTER_FLIGHT,
            &[
                Token::Address(airline),
                Token::String(flight.to_string()),
                Token::Uint(u128::from(timestamp)),
            ],
        )
        .await
    }

    /// Buys insurance for a passenger on a flight.
    pub async fn buy_insurance(
        &self,
        from: Address,
        passenger: Address,
        airline: Address,
        flight: &str,
        timestamp: u64,
        amount: Wei,
    ) -> ChainResult<Vec<u8>> {
        let data = encode_function(
            SIG_BUY,
            &[
                Token::Address(passenger),
                Token::Address(airline),
                Token::String(flight.to_string()),
                Token::Uint(u128::from(timestamp)),
                Token::Uint(amount.value()),
            ],
        )?;
        self.chain
            .call(CallRequest {
                from: Some(from),
                to: self.address,
                value: Some(amount),
                data,
            })
            .await
    }

    /// Pays out a passenger's insurance credit.
    pub async fn pay_insurance(
        &self,
        from: Address,
        passenger: Address,
        amount: Wei,
    ) -> ChainResult<Vec<u8>> {
        self.read(
            Some(from),
            SIG_PAY_INSURANCE,
            &[Token::Address(passenger), Token::Uint(amount.value())],
        )
        .await
    }

    /// Fetches an airline record. The return shape is the contract's; the
    /// caller renders it.
    pub async fn fetch_airline(&self, from: Address, airline: Address) -> ChainResult<Vec<u8>> {
        self.read(Some(from), SIG_FETCH_AIRLINE, &[Token::Address(airline)])
            .await
    }

    /// Accounts of every registered airline.
    pub async fn fetch_registered_airlines(&self, from: Address) -> ChainResult<Vec<Address>> {
        let raw = self
            .read(Some(from), SIG_FETCH_REGISTERED_AIRLINES, &[])
            .await?;
        let kinds = [ParamType::Array(Box::new(ParamType::Address))];
        let items = decode(&kinds, &raw)?.remove(0).into_array()?;
        items.into_iter().map(Token::into_address).collect()
    }

    /// Filter matching every event this facade decodes.
    #[must_use]
    pub fn event_filter(&self, from_block: u64) -> LogFilter {
        LogFilter {
            address: self.address,
            topics: event_topics().to_vec(),
            from_block,
        }
    }

    /// Decodes a log from this contract into a typed event.
    ///
    /// Returns `Ok(None)` for events the facade does not model.
    ///
    /// # Errors
    ///
    /// Returns `ChainError` when a recognized event carries a payload that
    /// does not decode.
    pub fn decode_event(log: &Log) -> ChainResult<Option<AppEvent>> {
        let topics = event_topics();
        let Some(topic0) = log.topic0() else {
            return Ok(None);
        };

        let data = log.data_bytes()?;
        if topic0 == topics[0] {
            let kinds = [
                ParamType::Uint,
                ParamType::Address,
                ParamType::String,
                ParamType::Uint,
            ];
            let mut tokens = decode(&kinds, &data)?.into_iter();
            let index = narrow_u8(tokens.next().map(Token::into_uint).transpose()?)?;
            let airline = tokens.next().map(Token::into_address).transpose()?;
            let flight = tokens.next().map(Token::into_string).transpose()?;
            let timestamp = narrow_u64(tokens.next().map(Token::into_uint).transpose()?)?;
            Ok(Some(AppEvent::OracleRequest {
                index,
                airline: airline.ok_or_else(missing_field)?,
                flight: flight.ok_or_else(missing_field)?,
                timestamp,
            }))
        } else if topic0 == topics[1] || topic0 == topics[2] {
            let kinds = [
                ParamType::Address,
                ParamType::String,
                ParamType::Uint,
                ParamType::Uint,
            ];
            let mut tokens = decode(&kinds, &data)?.into_iter();
            let airline = tokens
                .next()
                .map(Token::into_address)
                .transpose()?
                .ok_or_else(missing_field)?;
            let flight = tokens
                .next()
                .map(Token::into_string)
                .transpose()?
                .ok_or_else(missing_field)?;
            let timestamp = narrow_u64(tokens.next().map(Token::into_uint).transpose()?)?;
            let status = narrow_u8(tokens.next().map(Token::into_uint).transpose()?)?;
            if topic0 == topics[1] {
                Ok(Some(AppEvent::OracleReport {
                    airline,
                    flight,
                    timestamp,
                    status,
                }))
            } else {
                Ok(Some(AppEvent::FlightStatusInfo {
                    airline,
                    flight,
                    timestamp,
                    status,
                }))
            }
        } else {
            Ok(None)
        }
    }
}

fn missing_field() -> ChainError {
    ChainError::abi("event payload missing a field".to_string())
}

fn narrow_u8(value: Option<u128>) -> ChainResult<u8> {
    let value = value.ok_or_else(missing_field)?;
    u8::try_from(value).map_err(|_| ChainError::abi(format!("{value} exceeds u8")))
}

fn narrow_u64(value: Option<u128>) -> ChainResult<u64> {
    let value = value.ok_or_else(missing_field)?;
    u64::try_from(value).map_err(|_| ChainError::abi(format!("{value} exceeds u64")))
}
