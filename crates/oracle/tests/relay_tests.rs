//! End-to-end relay tests over a scripted chain mock.
//!
//! The mock answers the handful of calls the bootstrap and the dispatcher
//! issue, and records every submitted transaction so the tests can assert
//! exactly who responded to what.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use surety_chain::{
    decode, encode, event_topic, selector, CallRequest, Chain, ChainError, ChainResult, Log,
    LogFilter, ParamType, Token, TransactionRequest, TxHash,
};
use surety_contract::{SuretyApp, SuretyData};
use surety_oracle::{Bootstrap, Dispatcher, FlightStatus, RegistryBuilder};
use surety_primitives::{Address, Wei};

const FEE: u128 = 1_000_000_000_000_000_000;
const EV_ORACLE_REQUEST: &str = "OracleRequest(uint8,address,string,uint256)";
const SIG_SUBMIT_RESPONSE: &str = "submitOracleResponse(uint8,address,string,uint256,uint8)";

fn account(byte: u8) -> Address {
    Address::from_bytes(&[byte; 20]).unwrap()
}

fn app_address() -> Address {
    account(0xaa)
}

fn data_address() -> Address {
    account(0xdd)
}

/// Chain stub backing both facades.
#[derive(Default)]
struct MockChain {
    accounts: Vec<Address>,
    indexes: HashMap<Address, [u8; 3]>,
    reject_register: HashSet<Address>,
    reject_authorize: bool,
    sent: Mutex<Vec<TransactionRequest>>,
}

impl MockChain {
    fn with_pool(count: u8) -> Self {
        let accounts: Vec<Address> = (0..=count).map(account).collect();
        let indexes = accounts
            .iter()
            .skip(1)
            .map(|a| (*a, [a.as_bytes()[0] % 10, 1, 2]))
            .collect();
        Self {
            accounts,
            indexes,
            ..Self::default()
        }
    }

    fn sent(&self) -> Vec<TransactionRequest> {
        self.sent.lock().unwrap().clone()
    }

    fn sent_with_selector(&self, signature: &str) -> Vec<TransactionRequest> {
        let sel = selector(signature);
        self.sent()
            .into_iter()
            .filter(|tx| tx.data.len() >= 4 && tx.data[..4] == sel)
            .collect()
    }
}

#[async_trait]
impl Chain for MockChain {
    async fn accounts(&self) -> ChainResult<Vec<Address>> {
        Ok(self.accounts.clone())
    }

    async fn call(&self, request: CallRequest) -> ChainResult<Vec<u8>> {
        if request.data[..4] == selector("REGISTRATION_FEE()") {
            return Ok(Wei(FEE).to_be_word().to_vec());
        }
        if request.data[..4] == selector("getMyIndexes()") {
            let from = request
                .from
                .ok_or_else(|| ChainError::rpc(-32000, "missing from"))?;
            let indexes = self
                .indexes
                .get(&from)
                .ok_or_else(|| ChainError::rpc(3, "not a registered oracle"))?;
            return encode(&[
                Token::Uint(u128::from(indexes[0])),
                Token::Uint(u128::from(indexes[1])),
                Token::Uint(u128::from(indexes[2])),
            ]);
        }
        Err(ChainError::rpc(3, "unknown call"))
    }

    async fn send_transaction(&self, request: TransactionRequest) -> ChainResult<TxHash> {
        if request.to == data_address() && self.reject_authorize {
            return Err(ChainError::rpc(3, "caller is not contract owner"));
        }
        if request.data.len() >= 4
            && request.data[..4] == selector("registerOracle()")
            && self.reject_register.contains(&request.from)
        {
            return Err(ChainError::rpc(3, "registration rejected"));
        }

        let mut sent = self.sent.lock().unwrap();
        sent.push(request);
        Ok(format!("0x{:064x}", sent.len()))
    }

    async fn block_number(&self) -> ChainResult<u64> {
        Ok(0)
    }

    async fn logs(&self, _filter: &LogFilter) -> ChainResult<Vec<Log>> {
        Ok(vec![])
    }
}

struct Harness {
    chain: Arc<MockChain>,
    app: Arc<SuretyApp>,
    data: Arc<SuretyData>,
}

impl Harness {
    fn new(chain: MockChain) -> Self {
        let chain = Arc::new(chain);
        let as_chain: Arc<dyn Chain> = chain.clone();
        let app = Arc::new(SuretyApp::new(Arc::clone(&as_chain), app_address()));
        let data = Arc::new(SuretyData::new(as_chain, data_address()));
        Self { chain, app, data }
    }

    fn bootstrap(&self) -> Bootstrap {
        Bootstrap::new(self.chain.clone(), Arc::clone(&self.app), Arc::clone(&self.data))
    }
}

fn request_log(index: u8, airline: Address, flight: &str, timestamp: u64) -> Log {
    let data = encode(&[
        Token::Uint(u128::from(index)),
        Token::Address(airline),
        Token::String(flight.to_string()),
        Token::Uint(u128::from(timestamp)),
    ])
    .unwrap();
    Log {
        address: app_address(),
        topics: vec![event_topic(EV_ORACLE_REQUEST)],
        data: format!("0x{}", hex::encode(data)),
        block_number: Some("0x1".to_string()),
    }
}

/// Decoded arguments of one submitted response.
struct Response {
    from: Address,
    index: u8,
    airline: Address,
    flight: String,
    timestamp: u64,
    status: u8,
}

fn decode_response(tx: &TransactionRequest) -> Response {
    let kinds = [
        ParamType::Uint,
        ParamType::Address,
        ParamType::String,
        ParamType::Uint,
        ParamType::Uint,
    ];
    let mut tokens = decode(&kinds, &tx.data[4..]).unwrap().into_iter();
    Response {
        from: tx.from,
        index: tokens.next().unwrap().into_uint().unwrap() as u8,
        airline: tokens.next().unwrap().into_address().unwrap(),
        flight: tokens.next().unwrap().into_string().unwrap(),
        timestamp: tokens.next().unwrap().into_uint().unwrap() as u64,
        status: tokens.next().unwrap().into_uint().unwrap() as u8,
    }
}

#[tokio::test]
async fn bootstrap_registers_the_whole_pool() {
    let harness = Harness::new(MockChain::with_pool(20));

    let outcome = harness.bootstrap().run().await.unwrap();

    assert_eq!(outcome.owner, account(0));
    assert_eq!(outcome.registry.len(), 20);
    // Owner never registers as an oracle.
    assert!(outcome.registry.indexes(&account(0)).is_none());

    let registrations = harness.chain.sent_with_selector("registerOracle()");
    assert_eq!(registrations.len(), 20);
    for tx in &registrations {
        assert_eq!(tx.value, Some(Wei(FEE)));
        assert_eq!(tx.gas, Some(2_000_000));
        assert_eq!(tx.to, app_address());
    }

    let authorizations = harness.chain.sent_with_selector("authorizeCaller(address)");
    assert_eq!(authorizations.len(), 1);
    assert_eq!(authorizations[0].from, account(0));
    assert_eq!(authorizations[0].to, data_address());
}

#[tokio::test]
async fn rejected_authorization_does_not_abort_bootstrap() {
    let mut chain = MockChain::with_pool(20);
    chain.reject_authorize = true;
    let harness = Harness::new(chain);

    let outcome = harness.bootstrap().run().await.unwrap();

    // Registration still ran for the whole pool.
    assert_eq!(outcome.registry.len(), 20);
    assert!(harness
        .chain
        .sent_with_selector("authorizeCaller(address)")
        .is_empty());
}

#[tokio::test]
async fn failed_registration_leaves_account_out_and_silent() {
    let mut chain = MockChain::with_pool(20);
    chain.reject_register.insert(account(3));
    // Only account 3 would have held index 7.
    chain.indexes = chain
        .accounts
        .iter()
        .skip(1)
        .map(|a| {
            let set = if *a == account(3) { [2, 7, 9] } else { [1, 2, 3] };
            (*a, set)
        })
        .collect();
    let harness = Harness::new(chain);

    let outcome = harness.bootstrap().run().await.unwrap();
    assert_eq!(outcome.registry.len(), 19);
    assert!(outcome.registry.indexes(&account(3)).is_none());

    let dispatcher = Dispatcher::new(Arc::clone(&harness.app), Arc::new(outcome.registry));
    let submitted = dispatcher
        .respond(7, account(0x77), "ND1309", 1_700_000_000)
        .await;

    assert_eq!(submitted, 0);
    assert!(harness
        .chain
        .sent_with_selector(SIG_SUBMIT_RESPONSE)
        .is_empty());
}

#[tokio::test]
async fn matching_oracle_answers_with_original_request_fields() {
    let harness = Harness::new(MockChain::default());
    let airline = account(0x77);

    let mut builder = RegistryBuilder::new();
    builder.insert(account(3), vec![2, 7]);
    builder.insert(account(4), vec![1, 5, 9]);
    let dispatcher = Dispatcher::new(Arc::clone(&harness.app), Arc::new(builder.freeze()));

    dispatcher
        .handle_log(&request_log(7, airline, "ND1309", 1_700_000_000))
        .await;

    let responses = harness.chain.sent_with_selector(SIG_SUBMIT_RESPONSE);
    assert_eq!(responses.len(), 1);

    let response = decode_response(&responses[0]);
    assert_eq!(response.from, account(3));
    assert_eq!(response.index, 7);
    assert_eq!(response.airline, airline);
    assert_eq!(response.flight, "ND1309");
    assert_eq!(response.timestamp, 1_700_000_000);
    assert!(FlightStatus::from_code(response.status).is_some());
}

#[tokio::test]
async fn every_holder_of_the_index_responds_once() {
    let harness = Harness::new(MockChain::default());

    let mut builder = RegistryBuilder::new();
    builder.insert(account(3), vec![2, 7]);
    builder.insert(account(4), vec![7, 5, 9]);
    builder.insert(account(5), vec![1, 0, 3]);
    let dispatcher = Dispatcher::new(Arc::clone(&harness.app), Arc::new(builder.freeze()));

    let submitted = dispatcher.respond(7, account(0x77), "F1", 1).await;
    assert_eq!(submitted, 2);

    let responders: HashSet<Address> = harness
        .chain
        .sent_with_selector(SIG_SUBMIT_RESPONSE)
        .iter()
        .map(|tx| tx.from)
        .collect();
    assert_eq!(responders, HashSet::from([account(3), account(4)]));
}

#[tokio::test]
async fn unrecognized_logs_are_skipped() {
    let harness = Harness::new(MockChain::default());

    let mut builder = RegistryBuilder::new();
    builder.insert(account(3), vec![0, 1, 2]);
    let dispatcher = Dispatcher::new(Arc::clone(&harness.app), Arc::new(builder.freeze()));

    let log = Log {
        address: app_address(),
        topics: vec![format!("0x{}", "cd".repeat(32))],
        data: "0x".to_string(),
        block_number: None,
    };
    dispatcher.handle_log(&log).await;

    assert!(harness.chain.sent().is_empty());
}
