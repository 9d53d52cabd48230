//! Surety Configuration Module
//!
//! Per-network deployment profiles for the relay server and the dapp
//! client. A deployment file is a JSON object keyed by network name, one
//! profile per network, loaded once at startup and never mutated.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use surety_primitives::Address;
use thiserror::Error;
use url::Url;

/// Network key used when none is selected.
pub const DEFAULT_NETWORK: &str = "localhost";

/// Default location of the deployment file.
pub const DEFAULT_DEPLOYMENT_PATH: &str = "config/networks.json";

/// Number of oracle accounts the relay registers.
pub const ORACLE_POOL_SIZE: usize = 20;

/// Offset of the first oracle account in the chain account list.
/// Account 0 is the contract owner and never registers as an oracle.
pub const ORACLE_FIRST_ACCOUNT: usize = 1;

/// Number of indexes the contract assigns to each oracle.
pub const ORACLE_INDEX_COUNT: usize = 3;

/// Gas limit attached to oracle registration transactions.
pub const REGISTER_ORACLE_GAS: u64 = 2_000_000;

/// Number of display airline accounts the client derives.
pub const AIRLINE_ACCOUNT_COUNT: usize = 13;

/// Number of display passenger accounts the client derives.
pub const PASSENGER_ACCOUNT_COUNT: usize = 5;

/// Errors that can occur while loading deployment configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Deployment file could not be read.
    #[error("Failed to read deployment file: {0}")]
    Io(#[from] std::io::Error),

    /// Deployment file could not be parsed.
    #[error("Failed to parse deployment file: {0}")]
    Parse(#[from] serde_json::Error),

    /// Requested network is not present in the deployment file.
    #[error("Unknown network: {network}")]
    UnknownNetwork {
        /// Network key that was requested.
        network: String,
    },
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Deployment profile for one network.
///
/// Field names follow the deployment file emitted alongside the contract
/// migration (camelCase keys).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkProfile {
    /// JSON-RPC endpoint of the chain node.
    pub url: Url,
    /// Deployed application contract address.
    pub app_address: Address,
    /// Deployed data-storage contract address.
    pub data_address: Address,
    /// Account of the first registered airline.
    pub first_airline: Address,
}

/// The full deployment file: one profile per network name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Deployments {
    networks: HashMap<String, NetworkProfile>,
}

impl Deployments {
    /// Parses a deployment file from its JSON text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` on malformed JSON.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a deployment file from disk.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read and
    /// `ConfigError::Parse` if it is not valid JSON.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Returns the profile for the given network.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownNetwork` if the network key is absent.
    pub fn network(&self, name: &str) -> ConfigResult<&NetworkProfile> {
        self.networks
            .get(name)
            .ok_or_else(|| ConfigError::UnknownNetwork {
                network: name.to_string(),
            })
    }

    /// Network names present in the deployment file.
    pub fn network_names(&self) -> impl Iterator<Item = &str> {
        self.networks.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "localhost": {
            "url": "http://127.0.0.1:8545",
            "appAddress": "0x5fbdb2315678afecb367f032d93f642f64180aa3",
            "dataAddress": "0xe7f1725e7734ce288f8367e1bb143e90bb3f0512",
            "firstAirline": "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        }
    }"#;

    #[test]
    fn parses_sample_deployment() {
        let deployments = Deployments::from_json(SAMPLE).unwrap();
        let profile = deployments.network("localhost").unwrap();
        assert_eq!(profile.url.as_str(), "http://127.0.0.1:8545/");
        assert_eq!(
            profile.app_address.to_string(),
            "0x5fbdb2315678afecb367f032d93f642f64180aa3"
        );
    }

    #[test]
    fn unknown_network_is_an_error() {
        let deployments = Deployments::from_json(SAMPLE).unwrap();
        let err = deployments.network("rinkeby").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownNetwork { .. }));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let deployments = Deployments::load(file.path()).unwrap();
        assert!(deployments.network(DEFAULT_NETWORK).is_ok());
    }

    #[test]
    fn display_account_constants() {
        assert!(ORACLE_FIRST_ACCOUNT > 0);
        assert_eq!(ORACLE_POOL_SIZE, 20);
        assert_eq!(AIRLINE_ACCOUNT_COUNT + PASSENGER_ACCOUNT_COUNT, 18);
    }
}
