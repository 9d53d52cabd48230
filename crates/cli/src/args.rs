//! Command-line arguments for the dapp console.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use surety_config::{DEFAULT_DEPLOYMENT_PATH, DEFAULT_NETWORK};
use surety_primitives::Address;

/// Console client for the surety dapp.
///
/// One subcommand per contract operation the dapp exposes; each prints the
/// operation's result or the error the chain returned.
#[derive(Parser, Debug)]
#[command(name = "surety-cli", about = "Console client for the surety dapp")]
pub struct CliArgs {
    /// Path to the deployment file.
    #[arg(long, default_value = DEFAULT_DEPLOYMENT_PATH)]
    pub config: PathBuf,

    /// Network profile to use.
    #[arg(long, default_value = DEFAULT_NETWORK)]
    pub network: String,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Show whether the contract is operational.
    Status,

    /// List the display accounts: owner, airlines, passengers.
    Accounts,

    /// Ask the contract to gather oracle reports for a flight.
    FetchFlightStatus {
        /// Airline account operating the flight.
        airline: Address,
        /// Flight identifier.
        flight: String,
        /// Scheduled departure timestamp.
        timestamp: u64,
    },

    /// Register an airline with the contract.
    RegisterAirline {
        /// Numeric airline identifier.
        id: u128,
        /// Airline display name.
        name: String,
        /// Airline account.
        account: Address,
    },

    /// Add a flight for a registered airline.
    AddFlight {
        /// Airline account operating the flight.
        airline: Address,
        /// Flight identifier.
        flight: String,
        /// Scheduled departure timestamp.
        timestamp: u64,
    },

    /// Buy insurance for a passenger on a flight.
    BuyInsurance {
        /// Passenger account paying the premium.
        passenger: Address,
        /// Airline account operating the flight.
        airline: Address,
        /// Flight identifier.
        flight: String,
        /// Scheduled departure timestamp.
        timestamp: u64,
        /// Premium, in wei.
        amount: u128,
    },

    /// Withdraw a passenger's insurance credit.
    Withdraw {
        /// Passenger account receiving the payout.
        passenger: Address,
        /// Amount to withdraw, in wei.
        amount: u128,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_status_with_defaults() {
        let args = CliArgs::try_parse_from(["surety-cli", "status"]).unwrap();
        assert_eq!(args.network, DEFAULT_NETWORK);
        assert!(matches!(args.command, CliCommand::Status));
    }

    #[test]
    fn parses_fetch_flight_status() {
        let args = CliArgs::try_parse_from([
            "surety-cli",
            "--network",
            "testnet",
            "fetch-flight-status",
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266",
            "ND1309",
            "1700000000",
        ])
        .unwrap();

        assert_eq!(args.network, "testnet");
        match args.command {
            CliCommand::FetchFlightStatus {
                flight, timestamp, ..
            } => {
                assert_eq!(flight, "ND1309");
                assert_eq!(timestamp, 1_700_000_000);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_address() {
        let result = CliArgs::try_parse_from([
            "surety-cli",
            "fetch-flight-status",
            "not-an-address",
            "ND1309",
            "1700000000",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn parses_buy_insurance() {
        let args = CliArgs::try_parse_from([
            "surety-cli",
            "buy-insurance",
            "0x00a329c0648769a73afac7f9381e08fb43dbea72",
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266",
            "ND1309",
            "1700000000",
            "1000000000000000000",
        ])
        .unwrap();

        match args.command {
            CliCommand::BuyInsurance { amount, .. } => {
                assert_eq!(amount, 1_000_000_000_000_000_000);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
