//! Execution of the console subcommands.

use crate::args::{CliArgs, CliCommand};
use anyhow::{bail, Context, Result};
use std::sync::Arc;
use surety_chain::{Chain, RpcChain};
use surety_config::Deployments;
use surety_contract::{DappAccounts, SuretyApp};
use surety_primitives::Wei;

pub async fn execute(args: CliArgs) -> Result<()> {
    let deployments = Deployments::load(&args.config)
        .with_context(|| format!("loading deployment file {}", args.config.display()))?;
    let profile = deployments.network(&args.network)?.clone();

    let chain: Arc<dyn Chain> = Arc::new(RpcChain::new(profile.url.clone()));
    let app = SuretyApp::new(Arc::clone(&chain), profile.app_address);

    let accounts = chain.accounts().await.context("fetching node accounts")?;
    let Some(dapp) = DappAccounts::derive(&accounts) else {
        bail!("the node reports no accounts");
    };

    match args.command {
        CliCommand::Status => {
            let operational = app.is_operational(dapp.owner).await?;
            println!("operational: {operational}");
        }
        CliCommand::Accounts => {
            println!("owner: {}", dapp.owner);
            println!("first airline (deployment): {}", profile.first_airline);
            for (slot, airline) in dapp.airlines.iter().enumerate() {
                println!("airline[{slot}]: {airline}");
            }
            for (slot, passenger) in dapp.passengers.iter().enumerate() {
                println!("passenger[{slot}]: {passenger}");
            }
        }
        CliCommand::FetchFlightStatus {
            airline,
            flight,
            timestamp,
        } => {
            let tx = app
                .fetch_flight_status(dapp.owner, airline, &flight, timestamp)
                .await?;
            println!("submitted: {tx}");
        }
        CliCommand::RegisterAirline { id, name, account } => {
            let raw = app.register_airline(dapp.owner, id, &name, account).await?;
            print_call_result(&raw);
        }
        CliCommand::AddFlight {
            airline,
            flight,
            timestamp,
        } => {
            let raw = app
                .register_flight(dapp.owner, airline, &flight, timestamp)
                .await?;
            print_call_result(&raw);
        }
        CliCommand::BuyInsurance {
            passenger,
            airline,
            flight,
            timestamp,
            amount,
        } => {
            let raw = app
                .buy_insurance(passenger, passenger, airline, &flight, timestamp, Wei(amount))
                .await?;
            print_call_result(&raw);
        }
        CliCommand::Withdraw { passenger, amount } => {
            let raw = app.pay_insurance(passenger, passenger, Wei(amount)).await?;
            print_call_result(&raw);
        }
    }

    Ok(())
}

/// Renders a raw call result: the payload when the contract returned one,
/// a plain marker otherwise.
fn print_call_result(raw: &[u8]) {
    if raw.is_empty() {
        println!("ok");
    } else {
        println!("result: 0x{}", hex::encode(raw));
    }
}
