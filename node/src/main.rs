//! Surety relay server.
//!
//! Bootstraps the oracle pool against the deployed contracts, then
//! answers on-chain status requests until interrupted. A liveness
//! endpoint runs alongside the dispatcher.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use surety_chain::{Chain, LogPoller, RpcChain};
use surety_config::{Deployments, DEFAULT_DEPLOYMENT_PATH, DEFAULT_NETWORK};
use surety_contract::{SuretyApp, SuretyData};
use surety_oracle::{Bootstrap, Dispatcher};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

mod api;

#[derive(Parser, Debug)]
#[command(name = "surety-node", about = "Flight-status oracle relay server")]
struct NodeArgs {
    /// Path to the deployment file.
    #[arg(long, default_value = DEFAULT_DEPLOYMENT_PATH)]
    config: PathBuf,

    /// Network profile to use.
    #[arg(long, default_value = DEFAULT_NETWORK)]
    network: String,

    /// Address to bind the liveness endpoint to.
    #[arg(long, default_value = "127.0.0.1:3000")]
    api: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("surety=info".parse()?))
        .init();

    let args = NodeArgs::parse();
    run(args).await
}

async fn run(args: NodeArgs) -> Result<()> {
    let deployments = Deployments::load(&args.config)
        .with_context(|| format!("loading deployment file {}", args.config.display()))?;
    let profile = deployments.network(&args.network)?.clone();
    info!(target: "surety", network = %args.network, url = %profile.url, "starting relay");

    let chain: Arc<dyn Chain> = Arc::new(RpcChain::new(profile.url.clone()));
    let app = Arc::new(SuretyApp::new(Arc::clone(&chain), profile.app_address));
    let data = Arc::new(SuretyData::new(Arc::clone(&chain), profile.data_address));

    let outcome = Bootstrap::new(Arc::clone(&chain), Arc::clone(&app), data)
        .run()
        .await
        .context("relay bootstrap failed")?;
    if outcome.registry.is_empty() {
        warn!(target: "surety", "no oracle registered; requests will go unanswered");
    }

    let api_addr = args.api;
    tokio::spawn(async move {
        if let Err(e) = api::serve(api_addr).await {
            warn!(target: "surety", "liveness endpoint failed: {e}");
        }
    });
    info!(target: "surety", addr = %args.api, "liveness endpoint listening");

    let from_block = match chain.block_number().await {
        Ok(block) => block,
        Err(e) => {
            warn!(target: "surety", "head lookup failed, subscribing from genesis: {e}");
            0
        }
    };
    let subscription = LogPoller::new(Arc::clone(&chain), app.event_filter(from_block)).spawn();
    let dispatcher = Dispatcher::new(app, Arc::new(outcome.registry));

    tokio::select! {
        () = dispatcher.run(subscription) => {
            warn!(target: "surety", "event stream ended");
        }
        _ = signal::ctrl_c() => {
            info!(target: "surety", "interrupt received, shutting down");
        }
    }

    Ok(())
}
