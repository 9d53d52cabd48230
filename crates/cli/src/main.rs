//! Surety dapp console.
//!
//! The Rust rendition of the browser dapp's controller: each subcommand
//! maps onto one contract-facade operation and prints the result or the
//! error the chain returned.

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod args;
mod commands;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("surety=info".parse()?))
        .init();

    let args = args::CliArgs::parse();
    commands::execute(args).await
}
