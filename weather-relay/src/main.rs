//! Binary crate for the `weather-relay` service.
//!
//! This crate focuses on:
//! - Parsing CLI arguments and loading configuration
//! - Serving `GET /weather` over HTTP
//! - Interactive configuration and the smoke-test harness

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod server;
mod smoke;

const DEFAULT_LOG_FILTER: &str = "weather_relay=info,weather_core=info,tower_http=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
