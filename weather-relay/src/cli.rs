use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{CustomType, Text};
use std::{path::PathBuf, time::Duration};
use weather_core::{Config, OpenMeteoProvider, WeatherQuery, respond};

use crate::{server, smoke};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-relay", version, about = "City/state weather lookup relay")]
pub struct Cli {
    /// Config file to use instead of the platform default location.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP relay.
    Serve {
        /// Listen address, overrides `server.listen_addr`.
        #[arg(long)]
        listen: Option<String>,
    },

    /// Interactively write the config file.
    Configure,

    /// Look up one city and print the JSON reply.
    Show {
        #[arg(long)]
        city: String,

        #[arg(long)]
        state: String,
    },

    /// Run the fixed smoke-test scenarios against a running relay.
    Smoke {
        #[arg(long, default_value = "http://127.0.0.1:5000")]
        base_url: String,

        /// Pause between scenarios, in milliseconds.
        #[arg(long, default_value_t = 1000)]
        delay_ms: u64,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Serve { listen } => {
                let mut config = load_config(self.config.as_ref())?;
                if let Some(listen) = listen {
                    config.server.listen_addr = listen;
                }
                server::serve(&config).await
            }
            Command::Configure => configure(self.config),
            Command::Show { city, state } => {
                let config = load_config(self.config.as_ref())?;
                let provider = OpenMeteoProvider::new(&config.upstream)?;

                let reply = respond(&provider, &WeatherQuery::new(city, state)).await;
                println!("{}", serde_json::to_string_pretty(&reply.body)?);

                if reply.status_code != 200 {
                    anyhow::bail!("lookup finished with status {}", reply.status_code);
                }
                Ok(())
            }
            Command::Smoke { base_url, delay_ms } => {
                let outcomes = smoke::run(&base_url, Duration::from_millis(delay_ms)).await?;
                tracing::info!("smoke run finished: {} scenarios", outcomes.len());
                Ok(())
            }
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

fn configure(path: Option<PathBuf>) -> anyhow::Result<()> {
    let mut config = load_config(path.as_ref())?;

    config.server.listen_addr = prompt_text("Listen address:", &config.server.listen_addr)?;
    config.upstream.geocoding_url =
        prompt_text("Geocoding endpoint:", &config.upstream.geocoding_url)?;
    config.upstream.forecast_url =
        prompt_text("Forecast endpoint:", &config.upstream.forecast_url)?;

    config.upstream.timeout_secs = CustomType::<u64>::new("Upstream timeout (seconds):")
        .with_default(config.upstream.timeout_secs)
        .with_error_message("Please enter a whole number of seconds")
        .prompt()
        .context("Failed to read upstream timeout")?;

    config.validate()?;

    let saved_to = match path {
        Some(path) => {
            config.save_to(&path)?;
            path
        }
        None => config.save()?,
    };

    println!("Configuration saved to {}", saved_to.display());
    Ok(())
}

fn prompt_text(message: &str, default: &str) -> anyhow::Result<String> {
    Text::new(message)
        .with_default(default)
        .prompt()
        .with_context(|| format!("Failed to read answer to '{message}'"))
}
