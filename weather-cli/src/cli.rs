use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, Text};
use weather_core::{
    Config, ForecastSession, ViewState,
    geolocation::{FixedGeolocator, initial_query, parse_coordinates},
    provider::provider_from_config,
};

use crate::render::{RenderOptions, render_forecast};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the WeatherAPI key and fallback location.
    Configure,

    /// Show current conditions and the 10-day forecast.
    Show {
        /// Place name or "lat,lon". Defaults to the device position, then the fallback location.
        location: Option<String>,

        /// Device position to use instead of the configured one, as "lat,lon".
        #[arg(long)]
        coords: Option<String>,

        /// Also chart today's hourly temperatures.
        #[arg(long)]
        hourly: bool,

        /// Use short weekday names in the forecast list.
        #[arg(long)]
        short: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { location, coords, hourly, short } => {
                if let Some(raw) = coords.as_deref() {
                    parse_coordinates(raw).with_context(|| format!("Invalid --coords '{raw}'"))?;
                }
                let config = Config::load_with_env()?;
                show(&config, location, coords, RenderOptions { hourly, short }).await
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("WeatherAPI key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }
    config.set_api_key(api_key.trim().to_string());

    let fallback = Text::new("Fallback location:")
        .with_default(&config.client.fallback_location)
        .prompt()
        .context("Failed to read fallback location")?;
    if !fallback.trim().is_empty() {
        config.client.fallback_location = fallback.trim().to_string();
    }

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(
    config: &Config,
    location: Option<String>,
    coords: Option<String>,
    options: RenderOptions,
) -> anyhow::Result<()> {
    let session = ForecastSession::new(provider_from_config(&config.provider));

    match location {
        Some(raw) => session.search_raw(&raw).await,
        None => {
            let position = coords.or_else(|| config.client.home_coordinates.clone());
            let geolocator = FixedGeolocator::new(position);
            let query = initial_query(&geolocator, &config.client.fallback_location);
            session.search(&query).await
        }
    };

    match session.snapshot().await {
        ViewState::Ready(payload) => {
            print!("{}", render_forecast(&payload, options)?);
            Ok(())
        }
        ViewState::Failed(err) => bail!("{}", err.message()),
        ViewState::Idle => bail!("No forecast was loaded"),
    }
}
