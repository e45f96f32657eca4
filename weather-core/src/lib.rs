//! Core library for the weather app.
//!
//! This crate defines:
//! - The forecast gateway (provider abstraction over weatherapi.com)
//! - Presentation mapping from a forecast payload to display values
//! - Configuration & credentials handling
//! - A client session that discards stale lookups
//!
//! It is used by `weather-server` and `weather-cli`.

pub mod config;
pub mod error;
pub mod geolocation;
pub mod model;
pub mod presentation;
pub mod provider;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{ClientConfig, Config, ProviderConfig, ServerConfig};
pub use error::GatewayError;
pub use model::{Coordinates, ForecastPayload, ForecastResponse, LocationQuery};
pub use presentation::{Theme, classify};
pub use provider::{ForecastProvider, WeatherApiProvider};
pub use session::{Applied, ForecastSession, ViewState};
