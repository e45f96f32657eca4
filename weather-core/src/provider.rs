use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;

use crate::{
    config::ProviderConfig,
    error::GatewayError,
    model::{ForecastResponse, LocationQuery},
};

pub mod weatherapi;

pub use weatherapi::WeatherApiProvider;

/// Days of forecast requested from the provider.
pub const FORECAST_DAYS: u8 = 10;

/// One upstream lookup per call, no retries and no shared mutable state.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn fetch_forecast(&self, query: &LocationQuery) -> Result<ForecastResponse, GatewayError>;

    /// Validates raw user input before delegating to [`ForecastProvider::fetch_forecast`].
    async fn fetch(&self, raw_query: &str) -> Result<ForecastResponse, GatewayError> {
        let query = LocationQuery::new(raw_query)?;
        self.fetch_forecast(&query).await
    }
}

/// Construct the provider described by config, ready to share across tasks.
pub fn provider_from_config(config: &ProviderConfig) -> Arc<dyn ForecastProvider> {
    Arc::new(WeatherApiProvider::from_config(config))
}
