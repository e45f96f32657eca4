use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    config::{DEFAULT_BASE_URL, ProviderConfig},
    error::{GatewayError, UPSTREAM_FALLBACK_MESSAGE},
    model::{ForecastPayload, ForecastResponse, LocationQuery},
};

use super::{FORECAST_DAYS, ForecastProvider};

/// weatherapi.com `forecast.json` client.
#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: Option<String>,
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        let api_key = api_key.filter(|k| !k.trim().is_empty());
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { api_key, base_url, http: Client::new() }
    }

    pub fn from_config(config: &ProviderConfig) -> Self {
        Self::with_base_url(config.api_key.clone(), config.base_url.as_str())
    }

    fn forecast_url(&self) -> String {
        format!("{}/v1/forecast.json", self.base_url)
    }
}

#[derive(Debug, Deserialize)]
struct WaErrorBody {
    error: WaErrorDetail,
}

#[derive(Debug, Deserialize)]
struct WaErrorDetail {
    message: Option<String>,
}

#[async_trait]
impl ForecastProvider for WeatherApiProvider {
    async fn fetch_forecast(&self, query: &LocationQuery) -> Result<ForecastResponse, GatewayError> {
        let api_key = self.api_key.as_deref().ok_or(GatewayError::MissingCredential)?;

        tracing::debug!(location = %query, "requesting forecast from WeatherAPI");

        let days = FORECAST_DAYS.to_string();
        let res = self
            .http
            .get(self.forecast_url())
            .query(&[
                ("key", api_key),
                ("q", query.as_str()),
                ("days", days.as_str()),
                ("aqi", "no"),
                ("alerts", "no"),
            ])
            .send()
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "failed to send request to WeatherAPI");
                GatewayError::transport(err.to_string())
            })?;

        let status = res.status();
        if !status.is_success() {
            let body = res
                .text()
                .await
                .inspect_err(|err| {
                    tracing::warn!(error = %err, "failed to read WeatherAPI error body");
                })
                .ok();
            return Err(upstream_failure(status.as_u16(), body.as_deref()));
        }

        let body = res.text().await.map_err(|err| {
            tracing::error!(error = %err, "failed to read WeatherAPI response body");
            GatewayError::transport(err.to_string())
        })?;

        let payload = parse_payload(&body)?;
        Ok(ForecastResponse { payload, raw: body })
    }
}

/// A non-success answer keeps the upstream status even when the body is unreadable.
fn upstream_failure(status: u16, body: Option<&str>) -> GatewayError {
    let message = body.map_or_else(|| UPSTREAM_FALLBACK_MESSAGE.to_string(), upstream_error_message);
    tracing::warn!(
        status,
        message = %message,
        body = %body.map(truncate_body).unwrap_or_default(),
        "WeatherAPI forecast request failed"
    );
    GatewayError::UpstreamFailure { message, status }
}

/// The provider's own message, or a generic one when the body carries none.
fn upstream_error_message(body: &str) -> String {
    serde_json::from_str::<WaErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| UPSTREAM_FALLBACK_MESSAGE.to_string())
}

fn parse_payload(body: &str) -> Result<ForecastPayload, GatewayError> {
    let payload: ForecastPayload = serde_json::from_str(body).map_err(|err| {
        tracing::error!(error = %err, body = %truncate_body(body), "failed to parse WeatherAPI forecast JSON");
        GatewayError::transport(err.to_string())
    })?;

    if payload.days().is_empty() {
        tracing::error!("WeatherAPI response contained no forecastday data");
        return Err(GatewayError::transport("empty forecastday"));
    }

    Ok(payload)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_message_is_extracted() {
        let body = r#"{"error":{"code":1006,"message":"No matching location found."}}"#;
        assert_eq!(upstream_error_message(body), "No matching location found.");
    }

    #[test]
    fn upstream_message_falls_back_when_absent() {
        assert_eq!(upstream_error_message(r#"{"error":{}}"#), UPSTREAM_FALLBACK_MESSAGE);
        assert_eq!(upstream_error_message("<html>bad gateway</html>"), UPSTREAM_FALLBACK_MESSAGE);
        assert_eq!(upstream_error_message(r#"{"error":{"message":""}}"#), UPSTREAM_FALLBACK_MESSAGE);
    }

    #[test]
    fn unreadable_error_body_keeps_upstream_status() {
        let err = upstream_failure(502, None);
        assert_eq!(
            err,
            GatewayError::UpstreamFailure { message: UPSTREAM_FALLBACK_MESSAGE.into(), status: 502 }
        );
    }

    #[test]
    fn readable_error_body_supplies_message() {
        let err = upstream_failure(400, Some(r#"{"error":{"message":"No matching location found."}}"#));
        assert_eq!(err.status(), 400);
        assert_eq!(err.message(), "No matching location found.");
    }

    #[test]
    fn empty_forecast_is_a_parse_failure() {
        let mut json = crate::testing::minimal_payload_json();
        json["forecast"]["forecastday"] = serde_json::json!([]);

        let err = parse_payload(&json.to_string()).unwrap_err();
        assert!(matches!(err, GatewayError::TransportFailure { .. }));
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = "é".repeat(300);
        let out = truncate_body(&body);

        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), 203);
    }

    #[test]
    fn blank_api_key_is_treated_as_absent() {
        let provider = WeatherApiProvider::new(Some("  ".into()));
        assert!(provider.api_key.is_none());
    }

    #[test]
    fn forecast_url_ignores_trailing_slash() {
        let provider = WeatherApiProvider::with_base_url(None, "http://localhost:1234/");
        assert_eq!(provider.forecast_url(), "http://localhost:1234/v1/forecast.json");
    }
}
