//! HTTP front for the forecast gateway.
//!
//! `GET /api/weather?location=...` relays the provider payload verbatim, or a
//! `{"error": "..."}` body with the gateway's status.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use weather_core::{ForecastProvider, GatewayError};

#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn ForecastProvider>,
}

impl AppState {
    pub fn new(provider: Arc<dyn ForecastProvider>) -> Self {
        Self { provider }
    }
}

/// Query pairs in request order. Repeated keys are kept.
pub type QueryPairs = Vec<(String, String)>;

/// First `location` value, if any.
pub fn location_param(pairs: &[(String, String)]) -> Option<&str> {
    pairs.iter().find(|(key, _)| key == "location").map(|(_, value)| value.as_str())
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// A gateway failure rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub GatewayError);

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorBody { error: self.0.message() })).into_response()
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/weather", get(get_weather))
        .route("/health", get(health))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new())
                .on_response(DefaultOnResponse::new()),
        )
}

async fn get_weather(
    State(state): State<AppState>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(pairs) = query.map_err(|rejection| {
        tracing::debug!(error = %rejection, "unreadable query string");
        ApiError(GatewayError::MissingInput)
    })?;
    let location = location_param(&pairs).unwrap_or_default();
    let forecast = state.provider.fetch(location).await.inspect_err(|err| {
        if let GatewayError::TransportFailure { detail } = err {
            tracing::error!(%detail, "forecast lookup failed");
        }
    })?;

    Ok(([(header::CONTENT_TYPE, "application/json")], forecast.raw).into_response())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_upstream_status_maps_to_500() {
        let err = ApiError(GatewayError::UpstreamFailure { message: "odd".into(), status: 42 });
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn upstream_status_is_preserved() {
        let err = ApiError(GatewayError::UpstreamFailure { message: "forbidden".into(), status: 403 });
        assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);
    }

    fn pairs(raw: &[(&str, &str)]) -> QueryPairs {
        raw.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn first_location_value_wins() {
        let query = pairs(&[("units", "metric"), ("location", "London"), ("location", "Paris")]);
        assert_eq!(location_param(&query), Some("London"));
        assert_eq!(location_param(&pairs(&[("units", "metric")])), None);
    }

    #[test]
    fn missing_input_is_bad_request() {
        assert_eq!(ApiError(GatewayError::MissingInput).into_response().status(), StatusCode::BAD_REQUEST);
    }
}
