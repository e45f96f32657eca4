use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{config::DEFAULT_FALLBACK_LOCATION, error::GatewayError};

/// A place name or a `"latitude,longitude"` pair, trimmed and non-empty.
///
/// Resolvability is left to the upstream provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationQuery(String);

impl LocationQuery {
    pub fn new(raw: &str) -> Result<Self, GatewayError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(GatewayError::MissingInput);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn from_coordinates(coords: Coordinates) -> Self {
        Self(format!("{},{}", coords.latitude, coords.longitude))
    }

    pub fn default_fallback() -> Self {
        Self(DEFAULT_FALLBACK_LOCATION.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A weatherapi.com `forecast.json` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPayload {
    pub location: Location,
    pub current: Current,
    pub forecast: Forecast,
}

impl ForecastPayload {
    /// Day 0 of the forecast. Payloads handed out by the gateway always have one.
    pub fn today(&self) -> Option<&ForecastDay> {
        self.forecast.forecastday.first()
    }

    pub fn days(&self) -> &[ForecastDay] {
        &self.forecast.forecastday
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub region: Option<String>,
    pub country: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub tz_id: Option<String>,
    pub localtime: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub text: String,
    pub icon: String,
    pub code: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Current {
    pub temp_c: f64,
    pub temp_f: f64,
    pub feelslike_c: f64,
    pub feelslike_f: f64,
    pub condition: Condition,
    pub wind_kph: f64,
    pub wind_mph: f64,
    pub humidity: u8,
    pub uv: f64,
    pub vis_km: f64,
    pub vis_miles: f64,
    /// Local time, `YYYY-MM-DD HH:MM`.
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub forecastday: Vec<ForecastDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub day: DaySummary,
    pub astro: Astro,
    /// Not every provider plan returns hourly breakdowns.
    pub hour: Option<Vec<HourlyTemperature>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub maxtemp_c: f64,
    pub maxtemp_f: f64,
    pub mintemp_c: f64,
    pub mintemp_f: f64,
    pub avgtemp_c: Option<f64>,
    pub avgtemp_f: Option<f64>,
    pub condition: Condition,
    pub daily_chance_of_rain: Option<u8>,
    pub totalprecip_mm: Option<f64>,
    pub daily_chance_of_snow: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Astro {
    pub sunrise: String,
    pub sunset: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyTemperature {
    pub time: String,
    pub temp_c: f64,
    pub temp_f: f64,
}

/// A successful gateway result: the typed payload plus the upstream body as received.
#[derive(Debug, Clone)]
pub struct ForecastResponse {
    pub payload: ForecastPayload,
    pub raw: String,
}
