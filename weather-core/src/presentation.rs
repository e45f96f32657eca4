//! Pure mapping from a [`ForecastPayload`] to display values.
//!
//! Nothing here performs I/O; every function is deterministic for a given payload.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::model::{ForecastDay, ForecastPayload};

/// Visual treatment selected from a provider condition code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    Sunny,
    PartlyCloudy,
    Cloudy,
    Foggy,
    Rainy,
    Snowy,
    Thunderstorm,
    Default,
}

const FOGGY_CODES: &[i32] = &[1030, 1135, 1147];
const RAINY_CODES: &[i32] = &[
    1063, 1180, 1183, 1186, 1189, 1192, 1195, 1198, 1201, 1204, 1207, 1240, 1243, 1246, 1249,
];
const SNOWY_CODES: &[i32] = &[
    1066, 1210, 1213, 1216, 1219, 1222, 1225, 1228, 1237, 1252, 1255, 1258, 1261, 1264, 1267,
];
const THUNDERSTORM_CODES: &[i32] = &[1087, 1273, 1276, 1279, 1282];

/// Classify a weatherapi.com condition code. Rules are checked top to bottom.
pub fn classify(code: i32) -> Theme {
    if code == 1000 {
        Theme::Sunny
    } else if code == 1003 {
        Theme::PartlyCloudy
    } else if code == 1006 || code == 1009 {
        Theme::Cloudy
    } else if FOGGY_CODES.contains(&code) {
        Theme::Foggy
    } else if RAINY_CODES.contains(&code) {
        Theme::Rainy
    } else if SNOWY_CODES.contains(&code) {
        Theme::Snowy
    } else if THUNDERSTORM_CODES.contains(&code) {
        Theme::Thunderstorm
    } else {
        Theme::Default
    }
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Sunny => "sunny",
            Theme::PartlyCloudy => "partly-cloudy",
            Theme::Cloudy => "cloudy",
            Theme::Foggy => "foggy",
            Theme::Rainy => "rainy",
            Theme::Snowy => "snowy",
            Theme::Thunderstorm => "thunderstorm",
            Theme::Default => "default",
        }
    }

    /// Stylesheet class for the page background.
    pub fn background_class(&self) -> &'static str {
        match self {
            Theme::Sunny => "bg-sunny-animated",
            Theme::PartlyCloudy => "bg-partly-cloudy",
            Theme::Cloudy => "bg-cloudy-animated",
            Theme::Foggy => "bg-foggy-animated",
            Theme::Rainy => "bg-rainy-animated",
            Theme::Snowy => "bg-snowy-animated",
            Theme::Thunderstorm => "bg-thunderstorm-animated",
            Theme::Default => "bg-default",
        }
    }

    /// Particle overlay drawn on top of the background, if any.
    pub fn ambient_effect(&self) -> Option<AmbientEffect> {
        match self {
            Theme::Rainy => Some(AmbientEffect::Rain { drops: 50 }),
            Theme::Snowy => Some(AmbientEffect::Snow { flakes: 50 }),
            Theme::Thunderstorm => Some(AmbientEffect::Lightning { bolts: 5 }),
            _ => None,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmbientEffect {
    Rain { drops: usize },
    Snow { flakes: usize },
    Lightning { bolts: usize },
}

impl ForecastPayload {
    pub fn theme(&self) -> Theme {
        classify(self.current.condition.code)
    }
}

/// Round half up, so `-2.5` becomes `-2` and `23.5` becomes `24`.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Current conditions plus today's derived figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentStats {
    pub location: String,
    pub temperature_c: i64,
    pub condition: String,
    pub icon: String,
    pub high_c: i64,
    pub low_c: i64,
    pub feels_like_c: i64,
    pub humidity_pct: u8,
    pub wind_kph: f64,
    pub uv_index: f64,
    pub visibility_km: f64,
    pub sunrise: String,
    pub sunset: String,
    /// `HH:MM`, when the provider reported a parseable timestamp.
    pub last_updated: Option<String>,
}

impl CurrentStats {
    /// Returns `None` only for a payload with no forecast days.
    pub fn from_payload(payload: &ForecastPayload) -> Option<Self> {
        let today = payload.today()?;
        let current = &payload.current;

        Some(Self {
            location: format!("{}, {}", payload.location.name, payload.location.country),
            temperature_c: round_half_up(current.temp_c),
            condition: current.condition.text.clone(),
            icon: current.condition.icon.clone(),
            high_c: high_temperature(today),
            low_c: low_temperature(today),
            feels_like_c: round_half_up(current.feelslike_c),
            humidity_pct: current.humidity,
            wind_kph: current.wind_kph,
            uv_index: current.uv,
            visibility_km: current.vis_km,
            sunrise: today.astro.sunrise.clone(),
            sunset: today.astro.sunset.clone(),
            last_updated: current.last_updated.as_deref().and_then(format_clock_time),
        })
    }
}

pub fn high_temperature(day: &ForecastDay) -> i64 {
    round_half_up(day.day.maxtemp_c)
}

pub fn low_temperature(day: &ForecastDay) -> i64 {
    round_half_up(day.day.mintemp_c)
}

/// `"2024-06-01 14:05"` -> `"14:05"`.
pub fn format_clock_time(local: &str) -> Option<String> {
    NaiveDateTime::parse_from_str(local.trim(), "%Y-%m-%d %H:%M")
        .ok()
        .map(|dt| dt.format("%H:%M").to_string())
}

/// Chart geometry for [`sparkline`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SparklineScale {
    pub width: f64,
    pub amplitude: f64,
    pub base_offset: f64,
}

impl Default for SparklineScale {
    fn default() -> Self {
        Self { width: 100.0, amplitude: 40.0, base_offset: 10.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SparkPoint {
    pub x: f64,
    pub y: f64,
}

pub const MAX_HOURLY_POINTS: usize = 24;

/// Normalize `values` onto `scale`. A constant series is drawn flat at mid-height.
pub fn sparkline(values: &[f64], scale: &SparklineScale) -> Vec<SparkPoint> {
    let Some(first) = values.first() else {
        return Vec::new();
    };
    let (min, max) = values.iter().fold((*first, *first), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    let range = max - min;
    let step = if values.len() > 1 { scale.width / (values.len() - 1) as f64 } else { 0.0 };

    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let y = if range == 0.0 {
                scale.base_offset + scale.amplitude / 2.0
            } else {
                (v - min) / range * scale.amplitude + scale.base_offset
            };
            let x = if values.len() > 1 { i as f64 * step } else { scale.width / 2.0 };
            SparkPoint { x, y }
        })
        .collect()
}

/// Daily highs across the whole forecast.
pub fn daily_max_sparkline(payload: &ForecastPayload, scale: &SparklineScale) -> Vec<SparkPoint> {
    let highs: Vec<f64> = payload.days().iter().map(|d| d.day.maxtemp_c).collect();
    sparkline(&highs, scale)
}

/// Hourly temperatures for one day, or `None` when the provider sent none.
pub fn hourly_sparkline(day: &ForecastDay, scale: &SparklineScale) -> Option<Vec<SparkPoint>> {
    let hours = day.hour.as_ref().filter(|h| !h.is_empty())?;
    let temps: Vec<f64> = hours.iter().take(MAX_HOURLY_POINTS).map(|h| h.temp_c).collect();
    Some(sparkline(&temps, scale))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeekdayStyle {
    #[default]
    Long,
    Short,
}

pub const TODAY_LABEL: &str = "Today";

pub fn day_label(index: usize, date: NaiveDate, style: WeekdayStyle) -> String {
    if index == 0 {
        return TODAY_LABEL.to_string();
    }
    match style {
        WeekdayStyle::Long => date.format("%A").to_string(),
        WeekdayStyle::Short => date.format("%a").to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Precipitation {
    Chance(u8),
    Total(f64),
    NoData,
}

pub const NO_DATA_MARKER: &str = "N/A";

impl fmt::Display for Precipitation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Precipitation::Chance(pct) => write!(f, "{pct}%"),
            Precipitation::Total(mm) => write!(f, "{mm} mm"),
            Precipitation::NoData => f.write_str(NO_DATA_MARKER),
        }
    }
}

/// Chance of rain if reported, else total precipitation, else [`Precipitation::NoData`].
pub fn precipitation_summary(day: &ForecastDay) -> Precipitation {
    match (day.day.daily_chance_of_rain, day.day.totalprecip_mm) {
        (Some(pct), _) => Precipitation::Chance(pct),
        (None, Some(mm)) => Precipitation::Total(mm),
        (None, None) => Precipitation::NoData,
    }
}

/// Chance of snow in percent; an absent value reads as 0.
pub fn snow_chance(day: &ForecastDay) -> u8 {
    day.day.daily_chance_of_snow.unwrap_or(0)
}

/// One line of the forecast list.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRow {
    pub label: String,
    pub condition: String,
    pub icon: String,
    pub high_c: i64,
    pub low_c: i64,
    pub precipitation: Precipitation,
    pub snow_chance_pct: u8,
}

pub fn forecast_rows(payload: &ForecastPayload, style: WeekdayStyle) -> Vec<ForecastRow> {
    payload
        .days()
        .iter()
        .enumerate()
        .map(|(i, day)| ForecastRow {
            label: day_label(i, day.date, style),
            condition: day.day.condition.text.clone(),
            icon: day.day.condition.icon.clone(),
            high_c: high_temperature(day),
            low_c: low_temperature(day),
            precipitation: precipitation_summary(day),
            snow_chance_pct: snow_chance(day),
        })
        .collect()
}
