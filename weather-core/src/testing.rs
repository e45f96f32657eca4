//! Payload fixtures shared by unit tests.

use serde_json::{Value, json};

use crate::model::ForecastPayload;

fn condition(text: &str, code: i32) -> Value {
    json!({
        "text": text,
        "icon": format!("//cdn.weatherapi.com/weather/64x64/day/{code}.png"),
        "code": code
    })
}

fn location() -> Value {
    json!({ "name": "Kochi", "country": "India", "localtime": "2024-06-01 14:10" })
}

fn current() -> Value {
    json!({
        "temp_c": 28.7,
        "temp_f": 83.7,
        "feelslike_c": 33.6,
        "feelslike_f": 92.5,
        "condition": condition("Moderate rain", 1189),
        "wind_kph": 14.4,
        "wind_mph": 8.9,
        "humidity": 79,
        "uv": 6.0,
        "vis_km": 8.0,
        "vis_miles": 4.0
    })
}

fn day(date: &str, max: f64, min: f64, extra: Value) -> Value {
    let mut summary = json!({
        "maxtemp_c": max,
        "maxtemp_f": max * 9.0 / 5.0 + 32.0,
        "mintemp_c": min,
        "mintemp_f": min * 9.0 / 5.0 + 32.0,
        "condition": condition("Patchy rain nearby", 1063)
    });
    if let (Some(target), Some(fields)) = (summary.as_object_mut(), extra.as_object()) {
        for (k, v) in fields {
            target.insert(k.clone(), v.clone());
        }
    }
    json!({
        "date": date,
        "day": summary,
        "astro": { "sunrise": "06:12 AM", "sunset": "06:31 PM" }
    })
}

/// One day, no optional fields anywhere.
pub(crate) fn minimal_payload_json() -> Value {
    json!({
        "location": location(),
        "current": current(),
        "forecast": { "forecastday": [day("2024-06-01", 30.0, 24.0, json!({}))] }
    })
}

/// Three days covering each precipitation case; day 0 has 26 hourly entries.
pub(crate) fn sample_payload() -> ForecastPayload {
    let hours: Vec<Value> = (0..26)
        .map(|h| json!({ "time": format!("2024-06-01 {:02}:00", h % 24), "temp_c": 20.0 + h as f64, "temp_f": 68.0 }))
        .collect();

    let mut today = day(
        "2024-06-01",
        23.4,
        21.6,
        json!({ "daily_chance_of_rain": 40, "totalprecip_mm": 5.0, "daily_chance_of_snow": 15 }),
    );
    today["hour"] = Value::Array(hours);

    let mut json = json!({
        "location": location(),
        "current": current(),
        "forecast": { "forecastday": [
            today,
            day("2024-06-02", 23.6, 20.0, json!({ "totalprecip_mm": 2.1 })),
            day("2024-06-03", 25.0, 19.5, json!({})),
        ] }
    });
    json["current"]["last_updated"] = json!("2024-06-01 14:05");

    serde_json::from_value(json).expect("sample payload fixture must parse")
}

pub(crate) fn ten_day_payload() -> ForecastPayload {
    let days: Vec<Value> = (1..=10)
        .map(|d| day(&format!("2024-06-{d:02}"), 20.0 + d as f64, 15.0, json!({})))
        .collect();
    let json = json!({
        "location": location(),
        "current": current(),
        "forecast": { "forecastday": days }
    });
    serde_json::from_value(json).expect("ten day fixture must parse")
}
