use std::fmt::{self, Write};

use weather_core::{
    ForecastPayload,
    presentation::{
        AmbientEffect, CurrentStats, SparkPoint, SparklineScale, WeekdayStyle,
        daily_max_sparkline, forecast_rows, hourly_sparkline, round_half_up,
    },
};

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub hourly: bool,
    pub short: bool,
}

/// `y` lands directly on a [`BARS`] index; `x` is unused.
const BAR_SCALE: SparklineScale =
    SparklineScale { width: 1.0, amplitude: (BARS.len() - 1) as f64, base_offset: 0.0 };

fn bars(points: &[SparkPoint]) -> String {
    points
        .iter()
        .map(|p| {
            let idx = round_half_up(p.y).clamp(0, BARS.len() as i64 - 1) as usize;
            BARS[idx]
        })
        .collect()
}

fn effect_label(effect: AmbientEffect) -> String {
    match effect {
        AmbientEffect::Rain { drops } => format!("rain overlay, {drops} drops"),
        AmbientEffect::Snow { flakes } => format!("snow overlay, {flakes} flakes"),
        AmbientEffect::Lightning { bolts } => format!("lightning overlay, {bolts} bolts"),
    }
}

pub fn render_forecast(payload: &ForecastPayload, options: RenderOptions) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_forecast(&mut out, payload, options)?;
    Ok(out)
}

fn write_forecast(
    out: &mut String,
    payload: &ForecastPayload,
    options: RenderOptions,
) -> fmt::Result {
    let Some(stats) = CurrentStats::from_payload(payload) else {
        return writeln!(out, "No forecast data");
    };

    let theme = payload.theme();
    writeln!(out, "{}", stats.location)?;
    writeln!(out, "{}°C  {}", stats.temperature_c, stats.condition)?;
    writeln!(out, "H: {}°  L: {}°", stats.high_c, stats.low_c)?;
    match theme.ambient_effect() {
        Some(effect) => writeln!(out, "Theme: {theme} ({})", effect_label(effect))?,
        None => writeln!(out, "Theme: {theme}")?,
    }
    writeln!(out)?;

    writeln!(out, "More Details")?;
    writeln!(out, "  Feels like  {}°", stats.feels_like_c)?;
    writeln!(out, "  Humidity    {}%", stats.humidity_pct)?;
    writeln!(out, "  Wind Speed  {} km/h", stats.wind_kph)?;
    writeln!(out, "  UV Index    {}", stats.uv_index)?;
    writeln!(out, "  Visibility  {} km", stats.visibility_km)?;
    writeln!(out, "  Sunrise     {}", stats.sunrise)?;
    writeln!(out, "  Sunset      {}", stats.sunset)?;
    if let Some(updated) = &stats.last_updated {
        writeln!(out, "  Updated     {updated}")?;
    }
    writeln!(out)?;

    let style = if options.short { WeekdayStyle::Short } else { WeekdayStyle::Long };
    let rows = forecast_rows(payload, style);
    writeln!(out, "{}-Day Forecast", rows.len())?;
    for row in &rows {
        writeln!(
            out,
            "  {:<10} {:>4}° {:>4}°  rain {:<7} snow {:>3}%  {}",
            row.label,
            row.high_c,
            row.low_c,
            row.precipitation.to_string(),
            row.snow_chance_pct,
            row.condition
        )?;
    }

    let highs = daily_max_sparkline(payload, &BAR_SCALE);
    writeln!(out, "  Highs  {}", bars(&highs))?;

    if options.hourly {
        if let Some(points) = payload.today().and_then(|today| hourly_sparkline(today, &BAR_SCALE)) {
            writeln!(out, "  Hourly {}", bars(&points))?;
        }
    }

    Ok(())
}
