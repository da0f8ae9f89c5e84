//! Daily weather conversion.
//!
//! Maps the first AgMIP weather series onto MONICA's climate CSV: one row per
//! day in input order, wind converted from km/day to m/s.

use crate::constants::{
    CLIMATE_COLUMNS, CLIMATE_UNITS, MONICA_DATE_FORMAT, units::KM_PER_DAY_PER_M_PER_S,
    weather_fields,
};
use crate::document::{AgMipDocument, check_fields, parse_f64_or_zero, parse_required_date};
use crate::error::{ConvertError, Result};
use crate::models::{DailyWeather, Diagnostics};
use csv::WriterBuilder;
use serde_json::Value;
use std::io::Write;
use tracing::{debug, info, warn};

/// Converted weather series and its diagnostics
#[derive(Debug, Clone, Default)]
pub struct WeatherConversion {
    pub days: Vec<DailyWeather>,
    pub diagnostics: Diagnostics,
}

/// Convert every daily record of the first weather series
pub fn convert_weather(document: &AgMipDocument) -> Result<WeatherConversion> {
    let records = document.daily_weather()?;
    let mut conversion = WeatherConversion {
        days: Vec::with_capacity(records.len()),
        diagnostics: Diagnostics::new(),
    };

    for (index, record) in records.iter().enumerate() {
        if let Some(report) = check_fields(record, weather_fields::REQUIRED, "weather") {
            conversion.diagnostics.push(report);
        }

        match daily_weather_from_record(record) {
            Ok(day) => conversion.days.push(day),
            Err(e @ ConvertError::InvalidDate { .. }) => {
                warn!("Skipping weather record {}: {}", index, e);
                conversion
                    .diagnostics
                    .skip(format!("weather record {}: {}", index, e));
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        "Converted {} of {} weather records",
        conversion.days.len(),
        records.len()
    );
    Ok(conversion)
}

/// Map one AgMIP daily record to MONICA units. Missing values become zero.
pub fn daily_weather_from_record(record: &Value) -> Result<DailyWeather> {
    let date = parse_required_date(record, weather_fields::DATE)?;
    let wind_km_per_day = parse_f64_or_zero(record, weather_fields::WIND)?;

    let day = DailyWeather {
        date,
        tavg: parse_f64_or_zero(record, weather_fields::TAVG)?,
        tmin: parse_f64_or_zero(record, weather_fields::TMIN)?,
        tmax: parse_f64_or_zero(record, weather_fields::TMAX)?,
        globrad: parse_f64_or_zero(record, weather_fields::RADIATION)?,
        precip: parse_f64_or_zero(record, weather_fields::RAIN)?,
        relhumid: parse_f64_or_zero(record, weather_fields::HUMIDITY)?,
        wind: wind_km_per_day / KM_PER_DAY_PER_M_PER_S,
    };

    debug!("Weather {}: tavg={} wind={:.2} m/s", day.date, day.tavg, day.wind);
    Ok(day)
}

/// Fixed-point, two decimals, '.' separator. Halves round away from zero
/// (`0.125` -> `0.13`), where `{:.2}` alone would round them to even.
fn format_value(value: f64) -> String {
    format!("{:.2}", (value * 100.0).round() / 100.0)
}

/// CSV fields of one day, including the empty trailing field
fn csv_row(day: &DailyWeather) -> Vec<String> {
    vec![
        day.date.format(MONICA_DATE_FORMAT).to_string(),
        format_value(day.tavg),
        format_value(day.tmin),
        format_value(day.tmax),
        format_value(day.wind),
        format_value(day.globrad),
        format_value(day.precip),
        format_value(day.relhumid),
        String::new(),
    ]
}

/// Write the climate CSV: column names, units, then one row per day.
/// Every line ends in a separator, as MONICA's reference files do.
pub fn write_climate_csv<W: Write>(days: &[DailyWeather], writer: W) -> Result<()> {
    let mut csv_writer = WriterBuilder::new()
        .has_headers(false)
        .flexible(false)
        .from_writer(writer);

    csv_writer.write_record(CLIMATE_COLUMNS.iter().chain(std::iter::once(&"")))?;
    csv_writer.write_record(CLIMATE_UNITS.iter().chain(std::iter::once(&"")))?;

    for day in days {
        csv_writer.write_record(csv_row(day))?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Climate CSV as a string
pub fn render_climate_csv(days: &[DailyWeather]) -> Result<String> {
    let mut buffer = Vec::new();
    write_climate_csv(days, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
