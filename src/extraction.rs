use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use crate::models::{CityForecast, ForecastPoint};

#[derive(Deserialize)]
struct ForecastDocument {
    forecasts: Vec<ForecastEntry>,
}

#[derive(Deserialize)]
struct ForecastEntry {
    date: NaiveDate,
    parts: Parts,
}

#[derive(Deserialize)]
struct Parts {
    day: DayPart,
}

#[derive(Deserialize)]
struct DayPart {
    temp_avg: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: f64,
    wind_speed: f64,
}

/// Extracts the day part of every forecast entry in a decoded forecast document.
/// Entries are kept in document order, and every field is required.
///
/// # Arguments
///
/// * 'payload' - decoded forecast response body
pub fn extract(payload: &Value) -> Result<CityForecast, ExtractError> {
    let document = ForecastDocument::deserialize(payload)
        .map_err(|e| {
            let msg = e.to_string();
            if msg.starts_with("missing field") {
                ExtractError::MissingField(msg)
            } else {
                ExtractError::Document(msg)
            }
        })?;

    let points = document.forecasts
        .into_iter()
        .map(|f| ForecastPoint {
            date: f.date,
            temp_avg: f.parts.day.temp_avg,
            temp_min: f.parts.day.temp_min,
            temp_max: f.parts.day.temp_max,
            humidity: f.parts.day.humidity,
            wind_speed: f.parts.day.wind_speed,
        })
        .collect();

    Ok(CityForecast::new(points))
}

/// Error depicting errors that occur while extracting forecast points
///
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("MissingField: {0}")]
    MissingField(String),
    #[error("DocumentError: {0}")]
    Document(String),
}
