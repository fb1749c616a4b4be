use std::fs;
use std::path::{Path, PathBuf};
use chrono::NaiveDate;
use log::info;
use serde_json::Value;
use thiserror::Error;
use crate::config::{City, Config};
use crate::extraction::extract;
use crate::initialization::Mgr;
use crate::manager_charts::Charts;
use crate::manager_forecast::Forecast;
use crate::models::CityForecastCollection;

/// Paths of the charts written by a run
#[derive(Debug)]
pub struct RunReport {
    pub temperature_chart: PathBuf,
    pub wind_chart: PathBuf,
}

/// Runs the forecast chart process: fetches forecasts for all configured cities,
/// extracts them and renders the comparison charts. Nothing is rendered unless
/// every city was fetched and extracted.
///
/// # Arguments
///
/// * 'config' - configuration
/// * 'mgr' - struct with configured managers
/// * 'run_date' - the date to name the chart files by
pub fn run(config: &Config, mgr: &Mgr, run_date: NaiveDate) -> Result<RunReport, WorkerError> {
    info!("Run date: {}, cities: {}", run_date, config.cities.len());

    let documents = fetch_all(&mgr.forecast, &config.cities)?;
    let cities = extract_all(documents)?;

    render(&mgr.charts, &cities, &config.charts.detail_city, Path::new(&config.files.output_dir), run_date)
}

/// Fetches forecast documents for all cities, one after the other
///
/// # Arguments
///
/// * 'forecast' - forecast manager
/// * 'cities' - cities to fetch forecasts for
fn fetch_all(forecast: &Forecast, cities: &[City]) -> Result<Vec<(String, Value)>, WorkerError> {
    let mut documents = Vec::with_capacity(cities.len());

    for city in cities {
        let document = forecast.fetch(city.lat, city.long)
            .map_err(|e| WorkerError::FetchError(format!("{}: {}", city.name, e)))?;
        info!("Fetched forecast for {}", city.name);

        documents.push((city.name.clone(), document));
    }

    Ok(documents)
}

/// Extracts forecast points from all fetched documents, keeping the city order
///
/// # Arguments
///
/// * 'documents' - city names with their decoded forecast documents
fn extract_all(documents: Vec<(String, Value)>) -> Result<CityForecastCollection, WorkerError> {
    let mut cities = CityForecastCollection::new();

    for (city, document) in documents {
        let forecast = extract(&document)
            .map_err(|e| WorkerError::ExtractError(format!("{}: {}", city, e)))?;
        info!("Extracted {} forecast points for {}", forecast.len(), city);

        cities.insert(&city, forecast);
    }

    Ok(cities)
}

/// Renders both charts into the output directory, creating it if needed
///
/// # Arguments
///
/// * 'charts' - chart manager
/// * 'cities' - extracted forecasts
/// * 'detail_city' - city to render the humidity and wind chart for
/// * 'output_dir' - directory the charts are written to
/// * 'run_date' - the date to name the chart files by
fn render(charts: &Charts, cities: &CityForecastCollection, detail_city: &str, output_dir: &Path, run_date: NaiveDate) -> Result<RunReport, WorkerError> {
    fs::create_dir_all(output_dir)
        .map_err(|e| WorkerError::OutputDirError(format!("{}: {}", output_dir.display(), e)))?;

    let temperature_chart = charts.temperature_comparison(cities, run_date)
        .map_err(|e| WorkerError::RenderError(format!("temperature chart: {}", e)))?;
    info!("Temperature chart saved to {}", temperature_chart.display());

    let wind_chart = charts.humidity_and_wind(cities, detail_city, run_date)
        .map_err(|e| WorkerError::RenderError(format!("wind chart: {}", e)))?;
    info!("Humidity and wind chart saved to {}", wind_chart.display());

    Ok(RunReport { temperature_chart, wind_chart })
}

/// Error depicting errors that occur while running the forecast chart process
///
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("error while fetching forecast: {0}")]
    FetchError(String),
    #[error("error while extracting forecast: {0}")]
    ExtractError(String),
    #[error("error while creating output directory: {0}")]
    OutputDirError(String),
    #[error("error while rendering chart: {0}")]
    RenderError(String),
}
