use std::collections::HashSet;
use std::{env, fs};
use log::LevelFilter;
use serde::Deserialize;
use thiserror::Error;

/// Environment variable holding the forecast API key, takes precedence over the config file
pub const API_KEY_ENV: &str = "WEATHER_API_KEY";

#[derive(Deserialize, Clone, Debug)]
pub struct City {
    pub name: String,
    pub lat: f64,
    pub long: f64,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ForecastParameters {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_limit")]
    pub limit: u8,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ChartParameters {
    pub detail_city: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default)]
    pub labels: ChartLabels,
}

/// Chart captions and axis texts, '{city}' in 'wind_title' is replaced with the city name
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ChartLabels {
    pub temperature_title: String,
    pub date_axis: String,
    pub temperature_axis: String,
    pub avg_temperature_legend: String,
    pub wind_title: String,
    pub humidity_axis: String,
    pub wind_axis: String,
    pub humidity_legend: String,
    pub wind_legend: String,
}

impl Default for ChartLabels {
    fn default() -> Self {
        ChartLabels {
            temperature_title: "Сравнение средней температуры по городам".to_string(),
            date_axis: "Дата".to_string(),
            temperature_axis: "Температура, °C".to_string(),
            avg_temperature_legend: "Avg Temp".to_string(),
            wind_title: "Влажность и скорость ветра в {city}".to_string(),
            humidity_axis: "Влажность (%)".to_string(),
            wind_axis: "Скорость ветра (м/с)".to_string(),
            humidity_legend: "Влажность".to_string(),
            wind_legend: "Скорость ветра".to_string(),
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct Files {
    pub output_dir: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct General {
    pub log_path: String,
    pub log_level: LevelFilter,
    pub log_to_stdout: bool,
}

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub general: General,
    pub forecast: ForecastParameters,
    pub charts: ChartParameters,
    pub files: Files,
    pub cities: Vec<City>,
}

fn default_url() -> String {
    "https://api.weather.yandex.ru/v2/forecast".to_string()
}

fn default_limit() -> u8 { 7 }

fn default_width() -> u32 { 1400 }

fn default_height() -> u32 { 700 }

/// Loads the configuration file and returns a struct with all configuration items
///
/// # Arguments
///
/// * 'config_path' - path to the configuration file
pub fn load_config(config_path: &str) -> Result<Config, LoadConfigurationError> {
    let toml = fs::read_to_string(config_path)
        .map_err(|e| LoadConfigurationError::ReadError(format!("{}: {}", config_path, e)))?;

    parse_config(&toml, env::var(API_KEY_ENV).ok())
}

/// Parses and validates configuration
///
/// # Arguments
///
/// * 'toml' - configuration document
/// * 'env_api_key' - API key from the environment, overrides the one in the document
pub fn parse_config(toml: &str, env_api_key: Option<String>) -> Result<Config, LoadConfigurationError> {
    let mut config: Config = toml::from_str(toml)?;

    if let Some(key) = env_api_key.filter(|k| !k.trim().is_empty()) {
        config.forecast.api_key = Some(key);
    }

    validate(&config)?;

    Ok(config)
}

/// Checks the configuration for values the pipeline can't work with
///
/// # Arguments
///
/// * 'config' - the configuration to validate
fn validate(config: &Config) -> Result<(), LoadConfigurationError> {
    if config.forecast.api_key.as_deref().is_none_or(|k| k.trim().is_empty()) {
        return Err(LoadConfigurationError::InvalidValue(
            format!("no forecast api key, set forecast.api_key or {}", API_KEY_ENV)));
    }
    if config.forecast.limit == 0 {
        return Err(LoadConfigurationError::InvalidValue("forecast.limit must be at least 1".into()));
    }
    if config.charts.width == 0 || config.charts.height == 0 {
        return Err(LoadConfigurationError::InvalidValue("chart dimensions must be non-zero".into()));
    }
    if config.cities.is_empty() {
        return Err(LoadConfigurationError::InvalidValue("at least one city must be configured".into()));
    }

    let mut names = HashSet::new();
    for city in config.cities.iter() {
        if !names.insert(city.name.as_str()) {
            return Err(LoadConfigurationError::InvalidValue(format!("duplicate city: {}", city.name)));
        }
    }

    if !names.contains(config.charts.detail_city.as_str()) {
        return Err(LoadConfigurationError::InvalidValue(
            format!("charts.detail_city {} is not among the configured cities", config.charts.detail_city)));
    }

    Ok(())
}

/// Error depicting errors that occur while loading the configuration
///
#[derive(Debug, Error)]
pub enum LoadConfigurationError {
    #[error("ReadError: {0}")]
    ReadError(String),
    #[error("ParseError: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("InvalidValue: {0}")]
    InvalidValue(String),
}
