use std::env;
use std::path::Path;
use log::info;
use thiserror::Error;
use crate::config::{load_config, Config, LoadConfigurationError};
use crate::logging::{setup_logger, LoggerError};
use crate::manager_charts::Charts;
use crate::manager_forecast::{Forecast, ForecastError};

pub struct Mgr {
    pub forecast: Forecast,
    pub charts: Charts,
}

impl Mgr {
    /// Instantiates all managers from configuration
    ///
    /// # Arguments
    ///
    /// * 'config' - configuration to use
    pub fn new(config: &Config) -> Result<Mgr, InitializationError> {
        let forecast = Forecast::new(&config.forecast)?;
        let charts = Charts::new(&config.charts, Path::new(&config.files.output_dir));

        Ok(Mgr { forecast, charts })
    }
}

/// Initializes and returns configuration and a Mgr struct holding the initialized managers
///
pub fn init() -> Result<(Config, Mgr), InitializationError> {
    let config_path = config_path(env::args())?;

    // Load configuration
    let config = load_config(&config_path)?;

    // Setup logging
    let _ = setup_logger(&config.general.log_path, config.general.log_level, config.general.log_to_stdout)?;

    // Print version
    info!("starting weather charts version: {}", env!("CARGO_PKG_VERSION"));

    let mgr = Mgr::new(&config)?;

    Ok((config, mgr))
}

/// Picks the configuration file path from a '--config=<path>' argument
///
/// # Arguments
///
/// * 'args' - command line arguments
fn config_path(mut args: impl Iterator<Item = String>) -> Result<String, InitializationError> {
    args.find_map(|a| a.strip_prefix("--config=").map(String::from))
        .filter(|p| !p.is_empty())
        .ok_or(InitializationError::ArgumentError("missing --config=<path> argument".into()))
}

/// Error depicting errors that occur while initializing
///
#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("ArgumentError: {0}")]
    ArgumentError(String),
    #[error("ConfigurationError: {0}")]
    ConfigurationError(#[from] LoadConfigurationError),
    #[error("SetupLoggerError: {0}")]
    SetupLoggerError(#[from] LoggerError),
    #[error("ForecastSetupError: {0}")]
    ForecastSetupError(#[from] ForecastError),
}
