use anyhow::Result;
use chrono::Local;
use log::{error, info};
use crate::errors::RunError;
use crate::initialization::init;
use crate::worker::run;

mod config;
mod errors;
mod extraction;
mod initialization;
mod logging;
mod manager_charts;
mod manager_forecast;
pub mod models;
mod worker;

fn main() -> Result<()> {
    // Load config, set up logging and managers. If initialization fails there is no logger yet,
    // so the error only reaches the scheduler through the exit status.
    let (config, mgr) = match init() {
        Ok((c, m)) => (c, m),
        Err(e) => {
            return Err(RunError(format!("Initialization failed: {}", e)))?;
        }
    };

    match run(&config, &mgr, Local::now().date_naive()) {
        Ok(report) => {
            info!("Charts created: {}, {}", report.temperature_chart.display(), report.wind_chart.display());
        },
        Err(e) => {
            error!("Run failed: {}", e);
            return Err(RunError(format!("Run failed: {}", e)))?;
        }
    }

    Ok(())
}
