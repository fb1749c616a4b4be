use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Handle;
use thiserror::Error;

const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {h({l})} {t} - {m}{n}";

/// Sets up the logger with a file appender and, optionally, a console appender
///
/// # Arguments
///
/// * 'log_path' - path to the log file
/// * 'log_level' - level filter for the root logger
/// * 'log_to_stdout' - whether to also log to stdout
pub fn setup_logger(log_path: &str, log_level: LevelFilter, log_to_stdout: bool) -> Result<Handle, LoggerError> {
    let config = logger_config(log_path, log_level, log_to_stdout)?;

    let handle = log4rs::init_config(config)
        .map_err(|e| LoggerError::InitError(e.to_string()))?;

    Ok(handle)
}

/// Builds the log4rs configuration
///
/// # Arguments
///
/// * 'log_path' - path to the log file
/// * 'log_level' - level filter for the root logger
/// * 'log_to_stdout' - whether to also log to stdout
fn logger_config(log_path: &str, log_level: LevelFilter, log_to_stdout: bool) -> Result<Config, LoggerError> {
    let file = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build(log_path)
        .map_err(|e| LoggerError::FileAppenderError(format!("{}: {}", log_path, e)))?;

    let mut builder = Config::builder()
        .appender(Appender::builder().build("file", Box::new(file)));
    let mut root = Root::builder().appender("file");

    if log_to_stdout {
        let stdout = ConsoleAppender::builder()
            .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
            .build();
        builder = builder.appender(Appender::builder().build("stdout", Box::new(stdout)));
        root = root.appender("stdout");
    }

    builder.build(root.build(log_level))
        .map_err(|e| LoggerError::ConfigError(e.to_string()))
}

/// Error depicting errors that occur while setting up logging
///
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("FileAppenderError: {0}")]
    FileAppenderError(String),
    #[error("ConfigError: {0}")]
    ConfigError(String),
    #[error("InitError: {0}")]
    InitError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_config_with_file_and_console() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("weather.log");

        let config = logger_config(path.to_str().unwrap(), LevelFilter::Info, true).unwrap();

        assert_eq!(config.appenders().len(), 2);
        assert_eq!(config.root().level(), LevelFilter::Info);
        assert!(path.exists());
    }

    #[test]
    fn builds_config_without_console() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weather.log");

        let config = logger_config(path.to_str().unwrap(), LevelFilter::Warn, false).unwrap();

        assert_eq!(config.appenders().len(), 1);
        assert_eq!(config.root().appenders(), &["file".to_string()]);
    }
}
