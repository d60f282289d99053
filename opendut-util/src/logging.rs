use std::fs::File;
use std::path::PathBuf;
use std::str::FromStr;

use tracing_subscriber::filter::{Directive, EnvFilter, LevelFilter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub const LOG_ENV_VAR: &str = "OPENDUT_LOG";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unable to initialize tracing: {source}")]
    TracingFilterFromEnv { #[from] source: tracing_subscriber::filter::FromEnvError },
    #[error("Unable to initialize tracing: {source}")]
    TracingFilterParse { #[from] source: tracing_subscriber::filter::ParseError },
    #[error("Unable to initialize tracing: {source}")]
    TracingInit { #[from] source: tracing_subscriber::util::TryInitError },
    #[error("Failed to open log file at '{path}': {source}")]
    LogFile { path: PathBuf, #[source] source: std::io::Error },
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingConfigError {
    #[error("Failed to parse configuration from field: '{field}'")]
    ValueParseError { field: String },
}

pub fn initialize() -> Result<(), Error> {
    initialize_with_config(LoggingConfig::default())
}

/// Installs the global tracing subscriber.
///
/// The filter is read from the `OPENDUT_LOG` environment variable and defaults to `info`, with
/// events of openDuT crates always passing at `trace` level.
pub fn initialize_with_config(config: LoggingConfig) -> Result<(), Error> {

    let tracing_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var(LOG_ENV_VAR)
        .from_env()?
        .add_directive(Directive::from_str("opendut=trace")?);

    let stdout_logging_layer =
        if config.logging_stdout {
            Some(tracing_subscriber::fmt::layer()
                .compact())
        } else {
            None
        };

    let file_logging_layer =
        if let Some(path) = config.file_logging {

            let log_file = File::options()
                .append(true)
                .create(true)
                .open(&path)
                .map_err(|source| Error::LogFile { path, source })?;

            Some(tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(log_file))
        } else {
            None
        };

    tracing_subscriber::registry()
        .with(tracing_filter)
        .with(stdout_logging_layer)
        .with(file_logging_layer)
        .try_init()?;

    Ok(())
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub logging_stdout: bool,
    pub file_logging: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            logging_stdout: true,
            file_logging: None,
        }
    }
}

#[cfg(feature = "settings")]
impl LoggingConfig {
    /// Reads the optional fields `logging.stdout` and `logging.file`.
    pub fn load(config: &config::Config) -> Result<Self, LoggingConfigError> {
        let defaults = LoggingConfig::default();

        let field = String::from("logging.stdout");
        let logging_stdout = match config.get_bool(&field) {
            Ok(value) => value,
            Err(config::ConfigError::NotFound(_)) => defaults.logging_stdout,
            Err(_) => return Err(LoggingConfigError::ValueParseError { field }),
        };

        let field = String::from("logging.file");
        let file_logging = match config.get_string(&field) {
            Ok(value) => Some(PathBuf::from(value)),
            Err(config::ConfigError::NotFound(_)) => defaults.file_logging,
            Err(_) => return Err(LoggingConfigError::ValueParseError { field }),
        };

        Ok(LoggingConfig {
            logging_stdout,
            file_logging,
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_fs::fixture::PathChild;
    use assert_fs::TempDir;
    use googletest::prelude::*;

    use super::*;

    #[cfg(feature = "settings")]
    fn config_from(toml: &str) -> anyhow::Result<config::Config> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?;
        Ok(config)
    }

    #[cfg(feature = "settings")]
    #[test]
    fn should_load_logging_config() -> anyhow::Result<()> {
        let config = config_from(r#"
            [logging]
            stdout = false
            file = "/var/log/opendut/parameters.log"
        "#)?;

        let logging_config = LoggingConfig::load(&config)?;

        assert_that!(logging_config.logging_stdout, eq(false));
        assert_that!(logging_config.file_logging, some(eq(PathBuf::from("/var/log/opendut/parameters.log"))));
        Ok(())
    }

    #[cfg(feature = "settings")]
    #[test]
    fn should_fall_back_to_defaults_for_missing_fields() -> anyhow::Result<()> {
        let logging_config = LoggingConfig::load(&config_from("")?)?;

        assert_that!(logging_config.logging_stdout, eq(true));
        assert_that!(logging_config.file_logging, none());
        Ok(())
    }

    #[cfg(feature = "settings")]
    #[test]
    fn should_reject_a_malformed_field() -> anyhow::Result<()> {
        let config = config_from(r#"
            [logging]
            stdout = "sometimes"
        "#)?;

        let result = LoggingConfig::load(&config);

        let Err(LoggingConfigError::ValueParseError { field }) = result else {
            panic!("Expected a parse error.");
        };
        assert_that!(field, eq("logging.stdout"));
        Ok(())
    }

    #[test]
    fn should_fail_for_a_log_file_in_a_missing_directory() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let path = temp.child("missing").child("parameters.log").path().to_path_buf();

        let result = initialize_with_config(LoggingConfig {
            logging_stdout: false,
            file_logging: Some(Clone::clone(&path)),
        });

        assert_that!(result.map_err(|error| error.to_string()), err(contains_substring(path.display().to_string())));
        Ok(())
    }
}
