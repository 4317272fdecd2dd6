//! Structured logging via the `tracing` crate.
//!
//! Text or JSON output to stdout or stderr. The `QUESTREE_LOG` environment
//! variable overrides the configured level filter, including per-module
//! directives.

use crate::error::QuestError;
use serde::{Deserialize, Serialize};
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_level")]
    pub level: String,

    /// Output format: json, text
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr
    #[serde(default = "default_output")]
    pub output: String,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
            output: default_output(),
        }
    }
}

/// Initialize the global subscriber. `QUESTREE_LOG` wins over the
/// configured level.
pub fn init_logging(config: &LoggingConfig) -> Result<(), QuestError> {
    let filter = match EnvFilter::try_from_env("QUESTREE_LOG") {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| {
            QuestError::Logging(format!("invalid log level '{}': {}", config.level, e))
        })?,
    };
    let to_stderr = parse_output(&config.output)?;
    let base = Registry::default().with(filter);

    match (config.format.as_str(), to_stderr) {
        ("json", true) => base
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::io::stderr),
            )
            .init(),
        ("json", false) => base
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::io::stdout),
            )
            .init(),
        ("text", true) => base
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::io::stderr),
            )
            .init(),
        ("text", false) => base
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::io::stdout),
            )
            .init(),
        (other, _) => {
            return Err(QuestError::Logging(format!(
                "invalid log format: {} (must be 'json' or 'text')",
                other
            )))
        }
    }
    Ok(())
}

fn parse_output(output: &str) -> Result<bool, QuestError> {
    match output {
        "stderr" => Ok(true),
        "stdout" => Ok(false),
        other => Err(QuestError::Logging(format!(
            "invalid log output: {} (must be 'stdout' or 'stderr')",
            other
        ))),
    }
}
