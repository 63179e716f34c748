//! Process-wide tracing setup.
//!
//! Entry points call [`init_tracing`] once before any assistant call. A second
//! call fails instead of silently keeping the first configuration.

use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::assistant::core::config::LoggingConfig;
use crate::assistant::core::errors::{AssistantError, AssistantResult};

/// Install the global subscriber: console output plus an optional log file.
///
/// `RUST_LOG` takes precedence over the configured filter.
///
/// # Errors
/// Returns an error if the filter is invalid, the log file cannot be opened,
/// or a global subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> AssistantResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .map_err(|err| AssistantError::Logging(err.to_string()))?;

    let file_layer = match &config.file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(file_layer)
        .try_init()
        .map_err(|err| AssistantError::Logging(err.to_string()))
}
