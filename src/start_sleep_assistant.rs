//! Startup helpers shared by the `sleep-assistant` and `sleep-assistant-server` binaries.
//!
//! Each entry point reads an optional `.env` file, loads configuration, installs
//! logging once, waits for the model runtime, connects the knowledge index, then
//! hands control to its adapter.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use crate::assistant::core::config::{AssistantConfig, LoggingConfig};
use crate::assistant::core::errors::{AssistantError, AssistantResult};
use crate::assistant::engine::orchestrator::{AssistantBackends, TurnOrchestrator};
use crate::assistant::llm::readiness::wait_for_ollama;
use crate::assistant::logging::init_tracing;
use crate::assistant::validation::validator::MessageValidator;
use crate::cli;
use crate::server::{self, AppState};

/// Overrides for the HTTP listener taken from the command line.
#[derive(Clone, Debug, Default)]
pub struct ServerOverrides {
    /// Bind address.
    pub host: Option<String>,
    /// Listen port.
    pub port: Option<u16>,
}

/// Load and validate configuration from the environment.
///
/// # Errors
/// Returns an error if a variable is malformed or a setting is invalid.
pub fn load_config() -> AssistantResult<AssistantConfig> {
    let config = AssistantConfig::from_env()?;
    config.validate()?;
    Ok(config)
}

/// Result of looking for a `.env` file.
#[derive(Debug)]
enum EnvFile {
    Loaded(PathBuf),
    Missing,
    Unreadable(dotenvy::Error),
}

impl EnvFile {
    fn from_result(result: dotenvy::Result<PathBuf>) -> Self {
        match result {
            Ok(path) => Self::Loaded(path),
            Err(e) if e.not_found() => Self::Missing,
            Err(e) => Self::Unreadable(e),
        }
    }

    fn log(&self) {
        match self {
            Self::Loaded(path) => tracing::info!("Loaded environment from {}", path.display()),
            Self::Missing => tracing::debug!("No .env file found, using process environment"),
            Self::Unreadable(e) => {
                tracing::warn!(".env not loaded: {e} (using process environment)");
            }
        }
    }
}

/// Read `.env` without overriding variables already set.
fn load_env_file() -> EnvFile {
    EnvFile::from_result(dotenvy::dotenv())
}

/// Load configuration and install logging. Exits the process on failure.
fn bootstrap() -> Result<AssistantConfig, ExitCode> {
    let env_file = load_env_file();
    match load_config() {
        Ok(config) => match init_tracing(&config.logging) {
            Ok(()) => {
                env_file.log();
                Ok(config)
            }
            Err(e) => {
                eprintln!("Failed to initialize logging: {e}");
                Err(ExitCode::from(1))
            }
        },
        Err(e) => {
            if init_tracing(&LoggingConfig::default()).is_err() {
                eprintln!("Invalid configuration: {e}");
            } else {
                env_file.log();
                tracing::error!("Invalid configuration: {e}");
            }
            Err(ExitCode::from(1))
        }
    }
}

fn runtime() -> Result<tokio::runtime::Runtime, ExitCode> {
    tokio::runtime::Runtime::new().map_err(|e| {
        tracing::error!("Failed to create runtime: {e}");
        ExitCode::from(1)
    })
}

async fn wait_for_model(config: &AssistantConfig) -> AssistantResult<()> {
    tracing::info!("Ollama endpoint: {}", config.llm.base_url);
    wait_for_ollama(
        &config.llm.base_url,
        Duration::from_secs(config.llm.startup_timeout_seconds),
    )
    .await
}

/// Run the interactive terminal assistant.
///
/// # Returns
/// `ExitCode::SUCCESS` when the user leaves the loop, `1` on startup failure.
#[must_use]
pub fn run_cli() -> ExitCode {
    let config = match bootstrap() {
        Ok(config) => config,
        Err(code) => return code,
    };
    let rt = match runtime() {
        Ok(rt) => rt,
        Err(code) => return code,
    };

    let result: AssistantResult<()> = rt.block_on(async {
        wait_for_model(&config).await?;
        let backends = AssistantBackends::from_config(&config).await?;
        let orchestrator = TurnOrchestrator::new(backends, &config);
        let validator = MessageValidator::new()?;
        cli::run_stdio(&orchestrator, &validator, config.conversation.history_window).await?;
        Ok(())
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Sleep assistant failed: {e}");
            ExitCode::from(1)
        }
    }
}

/// Run the HTTP server until Ctrl+C.
///
/// # Returns
/// `ExitCode::SUCCESS` on graceful shutdown, `1` on failure.
#[must_use]
pub fn run_server(overrides: ServerOverrides) -> ExitCode {
    let mut config = match bootstrap() {
        Ok(config) => config,
        Err(code) => return code,
    };
    if let Some(host) = overrides.host {
        config.server.host = host;
    }
    if let Some(port) = overrides.port {
        config.server.port = port;
    }
    tracing::info!("Starting sleep assistant v{}", env!("CARGO_PKG_VERSION"));

    let addr = match listen_addr(&config.server.host, config.server.port) {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::from(1);
        }
    };
    let rt = match runtime() {
        Ok(rt) => rt,
        Err(code) => return code,
    };

    let state = match rt.block_on(async {
        wait_for_model(&config).await?;
        AppState::from_config(&config).await
    }) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to create state: {e}");
            return ExitCode::from(1);
        }
    };

    if let Err(e) = rt.block_on(server::run_server_with_shutdown(
        state,
        addr,
        server::ctrl_c_signal(),
    )) {
        tracing::error!("Server error: {e}");
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}

/// Parse the configured bind address.
///
/// # Errors
/// Returns an error if `host` is not an IP address.
pub fn listen_addr(host: &str, port: u16) -> AssistantResult<SocketAddr> {
    let ip: IpAddr = host.parse().map_err(|_| {
        AssistantError::InvalidConfig(format!("server host must be an IP address, got '{host}'"))
    })?;
    Ok(SocketAddr::new(ip, port))
}
