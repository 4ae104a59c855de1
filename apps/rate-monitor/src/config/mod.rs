//! Configuration module for the rate monitor.
//!
//! Loads a YAML file with environment variable interpolation and validates
//! every section before the service starts.
//!
//! # Usage
//!
//! ```rust,ignore
//! use rate_monitor::config::{Config, load_config};
//!
//! // Load from $RATE_MONITOR_CONFIG, falling back to config.yaml
//! let config = load_config(None)?;
//!
//! // Load from custom path
//! let config = load_config(Some("custom/config.yaml"))?;
//!
//! println!("HTTP port: {}", config.server.http_port);
//! ```

mod bot;
mod observability;
mod persistence;
mod provider;
mod scheduler;
mod server;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use bot::BotConfig;
pub use observability::{LoggingConfig, ObservabilityConfig};
pub use persistence::PersistenceConfig;
pub use provider::ProviderConfig;
pub use scheduler::SchedulerSettings;
pub use server::ServerConfig;

use crate::domain::shared::Symbol;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "RATE_MONITOR_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

const LOG_FORMATS: [&str; 2] = ["json", "pretty"];

/// Longest accepted scheduler period: one week.
const MAX_INTERVAL_SECS: u64 = 7 * 24 * 60 * 60;

/// Longest accepted Bot API long-poll wait.
const MAX_POLL_TIMEOUT_SECS: u64 = 300;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Quote provider configuration.
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Tick intervals.
    #[serde(default)]
    pub scheduler: SchedulerSettings,
    /// Snapshot store configuration.
    #[serde(default)]
    pub persistence: PersistenceConfig,
    /// Chat bot configuration.
    #[serde(default)]
    pub bot: BotConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Configured symbols, normalized.
    #[must_use]
    pub fn symbols(&self) -> Vec<Symbol> {
        self.provider.symbols.iter().map(Symbol::new).collect()
    }
}

// ============================================
// Configuration Loading
// ============================================

/// Resolve the config file path: explicit argument, then
/// `RATE_MONITOR_CONFIG`, then `config.yaml`.
#[must_use]
pub fn config_path(path: Option<&str>) -> String {
    path.map(str::to_string)
        .or_else(|| std::env::var(CONFIG_PATH_ENV).ok().filter(|p| !p.is_empty()))
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
}

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = config_path(path);

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError(message.into())
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let provider = &config.provider;

    if provider.symbols.is_empty() {
        return Err(invalid("provider.symbols must not be empty"));
    }

    let mut seen = HashSet::new();
    for symbol in config.symbols() {
        symbol
            .validate()
            .map_err(|e| invalid(format!("provider.symbols: {e}")))?;
        if !seen.insert(symbol.clone()) {
            return Err(invalid(format!("provider.symbols has duplicate {symbol}")));
        }
    }

    if provider.quote_currency.trim().is_empty() {
        return Err(invalid("provider.quote_currency must not be empty"));
    }

    if provider.timeout_ms == 0 {
        return Err(invalid("provider.timeout_ms must be positive"));
    }

    if config.scheduler.monitor_interval_secs == 0 {
        return Err(invalid("scheduler.monitor_interval_secs must be positive"));
    }

    if config.scheduler.hourly_interval_secs == 0 {
        return Err(invalid("scheduler.hourly_interval_secs must be positive"));
    }

    if config.scheduler.monitor_interval_secs > MAX_INTERVAL_SECS
        || config.scheduler.hourly_interval_secs > MAX_INTERVAL_SECS
    {
        return Err(invalid(format!(
            "scheduler intervals must not exceed {MAX_INTERVAL_SECS} seconds"
        )));
    }

    if config.persistence.database_url.trim().is_empty() {
        return Err(invalid("persistence.database_url must not be empty"));
    }

    if config.persistence.max_connections == 0 {
        return Err(invalid("persistence.max_connections must be positive"));
    }

    if config.bot.enabled && config.bot.token.trim().is_empty() {
        return Err(invalid("bot.token is required when bot.enabled is true"));
    }

    if config.bot.poll_timeout_secs > MAX_POLL_TIMEOUT_SECS {
        return Err(invalid(format!(
            "bot.poll_timeout_secs must not exceed {MAX_POLL_TIMEOUT_SECS}"
        )));
    }

    let format = config.observability.logging.format.as_str();
    if !LOG_FORMATS.contains(&format) {
        return Err(invalid(format!(
            "observability.logging.format must be one of: {LOG_FORMATS:?}"
        )));
    }

    Ok(())
}
