//! Configuration module for the fulfillment engine.
//!
//! Provides configuration loading, validation, and environment variable
//! interpolation.
//!
//! # Usage
//!
//! ```rust,ignore
//! use fulfillment_engine::config::{Config, load_config};
//!
//! // Load from default path (config.yaml)
//! let config = load_config(None)?;
//!
//! // Load from custom path
//! let config = load_config(Some("custom/config.yaml"))?;
//!
//! println!("sweep every {}s", config.sweeper.interval_secs);
//! ```

mod accounts;
mod market;
mod observability;
mod orders;
mod sweeper;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use accounts::{AccountsConfig, SeedAccountConfig};
pub use market::MarketConfig;
pub use observability::{LoggingConfig, ObservabilityConfig};
pub use orders::SeedOrderConfig;
pub use sweeper::SweeperConfig;

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "FULFILLMENT_CONFIG";

/// Config file used when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

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
    /// Batch sweeper configuration.
    #[serde(default)]
    pub sweeper: SweeperConfig,
    /// Account configuration.
    #[serde(default)]
    pub accounts: AccountsConfig,
    /// Market price configuration.
    #[serde(default)]
    pub market: MarketConfig,
    /// Orders placed at startup.
    #[serde(default)]
    pub orders: Vec<SeedOrderConfig>,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to `$FULFILLMENT_CONFIG`,
///   then "config.yaml".
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = resolve_path(path);

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
    let config: Config = if interpolated.trim().is_empty() {
        Config::default()
    } else {
        serde_yaml_bw::from_str(&interpolated)?
    };
    validate_config(&config)?;
    Ok(config)
}

/// The config path to read: explicit, then `$FULFILLMENT_CONFIG`, then the default.
#[must_use]
pub fn resolve_path(path: Option<&str>) -> String {
    path.map(str::to_string)
        .or_else(|| std::env::var(CONFIG_PATH_ENV).ok().filter(|p| !p.is_empty()))
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map(|m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.map_or_else(String::new, str::to_string),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.sweeper.interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "sweeper.interval_secs must be positive".to_string(),
        ));
    }

    if config.sweeper.max_concurrency == 0 {
        return Err(ConfigError::ValidationError(
            "sweeper.max_concurrency must be at least 1".to_string(),
        ));
    }

    if config.accounts.starting_balance.is_sign_negative() {
        return Err(ConfigError::ValidationError(
            "accounts.starting_balance must not be negative".to_string(),
        ));
    }

    for account in &config.accounts.seed {
        if account.balance.is_sign_negative() {
            return Err(ConfigError::ValidationError(format!(
                "accounts.seed[{}].balance must not be negative",
                account.user_id
            )));
        }
        if let Some((ticker, _)) = account.holdings.iter().find(|(_, qty)| **qty < 0) {
            return Err(ConfigError::ValidationError(format!(
                "accounts.seed[{}].holdings.{ticker} must not be negative",
                account.user_id
            )));
        }
    }

    if let Some((ticker, _)) = config
        .market
        .prices
        .iter()
        .find(|(_, price)| price.is_sign_negative() || price.is_zero())
    {
        return Err(ConfigError::ValidationError(format!(
            "market.prices.{ticker} must be positive"
        )));
    }

    if !config.observability.logging.has_known_format() {
        return Err(ConfigError::ValidationError(format!(
            "observability.logging.format must be one of: {:?}",
            LoggingConfig::FORMATS
        )));
    }

    Ok(())
}
