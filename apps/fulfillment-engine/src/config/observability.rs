//! Logging settings for the engine.
//!
//! Consumed by [`crate::telemetry::init_tracing`] at startup.

use serde::{Deserialize, Serialize};

use super::sweeper::default_true;

/// The `observability` section of the config file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ObservabilityConfig {
    /// Subscriber settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Tracing subscriber settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, e.g. `info` or `fulfillment_engine=debug`.
    /// `RUST_LOG` overrides it.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format (`json` or `pretty`).
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Log `process_order` and `sweep` span closes with their timings.
    /// In JSON output this also attaches the current span (order, user,
    /// symbol) to every event.
    #[serde(default = "default_true")]
    pub include_spans: bool,
}

impl LoggingConfig {
    /// Formats accepted by `format`.
    pub const FORMATS: [&'static str; 2] = ["json", "pretty"];

    /// Human-readable output instead of JSON lines.
    #[must_use]
    pub fn is_pretty(&self) -> bool {
        self.format == "pretty"
    }

    /// Returns true if `format` names a known formatter.
    #[must_use]
    pub fn has_known_format(&self) -> bool {
        Self::FORMATS.contains(&self.format.as_str())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            include_spans: true,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}
