//! Tracing subscriber setup.
//!
//! `RUST_LOG` takes precedence over the configured level. The output format
//! is JSON for machine ingestion or pretty for local runs.
//!
//! # Usage
//!
//! ```rust,ignore
//! let config = load_config(None)?;
//! fulfillment_engine::telemetry::init_tracing(&config.observability.logging);
//! ```

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use crate::config::LoggingConfig;

/// Build the filter: `RUST_LOG` if set and valid, else the configured level.
#[must_use]
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global tracing subscriber.
///
/// Returns false if a subscriber was already installed.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let span_events = if config.include_spans {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_span_events(span_events);

    let result = if config.is_pretty() {
        builder.pretty().with_target(false).try_init()
    } else {
        builder
            .json()
            .with_current_span(config.include_spans)
            .with_target(true)
            .try_init()
    };

    result.is_ok()
}
