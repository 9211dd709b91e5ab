//! Fulfillment Engine Binary
//!
//! Runs the batch sweeper over the in-memory ledger until interrupted.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin fulfillment-engine
//! ```
//!
//! # Environment Variables
//!
//! - `FULFILLMENT_CONFIG`: Config file path (default: config.yaml)
//! - `RUST_LOG`: Log filter, overrides `observability.logging.level`

use std::time::Duration;

use anyhow::Context;
use fulfillment_engine::config::{self, Config, ConfigError};
use fulfillment_engine::infrastructure::config::InMemoryContainer;
use fulfillment_engine::telemetry;
use tokio::signal;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let config = load_config()?;
    telemetry::init_tracing(&config.observability.logging);

    tracing::info!(
        interval_secs = config.sweeper.interval_secs,
        max_concurrency = config.sweeper.max_concurrency,
        "Starting fulfillment engine"
    );

    let (container, _listeners) = InMemoryContainer::from_config(&config);
    let acks = container.place_seed_orders(&config.orders).await;
    if !acks.is_empty() {
        tracing::info!(orders = acks.len(), "Placed startup orders");
    }

    let shutdown_token = CancellationToken::new();
    tokio::spawn(wait_for_signal(shutdown_token.clone()));

    let sweeper = container.sweeper();
    let mut ticker = tokio::time::interval(Duration::from_secs(config.sweeper.interval_secs));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // The first tick completes immediately.
    if !config.sweeper.run_on_startup {
        ticker.tick().await;
    }

    loop {
        tokio::select! {
            () = shutdown_token.cancelled() => break,
            _ = ticker.tick() => {
                if let Err(e) = sweeper.sweep().await {
                    tracing::error!(code = %e.code(), error = %e, "Sweep failed");
                }
            }
        }
    }

    tracing::info!("Draining post-settlement side effects");
    container.drain_side_effects().await;

    tracing::info!("Fulfillment engine stopped");
    Ok(())
}

/// Load the config file, falling back to defaults when none exists.
fn load_config() -> anyhow::Result<Config> {
    match config::load_config(None) {
        Ok(config) => Ok(config),
        Err(ConfigError::ReadError { path, source })
            if source.kind() == std::io::ErrorKind::NotFound =>
        {
            eprintln!("Config file '{path}' not found, using defaults");
            Ok(Config::default())
        }
        Err(e) => Err(e).context("failed to load configuration"),
    }
}

/// Load .env file from current or ancestor directories.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Cancel `token` on SIGINT or SIGTERM.
async fn wait_for_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl-C"),
        () = terminate => tracing::info!("Received SIGTERM"),
    }
    token.cancel();
}
