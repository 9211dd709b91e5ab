//! Batch sweeper configuration.

use serde::{Deserialize, Serialize};

/// Sweeper configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweeperConfig {
    /// Seconds between sweep passes.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Orders processed concurrently within one pass (1 = sequential).
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// Run a pass as soon as the engine starts.
    #[serde(default = "default_true")]
    pub run_on_startup: bool,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            max_concurrency: default_max_concurrency(),
            run_on_startup: true,
        }
    }
}

const fn default_interval_secs() -> u64 {
    3600
}

const fn default_max_concurrency() -> usize {
    4
}

pub(super) const fn default_true() -> bool {
    true
}
