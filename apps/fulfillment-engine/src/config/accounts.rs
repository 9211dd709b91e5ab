//! Account configuration.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Account configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountsConfig {
    /// Cash balance for accounts opened on first use.
    #[serde(default = "default_starting_balance")]
    pub starting_balance: Decimal,
    /// Accounts opened at startup.
    #[serde(default)]
    pub seed: Vec<SeedAccountConfig>,
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            starting_balance: default_starting_balance(),
            seed: Vec::new(),
        }
    }
}

/// An account opened at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedAccountConfig {
    /// Account owner.
    pub user_id: String,
    /// Cash balance.
    pub balance: Decimal,
    /// Shares held per ticker.
    #[serde(default)]
    pub holdings: HashMap<String, i64>,
}

fn default_starting_balance() -> Decimal {
    Decimal::from(10_000)
}
