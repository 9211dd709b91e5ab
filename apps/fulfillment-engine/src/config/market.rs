//! Market data configuration.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Market configuration for the static quote provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Last traded price per ticker.
    #[serde(default)]
    pub prices: HashMap<String, Decimal>,
}
