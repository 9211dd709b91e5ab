//! Order type (market, limit, stop).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order type specifying when an order may execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// Market order - executes at the current quote.
    Market,
    /// Limit order - executes at the trigger price or better.
    Limit,
    /// Stop order - executes once the price crosses the trigger adversely.
    Stop,
}

impl OrderType {
    /// Returns true if this order type needs a trigger price.
    #[must_use]
    pub const fn requires_trigger_price(&self) -> bool {
        matches!(self, Self::Limit | Self::Stop)
    }

    /// Returns true if this is a market order.
    #[must_use]
    pub const fn is_market(&self) -> bool {
        matches!(self, Self::Market)
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Market => write!(f, "MARKET"),
            Self::Limit => write!(f, "LIMIT"),
            Self::Stop => write!(f, "STOP"),
        }
    }
}
