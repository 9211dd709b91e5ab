//! Order side (buy or sell).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::Quantity;

/// Order side, derived from the sign of the order quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderSide {
    /// Buy order (positive quantity).
    Buy,
    /// Sell order (negative quantity).
    Sell,
}

impl OrderSide {
    /// Side implied by a signed quantity.
    ///
    /// Returns `None` for a zero quantity, which no valid order carries.
    #[must_use]
    pub const fn from_quantity(quantity: Quantity) -> Option<Self> {
        if quantity.is_buy() {
            Some(Self::Buy)
        } else if quantity.is_sell() {
            Some(Self::Sell)
        } else {
            None
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}
