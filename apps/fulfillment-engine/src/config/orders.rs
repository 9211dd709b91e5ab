//! Orders placed at startup.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::order_fulfillment::OrderType;

/// An order placed when the engine starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedOrderConfig {
    /// Account placing the order.
    pub user_id: String,
    /// Ticker symbol.
    pub ticker_symbol: String,
    /// `MARKET`, `LIMIT` or `STOP`.
    pub order_type: OrderType,
    /// Trigger price for LIMIT and STOP orders.
    #[serde(default)]
    pub trigger_price: Option<Decimal>,
    /// Signed share count: positive buys, negative sells.
    pub quantity: i64,
}
