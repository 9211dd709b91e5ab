//! Settlement events.
//!
//! Collected while a settlement scope is open and dispatched to listeners
//! only after the scope commits.

use serde::{Deserialize, Serialize};

use super::aggregate::{CancelledOrder, FulfilledOrder};
use crate::domain::shared::{OrderId, Symbol, UserId};

/// A committed settlement outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettlementEvent {
    /// The order executed and its transaction committed.
    Fulfilled(FulfilledOrder),
    /// The order was cancelled for a shortfall.
    Cancelled(CancelledOrder),
}

impl SettlementEvent {
    /// Order the event concerns.
    #[must_use]
    pub const fn order_id(&self) -> &OrderId {
        match self {
            Self::Fulfilled(e) => e.order_id(),
            Self::Cancelled(e) => e.order_id(),
        }
    }

    /// Account the event concerns.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        match self {
            Self::Fulfilled(e) => e.user_id(),
            Self::Cancelled(e) => e.user_id(),
        }
    }

    /// Ticker the event concerns.
    #[must_use]
    pub const fn symbol(&self) -> &Symbol {
        match self {
            Self::Fulfilled(e) => e.order.symbol(),
            Self::Cancelled(e) => e.order.symbol(),
        }
    }

    /// Event type name.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::Fulfilled(_) => "ORDER_FULFILLED",
            Self::Cancelled(_) => "ORDER_CANCELLED",
        }
    }
}
