//! Order status in the fulfillment lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where an order sits in its lifecycle.
///
/// ```text
/// OPEN ──(fulfillable, sufficient)──▶ FULFILLED
///   │  ──(fulfillable, shortfall)───▶ CANCELLED
///   │  ──(user cancellation)────────▶ CANCELLED
///   └──(not fulfillable)──▶ OPEN
/// ```
///
/// FULFILLED and CANCELLED are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Awaiting evaluation.
    Open,
    /// Settled; exactly one transaction exists for the order.
    Fulfilled,
    /// Cancelled without a transaction.
    Cancelled,
}

impl OrderStatus {
    /// Derive the status from the stored row.
    ///
    /// A transaction always wins: its existence is what makes an order
    /// fulfilled.
    #[must_use]
    pub const fn from_row(cancelled: bool, has_transaction: bool) -> Self {
        if has_transaction {
            Self::Fulfilled
        } else if cancelled {
            Self::Cancelled
        } else {
            Self::Open
        }
    }

    /// Returns true if the order can no longer change.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Fulfilled | Self::Cancelled)
    }

    /// Returns true if the order is still eligible for evaluation.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Fulfilled => write!(f, "FULFILLED"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_from_row() {
        assert_eq!(OrderStatus::from_row(false, false), OrderStatus::Open);
        assert_eq!(OrderStatus::from_row(true, false), OrderStatus::Cancelled);
        assert_eq!(OrderStatus::from_row(false, true), OrderStatus::Fulfilled);
        assert_eq!(OrderStatus::from_row(true, true), OrderStatus::Fulfilled);
    }

    #[test]
    fn terminal_states() {
        assert!(!OrderStatus::Open.is_terminal());
        assert!(OrderStatus::Fulfilled.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn status_display() {
        assert_eq!(OrderStatus::Cancelled.to_string(), "CANCELLED");
    }
}
