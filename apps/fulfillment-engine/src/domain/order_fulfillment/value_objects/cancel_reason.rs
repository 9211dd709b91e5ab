//! Reasons an order was cancelled.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why an order reached the CANCELLED state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CancelReason {
    /// Machine-readable code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

impl CancelReason {
    /// Create a new cancel reason.
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// The cash balance could not cover the purchase at the current quote.
    #[must_use]
    pub fn insufficient_funds(required: impl fmt::Display, available: impl fmt::Display) -> Self {
        Self::new(
            "INSUFFICIENT_FUNDS",
            format!("Order requires {required} but only {available} is available"),
        )
    }

    /// The account does not hold enough shares to sell.
    #[must_use]
    pub fn insufficient_holdings(required: u64, held: i64) -> Self {
        Self::new(
            "INSUFFICIENT_HOLDINGS",
            format!("Order sells {required} shares but only {held} are held"),
        )
    }

    /// The account holder withdrew the order.
    #[must_use]
    pub fn user_requested() -> Self {
        Self::new("USER_REQUESTED", "Cancelled by user request")
    }
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_funds_reason() {
        let reason = CancelReason::insufficient_funds("$15000.00", "$200.00");
        assert_eq!(reason.code, "INSUFFICIENT_FUNDS");
        assert!(reason.message.contains("$15000.00"));
        assert!(reason.to_string().starts_with("[INSUFFICIENT_FUNDS]"));
    }

    #[test]
    fn insufficient_holdings_reason() {
        let reason = CancelReason::insufficient_holdings(5, 2);
        assert_eq!(reason.code, "INSUFFICIENT_HOLDINGS");
        assert!(reason.message.contains("5 shares"));
    }
}
