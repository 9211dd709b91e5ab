//! Error handling for the fulfillment engine.
//!
//! Every failure surfaced by a use case is a [`FulfillmentError`] carrying a
//! stable [`ErrorCode`]. Codes split into two families:
//!
//! | Family    | Codes | Order afterwards |
//! |-----------|-------|------------------|
//! | Transient | `QUOTE_UNAVAILABLE`, `STORAGE_UNAVAILABLE` | still OPEN, retried by the next sweep |
//! | Permanent | everything else | unchanged by this attempt |
//!
//! A price condition that is not met is not an error, and neither is a
//! shortfall cancellation: both are regular outcomes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::ports::{QuoteError, StorageError};
use crate::domain::order_fulfillment::{OrderError, OrderStatus};
use crate::domain::shared::{OrderId, Symbol};

/// Error codes for the fulfillment engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation
    /// Order parameters failed validation.
    InvalidOrder,

    // Lifecycle
    /// The order is already fulfilled or cancelled.
    OrderNotOpen,
    /// No such order for the account.
    OrderNotFound,
    /// No such account.
    AccountNotFound,
    /// A transaction already exists for the order.
    DuplicateTransaction,

    // Transient
    /// Market data could not be read.
    QuoteUnavailable,
    /// Storage could not be reached.
    StorageUnavailable,

    // Internal
    /// A settlement write failed and was rolled back.
    SettlementFailed,
}

impl ErrorCode {
    /// Stable reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidOrder => "INVALID_ORDER",
            Self::OrderNotOpen => "ORDER_NOT_OPEN",
            Self::OrderNotFound => "ORDER_NOT_FOUND",
            Self::AccountNotFound => "ACCOUNT_NOT_FOUND",
            Self::DuplicateTransaction => "DUPLICATE_TRANSACTION",
            Self::QuoteUnavailable => "QUOTE_UNAVAILABLE",
            Self::StorageUnavailable => "STORAGE_UNAVAILABLE",
            Self::SettlementFailed => "SETTLEMENT_FAILED",
        }
    }

    /// Returns true if the same request may succeed later.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::QuoteUnavailable | Self::StorageUnavailable)
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// Fulfillment error.
#[derive(Debug, Error)]
pub enum FulfillmentError {
    /// The quote for the order's ticker could not be read.
    #[error("Quote for {symbol} unavailable: {source}")]
    Quote {
        /// Ticker that was looked up.
        symbol: Symbol,
        /// Underlying error.
        #[source]
        source: QuoteError,
    },

    /// A storage read or write failed; any open scope was rolled back.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The order was already terminal when its scope was acquired.
    #[error("Order {order_id} is not open (status: {status})")]
    OrderNotOpen {
        /// Order id.
        order_id: OrderId,
        /// Status found under the account lock.
        status: OrderStatus,
    },

    /// Order construction or a state transition was rejected.
    #[error("Invalid order: {0}")]
    InvalidOrder(#[from] OrderError),
}

impl FulfillmentError {
    /// Wrap a quote failure for `symbol`.
    #[must_use]
    pub fn quote(symbol: &Symbol, source: QuoteError) -> Self {
        Self::Quote {
            symbol: symbol.clone(),
            source,
        }
    }

    /// Stable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Quote { .. } => ErrorCode::QuoteUnavailable,
            Self::Storage(e) => match e {
                StorageError::Unavailable { .. } => ErrorCode::StorageUnavailable,
                StorageError::AccountNotFound { .. } => ErrorCode::AccountNotFound,
                StorageError::OrderNotFound { .. } => ErrorCode::OrderNotFound,
                StorageError::DuplicateTransaction { .. } => ErrorCode::DuplicateTransaction,
                StorageError::DuplicateOrder { .. } => ErrorCode::InvalidOrder,
                StorageError::ConstraintViolation { .. } | StorageError::WriteFailed { .. } => {
                    ErrorCode::SettlementFailed
                }
            },
            Self::OrderNotOpen { .. } => ErrorCode::OrderNotOpen,
            Self::InvalidOrder(_) => ErrorCode::InvalidOrder,
        }
    }

    /// Returns true if the order is still eligible and a later attempt may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.code().is_retryable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_reason_matches_serde() {
        let json = serde_json::to_string(&ErrorCode::QuoteUnavailable).unwrap();
        assert_eq!(json, format!("\"{}\"", ErrorCode::QuoteUnavailable.reason()));
    }

    #[test]
    fn test_quote_error_is_retryable() {
        let err = FulfillmentError::quote(&Symbol::new("AAPL"), QuoteError::Timeout);
        assert_eq!(err.code(), ErrorCode::QuoteUnavailable);
        assert!(err.is_retryable());
        assert!(err.to_string().contains("AAPL"));
    }

    #[test]
    fn test_storage_error_mapping() {
        let err: FulfillmentError = StorageError::DuplicateTransaction {
            order_id: OrderId::new("ord-1"),
        }
        .into();
        assert_eq!(err.code(), ErrorCode::DuplicateTransaction);
        assert!(!err.is_retryable());

        let err: FulfillmentError = StorageError::Unavailable {
            message: "lock poisoned".to_string(),
        }
        .into();
        assert!(err.is_retryable());
    }

    #[test]
    fn test_order_not_open_is_permanent() {
        let err = FulfillmentError::OrderNotOpen {
            order_id: OrderId::new("ord-1"),
            status: OrderStatus::Fulfilled,
        };
        assert_eq!(err.code(), ErrorCode::OrderNotOpen);
        assert!(!err.is_retryable());
    }
}
