//! Storage errors shared by the ledger and order store ports.

use crate::domain::shared::{OrderId, UserId};

/// Storage collaborator error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// Storage could not be reached or a lock could not be taken.
    #[error("Storage unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// No account exists for the user.
    #[error("Account not found: {user_id}")]
    AccountNotFound {
        /// The unknown user.
        user_id: UserId,
    },

    /// No order exists with the id, or it belongs to another account.
    #[error("Order not found: {order_id}")]
    OrderNotFound {
        /// The unknown order.
        order_id: OrderId,
    },

    /// An order with the same id already exists.
    #[error("Duplicate order id: {order_id}")]
    DuplicateOrder {
        /// The conflicting order.
        order_id: OrderId,
    },

    /// A transaction already exists for the order.
    #[error("Order {order_id} already has a transaction")]
    DuplicateTransaction {
        /// The already-settled order.
        order_id: OrderId,
    },

    /// A write would break a storage constraint (negative balance or holdings).
    #[error("Constraint violation: {message}")]
    ConstraintViolation {
        /// Error details.
        message: String,
    },

    /// A write failed.
    #[error("Write failed: {message}")]
    WriteFailed {
        /// Error details.
        message: String,
    },
}

impl StorageError {
    /// Returns true if retrying later may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. } | Self::WriteFailed { .. })
    }
}
