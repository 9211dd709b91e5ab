//! Transaction record produced by settling an order.

use serde::{Deserialize, Serialize};

use crate::domain::shared::{Money, OrderId, Timestamp, TransactionId};

/// The immutable record of an executed order.
///
/// At most one exists per order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Transaction identifier.
    pub transaction_id: TransactionId,
    /// The order this transaction settles.
    pub order_id: OrderId,
    /// Quote price captured at settlement.
    pub price_per_share: Money,
    /// When the transaction was written.
    pub transaction_date: Timestamp,
}

impl TransactionRecord {
    /// Record an execution of `order_id` at `price_per_share`, now.
    #[must_use]
    pub fn new(order_id: OrderId, price_per_share: Money) -> Self {
        Self {
            transaction_id: TransactionId::generate(),
            order_id,
            price_per_share,
            transaction_date: Timestamp::now(),
        }
    }
}
