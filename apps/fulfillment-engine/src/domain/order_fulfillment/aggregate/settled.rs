//! Terminal views of an order returned by settlement.

use serde::{Deserialize, Serialize};

use super::{Order, TransactionRecord};
use crate::domain::order_fulfillment::value_objects::CancelReason;
use crate::domain::shared::{Money, OrderId, UserId};

/// An order joined with the transaction that settled it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FulfilledOrder {
    /// The order, in FULFILLED state.
    pub order: Order,
    /// The settling transaction.
    pub transaction: TransactionRecord,
}

impl FulfilledOrder {
    /// Order identifier.
    #[must_use]
    pub const fn order_id(&self) -> &OrderId {
        self.order.id()
    }

    /// Owning account.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        self.order.user_id()
    }

    /// Execution price.
    #[must_use]
    pub const fn price_per_share(&self) -> Money {
        self.transaction.price_per_share
    }

    /// Cash movement applied to the balance: `-(price × quantity)`.
    #[must_use]
    pub fn balance_delta(&self) -> Option<Money> {
        self.transaction
            .price_per_share
            .notional(self.order.quantity())
            .map(|notional| -notional)
    }
}

/// An order cancelled at settlement time, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelledOrder {
    /// The order, in CANCELLED state.
    pub order: Order,
    /// Why it was cancelled.
    pub reason: CancelReason,
}

impl CancelledOrder {
    /// Order identifier.
    #[must_use]
    pub const fn order_id(&self) -> &OrderId {
        self.order.id()
    }

    /// Owning account.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        self.order.user_id()
    }
}
