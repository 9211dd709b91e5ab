//! Order DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::application::use_cases::ProcessOutcome;
use crate::domain::order_fulfillment::{
    CancelReason, Order, OrderStatus, OrderType, PlaceOrderCommand,
};
use crate::domain::shared::{Money, Quantity, Symbol, UserId};
use crate::error::ErrorCode;

/// DTO for submitting an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSubmission {
    /// Account placing the order.
    pub user_id: String,
    /// Ticker symbol.
    pub ticker_symbol: String,
    /// Type.
    pub order_type: OrderType,
    /// Trigger price for LIMIT and STOP orders.
    #[serde(default)]
    pub trigger_price: Option<Decimal>,
    /// Signed share count: positive buys, negative sells.
    pub quantity: i64,
}

impl OrderSubmission {
    /// Convert to the domain command.
    #[must_use]
    pub fn to_command(&self) -> PlaceOrderCommand {
        PlaceOrderCommand {
            user_id: UserId::new(&self.user_id),
            ticker_symbol: Symbol::new(&self.ticker_symbol),
            order_type: self.order_type,
            trigger_price: self.trigger_price.map(Money::new),
            quantity: Quantity::new(self.quantity),
        }
    }
}

/// DTO representing an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDto {
    /// Order ID.
    pub order_id: String,
    /// Account.
    pub user_id: String,
    /// Symbol.
    pub ticker_symbol: String,
    /// Type.
    pub order_type: OrderType,
    /// Trigger price.
    pub trigger_price: Option<Decimal>,
    /// Signed quantity.
    pub quantity: i64,
    /// Status.
    pub status: OrderStatus,
    /// When the order was placed (RFC 3339).
    pub order_date: String,
}

impl OrderDto {
    /// Create from domain order.
    #[must_use]
    pub fn from_order(order: &Order) -> Self {
        Self {
            order_id: order.id().to_string(),
            user_id: order.user_id().to_string(),
            ticker_symbol: order.symbol().to_string(),
            order_type: order.order_type(),
            trigger_price: order.trigger_price().map(|p| p.amount()),
            quantity: order.quantity().shares(),
            status: order.status(),
            order_date: order.order_date().to_string(),
        }
    }
}

/// Acknowledgement returned to the submitter of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAck {
    /// The order as stored after the immediate attempt.
    pub order: OrderDto,
    /// Execution price, when fulfilled.
    pub price_per_share: Option<Decimal>,
    /// Transaction ID, when fulfilled.
    pub transaction_id: Option<String>,
    /// Why the order was cancelled, when cancelled.
    pub cancel_reason: Option<CancelReason>,
    /// Error from the immediate attempt; the order stays open for the next sweep.
    pub error: Option<ErrorCode>,
}

impl OrderAck {
    /// Acknowledge a processed order.
    #[must_use]
    pub fn from_outcome(order: &Order, outcome: &ProcessOutcome) -> Self {
        match outcome {
            ProcessOutcome::Fulfilled(fulfilled) => Self {
                order: OrderDto::from_order(&fulfilled.order),
                price_per_share: Some(fulfilled.price_per_share().amount()),
                transaction_id: Some(fulfilled.transaction.transaction_id.to_string()),
                cancel_reason: None,
                error: None,
            },
            ProcessOutcome::Cancelled(cancelled) => Self {
                order: OrderDto::from_order(&cancelled.order),
                price_per_share: None,
                transaction_id: None,
                cancel_reason: Some(cancelled.reason.clone()),
                error: None,
            },
            ProcessOutcome::StillOpen => Self::open(order, None),
        }
    }

    /// Acknowledge an order that is still open.
    #[must_use]
    pub fn open(order: &Order, error: Option<ErrorCode>) -> Self {
        Self {
            order: OrderDto::from_order(order),
            price_per_share: None,
            transaction_id: None,
            cancel_reason: None,
            error,
        }
    }

    /// Status after the immediate attempt.
    #[must_use]
    pub const fn status(&self) -> OrderStatus {
        self.order.status
    }
}
