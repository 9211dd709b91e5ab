//! Order Aggregate Root
//!
//! An order is a user's standing instruction to trade. It is created OPEN and
//! moves exactly once, to FULFILLED (by gaining a transaction) or to
//! CANCELLED. Terminal orders reject every further transition.

use serde::{Deserialize, Serialize};

use crate::domain::order_fulfillment::errors::OrderError;
use crate::domain::order_fulfillment::value_objects::{OrderSide, OrderStatus, OrderType};
use crate::domain::shared::{Money, OrderId, Quantity, Symbol, Timestamp, TransactionId, UserId};

/// Command to place a new order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOrderCommand {
    /// Account placing the order.
    pub user_id: UserId,
    /// Ticker to trade.
    pub ticker_symbol: Symbol,
    /// Order type.
    pub order_type: OrderType,
    /// Trigger price (required for LIMIT and STOP, ignored for MARKET).
    #[serde(default)]
    pub trigger_price: Option<Money>,
    /// Signed quantity: positive buys, negative sells.
    pub quantity: Quantity,
}

impl PlaceOrderCommand {
    /// Validate the command parameters.
    ///
    /// # Errors
    ///
    /// Returns error if the symbol is malformed, the quantity is zero, or a
    /// LIMIT/STOP order lacks a positive trigger price.
    pub fn validate(&self) -> Result<(), OrderError> {
        self.ticker_symbol
            .validate()
            .map_err(|e| OrderError::InvalidParameters {
                field: "ticker_symbol".to_string(),
                message: e.to_string(),
            })?;

        if self.quantity.is_zero() {
            return Err(OrderError::InvalidParameters {
                field: "quantity".to_string(),
                message: "Quantity must not be zero".to_string(),
            });
        }

        if self.order_type.requires_trigger_price() {
            match self.trigger_price {
                None => {
                    return Err(OrderError::InvalidParameters {
                        field: "trigger_price".to_string(),
                        message: format!("Trigger price required for {} orders", self.order_type),
                    });
                }
                Some(price) if !price.is_positive() => {
                    return Err(OrderError::InvalidParameters {
                        field: "trigger_price".to_string(),
                        message: "Trigger price must be positive".to_string(),
                    });
                }
                Some(_) => {}
            }
        }

        Ok(())
    }
}

/// Order aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    order_id: OrderId,
    user_id: UserId,
    ticker_symbol: Symbol,
    order_type: OrderType,
    trigger_price: Option<Money>,
    quantity: Quantity,
    cancelled: bool,
    order_date: Timestamp,
    transaction_id: Option<TransactionId>,
}

impl Order {
    /// Create a new OPEN order from a validated command.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails validation.
    pub fn new(command: PlaceOrderCommand) -> Result<Self, OrderError> {
        command.validate()?;

        // MARKET orders never consult the trigger; drop it so it can't leak
        // into evaluation.
        let trigger_price = if command.order_type.requires_trigger_price() {
            command.trigger_price
        } else {
            None
        };

        Ok(Self {
            order_id: OrderId::generate(),
            user_id: command.user_id,
            ticker_symbol: command.ticker_symbol,
            order_type: command.order_type,
            trigger_price,
            quantity: command.quantity,
            cancelled: false,
            order_date: Timestamp::now(),
            transaction_id: None,
        })
    }

    /// Order identifier.
    #[must_use]
    pub const fn id(&self) -> &OrderId {
        &self.order_id
    }

    /// Owning account.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Ticker being traded.
    #[must_use]
    pub const fn symbol(&self) -> &Symbol {
        &self.ticker_symbol
    }

    /// Order type.
    #[must_use]
    pub const fn order_type(&self) -> OrderType {
        self.order_type
    }

    /// Trigger price, present for LIMIT and STOP orders.
    #[must_use]
    pub const fn trigger_price(&self) -> Option<Money> {
        self.trigger_price
    }

    /// Signed quantity.
    #[must_use]
    pub const fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Buy or sell, from the quantity sign.
    #[must_use]
    pub const fn side(&self) -> OrderSide {
        if self.quantity.is_sell() {
            OrderSide::Sell
        } else {
            OrderSide::Buy
        }
    }

    /// The stored cancelled flag.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// When the order was placed.
    #[must_use]
    pub const fn order_date(&self) -> Timestamp {
        self.order_date
    }

    /// Transaction that settled this order, if any.
    #[must_use]
    pub const fn transaction_id(&self) -> Option<&TransactionId> {
        self.transaction_id.as_ref()
    }

    /// Current lifecycle status.
    #[must_use]
    pub const fn status(&self) -> OrderStatus {
        OrderStatus::from_row(self.cancelled, self.transaction_id.is_some())
    }

    /// Returns true if the order still awaits evaluation.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.status().is_open()
    }

    /// Transition OPEN → CANCELLED.
    ///
    /// # Errors
    ///
    /// Returns error if the order is already terminal.
    pub fn cancel(&mut self) -> Result<(), OrderError> {
        self.ensure_open(OrderStatus::Cancelled)?;
        self.cancelled = true;
        Ok(())
    }

    /// Transition OPEN → FULFILLED by attaching the settling transaction.
    ///
    /// # Errors
    ///
    /// Returns error if the order is already terminal.
    pub fn mark_fulfilled(&mut self, transaction_id: TransactionId) -> Result<(), OrderError> {
        self.ensure_open(OrderStatus::Fulfilled)?;
        self.transaction_id = Some(transaction_id);
        Ok(())
    }

    fn ensure_open(&self, to: OrderStatus) -> Result<(), OrderError> {
        let from = self.status();
        if from.is_open() {
            Ok(())
        } else {
            Err(OrderError::InvalidStateTransition { from, to })
        }
    }
}
