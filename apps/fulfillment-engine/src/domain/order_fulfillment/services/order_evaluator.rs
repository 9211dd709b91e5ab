//! Order Evaluator
//!
//! Decides whether an order's price conditions are met at a given quote.
//! Pure: no I/O, no clock, no account state.

use crate::domain::order_fulfillment::aggregate::Order;
use crate::domain::order_fulfillment::value_objects::{FulfillmentDecision, OrderSide, OrderType};
use crate::domain::shared::Money;

/// Price-condition evaluator.
///
/// | Type   | Side | Fulfillable when        |
/// |--------|------|-------------------------|
/// | MARKET | any  | always                  |
/// | LIMIT  | BUY  | `price <= trigger`      |
/// | LIMIT  | SELL | `price >= trigger`      |
/// | STOP   | BUY  | `price >= trigger`      |
/// | STOP   | SELL | `price <= trigger`      |
pub struct OrderEvaluator;

impl OrderEvaluator {
    /// Returns true if `order` may execute at `current_price`.
    #[must_use]
    pub fn can_fulfill(order: &Order, current_price: Money) -> bool {
        Self::price_condition_met(
            order.order_type(),
            order.side(),
            order.trigger_price(),
            current_price,
        )
    }

    /// Evaluate `order` at `current_price`.
    #[must_use]
    pub fn evaluate(order: &Order, current_price: Money) -> FulfillmentDecision {
        Self::can_fulfill(order, current_price).into()
    }

    /// The decision table on raw terms.
    ///
    /// A LIMIT or STOP order without a trigger never fulfils.
    #[must_use]
    pub fn price_condition_met(
        order_type: OrderType,
        side: OrderSide,
        trigger_price: Option<Money>,
        current_price: Money,
    ) -> bool {
        match (order_type, side) {
            (OrderType::Market, _) => true,
            (OrderType::Limit, OrderSide::Buy) | (OrderType::Stop, OrderSide::Sell) => {
                trigger_price.is_some_and(|trigger| current_price <= trigger)
            }
            (OrderType::Limit, OrderSide::Sell) | (OrderType::Stop, OrderSide::Buy) => {
                trigger_price.is_some_and(|trigger| current_price >= trigger)
            }
        }
    }
}
