//! Place Order Use Case
//!
//! Creates a new open order and tries to settle it straight away. Whatever
//! the immediate attempt yields, the order is acknowledged: a transient
//! failure leaves it open for the next sweep.

use std::sync::Arc;

use super::SettlementCoordinator;
use crate::application::dto::{OrderAck, OrderSubmission};
use crate::application::ports::{AccountLedgerPort, OrderStorePort, QuoteProviderPort};
use crate::domain::order_fulfillment::Order;
use crate::error::FulfillmentError;

/// Use case for placing an order.
pub struct PlaceOrderUseCase<Q, L, O>
where
    Q: QuoteProviderPort,
    L: AccountLedgerPort,
    O: OrderStorePort,
{
    coordinator: Arc<SettlementCoordinator<Q, L>>,
    orders: Arc<O>,
}

impl<Q, L, O> PlaceOrderUseCase<Q, L, O>
where
    Q: QuoteProviderPort,
    L: AccountLedgerPort,
    O: OrderStorePort,
{
    /// Create a new PlaceOrderUseCase.
    pub const fn new(coordinator: Arc<SettlementCoordinator<Q, L>>, orders: Arc<O>) -> Self {
        Self {
            coordinator,
            orders,
        }
    }

    /// Execute the use case.
    ///
    /// Fails only if the submission is invalid or the order cannot be stored.
    pub async fn execute(&self, submission: OrderSubmission) -> Result<OrderAck, FulfillmentError> {
        let order = Order::new(submission.to_command())?;
        self.orders.create_order(&order).await?;

        tracing::info!(
            order_id = %order.id(),
            user_id = %order.user_id(),
            symbol = %order.symbol(),
            order_type = %order.order_type(),
            quantity = order.quantity().shares(),
            "Order placed"
        );

        match self.coordinator.process_order(&order).await {
            Ok(outcome) => Ok(OrderAck::from_outcome(&order, &outcome)),
            Err(e) => {
                tracing::warn!(
                    order_id = %order.id(),
                    code = %e.code(),
                    error = %e,
                    "Immediate settlement failed, order left open"
                );
                Ok(OrderAck::open(&order, Some(e.code())))
            }
        }
    }
}
