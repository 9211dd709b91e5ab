//! Cancel Order Use Case
//!
//! Withdraws an open order at the account holder's request. Runs under the
//! same account scope as settlement, so it cannot race a fill.

use std::sync::Arc;

use crate::application::ports::{AccountLedgerPort, SettlementScope};
use crate::application::services::PostCommitDispatcher;
use crate::domain::order_fulfillment::{CancelReason, CancelledOrder, SettlementEvent};
use crate::domain::shared::{OrderId, UserId};
use crate::error::FulfillmentError;

/// Use case for user-requested cancellation.
pub struct CancelOrderUseCase<L>
where
    L: AccountLedgerPort,
{
    ledger: Arc<L>,
    dispatcher: PostCommitDispatcher,
}

impl<L> CancelOrderUseCase<L>
where
    L: AccountLedgerPort,
{
    /// Create a new CancelOrderUseCase.
    pub const fn new(ledger: Arc<L>, dispatcher: PostCommitDispatcher) -> Self {
        Self { ledger, dispatcher }
    }

    /// Cancel `order_id` on behalf of `user_id`.
    pub async fn execute(
        &self,
        user_id: &UserId,
        order_id: &OrderId,
    ) -> Result<CancelledOrder, FulfillmentError> {
        let mut scope = self.ledger.begin(user_id).await?;

        let mut order = scope.load_order(order_id).await?;
        if !scope.cancel_order(order_id).await? {
            return Err(FulfillmentError::OrderNotOpen {
                order_id: order_id.clone(),
                status: order.status(),
            });
        }
        order.cancel()?;
        scope.commit().await?;

        tracing::info!(order_id = %order_id, user_id = %user_id, "Order cancelled by user");

        let cancelled = CancelledOrder {
            order,
            reason: CancelReason::user_requested(),
        };
        self.dispatcher
            .dispatch(vec![SettlementEvent::Cancelled(cancelled.clone())]);
        Ok(cancelled)
    }
}
