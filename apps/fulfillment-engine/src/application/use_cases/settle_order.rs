//! Settle Order Use Case
//!
//! Processes one order end to end: quote, evaluation, sufficiency check and
//! the atomic settlement itself. All writes for one call go through a single
//! [`SettlementScope`]; any early return drops the scope, which rolls back
//! everything staged so far.

use std::sync::Arc;

use crate::application::ports::{
    AccountLedgerPort, AccountSnapshot, QuoteProviderPort, SettlementScope, StorageError,
};
use crate::application::services::PostCommitDispatcher;
use crate::domain::order_fulfillment::{
    CancelReason, CancelledOrder, FulfilledOrder, FulfillmentDecision, Order, OrderEvaluator,
    OrderSide, OrderStatus, SettlementEvent,
};
use crate::domain::shared::Money;
use crate::error::FulfillmentError;

/// Result of processing one order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// The order executed and a transaction was recorded.
    Fulfilled(FulfilledOrder),
    /// The order was fulfillable but the account could not cover it.
    Cancelled(CancelledOrder),
    /// The price condition was not met; nothing changed.
    StillOpen,
}

impl ProcessOutcome {
    /// Order status after this outcome.
    #[must_use]
    pub const fn status(&self) -> OrderStatus {
        match self {
            Self::Fulfilled(_) => OrderStatus::Fulfilled,
            Self::Cancelled(_) => OrderStatus::Cancelled,
            Self::StillOpen => OrderStatus::Open,
        }
    }
}

/// Coordinates the settlement of single orders.
pub struct SettlementCoordinator<Q, L>
where
    Q: QuoteProviderPort,
    L: AccountLedgerPort,
{
    quotes: Arc<Q>,
    ledger: Arc<L>,
    dispatcher: PostCommitDispatcher,
}

impl<Q, L> SettlementCoordinator<Q, L>
where
    Q: QuoteProviderPort,
    L: AccountLedgerPort,
{
    /// Create a new SettlementCoordinator.
    pub const fn new(quotes: Arc<Q>, ledger: Arc<L>, dispatcher: PostCommitDispatcher) -> Self {
        Self {
            quotes,
            ledger,
            dispatcher,
        }
    }

    /// Dispatcher used for post-commit side effects.
    pub const fn dispatcher(&self) -> &PostCommitDispatcher {
        &self.dispatcher
    }

    /// Wait for outstanding post-settlement side effects.
    pub async fn drain_side_effects(&self) {
        self.dispatcher.drain().await;
    }

    /// Process one order.
    ///
    /// The quote is read before the account lock is taken. The order is then
    /// re-read under the lock, so an order settled concurrently is rejected
    /// with [`FulfillmentError::OrderNotOpen`] instead of settling twice.
    #[tracing::instrument(
        name = "process_order",
        skip(self, order),
        fields(order_id = %order.id(), user_id = %order.user_id(), symbol = %order.symbol())
    )]
    pub async fn process_order(&self, order: &Order) -> Result<ProcessOutcome, FulfillmentError> {
        let quote = self
            .quotes
            .get_current_quote(order.symbol())
            .await
            .map_err(|e| FulfillmentError::quote(order.symbol(), e))?;
        let price = quote.last_price;

        let mut scope = self.ledger.begin(order.user_id()).await?;

        let current = scope.load_order(order.id()).await?;
        if !current.is_open() {
            return Err(FulfillmentError::OrderNotOpen {
                order_id: current.id().clone(),
                status: current.status(),
            });
        }

        let snapshot = scope.account_snapshot().await?;

        if OrderEvaluator::evaluate(&current, price) == FulfillmentDecision::Hold {
            tracing::debug!(
                price = %price,
                trigger_price = ?current.trigger_price().map(|p| p.to_string()),
                "Price condition not met, order stays open"
            );
            return Ok(ProcessOutcome::StillOpen);
        }

        if let Some(reason) = Self::shortfall(&current, price, &snapshot) {
            return self.cancel_for_shortfall(scope, current, reason).await;
        }

        self.settle(scope, current, price).await
    }

    /// Why the account cannot cover `order` at `price`, if it cannot.
    fn shortfall(order: &Order, price: Money, snapshot: &AccountSnapshot) -> Option<CancelReason> {
        match order.side() {
            OrderSide::Buy => match price.notional(order.quantity()) {
                Some(required) => (snapshot.balance < required)
                    .then(|| CancelReason::insufficient_funds(required, snapshot.balance)),
                // No balance can cover a cost beyond the representable range.
                None => Some(CancelReason::insufficient_funds(
                    format!("{price} x {}", order.quantity().shares()),
                    snapshot.balance,
                )),
            },
            OrderSide::Sell => {
                let required = order.quantity().unsigned_abs();
                let held = snapshot.held(order.symbol());
                let covered = u64::try_from(held).is_ok_and(|held| held >= required);
                (!covered).then(|| CancelReason::insufficient_holdings(required, held))
            }
        }
    }

    async fn cancel_for_shortfall(
        &self,
        mut scope: L::Scope,
        mut order: Order,
        reason: CancelReason,
    ) -> Result<ProcessOutcome, FulfillmentError> {
        if !scope.cancel_order(order.id()).await? {
            return Err(FulfillmentError::OrderNotOpen {
                order_id: order.id().clone(),
                status: order.status(),
            });
        }
        order.cancel()?;
        scope.commit().await?;

        tracing::info!(reason = %reason, "Order cancelled");

        let cancelled = CancelledOrder { order, reason };
        self.dispatcher
            .dispatch(vec![SettlementEvent::Cancelled(cancelled.clone())]);
        Ok(ProcessOutcome::Cancelled(cancelled))
    }

    async fn settle(
        &self,
        mut scope: L::Scope,
        mut order: Order,
        price: Money,
    ) -> Result<ProcessOutcome, FulfillmentError> {
        let notional = price
            .notional(order.quantity())
            .ok_or_else(|| StorageError::ConstraintViolation {
                message: format!(
                    "notional of {} shares at {price} overflows",
                    order.quantity().shares()
                ),
            })?;
        let transaction = scope.insert_transaction(order.id(), price).await?;
        scope.adjust_balance(-notional).await?;
        scope
            .adjust_holdings(order.symbol(), order.quantity())
            .await?;
        order.mark_fulfilled(transaction.transaction_id.clone())?;
        scope.commit().await?;

        tracing::info!(
            price = %price,
            quantity = order.quantity().shares(),
            transaction_id = %transaction.transaction_id,
            "Order fulfilled"
        );

        let fulfilled = FulfilledOrder { order, transaction };
        self.dispatcher
            .dispatch(vec![SettlementEvent::Fulfilled(fulfilled.clone())]);
        Ok(ProcessOutcome::Fulfilled(fulfilled))
    }
}
