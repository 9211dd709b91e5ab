//! Sweep Open Orders Use Case
//!
//! One pass over every open order. Each order is processed in isolation: a
//! failure is recorded in the report and the pass moves on.

use std::sync::Arc;

use futures::StreamExt;
use futures::stream;

use super::{ProcessOutcome, SettlementCoordinator};
use crate::application::dto::{SweepFailure, SweepReport};
use crate::application::ports::{AccountLedgerPort, OrderStorePort, QuoteProviderPort};
use crate::domain::order_fulfillment::Order;
use crate::error::FulfillmentError;

/// Sweeps open orders through the settlement coordinator.
pub struct BatchSweeper<Q, L, O>
where
    Q: QuoteProviderPort,
    L: AccountLedgerPort,
    O: OrderStorePort,
{
    coordinator: Arc<SettlementCoordinator<Q, L>>,
    orders: Arc<O>,
    max_concurrency: usize,
}

impl<Q, L, O> BatchSweeper<Q, L, O>
where
    Q: QuoteProviderPort,
    L: AccountLedgerPort,
    O: OrderStorePort,
{
    /// Create a new BatchSweeper.
    ///
    /// `max_concurrency` of 1 processes orders strictly one after another.
    pub fn new(
        coordinator: Arc<SettlementCoordinator<Q, L>>,
        orders: Arc<O>,
        max_concurrency: usize,
    ) -> Self {
        Self {
            coordinator,
            orders,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Run one sweep pass.
    ///
    /// Fails only if the open orders cannot be listed.
    #[tracing::instrument(name = "sweep", skip(self))]
    pub async fn sweep(&self) -> Result<SweepReport, FulfillmentError> {
        let open = self.orders.list_open_orders().await?;
        let mut report = SweepReport {
            total: open.len(),
            ..SweepReport::default()
        };

        let coordinator = &self.coordinator;
        let results: Vec<(Order, Result<ProcessOutcome, FulfillmentError>)> = stream::iter(open)
            .map(|order| async move {
                let result = coordinator.process_order(&order).await;
                (order, result)
            })
            .buffered(self.max_concurrency)
            .collect()
            .await;

        for (order, result) in results {
            match result {
                Ok(ProcessOutcome::Fulfilled(_)) => report.fulfilled += 1,
                Ok(ProcessOutcome::Cancelled(_)) => report.cancelled += 1,
                Ok(ProcessOutcome::StillOpen) => report.still_open += 1,
                Err(FulfillmentError::OrderNotOpen { .. }) => report.skipped += 1,
                Err(e) => {
                    tracing::warn!(
                        order_id = %order.id(),
                        user_id = %order.user_id(),
                        symbol = %order.symbol(),
                        code = %e.code(),
                        error = %e,
                        "Failed to process order"
                    );
                    report.failures.push(SweepFailure {
                        order_id: order.id().to_string(),
                        code: e.code(),
                        message: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            total = report.total,
            fulfilled = report.fulfilled,
            cancelled = report.cancelled,
            still_open = report.still_open,
            skipped = report.skipped,
            failed = report.failed(),
            "Sweep complete"
        );
        Ok(report)
    }
}
