//! Post-Commit Dispatcher
//!
//! Runs settlement side effects after a scope has committed. Each listener
//! gets its own task per event, so a slow or failing listener never delays
//! the settlement that produced the event, nor any other listener.

use std::sync::Arc;

use tokio_util::task::TaskTracker;

use crate::application::ports::SettlementListenerPort;
use crate::domain::order_fulfillment::SettlementEvent;

/// Fans committed settlement events out to listeners.
#[derive(Clone)]
pub struct PostCommitDispatcher {
    listeners: Arc<[Arc<dyn SettlementListenerPort>]>,
    tracker: TaskTracker,
}

impl std::fmt::Debug for PostCommitDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostCommitDispatcher")
            .field(
                "listeners",
                &self.listeners.iter().map(|l| l.name()).collect::<Vec<_>>(),
            )
            .field("pending", &self.tracker.len())
            .finish()
    }
}

impl Default for PostCommitDispatcher {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl PostCommitDispatcher {
    /// Create a dispatcher for the given listeners.
    #[must_use]
    pub fn new(listeners: Vec<Arc<dyn SettlementListenerPort>>) -> Self {
        Self {
            listeners: listeners.into(),
            tracker: TaskTracker::new(),
        }
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Number of side-effect tasks still running.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tracker.len()
    }

    /// Spawn one task per listener per event.
    ///
    /// Must only be called with events whose scope has committed.
    pub fn dispatch(&self, events: Vec<SettlementEvent>) {
        for event in events {
            let event = Arc::new(event);
            for listener in self.listeners.iter() {
                let listener = Arc::clone(listener);
                let event = Arc::clone(&event);
                self.tracker.spawn(async move {
                    if let Err(e) = listener.handle(&event).await {
                        tracing::warn!(
                            listener = listener.name(),
                            event_type = event.event_type(),
                            order_id = %event.order_id(),
                            user_id = %event.user_id(),
                            error = %e,
                            "Post-settlement listener failed"
                        );
                    }
                });
            }
        }
    }

    /// Wait for every side effect dispatched so far.
    pub async fn drain(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::application::ports::ListenerError;
    use crate::domain::order_fulfillment::{
        CancelReason, CancelledOrder, Order, OrderType, PlaceOrderCommand,
    };
    use crate::domain::shared::{Quantity, Symbol, UserId};

    struct Counting(AtomicUsize);

    #[async_trait]
    impl SettlementListenerPort for Counting {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn handle(&self, _event: &SettlementEvent) -> Result<(), ListenerError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Failing;

    #[async_trait]
    impl SettlementListenerPort for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn handle(&self, _event: &SettlementEvent) -> Result<(), ListenerError> {
            Err(ListenerError::failed("failing", "boom"))
        }
    }

    fn cancelled_event() -> SettlementEvent {
        let order = Order::new(PlaceOrderCommand {
            user_id: UserId::new("user-1"),
            ticker_symbol: Symbol::new("AAPL"),
            order_type: OrderType::Market,
            trigger_price: None,
            quantity: Quantity::new(1),
        })
        .unwrap();
        SettlementEvent::Cancelled(CancelledOrder {
            order,
            reason: CancelReason::user_requested(),
        })
    }

    #[tokio::test]
    async fn failing_listener_does_not_block_others() {
        let counting = Arc::new(Counting(AtomicUsize::new(0)));
        let dispatcher = PostCommitDispatcher::new(vec![
            Arc::new(Failing),
            Arc::clone(&counting) as Arc<dyn SettlementListenerPort>,
        ]);

        dispatcher.dispatch(vec![cancelled_event(), cancelled_event()]);
        dispatcher.drain().await;

        assert_eq!(counting.0.load(Ordering::SeqCst), 2);
        assert_eq!(dispatcher.pending(), 0);
    }

    #[tokio::test]
    async fn drain_can_be_repeated() {
        let counting = Arc::new(Counting(AtomicUsize::new(0)));
        let dispatcher =
            PostCommitDispatcher::new(vec![Arc::clone(&counting) as Arc<dyn SettlementListenerPort>]);

        dispatcher.dispatch(vec![cancelled_event()]);
        dispatcher.drain().await;
        dispatcher.dispatch(vec![cancelled_event()]);
        dispatcher.drain().await;

        assert_eq!(counting.0.load(Ordering::SeqCst), 2);
    }
}
