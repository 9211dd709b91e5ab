//! User notification listener.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::ports::{ListenerError, SettlementListenerPort};
use crate::domain::order_fulfillment::{OrderSide, SettlementEvent};
use crate::domain::shared::{Timestamp, UserId};

/// A message shown to the account holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Order the message is about.
    pub order_id: String,
    /// Short title.
    pub title: String,
    /// Body text.
    pub message: String,
    /// When the message was created.
    pub created_at: Timestamp,
}

impl Notification {
    /// Build the message for a settlement event.
    #[must_use]
    pub fn for_event(event: &SettlementEvent) -> Self {
        let (title, message) = match event {
            SettlementEvent::Fulfilled(fulfilled) => {
                let verb = match fulfilled.order.side() {
                    OrderSide::Buy => "Bought",
                    OrderSide::Sell => "Sold",
                };
                (
                    "Order fulfilled".to_string(),
                    format!(
                        "{verb} {} {} at {}",
                        fulfilled.order.quantity().unsigned_abs(),
                        fulfilled.order.symbol(),
                        fulfilled.price_per_share()
                    ),
                )
            }
            SettlementEvent::Cancelled(cancelled) => (
                "Order cancelled".to_string(),
                format!(
                    "Your {} order for {} was cancelled: {}",
                    cancelled.order.order_type(),
                    cancelled.order.symbol(),
                    cancelled.reason.message
                ),
            ),
        };

        Self {
            order_id: event.order_id().to_string(),
            title,
            message,
            created_at: Timestamp::now(),
        }
    }
}

/// Collects notifications into per-account inboxes.
#[derive(Debug, Default)]
pub struct NotificationListener {
    inbox: RwLock<HashMap<UserId, Vec<Notification>>>,
}

impl NotificationListener {
    /// Create a new listener.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications for `user_id`, oldest first.
    pub fn inbox(&self, user_id: &UserId) -> Vec<Notification> {
        self.inbox
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl SettlementListenerPort for NotificationListener {
    fn name(&self) -> &'static str {
        "notifications"
    }

    async fn handle(&self, event: &SettlementEvent) -> Result<(), ListenerError> {
        let notification = Notification::for_event(event);
        self.inbox
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(event.user_id().clone())
            .or_default()
            .push(notification);
        Ok(())
    }
}
