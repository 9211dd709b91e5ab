//! Watchlist listener: traded tickers land on the account's watchlist.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::application::ports::{ListenerError, SettlementListenerPort};
use crate::domain::order_fulfillment::SettlementEvent;
use crate::domain::shared::{Symbol, UserId};

/// Per-account watchlists.
#[derive(Debug, Default)]
pub struct WatchlistListener {
    lists: RwLock<HashMap<UserId, Vec<Symbol>>>,
}

impl WatchlistListener {
    /// Create a new listener.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Watchlist for `user_id` in insertion order.
    pub fn watchlist(&self, user_id: &UserId) -> Vec<Symbol> {
        self.lists
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl SettlementListenerPort for WatchlistListener {
    fn name(&self) -> &'static str {
        "watchlist"
    }

    async fn handle(&self, event: &SettlementEvent) -> Result<(), ListenerError> {
        if !matches!(event, SettlementEvent::Fulfilled(_)) {
            return Ok(());
        }

        let mut lists = self.lists.write().unwrap_or_else(PoisonError::into_inner);
        let list = lists.entry(event.user_id().clone()).or_default();
        if !list.contains(event.symbol()) {
            list.push(event.symbol().clone());
        }
        Ok(())
    }
}
