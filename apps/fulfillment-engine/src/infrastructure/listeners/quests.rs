//! Quest tracking listener.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::ports::{AccountLedgerPort, ListenerError, SettlementListenerPort};
use crate::domain::order_fulfillment::{OrderSide, SettlementEvent};
use crate::domain::shared::UserId;

/// Tickers an account must hold at once to complete [`Quest::Diversified`].
pub const DIVERSIFIED_TICKERS: usize = 3;

/// Trading quests completed by settlements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Quest {
    /// Any fulfilled order.
    FirstTrade,
    /// A fulfilled sell.
    FirstSell,
    /// Holding several different tickers at once.
    Diversified,
}

impl fmt::Display for Quest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirstTrade => write!(f, "FIRST_TRADE"),
            Self::FirstSell => write!(f, "FIRST_SELL"),
            Self::Diversified => write!(f, "DIVERSIFIED"),
        }
    }
}

/// Marks quests complete as orders fill.
pub struct QuestListener<L>
where
    L: AccountLedgerPort,
{
    ledger: Arc<L>,
    completed: RwLock<HashMap<UserId, BTreeSet<Quest>>>,
}

impl<L> QuestListener<L>
where
    L: AccountLedgerPort,
{
    /// Create a new listener.
    pub fn new(ledger: Arc<L>) -> Self {
        Self {
            ledger,
            completed: RwLock::new(HashMap::new()),
        }
    }

    /// Quests completed by `user_id`.
    pub fn completed(&self, user_id: &UserId) -> BTreeSet<Quest> {
        self.completed
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }

    fn complete(&self, user_id: &UserId, quest: Quest) {
        let newly = self
            .completed
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(user_id.clone())
            .or_default()
            .insert(quest);
        if newly {
            tracing::info!(user_id = %user_id, quest = %quest, "Quest completed");
        }
    }
}

#[async_trait]
impl<L> SettlementListenerPort for QuestListener<L>
where
    L: AccountLedgerPort,
{
    fn name(&self) -> &'static str {
        "quests"
    }

    async fn handle(&self, event: &SettlementEvent) -> Result<(), ListenerError> {
        let SettlementEvent::Fulfilled(fulfilled) = event else {
            return Ok(());
        };
        let user_id = fulfilled.user_id();

        self.complete(user_id, Quest::FirstTrade);
        if fulfilled.order.side() == OrderSide::Sell {
            self.complete(user_id, Quest::FirstSell);
        }

        let snapshot = self
            .ledger
            .account_snapshot(user_id)
            .await
            .map_err(|e| ListenerError::failed("quests", e.to_string()))?;
        if snapshot.holdings.values().filter(|qty| **qty > 0).count() >= DIVERSIFIED_TICKERS {
            self.complete(user_id, Quest::Diversified);
        }
        Ok(())
    }
}
