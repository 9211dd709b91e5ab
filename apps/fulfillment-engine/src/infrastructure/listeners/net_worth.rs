//! Net-worth history listener.
//!
//! Recomputes `balance + Σ shares × last price` after every settlement and
//! appends the point to the account's history.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::ports::{
    AccountLedgerPort, ListenerError, QuoteProviderPort, SettlementListenerPort,
};
use crate::domain::order_fulfillment::SettlementEvent;
use crate::domain::shared::{Money, Quantity, Timestamp, UserId};

const NAME: &str = "net_worth";

/// One point of an account's net-worth history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetWorthPoint {
    /// When the value was computed.
    pub timestamp: Timestamp,
    /// Cash plus marked-to-market holdings.
    pub net_worth: Money,
}

/// Keeps a per-account net-worth history.
pub struct NetWorthListener<L, Q>
where
    L: AccountLedgerPort,
    Q: QuoteProviderPort,
{
    ledger: Arc<L>,
    quotes: Arc<Q>,
    history: RwLock<HashMap<UserId, Vec<NetWorthPoint>>>,
}

impl<L, Q> NetWorthListener<L, Q>
where
    L: AccountLedgerPort,
    Q: QuoteProviderPort,
{
    /// Create a new listener.
    pub fn new(ledger: Arc<L>, quotes: Arc<Q>) -> Self {
        Self {
            ledger,
            quotes,
            history: RwLock::new(HashMap::new()),
        }
    }

    /// Net-worth history for `user_id`, oldest first.
    pub fn history(&self, user_id: &UserId) -> Vec<NetWorthPoint> {
        self.history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Latest net worth for `user_id`.
    pub fn latest(&self, user_id: &UserId) -> Option<Money> {
        self.history(user_id).last().map(|p| p.net_worth)
    }

    async fn compute(&self, user_id: &UserId) -> Result<Money, ListenerError> {
        let snapshot = self
            .ledger
            .account_snapshot(user_id)
            .await
            .map_err(|e| ListenerError::failed(NAME, e.to_string()))?;

        let mut total = snapshot.balance;
        for (symbol, shares) in &snapshot.holdings {
            let quote = self
                .quotes
                .get_current_quote(symbol)
                .await
                .map_err(|e| ListenerError::failed(NAME, e.to_string()))?;
            total = quote
                .last_price
                .notional(Quantity::new(*shares))
                .and_then(|value| total.checked_add(value))
                .ok_or_else(|| ListenerError::failed(NAME, "net worth overflows"))?;
        }
        Ok(total)
    }
}

#[async_trait]
impl<L, Q> SettlementListenerPort for NetWorthListener<L, Q>
where
    L: AccountLedgerPort,
    Q: QuoteProviderPort,
{
    fn name(&self) -> &'static str {
        NAME
    }

    async fn handle(&self, event: &SettlementEvent) -> Result<(), ListenerError> {
        let user_id = event.user_id();
        let net_worth = self.compute(user_id).await?;

        tracing::debug!(user_id = %user_id, net_worth = %net_worth, "Net worth updated");

        self.history
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(user_id.clone())
            .or_default()
            .push(NetWorthPoint {
                timestamp: Timestamp::now(),
                net_worth,
            });
        Ok(())
    }
}
