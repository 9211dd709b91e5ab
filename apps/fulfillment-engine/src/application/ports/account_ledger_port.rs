//! Account Ledger Port (Driven Port)
//!
//! The ledger hands out a [`SettlementScope`]: an exclusive, transactional
//! capability over one user's account. Every write a settlement makes goes
//! through the scope, so a write outside a transaction cannot be expressed.
//!
//! # Scope contract
//!
//! - `begin` blocks until no other scope for the same user is open.
//! - Reads through the scope observe the scope's own staged writes.
//! - Nothing is visible to other readers until [`SettlementScope::commit`].
//! - Dropping a scope without committing rolls every staged write back.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::StorageError;
use crate::domain::order_fulfillment::{Order, TransactionRecord};
use crate::domain::shared::{Money, OrderId, Quantity, Symbol, UserId};

/// Point-in-time view of one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    /// Account owner.
    pub user_id: UserId,
    /// Cash balance.
    pub balance: Money,
    /// Shares held per ticker.
    pub holdings: HashMap<Symbol, i64>,
}

impl AccountSnapshot {
    /// Shares held for `symbol` (zero if none).
    #[must_use]
    pub fn held(&self, symbol: &Symbol) -> i64 {
        self.holdings.get(symbol).copied().unwrap_or(0)
    }
}

/// Exclusive transactional context over one account and its orders.
#[async_trait]
pub trait SettlementScope: Send {
    /// Account this scope locks.
    fn user_id(&self) -> &UserId;

    /// Balance and holdings, including this scope's staged writes.
    async fn account_snapshot(&mut self) -> Result<AccountSnapshot, StorageError>;

    /// Re-read an order owned by this account.
    async fn load_order(&mut self, order_id: &OrderId) -> Result<Order, StorageError>;

    /// Add `delta` to the cash balance.
    async fn adjust_balance(&mut self, delta: Money) -> Result<(), StorageError>;

    /// Add `delta` shares to the holding for `symbol`.
    async fn adjust_holdings(&mut self, symbol: &Symbol, delta: Quantity)
    -> Result<(), StorageError>;

    /// Insert the transaction settling `order_id` at `price_per_share`.
    ///
    /// Fails with [`StorageError::DuplicateTransaction`] if one exists.
    async fn insert_transaction(
        &mut self,
        order_id: &OrderId,
        price_per_share: Money,
    ) -> Result<TransactionRecord, StorageError>;

    /// Mark `order_id` cancelled. Returns false if it was not open.
    async fn cancel_order(&mut self, order_id: &OrderId) -> Result<bool, StorageError>;

    /// Make every staged write visible atomically and release the lock.
    async fn commit(self) -> Result<(), StorageError>;
}

/// Port for the account ledger.
#[async_trait]
pub trait AccountLedgerPort: Send + Sync {
    /// Scope type handed out by this ledger.
    type Scope: SettlementScope + 'static;

    /// Acquire the exclusive scope for `user_id`.
    async fn begin(&self, user_id: &UserId) -> Result<Self::Scope, StorageError>;

    /// Committed balance and holdings, outside any scope.
    async fn account_snapshot(&self, user_id: &UserId) -> Result<AccountSnapshot, StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_defaults_to_zero() {
        let snapshot = AccountSnapshot {
            user_id: UserId::new("user-1"),
            balance: Money::ZERO,
            holdings: HashMap::from([(Symbol::new("AAPL"), 4)]),
        };
        assert_eq!(snapshot.held(&Symbol::new("AAPL")), 4);
        assert_eq!(snapshot.held(&Symbol::new("MSFT")), 0);
    }
}
