//! In-memory account ledger and order store.
//!
//! Each account sits behind its own `tokio::sync::Mutex`; a
//! [`InMemorySettlementScope`] owns that lock for its whole life and stages
//! every write locally. `commit` checks the non-negativity constraints and
//! then applies the staged writes in one step. Dropping the scope discards
//! them.
//!
//! Suitable for testing and development. Not for production use.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::application::ports::{
    AccountLedgerPort, AccountSnapshot, OrderStorePort, SettlementScope, StorageError,
};
use crate::domain::order_fulfillment::{Order, TransactionRecord};
use crate::domain::shared::{Money, OrderId, Quantity, Symbol, UserId};

#[derive(Debug, Default)]
struct AccountRow {
    balance: Money,
    holdings: HashMap<Symbol, i64>,
}

#[derive(Debug, Default)]
struct Tables {
    orders: HashMap<OrderId, Order>,
    // Insertion order, for oldest-first listing.
    sequence: Vec<OrderId>,
    transactions: HashMap<OrderId, TransactionRecord>,
}

fn read(tables: &RwLock<Tables>) -> RwLockReadGuard<'_, Tables> {
    tables.read().unwrap_or_else(PoisonError::into_inner)
}

fn write(tables: &RwLock<Tables>) -> RwLockWriteGuard<'_, Tables> {
    tables.write().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory implementation of [`AccountLedgerPort`] and [`OrderStorePort`].
#[derive(Debug, Default)]
pub struct InMemoryStore {
    accounts: RwLock<HashMap<UserId, Arc<Mutex<AccountRow>>>>,
    tables: Arc<RwLock<Tables>>,
    starting_balance: Option<Money>,
}

impl InMemoryStore {
    /// Create an empty store. Unknown users are rejected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that opens unknown accounts with `balance`.
    #[must_use]
    pub fn with_starting_balance(balance: Money) -> Self {
        Self {
            starting_balance: Some(balance),
            ..Self::default()
        }
    }

    /// Open (or replace) an account with the given balance and holdings.
    pub fn open_account(
        &self,
        user_id: UserId,
        balance: Money,
        holdings: impl IntoIterator<Item = (Symbol, i64)>,
    ) {
        let row = AccountRow {
            balance,
            holdings: holdings.into_iter().filter(|(_, qty)| *qty != 0).collect(),
        };
        self.accounts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(user_id, Arc::new(Mutex::new(row)));
    }

    /// Number of stored orders.
    #[must_use]
    pub fn order_count(&self) -> usize {
        read(&self.tables).orders.len()
    }

    /// Number of stored transactions.
    #[must_use]
    pub fn transaction_count(&self) -> usize {
        read(&self.tables).transactions.len()
    }

    /// Transactions belonging to `user_id`'s orders.
    #[must_use]
    pub fn transactions_for(&self, user_id: &UserId) -> Vec<TransactionRecord> {
        let tables = read(&self.tables);
        tables
            .sequence
            .iter()
            .filter(|id| tables.orders.get(*id).is_some_and(|o| o.user_id() == user_id))
            .filter_map(|id| tables.transactions.get(id).cloned())
            .collect()
    }

    fn account(&self, user_id: &UserId) -> Result<Arc<Mutex<AccountRow>>, StorageError> {
        if let Some(row) = self
            .accounts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(user_id)
        {
            return Ok(Arc::clone(row));
        }

        let balance = self
            .starting_balance
            .ok_or_else(|| StorageError::AccountNotFound {
                user_id: user_id.clone(),
            })?;

        let mut accounts = self.accounts.write().unwrap_or_else(PoisonError::into_inner);
        let row = accounts.entry(user_id.clone()).or_insert_with(|| {
            tracing::info!(user_id = %user_id, balance = %balance, "Opened account");
            Arc::new(Mutex::new(AccountRow {
                balance,
                holdings: HashMap::new(),
            }))
        });
        Ok(Arc::clone(row))
    }
}

#[async_trait]
impl AccountLedgerPort for InMemoryStore {
    type Scope = InMemorySettlementScope;

    async fn begin(&self, user_id: &UserId) -> Result<Self::Scope, StorageError> {
        let account = self.account(user_id)?.lock_owned().await;
        Ok(InMemorySettlementScope {
            user_id: user_id.clone(),
            account,
            tables: Arc::clone(&self.tables),
            staged: Staged::default(),
        })
    }

    async fn account_snapshot(&self, user_id: &UserId) -> Result<AccountSnapshot, StorageError> {
        let account = self.account(user_id)?;
        let row = account.lock().await;
        Ok(AccountSnapshot {
            user_id: user_id.clone(),
            balance: row.balance,
            holdings: row.holdings.clone(),
        })
    }
}

#[async_trait]
impl OrderStorePort for InMemoryStore {
    async fn create_order(&self, order: &Order) -> Result<(), StorageError> {
        self.account(order.user_id())?;

        let mut tables = write(&self.tables);
        if tables.orders.contains_key(order.id()) {
            return Err(StorageError::DuplicateOrder {
                order_id: order.id().clone(),
            });
        }
        tables.sequence.push(order.id().clone());
        tables.orders.insert(order.id().clone(), order.clone());
        Ok(())
    }

    async fn find_order(&self, order_id: &OrderId) -> Result<Option<Order>, StorageError> {
        Ok(read(&self.tables).orders.get(order_id).cloned())
    }

    async fn find_transaction(
        &self,
        order_id: &OrderId,
    ) -> Result<Option<TransactionRecord>, StorageError> {
        Ok(read(&self.tables).transactions.get(order_id).cloned())
    }

    async fn list_open_orders(&self) -> Result<Vec<Order>, StorageError> {
        let tables = read(&self.tables);
        Ok(tables
            .sequence
            .iter()
            .filter_map(|id| tables.orders.get(id))
            .filter(|o| o.is_open())
            .cloned()
            .collect())
    }
}

#[derive(Debug, Default)]
struct Staged {
    balance_delta: Money,
    holdings_delta: HashMap<Symbol, i64>,
    transactions: Vec<TransactionRecord>,
    cancelled: Vec<OrderId>,
}

impl Staged {
    fn transaction(&self, order_id: &OrderId) -> Option<&TransactionRecord> {
        self.transactions.iter().find(|t| &t.order_id == order_id)
    }

    fn is_cancelled(&self, order_id: &OrderId) -> bool {
        self.cancelled.contains(order_id)
    }
}

/// Exclusive settlement scope over one in-memory account.
#[derive(Debug)]
pub struct InMemorySettlementScope {
    user_id: UserId,
    account: OwnedMutexGuard<AccountRow>,
    tables: Arc<RwLock<Tables>>,
    staged: Staged,
}

fn overflow(what: impl std::fmt::Display) -> StorageError {
    StorageError::ConstraintViolation {
        message: format!("{what} overflows"),
    }
}

fn transition_failed(e: impl std::fmt::Display) -> StorageError {
    StorageError::ConstraintViolation {
        message: e.to_string(),
    }
}

impl InMemorySettlementScope {
    /// Balance with staged writes applied.
    fn balance(&self) -> Result<Money, StorageError> {
        self.account
            .balance
            .checked_add(self.staged.balance_delta)
            .ok_or_else(|| overflow(format!("balance for {}", self.user_id)))
    }

    /// Shares of `symbol` with staged writes applied.
    fn held(&self, symbol: &Symbol) -> Result<i64, StorageError> {
        let committed = self.account.holdings.get(symbol).copied().unwrap_or(0);
        let delta = self.staged.holdings_delta.get(symbol).copied().unwrap_or(0);
        committed
            .checked_add(delta)
            .ok_or_else(|| overflow(format!("holdings of {symbol} for {}", self.user_id)))
    }

    /// Holdings with staged writes applied; zero positions dropped.
    fn holdings(&self) -> Result<HashMap<Symbol, i64>, StorageError> {
        let mut holdings = self.account.holdings.clone();
        for symbol in self.staged.holdings_delta.keys() {
            holdings.insert(symbol.clone(), self.held(symbol)?);
        }
        holdings.retain(|_, qty| *qty != 0);
        Ok(holdings)
    }

    /// The order as this scope sees it, staged writes applied.
    fn staged_order(&self, order_id: &OrderId) -> Result<Order, StorageError> {
        let tables = read(&self.tables);
        let mut order = tables
            .orders
            .get(order_id)
            .filter(|o| o.user_id() == &self.user_id)
            .cloned()
            .ok_or_else(|| StorageError::OrderNotFound {
                order_id: order_id.clone(),
            })?;

        if order.is_open() {
            if let Some(txn) = self.staged.transaction(order_id) {
                order
                    .mark_fulfilled(txn.transaction_id.clone())
                    .map_err(transition_failed)?;
            } else if self.staged.is_cancelled(order_id) {
                order.cancel().map_err(transition_failed)?;
            }
        }
        Ok(order)
    }

    fn check_constraints(&self) -> Result<(), StorageError> {
        let balance = self.balance()?;
        if balance.is_negative() {
            return Err(StorageError::ConstraintViolation {
                message: format!("balance for {} would become {balance}", self.user_id),
            });
        }
        for symbol in self.staged.holdings_delta.keys() {
            let held = self.held(symbol)?;
            if held < 0 {
                return Err(StorageError::ConstraintViolation {
                    message: format!("holdings of {symbol} for {} would become {held}", self.user_id),
                });
            }
        }
        Ok(())
    }
}

#[async_trait]
impl SettlementScope for InMemorySettlementScope {
    fn user_id(&self) -> &UserId {
        &self.user_id
    }

    async fn account_snapshot(&mut self) -> Result<AccountSnapshot, StorageError> {
        Ok(AccountSnapshot {
            user_id: self.user_id.clone(),
            balance: self.balance()?,
            holdings: self.holdings()?,
        })
    }

    async fn load_order(&mut self, order_id: &OrderId) -> Result<Order, StorageError> {
        self.staged_order(order_id)
    }

    async fn adjust_balance(&mut self, delta: Money) -> Result<(), StorageError> {
        let staged = self
            .staged
            .balance_delta
            .checked_add(delta)
            .ok_or_else(|| overflow(format!("balance for {}", self.user_id)))?;
        let previous = std::mem::replace(&mut self.staged.balance_delta, staged);
        if let Err(e) = self.balance() {
            self.staged.balance_delta = previous;
            return Err(e);
        }
        Ok(())
    }

    async fn adjust_holdings(
        &mut self,
        symbol: &Symbol,
        delta: Quantity,
    ) -> Result<(), StorageError> {
        let previous = self.staged.holdings_delta.get(symbol).copied().unwrap_or(0);
        let staged = previous
            .checked_add(delta.shares())
            .ok_or_else(|| overflow(format!("holdings of {symbol} for {}", self.user_id)))?;
        self.staged.holdings_delta.insert(symbol.clone(), staged);
        if let Err(e) = self.held(symbol) {
            self.staged.holdings_delta.insert(symbol.clone(), previous);
            return Err(e);
        }
        Ok(())
    }

    async fn insert_transaction(
        &mut self,
        order_id: &OrderId,
        price_per_share: Money,
    ) -> Result<TransactionRecord, StorageError> {
        let order = self.staged_order(order_id)?;
        let exists = read(&self.tables).transactions.contains_key(order_id)
            || self.staged.transaction(order_id).is_some();
        if exists {
            return Err(StorageError::DuplicateTransaction {
                order_id: order_id.clone(),
            });
        }
        if order.is_cancelled() {
            return Err(StorageError::ConstraintViolation {
                message: format!("order {order_id} is cancelled"),
            });
        }

        let record = TransactionRecord::new(order_id.clone(), price_per_share);
        self.staged.transactions.push(record.clone());
        Ok(record)
    }

    async fn cancel_order(&mut self, order_id: &OrderId) -> Result<bool, StorageError> {
        if !self.staged_order(order_id)?.is_open() {
            return Ok(false);
        }
        self.staged.cancelled.push(order_id.clone());
        Ok(true)
    }

    async fn commit(mut self) -> Result<(), StorageError> {
        self.check_constraints()?;
        let balance = self.balance()?;
        let holdings = self.holdings()?;

        let staged = std::mem::take(&mut self.staged);
        let mut tables = write(&self.tables);

        // Work on copies so a rejected transition leaves the tables untouched.
        let mut updated: HashMap<OrderId, Order> = HashMap::new();
        for record in &staged.transactions {
            if tables.transactions.contains_key(&record.order_id) {
                return Err(StorageError::DuplicateTransaction {
                    order_id: record.order_id.clone(),
                });
            }
            let mut order = tables
                .orders
                .get(&record.order_id)
                .cloned()
                .ok_or_else(|| StorageError::OrderNotFound {
                    order_id: record.order_id.clone(),
                })?;
            order
                .mark_fulfilled(record.transaction_id.clone())
                .map_err(transition_failed)?;
            updated.insert(order.id().clone(), order);
        }
        for order_id in &staged.cancelled {
            let mut order = match updated.remove(order_id) {
                Some(order) => order,
                None => tables.orders.get(order_id).cloned().ok_or_else(|| {
                    StorageError::OrderNotFound {
                        order_id: order_id.clone(),
                    }
                })?,
            };
            order.cancel().map_err(transition_failed)?;
            updated.insert(order_id.clone(), order);
        }

        tables.orders.extend(updated);
        for record in staged.transactions {
            tables.transactions.insert(record.order_id.clone(), record);
        }
        drop(tables);

        self.account.balance = balance;
        self.account.holdings = holdings;
        Ok(())
    }
}
