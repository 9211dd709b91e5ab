//! Order Store Port (Driven Port)
//!
//! Non-transactional order reads and order creation. Terminal transitions
//! (cancel, record execution) only happen through a
//! [`SettlementScope`](super::SettlementScope).

use async_trait::async_trait;

use super::StorageError;
use crate::domain::order_fulfillment::{Order, TransactionRecord};
use crate::domain::shared::OrderId;

/// Port for order persistence.
#[async_trait]
pub trait OrderStorePort: Send + Sync {
    /// Persist a newly placed OPEN order.
    async fn create_order(&self, order: &Order) -> Result<(), StorageError>;

    /// Find an order by id.
    async fn find_order(&self, order_id: &OrderId) -> Result<Option<Order>, StorageError>;

    /// Find the transaction settling an order.
    async fn find_transaction(
        &self,
        order_id: &OrderId,
    ) -> Result<Option<TransactionRecord>, StorageError>;

    /// All orders that are not cancelled and have no transaction, oldest first.
    async fn list_open_orders(&self) -> Result<Vec<Order>, StorageError>;
}
