//! Order Fulfillment Aggregates

mod order;
mod settled;
mod transaction;

pub use order::{Order, PlaceOrderCommand};
pub use settled::{CancelledOrder, FulfilledOrder};
pub use transaction::TransactionRecord;
