//! Order Fulfillment Bounded Context
//!
//! Owns the order lifecycle from placement to its single terminal state.
//!
//! # Key Concepts
//!
//! - **Order Aggregate**: OPEN until it gains a transaction or is cancelled
//! - **Order Evaluator**: pure price-condition check for MARKET/LIMIT/STOP
//! - **Settlement Events**: committed outcomes handed to post-commit listeners

pub mod aggregate;
pub mod errors;
pub mod events;
pub mod services;
pub mod value_objects;

pub use aggregate::{CancelledOrder, FulfilledOrder, Order, PlaceOrderCommand, TransactionRecord};
pub use errors::OrderError;
pub use events::SettlementEvent;
pub use services::OrderEvaluator;
pub use value_objects::{CancelReason, FulfillmentDecision, OrderSide, OrderStatus, OrderType};
