//! Shared Domain Types
//!
//! Value objects and errors used by every part of the fulfillment core.

pub mod errors;
pub mod value_objects;

pub use errors::DomainError;
pub use value_objects::{Money, OrderId, Quantity, Symbol, Timestamp, TransactionId, UserId};
