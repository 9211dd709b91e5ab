//! Domain Layer
//!
//! Business rules for order fulfillment with zero infrastructure dependencies.
//!
//! - **Aggregates**: [`Order`](order_fulfillment::Order) and its terminal views
//! - **Value Objects**: money, quantities, symbols, identifiers
//! - **Domain Events**: committed settlement outcomes
//! - **Domain Services**: the stateless order evaluator
//!
//! # Bounded Contexts
//!
//! - [`order_fulfillment`]: order lifecycle, trigger evaluation, statuses
//! - [`shared`]: value objects used across contexts

pub mod order_fulfillment;
pub mod shared;
