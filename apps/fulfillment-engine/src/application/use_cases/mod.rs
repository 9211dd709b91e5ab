//! Use Cases (Application Services)
//!
//! Orchestrate domain logic and infrastructure through the ports.

mod cancel_order;
mod place_order;
mod settle_order;
mod sweep_open_orders;

pub use cancel_order::CancelOrderUseCase;
pub use place_order::PlaceOrderUseCase;
pub use settle_order::{ProcessOutcome, SettlementCoordinator};
pub use sweep_open_orders::BatchSweeper;
