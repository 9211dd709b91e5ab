// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Fulfillment Engine - Rust Core Library
//!
//! Order fulfillment and settlement for a simulated stock-trading platform.
//! Open orders are evaluated against the latest market quote and, when their
//! price condition holds, settled atomically against the account ledger.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Core business logic
//!   - `order_fulfillment`: Order aggregate, lifecycle, evaluator, settlement events
//!   - `shared`: Money, quantities, symbols, identifiers
//!
//! - **Application**: Use cases and orchestration
//!   - `ports`: `QuoteProviderPort`, `AccountLedgerPort` + `SettlementScope`,
//!     `OrderStorePort`, `SettlementListenerPort`
//!   - `use_cases`: `SettlementCoordinator`, `BatchSweeper`, `PlaceOrder`, `CancelOrder`
//!   - `services`: Post-commit side-effect dispatch
//!   - `dto`: Submissions, acknowledgements, sweep reports
//!
//! - **Infrastructure**: Adapters (implementations)
//!   - `persistence`: In-memory ledger and order store
//!   - `price_feed`: Static quote provider
//!   - `listeners`: Net worth, quests, notifications, watchlists
//!   - `config`: Dependency injection container
//!
//! # Guarantees
//!
//! - An order settles at most once; its transaction is the only record of it.
//! - `balance_after = balance_before − price_per_share × quantity`, exactly.
//! - Cash and holdings never go negative.
//! - A failed settlement leaves no partial writes behind.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Cross-cutting
// =============================================================================

/// Configuration loading and validation.
pub mod config;

/// Error types with stable codes.
pub mod error;

/// Tracing subscriber setup.
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

// Domain re-exports
pub use domain::order_fulfillment::{
    CancelReason, CancelledOrder, FulfilledOrder, FulfillmentDecision, Order, OrderEvaluator,
    OrderSide, OrderStatus, OrderType, PlaceOrderCommand, SettlementEvent, TransactionRecord,
};
pub use domain::shared::{Money, OrderId, Quantity, Symbol, Timestamp, TransactionId, UserId};

// Application re-exports
pub use application::dto::{OrderAck, OrderSubmission, SweepReport};
pub use application::ports::{
    AccountLedgerPort, AccountSnapshot, OrderStorePort, Quote, QuoteProviderPort,
    SettlementListenerPort, SettlementScope,
};
pub use application::use_cases::{
    BatchSweeper, CancelOrderUseCase, PlaceOrderUseCase, ProcessOutcome, SettlementCoordinator,
};

// Error re-exports
pub use error::{ErrorCode, FulfillmentError};
