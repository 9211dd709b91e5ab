//! Persistence Adapters
//!
//! Implementations of the ledger and order store ports.

pub mod in_memory;

pub use in_memory::{InMemorySettlementScope, InMemoryStore};
