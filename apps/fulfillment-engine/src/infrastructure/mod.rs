//! Infrastructure Layer
//!
//! Adapters (implementations) for the ports defined in the application
//! layer. Following hexagonal architecture:
//!
//! - **Driven Adapters (Outbound)**
//!   - `persistence/`: In-memory account ledger and order store
//!   - `price_feed/`: Static quote provider
//!   - `listeners/`: Post-settlement side effects (net worth, quests,
//!     notifications, watchlists)
//!
//! - **Wiring**
//!   - `config/`: Dependency injection container

pub mod config;
pub mod listeners;
pub mod persistence;
pub mod price_feed;
