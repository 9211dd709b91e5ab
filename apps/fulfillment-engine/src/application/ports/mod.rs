//! Application Ports (Driven)
//!
//! Interfaces the fulfillment core requires from its collaborators.

mod account_ledger_port;
mod order_store_port;
mod quote_provider_port;
mod settlement_listener_port;
mod storage_error;

pub use account_ledger_port::{AccountLedgerPort, AccountSnapshot, SettlementScope};
pub use order_store_port::OrderStorePort;
#[cfg(test)]
pub use quote_provider_port::MockQuoteProviderPort;
pub use quote_provider_port::{Quote, QuoteError, QuoteProviderPort};
pub use settlement_listener_port::{ListenerError, SettlementListenerPort};
pub use storage_error::StorageError;
