//! Price Feed Adapters
//!
//! Implementations of `QuoteProviderPort`.

pub mod static_quotes;

pub use static_quotes::StaticQuoteProvider;
