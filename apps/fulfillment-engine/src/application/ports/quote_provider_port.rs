//! Quote Provider Port (Driven Port)
//!
//! Interface to the market-data collaborator. How quotes are fetched,
//! cached or refreshed is the adapter's business; the engine only needs the
//! last traded price for a ticker.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::shared::{Money, Symbol, Timestamp};

/// Latest market quote for a ticker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Ticker symbol.
    pub symbol: Symbol,
    /// Most recent traded price; the execution price at settlement.
    pub last_price: Money,
    /// Session open price.
    pub open_price: Money,
    /// When the quote was observed.
    pub timestamp: Timestamp,
}

impl Quote {
    /// Create a quote observed now.
    #[must_use]
    pub fn new(symbol: Symbol, last_price: Money, open_price: Money) -> Self {
        Self {
            symbol,
            last_price,
            open_price,
            timestamp: Timestamp::now(),
        }
    }
}

/// Quote lookup error.
///
/// Every variant leaves the order untouched; the next sweep tries again.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuoteError {
    /// Upstream market data could not be reached.
    #[error("Market data unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// No quote is known for the symbol.
    #[error("No quote for symbol: {symbol}")]
    SymbolNotFound {
        /// The unknown symbol.
        symbol: String,
    },

    /// The lookup did not complete in time.
    #[error("Quote lookup timed out")]
    Timeout,
}

/// Port for reading current market quotes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuoteProviderPort: Send + Sync {
    /// Get the current quote for a symbol.
    async fn get_current_quote(&self, symbol: &Symbol) -> Result<Quote, QuoteError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn quote_serde() {
        let quote = Quote::new(
            Symbol::new("AAPL"),
            Money::new(dec!(150)),
            Money::new(dec!(148.5)),
        );
        let json = serde_json::to_string(&quote).unwrap();
        let parsed: Quote = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, quote);
    }

    #[test]
    fn quote_error_display() {
        let err = QuoteError::SymbolNotFound {
            symbol: "ZZZZ".to_string(),
        };
        assert!(err.to_string().contains("ZZZZ"));
    }
}
