//! Static quote provider.
//!
//! Serves prices set in configuration or by tests. The first price set for a
//! symbol becomes its session open.

use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::application::ports::{Quote, QuoteError, QuoteProviderPort};
use crate::domain::shared::{Money, Symbol, Timestamp};

#[derive(Debug, Clone, Copy)]
struct PriceRow {
    last: Money,
    open: Money,
}

/// Quote provider backed by an in-memory price table.
#[derive(Debug, Default)]
pub struct StaticQuoteProvider {
    prices: RwLock<HashMap<Symbol, PriceRow>>,
    halted: RwLock<HashSet<Symbol>>,
}

impl StaticQuoteProvider {
    /// Create an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider seeded with `prices`.
    #[must_use]
    pub fn from_prices(prices: impl IntoIterator<Item = (Symbol, Money)>) -> Self {
        let provider = Self::new();
        for (symbol, price) in prices {
            provider.set_price(symbol, price);
        }
        provider
    }

    /// Set the last traded price for a symbol.
    pub fn set_price(&self, symbol: impl Into<Symbol>, price: Money) {
        let mut prices = self.prices.write().unwrap_or_else(PoisonError::into_inner);
        prices
            .entry(symbol.into())
            .and_modify(|row| row.last = price)
            .or_insert(PriceRow {
                last: price,
                open: price,
            });
    }

    /// Make lookups for `symbol` fail as unavailable until [`Self::resume`].
    pub fn halt(&self, symbol: impl Into<Symbol>) {
        self.halted
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(symbol.into());
    }

    /// Serve quotes for `symbol` again.
    pub fn resume(&self, symbol: &Symbol) {
        self.halted
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(symbol);
    }

    /// Last price for `symbol`, if known.
    #[must_use]
    pub fn last_price(&self, symbol: &Symbol) -> Option<Money> {
        self.prices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(symbol)
            .map(|row| row.last)
    }
}

#[async_trait]
impl QuoteProviderPort for StaticQuoteProvider {
    async fn get_current_quote(&self, symbol: &Symbol) -> Result<Quote, QuoteError> {
        if self
            .halted
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(symbol)
        {
            return Err(QuoteError::Unavailable {
                message: format!("trading in {symbol} is halted"),
            });
        }

        let row = self
            .prices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(symbol)
            .copied()
            .ok_or_else(|| QuoteError::SymbolNotFound {
                symbol: symbol.to_string(),
            })?;

        Ok(Quote {
            symbol: symbol.clone(),
            last_price: row.last,
            open_price: row.open,
            timestamp: Timestamp::now(),
        })
    }
}
