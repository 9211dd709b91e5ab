//! Dependency Injection Container
//!
//! Manages creation and wiring of all application components.

use std::sync::Arc;

use crate::application::dto::{OrderAck, OrderSubmission};
use crate::application::ports::{
    AccountLedgerPort, OrderStorePort, QuoteProviderPort, SettlementListenerPort,
};
use crate::application::services::PostCommitDispatcher;
use crate::application::use_cases::{
    BatchSweeper, CancelOrderUseCase, PlaceOrderUseCase, SettlementCoordinator,
};
use crate::config::{Config, SeedOrderConfig};
use crate::domain::shared::{Money, Symbol, UserId};
use crate::infrastructure::listeners::{
    NetWorthListener, NotificationListener, QuestListener, WatchlistListener,
};
use crate::infrastructure::persistence::InMemoryStore;
use crate::infrastructure::price_feed::StaticQuoteProvider;

/// Dependency injection container.
///
/// Holds all wired dependencies for the application. Use
/// [`InMemoryContainer::from_config`] for the in-memory wiring.
pub struct Container<Q, L, O>
where
    Q: QuoteProviderPort + 'static,
    L: AccountLedgerPort + 'static,
    O: OrderStorePort + 'static,
{
    // Ports
    quotes: Arc<Q>,
    ledger: Arc<L>,
    orders: Arc<O>,

    coordinator: Arc<SettlementCoordinator<Q, L>>,
    max_concurrency: usize,
}

impl<Q, L, O> Container<Q, L, O>
where
    Q: QuoteProviderPort + 'static,
    L: AccountLedgerPort + 'static,
    O: OrderStorePort + 'static,
{
    /// Create a new container with all dependencies.
    pub fn new(
        quotes: Arc<Q>,
        ledger: Arc<L>,
        orders: Arc<O>,
        listeners: Vec<Arc<dyn SettlementListenerPort>>,
        max_concurrency: usize,
    ) -> Self {
        let dispatcher = PostCommitDispatcher::new(listeners);
        let coordinator = Arc::new(SettlementCoordinator::new(
            Arc::clone(&quotes),
            Arc::clone(&ledger),
            dispatcher,
        ));
        Self {
            quotes,
            ledger,
            orders,
            coordinator,
            max_concurrency,
        }
    }

    /// Get the quote provider port.
    pub fn quotes(&self) -> Arc<Q> {
        Arc::clone(&self.quotes)
    }

    /// Get the account ledger port.
    pub fn ledger(&self) -> Arc<L> {
        Arc::clone(&self.ledger)
    }

    /// Get the order store port.
    pub fn orders(&self) -> Arc<O> {
        Arc::clone(&self.orders)
    }

    /// Get the settlement coordinator.
    pub fn coordinator(&self) -> Arc<SettlementCoordinator<Q, L>> {
        Arc::clone(&self.coordinator)
    }

    /// Create a `BatchSweeper`.
    pub fn sweeper(&self) -> BatchSweeper<Q, L, O> {
        BatchSweeper::new(
            Arc::clone(&self.coordinator),
            Arc::clone(&self.orders),
            self.max_concurrency,
        )
    }

    /// Create a `PlaceOrderUseCase`.
    pub fn place_order_use_case(&self) -> PlaceOrderUseCase<Q, L, O> {
        PlaceOrderUseCase::new(Arc::clone(&self.coordinator), Arc::clone(&self.orders))
    }

    /// Create a `CancelOrderUseCase`.
    pub fn cancel_order_use_case(&self) -> CancelOrderUseCase<L> {
        CancelOrderUseCase::new(
            Arc::clone(&self.ledger),
            self.coordinator.dispatcher().clone(),
        )
    }

    /// Wait for outstanding post-settlement side effects.
    pub async fn drain_side_effects(&self) {
        self.coordinator.drain_side_effects().await;
    }

    /// Place each configured startup order. Failures are logged and skipped.
    pub async fn place_seed_orders(&self, seeds: &[SeedOrderConfig]) -> Vec<OrderAck> {
        let use_case = self.place_order_use_case();
        let mut acks = Vec::with_capacity(seeds.len());
        for seed in seeds {
            let submission = OrderSubmission {
                user_id: seed.user_id.clone(),
                ticker_symbol: seed.ticker_symbol.clone(),
                order_type: seed.order_type,
                trigger_price: seed.trigger_price,
                quantity: seed.quantity,
            };
            match use_case.execute(submission).await {
                Ok(ack) => acks.push(ack),
                Err(e) => tracing::warn!(
                    user_id = %seed.user_id,
                    symbol = %seed.ticker_symbol,
                    error = %e,
                    "Skipping startup order"
                ),
            }
        }
        acks
    }
}

/// Listeners wired by [`InMemoryContainer::from_config`], kept for inspection.
pub struct InMemoryListeners {
    /// Net-worth history.
    pub net_worth: Arc<NetWorthListener<InMemoryStore, StaticQuoteProvider>>,
    /// Quest tracking.
    pub quests: Arc<QuestListener<InMemoryStore>>,
    /// User notifications.
    pub notifications: Arc<NotificationListener>,
    /// Watchlists.
    pub watchlist: Arc<WatchlistListener>,
}

impl InMemoryListeners {
    fn as_ports(&self) -> Vec<Arc<dyn SettlementListenerPort>> {
        vec![
            Arc::clone(&self.net_worth) as Arc<dyn SettlementListenerPort>,
            Arc::clone(&self.quests) as Arc<dyn SettlementListenerPort>,
            Arc::clone(&self.notifications) as Arc<dyn SettlementListenerPort>,
            Arc::clone(&self.watchlist) as Arc<dyn SettlementListenerPort>,
        ]
    }
}

/// Container wired with the in-memory adapters.
pub type InMemoryContainer = Container<StaticQuoteProvider, InMemoryStore, InMemoryStore>;

impl InMemoryContainer {
    /// Wire the in-memory adapters from configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> (Self, InMemoryListeners) {
        let store = Arc::new(InMemoryStore::with_starting_balance(Money::new(
            config.accounts.starting_balance,
        )));
        for account in &config.accounts.seed {
            store.open_account(
                UserId::new(&account.user_id),
                Money::new(account.balance),
                account
                    .holdings
                    .iter()
                    .map(|(ticker, qty)| (Symbol::new(ticker), *qty)),
            );
        }

        let quotes = Arc::new(StaticQuoteProvider::from_prices(
            config
                .market
                .prices
                .iter()
                .map(|(ticker, price)| (Symbol::new(ticker), Money::new(*price))),
        ));

        let listeners = InMemoryListeners {
            net_worth: Arc::new(NetWorthListener::new(
                Arc::clone(&store),
                Arc::clone(&quotes),
            )),
            quests: Arc::new(QuestListener::new(Arc::clone(&store))),
            notifications: Arc::new(NotificationListener::new()),
            watchlist: Arc::new(WatchlistListener::new()),
        };

        tracing::info!(
            accounts = config.accounts.seed.len(),
            tickers = config.market.prices.len(),
            max_concurrency = config.sweeper.max_concurrency,
            "Container wired"
        );

        let container = Self::new(
            quotes,
            Arc::clone(&store),
            store,
            listeners.as_ports(),
            config.sweeper.max_concurrency,
        );
        (container, listeners)
    }
}
