//! Integration tests for order fulfillment.
//!
//! Drive the settlement coordinator and the batch sweeper against the
//! in-memory adapters and check the account-level guarantees: exact cash
//! conservation, no negative balances or holdings, at most one transaction
//! per order and no partial writes on failure.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use fulfillment_engine::application::ports::{
    AccountLedgerPort, AccountSnapshot, ListenerError, OrderStorePort, SettlementListenerPort,
    SettlementScope, StorageError,
};
use fulfillment_engine::application::services::PostCommitDispatcher;
use fulfillment_engine::application::use_cases::{BatchSweeper, ProcessOutcome, SettlementCoordinator};
use fulfillment_engine::domain::order_fulfillment::{
    Order, OrderStatus, OrderType, PlaceOrderCommand, SettlementEvent, TransactionRecord,
};
use fulfillment_engine::domain::shared::{Money, OrderId, Quantity, Symbol, UserId};
use fulfillment_engine::error::{ErrorCode, FulfillmentError};
use fulfillment_engine::infrastructure::persistence::{InMemorySettlementScope, InMemoryStore};
use fulfillment_engine::infrastructure::price_feed::StaticQuoteProvider;
use rust_decimal_macros::dec;

// =============================================================================
// Fixtures
// =============================================================================

fn alice() -> UserId {
    UserId::new("alice")
}

fn aapl() -> Symbol {
    Symbol::new("AAPL")
}

fn order(order_type: OrderType, trigger: Option<Money>, quantity: i64) -> Order {
    order_for(&alice(), "AAPL", order_type, trigger, quantity)
}

fn order_for(
    user: &UserId,
    symbol: &str,
    order_type: OrderType,
    trigger: Option<Money>,
    quantity: i64,
) -> Order {
    Order::new(PlaceOrderCommand {
        user_id: user.clone(),
        ticker_symbol: Symbol::new(symbol),
        order_type,
        trigger_price: trigger,
        quantity: Quantity::new(quantity),
    })
    .unwrap()
}

struct Harness {
    store: Arc<InMemoryStore>,
    quotes: Arc<StaticQuoteProvider>,
    coordinator: Arc<SettlementCoordinator<StaticQuoteProvider, InMemoryStore>>,
}

impl Harness {
    fn new(balance: Money, holdings: &[(&str, i64)]) -> Self {
        Self::with_listeners(balance, holdings, Vec::new())
    }

    fn with_listeners(
        balance: Money,
        holdings: &[(&str, i64)],
        listeners: Vec<Arc<dyn SettlementListenerPort>>,
    ) -> Self {
        let store = Arc::new(InMemoryStore::new());
        store.open_account(
            alice(),
            balance,
            holdings.iter().map(|(s, q)| (Symbol::new(*s), *q)),
        );
        let quotes = Arc::new(StaticQuoteProvider::from_prices([
            (aapl(), Money::from_units(150)),
            (Symbol::new("MSFT"), Money::from_units(300)),
            (Symbol::new("TSLA"), Money::from_units(200)),
        ]));
        let coordinator = Arc::new(SettlementCoordinator::new(
            Arc::clone(&quotes),
            Arc::clone(&store),
            PostCommitDispatcher::new(listeners),
        ));
        Self {
            store,
            quotes,
            coordinator,
        }
    }

    async fn place(&self, order: &Order) {
        self.store.create_order(order).await.unwrap();
    }

    async fn snapshot(&self) -> AccountSnapshot {
        self.store.account_snapshot(&alice()).await.unwrap()
    }

    async fn status(&self, order: &Order) -> OrderStatus {
        self.store.find_order(order.id()).await.unwrap().unwrap().status()
    }

    fn sweeper(&self, max_concurrency: usize) -> BatchSweeper<StaticQuoteProvider, InMemoryStore, InMemoryStore> {
        BatchSweeper::new(
            Arc::clone(&self.coordinator),
            Arc::clone(&self.store),
            max_concurrency,
        )
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn test_market_buy_fulfils_at_last_price() {
    let h = Harness::new(Money::from_units(10_000), &[]);
    let o = order(OrderType::Market, None, 1);
    h.place(&o).await;

    let outcome = h.coordinator.process_order(&o).await.unwrap();
    let ProcessOutcome::Fulfilled(fulfilled) = outcome else {
        panic!("expected fulfilled, got {outcome:?}");
    };
    assert_eq!(fulfilled.price_per_share(), Money::from_units(150));
    assert_eq!(fulfilled.order.status(), OrderStatus::Fulfilled);

    let snapshot = h.snapshot().await;
    assert_eq!(snapshot.balance, Money::from_units(9_850));
    assert_eq!(snapshot.held(&aapl()), 1);

    let txn = h.store.find_transaction(o.id()).await.unwrap().unwrap();
    assert_eq!(txn.price_per_share, Money::from_units(150));
}

#[tokio::test]
async fn test_limit_buy_fills_at_quote_not_trigger() {
    let h = Harness::new(Money::from_units(10_000), &[]);
    let o = order(OrderType::Limit, Some(Money::from_units(160)), 1);
    h.place(&o).await;

    let outcome = h.coordinator.process_order(&o).await.unwrap();
    let ProcessOutcome::Fulfilled(fulfilled) = outcome else {
        panic!("expected fulfilled, got {outcome:?}");
    };
    assert_eq!(fulfilled.price_per_share(), Money::from_units(150));
    assert_eq!(h.snapshot().await.balance, Money::from_units(9_850));
}

#[tokio::test]
async fn test_limit_buy_above_trigger_stays_open() {
    let h = Harness::new(Money::from_units(10_000), &[]);
    let o = order(OrderType::Limit, Some(Money::from_units(140)), 1);
    h.place(&o).await;

    let outcome = h.coordinator.process_order(&o).await.unwrap();
    assert_eq!(outcome, ProcessOutcome::StillOpen);
    assert_eq!(h.status(&o).await, OrderStatus::Open);
    assert_eq!(h.snapshot().await.balance, Money::from_units(10_000));
    assert_eq!(h.store.transaction_count(), 0);
}

#[tokio::test]
async fn test_sell_without_holdings_cancelled() {
    let h = Harness::new(Money::from_units(10_000), &[]);
    let o = order(OrderType::Market, None, -1);
    h.place(&o).await;

    let outcome = h.coordinator.process_order(&o).await.unwrap();
    let ProcessOutcome::Cancelled(cancelled) = outcome else {
        panic!("expected cancelled, got {outcome:?}");
    };
    assert_eq!(cancelled.reason.code, "INSUFFICIENT_HOLDINGS");
    assert_eq!(h.status(&o).await, OrderStatus::Cancelled);
    assert!(h.store.find_transaction(o.id()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_buy_beyond_balance_cancelled() {
    let h = Harness::new(Money::from_units(200), &[]);
    let o = order(OrderType::Market, None, 100);
    h.place(&o).await;

    let outcome = h.coordinator.process_order(&o).await.unwrap();
    let ProcessOutcome::Cancelled(cancelled) = outcome else {
        panic!("expected cancelled, got {outcome:?}");
    };
    assert_eq!(cancelled.reason.code, "INSUFFICIENT_FUNDS");
    assert_eq!(h.snapshot().await.balance, Money::from_units(200));
    assert_eq!(h.store.transaction_count(), 0);
}

#[tokio::test]
async fn test_sweep_isolates_transient_failure() {
    let h = Harness::new(Money::from_units(10_000), &[("MSFT", 5)]);
    let first = order(OrderType::Market, None, 2);
    let second = order_for(&alice(), "TSLA", OrderType::Market, None, 1);
    let third = order_for(&alice(), "MSFT", OrderType::Market, None, -5);
    for o in [&first, &second, &third] {
        h.place(o).await;
    }
    h.quotes.halt("TSLA");

    let report = h.sweeper(1).sweep().await.unwrap();
    assert_eq!(report.total, 3);
    assert_eq!(report.fulfilled, 2);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.failures[0].order_id, second.id().to_string());
    assert_eq!(report.failures[0].code, ErrorCode::QuoteUnavailable);

    assert_eq!(h.status(&first).await, OrderStatus::Fulfilled);
    assert_eq!(h.status(&second).await, OrderStatus::Open);
    assert_eq!(h.status(&third).await, OrderStatus::Fulfilled);

    // 10000 - 2 × 150 + 5 × 300
    let snapshot = h.snapshot().await;
    assert_eq!(snapshot.balance, Money::from_units(11_200));
    assert_eq!(snapshot.held(&Symbol::new("MSFT")), 0);

    // The failed order is picked up once the quote returns.
    h.quotes.resume(&Symbol::new("TSLA"));
    let report = h.sweeper(1).sweep().await.unwrap();
    assert_eq!(report.total, 1);
    assert_eq!(report.fulfilled, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unrepresentable_order_does_not_stop_sweep() {
    let h = Harness::new(Money::from_units(10_000), &[]);
    h.quotes.set_price("BRK", Money::new(dec!(10_000_000_000)));
    let huge = order_for(&alice(), "BRK", OrderType::Market, None, i64::MAX);
    let normal = order(OrderType::Market, None, 1);
    h.place(&huge).await;
    h.place(&normal).await;

    let sweeper = h.sweeper(1);
    let report = tokio::spawn(async move { sweeper.sweep().await })
        .await
        .unwrap()
        .unwrap();

    assert_eq!(report.total, 2);
    assert_eq!(report.cancelled, 1);
    assert_eq!(report.fulfilled, 1);
    assert_eq!(h.status(&huge).await, OrderStatus::Cancelled);
    assert_eq!(h.status(&normal).await, OrderStatus::Fulfilled);

    let snapshot = h.snapshot().await;
    assert_eq!(snapshot.balance, Money::from_units(9_850));
    assert_eq!(h.store.transaction_count(), 1);
}

// =============================================================================
// Trigger semantics
// =============================================================================

#[tokio::test]
async fn test_stop_orders_against_quote() {
    let h = Harness::new(Money::from_units(10_000), &[("AAPL", 10)]);

    // STOP BUY above the market waits; STOP SELL above the market triggers.
    let stop_buy = order(OrderType::Stop, Some(Money::from_units(155)), 1);
    let stop_sell = order(OrderType::Stop, Some(Money::from_units(155)), -3);
    h.place(&stop_buy).await;
    h.place(&stop_sell).await;

    assert_eq!(
        h.coordinator.process_order(&stop_buy).await.unwrap(),
        ProcessOutcome::StillOpen
    );
    let outcome = h.coordinator.process_order(&stop_sell).await.unwrap();
    assert_eq!(outcome.status(), OrderStatus::Fulfilled);

    h.quotes.set_price("AAPL", Money::from_units(155));
    let outcome = h.coordinator.process_order(&stop_buy).await.unwrap();
    assert_eq!(outcome.status(), OrderStatus::Fulfilled);

    // 10000 + 3 × 150 - 1 × 155
    let snapshot = h.snapshot().await;
    assert_eq!(snapshot.balance, Money::from_units(10_295));
    assert_eq!(snapshot.held(&aapl()), 8);
}

#[tokio::test]
async fn test_limit_sell_at_exact_trigger() {
    let h = Harness::new(Money::ZERO, &[("AAPL", 2)]);
    let o = order(OrderType::Limit, Some(Money::from_units(150)), -2);
    h.place(&o).await;

    let outcome = h.coordinator.process_order(&o).await.unwrap();
    assert_eq!(outcome.status(), OrderStatus::Fulfilled);

    let snapshot = h.snapshot().await;
    assert_eq!(snapshot.balance, Money::from_units(300));
    assert!(snapshot.holdings.is_empty());
}

// =============================================================================
// Idempotence and concurrency
// =============================================================================

#[tokio::test]
async fn test_processing_twice_settles_once() {
    let h = Harness::new(Money::from_units(10_000), &[]);
    let o = order(OrderType::Market, None, 3);
    h.place(&o).await;

    let first = h.coordinator.process_order(&o).await.unwrap();
    assert_eq!(first.status(), OrderStatus::Fulfilled);

    let err = h.coordinator.process_order(&o).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::OrderNotOpen);
    assert_eq!(h.store.transaction_count(), 1);
    assert_eq!(h.snapshot().await.balance, Money::from_units(9_550));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_attempts_settle_once() {
    let h = Harness::new(Money::from_units(10_000), &[]);
    let o = order(OrderType::Market, None, 1);
    h.place(&o).await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let coordinator = Arc::clone(&h.coordinator);
        let o = o.clone();
        handles.push(tokio::spawn(async move { coordinator.process_order(&o).await }));
    }

    let mut fulfilled = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(ProcessOutcome::Fulfilled(_)) => fulfilled += 1,
            Err(FulfillmentError::OrderNotOpen { .. }) => rejected += 1,
            other => panic!("unexpected result: {other:?}"),
        }
    }
    assert_eq!(fulfilled, 1);
    assert_eq!(rejected, 7);
    assert_eq!(h.store.transactions_for(&alice()).len(), 1);
    assert_eq!(h.snapshot().await.balance, Money::from_units(9_850));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_sweep_never_overdraws() {
    let h = Harness::new(Money::new(dec!(1000)), &[]);
    for _ in 0..25 {
        h.place(&order(OrderType::Market, None, 1)).await;
    }
    h.quotes.set_price("AAPL", Money::new(dec!(33.33)));

    let report = h.sweeper(8).sweep().await.unwrap();
    assert_eq!(report.fulfilled + report.cancelled, 25);
    assert_eq!(report.fulfilled, 25);

    h.quotes.set_price("AAPL", Money::new(dec!(100)));
    for _ in 0..5 {
        h.place(&order(OrderType::Market, None, 1)).await;
    }
    let report = h.sweeper(8).sweep().await.unwrap();

    // 1000 - 25 × 33.33 = 166.75, enough for one more share at 100.
    assert_eq!(report.fulfilled, 1);
    assert_eq!(report.cancelled, 4);
    let snapshot = h.snapshot().await;
    assert_eq!(snapshot.balance, Money::new(dec!(66.75)));
    assert_eq!(snapshot.held(&aapl()), 26);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_different_users_settle_independently() {
    let store = Arc::new(InMemoryStore::with_starting_balance(Money::from_units(500)));
    let quotes = Arc::new(StaticQuoteProvider::from_prices([(aapl(), Money::from_units(100))]));
    let coordinator = Arc::new(SettlementCoordinator::new(
        quotes,
        Arc::clone(&store),
        PostCommitDispatcher::default(),
    ));

    let users: Vec<UserId> = (0..10).map(|i| UserId::new(format!("user-{i}"))).collect();
    for user in &users {
        for _ in 0..3 {
            store
                .create_order(&order_for(user, "AAPL", OrderType::Market, None, 2))
                .await
                .unwrap();
        }
    }

    let sweeper = BatchSweeper::new(coordinator, Arc::clone(&store), 16);
    let report = sweeper.sweep().await.unwrap();
    assert_eq!(report.fulfilled, 20);
    assert_eq!(report.cancelled, 10);

    for user in &users {
        let snapshot = store.account_snapshot(user).await.unwrap();
        assert_eq!(snapshot.balance, Money::from_units(100));
        assert_eq!(snapshot.held(&aapl()), 4);
    }
}

// =============================================================================
// Rollback
// =============================================================================

#[derive(Clone, Copy, PartialEq, Eq)]
enum FailAt {
    Holdings,
    Commit,
}

struct FaultyLedger {
    inner: Arc<InMemoryStore>,
    fail_at: FailAt,
}

struct FaultyScope {
    inner: InMemorySettlementScope,
    fail_at: FailAt,
}

fn injected() -> StorageError {
    StorageError::WriteFailed {
        message: "injected".to_string(),
    }
}

#[async_trait]
impl SettlementScope for FaultyScope {
    fn user_id(&self) -> &UserId {
        self.inner.user_id()
    }

    async fn account_snapshot(&mut self) -> Result<AccountSnapshot, StorageError> {
        self.inner.account_snapshot().await
    }

    async fn load_order(&mut self, order_id: &OrderId) -> Result<Order, StorageError> {
        self.inner.load_order(order_id).await
    }

    async fn adjust_balance(&mut self, delta: Money) -> Result<(), StorageError> {
        self.inner.adjust_balance(delta).await
    }

    async fn adjust_holdings(
        &mut self,
        symbol: &Symbol,
        delta: Quantity,
    ) -> Result<(), StorageError> {
        if self.fail_at == FailAt::Holdings {
            return Err(injected());
        }
        self.inner.adjust_holdings(symbol, delta).await
    }

    async fn insert_transaction(
        &mut self,
        order_id: &OrderId,
        price_per_share: Money,
    ) -> Result<TransactionRecord, StorageError> {
        self.inner.insert_transaction(order_id, price_per_share).await
    }

    async fn cancel_order(&mut self, order_id: &OrderId) -> Result<bool, StorageError> {
        self.inner.cancel_order(order_id).await
    }

    async fn commit(self) -> Result<(), StorageError> {
        if self.fail_at == FailAt::Commit {
            return Err(injected());
        }
        self.inner.commit().await
    }
}

#[async_trait]
impl AccountLedgerPort for FaultyLedger {
    type Scope = FaultyScope;

    async fn begin(&self, user_id: &UserId) -> Result<Self::Scope, StorageError> {
        Ok(FaultyScope {
            inner: self.inner.begin(user_id).await?,
            fail_at: self.fail_at,
        })
    }

    async fn account_snapshot(&self, user_id: &UserId) -> Result<AccountSnapshot, StorageError> {
        self.inner.account_snapshot(user_id).await
    }
}

async fn assert_rolled_back(fail_at: FailAt) {
    let store = Arc::new(InMemoryStore::new());
    store.open_account(alice(), Money::from_units(1_000), [(aapl(), 1)]);
    let quotes = Arc::new(StaticQuoteProvider::from_prices([(aapl(), Money::from_units(150))]));
    let ledger = Arc::new(FaultyLedger {
        inner: Arc::clone(&store),
        fail_at,
    });
    let coordinator = SettlementCoordinator::new(quotes, ledger, PostCommitDispatcher::default());

    let o = order(OrderType::Market, None, 2);
    store.create_order(&o).await.unwrap();

    let err = coordinator.process_order(&o).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::SettlementFailed);

    let snapshot = store.account_snapshot(&alice()).await.unwrap();
    assert_eq!(snapshot.balance, Money::from_units(1_000));
    assert_eq!(snapshot.held(&aapl()), 1);
    assert_eq!(store.transaction_count(), 0);
    assert!(store.find_order(o.id()).await.unwrap().unwrap().is_open());
}

#[tokio::test]
async fn test_failed_write_rolls_back_everything() {
    assert_rolled_back(FailAt::Holdings).await;
}

#[tokio::test]
async fn test_failed_commit_rolls_back_everything() {
    assert_rolled_back(FailAt::Commit).await;
}

// =============================================================================
// Post-settlement effects
// =============================================================================

struct Recording {
    seen: AtomicUsize,
}

#[async_trait]
impl SettlementListenerPort for Recording {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn handle(&self, _event: &SettlementEvent) -> Result<(), ListenerError> {
        self.seen.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct Broken;

#[async_trait]
impl SettlementListenerPort for Broken {
    fn name(&self) -> &'static str {
        "broken"
    }

    async fn handle(&self, _event: &SettlementEvent) -> Result<(), ListenerError> {
        Err(ListenerError::failed("broken", "unreachable collaborator"))
    }
}

#[tokio::test]
async fn test_listener_failure_does_not_undo_trade() {
    let recording = Arc::new(Recording {
        seen: AtomicUsize::new(0),
    });
    let h = Harness::with_listeners(
        Money::from_units(1_000),
        &[],
        vec![
            Arc::new(Broken) as Arc<dyn SettlementListenerPort>,
            Arc::clone(&recording) as Arc<dyn SettlementListenerPort>,
        ],
    );
    let fill = order(OrderType::Market, None, 1);
    let hold = order(OrderType::Limit, Some(Money::from_units(1)), 1);
    let shortfall = order(OrderType::Market, None, 100);
    for o in [&fill, &hold, &shortfall] {
        h.place(o).await;
    }

    h.sweeper(1).sweep().await.unwrap();
    h.coordinator.drain_side_effects().await;

    assert_eq!(h.status(&fill).await, OrderStatus::Fulfilled);
    assert_eq!(h.snapshot().await.balance, Money::from_units(850));
    // One event each for the fill and the cancellation; none for the hold.
    assert_eq!(recording.seen.load(Ordering::SeqCst), 2);
}

// =============================================================================
// Conservation
// =============================================================================

mod conservation {
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    use super::*;

    fn run(initial_cents: i64, steps: Vec<(i64, i64)>) -> Result<(), TestCaseError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async move {
            let initial = Money::new(Decimal::new(initial_cents, 2));
            let h = Harness::new(initial, &[("AAPL", 5)]);
            let mut spent = Money::ZERO;
            let mut shares = 5_i64;

            for (price_cents, quantity) in steps {
                let price = Money::new(Decimal::new(price_cents, 2));
                h.quotes.set_price("AAPL", price);
                let o = order(OrderType::Market, None, quantity);
                h.place(&o).await;

                match h.coordinator.process_order(&o).await.unwrap() {
                    ProcessOutcome::Fulfilled(f) => {
                        prop_assert_eq!(f.price_per_share(), price);
                        spent += price.notional(Quantity::new(quantity)).unwrap();
                        shares += quantity;
                    }
                    ProcessOutcome::Cancelled(_) => {}
                    ProcessOutcome::StillOpen => prop_assert!(false, "market orders never hold"),
                }

                let snapshot = h.snapshot().await;
                prop_assert_eq!(snapshot.balance, initial - spent);
                prop_assert!(!snapshot.balance.is_negative());
                prop_assert_eq!(snapshot.held(&aapl()), shares);
                prop_assert!(shares >= 0);
            }
            Ok(())
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn balance_tracks_settled_notional(
            initial_cents in 0_i64..5_000_000,
            steps in prop::collection::vec(
                (1_i64..100_000, (-8_i64..=8).prop_filter("non-zero", |q| *q != 0)),
                1..20,
            ),
        ) {
            run(initial_cents, steps)?;
        }
    }
}
