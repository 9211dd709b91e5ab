//! Post-Settlement Listeners
//!
//! In-memory implementations of `SettlementListenerPort` for the platform
//! features that react to trades.

pub mod net_worth;
pub mod notifications;
pub mod quests;
pub mod watchlist;

pub use net_worth::{NetWorthListener, NetWorthPoint};
pub use notifications::{Notification, NotificationListener};
pub use quests::{DIVERSIFIED_TICKERS, Quest, QuestListener};
pub use watchlist::WatchlistListener;
