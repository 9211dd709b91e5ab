//! Settlement Listener Port (Driven Port)
//!
//! Post-commit collaborators: net-worth recompute, quest tracking, user
//! notification, watchlist maintenance. Listeners only ever see committed
//! outcomes and cannot affect them.

use async_trait::async_trait;

use crate::domain::order_fulfillment::SettlementEvent;

/// Listener failure. Logged by the dispatcher, never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListenerError {
    /// The listener could not complete its work.
    #[error("{listener} failed: {message}")]
    Failed {
        /// Listener name.
        listener: String,
        /// Error details.
        message: String,
    },
}

impl ListenerError {
    /// Shorthand for [`ListenerError::Failed`].
    #[must_use]
    pub fn failed(listener: &str, message: impl Into<String>) -> Self {
        Self::Failed {
            listener: listener.to_string(),
            message: message.into(),
        }
    }
}

/// Port for post-settlement side effects.
#[async_trait]
pub trait SettlementListenerPort: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// React to a committed settlement event.
    async fn handle(&self, event: &SettlementEvent) -> Result<(), ListenerError>;
}
