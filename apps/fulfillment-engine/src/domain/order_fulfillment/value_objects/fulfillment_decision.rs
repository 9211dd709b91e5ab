//! Outcome of evaluating an order against a quote.

use serde::{Deserialize, Serialize};

/// Evaluator verdict for one order at one price.
///
/// Funds and holdings are not considered here; a `Fulfill` verdict can still
/// end in cancellation at settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FulfillmentDecision {
    /// Price conditions are met; proceed to settlement.
    Fulfill,
    /// Price conditions are not met; leave the order open.
    Hold,
}

impl FulfillmentDecision {
    /// Returns true for `Fulfill`.
    #[must_use]
    pub const fn is_fulfill(&self) -> bool {
        matches!(self, Self::Fulfill)
    }
}

impl From<bool> for FulfillmentDecision {
    fn from(fulfillable: bool) -> Self {
        if fulfillable { Self::Fulfill } else { Self::Hold }
    }
}
