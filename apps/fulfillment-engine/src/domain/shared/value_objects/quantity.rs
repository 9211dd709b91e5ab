//! Signed share quantity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A whole number of shares with the trade direction in its sign.
///
/// Positive quantities buy, negative quantities sell. An order never carries
/// a zero quantity; holdings may be zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(i64);

impl Quantity {
    /// Zero shares.
    pub const ZERO: Self = Self(0);

    /// Create a quantity from a signed share count.
    #[must_use]
    pub const fn new(shares: i64) -> Self {
        Self(shares)
    }

    /// Signed share count.
    #[must_use]
    pub const fn shares(&self) -> i64 {
        self.0
    }

    /// Returns true for a buy quantity.
    #[must_use]
    pub const fn is_buy(&self) -> bool {
        self.0 > 0
    }

    /// Returns true for a sell quantity.
    #[must_use]
    pub const fn is_sell(&self) -> bool {
        self.0 < 0
    }

    /// Returns true if this quantity is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Unsigned share count.
    #[must_use]
    pub const fn unsigned_abs(&self) -> u64 {
        self.0.unsigned_abs()
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Quantity {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_follows_sign() {
        assert!(Quantity::new(5).is_buy());
        assert!(!Quantity::new(5).is_sell());
        assert!(Quantity::new(-5).is_sell());
        assert!(Quantity::ZERO.is_zero());
    }

    #[test]
    fn unsigned_abs_drops_sign() {
        assert_eq!(Quantity::new(-12).unsigned_abs(), 12);
        assert_eq!(Quantity::new(i64::MIN).unsigned_abs(), 9_223_372_036_854_775_808);
    }
}
