//! Money value object for cash balances and prices.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use super::Quantity;

/// A monetary amount in the platform's virtual currency.
///
/// Backed by `Decimal` so that settlement arithmetic is exact; a balance
/// debited by `price × quantity` and credited back lands on the starting
/// value to the last digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a Money value from a Decimal.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a Money value from whole currency units.
    #[must_use]
    pub fn from_units(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// Get the inner Decimal value.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if this amount is positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Returns true if this amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Signed notional of `quantity` shares at this price.
    ///
    /// Positive for buys, negative for sells. `None` if the product does not
    /// fit in a `Decimal`.
    #[must_use]
    pub fn notional(&self, quantity: Quantity) -> Option<Self> {
        self.0
            .checked_mul(Decimal::from(quantity.shares()))
            .map(Self)
    }

    /// Sum of two amounts, `None` on overflow.
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Mul<Decimal> for Money {
    type Output = Self;

    fn mul(self, rhs: Decimal) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn money_display_rounds_to_cents() {
        assert_eq!(Money::new(dec!(150.5)).to_string(), "$150.50");
    }

    #[test]
    fn notional_is_signed_by_quantity() {
        let price = Money::new(dec!(150));
        assert_eq!(price.notional(Quantity::new(3)), Some(Money::new(dec!(450))));
        assert_eq!(price.notional(Quantity::new(-2)), Some(Money::new(dec!(-300))));
    }

    #[test]
    fn notional_overflow_is_none() {
        let price = Money::new(dec!(10_000_000_000));
        assert_eq!(price.notional(Quantity::new(i64::MAX)), None);
        assert_eq!(price.notional(Quantity::new(i64::MIN)), None);
    }

    #[test]
    fn checked_add_reports_overflow() {
        let max = Money::new(Decimal::MAX);
        assert_eq!(max.checked_add(Money::from_units(1)), None);
        assert_eq!(
            Money::from_units(2).checked_add(Money::from_units(-3)),
            Some(Money::from_units(-1))
        );
    }

    #[test]
    fn notional_is_exact_for_fractional_prices() {
        let price = Money::new(dec!(0.1));
        assert_eq!(price.notional(Quantity::new(3)), Some(Money::new(dec!(0.3))));
    }

    #[test]
    fn money_arithmetic() {
        let a = Money::from_units(100);
        let b = Money::from_units(40);
        assert_eq!(a - b, Money::from_units(60));
        assert_eq!(a + b, Money::from_units(140));
        assert_eq!(-a, Money::from_units(-100));
        assert!((b - a).is_negative());
    }

    #[test]
    fn money_serde_as_string() {
        let json = serde_json::to_string(&Money::new(dec!(12.34))).unwrap();
        assert_eq!(json, "\"12.34\"");
        let parsed: Money = serde_json::from_str("\"12.34\"").unwrap();
        assert_eq!(parsed, Money::new(dec!(12.34)));
    }
}
