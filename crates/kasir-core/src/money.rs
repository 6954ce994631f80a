//! # Money
//!
//! Prices, line subtotals and order totals are whole units of one unit of
//! account, stored as `i64`. There is no currency and nothing to round.
//!
//! Checkout arithmetic goes through the `checked_*` methods so an absurd
//! quantity or price surfaces as an error instead of wrapping.
//!
//! ## Usage
//! ```rust
//! use kasir_core::money::Money;
//!
//! let price = Money::from_units(500);
//! let subtotal = price.checked_multiply_quantity(3).unwrap();
//! assert_eq!(subtotal.units(), 1500);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the single integer unit of account.
///
/// Serializes as the bare integer.
///
/// ```text
/// Product.unit_price ──► PricedLine.subtotal ──► OrderDraft.total ──► Order.total_amount
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole units.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units)
    }

    /// Returns the value in whole units.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a quantity, `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use kasir_core::money::Money;
    ///
    /// let unit_price = Money::from_units(299);
    /// assert_eq!(unit_price.checked_multiply_quantity(3), Some(Money::from_units(897)));
    /// assert_eq!(Money::from_units(i64::MAX).checked_multiply_quantity(2), None);
    /// ```
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(units) => Some(Money(units)),
            None => None,
        }
    }

    /// Adds two amounts, `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(units) => Some(Money(units)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl From<Money> for i64 {
    fn from(money: Money) -> Self {
        money.0
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_units() {
        let money = Money::from_units(2500);
        assert_eq!(money.units(), 2500);
        assert_eq!(i64::from(money), 2500);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_units(1099)), "1099");
        assert_eq!(format!("{}", Money::zero()), "0");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_units(1000);
        let b = Money::from_units(500);

        assert_eq!((a + b).units(), 1500);

        let mut total = Money::zero();
        total += a;
        total += b;
        assert_eq!(total.units(), 1500);
    }

    #[test]
    fn test_sum() {
        let total: Money = [1500, 1000].into_iter().map(Money::from_units).sum();
        assert_eq!(total, Money::from_units(2500));
    }

    #[test]
    fn test_checked_overflow() {
        assert!(Money::from_units(i64::MAX).checked_add(Money::from_units(1)).is_none());
        assert!(Money::from_units(i64::MAX / 2)
            .checked_multiply_quantity(3)
            .is_none());
        assert_eq!(
            Money::from_units(500).checked_multiply_quantity(3),
            Some(Money::from_units(1500))
        );
    }

    #[test]
    fn test_zero_and_checks() {
        assert!(Money::zero().is_zero());
        assert!(!Money::from_units(1).is_zero());
        assert!(Money::from_units(-1).is_negative());
        assert_eq!(Money::default(), Money::zero());
    }

    #[test]
    fn test_serializes_as_bare_integer() {
        let json = serde_json::to_string(&Money::from_units(2500)).unwrap();
        assert_eq!(json, "2500");
    }
}
