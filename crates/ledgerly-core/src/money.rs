//! # Money Module
//!
//! Provides the `Money` type for handling monetary values on documents.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │    3 × 30 × 5% = 4.5000000000000005 ❌ drifts the tax line              │
//! │                                                                         │
//! │  Integer cents do not work either: tax lines are NOT rounded, so       │
//! │  12.5% of 0.33 must stay 0.04125 until the document total.             │
//! │                                                                         │
//! │  OUR SOLUTION: base-10 Decimal                                          │
//! │    Exact for every value a user can type, rounded only where the       │
//! │    pricing rules say so (round_cents / round_whole)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Never Panics
//! Form state arrives mid-edit and may hold absurd magnitudes. All
//! arithmetic saturates at the `Decimal` range (about ±7.9e28) instead of
//! overflowing. A saturated result is clamped, not exact: once a line
//! value reaches the range edge, identities such as
//! `taxable_amount == rate − discount` no longer hold for that line, and a
//! percentage of a clamped amount is taken of the clamp.
//!
//! ## Usage
//! ```rust
//! use ledgerly_core::money::Money;
//! use rust_decimal::Decimal;
//!
//! let unit = Money::new(Decimal::new(1999, 2)); // 19.99
//! let line = unit.multiply_quantity(3).round_cents();
//! assert_eq!(line.amount(), Decimal::new(5997, 2));
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, AddAssign, Sub};
use ts_rs::TS;

use crate::lenient;

/// Decimal places kept by [`Money::round_cents`].
pub const CENT_PLACES: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in major currency units, held as an exact decimal.
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  LineItem.original_rate ──┐                                            │
/// │  LineItem.form_updated_rate ─┴─► unit rate × qty ──► rate (round2)     │
/// │                                                       │                 │
/// │                                   discount (round2) ◄─┤                 │
/// │                                                       ▼                 │
/// │                          taxable_amount ──► tax ──► amount             │
/// │                                                                         │
/// │  DocumentTotals folds rate / discount / tax across every line          │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
///
/// ## Serialization
/// Serialized as a JSON number (what the frontend expects). Deserialization
/// is lenient: numbers, numeric strings, `null` and garbage are all accepted,
/// the latter two becoming zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, TS)]
#[ts(export)]
pub struct Money(#[ts(type = "number")] Decimal);

impl Money {
    /// Wraps a decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Returns the underlying decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Rounds to two decimal places, midpoints away from zero.
    ///
    /// This is the per-step monetary rounding applied to a line's `rate`
    /// and `discount`, matching fixed two-digit display of the same value.
    ///
    /// ## Example
    /// ```rust
    /// use ledgerly_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(Money::new(Decimal::new(12345, 3)).round_cents().amount(), Decimal::new(1235, 2));
    /// assert_eq!(Money::new(Decimal::new(-12345, 3)).round_cents().amount(), Decimal::new(-1235, 2));
    /// ```
    pub fn round_cents(&self) -> Money {
        Money(
            self.0
                .round_dp_with_strategy(CENT_PLACES, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Rounds to the nearest whole unit, midpoints toward positive infinity.
    ///
    /// Used for document round-off: `2.5 → 3`, `-2.5 → -2`.
    ///
    /// ## Example
    /// ```rust
    /// use ledgerly_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(Money::new(Decimal::new(123456, 2)).round_whole().amount(), Decimal::new(1235, 0));
    /// assert_eq!(Money::new(Decimal::new(-25, 1)).round_whole().amount(), Decimal::new(-2, 0));
    /// ```
    pub fn round_whole(&self) -> Money {
        Money(self.0.saturating_add(Decimal::new(5, 1)).floor())
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use ledgerly_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let unit = Money::new(Decimal::new(299, 2)); // 2.99
    /// assert_eq!(unit.multiply_quantity(3).amount(), Decimal::new(897, 2));
    /// ```
    #[inline]
    pub fn multiply_quantity(&self, qty: i64) -> Money {
        Money(self.0.saturating_mul(Decimal::from(qty)))
    }

    /// Returns `percent`% of this amount, unrounded.
    ///
    /// ## Example
    /// ```rust
    /// use ledgerly_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let rate = Money::new(Decimal::new(200, 0));
    /// assert_eq!(rate.percentage(Decimal::new(10, 0)).amount(), Decimal::new(20, 0));
    /// ```
    pub fn percentage(&self, percent: Decimal) -> Money {
        // (x * p) / 100 keeps the product exact before scaling down.
        Money(self.0.saturating_mul(percent) / Decimal::ONE_HUNDRED)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the amount with two decimals, no currency symbol.
///
/// ## Note
/// Currency symbols belong to configuration; see
/// `ledgerly_forms::FormsConfig::format_currency`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.round_cents().0)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        lenient::decimal::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        lenient::decimal::deserialize(deserializer).map(Money)
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::new(dec!(10.99))), "10.99");
        assert_eq!(format!("{}", Money::new(dec!(5))), "5.00");
        assert_eq!(format!("{}", Money::new(dec!(-5.5))), "-5.50");
        assert_eq!(format!("{}", Money::zero()), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::new(dec!(10.00));
        let b = Money::new(dec!(5.00));

        assert_eq!((a + b).amount(), dec!(15.00));
        assert_eq!((a - b).amount(), dec!(5.00));
        assert_eq!(a.multiply_quantity(3).amount(), dec!(30.00));

        let mut c = a;
        c += b;
        assert_eq!(c.amount(), dec!(15.00));
    }

    #[test]
    fn test_round_cents_midpoint_goes_away_from_zero() {
        assert_eq!(Money::new(dec!(0.125)).round_cents().amount(), dec!(0.13));
        assert_eq!(Money::new(dec!(-0.125)).round_cents().amount(), dec!(-0.13));
        assert_eq!(Money::new(dec!(0.124)).round_cents().amount(), dec!(0.12));
    }

    #[test]
    fn test_round_whole_midpoint_goes_up() {
        assert_eq!(Money::new(dec!(2.5)).round_whole().amount(), dec!(3));
        assert_eq!(Money::new(dec!(-2.5)).round_whole().amount(), dec!(-2));
        assert_eq!(Money::new(dec!(-2.51)).round_whole().amount(), dec!(-3));
        assert_eq!(Money::new(dec!(1234.56)).round_whole().amount(), dec!(1235));
    }

    #[test]
    fn test_percentage_is_unrounded() {
        let amount = Money::new(dec!(0.33));
        assert_eq!(amount.percentage(dec!(12.5)).amount(), dec!(0.04125));
    }

    #[test]
    fn test_saturates_instead_of_overflowing() {
        let huge = Money::new(Decimal::MAX);
        assert_eq!((huge + huge).amount(), Decimal::MAX);
        assert_eq!(huge.multiply_quantity(1_000).amount(), Decimal::MAX);
        assert_eq!(huge.round_whole().amount(), Decimal::MAX);
    }

    #[test]
    fn test_saturation_clamps_differences_at_the_range_edge() {
        let rate = Money::new(Decimal::MAX);
        let discount = Money::new(Decimal::MIN);

        let taxable = rate - discount;
        assert_eq!(taxable.amount(), Decimal::MAX);
        assert_eq!(
            taxable.percentage(dec!(100)).amount(),
            Decimal::MAX / Decimal::ONE_HUNDRED
        );
    }

    #[test]
    fn test_serde_number_in_lenient_out() {
        let money: Money = serde_json::from_str("\"12.50\"").unwrap();
        assert_eq!(money.amount(), dec!(12.50));

        let money: Money = serde_json::from_str("null").unwrap();
        assert!(money.is_zero());

        let json = serde_json::to_string(&Money::new(dec!(78.75))).unwrap();
        assert_eq!(json, "78.75");
    }
}
