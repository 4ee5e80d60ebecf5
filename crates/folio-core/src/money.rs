//! # Money Module
//!
//! Provides the `Money` type for invoice amounts.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Invoices bill fractional quantities (1.5 hours × 37.25/h), so integer  │
//! │  cents would already round each line before the subtotal.              │
//! │                                                                         │
//! │  OUR SOLUTION: exact base-10 decimals                                   │
//! │    subtotal is the exact sum of every line                              │
//! │    only taxAmount and total are rounded, once, to 2 places             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use folio_core::money::Money;
//! use rust_decimal::Decimal;
//!
//! let rate = Money::from_cents(3725); // 37.25
//! let line = rate.times(Decimal::new(15, 1)); // × 1.5
//! assert_eq!(line.to_string(), "55.88");
//! assert_eq!(line, Money::from_decimal(Decimal::new(55875, 3))); // exact
//! ```

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in major currency units, held as an exact decimal.
///
/// Serialized as a plain JSON number so stored documents stay readable by
/// the admin panel and by the legacy snapshot format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(
    #[serde(with = "rust_decimal::serde::float")]
    #[ts(type = "number")]
    Decimal,
);

impl Money {
    /// Creates a Money value from whole major units.
    #[inline]
    pub fn from_major(major: i64) -> Self {
        Money(Decimal::from(major))
    }

    /// Creates a Money value from minor units (cents).
    ///
    /// ```rust
    /// use folio_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1099).to_string(), "10.99");
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    /// Wraps an exact decimal amount.
    #[inline]
    pub const fn from_decimal(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Converts a float, as found in JSON payloads.
    ///
    /// Returns `None` for NaN, infinities and magnitudes a decimal can't hold.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        Decimal::from_f64(value).map(Money)
    }

    /// Returns the exact decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Lossy float view, used for the denormalized `total` column.
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(0.0)
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Multiplies by a (possibly fractional) quantity without rounding.
    ///
    /// ```rust
    /// use folio_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let rate = Money::from_major(150);
    /// assert_eq!(rate.times(Decimal::from(2)), Money::from_major(300));
    /// ```
    #[inline]
    pub fn times(&self, quantity: Decimal) -> Self {
        Money(self.0.saturating_mul(quantity))
    }

    /// Returns `percent`% of this amount, unrounded.
    pub fn percent(&self, percent: Decimal) -> Self {
        Money(self.0.saturating_mul(percent) / Decimal::ONE_HUNDRED)
    }

    /// Rounds half away from zero to two decimal places.
    ///
    /// ## Rounding Policy
    /// ```text
    ///   0.125 → 0.13     0.135 → 0.14     -0.125 → -0.13
    ///   (midpoints always move away from zero, unlike bankers rounding)
    /// ```
    ///
    /// ```rust
    /// use folio_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let tax = Money::from_decimal(Decimal::new(125, 3)); // 0.125
    /// assert_eq!(tax.round2(), Money::from_cents(13));
    /// ```
    #[inline]
    pub fn round2(&self) -> Self {
        Money(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Clamps negative amounts to zero.
    #[inline]
    pub fn clamp_non_negative(&self) -> Self {
        if self.is_negative() {
            Money::zero()
        } else {
            *self
        }
    }

    /// Formats with a currency code/symbol: `"US$ 330.00"`.
    ///
    /// ```rust
    /// use folio_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(330).format_with("US$"), "US$ 330.00");
    /// assert_eq!(Money::from_cents(5).format_with("INR"), "INR 0.05");
    /// ```
    pub fn format_with(&self, currency: &str) -> String {
        format!("{} {}", currency.trim(), self)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Always exactly two decimal places.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.round2().0)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.amount(), Decimal::new(1099, 2));
        assert_eq!(money.to_string(), "10.99");
    }

    #[test]
    fn test_display_pads_two_places() {
        assert_eq!(Money::from_major(300).to_string(), "300.00");
        assert_eq!(Money::from_cents(50).to_string(), "0.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(
            Money::from_decimal(Decimal::new(125, 3)).round2(),
            Money::from_cents(13)
        );
        assert_eq!(
            Money::from_decimal(Decimal::new(135, 3)).round2(),
            Money::from_cents(14)
        );
        assert_eq!(
            Money::from_decimal(Decimal::new(-125, 3)).round2(),
            Money::from_cents(-13)
        );
    }

    #[test]
    fn test_float_precision_is_exact() {
        // 0.1 + 0.2 stays 0.3
        let a = Money::from_f64(0.1).unwrap();
        let b = Money::from_f64(0.2).unwrap();
        assert_eq!(a + b, Money::from_f64(0.3).unwrap());
    }

    #[test]
    fn test_from_f64_rejects_non_finite() {
        assert!(Money::from_f64(f64::NAN).is_none());
        assert!(Money::from_f64(f64::INFINITY).is_none());
    }

    #[test]
    fn test_times_fractional_quantity() {
        let rate = Money::from_cents(3725);
        let line = rate.times(Decimal::new(15, 1));
        assert_eq!(line.amount(), Decimal::new(55875, 3));
    }

    #[test]
    fn test_clamp_non_negative() {
        assert_eq!(Money::from_major(-5).clamp_non_negative(), Money::zero());
        assert_eq!(Money::from_major(5).clamp_non_negative(), Money::from_major(5));
    }

    #[test]
    fn test_sum() {
        let items = [Money::from_cents(100), Money::from_cents(250), Money::from_cents(5)];
        let total: Money = items.iter().sum();
        assert_eq!(total, Money::from_cents(355));
    }

    #[test]
    fn test_serializes_as_json_number() {
        let json = serde_json::to_string(&Money::from_cents(33050)).unwrap();
        assert_eq!(json, "330.5");

        let back: Money = serde_json::from_str("330.5").unwrap();
        assert_eq!(back, Money::from_cents(33050));

        let whole: Money = serde_json::from_str("150").unwrap();
        assert_eq!(whole, Money::from_major(150));
    }
}
