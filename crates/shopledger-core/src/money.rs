//! # Money & Quantity Module
//!
//! Fixed-precision scaled-integer types for monetary values and decimal
//! quantities (two decimal places each).
//!
//! ## Why Integer Representation?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Scaled Integers                                          │
//! │    Money    = cents       (1099  = $10.99)                              │
//! │    Quantity = hundredths  (250   = 2.50 units, e.g. 2.5 kg)             │
//! │                                                                         │
//! │  Every sum, total and average in the system is integer math.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use shopledger_core::money::{Money, Quantity};
//!
//! let price = Money::from_cents(999);          // $9.99
//! let qty = Quantity::from_units(3);           // 3.00
//!
//! // Line total: quantity × unit price, rounded to the cent
//! assert_eq!(price.times(qty).cents(), 2997);  // $29.97
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for profit deltas
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Transparent serde**: Serializes as a plain integer of cents
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use shopledger_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
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

    /// Multiplies a unit price by a decimal quantity, rounding half up to
    /// the nearest cent.
    ///
    /// ## Implementation
    /// Quantity is scaled by 100, so the raw product is in 1/100 cents.
    /// Integer math through i128: `(cents × hundredths + 50) / 100`.
    ///
    /// ## Example
    /// ```rust
    /// use shopledger_core::money::{Money, Quantity};
    ///
    /// let price = Money::from_cents(999);           // $9.99
    /// let half = Quantity::from_hundredths(50);     // 0.50
    /// assert_eq!(price.times(half).cents(), 500);   // $4.995 → $5.00
    /// ```
    pub fn times(&self, qty: Quantity) -> Money {
        let raw = self.0 as i128 * qty.hundredths() as i128;
        Money(((raw + 50) / 100) as i64)
    }

    /// Divides a total by a count, truncating toward zero.
    ///
    /// Returns zero for a zero count — the average of nothing is nothing,
    /// never a divide-by-zero.
    pub fn divided_by(&self, count: i64) -> Money {
        if count == 0 {
            Money::zero()
        } else {
            Money(self.0 / count)
        }
    }
}

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for logs and debugging; callers format for display themselves.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Summing an iterator of Money values (report rollups).
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Quantity Type
// =============================================================================

/// A decimal quantity scaled by 100 (two decimal places).
///
/// Stock levels and sold quantities are decimals in this domain (2.50 kg of
/// produce, 0.75 m of cable), so they get the same scaled-integer treatment
/// as money.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Quantity(i64);

impl Quantity {
    /// Creates a quantity from hundredths (the stored representation).
    #[inline]
    pub const fn from_hundredths(hundredths: i64) -> Self {
        Quantity(hundredths)
    }

    /// Creates a quantity from whole units.
    ///
    /// ## Example
    /// ```rust
    /// use shopledger_core::money::Quantity;
    ///
    /// assert_eq!(Quantity::from_units(3).hundredths(), 300);
    /// ```
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Quantity(units * 100)
    }

    /// Returns the scaled value in hundredths.
    #[inline]
    pub const fn hundredths(&self) -> i64 {
        self.0
    }

    /// Zero quantity.
    #[inline]
    pub const fn zero() -> Self {
        Quantity(0)
    }

    /// Checks if the quantity is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the quantity is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

/// Displays the quantity as a decimal, e.g. `2.50`.
impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, (self.0 / 100).abs(), (self.0 % 100).abs())
    }
}

impl Add for Quantity {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Quantity(self.0 + other.0)
    }
}

impl AddAssign for Quantity {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Quantity {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Quantity(self.0 - other.0)
    }
}

impl SubAssign for Quantity {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Sum for Quantity {
    fn sum<I: Iterator<Item = Quantity>>(iter: I) -> Self {
        iter.fold(Quantity::zero(), Add::add)
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
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);

        let mut acc = Money::zero();
        acc += a;
        acc += b;
        assert_eq!(acc.cents(), 1500);
    }

    #[test]
    fn test_times_whole_quantity() {
        // $9.99 × 3 = $29.97
        let price = Money::from_cents(999);
        let total = price.times(Quantity::from_units(3));
        assert_eq!(total.cents(), 2997);
    }

    #[test]
    fn test_times_decimal_quantity_rounds() {
        // $9.99 × 0.50 = $4.995 → $5.00 (round half up)
        let price = Money::from_cents(999);
        let total = price.times(Quantity::from_hundredths(50));
        assert_eq!(total.cents(), 500);

        // $1.99 × 0.25 = $0.4975 → $0.50
        let total = Money::from_cents(199).times(Quantity::from_hundredths(25));
        assert_eq!(total.cents(), 50);
    }

    #[test]
    fn test_divided_by() {
        let total = Money::from_cents(1000);
        assert_eq!(total.divided_by(3).cents(), 333);
        assert_eq!(total.divided_by(0).cents(), 0);
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 250, 50].iter().map(|c| Money::from_cents(*c)).sum();
        assert_eq!(total.cents(), 400);

        let qty: Quantity = [100, 150]
            .iter()
            .map(|h| Quantity::from_hundredths(*h))
            .sum();
        assert_eq!(qty.hundredths(), 250);
    }

    #[test]
    fn test_quantity_display() {
        assert_eq!(format!("{}", Quantity::from_hundredths(250)), "2.50");
        assert_eq!(format!("{}", Quantity::from_units(3)), "3.00");
        assert_eq!(format!("{}", Quantity::from_hundredths(5)), "0.05");
    }

    #[test]
    fn test_quantity_checks() {
        assert!(Quantity::zero().is_zero());
        assert!(Quantity::from_units(1).is_positive());
        assert!(!Quantity::from_hundredths(-10).is_positive());
    }
}
