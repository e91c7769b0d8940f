//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Pool totals are compared for equality with client totals, so a        │
//! │  stray 0.000000004 would reject a valid request.                       │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    unit price, totals and merges are all i64 cents                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use fleet_core::money::Money;
//!
//! let price = Money::from_cents(1099); // $10.99
//! let total = price.line_total(3, 1);  // 3 units, sold singly
//! assert_eq!(total.cents(), 3297);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in cents.
///
/// ## Design Decisions
/// - **i64 (signed)**: subtraction during re-balancing may go negative
///   before it is rejected
/// - **Single field tuple struct**: Zero-cost abstraction over i64
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Parses a decimal amount (`"12.5"`, `"1000"`, `"0.125"`) into cents.
    ///
    /// Digits past the second decimal place are rounded half away from
    /// zero. Exponent notation (`"1e3"`) is accepted because JSON encoders
    /// emit it for very large or very small numbers.
    ///
    /// ## Example
    /// ```rust
    /// use fleet_core::money::Money;
    ///
    /// assert_eq!(Money::parse_decimal("12.5").unwrap().cents(), 1250);
    /// assert_eq!(Money::parse_decimal("0.125").unwrap().cents(), 13);
    /// assert!(Money::parse_decimal("twelve").is_none());
    /// ```
    pub fn parse_decimal(input: &str) -> Option<Money> {
        let s = input.trim();
        if s.is_empty() {
            return None;
        }

        if s.contains(|c: char| c == 'e' || c == 'E') {
            let value: f64 = s.parse().ok()?;
            if !value.is_finite() {
                return None;
            }
            return Some(Money((value * 100.0).round() as i64));
        }

        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };

        let (whole, frac) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };

        if whole.is_empty() && frac.is_empty() {
            return None;
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }

        let whole_cents: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse::<i64>().ok()?.checked_mul(100)?
        };

        let mut frac_digits = frac.chars().map(|c| c as i64 - '0' as i64);
        let tenths = frac_digits.next().unwrap_or(0);
        let hundredths = frac_digits.next().unwrap_or(0);
        let round_up = frac_digits.next().map(|d| d >= 5).unwrap_or(false);

        let mut cents = whole_cents.checked_add(tenths * 10 + hundredths)?;
        if round_up {
            cents = cents.checked_add(1)?;
        }

        Some(Money(if negative { -cents } else { cents }))
    }

    /// Value of `quantity` units when the price covers `unit_size` units.
    ///
    /// This is `round(price * quantity / unit_size, 2)`: the exact rational
    /// is computed in i128 and rounded half away from zero to the cent.
    ///
    /// ## Example
    /// ```rust
    /// use fleet_core::money::Money;
    ///
    /// // $10.00 per box of 3, 1 item → $3.33
    /// assert_eq!(Money::from_cents(1000).line_total(1, 3).cents(), 333);
    /// // $10.00 per box of 3, 2 items → $6.67
    /// assert_eq!(Money::from_cents(1000).line_total(2, 3).cents(), 667);
    /// ```
    ///
    /// A non-positive `unit_size` yields zero; validation rejects it before
    /// any total is computed.
    pub fn line_total(&self, quantity: i64, unit_size: i64) -> Money {
        if unit_size <= 0 {
            return Money::zero();
        }

        let numerator = self.0 as i128 * quantity as i128;
        let divisor = unit_size as i128;

        let magnitude = numerator.abs();
        let mut rounded = magnitude / divisor;
        if (magnitude % divisor) * 2 >= divisor {
            rounded += 1;
        }
        if numerator < 0 {
            rounded = -rounded;
        }

        Money(rounded as i64)
    }

    /// Decimal rendering used by API responses (`12.5` for 1250 cents).
    #[inline]
    pub fn as_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows money as a plain two-place decimal (`"12.50"`).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, (self.0 / 100).abs(), (self.0 % 100).abs())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
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

// =============================================================================
// Unit Tests
// =============================================================================
