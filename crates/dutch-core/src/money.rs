//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The OCR service reports amounts as JSON numbers:                       │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A $110.00 bill split by subtotal fractions in f32 drifts by whole     │
//! │  cents once a few line items are involved.                              │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Amounts become i64 cents at the wire boundary and stay integers     │
//! │    through every allocation step. Rounding happens exactly once, in    │
//! │    `prorate`, and we KNOW which direction it went.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use dutch_core::money::Money;
//!
//! // Create from cents (preferred)
//! let amount = Money::from_cents(1099); // $10.99
//!
//! // Arithmetic operations
//! let total = amount + Money::from_cents(500); // $15.99
//!
//! // NEVER do this:
//! // let bad = Money::from_float(10.99); // NO SUCH METHOD EXISTS!
//! // Float conversion lives at the extraction wire boundary only.
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents for USD).
///
/// ## Design Decisions
/// - **i64 (signed)**: Refund lines on receipts carry negative amounts
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  LineItem.amount_cents ──► participant subtotal ──► prorated share     │
/// │                                                                         │
/// │  Receipt.subtotal / tax / total ──► allocation denominator / scale     │
/// │                                                                         │
/// │  EVERY monetary value in the engine flows through this type            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use dutch_core::money::Money;
    ///
    /// let amount = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(amount.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units (dollars and cents).
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    /// `from_major_minor(-5, 50)` = -$5.50, not -$4.50
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        // Handle sign: if major is negative, minor should subtract
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents (smallest currency unit).
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

    /// Returns zero money value.
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

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Scales this amount by the fraction `part / whole`, rounded to the
    /// nearest cent.
    ///
    /// This is the allocation kernel: a participant's share of the
    /// tax-inclusive total is `total.prorate(individual_subtotal, subtotal)`.
    /// Distributing tax by subtotal fraction (rather than per-line tax rates)
    /// is the fairest split available when the receipt carries only a single
    /// tax figure.
    ///
    /// ## Rounding Rule
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  ROUND HALF AWAY FROM ZERO                                          │
    /// │                                                                     │
    /// │    0.5 →  1      1.5 →  2      2.5 →  3                            │
    /// │   -0.5 → -1     -1.5 → -2     -2.5 → -3                            │
    /// │                                                                     │
    /// │  Each participant rounds independently; the shares of a fully      │
    /// │  assigned receipt may therefore drift from the printed total by    │
    /// │  up to one cent per participant. That drift is accepted, not       │
    /// │  corrected.                                                         │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// ## Implementation
    /// Integer math in i128: `(2·|n| + d) / (2·d)` applied to magnitudes,
    /// sign restored afterwards. No overflow for any realistic receipt.
    ///
    /// ## Example
    /// ```rust
    /// use dutch_core::money::Money;
    ///
    /// let total = Money::from_cents(11_000);    // $110.00 (tax included)
    /// let item = Money::from_cents(6_000);      // $60.00 of line items
    /// let subtotal = Money::from_cents(10_000); // $100.00 subtotal
    ///
    /// // $60 / $100 of the subtotal ⇒ $66.00 of the total
    /// assert_eq!(total.prorate(item, subtotal).cents(), 6_600);
    /// ```
    ///
    /// ## Edge Case
    /// `whole == 0` returns zero: nothing assigned against an empty subtotal
    /// means nothing owed. Division by zero is defined away, not an error.
    pub fn prorate(&self, part: Money, whole: Money) -> Money {
        if whole.is_zero() {
            return Money::zero();
        }

        let num = self.0 as i128 * part.0 as i128;
        let den = whole.0 as i128;

        let negative = (num < 0) != (den < 0);
        let (n, d) = (num.abs(), den.abs());

        // (2n + d) / 2d rounds n/d to nearest, ties away from zero
        let q = (2 * n + d) / (2 * d);
        Money(if negative { -(q as i64) } else { q as i64 })
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for debugging. Use frontend formatting for actual UI display
/// to handle localization properly.
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

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
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

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Negation (refund lines).
impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Summing an iterator of Money values.
impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
