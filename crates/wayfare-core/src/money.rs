//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Micro-Units?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE RECOMPUTATION PROBLEM                                              │
//! │                                                                         │
//! │  The quote is re-derived after every edit on every sheet:              │
//! │    protection, extras, driver, payment, dates ...                      │
//! │                                                                         │
//! │  With floats:   0.08 × 205.00 = 16.400000000000002  ❌                  │
//! │  With cents:    8% of 1 cent  = 0.08 cents → must round  ❌            │
//! │                                                                         │
//! │  OUR SOLUTION: Integer micro-units (1/1_000_000 of a dollar)           │
//! │    Catalog prices are whole cents = multiples of 10_000 micros         │
//! │    Any basis-point tax over whole cents is EXACT in micros             │
//! │    Only the displayed total is rounded to cents                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use wayfare_core::money::Money;
//!
//! let per_day = Money::from_cents(5000); // $50.00
//! let base = per_day * 3u32;             // $150.00
//! assert_eq!(base.to_cents(), 15000);
//! assert_eq!(base.to_string(), "$150.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

/// Micro-units in one cent.
pub const MICROS_PER_CENT: i64 = 10_000;

/// Micro-units in one major currency unit (dollar).
pub const MICROS_PER_UNIT: i64 = 1_000_000;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in micro-units of the booking currency.
///
/// ## Design Decisions
/// - **i64 (signed)**: subtraction is allowed, but every quote field the
///   pricing calculator produces is non-negative
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **No float constructor**: prices enter as cents and never leave the
///   integer domain until [`Money::to_cents`] at display time
///
/// ## Where Money Flows
/// ```text
/// Car.price_per_day ──────────┐
/// ProtectionPackage.per_day ──┼──► × rental_days ──► subtotal ──► taxes
/// CarExtra.per_day × qty ─────┘                         │            │
///                                                       └──► total ◄─┘
///                                                              │
///                                                   round_to_cents() (display)
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents. Saturates at the i64 bounds.
    ///
    /// ## Example
    /// ```rust
    /// use wayfare_core::money::Money;
    ///
    /// let fee = Money::from_cents(2500); // $25.00
    /// assert_eq!(fee.micros(), 25_000_000);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents.saturating_mul(MICROS_PER_CENT))
    }

    /// Creates a Money value from major and minor units (dollars and cents).
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -$5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money::from_cents(major.saturating_mul(100).saturating_sub(minor))
        } else {
            Money::from_cents(major.saturating_mul(100).saturating_add(minor))
        }
    }

    /// Creates a Money value from raw micro-units.
    #[inline]
    pub const fn from_micros(micros: i64) -> Self {
        Money(micros)
    }

    /// Returns the exact value in micro-units.
    #[inline]
    pub const fn micros(&self) -> i64 {
        self.0
    }

    /// Returns the value rounded to whole cents (half away from zero).
    ///
    /// ## Example
    /// ```rust
    /// use wayfare_core::money::Money;
    ///
    /// assert_eq!(Money::from_micros(16_405_000).to_cents(), 1641); // $16.405 → $16.41
    /// assert_eq!(Money::from_micros(16_404_999).to_cents(), 1640);
    /// ```
    pub fn to_cents(&self) -> i64 {
        round_div(self.0 as i128, MICROS_PER_CENT as i128) as i64
    }

    /// Returns a copy rounded to whole cents. Display-time only.
    pub fn round_to_cents(&self) -> Money {
        Money::from_cents(self.to_cents())
    }

    /// Returns true when the value has no sub-cent remainder.
    #[inline]
    pub const fn is_whole_cents(&self) -> bool {
        self.0 % MICROS_PER_CENT == 0
    }

    /// Returns the major unit (dollars) portion of the rounded value.
    pub fn dollars(&self) -> i64 {
        self.to_cents() / 100
    }

    /// Returns the minor unit (cents) portion of the rounded value (0-99).
    pub fn cents_part(&self) -> i64 {
        (self.to_cents() % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Calculates tax at the given rate.
    ///
    /// ## Implementation
    /// `micros × bps / 10_000` in i128. For whole-cent amounts this division
    /// is exact (a cent is 10_000 micros), so no rounding happens at all.
    /// Amounts with a sub-cent remainder round half away from zero at the
    /// micro level.
    ///
    /// ## Example
    /// ```rust
    /// use wayfare_core::money::Money;
    /// use wayfare_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_cents(20500);      // $205.00
    /// let tax = subtotal.calculate_tax(TaxRate::from_bps(800)); // 8%
    /// assert_eq!(tax, Money::from_cents(1640));     // $16.40, exact
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        let micros = round_div(self.0 as i128 * rate.bps() as i128, 10_000);
        Money(micros.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Multiplies money by a quantity.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

/// Integer division rounding half away from zero.
fn round_div(numerator: i128, denominator: i128) -> i128 {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    if remainder.abs() * 2 >= denominator {
        quotient + numerator.signum()
    } else {
        quotient
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================
//
// Arithmetic saturates at the i64 bounds instead of wrapping.

/// Shows money rounded to cents, e.g. `$221.40`.
///
/// ## Note
/// Locale-aware formatting belongs to the UI; see the config's
/// `format_currency` for the configured symbol.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cents = self.to_cents();
        let sign = if cents < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, (cents / 100).abs(), (cents % 100).abs())
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

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

/// Multiplication by day counts and quantities.
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        Money(self.0.saturating_mul(qty as i64))
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
