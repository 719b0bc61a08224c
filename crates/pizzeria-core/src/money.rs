//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely, and the
//! `TaxRate` applied to invoice totals.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    899 * 2 + 150 = 1948 cents = $19.48  ✅                              │
//! │                                                                         │
//! │  Floats only appear at the JSON edge, never in arithmetic.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Money is serialized as a JSON number with two fractional digits
//! (`8.99`). Inbound values may be JSON numbers or decimal strings
//! (`"8.99"`); anything finer than a cent is rounded half-up.
//!
//! Magnitudes are capped at [`Money::MAX`] (15 significant digits), the
//! range in which every amount survives the trip through an `f64` exactly.
//! Parsing and checked arithmetic refuse anything larger.
//!
//! ## Usage
//! ```rust
//! use pizzeria_core::money::Money;
//!
//! let price = Money::from_cents(899); // $8.99
//! let line = price.checked_mul_quantity(2).unwrap(); // $17.98
//! let total = line + Money::from_cents(150); // $19.48
//! assert_eq!(total.cents(), 1948);
//!
//! let parsed: Money = "19.48".parse().unwrap();
//! assert_eq!(parsed, total);
//! ```

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use std::str::FromStr;

use crate::error::ValidationError;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1000 bps = 10% (the flat invoice tax)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in cents.
///
/// ## Design Decisions
/// - **i64 (signed)**: arithmetic stays closed under subtraction
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Custom serde**: decimal on the wire, cents in memory and in SQLite
///
/// ## Where Money is Used
/// ```text
/// Item.price ──► × quantity ──► InvoiceItem.subtotal (frozen)
///                                     │
///                                     ▼
///                 Σ subtotals ──► Invoice.total ──► tax ──► grand_total
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Largest magnitude accepted: $9,999,999,999,999.99.
    pub const MAX: Money = Money(999_999_999_999_999);

    /// Creates a Money value from cents (the smallest currency unit).
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

    /// Returns zero money value.
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

    /// Calculates tax rounded half-up to the cent.
    ///
    /// ## Rounding
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  ROUND HALF-UP AT 2 DECIMAL PLACES                                  │
    /// │                                                                     │
    /// │  $19.48 × 10%  = $1.948  → $1.95                                    │
    /// │  $0.05  × 10%  = $0.005  → $0.01   (exact half goes up)            │
    /// │  $0.04  × 10%  = $0.004  → $0.00                                    │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// ## Implementation
    /// Integer math on the magnitude: `(|amount| * bps + 5000) / 10000`,
    /// sign restored afterwards so negative amounts round away from zero.
    ///
    /// ## Example
    /// ```rust
    /// use pizzeria_core::money::{Money, TaxRate};
    ///
    /// let total = Money::from_cents(1948);
    /// let tax = total.calculate_tax(TaxRate::from_bps(1000));
    /// assert_eq!(tax.cents(), 195);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 keeps amount * bps from overflowing
        let magnitude = (self.0 as i128).abs();
        let tax = (magnitude * rate.bps() as i128 + 5000) / 10000;
        let tax = if self.0 < 0 { -tax } else { tax };
        Money::from_cents(tax as i64)
    }

    /// Returns `Some` when `cents` is within `±MAX`.
    #[inline]
    pub fn bounded(cents: i64) -> Option<Self> {
        (cents.checked_abs()? <= Money::MAX.0).then_some(Money(cents))
    }

    /// Multiplies money by a quantity, returning `None` past `MAX`.
    ///
    /// ## Example
    /// ```rust
    /// use pizzeria_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(1099); // $10.99
    /// assert_eq!(unit_price.checked_mul_quantity(3).unwrap().cents(), 3297);
    /// assert!(Money::from_cents(i64::MAX).checked_mul_quantity(2).is_none());
    /// ```
    #[inline]
    pub fn checked_mul_quantity(&self, qty: i64) -> Option<Self> {
        self.0.checked_mul(qty).and_then(Money::bounded)
    }

    /// Adds two amounts, returning `None` past `MAX`.
    #[inline]
    pub fn checked_add(&self, other: Money) -> Option<Self> {
        self.0.checked_add(other.0).and_then(Money::bounded)
    }

    /// Converts to a float for the JSON edge. Never use for arithmetic.
    #[inline]
    pub fn to_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Converts a float amount to cents, rounding half away from zero.
    pub fn from_f64(value: f64) -> Result<Self, ValidationError> {
        let cents = (value * 100.0).round();
        if !cents.is_finite() || cents.abs() > Money::MAX.0 as f64 {
            return Err(ValidationError::InvalidFormat {
                field: "amount".to_string(),
                reason: format!("{} is not a representable amount", value),
            });
        }
        Ok(Money(cents as i64))
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses a decimal string (`"8.99"`, `"-1.5"`, `"3"`) exactly.
///
/// Digits past the second fractional place are rounded half-up on the
/// magnitude.
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: reason.to_string(),
        };

        let s = s.trim();
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };

        let (whole, fraction) = match digits.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (digits, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid("expected a decimal number"));
        }
        if !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid("expected a decimal number"));
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("amount is too large"))?
        };

        let mut frac_digits = fraction.bytes().map(|b| (b - b'0') as i64);
        let tenths = frac_digits.next().unwrap_or(0);
        let hundredths = frac_digits.next().unwrap_or(0);
        let round_up = frac_digits.next().map(|d| d >= 5).unwrap_or(false);

        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(tenths * 10 + hundredths + round_up as i64))
            .and_then(Money::bounded)
            .ok_or_else(|| invalid("amount is too large"))?;

        Ok(Money(if negative { -cents.0 } else { cents.0 }))
    }
}

// =============================================================================
// Serde
// =============================================================================

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_f64())
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal amount as a number or string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        v.checked_mul(100)
            .and_then(Money::bounded)
            .ok_or_else(|| E::custom("amount is too large"))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        i64::try_from(v)
            .ok()
            .and_then(|v| v.checked_mul(100))
            .and_then(Money::bounded)
            .ok_or_else(|| E::custom("amount is too large"))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        Money::from_f64(v).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        v.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows money as `$19.48` (logs and error messages).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.dollars().abs(), self.cents_part())
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

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
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
