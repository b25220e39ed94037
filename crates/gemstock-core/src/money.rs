//! # Money Module
//!
//! Provides the `Money` type for purchase prices, selling prices, expenses,
//! shipment costs and return amounts.
//!
//! ## Wire Format vs Memory Format
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  JSON (exports, local snapshot, remote document)                       │
//! │    "purchasePrice": 1250.5                                             │
//! │            │                                                            │
//! │            ▼  deserialize: × 100, round to nearest minor unit          │
//! │  Memory                                                                 │
//! │    Money(125050)                                                       │
//! │            │                                                            │
//! │            ▼  serialize: ÷ 100 as a plain JSON number                  │
//! │  JSON                                                                   │
//! │    "purchasePrice": 1250.5                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Amounts are currency-agnostic: the records never say which currency they
//! are in, so neither does this type. Profit sums are done on integers, so
//! `0.1 + 0.2` is exactly `0.3` here.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// Largest accepted magnitude, in minor units (one hundred billion).
///
/// Any per-record amount read from outside stays within this bound, so
/// sums over a collection cannot overflow `i64`.
pub const MAX_CENTS: i64 = 10_000_000_000_000;

/// A monetary amount in minor units (hundredths).
///
/// ## Design Decisions
/// - **i64 (signed)**: profit can be negative when an item sells below cost
/// - **Custom serde**: decimal on the wire, integer in memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use gemstock_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }


    /// Converts a decimal amount (as typed into a form or found in a JSON
    /// file) to Money, rounding to the nearest minor unit.
    ///
    /// Returns `None` for NaN, infinities and anything beyond
    /// [`MAX_CENTS`].
    ///
    /// ## Example
    /// ```rust
    /// use gemstock_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(10.99).unwrap().cents(), 1099);
    /// assert_eq!(Money::from_decimal(0.125).unwrap().cents(), 13);
    /// assert!(Money::from_decimal(f64::NAN).is_none());
    /// assert!(Money::from_decimal(1e300).is_none());
    /// ```
    pub fn from_decimal(value: f64) -> Option<Self> {
        let cents = (value * 100.0).round();
        if !cents.is_finite() || cents.abs() > MAX_CENTS as f64 {
            return None;
        }
        Some(Money(cents as i64))
    }

    /// Returns the amount as a decimal number (for the wire format only).
    #[inline]
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

// =============================================================================
// Serde
// =============================================================================

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Whole amounts go out as integers so exported files read "1500"
        // rather than "1500.0".
        if self.0 % 100 == 0 {
            serializer.serialize_i64(self.0 / 100)
        } else {
            serializer.serialize_f64(self.to_decimal())
        }
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

/// Accepts JSON numbers and numeric strings (older exports stored the raw
/// form value).
struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal amount")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        v.checked_mul(100)
            .filter(|cents| cents.abs() <= MAX_CENTS)
            .map(Money)
            .ok_or_else(|| E::custom("amount out of range"))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        i64::try_from(v)
            .map_err(|_| E::custom("amount out of range"))
            .and_then(|v| self.visit_i64(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        Money::from_decimal(v).ok_or_else(|| E::custom("amount out of range"))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            return Ok(Money::zero());
        }
        trimmed
            .replace(',', ".")
            .parse::<f64>()
            .map_err(|_| E::custom(format!("invalid amount: {:?}", v)))
            .and_then(|v| self.visit_f64(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Money, E> {
        Ok(Money::zero())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal rendering, no currency symbol.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
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

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_decimal_float_sum_is_exact() {
        let a = Money::from_decimal(0.1).unwrap();
        let b = Money::from_decimal(0.2).unwrap();
        assert_eq!(a + b, Money::from_cents(30));
    }

    #[test]
    fn test_serialize_as_decimal_number() {
        assert_eq!(serde_json::to_string(&Money::from_cents(150000)).unwrap(), "1500");
        assert_eq!(serde_json::to_string(&Money::from_cents(125050)).unwrap(), "1250.5");
        assert_eq!(serde_json::to_string(&Money::from_cents(-1)).unwrap(), "-0.01");
    }

    #[test]
    fn test_deserialize_numbers_and_strings() {
        let m: Money = serde_json::from_str("1250.5").unwrap();
        assert_eq!(m.cents(), 125050);

        let m: Money = serde_json::from_str("42").unwrap();
        assert_eq!(m.cents(), 4200);

        let m: Money = serde_json::from_str("\"99,95\"").unwrap();
        assert_eq!(m.cents(), 9995);

        let m: Money = serde_json::from_str("\"\"").unwrap();
        assert_eq!(m, Money::zero());

        assert!(serde_json::from_str::<Money>("\"abc\"").is_err());
    }

    #[test]
    fn test_huge_amounts_are_rejected() {
        assert!(Money::from_decimal(1e17).is_none());
        assert!(Money::from_decimal(-1e17).is_none());
        assert_eq!(Money::from_decimal(1e11).unwrap().cents(), MAX_CENTS);

        assert!(serde_json::from_str::<Money>("1e300").is_err());
        assert!(serde_json::from_str::<Money>("9223372036854775807").is_err());
        assert!(serde_json::from_str::<Money>("100000000001").is_err());
        assert!(serde_json::from_str::<Money>("\"1e20\"").is_err());
    }

    #[test]
    fn test_wire_round_trip_is_lossless() {
        for cents in [0, 1, 7, 99, 1099, 123_456_789, -42, -100_001] {
            let money = Money::from_cents(cents);
            let json = serde_json::to_string(&money).unwrap();
            let back: Money = serde_json::from_str(&json).unwrap();
            assert_eq!(back, money, "round trip of {}", json);
        }
    }

    #[test]
    fn test_sum_and_neg() {
        let total: Money = [100, 250, -50].into_iter().map(Money::from_cents).sum();
        assert_eq!(total.cents(), 300);
        assert_eq!((-total).cents(), -300);
        assert!((-total).is_negative());
    }
}
