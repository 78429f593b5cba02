//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Rupiah has no minor unit in day-to-day retail:                         │
//! │    Indomie Godog = Rp 3.500, never Rp 3.499,99                          │
//! │                                                                         │
//! │  OUR SOLUTION: Whole rupiah in an i64                                   │
//! │    subtotal = harga × qty, computed with checked arithmetic             │
//! │    An overflow is reported, never wrapped                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kasir_core::money::Money;
//!
//! let price = Money::from_rupiah(12000);
//! let line = price.checked_mul_quantity(2).unwrap();
//! let total = line.checked_add(Money::from_rupiah(3500)).unwrap();
//! assert_eq!(total.rupiah(), 27500);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in whole rupiah.
///
/// ## Where Money is Used
/// ```text
/// Product.unit_price ──► TransactionDetail.subtotal ──► Transaction.total_amount
///                                                            │
///                                                            ▼
///                                                  Report.total_revenue
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole rupiah.
    #[inline]
    pub const fn from_rupiah(rupiah: i64) -> Self {
        Money(rupiah)
    }

    /// Returns the value in whole rupiah.
    #[inline]
    pub const fn rupiah(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Multiplies a unit price by a quantity, returning `None` on overflow.
    ///
    /// ## User Workflow
    /// ```text
    /// Product: Kecap Rp 12.000
    /// Quantity: 3
    ///      │
    ///      ▼
    /// checked_mul_quantity(3) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Subtotal: Rp 36.000
    /// ```
    #[inline]
    pub const fn checked_mul_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(value) => Some(Money(value)),
            None => None,
        }
    }

    /// Adds two amounts, returning `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(value) => Some(Money(value)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display uses Indonesian grouping: `Rp 12.000`.
///
/// ## Note
/// This is for logs and the CLI. API consumers receive the raw integer.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}Rp {}", sign, grouped)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Unchecked addition, for amounts already known to fit (report totals).
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
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
    fn test_from_rupiah() {
        let money = Money::from_rupiah(3500);
        assert_eq!(money.rupiah(), 3500);
        assert_eq!(Money::default(), Money::zero());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_rupiah(0)), "Rp 0");
        assert_eq!(format!("{}", Money::from_rupiah(500)), "Rp 500");
        assert_eq!(format!("{}", Money::from_rupiah(3500)), "Rp 3.500");
        assert_eq!(format!("{}", Money::from_rupiah(1250000)), "Rp 1.250.000");
        assert_eq!(format!("{}", Money::from_rupiah(-12000)), "-Rp 12.000");
    }

    #[test]
    fn test_checked_mul_quantity() {
        let unit_price = Money::from_rupiah(12000);
        assert_eq!(unit_price.checked_mul_quantity(3), Some(Money::from_rupiah(36000)));
        assert_eq!(Money::from_rupiah(i64::MAX).checked_mul_quantity(2), None);
    }

    #[test]
    fn test_checked_add() {
        let a = Money::from_rupiah(100);
        assert_eq!(a.checked_add(Money::from_rupiah(50)), Some(Money::from_rupiah(150)));
        assert_eq!(Money::from_rupiah(i64::MAX).checked_add(a), None);
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 200, 50].into_iter().map(Money::from_rupiah).sum();
        assert_eq!(total.rupiah(), 350);
    }

    #[test]
    fn test_serializes_as_plain_number() {
        let json = serde_json::to_string(&Money::from_rupiah(3500)).unwrap();
        assert_eq!(json, "3500");
    }
}
