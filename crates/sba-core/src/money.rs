//! # Money Module
//!
//! Provides the `Money` type and the single rounding rule used for every
//! amount the solver reports.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    0.01 is stored as 0.01000000000000000020816681711721685...  ❌       │
//! │    "round to a multiple of 0.01" drifts after a few operations          │
//! │                                                                         │
//! │  OUR SOLUTION: base-10 decimals                                         │
//! │    rust_decimal stores 0.01 exactly, so a rounded total is always an    │
//! │    integer multiple of the rounding unit                                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rounding Rule
//! Money is rounded half AWAY from zero to the nearest multiple of the
//! currency rounding unit. The same function validates solver convergence and
//! produces the value shown to the cashier, so the two can never disagree.
//!
//! ## Usage
//! ```rust
//! use rust_decimal_macros::dec;
//! use sba_core::money::Money;
//!
//! let total = Money::round(dec!(999.995), dec!(0.01)).unwrap();
//! assert_eq!(total.amount(), dec!(1000.00));
//!
//! // Cash-only currencies round to coarser units
//! let cash = Money::round(dec!(1002.5), dec!(5)).unwrap();
//! assert_eq!(cash.amount(), dec!(1005));
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

use crate::error::{CoreResult, SolverError};

// =============================================================================
// Rounding
// =============================================================================

/// Rounds `value` to the nearest multiple of `unit`, halves away from zero.
///
/// Returns `None` if `unit` is zero or the quotient leaves the decimal range.
pub fn round_to_unit(value: Decimal, unit: Decimal) -> Option<Decimal> {
    let steps = value
        .checked_div(unit)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    steps.checked_mul(unit)
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount that has been quantized to a currency rounding unit.
///
/// Outside of deserialization the only constructors are [`Money::round`] and
/// [`Money::zero`], so every `Money` is a multiple of the unit it was rounded
/// with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Rounds a raw amount to the currency rounding unit.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal_macros::dec;
    /// use sba_core::money::Money;
    ///
    /// let m = Money::round(dec!(10.025), dec!(0.01)).unwrap();
    /// assert_eq!(m.amount(), dec!(10.03)); // half away from zero, not to even
    /// ```
    pub fn round(value: Decimal, unit: Decimal) -> CoreResult<Self> {
        round_to_unit(value, unit)
            .map(Money)
            .ok_or(SolverError::Overflow("money rounding"))
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

}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal rendering. Currency symbols and grouping belong to the host.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Sum of two amounts rounded with the same unit stays on that grid.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
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
