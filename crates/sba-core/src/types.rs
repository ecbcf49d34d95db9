//! # Domain Types
//!
//! Types exchanged between a POS host and the target-total solver.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │ SolverRequest   │   │  SolverResult   │   │ ConvergenceWarning  │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────────  │   │
//! │  │  target_total   │──►│  quantity       │   │  iterations         │   │
//! │  │  base_unit_price│   │  unit_price     │   │  residual           │   │
//! │  │  tax_factor     │   │  final_total    │   └─────────────────────┘   │
//! │  │  rounding, step │   │  warning? ──────┼──►                          │
//! │  └─────────────────┘   └─────────────────┘                              │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                              │
//! │  │    TaxRate      │──►│   TaxFactor     │                              │
//! │  │  bps (u32)      │   │  with / without │                              │
//! │  │  1300 = 13%     │   │  1.13           │                              │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Requests carry raw `f64` values exactly as the host hands them over.
//! Results are exact decimals.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Percentage tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 1300 bps = 13% (Costa Rica IVA).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
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

    /// Returns the rate as a fraction (1300 bps → 0.13).
    pub fn fraction(&self) -> Decimal {
        Decimal::new(i64::from(self.0), 4)
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
// Tax Factor
// =============================================================================

/// Ratio `price_with_tax / price_without_tax` for one order line.
///
/// Always strictly positive. Construction helpers return `None` (or the
/// neutral factor) instead of ever producing zero or a negative factor.
/// Not serializable; [`SolverResult`] carries the factor as a plain decimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxFactor(Decimal);

impl TaxFactor {
    /// No tax: totals with and without tax are equal.
    pub const NONE: TaxFactor = TaxFactor(Decimal::ONE);

    /// Wraps a decimal factor, rejecting zero and negatives.
    pub fn new(factor: Decimal) -> Option<Self> {
        (factor > Decimal::ZERO).then_some(TaxFactor(factor))
    }

    /// Converts a host-supplied float, rejecting NaN, infinities, zero and
    /// negatives.
    pub fn from_f64(factor: f64) -> Option<Self> {
        if !factor.is_finite() || factor <= 0.0 {
            return None;
        }
        Decimal::from_f64(factor).and_then(TaxFactor::new)
    }

    /// Derives the factor from a line's price with and without tax.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal_macros::dec;
    /// use sba_core::TaxFactor;
    ///
    /// let factor = TaxFactor::from_prices(dec!(565), dec!(500)).unwrap();
    /// assert_eq!(factor.value(), dec!(1.13));
    ///
    /// // A free line has no meaningful ratio
    /// assert!(TaxFactor::from_prices(dec!(0), dec!(0)).is_none());
    /// ```
    pub fn from_prices(with_tax: Decimal, without_tax: Decimal) -> Option<Self> {
        if without_tax <= Decimal::ZERO {
            return None;
        }
        with_tax.checked_div(without_tax).and_then(TaxFactor::new)
    }

    /// Derives the factor from additive percentage taxes: `1 + Σ rate`.
    pub fn from_rates(rates: &[TaxRate]) -> Self {
        let sum: Decimal = rates.iter().map(TaxRate::fraction).sum();
        TaxFactor(Decimal::ONE + sum)
    }

    /// Returns the factor as a decimal.
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Returns the factor as a float for hosts that work in `f64`.
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(1.0)
    }
}

impl Default for TaxFactor {
    fn default() -> Self {
        TaxFactor::NONE
    }
}

// =============================================================================
// Solver Request
// =============================================================================

/// Inputs for one sell-by-amount calculation.
///
/// `None` in an optional field means "the host did not supply it"; the solver
/// substitutes its default (see [`crate::validation`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SolverRequest {
    /// Amount the customer wants to pay, tax included.
    pub target_total: f64,

    /// Price of one weight unit before tax.
    pub base_unit_price: f64,

    /// `price_with_tax / price_without_tax`; falls back to 1.0.
    pub tax_factor: Option<f64>,

    /// Smallest currency amount, e.g. 0.01; falls back to 0.01.
    pub currency_rounding: Option<f64>,

    /// Scale increment, e.g. 5 grams; falls back to 5.
    pub weight_step: Option<f64>,

    /// Decimal places the host stores unit prices with. `None` keeps full
    /// precision.
    pub price_decimals: Option<u32>,
}

impl SolverRequest {
    /// Creates a request with every optional input left to its default.
    pub fn new(target_total: f64, base_unit_price: f64) -> Self {
        SolverRequest {
            target_total,
            base_unit_price,
            tax_factor: None,
            currency_rounding: None,
            weight_step: None,
            price_decimals: None,
        }
    }

    pub fn with_tax_factor(mut self, tax_factor: f64) -> Self {
        self.tax_factor = Some(tax_factor);
        self
    }

    pub fn with_currency_rounding(mut self, rounding: f64) -> Self {
        self.currency_rounding = Some(rounding);
        self
    }

    pub fn with_weight_step(mut self, step: f64) -> Self {
        self.weight_step = Some(step);
        self
    }

    pub fn with_price_decimals(mut self, decimals: u32) -> Self {
        self.price_decimals = Some(decimals);
        self
    }
}

// =============================================================================
// Solver Result
// =============================================================================

/// Outcome of a successful solve.
///
/// ## Invariants
/// - `quantity` is a positive multiple of the weight step
/// - `final_total` is `round(quantity × unit_price × tax_factor)`
/// - `warning` is `None` exactly when `final_total == target_total`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SolverResult {
    /// Target after currency rounding.
    #[ts(as = "String")]
    pub target_total: Money,

    /// Weight quantity, rounded up to the step.
    #[ts(as = "String")]
    pub quantity: Decimal,

    /// Unit price before tax. Not rounded to currency so repeated rounding
    /// downstream cannot drift.
    #[ts(as = "String")]
    pub unit_price: Decimal,

    /// Rounded total with tax that the line will charge.
    #[ts(as = "String")]
    pub final_total: Money,

    /// Tax factor actually used (after fallback).
    #[ts(as = "String")]
    pub tax_factor: Decimal,

    /// Refinement passes performed.
    pub iterations: u32,

    /// Set when the target could not be matched exactly.
    pub warning: Option<ConvergenceWarning>,
}

impl SolverResult {
    /// True when the final total equals the target.
    pub fn converged(&self) -> bool {
        self.warning.is_none()
    }

    /// `target_total - final_total`; zero when converged.
    pub fn residual(&self) -> Decimal {
        self.target_total.amount() - self.final_total.amount()
    }
}

/// The refinement bound was hit before the rounded total matched the target.
///
/// The accompanying result holds the closest candidate seen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ConvergenceWarning {
    pub iterations: u32,

    /// `target_total - final_total` of the returned candidate.
    #[ts(as = "String")]
    pub residual: Decimal,
}

// =============================================================================
// Unit Tests
// =============================================================================
