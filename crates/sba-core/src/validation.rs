//! # Validation Module
//!
//! Turns raw host values into the decimals the solver works with.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Input Handling                                     │
//! │                                                                         │
//! │  HARD FAILURES (returned as SolverError)                               │
//! │  ├── target_total     ≤ 0, NaN, ±∞  → InvalidTarget                    │
//! │  └── base_unit_price  ≤ 0, NaN, ±∞  → InvalidBasePrice                 │
//! │                                                                         │
//! │  SOFT FALLBACKS (logged, never fatal)                                  │
//! │  ├── tax_factor        unset / ≤ 0 → 1.0                               │
//! │  ├── currency_rounding unset / ≤ 0 → 0.01                              │
//! │  └── weight_step       unset / ≤ 0 → 5                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use sba_core::validation::{validate_base_price, validate_target_total};
//!
//! assert!(validate_target_total(1000.0).is_ok());
//! assert!(validate_target_total(0.0).is_err());
//! assert!(validate_base_price(-1.0).is_err());
//! ```

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use tracing::warn;

use crate::error::{CoreResult, SolverError};
use crate::types::TaxFactor;

/// Converts a finite, strictly positive float to a decimal.
fn positive_decimal(value: f64) -> Option<Decimal> {
    if !value.is_finite() || value <= 0.0 {
        return None;
    }
    Decimal::from_f64(value)
}

// =============================================================================
// Hard Validators
// =============================================================================

/// Validates the amount the customer wants to pay.
///
/// ## Rules
/// - Must be finite and greater than zero
/// - Must fit in a decimal (|x| < 7.9e28)
///
/// Tiny positive values are accepted here; they surface later as
/// `UnreachableTarget` once rounded to the currency unit.
pub fn validate_target_total(value: f64) -> CoreResult<Decimal> {
    positive_decimal(value).ok_or(SolverError::InvalidTarget(value))
}

/// Validates the line's base unit price (before tax).
///
/// ## Rules
/// - Must be finite and greater than zero
/// - Must not vanish when converted to a decimal
pub fn validate_base_price(value: f64) -> CoreResult<Decimal> {
    positive_decimal(value)
        .filter(|price| !price.is_zero())
        .ok_or(SolverError::InvalidBasePrice(value))
}

// =============================================================================
// Soft Fallbacks
// =============================================================================

/// Resolves the host tax factor, falling back to [`TaxFactor::NONE`].
///
/// A missing or broken tax lookup must not block the sale, so this never
/// fails.
pub fn effective_tax_factor(value: Option<f64>) -> TaxFactor {
    match value {
        Some(raw) => TaxFactor::from_f64(raw).unwrap_or_else(|| {
            warn!(tax_factor = raw, "Invalid tax factor from host, assuming no tax");
            TaxFactor::NONE
        }),
        None => TaxFactor::NONE,
    }
}

/// Resolves an optional positive setting, substituting `default` when it is
/// unset, non-positive or not representable.
pub fn positive_or_default(field: &'static str, value: Option<f64>, default: Decimal) -> Decimal {
    match value {
        None => default,
        Some(raw) => positive_decimal(raw)
            .filter(|d| !d.is_zero())
            .unwrap_or_else(|| {
                warn!(field, value = raw, %default, "Ignoring non-positive setting");
                default
            }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_validate_target_total() {
        assert_eq!(validate_target_total(1000.0), Ok(dec!(1000)));
        assert_eq!(validate_target_total(0.5), Ok(dec!(0.5)));

        assert!(matches!(validate_target_total(0.0), Err(SolverError::InvalidTarget(_))));
        assert!(matches!(validate_target_total(-3.0), Err(SolverError::InvalidTarget(_))));
        assert!(matches!(validate_target_total(f64::NAN), Err(SolverError::InvalidTarget(_))));
        assert!(matches!(
            validate_target_total(f64::INFINITY),
            Err(SolverError::InvalidTarget(_))
        ));
        assert!(matches!(validate_target_total(1e300), Err(SolverError::InvalidTarget(_))));
    }

    #[test]
    fn test_validate_base_price() {
        assert_eq!(validate_base_price(500.0), Ok(dec!(500)));

        assert_eq!(validate_base_price(-1.0), Err(SolverError::InvalidBasePrice(-1.0)));
        assert_eq!(validate_base_price(0.0), Err(SolverError::InvalidBasePrice(0.0)));
        assert!(matches!(
            validate_base_price(f64::NAN),
            Err(SolverError::InvalidBasePrice(_))
        ));
    }

    #[test]
    fn test_effective_tax_factor() {
        assert_eq!(effective_tax_factor(None), TaxFactor::NONE);
        assert_eq!(effective_tax_factor(Some(0.0)), TaxFactor::NONE);
        assert_eq!(effective_tax_factor(Some(-1.13)), TaxFactor::NONE);
        assert_eq!(effective_tax_factor(Some(f64::NAN)), TaxFactor::NONE);
        assert_eq!(effective_tax_factor(Some(2.0)).value(), dec!(2));
    }

    #[test]
    fn test_positive_or_default() {
        assert_eq!(positive_or_default("weight_step", None, dec!(5)), dec!(5));
        assert_eq!(positive_or_default("weight_step", Some(0.0), dec!(5)), dec!(5));
        assert_eq!(positive_or_default("weight_step", Some(-10.0), dec!(5)), dec!(5));
        assert_eq!(positive_or_default("weight_step", Some(10.0), dec!(5)), dec!(10));
        assert_eq!(
            positive_or_default("currency_rounding", Some(0.05), dec!(0.01)),
            dec!(0.05)
        );
    }
}
