//! # Target-Total Solver
//!
//! Finds a weight quantity and a unit price whose taxed, rounded total equals
//! the amount the customer wants to pay.
//!
//! ## Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Customer: "give me 1000 worth of peanuts"   (500/g, 13% tax, 5 g)     │
//! │                                                                         │
//! │  1. target     = round(1000, 0.01)                 = 1000.00           │
//! │  2. theoretical= 1000 / (500 × 1.13)               ≈ 1.77 g            │
//! │  3. quantity   = ceil(1.77 / 5) × 5                = 5 g               │
//! │  4. unit_price = 1000 / (5 × 1.13)                 ≈ 176.99115...      │
//! │  5. refine     : round(5 × unit_price × 1.13) == 1000.00 ?             │
//! │                  no → unit_price += diff / (5 × 1.13), repeat (≤ 25)   │
//! │  6. return 5 g, 176.99115..., 1000.00                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The quantity is never rounded down: a scale that only reports in fixed
//! increments must not under-deliver against the amount already charged.

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{debug, warn};

use crate::error::{CoreResult, SolverError};
use crate::money::Money;
use crate::types::{ConvergenceWarning, SolverRequest, SolverResult};
use crate::validation::{
    effective_tax_factor, positive_or_default, validate_base_price, validate_target_total,
};
use crate::{DEFAULT_CURRENCY_ROUNDING, DEFAULT_WEIGHT_STEP, MAX_REFINEMENT_ITERATIONS};

// =============================================================================
// Quantity Quantization
// =============================================================================

/// Rounds `quantity` UP to the next multiple of `step`.
///
/// Exact multiples pass through unchanged.
///
/// ## Example
/// ```rust
/// use rust_decimal_macros::dec;
/// use sba_core::round_up_to_step;
///
/// assert_eq!(round_up_to_step(dec!(1.77), dec!(5)).unwrap(), dec!(5));
/// assert_eq!(round_up_to_step(dec!(10), dec!(5)).unwrap(), dec!(10));
/// assert_eq!(round_up_to_step(dec!(10.001), dec!(5)).unwrap(), dec!(15));
/// ```
pub fn round_up_to_step(quantity: Decimal, step: Decimal) -> CoreResult<Decimal> {
    quantity
        .checked_div(step)
        .and_then(|steps| steps.ceil().checked_mul(step))
        .ok_or(SolverError::Overflow("quantity rounding"))
}

// =============================================================================
// Solve
// =============================================================================

/// Solves one sell-by-amount request.
///
/// ## Errors
/// - [`SolverError::InvalidTarget`] / [`SolverError::InvalidBasePrice`] for
///   rejected inputs
/// - [`SolverError::UnreachableTarget`] when the rounded target needs a zero
///   quantity
/// - [`SolverError::Overflow`] for inputs outside the decimal range
///
/// Failing to hit the target exactly is reported through
/// [`SolverResult::warning`], not as an error.
pub fn solve(request: &SolverRequest) -> CoreResult<SolverResult> {
    let raw_target = validate_target_total(request.target_total)?;
    let base_price = validate_base_price(request.base_unit_price)?;
    let tax_factor = effective_tax_factor(request.tax_factor).value();
    let rounding = positive_or_default(
        "currency_rounding",
        request.currency_rounding,
        DEFAULT_CURRENCY_ROUNDING,
    );
    let step = positive_or_default("weight_step", request.weight_step, DEFAULT_WEIGHT_STEP);

    let target = Money::round(raw_target, rounding)?;
    if target.is_zero() {
        return Err(SolverError::UnreachableTarget {
            target: target.amount(),
        });
    }

    let taxed_base = base_price
        .checked_mul(tax_factor)
        .ok_or(SolverError::Overflow("taxed base price"))?;
    let theoretical = target
        .amount()
        .checked_div(taxed_base)
        .ok_or(SolverError::Overflow("theoretical quantity"))?;
    let quantity = round_up_to_step(theoretical, step)?.normalize();

    let refinement = refine_unit_price(
        target,
        quantity,
        tax_factor,
        rounding,
        request.price_decimals,
        MAX_REFINEMENT_ITERATIONS,
    )?;

    let warning = (!refinement.converged).then_some(ConvergenceWarning {
        iterations: refinement.iterations,
        residual: refinement.residual,
    });

    match &warning {
        None => debug!(
            %target,
            %quantity,
            unit_price = %refinement.unit_price,
            iterations = refinement.iterations,
            "Solved target total"
        ),
        Some(w) => warn!(
            %target,
            %quantity,
            final_total = %refinement.total,
            residual = %w.residual,
            iterations = w.iterations,
            "Target total not reachable exactly, returning closest total"
        ),
    }

    Ok(SolverResult {
        target_total: target,
        quantity,
        unit_price: refinement.unit_price,
        final_total: refinement.total,
        tax_factor,
        iterations: refinement.iterations,
        warning,
    })
}

// =============================================================================
// Unit Price Refinement
// =============================================================================

/// Best unit price found by [`refine_unit_price`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Refinement {
    pub unit_price: Decimal,
    pub total: Money,
    /// `target - total`.
    pub residual: Decimal,
    pub iterations: u32,
    pub converged: bool,
}

/// Adjusts the unit price until `round(quantity × price × tax_factor)` equals
/// `target`.
///
/// Each pass moves the price by `diff / (quantity × tax_factor)`, the exact
/// correction if rounding did not exist. When `price_decimals` is set every
/// candidate is rounded to that precision first, which can make the target
/// unreachable; after `max_iterations` passes the candidate with the smallest
/// residual is returned with `converged == false`.
pub fn refine_unit_price(
    target: Money,
    quantity: Decimal,
    tax_factor: Decimal,
    rounding: Decimal,
    price_decimals: Option<u32>,
    max_iterations: u32,
) -> CoreResult<Refinement> {
    let per_price_unit = quantity
        .checked_mul(tax_factor)
        .ok_or(SolverError::Overflow("quantity times tax factor"))?;
    let tolerance = rounding / Decimal::TWO;

    let mut unit_price = target
        .amount()
        .checked_div(per_price_unit)
        .map(|p| quantize_price(p, price_decimals))
        .ok_or(SolverError::Overflow("initial unit price"))?;

    let mut best: Option<Refinement> = None;

    for iteration in 1..=max_iterations.max(1) {
        let raw_total = per_price_unit
            .checked_mul(unit_price)
            .ok_or(SolverError::Overflow("line total"))?;
        let total = Money::round(raw_total, rounding)?;
        let diff = target.amount() - total.amount();

        let candidate = Refinement {
            unit_price,
            total,
            residual: diff,
            iterations: iteration,
            converged: diff.abs() < tolerance,
        };
        if candidate.converged {
            return Ok(candidate);
        }
        if best.map_or(true, |b| diff.abs() < b.residual.abs()) {
            best = Some(candidate);
        }

        let correction = diff
            .checked_div(per_price_unit)
            .ok_or(SolverError::Overflow("price correction"))?;
        unit_price = unit_price
            .checked_add(correction)
            .map(|p| quantize_price(p, price_decimals))
            .ok_or(SolverError::Overflow("unit price"))?;
    }

    let mut best = best.ok_or(SolverError::Overflow("unit price"))?;
    best.iterations = max_iterations.max(1);
    Ok(best)
}

fn quantize_price(price: Decimal, decimals: Option<u32>) -> Decimal {
    match decimals {
        Some(dp) => price.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero),
        None => price,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
