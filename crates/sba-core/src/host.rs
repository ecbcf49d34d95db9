//! # Host Interface
//!
//! The narrow seam between the solver and whatever order-line editor hosts
//! it. The solver never sees orders, dialogs or product records; it only
//! reads three numbers and writes two back.
//!
//! ```text
//! ┌──────────────────────────┐            ┌──────────────────────────┐
//! │  Host (order-line editor)│            │  sba-core                │
//! │                          │  base_price│                          │
//! │  selected line ──────────┼───────────►│                          │
//! │  tax engine ─────────────┼─tax_factor►│  solve()                 │
//! │  currency ───────────────┼──rounding─►│                          │
//! │                          │            │                          │
//! │  line.qty / line.price ◄─┼apply_result┤                          │
//! └──────────────────────────┘            └──────────────────────────┘
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CoreResult, SolverError};
use crate::solver::solve;
use crate::types::{SolverRequest, SolverResult};

/// What the solver needs from an order-line editor.
///
/// Getters return `None` when the host cannot supply a value. A missing tax
/// factor or rounding falls back to a default; a missing base price is an
/// error.
pub trait OrderLineHost {
    /// Unit price of the selected line before tax.
    fn base_price(&self) -> Option<f64>;

    /// `price_with_tax / price_without_tax` for the selected line.
    fn tax_factor(&self) -> Option<f64>;

    /// Smallest currency amount, e.g. 0.01.
    fn currency_rounding(&self) -> Option<f64>;

    /// Writes the solved quantity and full-precision unit price to the line.
    fn apply_result(&mut self, quantity: Decimal, unit_price: Decimal);
}

/// Settings owned by the caller rather than the order line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveOptions {
    /// Scale increment; `None` uses the default of 5.
    pub weight_step: Option<f64>,

    /// Unit price precision of the host; `None` keeps full precision.
    pub price_decimals: Option<u32>,
}

/// Reads the host, solves for `target_total`, and writes the result back.
///
/// The host is only modified when the solve succeeds. A result carrying a
/// [`ConvergenceWarning`](crate::ConvergenceWarning) still counts as success.
pub fn solve_for_line<H>(
    host: &mut H,
    target_total: f64,
    options: SolveOptions,
) -> CoreResult<SolverResult>
where
    H: OrderLineHost + ?Sized,
{
    let base_price = host
        .base_price()
        .ok_or(SolverError::InvalidBasePrice(f64::NAN))?;

    let request = SolverRequest {
        target_total,
        base_unit_price: base_price,
        tax_factor: host.tax_factor(),
        currency_rounding: host.currency_rounding(),
        weight_step: options.weight_step,
        price_decimals: options.price_decimals,
    };

    let result = solve(&request)?;
    host.apply_result(result.quantity, result.unit_price);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[derive(Default)]
    struct FakeLine {
        price: Option<f64>,
        tax_factor: Option<f64>,
        rounding: Option<f64>,
        applied: Option<(Decimal, Decimal)>,
    }

    impl OrderLineHost for FakeLine {
        fn base_price(&self) -> Option<f64> {
            self.price
        }

        fn tax_factor(&self) -> Option<f64> {
            self.tax_factor
        }

        fn currency_rounding(&self) -> Option<f64> {
            self.rounding
        }

        fn apply_result(&mut self, quantity: Decimal, unit_price: Decimal) {
            self.applied = Some((quantity, unit_price));
        }
    }

    #[test]
    fn test_applies_result_to_host() {
        let mut line = FakeLine {
            price: Some(500.0),
            tax_factor: Some(1.13),
            rounding: Some(0.01),
            ..Default::default()
        };

        let result = solve_for_line(&mut line, 1000.0, SolveOptions::default()).unwrap();

        assert_eq!(line.applied, Some((dec!(5), result.unit_price)));
        assert_eq!(result.final_total.amount(), dec!(1000));
    }

    #[test]
    fn test_missing_price_leaves_host_untouched() {
        let mut line = FakeLine::default();

        let err = solve_for_line(&mut line, 1000.0, SolveOptions::default()).unwrap_err();

        assert!(matches!(err, SolverError::InvalidBasePrice(p) if p.is_nan()));
        assert!(line.applied.is_none());
    }

    #[test]
    fn test_invalid_target_leaves_host_untouched() {
        let mut line = FakeLine {
            price: Some(500.0),
            ..Default::default()
        };

        let err = solve_for_line(&mut line, -5.0, SolveOptions::default()).unwrap_err();

        assert_eq!(err, SolverError::InvalidTarget(-5.0));
        assert!(line.applied.is_none());
    }

    #[test]
    fn test_missing_tax_factor_is_not_fatal() {
        let mut line = FakeLine {
            price: Some(100.0),
            ..Default::default()
        };
        let options = SolveOptions {
            weight_step: Some(10.0),
            price_decimals: None,
        };

        let result = solve_for_line(&mut line, 1000.0, options).unwrap();

        assert_eq!(result.tax_factor, Decimal::ONE);
        assert_eq!(line.applied, Some((dec!(10), dec!(100))));
    }

    #[test]
    fn test_works_through_trait_object() {
        let mut line = FakeLine {
            price: Some(500.0),
            tax_factor: Some(1.13),
            ..Default::default()
        };
        let host: &mut dyn OrderLineHost = &mut line;

        assert!(solve_for_line(host, 1000.0, SolveOptions::default()).is_ok());
    }
}
