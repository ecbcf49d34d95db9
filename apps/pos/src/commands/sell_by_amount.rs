//! # Sell-by-Amount Command
//!
//! "Charge exactly this much" for a product sold by weight.
//!
//! ## User Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Cashier selects the "Peanuts" line                                 │
//! │  2. Presses "Sell by amount", types 1000 (tax included)                │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │  sell_by_amount(order, config, "1000")                                 │
//! │                    │                                                    │
//! │     ├── no line selected ──► NO_LINE_SELECTED                          │
//! │     ├── empty input ───────► Ok(None)  (prompt dismissed)              │
//! │     ├── "abc" ─────────────► VALIDATION_ERROR                          │
//! │     └── solve_for_line ────► line: 5 g @ 176.991150 = 1000.00          │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │  SaleSummary shown in a confirmation dialog                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use sba_core::{solve_for_line, Money};
use serde::Serialize;
use tracing::{debug, info, warn};
use ts_rs::TS;

use crate::error::ApiError;
use crate::state::{LineEditor, OrderState, PosConfig};

/// Unit price digits shown to the cashier.
pub const DISPLAY_PRICE_DECIMALS: u32 = 6;

/// What the confirmation dialog shows after a successful sale.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleSummary {
    pub line_id: String,
    pub product_name: String,
    pub currency_code: String,

    /// Amount charged, after currency rounding
    #[ts(as = "String")]
    pub target_total: Money,

    /// Weight sold, rounded up to the scale step
    #[ts(as = "String")]
    pub quantity: Decimal,

    /// Full-precision unit price written to the line
    #[ts(as = "String")]
    pub unit_price: Decimal,

    /// Unit price rounded for display
    #[ts(as = "String")]
    pub unit_price_display: Decimal,

    /// Line total with tax as the order now computes it
    #[ts(as = "String")]
    pub final_total: Money,

    /// False when the target could only be approximated
    pub converged: bool,

    /// `target_total - final_total`
    #[ts(as = "String")]
    pub residual: Decimal,
}

/// Parses the amount typed by the cashier.
///
/// ## Returns
/// - `Ok(None)` for empty input (prompt dismissed)
/// - `Ok(Some(amount))` for anything that parses as a number
/// - `Err` otherwise
///
/// Range checks are left to the solver.
pub fn parse_amount(input: &str) -> Result<Option<f64>, ApiError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    input
        .parse::<f64>()
        .map(Some)
        .map_err(|_| ApiError::validation(format!("Amount '{}' is not a number", input)))
}

/// Sets the selected line's quantity and unit price so its total equals the
/// typed amount.
///
/// ## Arguments
/// * `amount` - Raw text from the amount prompt, tax included
///
/// ## Returns
/// `None` when the cashier dismissed the prompt, otherwise the summary.
pub fn sell_by_amount(
    order: &OrderState,
    config: &PosConfig,
    amount: &str,
) -> Result<Option<SaleSummary>, ApiError> {
    debug!(amount = %amount, "sell_by_amount command");

    order.with_order_mut(|o| -> Result<Option<SaleSummary>, ApiError> {
        let line = o.selected_line_mut().ok_or_else(ApiError::no_line_selected)?;

        let Some(target) = parse_amount(amount)? else {
            debug!("sell_by_amount cancelled");
            return Ok(None);
        };

        let mut editor = LineEditor::new(line, config.currency_rounding);
        let result = solve_for_line(&mut editor, target, config.solve_options())?;

        let final_total = line.price_with_tax(config.currency_rounding)?;
        if final_total != result.final_total {
            warn!(
                line_total = %final_total,
                solver_total = %result.final_total,
                "Line total differs from solver total"
            );
        }

        let summary = SaleSummary {
            line_id: line.id.clone(),
            product_name: line.product_name.clone(),
            currency_code: config.currency_code.clone(),
            target_total: result.target_total,
            quantity: result.quantity,
            unit_price: result.unit_price,
            unit_price_display: result
                .unit_price
                .round_dp_with_strategy(DISPLAY_PRICE_DECIMALS, RoundingStrategy::MidpointAwayFromZero),
            final_total,
            converged: result.converged(),
            residual: result.target_total.amount() - final_total.amount(),
        };

        info!(
            product = %summary.product_name,
            target = %summary.target_total,
            quantity = %summary.quantity,
            unit_price = %summary.unit_price_display,
            final_total = %summary.final_total,
            "Sold by amount"
        );

        Ok(Some(summary))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::OrderLine;
    use rust_decimal_macros::dec;
    use sba_core::TaxRate;

    fn order_with_peanuts() -> OrderState {
        let state = OrderState::new();
        state.with_order_mut(|o| {
            o.add_line(OrderLine::new(
                "Peanuts",
                dec!(500),
                vec![TaxRate::from_bps(1300)],
            ))
        });
        state
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("").unwrap(), None);
        assert_eq!(parse_amount("   ").unwrap(), None);
        assert_eq!(parse_amount("1000").unwrap(), Some(1000.0));
        assert_eq!(parse_amount(" 12.5 ").unwrap(), Some(12.5));
        assert_eq!(
            parse_amount("mil").unwrap_err().code,
            ErrorCode::ValidationError
        );
    }

    #[test]
    fn test_sells_exact_amount() {
        let order = order_with_peanuts();
        let config = PosConfig::default();

        let summary = sell_by_amount(&order, &config, "1000").unwrap().unwrap();

        assert_eq!(summary.product_name, "Peanuts");
        assert_eq!(summary.quantity, dec!(5));
        assert_eq!(summary.final_total.amount(), dec!(1000));
        assert_eq!(summary.unit_price_display, dec!(176.991150));
        assert!(summary.converged);
        assert_eq!(summary.residual, Decimal::ZERO);

        order.with_order(|o| {
            let line = o.selected_line().unwrap();
            assert_eq!(line.quantity, dec!(5));
            assert_eq!(line.unit_price, summary.unit_price);
            assert!(line.price_manually_set);
        });
    }

    #[test]
    fn test_requires_selected_line() {
        let order = OrderState::new();
        let err = sell_by_amount(&order, &PosConfig::default(), "1000").unwrap_err();
        assert_eq!(err.code, ErrorCode::NoLineSelected);
    }

    #[test]
    fn test_empty_amount_cancels_without_changes() {
        let order = order_with_peanuts();
        let before = order.with_order(|o| o.selected_line().cloned());

        let outcome = sell_by_amount(&order, &PosConfig::default(), "").unwrap();

        assert!(outcome.is_none());
        assert_eq!(order.with_order(|o| o.selected_line().cloned()), before);
    }

    #[test]
    fn test_rejected_amounts_map_to_error_codes() {
        let order = order_with_peanuts();
        let config = PosConfig::default();

        let zero = sell_by_amount(&order, &config, "0").unwrap_err();
        assert_eq!(zero.code, ErrorCode::InvalidTarget);

        let tiny = sell_by_amount(&order, &config, "0.004").unwrap_err();
        assert_eq!(tiny.code, ErrorCode::UnreachableTarget);

        let garbage = sell_by_amount(&order, &config, "1,000").unwrap_err();
        assert_eq!(garbage.code, ErrorCode::ValidationError);

        order.with_order(|o| assert!(!o.selected_line().unwrap().price_manually_set));
    }

    #[test]
    fn test_coarse_price_precision_is_reported() {
        let order = order_with_peanuts();
        let config = PosConfig {
            price_decimals: Some(0),
            ..PosConfig::default()
        };

        let summary = sell_by_amount(&order, &config, "1000").unwrap().unwrap();

        assert!(!summary.converged);
        assert_eq!(summary.final_total.amount(), dec!(1000.05));
        assert_eq!(summary.residual, dec!(-0.05));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_commands_serialize_on_the_order() {
        let order = order_with_peanuts();
        let config = PosConfig::default();

        let handles: Vec<_> = ["1000", "2000", "1500", "1000"]
            .into_iter()
            .map(|amount| {
                let order = order.clone();
                let config = config.clone();
                tokio::task::spawn_blocking(move || sell_by_amount(&order, &config, amount))
            })
            .collect();

        for handle in handles {
            let summary = handle.await.unwrap().unwrap().unwrap();
            assert_eq!(summary.residual, Decimal::ZERO);
        }

        order.with_order(|o| assert!(o.selected_line().unwrap().price_manually_set));
    }
}
