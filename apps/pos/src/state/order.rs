//! # Order State
//!
//! The order being rung up and its selected line.
//!
//! ## Thread Safety
//! The order is wrapped in `Arc<Mutex<T>>`: several commands may touch it,
//! and only one may modify it at a time.
//!
//! ## Sell-by-Amount Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cashier scans "Peanuts" ──► add_line() ──► line selected              │
//! │                                                                         │
//! │  Cashier presses "Sell by amount", types 1000                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  LineEditor (OrderLineHost) ──► sba_core::solve_for_line               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  line.quantity = 5, line.unit_price = 176.99115..., discount = 0,      │
//! │  price_manually_set = true                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sba_core::{CoreResult, Money, OrderLineHost, SolverError, TaxFactor, TaxRate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One product line on the order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    /// Line ID (UUID)
    pub id: String,

    /// Product name at time of adding
    pub product_name: String,

    /// List price per weight unit before tax (frozen when added)
    pub list_price: Decimal,

    /// Taxes applied to this line
    pub tax_rates: Vec<TaxRate>,

    /// Quantity in weight units
    pub quantity: Decimal,

    /// Price per weight unit before tax actually charged
    pub unit_price: Decimal,

    /// Discount in basis points (1000 = 10%)
    pub discount_bps: u32,

    /// True once the unit price no longer follows the list price
    pub price_manually_set: bool,

    /// When this line was added
    pub added_at: DateTime<Utc>,
}

impl OrderLine {
    /// Creates a line for one weight unit at list price.
    pub fn new(product_name: impl Into<String>, list_price: Decimal, tax_rates: Vec<TaxRate>) -> Self {
        OrderLine {
            id: Uuid::new_v4().to_string(),
            product_name: product_name.into(),
            list_price,
            tax_rates,
            quantity: Decimal::ONE,
            unit_price: list_price,
            discount_bps: 0,
            price_manually_set: false,
            added_at: Utc::now(),
        }
    }

    /// Tax factor from this line's tax rates.
    pub fn tax_factor(&self) -> TaxFactor {
        TaxFactor::from_rates(&self.tax_rates)
    }

    /// `quantity × unit_price × (1 - discount)`, unrounded.
    fn raw_subtotal(&self) -> CoreResult<Decimal> {
        let discount = Decimal::new(i64::from(self.discount_bps), 4);
        self.quantity
            .checked_mul(self.unit_price)
            .and_then(|gross| gross.checked_mul(Decimal::ONE - discount))
            .ok_or(SolverError::Overflow("line subtotal"))
    }

    /// Line total before tax, rounded to the currency.
    pub fn price_without_tax(&self, rounding: Decimal) -> CoreResult<Money> {
        Money::round(self.raw_subtotal()?, rounding)
    }

    /// Line total with tax, rounded to the currency.
    pub fn price_with_tax(&self, rounding: Decimal) -> CoreResult<Money> {
        let taxed = self
            .raw_subtotal()?
            .checked_mul(self.tax_factor().value())
            .ok_or(SolverError::Overflow("line total with tax"))?;
        Money::round(taxed, rounding)
    }
}

/// Exposes one order line to the solver.
///
/// The base price is the list price, so solving the same line twice does not
/// compound the previous adjustment.
pub struct LineEditor<'a> {
    line: &'a mut OrderLine,
    currency_rounding: Decimal,
}

impl<'a> LineEditor<'a> {
    pub fn new(line: &'a mut OrderLine, currency_rounding: Decimal) -> Self {
        LineEditor {
            line,
            currency_rounding,
        }
    }
}

impl OrderLineHost for LineEditor<'_> {
    fn base_price(&self) -> Option<f64> {
        self.line.list_price.to_f64()
    }

    fn tax_factor(&self) -> Option<f64> {
        Some(self.line.tax_factor().to_f64())
    }

    fn currency_rounding(&self) -> Option<f64> {
        self.currency_rounding.to_f64()
    }

    fn apply_result(&mut self, quantity: Decimal, unit_price: Decimal) {
        self.line.quantity = quantity;
        self.line.unit_price = unit_price;
        self.line.discount_bps = 0;
        self.line.price_manually_set = true;
    }
}

/// The order being rung up.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub lines: Vec<OrderLine>,

    /// ID of the line the cashier has selected
    pub selected_line_id: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Creates a new empty order.
    pub fn new() -> Self {
        Order {
            id: Uuid::new_v4().to_string(),
            lines: Vec::new(),
            selected_line_id: None,
            created_at: Utc::now(),
        }
    }

    /// Appends a line and selects it, like scanning a product.
    pub fn add_line(&mut self, line: OrderLine) -> String {
        let id = line.id.clone();
        self.lines.push(line);
        self.selected_line_id = Some(id.clone());
        id
    }

    /// Selects an existing line.
    pub fn select_line(&mut self, line_id: &str) -> Result<(), String> {
        if self.lines.iter().any(|l| l.id == line_id) {
            self.selected_line_id = Some(line_id.to_string());
            Ok(())
        } else {
            Err(format!("Line {} not in order", line_id))
        }
    }

    /// Returns the selected line, if any.
    pub fn selected_line(&self) -> Option<&OrderLine> {
        let id = self.selected_line_id.as_deref()?;
        self.lines.iter().find(|l| l.id == id)
    }

    /// Returns the selected line mutably, if any.
    pub fn selected_line_mut(&mut self) -> Option<&mut OrderLine> {
        let id = self.selected_line_id.as_deref()?;
        self.lines.iter_mut().find(|l| l.id == id)
    }

    /// Sum of the rounded line totals with tax.
    pub fn total_with_tax(&self, rounding: Decimal) -> CoreResult<Money> {
        self.lines
            .iter()
            .try_fold(Money::zero(), |acc, line| Ok(acc + line.price_with_tax(rounding)?))
    }

    /// Checks if the order has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl Default for Order {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handle to the current order.
#[derive(Debug, Clone)]
pub struct OrderState {
    order: Arc<Mutex<Order>>,
}

impl OrderState {
    /// Creates a state holding a new empty order.
    pub fn new() -> Self {
        OrderState {
            order: Arc::new(Mutex::new(Order::new())),
        }
    }

    /// Executes a function with read access to the order.
    pub fn with_order<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Order) -> R,
    {
        let order = self.order.lock().expect("Order mutex poisoned");
        f(&order)
    }

    /// Executes a function with write access to the order.
    pub fn with_order_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Order) -> R,
    {
        let mut order = self.order.lock().expect("Order mutex poisoned");
        f(&mut order)
    }
}

impl Default for OrderState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use sba_core::{solve_for_line, SolveOptions};

    fn peanuts() -> OrderLine {
        OrderLine::new("Peanuts", dec!(500), vec![TaxRate::from_bps(1300)])
    }

    #[test]
    fn test_line_totals() {
        let mut line = peanuts();
        line.quantity = dec!(2);

        assert_eq!(line.price_without_tax(dec!(0.01)).unwrap().amount(), dec!(1000));
        assert_eq!(line.price_with_tax(dec!(0.01)).unwrap().amount(), dec!(1130));

        line.discount_bps = 1000;
        assert_eq!(line.price_without_tax(dec!(0.01)).unwrap().amount(), dec!(900));
    }

    #[test]
    fn test_editor_applies_solver_result() {
        let mut line = peanuts();
        line.discount_bps = 500;

        let mut editor = LineEditor::new(&mut line, dec!(0.01));
        let result = solve_for_line(&mut editor, 1000.0, SolveOptions::default()).unwrap();

        assert_eq!(line.quantity, dec!(5));
        assert_eq!(line.unit_price, result.unit_price);
        assert_eq!(line.discount_bps, 0);
        assert!(line.price_manually_set);
        assert_eq!(line.price_with_tax(dec!(0.01)).unwrap(), result.final_total);
    }

    #[test]
    fn test_second_solve_uses_list_price() {
        let mut line = peanuts();

        let first = solve_for_line(
            &mut LineEditor::new(&mut line, dec!(0.01)),
            1000.0,
            SolveOptions::default(),
        )
        .unwrap();
        let second = solve_for_line(
            &mut LineEditor::new(&mut line, dec!(0.01)),
            1000.0,
            SolveOptions::default(),
        )
        .unwrap();

        assert_eq!(first, second);
        assert_eq!(line.list_price, dec!(500));
    }

    #[test]
    fn test_order_selection() {
        let mut order = Order::new();
        assert!(order.selected_line().is_none());

        let first = order.add_line(peanuts());
        let second = order.add_line(OrderLine::new("Cashews", dec!(900), vec![]));
        assert_eq!(order.selected_line().map(|l| l.id.as_str()), Some(second.as_str()));

        order.select_line(&first).unwrap();
        assert_eq!(order.selected_line().map(|l| l.product_name.as_str()), Some("Peanuts"));

        assert!(order.select_line("missing").is_err());
        assert_eq!(order.selected_line_id.as_deref(), Some(first.as_str()));
    }

    #[test]
    fn test_order_total() {
        let mut order = Order::new();
        assert_eq!(order.total_with_tax(dec!(0.01)).unwrap(), Money::zero());

        order.add_line(peanuts());
        order.add_line(OrderLine::new("Bag", dec!(100), vec![]));
        assert_eq!(order.total_with_tax(dec!(0.01)).unwrap().amount(), dec!(665));
    }

    #[test]
    fn test_state_closures() {
        let state = OrderState::new();
        let id = state.with_order_mut(|o| o.add_line(peanuts()));
        let selected = state.with_order(|o| o.selected_line().map(|l| l.id.clone()));
        assert_eq!(selected, Some(id));
    }
}
