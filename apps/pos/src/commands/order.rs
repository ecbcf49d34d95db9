//! # Order Commands
//!
//! Building the order the sell-by-amount command works on.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use sba_core::{Money, TaxRate};
use serde::Serialize;
use tracing::debug;
use ts_rs::TS;

use crate::error::ApiError;
use crate::state::{Order, OrderLine, OrderState, PosConfig};

/// Order response including lines and the rounded total.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderResponse {
    pub id: String,
    pub lines: Vec<LineDto>,
    pub selected_line_id: Option<String>,

    #[ts(as = "String")]
    pub total_with_tax: Money,
}

/// One line as shown in the order panel.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineDto {
    pub id: String,
    pub product_name: String,
    #[ts(as = "String")]
    pub quantity: Decimal,
    #[ts(as = "String")]
    pub unit_price: Decimal,
    #[ts(as = "String")]
    pub price_without_tax: Money,
    #[ts(as = "String")]
    pub price_with_tax: Money,
    pub price_manually_set: bool,
}

impl OrderResponse {
    fn build(order: &Order, rounding: Decimal) -> Result<Self, ApiError> {
        let lines = order
            .lines
            .iter()
            .map(|line| -> Result<LineDto, ApiError> {
                Ok(LineDto {
                    id: line.id.clone(),
                    product_name: line.product_name.clone(),
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                    price_without_tax: line.price_without_tax(rounding)?,
                    price_with_tax: line.price_with_tax(rounding)?,
                    price_manually_set: line.price_manually_set,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(OrderResponse {
            id: order.id.clone(),
            lines,
            selected_line_id: order.selected_line_id.clone(),
            total_with_tax: order.total_with_tax(rounding)?,
        })
    }
}

/// Gets the current order.
pub fn get_order(order: &OrderState, config: &PosConfig) -> Result<OrderResponse, ApiError> {
    debug!("get_order command");
    order.with_order(|o| OrderResponse::build(o, config.currency_rounding))
}

/// Adds a product line and selects it.
///
/// ## Arguments
/// * `product_name` - Display name, must not be blank
/// * `list_price` - Price per weight unit before tax, must be positive
/// * `tax_rates_bps` - Taxes on the line in basis points (1300 = 13%)
pub fn add_line(
    order: &OrderState,
    config: &PosConfig,
    product_name: &str,
    list_price: f64,
    tax_rates_bps: &[u32],
) -> Result<OrderResponse, ApiError> {
    debug!(product_name, list_price, "add_line command");

    let product_name = product_name.trim();
    if product_name.is_empty() {
        return Err(ApiError::validation("Product name is required"));
    }

    let list_price = Decimal::from_f64(list_price)
        .filter(|p| *p > Decimal::ZERO)
        .ok_or_else(|| ApiError::validation("List price must be positive"))?;

    let rates = tax_rates_bps.iter().copied().map(TaxRate::from_bps).collect();
    let line = OrderLine::new(product_name, list_price, rates);

    order.with_order_mut(|o| {
        o.add_line(line);
        OrderResponse::build(o, config.currency_rounding)
    })
}

/// Selects a line for the next sell-by-amount.
pub fn select_line(
    order: &OrderState,
    config: &PosConfig,
    line_id: &str,
) -> Result<OrderResponse, ApiError> {
    debug!(line_id, "select_line command");

    order.with_order_mut(|o| -> Result<OrderResponse, ApiError> {
        o.select_line(line_id).map_err(ApiError::validation)?;
        OrderResponse::build(o, config.currency_rounding)
    })
}
