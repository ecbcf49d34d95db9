//! # Configuration State
//!
//! Store-level settings loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`SBA_*`)
//! 2. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sba_core::{SolveOptions, DEFAULT_CURRENCY_ROUNDING, DEFAULT_WEIGHT_STEP};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Environment variable names.
pub const ENV_WEIGHT_STEP: &str = "SBA_WEIGHT_STEP";
pub const ENV_CURRENCY_ROUNDING: &str = "SBA_CURRENCY_ROUNDING";
pub const ENV_PRICE_DECIMALS: &str = "SBA_PRICE_DECIMALS";
pub const ENV_CURRENCY_CODE: &str = "SBA_CURRENCY_CODE";

/// A configuration value that could not be used.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("{key} must be greater than zero (got {value})")]
    NotPositive { key: &'static str, value: Decimal },
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PosConfig {
    /// Currency code (ISO 4217). Informational only.
    pub currency_code: String,

    /// Smallest currency amount totals are rounded to.
    pub currency_rounding: Decimal,

    /// Increment the scale reports weights in.
    pub weight_step: Decimal,

    /// Decimal places unit prices are stored with. `None` keeps full
    /// precision.
    pub price_decimals: Option<u32>,
}

impl Default for PosConfig {
    /// Costa Rican colones, 5 g scale steps, full-precision prices.
    fn default() -> Self {
        PosConfig {
            currency_code: "CRC".to_string(),
            currency_rounding: DEFAULT_CURRENCY_ROUNDING,
            weight_step: DEFAULT_WEIGHT_STEP,
            price_decimals: None,
        }
    }
}

impl PosConfig {
    /// Creates a config from environment variables and defaults.
    ///
    /// Invalid values are logged and ignored so a typo cannot stop the till.
    ///
    /// ## Environment Variables
    /// - `SBA_WEIGHT_STEP`: scale increment (e.g. "5")
    /// - `SBA_CURRENCY_ROUNDING`: rounding unit (e.g. "0.01")
    /// - `SBA_PRICE_DECIMALS`: unit price precision (e.g. "6")
    /// - `SBA_CURRENCY_CODE`: currency code (e.g. "CRC")
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`PosConfig::from_env`] with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = PosConfig::default();

        if let Some(raw) = lookup(ENV_WEIGHT_STEP) {
            match parse_positive(ENV_WEIGHT_STEP, &raw) {
                Ok(step) => config.weight_step = step,
                Err(e) => warn!(error = %e, "Ignoring weight step override"),
            }
        }

        if let Some(raw) = lookup(ENV_CURRENCY_ROUNDING) {
            match parse_positive(ENV_CURRENCY_ROUNDING, &raw) {
                Ok(rounding) => config.currency_rounding = rounding,
                Err(e) => warn!(error = %e, "Ignoring currency rounding override"),
            }
        }

        if let Some(raw) = lookup(ENV_PRICE_DECIMALS) {
            match raw.trim().parse::<u32>() {
                Ok(dp) if dp <= 28 => config.price_decimals = Some(dp),
                _ => warn!(value = %raw, "Ignoring price decimals override"),
            }
        }

        if let Some(code) = lookup(ENV_CURRENCY_CODE) {
            let code = code.trim();
            if !code.is_empty() {
                config.currency_code = code.to_uppercase();
            }
        }

        config
    }

    /// Solver options derived from this configuration.
    pub fn solve_options(&self) -> SolveOptions {
        SolveOptions {
            weight_step: self.weight_step.to_f64(),
            price_decimals: self.price_decimals,
        }
    }
}

fn parse_positive(key: &'static str, raw: &str) -> Result<Decimal, ConfigError> {
    let value = Decimal::from_str(raw.trim()).map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
    })?;

    if value <= Decimal::ZERO {
        return Err(ConfigError::NotPositive { key, value });
    }

    Ok(value)
}
