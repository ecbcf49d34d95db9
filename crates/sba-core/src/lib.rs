//! # sba-core: Target-Total Solver
//!
//! Given a cash amount the customer wants to pay (tax included) and a product
//! sold by weight, this crate finds a weight quantity and a unit price whose
//! taxed, currency-rounded total is exactly that amount.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Sell-by-Amount Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 POS host (order-line editor)                    │   │
//! │  │    Select line ──► Type amount ──► Apply qty/price ──► Summary  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ OrderLineHost                          │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ sba-core (THIS CRATE) ★                         │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  solver   │  │ validation│  │   │
//! │  │   │ Request   │  │   Money   │  │  solve    │  │  inputs   │  │   │
//! │  │   │ TaxFactor │  │ rounding  │  │  refine   │  │ defaults  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO SHARED STATE • PURE FUNCTIONS                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Request/result types, tax rates and tax factors
//! - [`money`] - Money type with exact decimal rounding
//! - [`solver`] - Quantity quantization and unit price refinement
//! - [`host`] - The narrow interface a POS host implements
//! - [`validation`] - Input validation and defaults
//! - [`error`] - Solver error types
//!
//! ## Example Usage
//!
//! ```rust
//! use rust_decimal_macros::dec;
//! use sba_core::{solve, SolverRequest};
//!
//! // Customer wants to pay exactly 1000, product costs 500 per gram before 13% tax
//! let request = SolverRequest::new(1000.0, 500.0).with_tax_factor(1.13);
//! let result = solve(&request).unwrap();
//!
//! // The scale only reports in 5 g steps, so the quantity is rounded up
//! assert_eq!(result.quantity, dec!(5));
//! assert_eq!(result.final_total.amount(), dec!(1000));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod host;
pub mod money;
pub mod solver;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreResult, SolverError};
pub use host::{solve_for_line, OrderLineHost, SolveOptions};
pub use money::Money;
pub use solver::{round_up_to_step, solve};
pub use types::*;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Weight step used when the host does not configure one (5 grams).
pub const DEFAULT_WEIGHT_STEP: Decimal = dec!(5);

/// Currency rounding used when the host does not supply one.
pub const DEFAULT_CURRENCY_ROUNDING: Decimal = dec!(0.01);

/// Upper bound on unit price refinement passes.
///
/// Refinement normally settles on the first pass; the bound only matters when
/// price precision makes the target unreachable.
pub const MAX_REFINEMENT_ITERATIONS: u32 = 25;
