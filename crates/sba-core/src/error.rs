//! # Error Types
//!
//! Error types for the target-total solver.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  sba-core errors (this file)                                           │
//! │  └── SolverError      - Rejected inputs, unreachable targets            │
//! │                                                                         │
//! │  sba-pos errors (host app)                                             │
//! │  └── ApiError         - What the frontend sees (serialized)            │
//! │                                                                         │
//! │  Flow: SolverError → ApiError → Frontend                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A result that could not hit the target exactly is NOT an error: it comes
//! back as a [`SolverResult`](crate::SolverResult) carrying a
//! [`ConvergenceWarning`](crate::ConvergenceWarning).

use rust_decimal::Decimal;
use thiserror::Error;

/// Solver failures. All of them are recoverable; the caller decides what to
/// show the cashier.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    /// Target is zero, negative, NaN or infinite.
    #[error("Target total must be a positive, finite amount (got {0})")]
    InvalidTarget(f64),

    /// Base unit price is zero, negative, NaN, infinite or unavailable.
    ///
    /// ## When This Occurs
    /// - The selected line has no price
    /// - The host could not read the price (reported as `NaN`)
    #[error("Base unit price must be a positive, finite amount (got {0})")]
    InvalidBasePrice(f64),

    /// The target normalizes to an amount that needs a zero quantity.
    ///
    /// ## When This Occurs
    /// - Target is smaller than half a currency rounding unit,
    ///   e.g. 0.004 with a rounding of 0.01
    #[error("Target total {target} cannot be reached with a non-zero quantity")]
    UnreachableTarget { target: Decimal },

    /// Intermediate arithmetic left the representable decimal range.
    #[error("Arithmetic overflow while computing {0}")]
    Overflow(&'static str),
}

/// Convenience type alias for Results with SolverError.
pub type CoreResult<T> = Result<T, SolverError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_messages() {
        let err = SolverError::InvalidTarget(0.0);
        assert_eq!(
            err.to_string(),
            "Target total must be a positive, finite amount (got 0)"
        );

        let err = SolverError::UnreachableTarget { target: dec!(0.00) };
        assert_eq!(
            err.to_string(),
            "Target total 0.00 cannot be reached with a non-zero quantity"
        );
    }

    #[test]
    fn test_unavailable_price_message() {
        let err = SolverError::InvalidBasePrice(f64::NAN);
        assert_eq!(
            err.to_string(),
            "Base unit price must be a positive, finite amount (got NaN)"
        );
    }
}
