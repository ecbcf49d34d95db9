//! # API Error Type
//!
//! Unified error type for POS commands.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Command Function  →  Result<T, ApiError>                               │
//! │         │                                                               │
//! │         ├── No line selected ─────────── NO_LINE_SELECTED               │
//! │         ├── Amount not a number ──────── VALIDATION_ERROR               │
//! │         ├── SolverError::InvalidTarget ─ INVALID_TARGET                 │
//! │         ├── SolverError::InvalidBase.. ─ INVALID_BASE_PRICE             │
//! │         ├── SolverError::Unreachable.. ─ UNREACHABLE_TARGET             │
//! │         └── SolverError::Overflow ────── INTERNAL                       │
//! │                                                                         │
//! │  Frontend receives: { "code": "INVALID_TARGET", "message": "..." }     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sba_core::SolverError;
use serde::Serialize;
use ts_rs::TS;

/// Error returned from POS commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NO_LINE_SELECTED",
///   "message": "Select a product first"
/// }
/// ```
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum ErrorCode {
    /// No order line is selected
    NoLineSelected,

    /// Input could not be parsed
    ValidationError,

    /// Target amount rejected by the solver
    InvalidTarget,

    /// Selected line has no usable price
    InvalidBasePrice,

    /// Target too small to sell any quantity
    UnreachableTarget,

    /// Unexpected failure
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates the "select a product first" error.
    pub fn no_line_selected() -> Self {
        ApiError::new(ErrorCode::NoLineSelected, "Select a product first")
    }
}

/// Converts solver errors to API errors.
impl From<SolverError> for ApiError {
    fn from(err: SolverError) -> Self {
        let code = match &err {
            SolverError::InvalidTarget(_) => ErrorCode::InvalidTarget,
            SolverError::InvalidBasePrice(_) => ErrorCode::InvalidBasePrice,
            SolverError::UnreachableTarget { .. } => ErrorCode::UnreachableTarget,
            SolverError::Overflow(what) => {
                tracing::error!(what, "Solver arithmetic overflow");
                ErrorCode::Internal
            }
        };
        ApiError::new(code, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_solver_error_codes() {
        assert_eq!(
            ApiError::from(SolverError::InvalidTarget(0.0)).code,
            ErrorCode::InvalidTarget
        );
        assert_eq!(
            ApiError::from(SolverError::InvalidBasePrice(-1.0)).code,
            ErrorCode::InvalidBasePrice
        );
        assert_eq!(
            ApiError::from(SolverError::UnreachableTarget {
                target: Decimal::ZERO
            })
            .code,
            ErrorCode::UnreachableTarget
        );
        assert_eq!(
            ApiError::from(SolverError::Overflow("line total")).code,
            ErrorCode::Internal
        );
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(ApiError::no_line_selected()).unwrap();
        assert_eq!(json["code"], "NO_LINE_SELECTED");
        assert_eq!(json["message"], "Select a product first");
    }

    #[test]
    fn test_display() {
        let err = ApiError::validation("Amount is not a number");
        assert_eq!(err.to_string(), "[ValidationError] Amount is not a number");
    }
}
