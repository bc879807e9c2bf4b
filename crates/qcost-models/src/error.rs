//! Error types for the cost models.

use thiserror::Error;

/// Errors produced while evaluating a cost formula.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ModelError {
    /// A formula parameter is outside the domain where the formula is defined.
    #[error("{context}: {parameter} = {value} must be positive and finite")]
    Domain {
        /// Formula being evaluated.
        context: &'static str,
        /// Offending parameter.
        parameter: &'static str,
        /// Offending value.
        value: f64,
    },

    /// The Taylor/Dyson truncation order needs `ln(x) > 1`.
    #[error("truncation order undefined for argument {0} (requires x > e)")]
    TruncationOrder(f64),
}

/// Result type for cost model evaluation.
pub type ModelResult<T> = Result<T, ModelError>;

/// Return `value` if it is strictly positive and finite.
pub(crate) fn positive(
    context: &'static str,
    parameter: &'static str,
    value: f64,
) -> ModelResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ModelError::Domain {
            context,
            parameter,
            value,
        })
    }
}

/// Errors produced when parsing a method name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseMethodError {
    /// The name is not in the method roster.
    #[error("unknown method: {0}")]
    Unknown(String),

    /// The method exists but is no longer evaluated.
    #[error("method {0} is deprecated and cannot be evaluated")]
    Deprecated(String),
}
