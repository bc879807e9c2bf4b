//! Estimator error types.

use qcost_chem::ChemError;
use qcost_models::{ModelError, ParseMethodError};
use thiserror::Error;

use crate::config::ConfigError;

/// Result type for estimator operations.
pub type EstimateResult<T> = Result<T, EstimateError>;

/// Errors that can occur while estimating costs.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EstimateError {
    /// Method name not in the roster.
    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    /// Method name recognised but deprecated.
    #[error("Method {0} is deprecated")]
    DeprecatedMethod(String),

    /// Molecule identifier could not be resolved.
    #[error("Unresolved molecule identifier: {0}")]
    UnresolvedIdentifier(String),

    /// Molecular data error.
    #[error(transparent)]
    Chem(#[from] ChemError),

    /// Cost formula error.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization error.
    #[error("Export error: {0}")]
    Export(String),
}

impl From<ParseMethodError> for EstimateError {
    fn from(e: ParseMethodError) -> Self {
        match e {
            ParseMethodError::Deprecated(name) => EstimateError::DeprecatedMethod(name),
            ParseMethodError::Unknown(name) => EstimateError::UnknownMethod(name),
            other => EstimateError::UnknownMethod(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for EstimateError {
    fn from(e: serde_json::Error) -> Self {
        EstimateError::Export(e.to_string())
    }
}
