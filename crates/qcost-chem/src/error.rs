//! Error types for the chem crate.

use thiserror::Error;

/// Errors produced while loading, validating or factorizing molecular data.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChemError {
    /// Reading or writing a store failed.
    #[error("I/O error on {path}: {message}")]
    Io {
        /// File that was being accessed.
        path: String,
        /// Underlying error message.
        message: String,
    },

    /// A store or Hamiltonian file could not be decoded.
    #[error("Parse error in {path}: {message}")]
    Parse {
        /// File that was being decoded.
        path: String,
        /// Underlying error message.
        message: String,
    },

    /// Array dimensions do not agree with each other.
    #[error("Shape mismatch: {0}")]
    Shape(String),

    /// The two-electron tensor violates its structural invariants.
    #[error("Malformed ERI tensor: {0}")]
    MalformedTensor(String),

    /// No eigenvalue of the reshaped ERI matrix exceeded the threshold.
    #[error(
        "Degenerate factorization: no eigenvalue of the {dim}x{dim} ERI matrix \
         exceeds {threshold:e}"
    )]
    DegenerateFactorization {
        /// Side length of the reshaped matrix (N²).
        dim: usize,
        /// Positivity threshold that was applied.
        threshold: f64,
    },

    /// The eigensolver did not converge.
    #[error("Eigen-decomposition failed: {0}")]
    Eigen(String),

    /// Active-space selection could not be applied.
    #[error("Active space error: {0}")]
    ActiveSpace(String),

    /// Geometry literal could not be parsed.
    #[error("Invalid geometry: {0}")]
    Geometry(String),

    /// The store extension is not one this build can read.
    #[error("Unsupported store format '{0}'")]
    UnsupportedFormat(String),
}

/// Result type for chem operations.
pub type ChemResult<T> = Result<T, ChemError>;

impl ChemError {
    pub(crate) fn io(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        ChemError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn parse(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        ChemError::Parse {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<ndarray::ShapeError> for ChemError {
    fn from(e: ndarray::ShapeError) -> Self {
        ChemError::Shape(e.to_string())
    }
}
