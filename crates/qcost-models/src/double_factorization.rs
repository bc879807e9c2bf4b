//! Double-factorized qubitization.
//!
//! Toffoli cost of phase estimation with a walk operator built from the
//! two-level spectral factorization of the ERI tensor:
//!
//! ```text
//!   β    = ⌈5.652 + log2(N/ε)⌉
//!   cost = (2M/(1+λ) + 2λNβ + 8Nβ + 4N) · π · α_df / (2ε)
//! ```
//!
//! with M the total number of second-level eigenvectors, N the number of
//! spin orbitals, α_df the factorized 1-norm and λ the ancilla trade-off
//! parameter.
//!
//! # Reference
//! von Burg et al., "Quantum computing enhanced computational catalysis",
//! PRR 3, 033055 (2021), eq. (19)–(20).

use std::f64::consts::PI;

use qcost_chem::SecondLevel;
use tracing::warn;

use crate::budget::ErrorSplit;
use crate::error::{ModelResult, positive};

/// Default ancilla trade-off parameter λ.
pub const DEFAULT_LAMBDA: f64 = 2.0;

/// Inputs of the double-factorization model.
///
/// Only obtainable from a spectral factor, i.e. from a molecule with
/// integral data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DfInputs {
    /// First-level normalisation.
    pub lambda_1: f64,
    /// Second-level normalisation.
    pub lambda_2: f64,
    /// First-level rank.
    pub rank_1: usize,
    /// Second-level rank.
    pub rank_2: usize,
    /// Number of spin orbitals N.
    pub n_orbitals: usize,
}

impl DfInputs {
    /// Derive the model inputs from a two-level factorization.
    pub fn from_factorization(second: &SecondLevel, spatial_orbitals: usize) -> Self {
        Self {
            lambda_1: second.lambda_1,
            lambda_2: second.lambda_2,
            rank_1: second.rank_1,
            rank_2: second.rank_2,
            n_orbitals: 2 * spatial_orbitals,
        }
    }
}

/// Ancilla bit width `β = ⌈5.652 + log2(N/ε)⌉`.
pub fn estimate_beta(n: f64, epsilon: f64) -> ModelResult<f64> {
    let n = positive("estimate_beta", "N", n)?;
    let epsilon = positive("estimate_beta", "epsilon", epsilon)?;
    Ok((5.652 + (n / epsilon).log2()).ceil())
}

/// Toffoli count of double-factorized qubitized phase estimation.
pub fn toffoli_gate_cost(
    m: f64,
    n: f64,
    epsilon: f64,
    alpha_df: f64,
    lambda: f64,
) -> ModelResult<f64> {
    let beta = estimate_beta(n, epsilon)?;
    Ok(
        (2.0 * m / (1.0 + lambda) + 2.0 * lambda * n * beta + 8.0 * n * beta + 4.0 * n)
            * PI
            * alpha_df
            / (2.0 * epsilon),
    )
}

/// Cost of the double-factorization method for one error split.
///
/// `inputs` is `None` when the molecule carries no integral data; the method
/// then yields no result. `p_fail` does not enter this bound.
pub fn double_factorization_method(
    inputs: Option<&DfInputs>,
    errors: &ErrorSplit,
    _p_fail: f64,
) -> ModelResult<Option<f64>> {
    let Some(inputs) = inputs else {
        warn!("skipping double factorization: no integral data loaded");
        return Ok(None);
    };

    let epsilon_pea = errors.as_array()[0];
    let alpha_df = inputs.lambda_1 * inputs.lambda_2;
    let m = (inputs.rank_1 * inputs.rank_2) as f64;

    toffoli_gate_cost(m, inputs.n_orbitals as f64, epsilon_pea, alpha_df, DEFAULT_LAMBDA).map(Some)
}
