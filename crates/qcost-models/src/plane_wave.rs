//! Plane-wave dual basis derived from a Gaussian-basis Hamiltonian.
//!
//! The plane-wave methods need roughly `gauss2plane_overhead` times as many
//! basis functions as the Gaussian basis to reach the same accuracy. Norms
//! are scaled by the same factor.

use qcost_chem::HamiltonianSummary;

use crate::error::{ModelResult, positive};

/// Plane-wave parameters of one molecule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneWaveBasis {
    /// Number of plane-wave spin orbitals.
    pub n_orbitals: f64,
    /// Kinetic (one-body) norm.
    pub lambda_t: f64,
    /// Potential (two-body) norm.
    pub lambda_v: f64,
}

impl PlaneWaveBasis {
    /// Scale a Gaussian-basis summary into the plane-wave basis.
    pub fn from_summary(summary: &HamiltonianSummary, overhead: f64) -> ModelResult<Self> {
        let overhead = positive("plane-wave basis", "gauss2plane_overhead", overhead)?;
        let n = (summary.spin_orbitals() as f64 * overhead).ceil();
        Ok(Self {
            n_orbitals: positive("plane-wave basis", "n_orbitals", n)?,
            lambda_t: summary.one_body_norm * overhead,
            lambda_v: summary.two_body_norm * overhead,
        })
    }

    /// Total norm λ_T + λ_V.
    pub fn lambda(&self) -> f64 {
        self.lambda_t + self.lambda_v
    }
}
