//! Scalar Hamiltonian parameters shared by every cost model.

use serde::{Deserialize, Serialize};

/// Size and norm parameters of an electronic Hamiltonian.
///
/// Molecules with full integral data derive this from their tensors;
/// Hamiltonian-only molecules read it from a precomputed file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HamiltonianSummary {
    /// Number of spatial orbitals.
    pub spatial_orbitals: usize,
    /// Number of electrons.
    pub electrons: usize,
    /// Σ |h_pq|.
    pub one_body_norm: f64,
    /// ½ Σ |(pq|rs)|.
    pub two_body_norm: f64,
    /// Number of non-negligible coefficients.
    pub n_terms: usize,
    /// Largest coefficient magnitude.
    pub max_coefficient: f64,
}

impl HamiltonianSummary {
    /// Number of spin orbitals (qubits under Jordan-Wigner).
    pub fn spin_orbitals(&self) -> usize {
        2 * self.spatial_orbitals
    }

    /// Total 1-norm λ of the Hamiltonian.
    pub fn lambda(&self) -> f64 {
        self.one_body_norm + self.two_body_norm
    }
}
