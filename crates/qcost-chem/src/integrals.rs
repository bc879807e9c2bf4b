//! Molecular integrals in a fixed orthonormal orbital basis.

use ndarray::{Array2, Array4};

use crate::error::{ChemError, ChemResult};
use crate::fingerprint::fingerprint;
use crate::summary::HamiltonianSummary;

/// Coefficients at or below this magnitude do not count as Hamiltonian terms.
pub const NEGLIGIBLE_COEFFICIENT: f64 = 1e-12;

/// Absolute tolerance used when checking the chemist-notation symmetries.
pub const SYMMETRY_TOLERANCE: f64 = 1e-8;

/// One- and two-electron integrals of a molecule.
///
/// `eri` is stored in chemist notation, `eri[[p, q, r, s]] = (pq|rs)`.
#[derive(Debug, Clone)]
pub struct MolecularIntegrals {
    /// One-body matrix (N×N, symmetric).
    pub h0: Array2<f64>,
    /// Two-electron repulsion tensor (N×N×N×N).
    pub eri: Array4<f64>,
    /// Nuclear repulsion (plus any frozen-core) energy.
    pub e_nuc: f64,
    /// Total number of electrons.
    pub n_elec: usize,
    /// Optional atomic-orbital label per orbital, e.g. `"0 O 2p"`.
    pub ao_labels: Option<Vec<String>>,
}

impl MolecularIntegrals {
    /// Build an integral set, checking that all dimensions agree.
    pub fn new(h0: Array2<f64>, eri: Array4<f64>, e_nuc: f64, n_elec: usize) -> ChemResult<Self> {
        let n = h0.nrows();
        if h0.ncols() != n {
            return Err(ChemError::Shape(format!(
                "h0 must be square, got {}x{}",
                h0.nrows(),
                h0.ncols()
            )));
        }
        if eri.shape() != [n, n, n, n] {
            return Err(ChemError::Shape(format!(
                "eri must be {n}x{n}x{n}x{n} to match h0, got {:?}",
                eri.shape()
            )));
        }
        if n_elec > 2 * n {
            return Err(ChemError::Shape(format!(
                "{n_elec} electrons do not fit into {n} spatial orbitals"
            )));
        }
        Ok(Self {
            h0,
            eri,
            e_nuc,
            n_elec,
            ao_labels: None,
        })
    }

    /// Attach per-orbital AO labels.
    pub fn with_ao_labels(mut self, labels: Vec<String>) -> ChemResult<Self> {
        if labels.len() != self.n_orbitals() {
            return Err(ChemError::Shape(format!(
                "{} AO labels given for {} orbitals",
                labels.len(),
                self.n_orbitals()
            )));
        }
        self.ao_labels = Some(labels);
        Ok(self)
    }

    /// Number of spatial orbitals N.
    pub fn n_orbitals(&self) -> usize {
        self.h0.nrows()
    }

    /// Check the ERI tensor before it is handed to the eigensolver.
    ///
    /// Verifies finiteness and `(pq|rs) = (qp|rs) = (pq|sr) = (rs|pq)`.
    /// Positive semidefiniteness is not checked here.
    pub fn validate_eri(&self) -> ChemResult<()> {
        validate_eri(&self.eri)
    }

    /// Scalar parameters consumed by the non-factorized cost models.
    pub fn summary(&self) -> HamiltonianSummary {
        let mut one_body_norm = 0.0;
        let mut two_body_norm = 0.0;
        let mut n_terms = 0usize;
        let mut max_coefficient: f64 = 0.0;

        for &v in &self.h0 {
            let a = v.abs();
            one_body_norm += a;
            if a > NEGLIGIBLE_COEFFICIENT {
                n_terms += 1;
            }
            max_coefficient = max_coefficient.max(a);
        }
        for &v in &self.eri {
            let a = v.abs();
            two_body_norm += a;
            if a > NEGLIGIBLE_COEFFICIENT {
                n_terms += 1;
            }
            max_coefficient = max_coefficient.max(0.5 * a);
        }

        HamiltonianSummary {
            spatial_orbitals: self.n_orbitals(),
            electrons: self.n_elec,
            one_body_norm,
            two_body_norm: 0.5 * two_body_norm,
            n_terms,
            max_coefficient,
        }
    }
}

/// Fingerprint of an ERI tensor's shape and exact values.
pub fn eri_fingerprint(eri: &Array4<f64>) -> String {
    let shape = eri.shape().iter().flat_map(|&d| (d as u64).to_le_bytes());
    let values = eri.iter().flat_map(|v| v.to_bits().to_le_bytes());
    fingerprint(shape.chain(values))
}

/// Validate the structural invariants of a chemist-notation ERI tensor.
pub fn validate_eri(eri: &Array4<f64>) -> ChemResult<()> {
    let shape = eri.shape();
    let n = shape[0];
    if shape.iter().any(|&d| d != n) {
        return Err(ChemError::MalformedTensor(format!(
            "expected an N^4 tensor, got shape {shape:?}"
        )));
    }
    if n == 0 {
        return Err(ChemError::MalformedTensor("tensor is empty".into()));
    }

    for ((p, q, r, s), &v) in eri.indexed_iter() {
        if !v.is_finite() {
            return Err(ChemError::MalformedTensor(format!(
                "non-finite entry ({p}{q}|{r}{s}) = {v}"
            )));
        }
        // The three swaps generate all eight index permutations.
        for (label, other) in [
            ("(qp|rs)", eri[[q, p, r, s]]),
            ("(pq|sr)", eri[[p, q, s, r]]),
            ("(rs|pq)", eri[[r, s, p, q]]),
        ] {
            if (v - other).abs() > SYMMETRY_TOLERANCE * (1.0 + v.abs()) {
                return Err(ChemError::MalformedTensor(format!(
                    "({p}{q}|{r}{s}) = {v} but {label} = {other}"
                )));
            }
        }
    }
    Ok(())
}
