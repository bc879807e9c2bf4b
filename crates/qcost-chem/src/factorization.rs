//! Spectral (double) factorization of the two-electron integral tensor.
//!
//! The ERI tensor is re-indexed so that the orbital pair `(p, r)` labels
//! rows and `(q, s)` labels columns:
//!
//! ```text
//!   V[(p·N + r), (q·N + s)] = (pq|rs)
//! ```
//!
//! `V` is a symmetric N²×N² matrix. Its eigenpairs with eigenvalue above a
//! positivity threshold form the first factorization level
//! `V ≈ gvec · diag(gval) · gvecᵀ`; each retained eigenvector, folded back
//! into an N×N matrix and diagonalised again, forms the second level.
//!
//! # Reference
//! von Burg et al., "Quantum computing enhanced computational catalysis",
//! PRR 3, 033055 (2021). <https://doi.org/10.1103/PhysRevResearch.3.033055>

use faer::{Mat, MatRef, Side};
use ndarray::{Array2, Array4};
use tracing::{debug, info};

use crate::error::{ChemError, ChemResult};
use crate::integrals::{eri_fingerprint, validate_eri};

/// Eigenvalues at or below this value are treated as round-off.
pub const DEFAULT_EIGEN_THRESHOLD: f64 = 1e-10;

/// Truncated eigenbasis of the reshaped ERI matrix.
#[derive(Debug, Clone)]
pub struct SpectralFactor {
    gval: Vec<f64>,
    gvec: Mat<f64>,
    n_orbitals: usize,
    source: Option<FactorSource>,
}

/// What a factor was computed from, kept with persisted factors so a stale
/// store can be told apart from a current one.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorSource {
    /// [`eri_fingerprint`] of the source tensor.
    pub fingerprint: String,
    /// Eigenvalue threshold used for truncation.
    pub threshold: f64,
}

impl FactorSource {
    /// Source record for `eri` factorized at `threshold`.
    pub fn of(eri: &Array4<f64>, threshold: f64) -> Self {
        Self {
            fingerprint: eri_fingerprint(eri),
            threshold,
        }
    }
}

/// Parameters of the two-level factorization consumed by the
/// double-factorization cost model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SecondLevel {
    /// Number of retained first-level eigenvectors (L).
    pub rank_1: usize,
    /// Mean number of retained second-level eigenvalues, rounded up.
    pub rank_2: usize,
    /// Σ gval.
    pub lambda_1: f64,
    /// max over leaves of (Σ |ν|)² / 4.
    pub lambda_2: f64,
}

impl SpectralFactor {
    /// Assemble a factor from stored parts.
    ///
    /// `gvec` must be N²×L with `L = gval.len() ≥ 1`.
    pub fn from_parts(gval: Vec<f64>, gvec: Mat<f64>) -> ChemResult<Self> {
        let rows = gvec.nrows();
        let n_orbitals = (rows as f64).sqrt().round() as usize;
        if n_orbitals * n_orbitals != rows {
            return Err(ChemError::Shape(format!(
                "gvec has {rows} rows, which is not N^2 for any N"
            )));
        }
        if gvec.ncols() != gval.len() {
            return Err(ChemError::Shape(format!(
                "gvec has {} columns but gval has {} entries",
                gvec.ncols(),
                gval.len()
            )));
        }
        if gval.is_empty() {
            return Err(ChemError::DegenerateFactorization {
                dim: rows,
                threshold: DEFAULT_EIGEN_THRESHOLD,
            });
        }
        Ok(Self {
            gval,
            gvec,
            n_orbitals,
            source: None,
        })
    }

    /// Attach the provenance of this factor.
    pub fn with_source(mut self, source: FactorSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Provenance, if known. Factors read from stores written without it
    /// have none.
    pub fn source(&self) -> Option<&FactorSource> {
        self.source.as_ref()
    }

    /// Factorization rank L.
    pub fn rank(&self) -> usize {
        self.gval.len()
    }

    /// Number of spatial orbitals N of the source tensor.
    pub fn n_orbitals(&self) -> usize {
        self.n_orbitals
    }

    /// Retained eigenvalues, in solver order (ascending).
    pub fn gval(&self) -> &[f64] {
        &self.gval
    }

    /// Retained eigenvectors as columns (N²×L).
    pub fn gvec(&self) -> MatRef<'_, f64> {
        self.gvec.as_ref()
    }

    /// `gvec · diag(gval) · gvecᵀ` as an N²×N² array.
    pub fn reconstruct(&self) -> Array2<f64> {
        let dim = self.gvec.nrows();
        let rank = self.rank();
        Array2::from_shape_fn((dim, dim), |(i, j)| {
            (0..rank)
                .map(|k| self.gvec[(i, k)] * self.gval[k] * self.gvec[(j, k)])
                .sum::<f64>()
        })
    }

    /// Diagonalise every retained eigenvector folded into an N×N matrix.
    ///
    /// The folded matrix is symmetrised before decomposition; eigenvalues
    /// with magnitude at or below `threshold` are dropped.
    pub fn second_level(&self, threshold: f64) -> ChemResult<SecondLevel> {
        let n = self.n_orbitals;
        let mut total_rank = 0usize;
        let mut lambda_2: f64 = 0.0;

        for l in 0..self.rank() {
            let leaf = Mat::<f64>::from_fn(n, n, |p, r| {
                0.5 * (self.gvec[(p * n + r, l)] + self.gvec[(r * n + p, l)])
            });
            let (values, _) = symmetric_eigen(&leaf)?;
            let kept: Vec<f64> = values.into_iter().filter(|v| v.abs() > threshold).collect();
            total_rank += kept.len();
            let one_norm: f64 = kept.iter().map(|v| v.abs()).sum();
            lambda_2 = lambda_2.max(0.25 * one_norm * one_norm);
        }

        let rank_2 = total_rank.div_ceil(self.rank());
        let lambda_1: f64 = self.gval.iter().sum();
        debug!(rank_1 = self.rank(), rank_2, lambda_1, lambda_2, "second-level factorization");

        Ok(SecondLevel {
            rank_1: self.rank(),
            rank_2,
            lambda_1,
            lambda_2,
        })
    }
}

/// Reshape a chemist-notation ERI tensor into the N²×N² pair matrix.
pub fn eri_matrix(eri: &Array4<f64>) -> Array2<f64> {
    let n = eri.shape()[0];
    Array2::from_shape_fn((n * n, n * n), |(i, j)| eri[[i / n, j / n, i % n, j % n]])
}

/// Factorize an ERI tensor, keeping eigenpairs with eigenvalue `> threshold`.
///
/// The tensor is validated first; a malformed tensor is rejected before the
/// decomposition. A result with no retained eigenpair is an error.
pub fn factorize(eri: &Array4<f64>, threshold: f64) -> ChemResult<SpectralFactor> {
    if !threshold.is_finite() {
        return Err(ChemError::MalformedTensor(format!(
            "eigenvalue threshold must be finite, got {threshold}"
        )));
    }
    validate_eri(eri)?;

    let n = eri.shape()[0];
    let dim = n * n;
    let matrix = eri_matrix(eri);
    let a = Mat::<f64>::from_fn(dim, dim, |i, j| matrix[[i, j]]);

    debug!(n_orbitals = n, dim, "diagonalising ERI pair matrix");
    let (values, vectors) = symmetric_eigen(&a)?;

    let kept: Vec<usize> = (0..dim).filter(|&k| values[k] > threshold).collect();
    if kept.is_empty() {
        return Err(ChemError::DegenerateFactorization { dim, threshold });
    }

    let gval: Vec<f64> = kept.iter().map(|&k| values[k]).collect();
    let gvec = Mat::<f64>::from_fn(dim, kept.len(), |i, j| vectors[(i, kept[j])]);

    info!(
        n_orbitals = n,
        rank = gval.len(),
        discarded = dim - gval.len(),
        "spectral factorization complete"
    );

    Ok(SpectralFactor {
        gval,
        gvec,
        n_orbitals: n,
        source: Some(FactorSource::of(eri, threshold)),
    })
}

/// Full symmetric eigen-decomposition, eigenvalues in ascending order.
fn symmetric_eigen(a: &Mat<f64>) -> ChemResult<(Vec<f64>, Mat<f64>)> {
    let evd = a
        .self_adjoint_eigen(Side::Lower)
        .map_err(|e| ChemError::Eigen(format!("{e:?}")))?;
    let s = evd.S().column_vector();
    let values = (0..a.nrows()).map(|i| s[i]).collect();
    Ok((values, evd.U().to_owned()))
}
