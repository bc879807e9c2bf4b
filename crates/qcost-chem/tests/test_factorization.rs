//! Tests for the spectral factorization of ERI tensors.

use approx::assert_abs_diff_eq;
use ndarray::{Array2, Array4};
use proptest::prelude::*;

use qcost_chem::{ChemError, FactorSource, SpectralFactor};
use qcost_chem::factorization::{DEFAULT_EIGEN_THRESHOLD, eri_matrix, factorize};
use qcost_chem::store::{load_factor, save_factor};

/// Σ_k v_k ⊗ v_k ⊗ v_k ⊗ v_k: chemist-symmetric with a PSD pair matrix.
fn sum_of_rank_one(vectors: &[Vec<f64>]) -> Array4<f64> {
    let n = vectors[0].len();
    Array4::from_shape_fn((n, n, n, n), |(p, q, r, s)| {
        vectors.iter().map(|v| v[p] * v[q] * v[r] * v[s]).sum::<f64>()
    })
}

fn max_abs_diff(a: &Array2<f64>, b: &Array2<f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

// ---------------------------------------------------------------------------
// Reconstruction
// ---------------------------------------------------------------------------

#[test]
fn rank_two_tensor_reconstructs_exactly() {
    let eri = sum_of_rank_one(&[vec![1.0, 0.3, -0.2], vec![0.1, -0.7, 0.5]]);
    let factor = factorize(&eri, DEFAULT_EIGEN_THRESHOLD).unwrap();

    assert_eq!(factor.rank(), 2);
    assert_eq!(factor.n_orbitals(), 3);
    let diff = max_abs_diff(&factor.reconstruct(), &eri_matrix(&eri));
    assert!(diff < 1e-10, "reconstruction error {diff}");
}

#[test]
fn retained_eigenvalues_are_ascending_and_positive() {
    let eri = sum_of_rank_one(&[
        vec![1.0, 0.0, 0.2, 0.1],
        vec![0.0, 2.0, 0.0, -0.3],
        vec![0.4, 0.4, 0.4, 0.4],
    ]);
    let factor = factorize(&eri, DEFAULT_EIGEN_THRESHOLD).unwrap();
    let gval = factor.gval();
    assert!(gval.iter().all(|&v| v > DEFAULT_EIGEN_THRESHOLD));
    assert!(gval.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn eigenvector_columns_are_orthonormal() {
    let eri = sum_of_rank_one(&[vec![1.0, 0.3], vec![0.2, -0.9]]);
    let factor = factorize(&eri, DEFAULT_EIGEN_THRESHOLD).unwrap();
    let gvec = factor.gvec();
    for a in 0..factor.rank() {
        for b in 0..factor.rank() {
            let dot: f64 = (0..gvec.nrows()).map(|i| gvec[(i, a)] * gvec[(i, b)]).sum();
            let expected = if a == b { 1.0 } else { 0.0 };
            assert_abs_diff_eq!(dot, expected, epsilon = 1e-10);
        }
    }
}

#[test]
fn higher_threshold_truncates_rank() {
    let eri = sum_of_rank_one(&[vec![1.0, 0.0], vec![0.0, 0.01]]);
    assert_eq!(factorize(&eri, DEFAULT_EIGEN_THRESHOLD).unwrap().rank(), 2);
    // The second eigenvalue is 1e-8.
    assert_eq!(factorize(&eri, 1e-6).unwrap().rank(), 1);
}

// ---------------------------------------------------------------------------
// Failure modes
// ---------------------------------------------------------------------------

#[test]
fn malformed_tensor_rejected_before_decomposition() {
    let mut eri = sum_of_rank_one(&[vec![1.0, 0.5]]);
    eri[[0, 1, 0, 0]] = 3.0;
    assert!(matches!(
        factorize(&eri, DEFAULT_EIGEN_THRESHOLD),
        Err(ChemError::MalformedTensor(_))
    ));
}

#[test]
fn every_symmetry_swap_is_checked_off_canonical_indices() {
    // Each perturbed entry has p < q, r < s or (pq) < (rs), and breaks one swap.
    let cases = [
        ([0, 1, 1, 0], "(pq|rs) = (qp|rs)"),
        ([1, 0, 0, 1], "(pq|rs) = (pq|sr)"),
        ([0, 0, 1, 1], "(pq|rs) = (rs|pq)"),
        ([0, 1, 0, 1], "(01|01) = (10|10)"),
        ([0, 2, 1, 2], "three orbitals"),
    ];
    for (index, relation) in cases {
        let mut eri = sum_of_rank_one(&[vec![1.0, 0.5, -0.3]]);
        eri[index] += 0.75;
        assert!(
            matches!(
                factorize(&eri, DEFAULT_EIGEN_THRESHOLD),
                Err(ChemError::MalformedTensor(_))
            ),
            "{relation}: {index:?} accepted"
        );
    }
}

#[test]
fn factor_store_without_eigenpairs_is_degenerate() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty_cholesky.json");
    std::fs::write(&path, r#"{"gval": [], "rows": 4, "cols": 0, "gvec": []}"#).unwrap();
    assert!(matches!(
        load_factor(&path),
        Err(ChemError::DegenerateFactorization { dim: 4, .. })
    ));
}

#[test]
fn from_parts_with_square_rows_and_no_columns_is_degenerate() {
    let gvec = faer::Mat::<f64>::zeros(9, 0);
    assert!(matches!(
        SpectralFactor::from_parts(Vec::new(), gvec),
        Err(ChemError::DegenerateFactorization { dim: 9, .. })
    ));
}

#[test]
fn negative_definite_tensor_is_degenerate() {
    let eri = sum_of_rank_one(&[vec![1.0, 0.5]]).mapv(|v| -v);
    assert!(matches!(
        factorize(&eri, DEFAULT_EIGEN_THRESHOLD),
        Err(ChemError::DegenerateFactorization { .. })
    ));
}

// ---------------------------------------------------------------------------
// Second level
// ---------------------------------------------------------------------------

#[test]
fn rank_one_second_level() {
    let x = vec![1.0, 2.0];
    let eri = sum_of_rank_one(&[x]);
    let factor = factorize(&eri, DEFAULT_EIGEN_THRESHOLD).unwrap();
    let second = factor.second_level(DEFAULT_EIGEN_THRESHOLD).unwrap();

    assert_eq!(second.rank_1, 1);
    assert_eq!(second.rank_2, 1);
    // gval = |x|^4 = 25.
    assert_abs_diff_eq!(second.lambda_1, 25.0, epsilon = 1e-9);
    assert_abs_diff_eq!(second.lambda_2, 0.25, epsilon = 1e-9);
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[test]
fn factor_store_preserves_rank_and_values() {
    let eri = sum_of_rank_one(&[vec![1.0, 0.3, -0.2], vec![0.1, -0.7, 0.5]]);
    let factor = factorize(&eri, DEFAULT_EIGEN_THRESHOLD).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("eri_cholesky.json");
    save_factor(&factor, &path).unwrap();
    let loaded = load_factor(&path).unwrap();

    assert_eq!(loaded.rank(), factor.rank());
    assert_eq!(loaded.gval(), factor.gval());
    let diff = max_abs_diff(&loaded.reconstruct(), &factor.reconstruct());
    assert!(diff < 1e-12);
}

#[test]
fn factor_store_keeps_source_fingerprint_and_threshold() {
    let eri = sum_of_rank_one(&[vec![1.0, 0.3, -0.2]]);
    let factor = factorize(&eri, 1e-9).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("eri_cholesky.json");
    save_factor(&factor, &path).unwrap();
    let loaded = load_factor(&path).unwrap();

    assert_eq!(loaded.source(), Some(&FactorSource::of(&eri, 1e-9)));
    assert_ne!(loaded.source(), Some(&FactorSource::of(&(&eri * 10.0), 1e-9)));
    assert_ne!(loaded.source(), Some(&FactorSource::of(&eri, 1e-6)));
}

#[test]
fn factor_store_without_source_loads_bare() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("eri_cholesky.json");
    std::fs::write(&path, r#"{"gval": [2.0], "rows": 1, "cols": 1, "gvec": [1.0]}"#).unwrap();
    let loaded = load_factor(&path).unwrap();
    assert_eq!(loaded.rank(), 1);
    assert!(loaded.source().is_none());
}

// ---------------------------------------------------------------------------
// Rank invariant
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn rank_never_exceeds_pair_count(
        n in 1usize..4,
        seeds in prop::collection::vec(prop::collection::vec(-1.0f64..1.0, 3), 1..6),
    ) {
        let vectors: Vec<Vec<f64>> = seeds.iter().map(|s| s[..n].to_vec()).collect();
        let eri = sum_of_rank_one(&vectors);
        match factorize(&eri, DEFAULT_EIGEN_THRESHOLD) {
            Ok(factor) => prop_assert!(factor.rank() <= n * n),
            Err(ChemError::DegenerateFactorization { .. }) => {}
            Err(e) => prop_assert!(false, "unexpected error: {e}"),
        }
    }
}
