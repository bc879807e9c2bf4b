//! Qubitized quantum walks other than double factorization.
//!
//! Phase estimation on a walk operator needs `⌈π λ / (2 ε_PEA)⌉` steps; the
//! methods below differ only in the cost of one step.

use qcost_chem::HamiltonianSummary;

use crate::budget::ErrorSplit;
use crate::error::{ModelResult, positive};
use crate::plane_wave::PlaneWaveBasis;
use crate::primitives::{coefficient_bits, index_bits, walk_steps};

/// Linear-T walk in the plane-wave dual basis: `12n + 8μ` per step.
///
/// # Reference
/// Babbush et al., "Encoding Electronic Spectra in Quantum Circuits with
/// Linear T Complexity", PRX 8, 041015 (2018).
pub fn linear_t(basis: &PlaneWaveBasis, errors: &ErrorSplit) -> ModelResult<f64> {
    let lambda = basis.lambda();
    let steps = walk_steps(lambda, errors.pea)?;
    let mu = coefficient_bits(lambda, errors.hs)?;
    Ok(steps * (12.0 * basis.n_orbitals + 8.0 * mu))
}

/// Sparse-oracle walk over the `Γ` non-zero coefficients.
///
/// The oracle reads `d = ⌈Γ/8⌉` unique coefficients per spin-symmetry class
/// through a QROM of `d` Toffolis and prepares them by coherent alias
/// sampling.
///
/// # Reference
/// Berry, Gidney, Motta, McClean, Babbush, "Qubitization of Arbitrary Basis
/// Quantum Chemistry Leveraging Sparsity and Low Rank Factorization",
/// Quantum 3, 208 (2019).
pub fn sparsity_low_rank(summary: &HamiltonianSummary, errors: &ErrorSplit) -> ModelResult<f64> {
    let gamma = positive("sparsity_low_rank", "n_terms", summary.n_terms as f64)?;
    let n = summary.spin_orbitals() as f64;
    let lambda = summary.lambda();
    let steps = walk_steps(lambda, errors.pea)?;
    let mu = coefficient_bits(lambda, errors.hs)?;

    let d = (gamma / 8.0).ceil().max(1.0);
    let per_step = d + 2.0 * n + 4.0 * mu * (index_bits(d)? + 1.0);
    Ok(steps * per_step)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> HamiltonianSummary {
        HamiltonianSummary {
            spatial_orbitals: 4,
            electrons: 4,
            one_body_norm: 6.0,
            two_body_norm: 4.0,
            n_terms: 64,
            max_coefficient: 1.2,
        }
    }

    #[test]
    fn test_sparsity_low_rank_closed_form() {
        let errors = ErrorSplit::new(1e-3, 1e-3, 1e-3);
        let steps = walk_steps(10.0, 1e-3).unwrap();
        let mu = coefficient_bits(10.0, 1e-3).unwrap();
        // d = 8, ⌈log2 8⌉ = 3.
        let expected = steps * (8.0 + 16.0 + 4.0 * mu * 4.0);
        assert_eq!(sparsity_low_rank(&summary(), &errors).unwrap(), expected);
    }

    #[test]
    fn test_linear_t_scales_with_overhead() {
        let errors = ErrorSplit::even(3e-3);
        let a = PlaneWaveBasis::from_summary(&summary(), 1.0).unwrap();
        let b = PlaneWaveBasis::from_summary(&summary(), 2.0).unwrap();
        assert!(linear_t(&b, &errors).unwrap() > linear_t(&a, &errors).unwrap());
    }

    #[test]
    fn test_zero_norm_is_domain_error() {
        let mut s = summary();
        s.one_body_norm = 0.0;
        s.two_body_norm = 0.0;
        assert!(sparsity_low_rank(&s, &ErrorSplit::even(3e-3)).is_err());
    }
}
