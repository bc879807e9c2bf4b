//! Truncated Taylor and Dyson series methods.
//!
//! All of these split the evolution into `r` segments of normalised time
//! `ln 2 / λ`, truncate the series of each segment at order K and boost the
//! LCU success probability with one round of oblivious amplitude
//! amplification, which costs three SELECT and six PREPARE applications per
//! segment.

use qcost_chem::HamiltonianSummary;

use crate::budget::ErrorSplit;
use crate::error::{ModelError, ModelResult, positive};
use crate::plane_wave::PlaneWaveBasis;
use crate::primitives::{
    coefficient_bits, evolution_time, index_bits, rotation_cost, rotations, segments,
    truncation_order,
};

/// Segment count and truncation order for a series of norm `lambda`.
fn series(lambda: f64, errors: &ErrorSplit) -> ModelResult<(f64, f64)> {
    let t = evolution_time(errors.pea)?;
    let r = segments(lambda, t)?;
    let eps_hs = positive("series truncation", "eps_hs", errors.hs)?;
    Ok((r, truncation_order(r / eps_hs)?))
}

fn amplified(r: f64, select: f64, prepare: f64) -> f64 {
    r * (3.0 * select + 6.0 * prepare)
}

// ---------------------------------------------------------------------------
// Gaussian basis
// ---------------------------------------------------------------------------

/// Truncated Taylor series with every coefficient loaded by an explicit
/// rotation.
///
/// # Reference
/// Berry, Childs, Cleve, Kothari, Somma, "Simulating Hamiltonian dynamics
/// with a truncated Taylor series", PRL 114, 090502 (2015).
pub fn taylor_naive(summary: &HamiltonianSummary, errors: &ErrorSplit) -> ModelResult<f64> {
    let gamma = positive("taylor_naive", "n_terms", summary.n_terms as f64)?;
    let n = summary.spin_orbitals() as f64;
    let (r, k) = series(summary.lambda(), errors)?;

    let select = 4.0 * k * (gamma + n);
    let prepare = k * gamma * rotation_cost(errors.synthesis / (6.0 * r * k * gamma))?;
    Ok(amplified(r, select, prepare))
}

/// Taylor series with integrals evaluated on the fly.
///
/// The normalisation becomes `Λ Γ`; coefficients are computed into a
/// μ-bit register instead of being rotated in.
///
/// # Reference
/// Babbush et al., "Exponentially more precise quantum simulation of
/// fermions in second quantization", NJP 18, 033032 (2016).
pub fn taylor_on_the_fly(summary: &HamiltonianSummary, errors: &ErrorSplit) -> ModelResult<f64> {
    let gamma = positive("taylor_on_the_fly", "n_terms", summary.n_terms as f64)?;
    let big_lambda = positive("taylor_on_the_fly", "max_coefficient", summary.max_coefficient)?;
    let n = summary.spin_orbitals() as f64;
    let lambda = big_lambda * gamma;
    let (r, k) = series(lambda, errors)?;
    let mu = coefficient_bits(lambda, errors.hs)?;
    let log_n = index_bits(n)?;

    let select = 4.0 * k * n * log_n;
    let prepare = k * (4.0 * mu * mu * log_n + rotation_cost(errors.synthesis / (6.0 * r * k))?);
    Ok(amplified(r, select, prepare))
}

/// Taylor series over the configuration-interaction matrix.
///
/// The CI matrix of η electrons in n spin orbitals is d-sparse with
/// `d = 1 + η(n−η) + η(η−1)(n−η)(n−η−1)/4` (singles and doubles).
///
/// # Reference
/// Babbush et al., "Exponentially more precise quantum simulation of
/// fermions in the configuration interaction representation",
/// QST 3, 015006 (2017).
pub fn configuration_interaction(
    summary: &HamiltonianSummary,
    errors: &ErrorSplit,
) -> ModelResult<f64> {
    let eta = summary.electrons as f64;
    let n = summary.spin_orbitals() as f64;
    if n <= eta {
        return Err(ModelError::Domain {
            context: "configuration_interaction",
            parameter: "virtual orbitals",
            value: n - eta,
        });
    }
    let big_lambda = positive(
        "configuration_interaction",
        "max_coefficient",
        summary.max_coefficient,
    )?;

    let virt = n - eta;
    let d = 1.0 + eta * virt + eta * (eta - 1.0) * virt * (virt - 1.0) / 4.0;
    let lambda = d * big_lambda;
    let (r, k) = series(lambda, errors)?;
    let mu = coefficient_bits(lambda, errors.hs)?;

    let oracle = 8.0 * eta * index_bits(n)? + 4.0 * mu * mu;
    let select = 4.0 * k * oracle;
    let prepare = k * rotation_cost(errors.synthesis / (6.0 * r * k))?;
    Ok(amplified(r, select, prepare))
}

// ---------------------------------------------------------------------------
// Plane-wave dual basis
// ---------------------------------------------------------------------------

/// Taylor series in the plane-wave dual basis, explicit coefficients.
///
/// # Reference
/// Babbush et al., "Low-Depth Quantum Simulation of Materials",
/// PRX 8, 011044 (2018).
pub fn low_depth_taylor(basis: &PlaneWaveBasis, errors: &ErrorSplit) -> ModelResult<f64> {
    let n = basis.n_orbitals;
    let (r, k) = series(basis.lambda(), errors)?;

    let select = 4.0 * k * (2.0 * n + index_bits(n)?);
    let prepare = rotations(k * n, errors.synthesis / (6.0 * r))?;
    Ok(amplified(r, select, prepare))
}

/// Taylor series in the plane-wave dual basis, coefficients computed on the
/// fly.
pub fn low_depth_taylor_on_the_fly(
    basis: &PlaneWaveBasis,
    errors: &ErrorSplit,
) -> ModelResult<f64> {
    let n = basis.n_orbitals;
    let lambda = basis.lambda();
    let (r, k) = series(lambda, errors)?;
    let mu = coefficient_bits(lambda, errors.hs)?;

    let select = 4.0 * k * (2.0 * n + index_bits(n)?);
    let prepare =
        k * (4.0 * mu * mu * index_bits(n)? + rotation_cost(errors.synthesis / (6.0 * r * k))?);
    Ok(amplified(r, select, prepare))
}

/// Dyson series in the interaction picture of the kinetic term.
///
/// Only the potential norm sets the segment count; the kinetic term is
/// applied exactly between the K+1 Dyson time slices with fermionic FFTs.
///
/// # Reference
/// Low, Wiebe, "Hamiltonian Simulation in the Interaction Picture",
/// arXiv:1805.00675 (2018).
pub fn interaction_picture(basis: &PlaneWaveBasis, errors: &ErrorSplit) -> ModelResult<f64> {
    let n = basis.n_orbitals;
    let lambda_v = positive("interaction_picture", "lambda_v", basis.lambda_v)?;
    let (r, k) = series(lambda_v, errors)?;
    let mu = coefficient_bits(lambda_v, errors.hs)?;
    let log_n = index_bits(n)?;

    let kinetic = rotations((k + 1.0) * n * log_n, errors.synthesis / (2.0 * r))?;
    let select = 4.0 * k * (2.0 * n + log_n);
    let prepare = 4.0 * k * mu * mu;
    Ok(amplified(r, select, prepare) + r * kinetic)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> HamiltonianSummary {
        HamiltonianSummary {
            spatial_orbitals: 7,
            electrons: 10,
            one_body_norm: 60.0,
            two_body_norm: 40.0,
            n_terms: 600,
            max_coefficient: 4.5,
        }
    }

    type GaussianModel = fn(&HamiltonianSummary, &ErrorSplit) -> ModelResult<f64>;
    type PlaneWaveModel = fn(&PlaneWaveBasis, &ErrorSplit) -> ModelResult<f64>;

    const GAUSSIAN: [GaussianModel; 3] =
        [taylor_naive, taylor_on_the_fly, configuration_interaction];
    const PLANE_WAVE: [PlaneWaveModel; 3] =
        [low_depth_taylor, low_depth_taylor_on_the_fly, interaction_picture];

    #[test]
    fn test_gaussian_models_are_finite_and_positive() {
        let errors = ErrorSplit::even(3e-3);
        for model in GAUSSIAN {
            let cost = model(&summary(), &errors).unwrap();
            assert!(cost.is_finite() && cost > 0.0);
        }
    }

    #[test]
    fn test_plane_wave_models_are_finite_and_positive() {
        let errors = ErrorSplit::even(3e-3);
        let basis = PlaneWaveBasis::from_summary(&summary(), 3.0).unwrap();
        for model in PLANE_WAVE {
            let cost = model(&basis, &errors).unwrap();
            assert!(cost.is_finite() && cost > 0.0);
        }
    }

    #[test]
    fn test_tighter_precision_costs_more() {
        let loose = ErrorSplit::even(3e-2);
        let tight = ErrorSplit::even(3e-4);
        for model in GAUSSIAN {
            assert!(model(&summary(), &tight).unwrap() > model(&summary(), &loose).unwrap());
        }
        let basis = PlaneWaveBasis::from_summary(&summary(), 2.0).unwrap();
        for model in PLANE_WAVE {
            assert!(model(&basis, &tight).unwrap() > model(&basis, &loose).unwrap());
        }
    }

    #[test]
    fn test_configuration_interaction_needs_virtual_orbitals() {
        let mut s = summary();
        s.electrons = 14;
        assert!(matches!(
            configuration_interaction(&s, &ErrorSplit::even(3e-3)),
            Err(ModelError::Domain { .. })
        ));
    }

    #[test]
    fn test_interaction_picture_requires_potential() {
        let mut s = summary();
        s.two_body_norm = 0.0;
        let basis = PlaneWaveBasis::from_summary(&s, 1.0).unwrap();
        assert!(interaction_picture(&basis, &ErrorSplit::even(3e-3)).is_err());
    }
}
