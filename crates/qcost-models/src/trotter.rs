//! Product-formula methods: randomized and low-depth Trotter.
//!
//! Every exponential of a Hamiltonian term becomes one single-qubit Z
//! rotation, so the cost is the number of exponentials times the
//! synthesis cost of one rotation at its share of ε_S.

use qcost_chem::HamiltonianSummary;

use crate::budget::ErrorSplit;
use crate::error::{ModelResult, positive};
use crate::plane_wave::PlaneWaveBasis;
use crate::primitives::{evolution_time, repetitions, rotations};

/// qDRIFT: `n = ⌈2 λ² t² / ε_HS⌉` randomly sampled exponentials.
///
/// The channel only matches the target on average, so the estimate is
/// repeated `⌈ln(1/p_fail)⌉` times.
///
/// # Reference
/// E. Campbell, "Random Compiler for Fast Hamiltonian Simulation",
/// PRL 123, 070503 (2019).
pub fn qdrift(summary: &HamiltonianSummary, errors: &ErrorSplit, p_fail: f64) -> ModelResult<f64> {
    let lambda = summary.lambda();
    let t = evolution_time(errors.pea)?;
    let eps_hs = positive("qdrift", "eps_hs", errors.hs)?;

    let n = (2.0 * lambda.powi(2) * t.powi(2) / eps_hs).ceil();
    Ok(rotations(n, errors.synthesis)? * repetitions(p_fail)?)
}

/// Randomized second-order product formula.
///
/// `r = ⌈(Γ Λ t)^{3/2} / √ε_HS⌉` steps of `2Γ` exponentials each, with the
/// term order permuted at random in every step.
///
/// # Reference
/// Childs, Ostrander, Su, "Faster quantum simulation by randomization",
/// Quantum 3, 182 (2019).
pub fn rand_ham(
    summary: &HamiltonianSummary,
    errors: &ErrorSplit,
    p_fail: f64,
) -> ModelResult<f64> {
    let gamma = positive("rand_ham", "n_terms", summary.n_terms as f64)?;
    let big_lambda = positive("rand_ham", "max_coefficient", summary.max_coefficient)?;
    let t = evolution_time(errors.pea)?;
    let eps_hs = positive("rand_ham", "eps_hs", errors.hs)?;

    let r = ((gamma * big_lambda * t).powf(1.5) / eps_hs.sqrt()).ceil();
    let exponentials = 2.0 * gamma * r;
    Ok(rotations(exponentials, errors.synthesis)? * repetitions(p_fail)?)
}

/// Second-order Trotter in the plane-wave dual basis.
///
/// Each step applies the diagonal potential (`n²/2 + n` rotations) and the
/// kinetic term through a fermionic FFT (`n log2 n` rotations).
///
/// # Reference
/// Babbush et al., "Low-Depth Quantum Simulation of Materials",
/// PRX 8, 011044 (2018).
pub fn low_depth_trotter(basis: &PlaneWaveBasis, errors: &ErrorSplit) -> ModelResult<f64> {
    let n = basis.n_orbitals;
    let t = evolution_time(errors.pea)?;
    let eps_hs = positive("low_depth_trotter", "eps_hs", errors.hs)?;

    let r = ((basis.lambda() * t).powf(1.5) / eps_hs.sqrt()).ceil();
    let per_step = n * n / 2.0 + n + n * n.log2();
    rotations(r * per_step, errors.synthesis)
}
