//! Building blocks shared by the cost formulas.

use std::f64::consts::{LN_2, PI, SQRT_2};

use crate::error::{ModelError, ModelResult, positive};

/// Evolution time needed by phase estimation: `t = 4.7 / ε_PEA`.
pub const PEA_TIME_FACTOR: f64 = 4.7;

/// Hamiltonian evolution time for phase-estimation precision `eps_pea`.
pub fn evolution_time(eps_pea: f64) -> ModelResult<f64> {
    Ok(PEA_TIME_FACTOR / positive("evolution time", "eps_pea", eps_pea)?)
}

/// T gates for one single-qubit Z rotation synthesised to precision `eps`.
///
/// Ross–Selinger style count `10 + 4·log2(1/ε)`.
pub fn rotation_cost(eps: f64) -> ModelResult<f64> {
    let eps = positive("rotation synthesis", "eps", eps)?;
    Ok(10.0 + 4.0 * (1.0 / eps).log2())
}

/// Qubitized walk steps for phase estimation: `⌈π λ / (2 ε_PEA)⌉`.
pub fn walk_steps(lambda: f64, eps_pea: f64) -> ModelResult<f64> {
    let lambda = positive("walk steps", "lambda", lambda)?;
    let eps_pea = positive("walk steps", "eps_pea", eps_pea)?;
    Ok((PI * lambda / (2.0 * eps_pea)).ceil())
}

/// Number of Taylor/Dyson segments of unit normalised time: `⌈λ t / ln 2⌉`.
pub fn segments(lambda: f64, t: f64) -> ModelResult<f64> {
    let lambda = positive("segments", "lambda", lambda)?;
    let t = positive("segments", "t", t)?;
    Ok((lambda * t / LN_2).ceil())
}

/// Series truncation order `K = ⌈ln x / ln ln x⌉`.
///
/// Defined for `x > e` only; below that `ln ln x ≤ 0`.
pub fn truncation_order(x: f64) -> ModelResult<f64> {
    if !(x.is_finite() && x.ln() > 1.0) {
        return Err(ModelError::TruncationOrder(x));
    }
    let l = x.ln();
    Ok((l / l.ln()).ceil())
}

/// Bits of precision for coefficient registers: `⌈log2(2√2 λ / ε)⌉`, at least 1.
pub fn coefficient_bits(lambda: f64, eps: f64) -> ModelResult<f64> {
    let lambda = positive("coefficient bits", "lambda", lambda)?;
    let eps = positive("coefficient bits", "eps", eps)?;
    Ok((2.0 * SQRT_2 * lambda / eps).log2().ceil().max(1.0))
}

/// `⌈log2 x⌉`, at least 1.
pub fn index_bits(x: f64) -> ModelResult<f64> {
    let x = positive("index bits", "x", x)?;
    Ok(x.log2().ceil().max(1.0))
}

/// Total T cost of `count` rotations sharing a synthesis budget `eps`.
pub fn rotations(count: f64, eps: f64) -> ModelResult<f64> {
    let count = positive("rotations", "count", count)?;
    Ok(count * rotation_cost(eps / count)?)
}

/// Independent repetitions whose median meets failure probability `p_fail`: `⌈ln(1/p_fail)⌉`.
pub fn repetitions(p_fail: f64) -> ModelResult<f64> {
    let p_fail = positive("repetitions", "p_fail", p_fail)?;
    if p_fail >= 1.0 {
        return Err(ModelError::Domain {
            context: "repetitions",
            parameter: "p_fail",
            value: p_fail,
        });
    }
    Ok((1.0 / p_fail).ln().ceil().max(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_rotation_cost() {
        assert_abs_diff_eq!(rotation_cost(1.0 / 1024.0).unwrap(), 50.0, epsilon = 1e-12);
        assert!(rotation_cost(0.0).is_err());
        assert!(rotation_cost(f64::NAN).is_err());
    }

    #[test]
    fn test_walk_steps() {
        assert_eq!(walk_steps(1.0, PI / 2.0).unwrap(), 1.0);
        assert!(walk_steps(0.0, 1.0).is_err());
    }

    #[test]
    fn test_truncation_order() {
        // ln(e^4) = 4, ln 4 ≈ 1.386 -> ⌈2.885⌉ = 3.
        assert_eq!(truncation_order(4f64.exp()).unwrap(), 3.0);
        assert!(matches!(truncation_order(2.0), Err(ModelError::TruncationOrder(_))));
        assert!(truncation_order(f64::INFINITY).is_err());
    }

    #[test]
    fn test_bits() {
        assert_eq!(index_bits(8.0).unwrap(), 3.0);
        assert_eq!(index_bits(9.0).unwrap(), 4.0);
        assert_eq!(index_bits(1.0).unwrap(), 1.0);
        assert!(coefficient_bits(1.0, 1e-3).unwrap() >= 11.0);
    }

    #[test]
    fn test_repetitions() {
        assert_eq!(repetitions(0.1).unwrap(), 3.0);
        assert_eq!(repetitions(0.9).unwrap(), 1.0);
        assert!(repetitions(1.0).is_err());
        assert!(repetitions(0.0).is_err());
    }

    #[test]
    fn test_evolution_time() {
        assert_abs_diff_eq!(evolution_time(4.7e-3).unwrap(), 1000.0, epsilon = 1e-9);
        assert!(evolution_time(0.0).is_err());
    }
}
