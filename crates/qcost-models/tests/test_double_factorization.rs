//! Properties of the double-factorization cost bound.

use approx::assert_relative_eq;
use proptest::prelude::*;

use qcost_models::double_factorization::{
    DEFAULT_LAMBDA, DfInputs, double_factorization_method, estimate_beta, toffoli_gate_cost,
};
use qcost_models::{ErrorSplit, ModelError};

// ---------------------------------------------------------------------------
// Reference value
// ---------------------------------------------------------------------------

#[test]
fn reference_table_value() {
    let cost = toffoli_gate_cost(39088.0, 65.0, 1e-3, 425.7, DEFAULT_LAMBDA).unwrap();
    // β = 22: (2·39088/3 + 5720 + 11440 + 260) · π · 425.7 / 2e-3
    let expected =
        (2.0 * 39088.0 / 3.0 + 5720.0 + 11440.0 + 260.0) * std::f64::consts::PI * 425.7 / 2e-3;
    assert_relative_eq!(cost, expected, max_relative = 1e-12);
    assert!((1e10..1e11).contains(&cost));
}

#[test]
fn diverges_as_epsilon_vanishes() {
    let mut previous = 0.0;
    for exp in 1..12 {
        let eps = 10f64.powi(-exp);
        let cost = toffoli_gate_cost(100.0, 10.0, eps, 5.0, DEFAULT_LAMBDA).unwrap();
        assert!(cost > previous * 5.0);
        previous = cost;
    }
    assert!(previous > 1e12);
}

#[test]
fn domain_errors_are_reported() {
    assert!(matches!(
        toffoli_gate_cost(10.0, 0.0, 1e-3, 1.0, 2.0),
        Err(ModelError::Domain { parameter: "N", .. })
    ));
    assert!(matches!(
        toffoli_gate_cost(10.0, 4.0, 0.0, 1.0, 2.0),
        Err(ModelError::Domain { parameter: "epsilon", .. })
    ));
}

#[test]
fn missing_data_yields_no_result_for_any_split() {
    for total in [1e-6, 1e-3, 1.0] {
        let errors = ErrorSplit::even(total);
        for p_fail in [0.01, 0.5] {
            assert_eq!(double_factorization_method(None, &errors, p_fail).unwrap(), None);
        }
    }
}

#[test]
fn inputs_follow_second_level_factorization() {
    let second = qcost_chem::SecondLevel {
        rank_1: 7,
        rank_2: 3,
        lambda_1: 11.0,
        lambda_2: 0.5,
    };
    let inputs = DfInputs::from_factorization(&second, 4);
    assert_eq!(inputs.n_orbitals, 8);
    let cost = double_factorization_method(Some(&inputs), &ErrorSplit::new(1e-3, 1e-4, 1e-4), 0.1)
        .unwrap()
        .unwrap();
    assert_relative_eq!(
        cost,
        toffoli_gate_cost(21.0, 8.0, 1e-3, 5.5, DEFAULT_LAMBDA).unwrap(),
        max_relative = 1e-12
    );
}

// ---------------------------------------------------------------------------
// Monotonicity
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn beta_non_decreasing_in_n(n in 1.0f64..1e4, dn in 0.0f64..1e4, eps in 1e-9f64..1.0) {
        prop_assert!(estimate_beta(n + dn, eps).unwrap() >= estimate_beta(n, eps).unwrap());
    }

    #[test]
    fn beta_non_decreasing_as_epsilon_shrinks(
        n in 1.0f64..1e4,
        eps in 1e-9f64..1.0,
        shrink in 1.0f64..1e3,
    ) {
        prop_assert!(estimate_beta(n, eps / shrink).unwrap() >= estimate_beta(n, eps).unwrap());
    }

    #[test]
    fn cost_strictly_decreasing_in_epsilon(
        m in 1.0f64..1e5,
        n in 1.0f64..200.0,
        alpha in 1e-2f64..1e3,
        eps in 1e-8f64..1e-1,
        grow in 1.01f64..10.0,
    ) {
        let tight = toffoli_gate_cost(m, n, eps, alpha, DEFAULT_LAMBDA).unwrap();
        let loose = toffoli_gate_cost(m, n, eps * grow, alpha, DEFAULT_LAMBDA).unwrap();
        prop_assert!(loose < tight);
    }

    #[test]
    fn cost_increasing_in_rank_and_norm(
        m in 1.0f64..1e5,
        n in 1.0f64..200.0,
        alpha in 1e-2f64..1e3,
        eps in 1e-6f64..1e-1,
    ) {
        let base = toffoli_gate_cost(m, n, eps, alpha, DEFAULT_LAMBDA).unwrap();
        prop_assert!(toffoli_gate_cost(m * 2.0, n, eps, alpha, DEFAULT_LAMBDA).unwrap() > base);
        prop_assert!(toffoli_gate_cost(m, n, eps, alpha * 2.0, DEFAULT_LAMBDA).unwrap() > base);
    }
}
