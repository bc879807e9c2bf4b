//! Per-molecule cost calculation.

use std::collections::BTreeMap;

use qcost_chem::store::{factor_path_for, load_factor, save_factor};
use qcost_chem::{
    FactorSource, HamiltonianSummary, IntegralMolecule, Molecule, SpectralFactor, factorization,
};
use qcost_models::{DfInputs, ErrorSplit, Method, ModelContext};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::aggregate::{Aggregate, CostSample, aggregate};
use crate::config::EstimateConfig;
use crate::error::EstimateResult;

/// Seed of the RNG used for `method`, independent of evaluation order.
pub fn method_seed(seed: u64, method: Method) -> u64 {
    seed ^ (method.index() as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Evaluates methods against one molecule and keeps every sample set.
pub struct CostCalculator<'c> {
    molecule: Molecule,
    config: &'c EstimateConfig,
    summary: HamiltonianSummary,
    df_inputs: Option<DfInputs>,
    costs: BTreeMap<Method, Vec<CostSample>>,
}

impl<'c> CostCalculator<'c> {
    /// Create a calculator for `molecule`.
    pub fn new(molecule: Molecule, config: &'c EstimateConfig) -> Self {
        let summary = molecule.summary();
        Self {
            molecule,
            config,
            summary,
            df_inputs: None,
            costs: BTreeMap::new(),
        }
    }

    /// Sample sets of every method evaluated so far.
    pub fn costs(&self) -> &BTreeMap<Method, Vec<CostSample>> {
        &self.costs
    }

    /// Resolve `name` and evaluate it.
    pub fn calculate_cost_by_name(&mut self, name: &str) -> EstimateResult<Aggregate> {
        let method: Method = name.parse()?;
        self.calculate_cost(method)
    }

    /// Draw `n_samples` error splits, evaluate `method` on each and return the
    /// median of the finite samples.
    ///
    /// Domain errors of single samples make those samples undefined; a failed
    /// factorization fails the whole call.
    pub fn calculate_cost(&mut self, method: Method) -> EstimateResult<Aggregate> {
        let df = if method.requires_integrals() {
            self.df_inputs()?
        } else {
            None
        };
        let ctx = ModelContext {
            summary: &self.summary,
            df: df.as_ref(),
            p_fail: self.config.p_fail,
            gauss2plane_overhead: self.config.gauss2plane_overhead,
        };

        let n = self.config.n_samples;
        let mut rng = StdRng::seed_from_u64(method_seed(self.config.seed, method));
        let mut samples = Vec::with_capacity(n);
        for _ in 0..n {
            let errors = ErrorSplit::sample(self.config.error_budget, &mut rng)?;
            match method.evaluate(&ctx, &errors) {
                Ok(Some(cost)) => samples.push(CostSample::from_value(cost)),
                Ok(None) => {
                    // Same answer for every split.
                    samples = vec![CostSample::Undefined; n];
                    break;
                }
                Err(e) => {
                    debug!(%method, error = %e, "sample undefined");
                    samples.push(CostSample::Undefined);
                }
            }
        }

        let result = aggregate(&samples);
        info!(
            molecule = self.molecule.label(),
            %method,
            cost = %result,
            "cost calculated"
        );
        self.costs.insert(method, samples);
        Ok(result)
    }

    /// Double-factorization inputs, computed once.
    fn df_inputs(&mut self) -> EstimateResult<Option<DfInputs>> {
        if let Some(inputs) = self.df_inputs {
            return Ok(Some(inputs));
        }
        let Some(molecule) = self.molecule.as_integral() else {
            return Ok(None);
        };

        let n_orbitals = molecule.integrals().n_orbitals();
        let factor = spectral_factor(molecule, self.config)?;
        let second = factor.second_level(self.config.eigen_threshold)?;
        let inputs = DfInputs::from_factorization(&second, n_orbitals);
        self.df_inputs = Some(inputs);
        Ok(Some(inputs))
    }
}

/// Factorize the ERI tensor, going through the companion factor store when
/// `factor_cache` is enabled.
///
/// A stored factor is reused only when it records the fingerprint of the
/// current ERI tensor and the configured threshold; otherwise it is
/// recomputed and overwritten.
fn spectral_factor(
    molecule: &IntegralMolecule,
    config: &EstimateConfig,
) -> EstimateResult<SpectralFactor> {
    let cache = config
        .factor_cache
        .then(|| molecule.store_path().map(factor_path_for))
        .flatten();
    let eri = &molecule.integrals().eri;

    if let Some(path) = cache.as_deref().filter(|p| p.is_file()) {
        let expected = FactorSource::of(eri, config.eigen_threshold);
        match load_factor(path) {
            Ok(factor) if factor.source() == Some(&expected) => {
                debug!(path = %path.display(), "reusing factor store");
                return Ok(factor);
            }
            Ok(_) => warn!(path = %path.display(), "stale factor store; recomputing"),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unreadable factor store; recomputing")
            }
        }
    }

    let factor = factorization::factorize(eri, config.eigen_threshold)?;
    if let Some(path) = cache.as_deref() {
        if let Err(e) = save_factor(&factor, path) {
            warn!(path = %path.display(), error = %e, "could not write factor store");
        }
    }
    Ok(factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcost_chem::HamiltonianMolecule;

    fn hamiltonian_only() -> Molecule {
        Molecule::HamiltonianOnly(HamiltonianMolecule::new(
            "lih",
            HamiltonianSummary {
                spatial_orbitals: 6,
                electrons: 4,
                one_body_norm: 10.0,
                two_body_norm: 5.0,
                n_terms: 300,
                max_coefficient: 1.1,
            },
        ))
    }

    #[test]
    fn test_method_seeds_differ() {
        let seeds: Vec<u64> = Method::ALL.iter().map(|&m| method_seed(7, m)).collect();
        for (i, a) in seeds.iter().enumerate() {
            assert!(seeds[i + 1..].iter().all(|b| a != b));
        }
    }

    #[test]
    fn test_double_factorization_without_data_is_undefined() {
        let config = EstimateConfig::default();
        let mut calc = CostCalculator::new(hamiltonian_only(), &config);
        assert_eq!(calc.calculate_cost(Method::DoubleFactorization).unwrap(), Aggregate::Undefined);
        let samples = &calc.costs()[&Method::DoubleFactorization];
        assert_eq!(samples.len(), config.n_samples);
    }

    #[test]
    fn test_samples_are_stored_per_method() {
        let config = EstimateConfig {
            n_samples: 7,
            ..EstimateConfig::default()
        };
        let mut calc = CostCalculator::new(hamiltonian_only(), &config);
        let agg = calc.calculate_cost(Method::Qdrift).unwrap();
        assert!(agg.value().is_some());
        assert_eq!(calc.costs()[&Method::Qdrift].len(), 7);
    }

    #[test]
    fn test_repeatable_across_calculators() {
        let config = EstimateConfig::default();
        let mut a = CostCalculator::new(hamiltonian_only(), &config);
        let mut b = CostCalculator::new(hamiltonian_only(), &config);
        b.calculate_cost(Method::TaylorNaive).unwrap();
        assert_eq!(
            a.calculate_cost(Method::SparsityLowRank).unwrap(),
            b.calculate_cost(Method::SparsityLowRank).unwrap()
        );
    }

    #[test]
    fn test_by_name_errors() {
        use crate::error::EstimateError;
        let config = EstimateConfig::default();
        let mut calc = CostCalculator::new(hamiltonian_only(), &config);
        assert!(matches!(
            calc.calculate_cost_by_name("sublinear_scaling"),
            Err(EstimateError::DeprecatedMethod(_))
        ));
        assert!(matches!(
            calc.calculate_cost_by_name("nope"),
            Err(EstimateError::UnknownMethod(_))
        ));
        assert!(calc.calculate_cost_by_name("linear_t").is_ok());
    }
}
