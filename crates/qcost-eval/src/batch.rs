//! Batch evaluation of the configured molecules over the method roster.

use qcost_chem::IdentifierKind;
use qcost_models::Method;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::aggregate::Aggregate;
use crate::calculator::CostCalculator;
use crate::config::EstimateConfig;
use crate::error::{EstimateError, EstimateResult};
use crate::loader::{identify, load_molecule};
use crate::report::ResultMatrix;

/// Result of a batch run.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Aggregated costs of every evaluated molecule.
    pub matrix: ResultMatrix,
    /// Identifiers that were skipped, with the reason.
    pub skipped: Vec<(String, String)>,
}

/// Evaluate every configured molecule with every configured method.
///
/// Molecules run in parallel; `progress` is called once per finished
/// molecule.
pub fn run_batch(
    config: &EstimateConfig,
    progress: &(dyn Fn(&str) + Sync),
) -> EstimateResult<BatchOutcome> {
    let roster = config.roster()?;
    info!(
        molecules = config.molecules.len(),
        methods = roster.len(),
        "starting batch"
    );

    let rows: Vec<(String, EstimateResult<Vec<(Method, Aggregate)>>)> = config
        .molecules
        .par_iter()
        .map(|raw| {
            let row = evaluate_molecule(raw, config, &roster);
            progress(raw.as_str());
            (raw.clone(), row)
        })
        .collect();

    let mut matrix = ResultMatrix::new(roster);
    let mut skipped = Vec::new();
    for (raw, row) in rows {
        match row {
            Ok(cells) => {
                for (method, value) in cells {
                    matrix.insert(raw.as_str(), method, value);
                }
            }
            Err(e) => {
                warn!(molecule = %raw, error = %e, "skipping molecule");
                skipped.push((raw, e.to_string()));
            }
        }
    }

    info!(evaluated = matrix.len(), skipped = skipped.len(), "batch complete");
    Ok(BatchOutcome { matrix, skipped })
}

/// Load one molecule and evaluate every method of `roster` on it.
///
/// Unresolvable or unloadable molecules are an error; failures of single
/// cells are recorded as undefined.
pub fn evaluate_molecule(
    raw: &str,
    config: &EstimateConfig,
    roster: &[Method],
) -> EstimateResult<Vec<(Method, Aggregate)>> {
    if identify(raw, config) == IdentifierKind::Error {
        return Err(EstimateError::UnresolvedIdentifier(raw.to_string()));
    }
    let mut molecule = load_molecule(raw, config, config.charge)?;

    if let Some(label) = config.active_space_for(raw) {
        if molecule.supports_active_space() {
            molecule.restrict_active_space(label)?;
        } else {
            warn!(molecule = raw, label, "active space not supported for this molecule; ignored");
        }
    }

    let mut calculator = CostCalculator::new(molecule, config);
    let cells = roster
        .iter()
        .map(|&method| {
            let value = calculator.calculate_cost(method).unwrap_or_else(|e| {
                warn!(molecule = raw, %method, error = %e, "cell failed");
                Aggregate::Undefined
            });
            (method, value)
        })
        .collect();
    Ok(cells)
}
