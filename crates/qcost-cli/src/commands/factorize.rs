//! Factorize command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use qcost_chem::factorization::factorize;
use qcost_chem::store::{factor_path_for, load_integrals, save_factor};
use qcost_eval::EstimateConfig;

/// Factorize the ERI tensor of `store` and write the factor store.
pub fn execute(
    store: &Path,
    output: Option<&Path>,
    threshold: Option<f64>,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = EstimateConfig::load(config_path).context("Failed to load configuration")?;
    let threshold = threshold.unwrap_or(config.eigen_threshold);

    println!(
        "{} Factorizing {} (threshold {:e})",
        style("→").cyan().bold(),
        style(store.display()).green(),
        threshold
    );

    let integrals = load_integrals(store)?;
    println!(
        "  Loaded: {} orbitals, {} electrons",
        integrals.n_orbitals(),
        integrals.n_elec
    );

    let factor = factorize(&integrals.eri, threshold)?;
    let second = factor.second_level(threshold)?;
    println!("{} Factorization complete", style("✓").green().bold());
    println!(
        "  Rank: {} of {} (second level {})",
        factor.rank(),
        integrals.n_orbitals().pow(2),
        second.rank_2
    );
    println!("  lambda_1 = {:.6e}, lambda_2 = {:.6e}", second.lambda_1, second.lambda_2);

    let output = output.map_or_else(|| factor_path_for(store), Path::to_path_buf);
    save_factor(&factor, &output)?;
    println!("  Output: {}", style(output.display()).green());

    Ok(())
}
