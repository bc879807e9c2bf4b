//! Single-target estimate command.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use qcost_eval::config::ALL_METHODS;
use qcost_eval::{CostCalculator, EstimateConfig, load_molecule};
use qcost_models::Method;

/// Methods selected by a command-line method argument.
pub fn select_methods(method: &str) -> Result<Vec<Method>> {
    if method.trim().eq_ignore_ascii_case(ALL_METHODS) {
        return Ok(Method::ALL.to_vec());
    }
    let method: Method = method
        .parse()
        .map_err(|e| anyhow::anyhow!("{e}. Run 'qcost methods' for the list"))?;
    Ok(vec![method])
}

/// The `RESULT =>` line of one method, molecule and method upper-cased.
pub fn result_line(molecule: &str, method: Method, cost: &str) -> String {
    format!(
        "RESULT => The cost to calculate the energy of {} with method {} is {cost} T gates",
        molecule.to_uppercase(),
        method.as_str().to_uppercase()
    )
}

/// Execute a single-target estimate.
pub fn execute(
    molecule: &str,
    method: &str,
    ao_label: Option<&str>,
    charge: Option<i32>,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = EstimateConfig::load(config_path).context("Failed to load configuration")?;
    let methods = select_methods(method)?;
    let charge = charge.unwrap_or(config.charge);

    let mut loaded = load_molecule(molecule, &config, charge)?;
    println!(
        "{} Estimating {} ({} method{})",
        style("→").cyan().bold(),
        style(molecule).green(),
        methods.len(),
        if methods.len() == 1 { "" } else { "s" }
    );

    if let Some(label) = ao_label {
        if loaded.supports_active_space() {
            loaded
                .restrict_active_space(label)
                .with_context(|| format!("Failed to select active space '{label}'"))?;
            let summary = loaded.summary();
            println!(
                "  Active space: {} orbitals, {} electrons",
                summary.spatial_orbitals, summary.electrons
            );
        } else {
            println!(
                "  {} active spaces are only available for named and geometry molecules; \
                 ignoring '{}'",
                style("!").yellow().bold(),
                label
            );
        }
    }

    let mut calculator = CostCalculator::new(loaded, &config);
    for method in methods {
        let cost = match calculator.calculate_cost(method) {
            Ok(cost) => cost.to_string(),
            Err(e) => {
                eprintln!("  {} {method}: {e}", style("!").yellow().bold());
                "nan".to_string()
            }
        };
        println!("{}", result_line(molecule, method, &cost));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_all() {
        assert_eq!(select_methods("all").unwrap().len(), Method::ALL.len());
        assert_eq!(select_methods("ALL").unwrap().len(), Method::ALL.len());
    }

    #[test]
    fn test_result_line_is_upper_cased() {
        assert_eq!(
            result_line("water", Method::DoubleFactorization, "1.23e10"),
            "RESULT => The cost to calculate the energy of WATER with method \
             DOUBLE_FACTORIZATION is 1.23e10 T gates"
        );
    }

    #[test]
    fn test_select_single_and_invalid() {
        assert_eq!(select_methods("linear_t").unwrap(), vec![Method::LinearT]);
        assert!(select_methods("sublinear_scaling").is_err());
        assert!(select_methods("magic").is_err());
    }
}
