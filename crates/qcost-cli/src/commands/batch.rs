//! Batch command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use qcost_eval::report::{write_csv, write_json};
use qcost_eval::{EstimateConfig, run_batch};

/// Evaluate every configured molecule and write the result table.
pub fn execute(config_path: Option<&Path>) -> Result<()> {
    let config = EstimateConfig::load(config_path).context("Failed to load configuration")?;
    if config.molecules.is_empty() {
        anyhow::bail!(
            "No molecule given and none configured; \
             pass a molecule or set 'molecules' in --config"
        );
    }

    println!(
        "{} Evaluating {} molecules",
        style("→").cyan().bold(),
        config.molecules.len()
    );

    let progress = ProgressBar::new(config.molecules.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .context("Invalid progress template")?,
    );
    let outcome = run_batch(&config, &|molecule: &str| {
        progress.set_message(molecule.to_string());
        progress.inc(1);
    })?;
    progress.finish_and_clear();

    for (molecule, reason) in &outcome.skipped {
        println!("  {} skipped {}: {}", style("!").yellow().bold(), molecule, reason);
    }

    let csv_path = config.results_path();
    write_csv(&outcome.matrix, &csv_path)?;
    println!(
        "{} {} molecules x {} methods",
        style("✓").green().bold(),
        outcome.matrix.len(),
        outcome.matrix.methods().len()
    );
    println!("  Output: {}", style(csv_path.display()).green());

    if config.export_json {
        let json_path = csv_path.with_extension("json");
        write_json(&outcome.matrix, &config, &json_path)?;
        println!("  Output: {}", style(json_path.display()).green());
    }

    Ok(())
}
