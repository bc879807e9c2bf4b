//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - gate-count estimates for quantum phase estimation",
        style("qcost").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qcost-chem     Integral stores, spectral factorization, active spaces");
    println!("  qcost-models   Per-method cost formulas");
    println!("  qcost-eval     Sampling, aggregation and batch evaluation");
    println!("  qcost-cli      Command-line interface");
    println!();
    println!(
        "HDF5 stores: {}",
        if cfg!(feature = "hdf5") {
            style("enabled").green()
        } else {
            style("disabled (build with --features hdf5)").dim()
        }
    );
    println!("License:     {}", style("Apache-2.0").dim());
}
