//! qcost Command-Line Interface
//!
//! Estimates the T/Toffoli gate count of quantum phase estimation for
//! molecular Hamiltonians.
//!
//! ```text
//! qcost h2o double_factorization          one molecule, one method
//! qcost ./lih.json all                    one molecule, every method
//! qcost h2o all "Fe 3d" --charge -1       with an active space
//! qcost --config config/config.yaml       batch mode over the configured list
//! qcost factorize ./lih.json              write the companion factor store
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{batch, estimate, factorize, methods, version};

/// qcost - gate-count estimates for quantum phase estimation in chemistry
#[derive(Parser)]
#[command(name = "qcost")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    estimate: EstimateArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct EstimateArgs {
    /// Molecule: known name, geometry literal, integral store or Hamiltonian file.
    /// Without it, every configured molecule is evaluated.
    molecule: Option<String>,

    /// Method key, or "all"
    #[arg(default_value = "all")]
    method: String,

    /// Atomic-orbital label selecting an active space
    ao_label: Option<String>,

    /// Molecular charge (geometry identifiers)
    #[arg(long, allow_negative_numbers = true)]
    charge: Option<i32>,
}

#[derive(Subcommand)]
enum Commands {
    /// Factorize an integral store and write its companion factor store
    Factorize {
        /// Integral store (.json, .h5)
        store: PathBuf,

        /// Output factor store (default: <store>_cholesky.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Eigenvalue cut-off (default: from configuration)
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// List the available methods
    Methods,

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();
    let result = match cli.command {
        Some(Commands::Factorize {
            store,
            output,
            threshold,
        }) => factorize::execute(&store, output.as_deref(), threshold, config),

        Some(Commands::Methods) => {
            methods::execute();
            Ok(())
        }

        Some(Commands::Version) => {
            version::execute();
            Ok(())
        }

        None => match cli.estimate.molecule {
            Some(molecule) => estimate::execute(
                &molecule,
                &cli.estimate.method,
                cli.estimate.ao_label.as_deref(),
                cli.estimate.charge,
                config,
            ),
            None => batch::execute(config),
        },
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
