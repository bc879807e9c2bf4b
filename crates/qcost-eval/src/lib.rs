//! `qcost-eval`: turns molecules and methods into aggregated gate counts.
//!
//! - [`config`]: YAML configuration with `QCOST_` environment overrides
//! - [`loader`]: molecule identifier resolution
//! - [`calculator`]: seeded error-budget sampling and median aggregation
//! - [`batch`]: parallel evaluation of the configured molecule list
//! - [`report`]: the result matrix and its CSV/JSON export

pub mod aggregate;
pub mod batch;
pub mod calculator;
pub mod config;
pub mod error;
pub mod loader;
pub mod report;

pub use aggregate::{Aggregate, CostSample, aggregate};
pub use batch::{BatchOutcome, evaluate_molecule, run_batch};
pub use calculator::CostCalculator;
pub use config::{ConfigError, EstimateConfig};
pub use error::{EstimateError, EstimateResult};
pub use loader::load_molecule;
pub use report::ResultMatrix;
