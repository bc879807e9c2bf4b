//! Estimator configuration.
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables (`QCOST_` prefix)
//! 2. Configuration file (YAML)
//! 3. Default values

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use qcost_models::Method;
use serde::{Deserialize, Serialize};

/// Method list entry selecting the whole roster.
pub const ALL_METHODS: &str = "all";

/// Complete estimator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateConfig {
    /// Molecule identifiers evaluated in batch mode.
    #[serde(default)]
    pub molecules: Vec<String>,

    /// Method keys evaluated in batch mode; `all` selects the roster.
    #[serde(default = "default_methods")]
    pub methods: Vec<String>,

    /// Canonical molecule names and the integral stores they refer to.
    /// Relative paths are taken relative to `integrals_dir`.
    #[serde(default)]
    pub aliases: BTreeMap<String, PathBuf>,

    /// Active-space label per molecule identifier (batch mode).
    #[serde(default)]
    pub active_spaces: BTreeMap<String, String>,

    /// Directory holding integral stores.
    #[serde(default = "default_integrals_dir")]
    pub integrals_dir: PathBuf,

    /// Directory the result table is written to.
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,

    /// Total target precision in Hartree.
    #[serde(default = "default_error_budget")]
    pub error_budget: f64,

    /// Allowed failure probability.
    #[serde(default = "default_p_fail")]
    pub p_fail: f64,

    /// Error splits drawn per method.
    #[serde(default = "default_n_samples")]
    pub n_samples: usize,

    /// Base RNG seed.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Plane-wave to Gaussian basis size ratio.
    #[serde(default = "default_overhead")]
    pub gauss2plane_overhead: f64,

    /// Eigenvalue cut-off of the spectral factorization.
    #[serde(default = "default_eigen_threshold")]
    pub eigen_threshold: f64,

    /// Reuse and write factor stores next to integral stores.
    #[serde(default)]
    pub factor_cache: bool,

    /// Molecular charge used for geometry identifiers.
    #[serde(default)]
    pub charge: i32,

    /// Also write the result table as JSON.
    #[serde(default)]
    pub export_json: bool,
}

fn default_methods() -> Vec<String> {
    vec![ALL_METHODS.to_string()]
}

fn default_integrals_dir() -> PathBuf {
    PathBuf::from("integrals")
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("results")
}

fn default_error_budget() -> f64 {
    1.6e-3 // chemical accuracy
}

fn default_p_fail() -> f64 {
    0.1
}

fn default_n_samples() -> usize {
    20
}

fn default_seed() -> u64 {
    42
}

fn default_overhead() -> f64 {
    1.0
}

fn default_eigen_threshold() -> f64 {
    qcost_chem::factorization::DEFAULT_EIGEN_THRESHOLD
}

impl Default for EstimateConfig {
    fn default() -> Self {
        EstimateConfig {
            molecules: Vec::new(),
            methods: default_methods(),
            aliases: BTreeMap::new(),
            active_spaces: BTreeMap::new(),
            integrals_dir: default_integrals_dir(),
            results_dir: default_results_dir(),
            error_budget: default_error_budget(),
            p_fail: default_p_fail(),
            n_samples: default_n_samples(),
            seed: default_seed(),
            gauss2plane_overhead: default_overhead(),
            eigen_threshold: default_eigen_threshold(),
            factor_cache: false,
            charge: 0,
            export_json: false,
        }
    }
}

impl EstimateConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {e}", path.display())))?;

        let config: EstimateConfig = serde_yaml_ng::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))?;

        config.validate()?;
        Ok(config)
    }

    /// Load the file if given (defaults otherwise), then apply environment overrides.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => EstimateConfig::default(),
        };

        let config = config.merge_env();
        config.validate()?;
        Ok(config)
    }

    /// Apply `QCOST_SAMPLES`, `QCOST_SEED` and `QCOST_RESULTS_DIR` when set.
    fn merge_env(mut self) -> Self {
        if let Ok(v) = std::env::var("QCOST_SAMPLES") {
            if let Ok(val) = v.parse() {
                self.n_samples = val;
            }
        }
        if let Ok(v) = std::env::var("QCOST_SEED") {
            if let Ok(val) = v.parse() {
                self.seed = val;
            }
        }
        if let Ok(v) = std::env::var("QCOST_RESULTS_DIR") {
            self.results_dir = PathBuf::from(v);
        }
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.roster()?;

        if !(self.error_budget.is_finite() && self.error_budget > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "error_budget must be positive, got {}",
                self.error_budget
            )));
        }
        if !(self.p_fail > 0.0 && self.p_fail < 1.0) {
            return Err(ConfigError::ValidationError(format!(
                "p_fail must lie in (0, 1), got {}",
                self.p_fail
            )));
        }
        if self.n_samples == 0 {
            return Err(ConfigError::ValidationError(
                "n_samples must be greater than 0".to_string(),
            ));
        }
        if !(self.gauss2plane_overhead.is_finite() && self.gauss2plane_overhead > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "gauss2plane_overhead must be positive, got {}",
                self.gauss2plane_overhead
            )));
        }
        if !(self.eigen_threshold.is_finite() && self.eigen_threshold >= 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "eigen_threshold must be non-negative, got {}",
                self.eigen_threshold
            )));
        }
        Ok(())
    }

    /// Methods selected by `methods`, in roster order without duplicates.
    pub fn roster(&self) -> Result<Vec<Method>, ConfigError> {
        let mut selected = Vec::new();
        for key in &self.methods {
            if key.trim().eq_ignore_ascii_case(ALL_METHODS) {
                return Ok(Method::ALL.to_vec());
            }
            let method: Method = key
                .parse()
                .map_err(|e| ConfigError::ValidationError(format!("methods: {e}")))?;
            if !selected.contains(&method) {
                selected.push(method);
            }
        }
        selected.sort();
        Ok(selected)
    }

    /// Whether `name` is a configured alias (case-insensitive).
    pub fn is_known_name(&self, name: &str) -> bool {
        self.alias_path(name).is_some()
    }

    /// Integral store a canonical name refers to.
    pub fn alias_path(&self, name: &str) -> Option<PathBuf> {
        let name = name.trim();
        self.aliases
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(name))
            .map(|(_, path)| self.resolve(path))
    }

    /// Active-space label requested for a molecule identifier.
    pub fn active_space_for(&self, molecule: &str) -> Option<&str> {
        self.active_spaces.get(molecule).map(String::as_str)
    }

    /// Result table path: `<results_dir>/results_<gauss2plane_overhead>.csv`.
    pub fn results_path(&self) -> PathBuf {
        self.results_dir
            .join(format!("results_{:?}.csv", self.gauss2plane_overhead))
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.integrals_dir.join(path)
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EstimateConfig::default();
        assert_eq!(config.methods, vec!["all"]);
        assert_eq!(config.n_samples, 20);
        assert_eq!(config.eigen_threshold, 1e-10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_roster_all_and_subset() {
        let mut config = EstimateConfig::default();
        assert_eq!(config.roster().unwrap().len(), Method::ALL.len());

        config.methods = vec!["double_factorization".into(), "qdrift".into(), "qdrift".into()];
        assert_eq!(
            config.roster().unwrap(),
            vec![Method::Qdrift, Method::DoubleFactorization]
        );
    }

    #[test]
    fn test_validate_rejects_deprecated_method() {
        let config = EstimateConfig {
            methods: vec!["sublinear_scaling".into()],
            ..EstimateConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_invalid_values() {
        let mut config = EstimateConfig::default();
        config.p_fail = 1.0;
        assert!(config.validate().is_err());

        let mut config = EstimateConfig::default();
        config.n_samples = 0;
        assert!(config.validate().is_err());

        let mut config = EstimateConfig::default();
        config.error_budget = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_alias_lookup_is_case_insensitive() {
        let mut config = EstimateConfig::default();
        config.aliases.insert("H2O".into(), PathBuf::from("water.json"));
        config.aliases.insert("abs".into(), PathBuf::from("/data/abs.h5"));

        assert!(config.is_known_name("h2o"));
        assert_eq!(config.alias_path("h2o").unwrap(), PathBuf::from("integrals/water.json"));
        assert_eq!(config.alias_path("ABS").unwrap(), PathBuf::from("/data/abs.h5"));
        assert!(!config.is_known_name("benzene"));
    }

    #[test]
    fn test_results_path() {
        let config = EstimateConfig {
            gauss2plane_overhead: 2.5,
            ..EstimateConfig::default()
        };
        assert_eq!(config.results_path(), PathBuf::from("results/results_2.5.csv"));
    }

    #[test]
    fn test_results_path_keeps_decimal_point() {
        let config = EstimateConfig {
            gauss2plane_overhead: 1.0,
            ..EstimateConfig::default()
        };
        assert_eq!(config.results_path(), PathBuf::from("results/results_1.0.csv"));
    }

    #[test]
    fn test_parse_yaml_with_defaults() {
        let yaml = "molecules: [h2o, ./h2.json]\nn_samples: 5\naliases:\n  h2o: water.json\n";
        let config: EstimateConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.molecules.len(), 2);
        assert_eq!(config.n_samples, 5);
        assert_eq!(config.seed, 42);
        assert!(config.validate().is_ok());
    }
}
