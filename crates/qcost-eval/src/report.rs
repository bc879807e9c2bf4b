//! Result matrix and its export.
//!
//! Rows are molecule identifiers, columns are methods, cells are medians
//! formatted as `x.xxe±yy` or the literal `nan`.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use qcost_models::Method;
use serde::Serialize;

use crate::aggregate::Aggregate;
use crate::config::EstimateConfig;
use crate::error::{EstimateError, EstimateResult};

/// Schema version of the JSON export.
pub const SCHEMA_VERSION: &str = "1.0";

/// Molecule × method table of aggregated costs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultMatrix {
    methods: Vec<Method>,
    rows: BTreeMap<String, BTreeMap<Method, Aggregate>>,
}

impl ResultMatrix {
    /// Empty matrix with the given columns.
    pub fn new(methods: Vec<Method>) -> Self {
        Self {
            methods,
            rows: BTreeMap::new(),
        }
    }

    /// Record one cell.
    pub fn insert(&mut self, molecule: impl Into<String>, method: Method, value: Aggregate) {
        self.rows.entry(molecule.into()).or_default().insert(method, value);
    }

    /// Cell lookup; absent cells read as undefined.
    pub fn get(&self, molecule: &str, method: Method) -> Aggregate {
        self.rows
            .get(molecule)
            .and_then(|row| row.get(&method))
            .copied()
            .unwrap_or(Aggregate::Undefined)
    }

    /// Column order.
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    /// Molecule identifiers, sorted.
    pub fn molecules(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no molecule was recorded.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render as CSV with a `molecule` header column.
    pub fn to_csv(&self) -> String {
        let mut out = String::from("molecule");
        for method in &self.methods {
            out.push(',');
            out.push_str(method.as_str());
        }
        out.push('\n');

        for molecule in self.rows.keys() {
            out.push_str(&csv_field(molecule));
            for &method in &self.methods {
                out.push(',');
                out.push_str(&self.get(molecule, method).to_string());
            }
            out.push('\n');
        }
        out
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Parameters the matrix was computed with.
#[derive(Debug, Clone, Serialize)]
pub struct RunParameters {
    pub error_budget: f64,
    pub p_fail: f64,
    pub n_samples: usize,
    pub seed: u64,
    pub gauss2plane_overhead: f64,
    pub eigen_threshold: f64,
}

impl From<&EstimateConfig> for RunParameters {
    fn from(config: &EstimateConfig) -> Self {
        Self {
            error_budget: config.error_budget,
            p_fail: config.p_fail,
            n_samples: config.n_samples,
            seed: config.seed,
            gauss2plane_overhead: config.gauss2plane_overhead,
            eigen_threshold: config.eigen_threshold,
        }
    }
}

/// JSON export envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ResultReport<'a> {
    /// Schema version for forward compatibility.
    pub schema_version: &'static str,
    /// Time the report was written.
    pub timestamp: DateTime<Utc>,
    /// Run parameters.
    pub parameters: RunParameters,
    /// The result matrix.
    pub results: &'a ResultMatrix,
}

/// Write the CSV table, creating parent directories.
pub fn write_csv(matrix: &ResultMatrix, path: &Path) -> EstimateResult<()> {
    ensure_parent(path)?;
    std::fs::write(path, matrix.to_csv())
        .map_err(|e| EstimateError::Io(format!("Failed to write {}: {}", path.display(), e)))
}

/// Write the JSON report, creating parent directories.
pub fn write_json(
    matrix: &ResultMatrix,
    config: &EstimateConfig,
    path: &Path,
) -> EstimateResult<()> {
    let report = ResultReport {
        schema_version: SCHEMA_VERSION,
        timestamp: Utc::now(),
        parameters: RunParameters::from(config),
        results: matrix,
    };
    let json = serde_json::to_string_pretty(&report)?;
    ensure_parent(path)?;
    std::fs::write(path, json)
        .map_err(|e| EstimateError::Io(format!("Failed to write {}: {}", path.display(), e)))
}

fn ensure_parent(path: &Path) -> EstimateResult<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir)
            .map_err(|e| EstimateError::Io(format!("Failed to create {}: {}", dir.display(), e))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_layout() {
        let mut matrix = ResultMatrix::new(vec![Method::Qdrift, Method::DoubleFactorization]);
        matrix.insert("h2o", Method::Qdrift, Aggregate::Median(1.234e12));
        matrix.insert("h2o", Method::DoubleFactorization, Aggregate::Undefined);
        matrix.insert("H 0 0 0, H 0 0 0.74", Method::Qdrift, Aggregate::Median(3.0));

        let csv = matrix.to_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "molecule,qdrift,double_factorization");
        assert_eq!(lines[1], "\"H 0 0 0, H 0 0 0.74\",3.00e+00,nan");
        assert_eq!(lines[2], "h2o,1.23e+12,nan");
    }

    #[test]
    fn test_missing_cell_is_undefined() {
        let matrix = ResultMatrix::new(vec![Method::LinearT]);
        assert_eq!(matrix.get("x", Method::LinearT), Aggregate::Undefined);
        assert!(matrix.is_empty());
    }

    #[test]
    fn test_json_report_serializes_undefined_as_null() {
        let mut matrix = ResultMatrix::new(vec![Method::Qdrift]);
        matrix.insert("lih", Method::Qdrift, Aggregate::Undefined);
        let report = ResultReport {
            schema_version: SCHEMA_VERSION,
            timestamp: Utc::now(),
            parameters: RunParameters::from(&EstimateConfig::default()),
            results: &matrix,
        };
        let value = serde_json::to_value(&report).unwrap();
        assert!(value["results"]["rows"]["lih"]["qdrift"].is_null());
        assert_eq!(value["parameters"]["seed"], 42);
    }
}
