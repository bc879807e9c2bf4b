//! Persisted integral and factorization stores.
//!
//! Integral stores carry four fields (`h0`, `eri`, `e_nuc`, `n_elec`) and
//! factor stores two (`gval`, `gvec`), plus the fingerprint and threshold of
//! the source tensor when known. Both exist as JSON documents and, with the
//! `hdf5` feature, as HDF5 files with one dataset per field.

use std::path::{Path, PathBuf};

use faer::Mat;
use ndarray::{Array2, Array4};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ChemError, ChemResult};
use crate::factorization::{FactorSource, SpectralFactor};
use crate::integrals::MolecularIntegrals;

/// On-disk encoding of a store, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFormat {
    /// `.json`
    Json,
    /// `.h5` / `.hdf5`
    Hdf5,
}

impl StoreFormat {
    /// Extensions recognised as integral stores.
    pub const EXTENSIONS: &'static [&'static str] = &["h5", "hdf5", "json"];

    /// Detect the format from a path's extension.
    pub fn from_path(path: &Path) -> ChemResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "json" => Ok(StoreFormat::Json),
            "h5" | "hdf5" => Ok(StoreFormat::Hdf5),
            other => Err(ChemError::UnsupportedFormat(other.to_string())),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct IntegralRecord {
    h0: Vec<Vec<f64>>,
    /// Row-major N⁴ values.
    eri: Vec<f64>,
    e_nuc: f64,
    n_elec: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ao_labels: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize)]
struct FactorRecord {
    gval: Vec<f64>,
    rows: usize,
    cols: usize,
    /// Row-major `rows x cols` values.
    gvec: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fingerprint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    threshold: Option<f64>,
}

fn attach_source(
    factor: SpectralFactor,
    fingerprint: Option<String>,
    threshold: Option<f64>,
) -> SpectralFactor {
    match (fingerprint, threshold) {
        (Some(fingerprint), Some(threshold)) => factor.with_source(FactorSource {
            fingerprint,
            threshold,
        }),
        _ => factor,
    }
}

/// Load an integral store.
pub fn load_integrals(path: &Path) -> ChemResult<MolecularIntegrals> {
    debug!(path = %path.display(), "loading integral store");
    match StoreFormat::from_path(path)? {
        StoreFormat::Json => load_integrals_json(path),
        StoreFormat::Hdf5 => h5::load_integrals(path),
    }
}

/// Write an integral store in the format implied by `path`.
pub fn save_integrals(integrals: &MolecularIntegrals, path: &Path) -> ChemResult<()> {
    match StoreFormat::from_path(path)? {
        StoreFormat::Json => {
            let record = IntegralRecord {
                h0: integrals.h0.outer_iter().map(|row| row.to_vec()).collect(),
                eri: integrals.eri.iter().copied().collect(),
                e_nuc: integrals.e_nuc,
                n_elec: integrals.n_elec as i64,
                ao_labels: integrals.ao_labels.clone(),
            };
            write_json(path, &record)
        }
        StoreFormat::Hdf5 => h5::save_integrals(integrals, path),
    }
}

/// Load a factor store.
pub fn load_factor(path: &Path) -> ChemResult<SpectralFactor> {
    debug!(path = %path.display(), "loading factor store");
    match StoreFormat::from_path(path)? {
        StoreFormat::Json => {
            let record: FactorRecord = read_json(path)?;
            if record.gvec.len() != record.rows * record.cols {
                return Err(ChemError::Shape(format!(
                    "gvec holds {} values, expected {}x{}",
                    record.gvec.len(),
                    record.rows,
                    record.cols
                )));
            }
            let gvec = Mat::<f64>::from_fn(record.rows, record.cols, |i, j| {
                record.gvec[i * record.cols + j]
            });
            let factor = SpectralFactor::from_parts(record.gval, gvec)?;
            Ok(attach_source(factor, record.fingerprint, record.threshold))
        }
        StoreFormat::Hdf5 => h5::load_factor(path),
    }
}

/// Write a factor store in the format implied by `path`.
pub fn save_factor(factor: &SpectralFactor, path: &Path) -> ChemResult<()> {
    match StoreFormat::from_path(path)? {
        StoreFormat::Json => {
            let gvec = factor.gvec();
            let (rows, cols) = (gvec.nrows(), gvec.ncols());
            let mut flat = Vec::with_capacity(rows * cols);
            for i in 0..rows {
                for j in 0..cols {
                    flat.push(gvec[(i, j)]);
                }
            }
            let source = factor.source();
            let record = FactorRecord {
                gval: factor.gval().to_vec(),
                rows,
                cols,
                gvec: flat,
                fingerprint: source.map(|s| s.fingerprint.clone()),
                threshold: source.map(|s| s.threshold),
            };
            write_json(path, &record)
        }
        StoreFormat::Hdf5 => h5::save_factor(factor, path),
    }
}

/// Companion factor store for an integral store: `eri.h5` -> `eri_cholesky.h5`.
pub fn factor_path_for(store: &Path) -> PathBuf {
    let stem = store.file_stem().and_then(|s| s.to_str()).unwrap_or("integrals");
    let ext = store.extension().and_then(|e| e.to_str()).unwrap_or("json");
    store.with_file_name(format!("{stem}_cholesky.{ext}"))
}

fn load_integrals_json(path: &Path) -> ChemResult<MolecularIntegrals> {
    let record: IntegralRecord = read_json(path)?;
    let n = record.h0.len();
    if record.h0.iter().any(|row| row.len() != n) {
        return Err(ChemError::Shape(format!("h0 in {} is not square", path.display())));
    }
    if record.n_elec < 0 {
        return Err(ChemError::parse(path, format!("negative n_elec {}", record.n_elec)));
    }
    let h0 = Array2::from_shape_vec((n, n), record.h0.into_iter().flatten().collect())?;
    let eri = Array4::from_shape_vec((n, n, n, n), record.eri)?;
    let integrals = MolecularIntegrals::new(h0, eri, record.e_nuc, record.n_elec as usize)?;
    match record.ao_labels {
        Some(labels) => integrals.with_ao_labels(labels),
        None => Ok(integrals),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> ChemResult<T> {
    let text = std::fs::read_to_string(path).map_err(|e| ChemError::io(path, e))?;
    serde_json::from_str(&text).map_err(|e| ChemError::parse(path, e))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> ChemResult<()> {
    let text = serde_json::to_string(value).map_err(|e| ChemError::parse(path, e))?;
    std::fs::write(path, text).map_err(|e| ChemError::io(path, e))
}

#[cfg(feature = "hdf5")]
mod h5 {
    use super::*;

    fn dataset(file: &hdf5::File, path: &Path, name: &str) -> ChemResult<hdf5::Dataset> {
        file.dataset(name)
            .map_err(|e| ChemError::parse(path, format!("dataset '{name}': {e}")))
    }

    pub(super) fn load_integrals(path: &Path) -> ChemResult<MolecularIntegrals> {
        let file = hdf5::File::open(path).map_err(|e| ChemError::io(path, e))?;

        let h0_ds = dataset(&file, path, "h0")?;
        let shape = h0_ds.shape();
        if shape.len() != 2 || shape[0] != shape[1] {
            return Err(ChemError::Shape(format!("h0 has shape {shape:?}")));
        }
        let n = shape[0];
        let h0_raw = h0_ds.read_raw::<f64>().map_err(|e| ChemError::parse(path, e))?;
        let eri_raw = dataset(&file, path, "eri")?
            .read_raw::<f64>()
            .map_err(|e| ChemError::parse(path, e))?;
        let e_nuc = dataset(&file, path, "e_nuc")?
            .read_scalar::<f64>()
            .map_err(|e| ChemError::parse(path, e))?;
        let n_elec = dataset(&file, path, "n_elec")?
            .read_scalar::<i64>()
            .map_err(|e| ChemError::parse(path, e))?;
        if n_elec < 0 {
            return Err(ChemError::parse(path, format!("negative n_elec {n_elec}")));
        }

        let h0 = Array2::from_shape_vec((n, n), h0_raw)?;
        let eri = Array4::from_shape_vec((n, n, n, n), eri_raw)?;
        MolecularIntegrals::new(h0, eri, e_nuc, n_elec as usize)
    }

    pub(super) fn save_integrals(integrals: &MolecularIntegrals, path: &Path) -> ChemResult<()> {
        let file = hdf5::File::create(path).map_err(|e| ChemError::io(path, e))?;
        let n = integrals.n_orbitals();
        let h0: Vec<f64> = integrals.h0.iter().copied().collect();
        let eri: Vec<f64> = integrals.eri.iter().copied().collect();
        let write = |name: &str, shape: Vec<usize>, data: &[f64]| -> ChemResult<()> {
            file.new_dataset::<f64>()
                .shape(shape)
                .create(name)
                .and_then(|ds| ds.write_raw(data))
                .map_err(|e| ChemError::io(path, e))
        };
        write("h0", vec![n, n], &h0)?;
        write("eri", vec![n, n, n, n], &eri)?;
        file.new_dataset::<f64>()
            .shape(())
            .create("e_nuc")
            .and_then(|ds| ds.write_scalar(&integrals.e_nuc))
            .map_err(|e| ChemError::io(path, e))?;
        file.new_dataset::<i64>()
            .shape(())
            .create("n_elec")
            .and_then(|ds| ds.write_scalar(&(integrals.n_elec as i64)))
            .map_err(|e| ChemError::io(path, e))
    }

    pub(super) fn load_factor(path: &Path) -> ChemResult<SpectralFactor> {
        let file = hdf5::File::open(path).map_err(|e| ChemError::io(path, e))?;
        let gval = dataset(&file, path, "gval")?
            .read_raw::<f64>()
            .map_err(|e| ChemError::parse(path, e))?;
        let gvec_ds = dataset(&file, path, "gvec")?;
        let shape = gvec_ds.shape();
        if shape.len() != 2 {
            return Err(ChemError::Shape(format!("gvec has shape {shape:?}")));
        }
        let (rows, cols) = (shape[0], shape[1]);
        let raw = gvec_ds.read_raw::<f64>().map_err(|e| ChemError::parse(path, e))?;
        if raw.len() != rows * cols {
            return Err(ChemError::Shape(format!(
                "gvec holds {} values, expected {rows}x{cols}",
                raw.len()
            )));
        }
        let gvec = Mat::<f64>::from_fn(rows, cols, |i, j| raw[i * cols + j]);
        let factor = SpectralFactor::from_parts(gval, gvec)?;

        let fingerprint = match file.dataset("fingerprint") {
            Ok(ds) => {
                let bytes = ds.read_raw::<u8>().map_err(|e| ChemError::parse(path, e))?;
                Some(String::from_utf8(bytes).map_err(|e| ChemError::parse(path, e))?)
            }
            Err(_) => None,
        };
        let threshold = match file.dataset("threshold") {
            Ok(ds) => Some(ds.read_scalar::<f64>().map_err(|e| ChemError::parse(path, e))?),
            Err(_) => None,
        };
        Ok(attach_source(factor, fingerprint, threshold))
    }

    pub(super) fn save_factor(factor: &SpectralFactor, path: &Path) -> ChemResult<()> {
        let file = hdf5::File::create(path).map_err(|e| ChemError::io(path, e))?;
        let gvec = factor.gvec();
        let (rows, cols) = (gvec.nrows(), gvec.ncols());
        let mut flat = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                flat.push(gvec[(i, j)]);
            }
        }
        file.new_dataset::<f64>()
            .shape(factor.rank())
            .create("gval")
            .and_then(|ds| ds.write_raw(factor.gval()))
            .map_err(|e| ChemError::io(path, e))?;
        file.new_dataset::<f64>()
            .shape(vec![rows, cols])
            .create("gvec")
            .and_then(|ds| ds.write_raw(&flat))
            .map_err(|e| ChemError::io(path, e))?;

        if let Some(source) = factor.source() {
            let bytes = source.fingerprint.as_bytes();
            file.new_dataset::<u8>()
                .shape(bytes.len())
                .create("fingerprint")
                .and_then(|ds| ds.write_raw(bytes))
                .map_err(|e| ChemError::io(path, e))?;
            file.new_dataset::<f64>()
                .shape(())
                .create("threshold")
                .and_then(|ds| ds.write_scalar(&source.threshold))
                .map_err(|e| ChemError::io(path, e))?;
        }
        Ok(())
    }
}

#[cfg(not(feature = "hdf5"))]
mod h5 {
    use super::*;

    fn disabled(path: &Path) -> ChemError {
        ChemError::UnsupportedFormat(format!(
            "{} (built without the `hdf5` feature)",
            path.display()
        ))
    }

    pub(super) fn load_integrals(path: &Path) -> ChemResult<MolecularIntegrals> {
        Err(disabled(path))
    }

    pub(super) fn save_integrals(_: &MolecularIntegrals, path: &Path) -> ChemResult<()> {
        Err(disabled(path))
    }

    pub(super) fn load_factor(path: &Path) -> ChemResult<SpectralFactor> {
        Err(disabled(path))
    }

    pub(super) fn save_factor(_: &SpectralFactor, path: &Path) -> ChemResult<()> {
        Err(disabled(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(StoreFormat::from_path(Path::new("a/b.h5")).unwrap(), StoreFormat::Hdf5);
        assert_eq!(StoreFormat::from_path(Path::new("x.HDF5")).unwrap(), StoreFormat::Hdf5);
        assert_eq!(StoreFormat::from_path(Path::new("x.json")).unwrap(), StoreFormat::Json);
        assert!(StoreFormat::from_path(Path::new("x.txt")).is_err());
    }

    #[test]
    fn test_factor_companion_path() {
        assert_eq!(
            factor_path_for(Path::new("FeMoCo/integrals/eri_reiher.h5")),
            PathBuf::from("FeMoCo/integrals/eri_reiher_cholesky.h5")
        );
    }

    #[test]
    fn test_integral_store_rejects_ragged_h0() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(
            &path,
            r#"{"h0": [[1.0, 0.0], [0.0]], "eri": [], "e_nuc": 0.0, "n_elec": 2}"#,
        )
        .unwrap();
        assert!(matches!(load_integrals(&path), Err(ChemError::Shape(_))));
    }
}
