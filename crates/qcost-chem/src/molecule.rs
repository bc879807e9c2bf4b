//! Molecules as seen by the cost models.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;

use crate::active_space;
use crate::error::{ChemError, ChemResult};
use crate::integrals::MolecularIntegrals;
use crate::summary::HamiltonianSummary;

/// Where an integral-backed molecule came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// A canonical molecule name resolved through the alias table.
    Name,
    /// A literal atomic geometry.
    Geometry,
    /// A direct path to an integral store.
    Store,
}

impl Origin {
    /// Active-space restriction is only offered for named or geometry molecules.
    pub fn supports_active_space(self) -> bool {
        matches!(self, Origin::Name | Origin::Geometry)
    }
}

/// A molecule with its full integral data.
#[derive(Debug, Clone)]
pub struct IntegralMolecule {
    label: String,
    origin: Origin,
    integrals: Arc<MolecularIntegrals>,
    store_path: Option<PathBuf>,
}

impl IntegralMolecule {
    /// Wrap loaded integrals.
    pub fn new(
        label: impl Into<String>,
        origin: Origin,
        integrals: MolecularIntegrals,
        store_path: Option<PathBuf>,
    ) -> Self {
        Self {
            label: label.into(),
            origin,
            integrals: Arc::new(integrals),
            store_path,
        }
    }

    /// How this molecule was identified.
    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// The integral data.
    pub fn integrals(&self) -> &MolecularIntegrals {
        &self.integrals
    }

    /// Store the integrals were read from, unless they have since been restricted.
    pub fn store_path(&self) -> Option<&Path> {
        self.store_path.as_deref()
    }

    /// Replace the orbital set by the active space matching `label`.
    pub fn restrict_active_space(&mut self, label: &str) -> ChemResult<()> {
        if !self.origin.supports_active_space() {
            return Err(ChemError::ActiveSpace(format!(
                "molecule '{}' was loaded directly from a store",
                self.label
            )));
        }
        let restricted = active_space::restrict(&self.integrals, label)?;
        self.integrals = Arc::new(restricted);
        // The stored tensor (and any factor cached next to it) no longer matches.
        self.store_path = None;
        Ok(())
    }
}

/// A molecule known only through precomputed Hamiltonian parameters.
#[derive(Debug, Clone)]
pub struct HamiltonianMolecule {
    label: String,
    summary: HamiltonianSummary,
}

#[derive(Deserialize)]
struct HamiltonianFile {
    #[serde(default)]
    name: Option<String>,
    #[serde(flatten)]
    summary: HamiltonianSummary,
}

impl HamiltonianMolecule {
    /// Build from known parameters.
    pub fn new(label: impl Into<String>, summary: HamiltonianSummary) -> Self {
        Self {
            label: label.into(),
            summary,
        }
    }

    /// Read a YAML Hamiltonian file.
    pub fn load(path: &Path) -> ChemResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| ChemError::io(path, e))?;
        let file: HamiltonianFile =
            serde_yaml_ng::from_str(&text).map_err(|e| ChemError::parse(path, e))?;
        let s = &file.summary;
        if s.spatial_orbitals == 0 || s.electrons > 2 * s.spatial_orbitals {
            return Err(ChemError::parse(
                path,
                format!(
                    "{} electrons in {} spatial orbitals",
                    s.electrons, s.spatial_orbitals
                ),
            ));
        }
        let label = file
            .name
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(label, file.summary))
    }
}

/// A molecule, either with full integrals or with a Hamiltonian summary only.
#[derive(Debug, Clone)]
pub enum Molecule {
    /// Full integral data is present.
    WithIntegrals(IntegralMolecule),
    /// Only precomputed Hamiltonian parameters are present.
    HamiltonianOnly(HamiltonianMolecule),
}

impl Molecule {
    /// Display label.
    pub fn label(&self) -> &str {
        match self {
            Molecule::WithIntegrals(m) => &m.label,
            Molecule::HamiltonianOnly(m) => &m.label,
        }
    }

    /// Whether full integral data (active spaces, factorization) is available.
    pub fn has_data(&self) -> bool {
        matches!(self, Molecule::WithIntegrals(_))
    }

    /// Hamiltonian parameters for the non-factorized cost models.
    pub fn summary(&self) -> HamiltonianSummary {
        match self {
            Molecule::WithIntegrals(m) => m.integrals.summary(),
            Molecule::HamiltonianOnly(m) => m.summary.clone(),
        }
    }

    /// Integral-backed view, if any.
    pub fn as_integral(&self) -> Option<&IntegralMolecule> {
        match self {
            Molecule::WithIntegrals(m) => Some(m),
            Molecule::HamiltonianOnly(_) => None,
        }
    }

    /// Whether an active space may be applied to this molecule.
    pub fn supports_active_space(&self) -> bool {
        self.as_integral()
            .is_some_and(|m| m.origin.supports_active_space())
    }

    /// Restrict to an active space; only valid for named or geometry molecules.
    pub fn restrict_active_space(&mut self, label: &str) -> ChemResult<()> {
        match self {
            Molecule::WithIntegrals(m) => m.restrict_active_space(label),
            Molecule::HamiltonianOnly(m) => Err(ChemError::ActiveSpace(format!(
                "molecule '{}' has no integral data",
                m.label
            ))),
        }
    }
}
