//! Resolution of molecule identifiers to loaded molecules.

use std::path::{Path, PathBuf};

use qcost_chem::store::load_integrals;
use qcost_chem::{
    ChemError, Geometry, HamiltonianMolecule, IdentifierKind, IntegralMolecule, Molecule, Origin,
    classify,
};
use tracing::{debug, warn};

use crate::config::EstimateConfig;
use crate::error::{EstimateError, EstimateResult};

/// Nuclear repulsion mismatch (Hartree) above which a geometry store is suspicious.
const NUCLEAR_REPULSION_TOLERANCE: f64 = 1e-4;

/// Classify an identifier against the configured aliases.
pub fn identify(raw: &str, config: &EstimateConfig) -> IdentifierKind {
    classify(raw, |name| config.is_known_name(name))
}

/// Integral store a geometry literal resolves to.
pub fn geometry_store(geometry: &Geometry, config: &EstimateConfig) -> PathBuf {
    config
        .integrals_dir
        .join(format!("geometry-{}.json", geometry.fingerprint()))
}

/// Classify and load `raw`.
///
/// `charge` only affects geometry identifiers.
pub fn load_molecule(raw: &str, config: &EstimateConfig, charge: i32) -> EstimateResult<Molecule> {
    let raw = raw.trim();
    let kind = identify(raw, config);
    debug!(identifier = raw, %kind, "classified molecule identifier");

    match kind {
        IdentifierKind::Store => {
            let path = PathBuf::from(raw);
            let integrals = load_integrals(&path)?;
            Ok(Molecule::WithIntegrals(IntegralMolecule::new(
                raw,
                Origin::Store,
                integrals,
                Some(path),
            )))
        }
        IdentifierKind::Hamiltonian => {
            let molecule = HamiltonianMolecule::load(Path::new(raw))?;
            Ok(Molecule::HamiltonianOnly(molecule))
        }
        IdentifierKind::Name => {
            let path = config
                .alias_path(raw)
                .ok_or_else(|| EstimateError::UnresolvedIdentifier(raw.to_string()))?;
            let integrals = load_integrals(&path)?;
            Ok(Molecule::WithIntegrals(IntegralMolecule::new(
                raw,
                Origin::Name,
                integrals,
                Some(path),
            )))
        }
        IdentifierKind::Geometry => load_geometry(raw, config, charge),
        IdentifierKind::Error => Err(EstimateError::UnresolvedIdentifier(raw.to_string())),
    }
}

fn load_geometry(raw: &str, config: &EstimateConfig, charge: i32) -> EstimateResult<Molecule> {
    let geometry = Geometry::parse(raw)?;
    let path = geometry_store(&geometry, config);
    if !path.is_file() {
        return Err(EstimateError::UnresolvedIdentifier(format!(
            "{raw} (no integral store at {})",
            path.display()
        )));
    }
    let integrals = load_integrals(&path)?;

    let expected = geometry.num_electrons(charge)?;
    if integrals.n_elec != expected {
        return Err(ChemError::Geometry(format!(
            "store {} holds {} electrons, geometry with charge {charge} has {expected}",
            path.display(),
            integrals.n_elec
        ))
        .into());
    }
    let e_nuc = geometry.nuclear_repulsion();
    if (integrals.e_nuc - e_nuc).abs() > NUCLEAR_REPULSION_TOLERANCE {
        warn!(
            store = %path.display(),
            stored = integrals.e_nuc,
            computed = e_nuc,
            "nuclear repulsion differs from geometry"
        );
    }

    Ok(Molecule::WithIntegrals(IntegralMolecule::new(
        geometry.canonical(),
        Origin::Geometry,
        integrals,
        Some(path),
    )))
}
