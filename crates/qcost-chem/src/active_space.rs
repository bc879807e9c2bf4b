//! Active-space restriction by atomic-orbital label.
//!
//! Orbitals whose AO label contains the requested label stay active.
//! Doubly occupied orbitals outside the selection are frozen: their Coulomb
//! and exchange contributions fold into the one-body operator and the
//! constant energy. Virtual orbitals outside the selection are dropped.

use ndarray::{Array2, Axis};
use tracing::info;

use crate::error::{ChemError, ChemResult};
use crate::integrals::MolecularIntegrals;

fn normalize_label(label: &str) -> String {
    label
        .replace('\\', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Indices of orbitals whose label matches `label`.
pub fn select_orbitals(ao_labels: &[String], label: &str) -> Vec<usize> {
    let wanted = normalize_label(label);
    if wanted.is_empty() {
        return Vec::new();
    }
    ao_labels
        .iter()
        .enumerate()
        .filter(|(_, l)| normalize_label(l).contains(&wanted))
        .map(|(i, _)| i)
        .collect()
}

/// Restrict `integrals` to the orbitals matching `label`.
pub fn restrict(integrals: &MolecularIntegrals, label: &str) -> ChemResult<MolecularIntegrals> {
    let labels = integrals.ao_labels.as_ref().ok_or_else(|| {
        ChemError::ActiveSpace("integral store carries no AO labels".into())
    })?;
    let active = select_orbitals(labels, label);
    if active.is_empty() {
        return Err(ChemError::ActiveSpace(format!(
            "no orbital matches label '{}'",
            normalize_label(label)
        )));
    }

    let n_occ = integrals.n_elec / 2;
    let core: Vec<usize> = (0..n_occ).filter(|i| !active.contains(i)).collect();
    let active_electrons = integrals.n_elec - 2 * core.len();
    if active_electrons > 2 * active.len() {
        return Err(ChemError::ActiveSpace(format!(
            "{active_electrons} active electrons do not fit into {} orbitals",
            active.len()
        )));
    }

    let h = &integrals.h0;
    let eri = &integrals.eri;
    let n = integrals.n_orbitals();

    let mut h_eff: Array2<f64> = h.clone();
    for p in 0..n {
        for q in 0..n {
            h_eff[[p, q]] += core
                .iter()
                .map(|&c| 2.0 * eri[[p, q, c, c]] - eri[[p, c, c, q]])
                .sum::<f64>();
        }
    }

    let mut core_energy = 0.0;
    for &c in &core {
        core_energy += 2.0 * h[[c, c]];
        for &d in &core {
            core_energy += 2.0 * eri[[c, c, d, d]] - eri[[c, d, d, c]];
        }
    }

    let h0 = h_eff.select(Axis(0), &active).select(Axis(1), &active);
    let eri = eri
        .select(Axis(0), &active)
        .select(Axis(1), &active)
        .select(Axis(2), &active)
        .select(Axis(3), &active);

    info!(
        label = %normalize_label(label),
        active_orbitals = active.len(),
        frozen_core = core.len(),
        active_electrons,
        "active space applied"
    );

    let active_labels = active.iter().map(|&i| labels[i].clone()).collect();
    MolecularIntegrals::new(h0, eri, integrals.e_nuc + core_energy, active_electrons)?
        .with_ao_labels(active_labels)
}
