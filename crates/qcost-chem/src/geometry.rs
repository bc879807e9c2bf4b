//! Literal atomic geometries, e.g. `"O 0 0 0; H 0 0.76 0.59; H 0 -0.76 0.59"`.
//!
//! Coordinates are in Ångström. Atoms are separated by `;` or newlines, and
//! fields within an atom by whitespace or commas.

use crate::error::{ChemError, ChemResult};
use crate::fingerprint::fingerprint;

const BOHR_PER_ANGSTROM: f64 = 1.0 / 0.529_177_210_903;

const ELEMENTS: [&str; 54] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
    "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe",
];

/// An atom at a fixed position.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Canonical element symbol.
    pub symbol: &'static str,
    /// Atomic number (number of protons).
    pub atomic_number: u32,
    /// Position (x, y, z) in Ångström.
    pub position: [f64; 3],
}

/// A molecule given as a list of atoms.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    /// Atoms in input order.
    pub atoms: Vec<Atom>,
}

/// Look up the atomic number of an element symbol (case-insensitive).
pub fn atomic_number(symbol: &str) -> Option<(u32, &'static str)> {
    ELEMENTS
        .iter()
        .position(|e| e.eq_ignore_ascii_case(symbol))
        .map(|i| (i as u32 + 1, ELEMENTS[i]))
}

impl Geometry {
    /// Parse a geometry literal.
    pub fn parse(input: &str) -> ChemResult<Self> {
        let mut atoms = Vec::new();
        for chunk in input.split([';', '\n']) {
            let chunk = chunk.trim();
            if chunk.is_empty() {
                continue;
            }
            let fields: Vec<&str> = chunk
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|f| !f.is_empty())
                .collect();
            if fields.len() != 4 {
                return Err(ChemError::Geometry(format!(
                    "expected 'symbol x y z', got '{chunk}'"
                )));
            }
            let (atomic_number, symbol) = atomic_number(fields[0])
                .ok_or_else(|| ChemError::Geometry(format!("unknown element '{}'", fields[0])))?;
            let mut position = [0.0; 3];
            for (slot, text) in position.iter_mut().zip(&fields[1..]) {
                *slot = text
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| ChemError::Geometry(format!("bad coordinate '{text}'")))?;
            }
            atoms.push(Atom {
                symbol,
                atomic_number,
                position,
            });
        }
        if atoms.is_empty() {
            return Err(ChemError::Geometry("no atoms".into()));
        }
        Ok(Self { atoms })
    }

    /// Number of electrons for the given total charge.
    pub fn num_electrons(&self, charge: i32) -> ChemResult<usize> {
        let protons: i64 = self.atoms.iter().map(|a| i64::from(a.atomic_number)).sum();
        let electrons = protons - i64::from(charge);
        if electrons < 0 {
            return Err(ChemError::Geometry(format!(
                "charge {charge} exceeds nuclear charge {protons}"
            )));
        }
        Ok(electrons as usize)
    }

    /// Nuclear repulsion energy in Hartree.
    pub fn nuclear_repulsion(&self) -> f64 {
        let mut energy = 0.0;
        for (i, a) in self.atoms.iter().enumerate() {
            for b in &self.atoms[i + 1..] {
                let d2: f64 = (0..3)
                    .map(|k| (a.position[k] - b.position[k]).powi(2))
                    .sum();
                let r = d2.sqrt() * BOHR_PER_ANGSTROM;
                energy += f64::from(a.atomic_number) * f64::from(b.atomic_number) / r;
            }
        }
        energy
    }

    /// Canonical text form, stable across formatting differences in the input.
    pub fn canonical(&self) -> String {
        self.atoms
            .iter()
            .map(|a| {
                format!(
                    "{} {:.6} {:.6} {:.6}",
                    a.symbol, a.position[0], a.position[1], a.position[2]
                )
            })
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Content fingerprint of the canonical form; keys precomputed integral stores.
    pub fn fingerprint(&self) -> String {
        fingerprint(self.canonical().bytes())
    }
}
