//! `qcost-chem`: molecular data for quantum phase estimation cost models.
//!
//! Loads one- and two-electron integrals, validates them, and derives the
//! quantities the cost models need:
//!
//! - **Integral stores** (JSON, or HDF5 with the `hdf5` feature)
//! - **Spectral factorization** of the ERI tensor (double-factorization rank,
//!   eigenvalues and eigenvectors)
//! - **Active spaces** selected by atomic-orbital label with a frozen core
//! - **Molecules** as a sum type: full integrals or Hamiltonian summary only
//! - **Identifier classification** of raw molecule arguments
//!
//! # Quick start
//!
//! ```rust
//! use ndarray::Array4;
//! use qcost_chem::factorization::{factorize, DEFAULT_EIGEN_THRESHOLD};
//!
//! // Rank-one tensor (pq|rs) = a_p a_q a_r a_s.
//! let a = [1.0, 0.5];
//! let eri = Array4::from_shape_fn((2, 2, 2, 2), |(p, q, r, s)| a[p] * a[q] * a[r] * a[s]);
//! let factor = factorize(&eri, DEFAULT_EIGEN_THRESHOLD).unwrap();
//! assert_eq!(factor.rank(), 1);
//! ```

pub mod active_space;
pub mod error;
pub mod factorization;
pub mod fingerprint;
pub mod geometry;
pub mod identifier;
pub mod integrals;
pub mod molecule;
pub mod store;
pub mod summary;

pub use error::{ChemError, ChemResult};
pub use factorization::{FactorSource, SecondLevel, SpectralFactor};
pub use geometry::Geometry;
pub use identifier::{IdentifierKind, classify};
pub use integrals::MolecularIntegrals;
pub use molecule::{HamiltonianMolecule, IntegralMolecule, Molecule, Origin};
pub use summary::HamiltonianSummary;
