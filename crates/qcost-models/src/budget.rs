//! Error budgets: how the total target precision is split across the
//! phase estimation, Hamiltonian simulation and gate synthesis stages.

use rand::Rng;
use rand::distributions::Open01;

use crate::error::{ModelResult, positive};

/// One split of the total error budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorSplit {
    /// Phase-estimation precision ε_PEA.
    pub pea: f64,
    /// Hamiltonian-simulation error ε_HS.
    pub hs: f64,
    /// Rotation-synthesis error ε_S.
    pub synthesis: f64,
}

impl ErrorSplit {
    /// Build a split from explicit parts.
    pub fn new(pea: f64, hs: f64, synthesis: f64) -> Self {
        Self { pea, hs, synthesis }
    }

    /// Split `total` evenly in three.
    pub fn even(total: f64) -> Self {
        let third = total / 3.0;
        Self::new(third, third, third)
    }

    /// `[ε_PEA, ε_HS, ε_S]`.
    pub fn as_array(&self) -> [f64; 3] {
        [self.pea, self.hs, self.synthesis]
    }

    /// Draw a split of `total` uniformly from the simplex, i.e. the
    /// fractions follow a flat Dirichlet(1, 1, 1) distribution.
    ///
    /// Every part is strictly positive and the parts sum to `total`.
    pub fn sample<R: Rng>(total: f64, rng: &mut R) -> ModelResult<Self> {
        let total = positive("error budget", "total", total)?;
        // Unit exponentials; Open01 keeps every weight finite and non-zero.
        let mut exponential = || -rng.sample::<f64, _>(Open01).ln();
        let w = [exponential(), exponential(), exponential()];
        let sum: f64 = w.iter().sum();
        Ok(Self::new(
            total * w[0] / sum,
            total * w[1] / sum,
            total * w[2] / sum,
        ))
    }
}
