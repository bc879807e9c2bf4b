//! The closed roster of cost methods and their dispatch.

use std::fmt;
use std::str::FromStr;

use qcost_chem::HamiltonianSummary;
use serde::{Deserialize, Serialize};

use crate::budget::ErrorSplit;
use crate::double_factorization::{DfInputs, double_factorization_method};
use crate::error::{ModelResult, ParseMethodError};
use crate::plane_wave::PlaneWaveBasis;
use crate::{qubitization, taylor, trotter};

/// Method names that are still recognised but never evaluated.
pub const DEPRECATED: &[&str] = &["sublinear_scaling"];

/// A phase-estimation costing method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Randomized product formula sampling terms by weight (qDRIFT).
    Qdrift,
    /// Randomized Hamiltonian Trotterization.
    RandHam,
    /// Truncated Taylor series over stored integrals.
    TaylorNaive,
    /// Truncated Taylor series with integrals computed on the fly.
    TaylorOnTheFly,
    /// Truncated Taylor series on the configuration-interaction matrix.
    ConfigurationInteraction,
    /// Plane-wave Trotter steps with a fermionic FFT.
    LowDepthTrotter,
    /// Plane-wave truncated Taylor series.
    LowDepthTaylor,
    /// Plane-wave Taylor series with coefficients computed on the fly.
    LowDepthTaylorOnTheFly,
    /// Qubitization with linear T complexity in the plane-wave basis.
    LinearT,
    /// Qubitization of a sparse Hamiltonian with a low-rank two-body part.
    SparsityLowRank,
    /// Dyson series in the interaction picture.
    InteractionPicture,
    /// Qubitization of the double-factorized Hamiltonian; needs integrals.
    DoubleFactorization,
}

/// Everything a method needs besides the error split.
#[derive(Debug, Clone, Copy)]
pub struct ModelContext<'a> {
    /// Scalar Hamiltonian parameters.
    pub summary: &'a HamiltonianSummary,
    /// Factorization inputs; `None` for molecules without integrals.
    pub df: Option<&'a DfInputs>,
    /// Allowed failure probability of the estimate.
    pub p_fail: f64,
    /// Plane-wave to Gaussian basis size ratio.
    pub gauss2plane_overhead: f64,
}

impl Method {
    /// Every method, in roster order.
    pub const ALL: [Method; 12] = [
        Method::Qdrift,
        Method::RandHam,
        Method::TaylorNaive,
        Method::TaylorOnTheFly,
        Method::ConfigurationInteraction,
        Method::LowDepthTrotter,
        Method::LowDepthTaylor,
        Method::LowDepthTaylorOnTheFly,
        Method::LinearT,
        Method::SparsityLowRank,
        Method::InteractionPicture,
        Method::DoubleFactorization,
    ];

    /// Key used in configuration files, on the command line and in results.
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Qdrift => "qdrift",
            Method::RandHam => "rand_ham",
            Method::TaylorNaive => "taylor_naive",
            Method::TaylorOnTheFly => "taylor_on_the_fly",
            Method::ConfigurationInteraction => "configuration_interaction",
            Method::LowDepthTrotter => "low_depth_trotter",
            Method::LowDepthTaylor => "low_depth_taylor",
            Method::LowDepthTaylorOnTheFly => "low_depth_taylor_on_the_fly",
            Method::LinearT => "linear_t",
            Method::SparsityLowRank => "sparsity_low_rank",
            Method::InteractionPicture => "interaction_picture",
            Method::DoubleFactorization => "double_factorization",
        }
    }

    /// Position in [`Method::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// One-line description for listings.
    pub fn description(self) -> &'static str {
        match self {
            Method::Qdrift => "qDRIFT randomized product formula",
            Method::RandHam => "randomized second-order Trotter",
            Method::TaylorNaive => "truncated Taylor series",
            Method::TaylorOnTheFly => "Taylor series, on-the-fly integrals",
            Method::ConfigurationInteraction => "Taylor series on the CI matrix",
            Method::LowDepthTrotter => "plane-wave Trotter with fermionic FFT",
            Method::LowDepthTaylor => "plane-wave Taylor series",
            Method::LowDepthTaylorOnTheFly => "plane-wave Taylor series, on-the-fly coefficients",
            Method::LinearT => "linear-T qubitization (plane waves)",
            Method::SparsityLowRank => "sparse qubitization",
            Method::InteractionPicture => "interaction-picture Dyson series",
            Method::DoubleFactorization => "double-factorized qubitization",
        }
    }

    /// Whether the method needs full integral data.
    pub fn requires_integrals(self) -> bool {
        matches!(self, Method::DoubleFactorization)
    }

    /// Whether the method works in the plane-wave dual basis.
    pub fn uses_plane_waves(self) -> bool {
        matches!(
            self,
            Method::LowDepthTrotter
                | Method::LowDepthTaylor
                | Method::LowDepthTaylorOnTheFly
                | Method::LinearT
                | Method::InteractionPicture
        )
    }

    /// Evaluate one cost sample.
    ///
    /// `Ok(None)` means the method has nothing to say about this molecule.
    pub fn evaluate(self, ctx: &ModelContext<'_>, errors: &ErrorSplit) -> ModelResult<Option<f64>> {
        let summary = ctx.summary;
        let plane_waves = || PlaneWaveBasis::from_summary(summary, ctx.gauss2plane_overhead);

        let cost = match self {
            Method::Qdrift => trotter::qdrift(summary, errors, ctx.p_fail)?,
            Method::RandHam => trotter::rand_ham(summary, errors, ctx.p_fail)?,
            Method::TaylorNaive => taylor::taylor_naive(summary, errors)?,
            Method::TaylorOnTheFly => taylor::taylor_on_the_fly(summary, errors)?,
            Method::ConfigurationInteraction => taylor::configuration_interaction(summary, errors)?,
            Method::LowDepthTrotter => trotter::low_depth_trotter(&plane_waves()?, errors)?,
            Method::LowDepthTaylor => taylor::low_depth_taylor(&plane_waves()?, errors)?,
            Method::LowDepthTaylorOnTheFly => {
                taylor::low_depth_taylor_on_the_fly(&plane_waves()?, errors)?
            }
            Method::LinearT => qubitization::linear_t(&plane_waves()?, errors)?,
            Method::SparsityLowRank => qubitization::sparsity_low_rank(summary, errors)?,
            Method::InteractionPicture => taylor::interaction_picture(&plane_waves()?, errors)?,
            Method::DoubleFactorization => {
                return double_factorization_method(ctx.df, errors, ctx.p_fail);
            }
        };
        Ok(Some(cost))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ParseMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        if DEPRECATED.contains(&key.as_str()) {
            return Err(ParseMethodError::Deprecated(key));
        }
        Method::ALL
            .into_iter()
            .find(|m| m.as_str() == key)
            .ok_or_else(|| ParseMethodError::Unknown(s.to_string()))
    }
}
