//! `qcost-models`: gate-count models for quantum phase estimation.
//!
//! One closed-form cost formula per method, evaluated for a single split of
//! the error budget:
//!
//! - **Product formulas**: qDRIFT, randomized and low-depth Trotter
//! - **Series methods**: truncated Taylor (naive, on-the-fly, CI,
//!   plane-wave) and the interaction-picture Dyson series
//! - **Qubitization**: linear-T, sparse, and double factorization
//!
//! # Quick start
//!
//! ```rust
//! use qcost_models::double_factorization::toffoli_gate_cost;
//!
//! let cost = toffoli_gate_cost(39088.0, 65.0, 1e-3, 425.7, 2.0).unwrap();
//! assert!(cost > 1e10 && cost < 1e11);
//! ```

pub mod budget;
pub mod double_factorization;
pub mod error;
pub mod method;
pub mod plane_wave;
pub mod primitives;
pub mod qubitization;
pub mod taylor;
pub mod trotter;

pub use budget::ErrorSplit;
pub use double_factorization::{
    DfInputs, double_factorization_method, estimate_beta, toffoli_gate_cost,
};
pub use error::{ModelError, ModelResult, ParseMethodError};
pub use method::{Method, ModelContext};
pub use plane_wave::PlaneWaveBasis;
