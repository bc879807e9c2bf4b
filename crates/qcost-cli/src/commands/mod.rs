//! CLI command implementations.

pub mod batch;
pub mod estimate;
pub mod factorize;
pub mod methods;
pub mod version;
