//! JSON input/output for the offline tooling boundary.

pub mod curve;
pub mod export;
