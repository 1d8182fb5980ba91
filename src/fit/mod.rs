//! Curve fitting orchestration.
//!
//! Responsibilities:
//!
//! - reconstruct sparse legacy curves onto the canonical grid
//! - generate deterministic `(T1, T2)` and `p` candidate grids
//! - evaluate each candidate (parallel) and select the best by absolute error

pub mod candidates;
pub mod fitter;
pub mod reconstruct;

pub use candidates::*;
pub use fitter::*;
pub use reconstruct::*;
