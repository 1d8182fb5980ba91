//! `reci-curves` library crate.
//!
//! The binary (`reci`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - modules are reusable (the host app only needs `catalog` + `model`)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod catalog;
pub mod cli;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod model;
pub mod report;
pub mod validate;
