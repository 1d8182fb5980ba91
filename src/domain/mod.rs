//! Shared domain types for the reciprocity model core.

pub mod types;

pub use types::*;
