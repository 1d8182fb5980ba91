//! Shared fitting pipeline: load -> reconstruct -> fit -> validate.
//!
//! Kept separate from `app.rs` so the sequence is testable without going
//! through argument parsing or stdout.

use std::path::Path;

use crate::domain::{CANONICAL_GRID, CurvePoint, FitOptions, FitResult, ValidationReport};
use crate::error::AppError;

/// Everything a fitting run produces.
#[derive(Debug)]
pub struct FitRunOutput {
    /// Target curve reconstructed onto the canonical grid.
    pub target: Vec<CurvePoint>,
    pub fit: FitResult,
    /// Hard-constraint report for the fitted parameters.
    pub report: ValidationReport,
}

/// Run the full fitting pipeline for one curve file.
pub fn run_fit(curve_path: &Path, opts: &FitOptions) -> Result<FitRunOutput, AppError> {
    let raw = crate::io::curve::read_curve_json(curve_path)?;
    let target = crate::fit::reconstruct(&raw, &CANONICAL_GRID)?;
    let fit = crate::fit::fit(&target, opts)?;
    let report = crate::validate::validate("fitted", &fit.params);
    Ok(FitRunOutput { target, fit, report })
}
