//! Export validation reports to JSON.
//!
//! The export is meant to be easy to consume in CI pipelines and downstream
//! scripts gating a catalog release.

use std::fs::File;
use std::path::Path;

use serde::Serialize;

use crate::error::AppError;
use crate::validate::BatchReport;

#[derive(Serialize)]
struct ReportFile<'a> {
    tool: &'a str,
    valid: usize,
    invalid: usize,
    reports: &'a [crate::domain::ValidationReport],
}

/// Write a batch validation report to a JSON file.
pub fn write_report_json(path: &Path, batch: &BatchReport) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create report JSON '{}': {e}", path.display()))
    })?;

    let out = ReportFile {
        tool: "reci",
        valid: batch.valid_count(),
        invalid: batch.invalid_count(),
        reports: &batch.reports,
    };

    serde_json::to_writer_pretty(file, &out)
        .map_err(|e| AppError::new(2, format!("Failed to write report JSON: {e}")))?;
    Ok(())
}
