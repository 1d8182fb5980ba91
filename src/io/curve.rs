//! Read/write curve and parameter JSON files.
//!
//! Two file shapes cross this boundary:
//!
//! - a target/legacy curve: a JSON array of `{baseSeconds, correctedSeconds}`
//!   points (the shape of the hand-authored legacy data)
//! - a fitted params file: model parameters + fit error + a precomputed
//!   corrected grid, the "portable" representation of a fitting run

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{CANONICAL_GRID, CurvePoint, FitResult, ModelParams};
use crate::error::AppError;
use crate::model;

/// A saved fitting run (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamsFile {
    pub tool: String,
    pub params: ModelParams,
    pub absolute_error: f64,
    /// Corrected curve over the canonical grid, for quick inspection.
    pub grid: Vec<CurvePoint>,
}

/// Read a sparse or dense curve JSON file.
pub fn read_curve_json(path: &Path) -> Result<Vec<CurvePoint>, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(2, format!("Failed to open curve JSON '{}': {e}", path.display()))
    })?;
    let points: Vec<CurvePoint> = serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid curve JSON: {e}")))?;
    Ok(points)
}

/// Read model parameters, accepting either a bare `ModelParams` object or a
/// params file written by `write_params_json`.
pub fn read_params_json(path: &Path) -> Result<ModelParams, AppError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        AppError::new(2, format!("Failed to open params JSON '{}': {e}", path.display()))
    })?;

    let params = match serde_json::from_str::<ModelParams>(&text) {
        Ok(p) => p,
        Err(_) => {
            serde_json::from_str::<ParamsFile>(&text)
                .map_err(|e| AppError::new(2, format!("Invalid params JSON: {e}")))?
                .params
        }
    };
    params.check()?;
    Ok(params)
}

/// Write a fitted params file.
pub fn write_params_json(path: &Path, fit: &FitResult) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create params JSON '{}': {e}", path.display()))
    })?;

    let out = ParamsFile {
        tool: "reci".to_string(),
        params: fit.params,
        absolute_error: fit.absolute_error,
        grid: model::curve(&fit.params, &CANONICAL_GRID),
    };

    serde_json::to_writer_pretty(file, &out)
        .map_err(|e| AppError::new(2, format!("Failed to write params JSON: {e}")))?;
    Ok(())
}
