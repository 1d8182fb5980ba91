//! Command-line parsing for the reciprocity curve fitter.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the modeling/math code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::PMode;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "reci", version, about = "Reciprocity-failure curve fitter and validator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit segmented model parameters to a measured or legacy curve.
    Fit(FitArgs),
    /// Validate parameter sets against the hard physical constraints.
    Validate(ValidateArgs),
    /// Compute the corrected exposure for one film and base time.
    Correct(CorrectArgs),
    /// Print a film's corrected curve over the canonical grid.
    Curve(CurveArgs),
}

/// Options for fitting a curve.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Target curve JSON: an array of {baseSeconds, correctedSeconds} points.
    #[arg(long, value_name = "JSON")]
    pub curve: PathBuf,

    /// Fix T1 (seconds) instead of searching the canonical grid.
    #[arg(long = "pin-t1")]
    pub pin_t1: Option<f64>,

    /// Fix T2 (seconds) to this canonical grid value.
    #[arg(long = "pin-t2")]
    pub pin_t2: Option<f64>,

    /// Fix the multiplier ceiling instead of adopting the target's maximum.
    #[arg(long = "pin-max-m")]
    pub pin_max_m: Option<f64>,

    /// How the mid-segment exponent p is derived.
    #[arg(long, value_enum, default_value_t = PMode::Closed)]
    pub p_mode: PMode,

    /// Step of the p grid when --p-mode grid.
    #[arg(long, default_value_t = 0.05)]
    pub p_step: f64,

    /// Upper bound on accepted logK candidates.
    #[arg(long, default_value_t = 5000.0)]
    pub log_k_max: f64,

    /// Fail (exit 1) when the absolute fit error exceeds this many seconds.
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Export fitted params (+ canonical grid) to JSON.
    #[arg(long = "export-params")]
    pub export_params: Option<PathBuf>,
}

/// Options for validating parameter sets.
#[derive(Debug, Parser)]
pub struct ValidateArgs {
    /// Validate a single film id instead of the whole catalog.
    #[arg(long)]
    pub film: Option<String>,

    /// Validate a params JSON file (bare params or a `reci fit` export).
    #[arg(long, value_name = "JSON")]
    pub params: Option<PathBuf>,

    /// External catalog JSON (defaults to the built-in catalog).
    #[arg(long, value_name = "JSON")]
    pub catalog: Option<PathBuf>,

    /// Export the full validation report to JSON.
    #[arg(long = "export-report")]
    pub export_report: Option<PathBuf>,
}

/// Options for a single corrected-exposure query.
#[derive(Debug, Parser)]
pub struct CorrectArgs {
    /// Film id (see `reci curve --film ...` for the catalog).
    #[arg(long)]
    pub film: String,

    /// Metered base exposure in seconds.
    #[arg(long)]
    pub seconds: f64,

    /// External catalog JSON (defaults to the built-in catalog).
    #[arg(long, value_name = "JSON")]
    pub catalog: Option<PathBuf>,
}

/// Options for printing a film's curve.
#[derive(Debug, Parser)]
pub struct CurveArgs {
    /// Film id.
    #[arg(long)]
    pub film: String,

    /// External catalog JSON (defaults to the built-in catalog).
    #[arg(long, value_name = "JSON")]
    pub catalog: Option<PathBuf>,
}
