//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads curves/catalogs
//! - runs fitting + validation
//! - prints reports
//! - writes optional exports

use std::path::Path;

use clap::Parser;

use crate::catalog::Catalog;
use crate::cli::{Command, CorrectArgs, CurveArgs, FitArgs, ValidateArgs};
use crate::domain::{CANONICAL_GRID, FitOptions, ValidationReport};
use crate::error::AppError;
use crate::report;
use crate::validate::BatchReport;

pub mod pipeline;

/// Entry point for the `reci` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Validate(args) => handle_validate(args),
        Command::Correct(args) => handle_correct(args),
        Command::Curve(args) => handle_curve(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let opts = fit_options_from_args(&args);
    let run = pipeline::run_fit(&args.curve, &opts)?;

    println!(
        "{}",
        report::format_fit_summary(&run.target, &run.fit, args.tolerance)
    );
    print!("{}", report::format_validation_report(&run.report));

    // Exports happen before the gates so a rejected fit can still be inspected.
    if let Some(path) = &args.export_params {
        crate::io::curve::write_params_json(path, &run.fit)?;
    }

    if !run.report.is_valid() {
        return Err(AppError::new(
            1,
            "Fitted parameters violate hard constraints; not usable as-is.",
        ));
    }
    if let Some(tol) = args.tolerance {
        if run.fit.absolute_error > tol {
            return Err(AppError::new(
                1,
                format!(
                    "Fit error {:.0}s exceeds tolerance {tol:.0}s.",
                    run.fit.absolute_error
                ),
            ));
        }
    }

    Ok(())
}

fn handle_validate(args: ValidateArgs) -> Result<(), AppError> {
    let batch = collect_reports(&args)?;

    for rep in &batch.reports {
        print!("{}", report::format_validation_report(rep));
    }
    if batch.reports.len() > 1 {
        println!();
        print!("{}", report::format_batch_summary(&batch));
    }

    if let Some(path) = &args.export_report {
        crate::io::export::write_report_json(path, &batch)?;
    }

    let invalid = batch.invalid_count();
    if invalid > 0 {
        return Err(AppError::new(1, format!("{invalid} parameter set(s) INVALID.")));
    }
    Ok(())
}

fn collect_reports(args: &ValidateArgs) -> Result<BatchReport, AppError> {
    if let Some(path) = &args.params {
        let params = crate::io::curve::read_params_json(path)?;
        let id = args.film.clone().unwrap_or_else(|| "params".to_string());
        let report = crate::validate::validate(&id, &params);
        return Ok(BatchReport { reports: vec![report] });
    }

    let catalog = load_catalog(args.catalog.as_deref())?;
    if let Some(film) = &args.film {
        let profile = catalog
            .get(film)
            .ok_or_else(|| AppError::new(2, format!("Unknown film id '{film}'.")))?;
        let report: ValidationReport = crate::validate::validate(&profile.id, &profile.params);
        return Ok(BatchReport { reports: vec![report] });
    }

    Ok(crate::validate::validate_catalog(catalog.films()))
}

fn handle_correct(args: CorrectArgs) -> Result<(), AppError> {
    let catalog = load_catalog(args.catalog.as_deref())?;
    let corrected = catalog.corrected_exposure(&args.film, args.seconds)?;
    println!(
        "{}: {} -> {} ({:.2}x)",
        args.film,
        report::fmt_seconds(args.seconds),
        report::fmt_seconds(corrected),
        corrected / args.seconds,
    );
    Ok(())
}

fn handle_curve(args: CurveArgs) -> Result<(), AppError> {
    let catalog = load_catalog(args.catalog.as_deref())?;
    let points = catalog.curve(&args.film, &CANONICAL_GRID)?;
    print!("{}", report::format_curve_table(&args.film, &points));
    Ok(())
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog, AppError> {
    match path {
        Some(p) => Catalog::from_json(p),
        None => Ok(Catalog::builtin()),
    }
}

pub fn fit_options_from_args(args: &FitArgs) -> FitOptions {
    FitOptions {
        pin_t1: args.pin_t1,
        pin_t2: args.pin_t2,
        pin_max_m: args.pin_max_m,
        p_mode: args.p_mode,
        p_step: args.p_step,
        log_k_max: args.log_k_max,
    }
}
