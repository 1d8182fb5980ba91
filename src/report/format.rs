//! Report formatting: fit summaries, validation details, batch gates.

use crate::domain::{CurvePoint, FitResult, ValidationReport};
use crate::model;
use crate::validate::BatchReport;

/// Format the fit summary: fitted parameters, the per-grid-point comparison
/// table, and the tolerance verdict.
pub fn format_fit_summary(
    target: &[CurvePoint],
    fit: &FitResult,
    tolerance: Option<f64>,
) -> String {
    let mut out = String::new();

    out.push_str("=== reci - segmented reciprocity fit ===\n");
    out.push_str(&format!(
        "Params: T1={} T2={} p={:.3} logK={:.2} maxM={:.2}\n",
        fit.params.t1, fit.params.t2, fit.params.p, fit.params.log_k, fit.params.max_m
    ));
    out.push('\n');

    out.push_str(&format!(
        "{:>8} {:>10} {:>10} {:>8}\n",
        "base", "target", "fitted", "err"
    ));
    for point in target {
        let predicted = model::corrected(point.base_seconds, &fit.params);
        let err = predicted - point.corrected_seconds.round();
        out.push_str(&format!(
            "{:>8} {:>10} {:>10} {:>8}\n",
            fmt_seconds(point.base_seconds),
            fmt_seconds(point.corrected_seconds.round()),
            fmt_seconds(predicted),
            format!("{err:+.0}"),
        ));
    }

    out.push('\n');
    out.push_str(&format!("Absolute error: {:.0}s\n", fit.absolute_error));
    if let Some(tol) = tolerance {
        if fit.absolute_error > tol {
            out.push_str(&format!(
                "NOT REPRESENTABLE: error {:.0}s exceeds tolerance {:.0}s.\n",
                fit.absolute_error, tol
            ));
        } else {
            out.push_str(&format!("Within tolerance ({tol:.0}s).\n"));
        }
    }

    out
}

/// Format a single validation report (violation details when INVALID).
pub fn format_validation_report(report: &ValidationReport) -> String {
    let mut out = String::new();

    if report.is_valid() {
        out.push_str(&format!("{}: VALID\n", report.film_id));
        return out;
    }

    out.push_str(&format!(
        "{}: INVALID ({} violation(s))\n",
        report.film_id,
        report.violations.len()
    ));
    for (idx, v) in report.violations.iter().enumerate() {
        out.push_str(&format!(
            "  [{}] {} ({:?}): {}\n",
            idx + 1,
            v.constraint.as_str(),
            v.severity,
            v.description
        ));
        for (key, value) in &v.context {
            out.push_str(&format!("      {key}: {value}\n"));
        }
    }

    out
}

/// Format the batch summary: pass counts and the per-constraint rollup.
pub fn format_batch_summary(batch: &BatchReport) -> String {
    let mut out = String::new();
    let total = batch.reports.len();

    out.push_str("=== validation summary ===\n");
    out.push_str(&format!("{}/{} profiles VALID\n", batch.valid_count(), total));

    let stats = batch.constraint_stats();
    if !stats.is_empty() {
        out.push('\n');
        out.push_str("Violations by constraint:\n");
        for stat in &stats {
            out.push_str(&format!(
                "  {}: {} violation(s) across {} film(s): {}\n",
                stat.constraint.as_str(),
                stat.violations,
                stat.films.len(),
                stat.films.join(", ")
            ));
        }
    }

    out
}

/// Format a corrected curve for one film.
pub fn format_curve_table(film_id: &str, points: &[CurvePoint]) -> String {
    let mut out = String::new();
    out.push_str(&format!("Curve for {film_id}:\n"));
    out.push_str(&format!("{:>8} {:>10} {:>8}\n", "base", "corrected", "mult"));
    for p in points {
        out.push_str(&format!(
            "{:>8} {:>10} {:>7.2}x\n",
            fmt_seconds(p.base_seconds),
            fmt_seconds(p.corrected_seconds),
            p.corrected_seconds / p.base_seconds,
        ));
    }
    out
}

/// Human-readable seconds: `42s`, `3m10s`, `2h`, `6h19m`.
pub fn fmt_seconds(seconds: f64) -> String {
    if seconds < 60.0 {
        let whole = seconds.fract() == 0.0;
        return if whole {
            format!("{}s", seconds as i64)
        } else {
            format!("{seconds:.1}s")
        };
    }
    if seconds < 3600.0 {
        let m = (seconds / 60.0).floor() as i64;
        let s = (seconds - m as f64 * 60.0).round() as i64;
        return if s > 0 { format!("{m}m{s}s") } else { format!("{m}m") };
    }
    let h = (seconds / 3600.0).floor() as i64;
    let m = ((seconds - h as f64 * 3600.0) / 60.0).round() as i64;
    if m > 0 { format!("{h}h{m}m") } else { format!("{h}h") }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CANONICAL_GRID, ModelParams};
    use crate::validate;

    #[test]
    fn fmt_seconds_covers_ranges() {
        assert_eq!(fmt_seconds(42.0), "42s");
        assert_eq!(fmt_seconds(0.5), "0.5s");
        assert_eq!(fmt_seconds(190.0), "3m10s");
        assert_eq!(fmt_seconds(180.0), "3m");
        assert_eq!(fmt_seconds(7200.0), "2h");
        assert_eq!(fmt_seconds(22740.0), "6h19m");
    }

    #[test]
    fn fit_summary_includes_verdict() {
        let params = ModelParams::new(30.0, 300.0, 0.56, 17.0, 4.0).unwrap();
        let target = model::curve(&params, &CANONICAL_GRID);
        let fit = FitResult { params, absolute_error: 0.0 };

        let ok = format_fit_summary(&target, &fit, Some(60.0));
        assert!(ok.contains("Within tolerance"));

        let bad = FitResult { params, absolute_error: 500.0 };
        let flagged = format_fit_summary(&target, &bad, Some(60.0));
        assert!(flagged.contains("NOT REPRESENTABLE"));
    }

    #[test]
    fn validation_report_formats_both_states() {
        let params = ModelParams::new(60.0, 600.0, 1.15, 25.0, 2.0).unwrap();
        let report = validate::validate("clean", &params);
        assert!(format_validation_report(&report).contains("clean: VALID"));

        let broken = validate::validate_with("broken", &params, |_, _| 0.5);
        let text = format_validation_report(&broken);
        assert!(text.contains("broken: INVALID"));
        assert!(text.contains("multiplier-bounds"));
    }
}
