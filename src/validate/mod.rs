//! Hard-constraint validation of model parameters.
//!
//! Any parameter set (fitted, hand-tuned, or migrated) goes through this
//! gate before it is shipped in a catalog. The checks are independent
//! physical/mathematical invariants evaluated over a deterministic dense time
//! sample; a single violation makes the profile INVALID.
//!
//! The check core takes the multiplier function as an argument so that a
//! defective evaluator variant (the historical unclamped mid segment) can be
//! demonstrated against the same battery.

use serde::Serialize;

use crate::domain::{
    CANONICAL_GRID, ConstraintId, FilmProfile, ModelParams, Severity, ValidationReport, Violation,
};
use crate::model;

/// Fixed probe times merged with the canonical grid (seconds).
const PROBES: [f64; 20] = [
    1.0, 5.0, 10.0, 15.0, 20.0, 30.0, 45.0, 60.0, 90.0, 120.0, 180.0, 240.0, 300.0, 360.0, 480.0,
    600.0, 900.0, 1200.0, 1800.0, 3600.0,
];

/// Validate a parameter set with the production evaluator.
pub fn validate(film_id: &str, params: &ModelParams) -> ValidationReport {
    validate_with(film_id, params, model::multiplier)
}

/// Validate against an arbitrary multiplier implementation.
pub fn validate_with<F>(film_id: &str, params: &ModelParams, multiplier: F) -> ValidationReport
where
    F: Fn(f64, &ModelParams) -> f64,
{
    let samples = sample_times(params);
    let corrected = |t: f64| (t * multiplier(t, params)).max(t);

    let mut violations = Vec::new();
    violations.extend(check_non_regression(&samples, &corrected));
    violations.extend(check_monotonicity(&samples, &corrected));
    violations.extend(check_min_slope(&samples, &corrected));
    violations.extend(check_continuity(params, &corrected));
    violations.extend(check_toe_identity(params, &corrected));
    violations.extend(check_multiplier_bounds(params, &samples, &multiplier));

    ValidationReport::new(film_id, violations)
}

/// Validate every film in a catalog slice (deployment gate input).
pub fn validate_catalog(films: &[FilmProfile]) -> BatchReport {
    let reports = films
        .iter()
        .map(|f| validate(&f.id, &f.params))
        .collect();
    BatchReport { reports }
}

/// Aggregated results across a batch of films.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub reports: Vec<ValidationReport>,
}

/// Violation tally for one constraint across a batch.
#[derive(Debug, Clone, Serialize)]
pub struct ConstraintStat {
    pub constraint: ConstraintId,
    pub violations: usize,
    pub films: Vec<String>,
}

impl BatchReport {
    pub fn valid_count(&self) -> usize {
        self.reports.iter().filter(|r| r.is_valid()).count()
    }

    pub fn invalid_count(&self) -> usize {
        self.reports.len() - self.valid_count()
    }

    /// Per-constraint counts and the affected film ids, in constraint order.
    pub fn constraint_stats(&self) -> Vec<ConstraintStat> {
        ConstraintId::ALL
            .iter()
            .filter_map(|&constraint| {
                let mut violations = 0;
                let mut films = Vec::new();
                for report in &self.reports {
                    let n = report
                        .violations
                        .iter()
                        .filter(|v| v.constraint == constraint)
                        .count();
                    if n > 0 {
                        violations += n;
                        films.push(report.film_id.clone());
                    }
                }
                if violations > 0 {
                    Some(ConstraintStat { constraint, violations, films })
                } else {
                    None
                }
            })
            .collect()
    }
}

/// Build the dense sample: fixed probes + canonical grid + parameter-relative
/// probes, deduplicated ascending and truncated past twice the shoulder start.
fn sample_times(params: &ModelParams) -> Vec<f64> {
    let limit = (2.0 * params.t2).max(3600.0);

    let mut ts: Vec<f64> = PROBES.to_vec();
    ts.extend_from_slice(&CANONICAL_GRID);
    ts.push(params.t1 / 2.0);
    ts.push(params.t1 - 1.0);
    ts.push(params.t1);
    ts.push(params.t2);

    ts.retain(|&t| t > 0.0 && t <= limit);
    ts.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    ts.dedup_by(|a, b| (*a - *b).abs() < 1e-9);
    ts
}

fn violation(
    constraint: ConstraintId,
    description: impl Into<String>,
    context: &[(&str, String)],
) -> Violation {
    Violation {
        constraint,
        description: description.into(),
        severity: Severity::Critical,
        context: context
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect(),
    }
}

fn check_non_regression<C: Fn(f64) -> f64>(samples: &[f64], corrected: &C) -> Vec<Violation> {
    let mut out = Vec::new();
    for &t in samples {
        let c = corrected(t);
        if c < t - 1e-9 {
            out.push(violation(
                ConstraintId::NonRegression,
                "corrected time < base time",
                &[("base", format!("{t}")), ("corrected", format!("{c:.4}"))],
            ));
        }
    }
    out
}

fn check_monotonicity<C: Fn(f64) -> f64>(samples: &[f64], corrected: &C) -> Vec<Violation> {
    let mut out = Vec::new();
    for pair in samples.windows(2) {
        let (c0, c1) = (corrected(pair[0]), corrected(pair[1]));
        if c1 <= c0 {
            out.push(violation(
                ConstraintId::Monotonicity,
                "corrected times not strictly increasing (plateau or reversal)",
                &[
                    ("base", format!("{}", pair[1])),
                    ("corrected", format!("{c1:.4}")),
                    ("previous", format!("{c0:.4}")),
                ],
            ));
        }
    }
    out
}

fn check_min_slope<C: Fn(f64) -> f64>(samples: &[f64], corrected: &C) -> Vec<Violation> {
    let mut out = Vec::new();
    for pair in samples.windows(2) {
        let slope = (corrected(pair[1]) - corrected(pair[0])) / (pair[1] - pair[0]);
        if slope < 1.0 - 1e-9 {
            out.push(violation(
                ConstraintId::MinSlope,
                "local slope of corrected curve < 1.0",
                &[
                    ("interval", format!("{}s -> {}s", pair[0], pair[1])),
                    ("slope", format!("{slope:.4}")),
                ],
            ));
        }
    }
    out
}

/// Value continuity at the segment boundaries.
///
/// T1 starts the power law: a slope break is expected there, so only a large
/// relative value jump (> 50%) counts. T2 starts the damped shoulder
/// (> 30%), except when the value sits on the `maxM` ceiling at T2: that
/// discontinuity is the documented behavior of the hard cap.
fn check_continuity<C: Fn(f64) -> f64>(params: &ModelParams, corrected: &C) -> Vec<Violation> {
    let mut out = Vec::new();
    let step = 0.1;

    if params.t1 > step {
        let before = corrected(params.t1 - step);
        let at = corrected(params.t1);
        let rel_jump = (at - before).abs() / before;
        if rel_jump > 0.50 {
            out.push(violation(
                ConstraintId::Continuity,
                "value jump at T1",
                &[
                    ("T1", format!("{}", params.t1)),
                    ("before", format!("{before:.2}")),
                    ("at", format!("{at:.2}")),
                    ("relative_jump", format!("{:.2}%", rel_jump * 100.0)),
                ],
            ));
        }
    }

    let before = corrected(params.t2 - step);
    let at = corrected(params.t2);
    let after = corrected(params.t2 + step);
    let at_cap = (at - params.t2 * params.max_m).abs() < 2.0;
    let rel_before = (at - before).abs() / before;
    let rel_after = (after - at).abs() / at;
    if !at_cap && (rel_before > 0.30 || rel_after > 0.30) {
        out.push(violation(
            ConstraintId::Continuity,
            "value jump at T2",
            &[
                ("T2", format!("{}", params.t2)),
                ("before", format!("{before:.2}")),
                ("at", format!("{at:.2}")),
                ("after", format!("{after:.2}")),
                ("relative_jump_before", format!("{:.2}%", rel_before * 100.0)),
                ("relative_jump_after", format!("{:.2}%", rel_after * 100.0)),
            ],
        ));
    }

    out
}

fn check_toe_identity<C: Fn(f64) -> f64>(params: &ModelParams, corrected: &C) -> Vec<Violation> {
    let probes = [1.0, 5.0, params.t1 / 2.0, params.t1 - 1.0];
    let mut out = Vec::new();
    for t in probes {
        if t <= 0.0 || t >= params.t1 {
            continue;
        }
        let c = corrected(t);
        if (c - t).abs() > 0.01 {
            out.push(violation(
                ConstraintId::ToeIdentity,
                format!("compensation before T1 ({})", params.t1),
                &[
                    ("base", format!("{t}")),
                    ("corrected", format!("{c:.4}")),
                    ("expected", format!("{t}")),
                ],
            ));
        }
    }
    out
}

fn check_multiplier_bounds<F>(
    params: &ModelParams,
    samples: &[f64],
    multiplier: &F,
) -> Vec<Violation>
where
    F: Fn(f64, &ModelParams) -> f64,
{
    let mut out = Vec::new();
    for &t in samples {
        let m = multiplier(t, params);
        if m < 1.0 - 1e-9 {
            out.push(violation(
                ConstraintId::MultiplierBounds,
                "multiplier < 1.0",
                &[("base", format!("{t}")), ("multiplier", format!("{m:.4}"))],
            ));
        }
        if m > params.max_m + 1e-9 {
            out.push(violation(
                ConstraintId::MultiplierBounds,
                "multiplier exceeds maxMultiplier ceiling",
                &[
                    ("base", format!("{t}")),
                    ("multiplier", format!("{m:.4}")),
                    ("maxMultiplier", format!("{}", params.max_m)),
                ],
            ));
        }
    }
    out
}
