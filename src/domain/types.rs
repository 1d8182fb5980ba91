//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting/validation
//! - exported to JSON for fitted catalogs and CI reports
//! - reloaded later for comparisons
//!
//! Serde field names follow the legacy catalog JSON (`T1`, `logK`,
//! `maxMultiplier`, `baseSeconds`, ...) so hand-authored curves and
//! previously shipped parameter sets load without conversion.

use std::collections::BTreeMap;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Base exposure times (seconds) used for all fitting and validation scoring.
///
/// Every target series is reconstructed onto this grid before fitting, so
/// curves sampled at arbitrary hand-authored times become comparable.
pub const CANONICAL_GRID: [f64; 13] = [
    1.0, 2.0, 4.0, 8.0, 15.0, 30.0, 60.0, 120.0, 240.0, 480.0, 900.0, 1800.0, 3600.0,
];

/// Film process family. Only used for grouping/reporting; the model itself
/// is parameterized per film.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilmType {
    C41,
    BwModern,
    BwClassic,
    Slide,
}

impl FilmType {
    pub fn display_name(self) -> &'static str {
        match self {
            FilmType::C41 => "C-41",
            FilmType::BwModern => "B&W (modern)",
            FilmType::BwClassic => "B&W (classic)",
            FilmType::Slide => "slide",
        }
    }
}

/// Parameters of the three-segment exposure-multiplier model.
///
/// - `t1`: end of the toe (seconds); no compensation at or below it
/// - `t2`: end of the mid segment (seconds); `t2 > t1`
/// - `p`: power-law exponent of the mid segment
/// - `log_k`: time constant of the logarithmic shoulder
/// - `max_m`: hard ceiling on the multiplier (physical, not cosmetic)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    #[serde(rename = "T1")]
    pub t1: f64,
    #[serde(rename = "T2")]
    pub t2: f64,
    pub p: f64,
    #[serde(rename = "logK")]
    pub log_k: f64,
    #[serde(rename = "maxMultiplier")]
    pub max_m: f64,
}

impl ModelParams {
    /// Construct a checked parameter set.
    ///
    /// Malformed parameters are a configuration error, rejected here rather
    /// than coerced; evaluation assumes a checked set.
    pub fn new(t1: f64, t2: f64, p: f64, log_k: f64, max_m: f64) -> Result<Self, AppError> {
        let params = Self { t1, t2, p, log_k, max_m };
        params.check()?;
        Ok(params)
    }

    /// Re-check the invariants (used after deserializing external JSON).
    pub fn check(&self) -> Result<(), AppError> {
        let all_finite = self.t1.is_finite()
            && self.t2.is_finite()
            && self.p.is_finite()
            && self.log_k.is_finite()
            && self.max_m.is_finite();
        if !all_finite {
            return Err(AppError::new(2, "Model params must all be finite."));
        }
        if self.t1 <= 0.0 {
            return Err(AppError::new(2, format!("T1 must be > 0 (got {}).", self.t1)));
        }
        if self.t2 <= self.t1 {
            return Err(AppError::new(
                2,
                format!("T2 must be > T1 (got T1={}, T2={}).", self.t1, self.t2),
            ));
        }
        if self.p <= 0.0 {
            return Err(AppError::new(2, format!("p must be > 0 (got {}).", self.p)));
        }
        if self.log_k <= 0.0 {
            return Err(AppError::new(2, format!("logK must be > 0 (got {}).", self.log_k)));
        }
        if self.max_m < 1.0 {
            return Err(AppError::new(
                2,
                format!("maxMultiplier must be >= 1 (got {}).", self.max_m),
            ));
        }
        Ok(())
    }
}

/// One point of an exposure curve: base time and the compensated time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurvePoint {
    pub base_seconds: f64,
    pub corrected_seconds: f64,
}

/// A film profile as stored in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilmProfile {
    pub id: String,
    #[serde(rename = "type")]
    pub film_type: FilmType,
    pub params: ModelParams,
}

/// How the mid-segment exponent `p` is derived during fitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PMode {
    /// Closed form from the target multiplier at the `T2` grid point.
    Closed,
    /// Brute-force enumeration over a fixed-step grid of `p` values.
    Grid,
}

/// Caller-supplied constraints and knobs for a fitting run.
#[derive(Debug, Clone)]
pub struct FitOptions {
    /// Fix `T1` instead of drawing it from the canonical grid.
    pub pin_t1: Option<f64>,
    /// Restrict `T2` to this grid value.
    pub pin_t2: Option<f64>,
    /// Fix the multiplier ceiling instead of adopting the target's maximum.
    pub pin_max_m: Option<f64>,
    pub p_mode: PMode,
    /// Step of the `p` grid when `p_mode = grid`.
    pub p_step: f64,
    /// Upper bound on accepted `logK` candidates.
    pub log_k_max: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            pin_t1: None,
            pin_t2: None,
            pin_max_m: None,
            p_mode: PMode::Closed,
            p_step: 0.05,
            log_k_max: 5000.0,
        }
    }
}

/// Output of a single fitting run. Produced once, never mutated.
///
/// `absolute_error` is the sum of |predicted - target| corrected seconds over
/// the canonical grid. A large value means the curve is not representable by
/// the three-segment family; the caller decides whether to accept it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitResult {
    pub params: ModelParams,
    pub absolute_error: f64,
}

/// Identifier of a validation constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConstraintId {
    /// `corrected(t) >= t` for every sampled time.
    NonRegression,
    /// Corrected times strictly increase with base time.
    Monotonicity,
    /// Local slope of the corrected curve is at least 1.0.
    MinSlope,
    /// No value jump at the segment boundaries (`maxM` cap at T2 excepted).
    Continuity,
    /// `corrected(t) == t` below T1.
    ToeIdentity,
    /// `multiplier(t)` stays within `[1, maxM]`.
    MultiplierBounds,
}

impl ConstraintId {
    pub const ALL: [ConstraintId; 6] = [
        ConstraintId::NonRegression,
        ConstraintId::Monotonicity,
        ConstraintId::MinSlope,
        ConstraintId::Continuity,
        ConstraintId::ToeIdentity,
        ConstraintId::MultiplierBounds,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConstraintId::NonRegression => "non-regression",
            ConstraintId::Monotonicity => "monotonicity",
            ConstraintId::MinSlope => "min-slope",
            ConstraintId::Continuity => "continuity",
            ConstraintId::ToeIdentity => "toe-identity",
            ConstraintId::MultiplierBounds => "multiplier-bounds",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    Warning,
}

/// One constraint violation with the offending sample(s) as numeric context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    pub constraint: ConstraintId,
    pub description: String,
    pub severity: Severity,
    /// Values compared, computed slope, etc. Keyed map so reports stay
    /// deterministic when serialized.
    pub context: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValidationStatus {
    Valid,
    Invalid,
}

/// Pass/fail report for a single parameter set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub film_id: String,
    pub violations: Vec<Violation>,
    pub status: ValidationStatus,
}

impl ValidationReport {
    pub fn new(film_id: impl Into<String>, violations: Vec<Violation>) -> Self {
        let status = if violations.is_empty() {
            ValidationStatus::Valid
        } else {
            ValidationStatus::Invalid
        };
        Self {
            film_id: film_id.into(),
            violations,
            status,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.status == ValidationStatus::Valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_check_rejects_bad_ordering() {
        assert!(ModelParams::new(30.0, 300.0, 0.56, 17.0, 4.0).is_ok());
        assert!(ModelParams::new(300.0, 30.0, 0.56, 17.0, 4.0).is_err());
        assert!(ModelParams::new(30.0, 30.0, 0.56, 17.0, 4.0).is_err());
        assert!(ModelParams::new(0.0, 300.0, 0.56, 17.0, 4.0).is_err());
        assert!(ModelParams::new(30.0, 300.0, 0.0, 17.0, 4.0).is_err());
        assert!(ModelParams::new(30.0, 300.0, 0.56, 0.0, 4.0).is_err());
        assert!(ModelParams::new(30.0, 300.0, 0.56, 17.0, 0.9).is_err());
        assert!(ModelParams::new(f64::NAN, 300.0, 0.56, 17.0, 4.0).is_err());
    }

    #[test]
    fn params_serde_uses_legacy_field_names() {
        let json = r#"{"T1":30,"T2":300,"p":0.56,"logK":17,"maxMultiplier":4}"#;
        let params: ModelParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.t1, 30.0);
        assert_eq!(params.log_k, 17.0);
        assert_eq!(params.max_m, 4.0);

        let back = serde_json::to_string(&params).unwrap();
        assert!(back.contains("\"maxMultiplier\""));
        assert!(back.contains("\"logK\""));
    }

    #[test]
    fn curve_point_serde_is_camel_case() {
        let json = r#"{"baseSeconds":60,"correctedSeconds":110}"#;
        let pt: CurvePoint = serde_json::from_str(json).unwrap();
        assert_eq!(pt.base_seconds, 60.0);
        assert_eq!(pt.corrected_seconds, 110.0);
    }

    #[test]
    fn film_type_serde_is_kebab_case() {
        let t: FilmType = serde_json::from_str("\"bw-classic\"").unwrap();
        assert_eq!(t, FilmType::BwClassic);
    }
}
