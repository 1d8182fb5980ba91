//! Segmented reciprocity-failure model evaluation.
//!
//! The exposure multiplier `M(t)` has three segments, continuous in value
//! (not in slope):
//!
//! - toe (`t <= T1`): `M = 1`; below the threshold the film behaves ideally
//! - mid (`T1 < t <= T2`): `M = 1 + ((t - T1) / T1)^p`, clamped to `maxM`
//! - shoulder (`t > T2`): logarithmic damping from the clamped mid value,
//!   `M = min(M_T2 + ln(1 + (t - T2) / logK), maxM)`
//!
//! `maxM` is a physical ceiling: unbounded compensation is not meaningful at
//! extreme exposure times. The mid-segment clamp is mandatory: without it
//! the multiplier overshoots the ceiling before `T2` and the shoulder starts
//! from an unreachable value.
//!
//! Callers are expected to pass a checked `ModelParams` (see
//! `ModelParams::new`); evaluation itself never fails.

use crate::domain::{CurvePoint, ModelParams};

/// Exposure multiplier `M(t)`. Always within `[1, maxM]`.
pub fn multiplier(t: f64, params: &ModelParams) -> f64 {
    let ModelParams { t1, t2, p, log_k, max_m } = *params;

    if t <= t1 {
        return 1.0;
    }
    if t <= t2 {
        let m = 1.0 + ((t - t1) / t1).powf(p);
        return m.min(max_m);
    }

    let m_t2 = (1.0 + ((t2 - t1) / t1).powf(p)).min(max_m);
    (m_t2 + (1.0 + (t - t2) / log_k).ln()).min(max_m)
}

/// Compensated exposure time in exact (unrounded) seconds, floored at `t`.
///
/// The validator probes the curve at fractional times, so this variant keeps
/// full precision.
pub fn corrected_exact(t: f64, params: &ModelParams) -> f64 {
    (t * multiplier(t, params)).max(t)
}

/// Compensated exposure time rounded to whole seconds, as shown to the
/// photographer. `corrected(t) >= t` for any base time: the floor is
/// re-applied after rounding so a sub-second base never rounds down to 0.
pub fn corrected(t: f64, params: &ModelParams) -> f64 {
    corrected_exact(t, params).round().max(t)
}

/// Evaluate the corrected curve over a time grid (for display/export).
pub fn curve(params: &ModelParams, grid: &[f64]) -> Vec<CurvePoint> {
    grid.iter()
        .map(|&t| CurvePoint {
            base_seconds: t,
            corrected_seconds: corrected(t, params),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CANONICAL_GRID;

    fn portra() -> ModelParams {
        ModelParams::new(30.0, 300.0, 0.56, 17.0, 4.0).unwrap()
    }

    #[test]
    fn toe_has_no_compensation() {
        let params = portra();
        for t in [0.5, 1.0, 5.0, 15.0, 29.9, 30.0] {
            assert_eq!(multiplier(t, &params), 1.0);
            assert!((corrected_exact(t, &params) - t).abs() < 1e-12);
        }
    }

    #[test]
    fn mid_segment_is_clamped_to_ceiling() {
        let params = portra();
        // Unclamped mid value at T2 would be 1 + 9^0.56 ≈ 4.42.
        let m = multiplier(300.0, &params);
        assert_eq!(m, 4.0);
        // And before the clamp engages the power law is intact.
        let m60 = multiplier(60.0, &params);
        assert!((m60 - (1.0 + 1.0f64.powf(0.56))).abs() < 1e-12);
    }

    #[test]
    fn long_exposure_hits_ceiling_and_rounds() {
        // 30 minutes on a Portra-class curve: the shoulder saturates at
        // maxM = 4, so the corrected time is exactly 2 hours.
        let params = portra();
        assert_eq!(multiplier(1800.0, &params), 4.0);
        assert_eq!(corrected(1800.0, &params), 7200.0);
    }

    #[test]
    fn subsecond_base_never_drops_below_base() {
        // Rounding must not push a sub-second exposure to 0.
        let params = portra();
        for t in [0.2, 0.4, 0.49] {
            assert!(corrected(t, &params) >= t, "corrected({t}) dropped below base");
        }
    }

    #[test]
    fn multiplier_stays_within_bounds_over_grid() {
        let all = [
            portra(),
            ModelParams::new(60.0, 600.0, 1.15, 25.0, 2.0).unwrap(),
            ModelParams::new(6.0, 60.0, 1.02, 48.0, 10.0).unwrap(),
            ModelParams::new(4.0, 90.0, 0.31, 10.0, 3.0).unwrap(),
        ];
        for params in &all {
            for &t in &CANONICAL_GRID {
                let m = multiplier(t, params);
                assert!(m >= 1.0, "M < 1 at t={t}");
                assert!(m <= params.max_m + 1e-12, "M > maxM at t={t}");
                assert!(corrected(t, params) >= t);
            }
        }
    }

    #[test]
    fn shoulder_continues_from_clamped_mid_value() {
        // A curve whose mid segment does NOT reach the ceiling (mid value at
        // T2 is 1 + 9^0.44 ≈ 3.63 < 5): the shoulder must start from the
        // true mid value at T2 and grow from there.
        let params = ModelParams::new(60.0, 600.0, 0.44, 10.0, 5.0).unwrap();
        let m_t2 = multiplier(600.0, &params);
        let just_after = multiplier(600.1, &params);
        assert!(m_t2 < params.max_m);
        assert!(just_after >= m_t2);
        assert!((just_after - m_t2) < 0.01);
    }

    #[test]
    fn curve_evaluates_full_grid() {
        let pts = curve(&portra(), &CANONICAL_GRID);
        assert_eq!(pts.len(), CANONICAL_GRID.len());
        assert_eq!(pts[0].base_seconds, 1.0);
        assert_eq!(pts[0].corrected_seconds, 1.0);
        // At 1800s and 3600s the multiplier sits on the maxM = 4 ceiling.
        assert_eq!(pts[11].corrected_seconds, 7200.0);
        assert_eq!(pts[12].corrected_seconds, 14400.0);
    }
}
