//! Reconstruction of sparse curves onto a fixed time grid.
//!
//! Legacy curves were hand-authored at irregular, sparse time samples (often
//! only up to 60s). Fitting and scoring need values at the canonical grid, so
//! this module produces a dense, comparable series via linear
//! interpolation/extrapolation:
//!
//! - at or before the first point: the first point's value (flat low end)
//! - between two points: linear interpolation
//! - beyond the last point: linear extrapolation with the last segment's
//!   gradient (single-point input: the gradient from the origin)

use crate::domain::CurvePoint;
use crate::error::AppError;

/// Reconstruct `points` at each time of `grid`.
///
/// Input points may be unsorted; they are copied and sorted by base time.
/// At least one point is required.
pub fn reconstruct(points: &[CurvePoint], grid: &[f64]) -> Result<Vec<CurvePoint>, AppError> {
    if points.is_empty() {
        return Err(AppError::new(3, "Cannot reconstruct an empty curve."));
    }
    for p in points {
        if !(p.base_seconds.is_finite() && p.base_seconds > 0.0 && p.corrected_seconds.is_finite())
        {
            return Err(AppError::new(
                2,
                format!(
                    "Invalid curve point: base={}, corrected={}.",
                    p.base_seconds, p.corrected_seconds
                ),
            ));
        }
    }

    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| {
        a.base_seconds
            .partial_cmp(&b.base_seconds)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let out = grid
        .iter()
        .map(|&t| CurvePoint {
            base_seconds: t,
            corrected_seconds: value_at(&sorted, t),
        })
        .collect();
    Ok(out)
}

fn value_at(sorted: &[CurvePoint], t: f64) -> f64 {
    let first = sorted[0];
    if t <= first.base_seconds {
        return first.corrected_seconds;
    }

    for pair in sorted.windows(2) {
        let (cur, next) = (pair[0], pair[1]);
        if t == cur.base_seconds {
            return cur.corrected_seconds;
        }
        if t < next.base_seconds {
            let ratio = (t - cur.base_seconds) / (next.base_seconds - cur.base_seconds);
            return cur.corrected_seconds
                + ratio * (next.corrected_seconds - cur.corrected_seconds);
        }
    }

    // Beyond the last point: extend with the gradient of the last segment.
    let last = sorted[sorted.len() - 1];
    let gradient = if sorted.len() >= 2 {
        let prev = sorted[sorted.len() - 2];
        (last.corrected_seconds - prev.corrected_seconds)
            / (last.base_seconds - prev.base_seconds)
    } else {
        last.corrected_seconds / last.base_seconds.max(1.0)
    };
    last.corrected_seconds + gradient * (t - last.base_seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CANONICAL_GRID;

    fn pt(base: f64, corrected: f64) -> CurvePoint {
        CurvePoint {
            base_seconds: base,
            corrected_seconds: corrected,
        }
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = reconstruct(&[], &CANONICAL_GRID).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn flat_extrapolation_below_first_point() {
        let curve = [pt(10.0, 14.0), pt(60.0, 110.0)];
        let out = reconstruct(&curve, &[1.0, 2.0, 10.0]).unwrap();
        assert_eq!(out[0].corrected_seconds, 14.0);
        assert_eq!(out[1].corrected_seconds, 14.0);
        assert_eq!(out[2].corrected_seconds, 14.0);
    }

    #[test]
    fn linear_interpolation_between_points() {
        let curve = [pt(10.0, 20.0), pt(30.0, 60.0)];
        let out = reconstruct(&curve, &[20.0]).unwrap();
        assert_eq!(out[0].corrected_seconds, 40.0);
    }

    #[test]
    fn extrapolation_uses_last_segment_gradient() {
        // Last segment: (30, 60) -> (60, 150), gradient 3.
        let curve = [pt(10.0, 20.0), pt(30.0, 60.0), pt(60.0, 150.0)];
        let out = reconstruct(&curve, &[120.0]).unwrap();
        assert_eq!(out[0].corrected_seconds, 150.0 + 3.0 * 60.0);
    }

    #[test]
    fn single_point_extrapolates_from_origin() {
        let curve = [pt(30.0, 90.0)];
        let out = reconstruct(&curve, &[60.0]).unwrap();
        // Gradient 90/30 = 3.
        assert_eq!(out[0].corrected_seconds, 90.0 + 3.0 * 30.0);
    }

    #[test]
    fn unsorted_input_is_sorted_first() {
        let curve = [pt(30.0, 60.0), pt(10.0, 20.0)];
        let out = reconstruct(&curve, &[20.0]).unwrap();
        assert_eq!(out[0].corrected_seconds, 40.0);
    }

    #[test]
    fn idempotent_on_its_own_grid_output() {
        let sparse = [pt(1.0, 1.0), pt(30.0, 45.0), pt(60.0, 110.0), pt(120.0, 260.0)];
        let once = reconstruct(&sparse, &CANONICAL_GRID).unwrap();
        let twice = reconstruct(&once, &CANONICAL_GRID).unwrap();
        for (a, b) in once.iter().zip(twice.iter()) {
            assert_eq!(a.base_seconds, b.base_seconds);
            assert!((a.corrected_seconds - b.corrected_seconds).abs() < 1e-9);
        }
    }
}
