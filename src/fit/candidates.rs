//! Candidate grid generation for the parameter search.
//!
//! The fitter uses a deterministic grid search:
//!
//! - it avoids the reproducibility problems of randomized search (two runs
//!   must return the same fitted catalog)
//! - with a 13-point time grid the candidate space is small enough to
//!   enumerate exhaustively
//!
//! `(T1, T2)` pairs are drawn from the target's time grid. `T2` is always a
//! grid point (the closed form for `p` reads the target multiplier there and
//! `logK` is identified from the points beyond it); `T1` may be pinned to an
//! off-grid value by the caller.

use crate::error::AppError;

/// A `(T1, T2)` candidate: the `T1` value and the grid index of `T2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairCandidate {
    pub t1: f64,
    pub t2_idx: usize,
}

/// Enumerate ordered `(T1, T2)` pairs over `grid`.
///
/// Constraints:
/// - `T2 > T1`
/// - at least one grid point lies beyond `T2` (needed to derive `logK`)
/// - `pin_t1` fixes `T1`; `pin_t2` restricts `T2` to that grid value
///
/// Enumeration order is ascending `T1`, then ascending `T2`; candidate
/// selection ties resolve to the first pair in this order.
pub fn pairs(
    grid: &[f64],
    pin_t1: Option<f64>,
    pin_t2: Option<f64>,
) -> Result<Vec<PairCandidate>, AppError> {
    if grid.len() < 3 {
        return Err(AppError::new(
            3,
            format!("Need at least 3 grid times to enumerate (T1, T2) pairs (got {}).", grid.len()),
        ));
    }

    let t1_values: Vec<f64> = match pin_t1 {
        Some(v) => {
            if !(v.is_finite() && v > 0.0) {
                return Err(AppError::new(2, format!("Pinned T1 must be finite and > 0 (got {v}).")));
            }
            vec![v]
        }
        // Leave room for T2 and one point beyond it.
        None => grid[..grid.len() - 2].to_vec(),
    };

    let t2_indices: Vec<usize> = match pin_t2 {
        Some(v) => {
            let idx = grid
                .iter()
                .position(|&g| g == v)
                .ok_or_else(|| AppError::new(2, format!("Pinned T2 ({v}) must be a grid time.")))?;
            if idx + 1 >= grid.len() {
                return Err(AppError::new(
                    2,
                    format!("Pinned T2 ({v}) leaves no grid point beyond it to derive logK."),
                ));
            }
            vec![idx]
        }
        None => (1..grid.len() - 1).collect(),
    };

    let mut out = Vec::new();
    for &t1 in &t1_values {
        for &j in &t2_indices {
            if grid[j] > t1 {
                out.push(PairCandidate { t1, t2_idx: j });
            }
        }
    }
    Ok(out)
}

/// Fixed-step grid of `p` values in `(0, 5]` for brute-force mode.
pub fn p_grid(step: f64) -> Result<Vec<f64>, AppError> {
    if !(step.is_finite() && step > 0.0 && step <= 1.0) {
        return Err(AppError::new(2, format!("p step must be in (0, 1] (got {step}).")));
    }
    let n = (5.0 / step).floor() as usize;
    let mut out = Vec::with_capacity(n);
    for i in 1..=n {
        out.push(step * i as f64);
    }
    Ok(out)
}
