// src/reduce.rs

//! Reduction of a symmetric band matrix to tridiagonal form.
//!
//! Column `j` is cleared from the bottom of the band upwards: `A[r][j]` is
//! annihilated by a rotation in the plane `(r - 1, r)`. Each such rotation
//! pushes one nonzero outside the band at `(r + k, r - 1)`; that bulge is chased
//! towards the bottom right corner `k` rows at a time until it leaves the matrix.
//! Every rotation is applied two-sided, so the result is orthogonally similar to
//! the input.

use crate::band::BandMatrix;
use crate::givens::GivensRotation;
use crate::tridiagonal::TridiagonalForm;
use log::debug;

/// Rotation counts for one reduction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReductionStats {
    /// Rotations applied to the matrix.
    pub applied: usize,
    /// Rotations skipped because the target entry was already negligible.
    pub skipped: usize,
}

/// Reduces `a` in place and returns its tridiagonal form.
///
/// `a` is destroyed: afterwards it holds the (numerically) tridiagonal matrix.
pub fn tridiagonalize_band(a: &mut BandMatrix) -> TridiagonalForm {
    tridiagonalize_band_with(a, |_| {}).0
}

/// Same as [`tridiagonalize_band`], calling `observer` with the working matrix
/// after every applied rotation.
pub fn tridiagonalize_band_with<F>(
    a: &mut BandMatrix,
    mut observer: F,
) -> (TridiagonalForm, ReductionStats)
where
    F: FnMut(&BandMatrix),
{
    let n = a.order();
    let k = a.bandwidth();
    let mut stats = ReductionStats::default();

    if k > 1 {
        for j in 0..n.saturating_sub(2) {
            let bottom = (j + k).min(n - 1);
            for r in (j + 2..=bottom).rev() {
                if !annihilate(a, r - 1, r, j, &mut stats, &mut observer) {
                    continue;
                }
                chase_bulge(a, r, k, &mut stats, &mut observer);
            }
        }
    }

    let d: Vec<f64> = (0..n).map(|i| a[(i, i)]).collect();
    let e: Vec<f64> = (0..n.saturating_sub(1)).map(|i| a[(i + 1, i)]).collect();

    debug!(
        "Reduced order {} bandwidth {} matrix: {} rotations applied, {} skipped",
        n, k, stats.applied, stats.skipped
    );

    (TridiagonalForm::from_reduction(d, e), stats)
}

/// Zeroes `A[q][col]` against the pivot `A[p][col]` with a rotation in the
/// plane `(p, q)`. Returns whether a rotation was applied.
fn annihilate<F>(
    a: &mut BandMatrix,
    p: usize,
    q: usize,
    col: usize,
    stats: &mut ReductionStats,
    observer: &mut F,
) -> bool
where
    F: FnMut(&BandMatrix),
{
    match GivensRotation::zeroing(a[(p, col)], a[(q, col)]) {
        Some(rot) => {
            a.rotate_similarity(p, q, rot);
            // Exact zeros keep the band structure clean for later steps.
            a[(q, col)] = 0.0;
            a[(col, q)] = 0.0;
            stats.applied += 1;
            observer(a);
            true
        }
        None => {
            stats.skipped += 1;
            false
        }
    }
}

/// Chases the bulge created by a rotation in the plane `(r - 1, r)` down the band.
fn chase_bulge<F>(
    a: &mut BandMatrix,
    r: usize,
    k: usize,
    stats: &mut ReductionStats,
    observer: &mut F,
) where
    F: FnMut(&BandMatrix),
{
    let n = a.order();
    let mut col = r - 1;
    let mut row = r + k;
    while row < n {
        if !annihilate(a, row - 1, row, col, stats, observer) {
            break;
        }
        col = row - 1;
        row += k;
    }
}
