// src/qr.rs

//! One implicit shifted QR step on a symmetric tridiagonal block.
//!
//! The step never forms `Q`: it subtracts the shift only from the first pivot,
//! then chases the resulting bulge from the top of the block to the bottom with
//! plane rotations (implicit Q theorem).

use crate::givens::chase_rotation;
use log::trace;

/// How the shift for a sweep is chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ShiftStrategy {
    /// Eigenvalue of the trailing 2×2 block closer to the bottom-right entry.
    #[default]
    Wilkinson,
    /// Bottom-right entry.
    Rayleigh,
    /// Unshifted QR; converges linearly.
    Zero,
}

/// Result of one sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SweepOutcome {
    /// The trailing off-diagonal entry is negligible and has been set to zero;
    /// the block can shrink by one.
    Deflated,
    /// The trailing entry is still significant.
    Active,
}

/// Whether the coupling `e` between diagonal entries `da` and `db` can be dropped.
///
/// The threshold is `eps`, floored at machine precision relative to the
/// neighbouring diagonal entries.
#[inline]
pub fn is_negligible(e: f64, da: f64, db: f64, eps: f64) -> bool {
    e.abs() <= eps.max(f64::EPSILON * (da.abs() + db.abs()))
}

/// Performs one implicit QR step with shift `mu` on the block `d`, `e`
/// (`e.len() + 1 == d.len()`), in place.
///
/// Blocks of order one are left untouched and blocks of order two are
/// diagonalized in closed form; both report [`SweepOutcome::Deflated`].
pub fn step_qr_tridiag(d: &mut [f64], e: &mut [f64], mu: f64, eps: f64) -> SweepOutcome {
    let m = d.len();
    if m <= 1 {
        return SweepOutcome::Deflated;
    }
    debug_assert_eq!(e.len() + 1, m, "off-diagonal must be one shorter than diagonal");

    if m == 2 {
        let (rt1, rt2) = symmetric_2x2_eigenvalues(d[0], e[0], d[1]);
        d[0] = rt1;
        d[1] = rt2;
        e[0] = 0.0;
        return SweepOutcome::Deflated;
    }

    let mut x = d[0] - mu;
    let mut z = e[0];
    for k in 0..m - 1 {
        let (c, s, r) = chase_rotation(x, z);
        if k > 0 {
            e[k - 1] = r;
        }

        let dk = d[k];
        let dk1 = d[k + 1];
        let ek = e[k];
        d[k] = c * c * dk + 2.0 * c * s * ek + s * s * dk1;
        d[k + 1] = s * s * dk - 2.0 * c * s * ek + c * c * dk1;
        e[k] = c * s * (dk1 - dk) + (c * c - s * s) * ek;

        if k + 2 < m {
            let next = e[k + 1];
            x = e[k];
            z = s * next;
            e[k + 1] = c * next;
        }
    }

    let last = m - 2;
    if is_negligible(e[last], d[last], d[last + 1], eps) {
        e[last] = 0.0;
        SweepOutcome::Deflated
    } else {
        SweepOutcome::Active
    }
}

/// Wilkinson shift for the block `d`, `e`. A block of order one shifts by its
/// only entry; an empty block by zero.
pub fn wilkinson_shift(d: &[f64], e: &[f64]) -> f64 {
    let m = d.len();
    if m < 2 {
        return d.first().copied().unwrap_or(0.0);
    }
    let a = d[m - 2];
    let b = e[m - 2];
    let c = d[m - 1];

    let delta = 0.5 * (a - c);
    let radius = delta.hypot(b);
    let denom = if delta >= 0.0 { delta + radius } else { delta - radius };
    if denom == 0.0 {
        return c;
    }
    c - b * b / denom
}

/// Shift for the next sweep on the block `d`, `e`.
///
/// Falls back to the unshifted step if the estimate is not finite.
pub fn select_shift(strategy: ShiftStrategy, d: &[f64], e: &[f64]) -> f64 {
    if d.len() < 2 {
        return 0.0;
    }
    let mu = match strategy {
        ShiftStrategy::Wilkinson => wilkinson_shift(d, e),
        ShiftStrategy::Rayleigh => d[d.len() - 1],
        ShiftStrategy::Zero => 0.0,
    };
    if mu.is_finite() {
        mu
    } else {
        trace!("Shift estimate {} is not finite; sweeping unshifted", mu);
        0.0
    }
}

/// Eigenvalues `(rt1, rt2)`, `rt1 >= rt2`, of `[[a, b], [b, c]]`.
pub fn symmetric_2x2_eigenvalues(a: f64, b: f64, c: f64) -> (f64, f64) {
    let sm = a + c;
    let df = a - c;
    let rt = df.hypot(2.0 * b);
    let (acmx, acmn) = if a.abs() > c.abs() { (a, c) } else { (c, a) };

    if sm > 0.0 {
        let rt1 = 0.5 * (sm + rt);
        let rt2 = (acmx / rt1) * acmn - (b / rt1) * b;
        (rt1, rt2)
    } else if sm < 0.0 {
        let rt2 = 0.5 * (sm - rt);
        let rt1 = (acmx / rt2) * acmn - (b / rt2) * b;
        (rt1, rt2)
    } else {
        (0.5 * rt, -0.5 * rt)
    }
}
