// src/solver.rs

//! Convergence driver: repeated QR sweeps with splitting and deflation, and the
//! band-matrix entry point that chains reduction and iteration.

use crate::band::BandMatrix;
use crate::error::{EigenError, Result};
use crate::qr::{is_negligible, select_shift, step_qr_tridiag, ShiftStrategy, SweepOutcome};
use crate::reduce::{tridiagonalize_band_with, ReductionStats};
use crate::tridiagonal::{ActiveRange, TridiagonalForm};
use log::{debug, trace, warn};
use nalgebra::SymmetricEigen;

pub const DEFAULT_EPS: f64 = 1e-12;
pub const DEFAULT_MAX_ITER: usize = 1000;

/// Tunables for [`solve_tridiagonal`] and [`qr_eigs_band_with`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolverConfig {
    /// Absolute threshold below which an off-diagonal entry counts as zero.
    pub eps: f64,
    /// Maximum number of QR sweeps over all blocks.
    pub max_iter: usize,
    pub shift: ShiftStrategy,
    /// Rescale the matrix to unit max-abs norm before reducing it, so `eps`
    /// and the rotation skip threshold act relative to the matrix norm.
    pub scale: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            eps: DEFAULT_EPS,
            max_iter: DEFAULT_MAX_ITER,
            shift: ShiftStrategy::Wilkinson,
            scale: true,
        }
    }
}

impl SolverConfig {
    pub fn new(eps: f64, max_iter: usize) -> Self {
        SolverConfig {
            eps,
            max_iter,
            ..SolverConfig::default()
        }
    }

    pub fn with_shift(mut self, shift: ShiftStrategy) -> Self {
        self.shift = shift;
        self
    }

    pub fn with_scaling(mut self, scale: bool) -> Self {
        self.scale = scale;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.eps.is_finite() && self.eps > 0.0) {
            return Err(EigenError::InvalidInput(format!(
                "convergence threshold must be positive and finite, got {}",
                self.eps
            )));
        }
        Ok(())
    }
}

/// Counters for one run of the driver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SolveStats {
    /// QR sweeps performed.
    pub iterations: usize,
    /// Sweeps that removed the trailing index of their block.
    pub deflations: usize,
    /// Blocks split at a negligible off-diagonal entry.
    pub splits: usize,
}

/// Output of [`qr_eigs_band`].
#[derive(Clone, Debug, PartialEq)]
pub struct EigenResults {
    /// Eigenvalues in ascending order.
    pub eigenvalues: Vec<f64>,
    pub reduction: ReductionStats,
    pub stats: SolveStats,
    /// Whether the matrix was rescaled before reduction.
    pub scaled: bool,
}

/// Drives `form` to diagonal form in place.
///
/// On success every off-diagonal entry is exactly zero and the diagonal holds
/// the eigenvalues (unordered). On [`EigenError::NoConvergence`] the form keeps
/// the partially converged state.
pub fn solve_tridiagonal(form: &mut TridiagonalForm, config: &SolverConfig) -> Result<SolveStats> {
    config.validate()?;
    let n = form.order();
    let (d, e) = form.parts_mut();
    let mut stats = SolveStats::default();
    let mut worklist = vec![ActiveRange::new(0, n)];

    while let Some(range) = worklist.pop() {
        if range.is_converged() {
            continue;
        }

        if let Some(i) = find_split(d, e, range, config.eps) {
            e[i] = 0.0;
            let (upper, lower) = range.split_at(i);
            worklist.push(upper);
            worklist.push(lower);
            stats.splits += 1;
            continue;
        }

        if stats.iterations >= config.max_iter {
            let unconverged = 1 + worklist.iter().filter(|r| !r.is_converged()).count();
            warn!(
                "QR iteration stopped after {} sweeps with {} unconverged block(s)",
                stats.iterations, unconverged
            );
            return Err(EigenError::NoConvergence {
                iterations: stats.iterations,
                unconverged,
            });
        }

        let (block_d, block_e) = range.slices(d, e);
        let mu = select_shift(config.shift, block_d, block_e);
        let outcome = step_qr_tridiag(block_d, block_e, mu, config.eps);
        stats.iterations += 1;
        trace!(
            "Sweep {} on [{}, {}) with shift {:.6e}: {:?}",
            stats.iterations,
            range.lo,
            range.hi,
            mu,
            outcome
        );

        match outcome {
            SweepOutcome::Deflated => {
                stats.deflations += 1;
                worklist.push(range.deflate());
            }
            SweepOutcome::Active => worklist.push(range),
        }
    }

    debug!(
        "Converged order {} tridiagonal: {} sweeps, {} deflations, {} splits",
        n, stats.iterations, stats.deflations, stats.splits
    );
    Ok(stats)
}

/// Last negligible off-diagonal index inside `range`, if any.
fn find_split(d: &[f64], e: &[f64], range: ActiveRange, eps: f64) -> Option<usize> {
    (range.lo..range.hi - 1)
        .rev()
        .find(|&i| is_negligible(e[i], d[i], d[i + 1], eps))
}

/// Eigenvalues of the symmetric band matrix `a` with threshold `eps` and at
/// most `max_iter` sweeps. `a` is destroyed.
pub fn qr_eigs_band(a: &mut BandMatrix, eps: f64, max_iter: usize) -> Result<EigenResults> {
    qr_eigs_band_with(a, &SolverConfig::new(eps, max_iter))
}

/// Configurable form of [`qr_eigs_band`].
///
/// On [`EigenError::NoConvergence`] the partially converged form is dropped;
/// call [`tridiagonalize_band`](crate::tridiagonalize_band) and
/// [`solve_tridiagonal`] directly to keep it.
pub fn qr_eigs_band_with(a: &mut BandMatrix, config: &SolverConfig) -> Result<EigenResults> {
    config.validate()?;
    a.validate()?;

    let factor = if config.scale {
        scale_factor(a.max_abs())
    } else {
        None
    };
    if let Some(factor) = factor {
        debug!("Rescaling matrix by {:e} before reduction", factor);
        a.scale(factor);
    }

    let (mut form, reduction) = tridiagonalize_band_with(a, |_| {});
    let solved = solve_tridiagonal(&mut form, config);
    if let Some(factor) = factor {
        form.scale(1.0 / factor);
    }
    let stats = solved?;

    Ok(EigenResults {
        eigenvalues: form.sorted_diagonal(),
        reduction,
        stats,
        scaled: factor.is_some(),
    })
}

/// Power of two that brings a matrix of max-abs norm `anrm` into
/// `[1/sqrt(2), sqrt(2)]`, or `None` when it is already there (or zero).
///
/// Powers of two make scaling and unscaling exact.
fn scale_factor(anrm: f64) -> Option<f64> {
    if !(anrm > 0.0 && anrm.is_finite()) {
        return None;
    }
    let exponent = (anrm.log2().round() as i32).clamp(f64::MIN_EXP - 1, f64::MAX_EXP - 1);
    if exponent == 0 {
        None
    } else {
        Some(2f64.powi(-exponent))
    }
}

/// Sorted eigenvalues of `a` from nalgebra's dense symmetric solver, for
/// cross-checking.
pub fn reference_eigenvalues(a: &BandMatrix) -> Vec<f64> {
    let mut values: Vec<f64> = SymmetricEigen::new(a.to_dmatrix())
        .eigenvalues
        .iter()
        .copied()
        .collect();
    values.sort_by(f64::total_cmp);
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_threshold() {
        assert!(SolverConfig::new(0.0, 10).validate().is_err());
        assert!(SolverConfig::new(f64::NAN, 10).validate().is_err());
        assert!(SolverConfig::default().validate().is_ok());
    }

    #[test]
    fn scale_factor_is_an_exact_power_of_two() {
        assert_eq!(scale_factor(1.0), None);
        assert_eq!(scale_factor(1.2), None);
        assert_eq!(scale_factor(0.0), None);
        assert_eq!(scale_factor(f64::NAN), None);
        assert_eq!(scale_factor(5.0), Some(0.25));
        assert_eq!(scale_factor(7.5), Some(0.125));
        assert_eq!(scale_factor(2f64.powi(-40)), Some(2f64.powi(40)));
        for anrm in [1e-13, 1e-300, 1e300, 1e-310] {
            let factor = scale_factor(anrm).unwrap();
            assert!(factor.is_finite());
            assert_eq!(factor.log2().fract(), 0.0);
        }
        assert!((scale_factor(1e-13).unwrap() * 1e-13 - 1.0).abs() < 0.5);
    }

    #[test]
    fn find_split_prefers_lowest_block() {
        let d = [1.0, 2.0, 3.0, 4.0];
        let e = [0.0, 1.0, 0.0];
        assert_eq!(find_split(&d, &e, ActiveRange::new(0, 4), 1e-12), Some(2));
        assert_eq!(find_split(&d, &e, ActiveRange::new(1, 3), 1e-12), None);
    }
}
