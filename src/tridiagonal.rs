// src/tridiagonal.rs

//! Symmetric tridiagonal form and the index ranges the QR driver works on.

use crate::error::{EigenError, Result};
use nalgebra::DMatrix;

/// Diagonal `d` (length `n`) and sub-diagonal `e` (length `n - 1`) of a
/// symmetric tridiagonal matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct TridiagonalForm {
    d: Vec<f64>,
    e: Vec<f64>,
}

impl TridiagonalForm {
    pub fn new(d: Vec<f64>, e: Vec<f64>) -> Result<Self> {
        if d.is_empty() {
            return Err(EigenError::InvalidInput(
                "tridiagonal form needs at least one diagonal entry".to_string(),
            ));
        }
        if e.len() + 1 != d.len() {
            return Err(EigenError::DimensionMismatch {
                expected: d.len() - 1,
                found: e.len(),
            });
        }
        if d.iter().chain(e.iter()).any(|v| !v.is_finite()) {
            return Err(EigenError::InvalidInput(
                "tridiagonal entries must be finite".to_string(),
            ));
        }
        Ok(TridiagonalForm { d, e })
    }

    /// Skips validation; `d` and `e` come straight out of a validated band matrix.
    pub(crate) fn from_reduction(d: Vec<f64>, e: Vec<f64>) -> Self {
        debug_assert_eq!(e.len() + 1, d.len());
        TridiagonalForm { d, e }
    }

    pub fn order(&self) -> usize {
        self.d.len()
    }

    pub fn diagonal(&self) -> &[f64] {
        &self.d
    }

    pub fn off_diagonal(&self) -> &[f64] {
        &self.e
    }

    /// Both sequences, mutably, for in-place sweeps.
    pub fn parts_mut(&mut self) -> (&mut [f64], &mut [f64]) {
        (&mut self.d, &mut self.e)
    }

    pub fn trace(&self) -> f64 {
        self.d.iter().sum()
    }

    /// Largest `|e[i]|`; zero once the form is diagonal.
    pub fn max_off_diagonal(&self) -> f64 {
        self.e.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
    }

    /// Diagonal entries sorted ascending.
    pub fn sorted_diagonal(&self) -> Vec<f64> {
        let mut values = self.d.clone();
        values.sort_by(f64::total_cmp);
        values
    }

    /// Multiplies every entry by `factor`.
    pub fn scale(&mut self, factor: f64) {
        for value in self.d.iter_mut().chain(self.e.iter_mut()) {
            *value *= factor;
        }
    }

    pub fn to_dmatrix(&self) -> DMatrix<f64> {
        let n = self.order();
        let mut dense = DMatrix::zeros(n, n);
        for (i, &value) in self.d.iter().enumerate() {
            dense[(i, i)] = value;
        }
        for (i, &value) in self.e.iter().enumerate() {
            dense[(i + 1, i)] = value;
            dense[(i, i + 1)] = value;
        }
        dense
    }
}

/// Half-open interval `[lo, hi)` of still unconverged diagonal indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActiveRange {
    pub lo: usize,
    pub hi: usize,
}

impl ActiveRange {
    pub fn new(lo: usize, hi: usize) -> Self {
        debug_assert!(lo <= hi, "range [{}, {}) is inverted", lo, hi);
        ActiveRange { lo, hi }
    }

    pub fn len(&self) -> usize {
        self.hi - self.lo
    }

    pub fn is_empty(&self) -> bool {
        self.hi == self.lo
    }

    /// A block of order one (or zero) is already diagonal.
    pub fn is_converged(&self) -> bool {
        self.len() <= 1
    }

    /// Splits after diagonal index `i`, i.e. at the off-diagonal entry `e[i]`.
    pub fn split_at(&self, i: usize) -> (ActiveRange, ActiveRange) {
        debug_assert!(self.lo <= i && i + 1 < self.hi);
        (
            ActiveRange::new(self.lo, i + 1),
            ActiveRange::new(i + 1, self.hi),
        )
    }

    /// Drops the trailing index once its coupling has vanished.
    pub fn deflate(&self) -> ActiveRange {
        ActiveRange::new(self.lo, self.hi.saturating_sub(1).max(self.lo))
    }

    /// Diagonal and off-diagonal slices covered by the range.
    pub fn slices<'a>(&self, d: &'a mut [f64], e: &'a mut [f64]) -> (&'a mut [f64], &'a mut [f64]) {
        let e_hi = self.hi.saturating_sub(1).max(self.lo);
        (&mut d[self.lo..self.hi], &mut e[self.lo..e_hi])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_lengths() {
        assert_eq!(
            TridiagonalForm::new(vec![1.0, 2.0], vec![]),
            Err(EigenError::DimensionMismatch {
                expected: 1,
                found: 0
            })
        );
        assert!(TridiagonalForm::new(vec![], vec![]).is_err());
        assert!(TridiagonalForm::new(vec![1.0, f64::NAN], vec![0.0]).is_err());
    }

    #[test]
    fn dense_conversion_is_symmetric() {
        let form = TridiagonalForm::new(vec![1.0, 2.0, 3.0], vec![0.5, -0.25]).unwrap();
        let dense = form.to_dmatrix();
        assert_eq!(dense, dense.transpose());
        assert_eq!(dense[(2, 1)], -0.25);
        assert_eq!(form.trace(), 6.0);
    }

    #[test]
    fn range_split_and_deflate() {
        let range = ActiveRange::new(2, 7);
        let (left, right) = range.split_at(4);
        assert_eq!(left, ActiveRange::new(2, 5));
        assert_eq!(right, ActiveRange::new(5, 7));
        assert_eq!(range.deflate(), ActiveRange::new(2, 6));
        assert!(ActiveRange::new(3, 4).is_converged());
        assert!(!right.is_converged());
    }

    #[test]
    fn range_slices_cover_block() {
        let mut d = vec![0.0, 1.0, 2.0, 3.0];
        let mut e = vec![10.0, 11.0, 12.0];
        let (ds, es) = ActiveRange::new(1, 4).slices(&mut d, &mut e);
        assert_eq!(ds, &[1.0, 2.0, 3.0]);
        assert_eq!(es, &[11.0, 12.0]);
    }
}
