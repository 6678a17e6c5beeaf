// src/band.rs

//! Owned storage for real symmetric band matrices.
//!
//! The matrix is kept as a dense row-major `n × n` buffer. Only entries with
//! `|i - j| <= k` may be nonzero on construction; the reduction is free to
//! create (and later remove) fill-in anywhere, so there is a single dense
//! layout and no separate band-packed indexing.

use crate::error::{EigenError, Result};
use crate::givens::GivensRotation;
use nalgebra::DMatrix;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use std::ops::{Index, IndexMut};

/// Largest asymmetry `|A[i][j] - A[j][i]|` accepted on construction.
pub const SYMMETRY_TOLERANCE: f64 = 1e-10;

/// A real symmetric matrix of order `n` with bandwidth `k`.
#[derive(Clone, Debug, PartialEq)]
pub struct BandMatrix {
    n: usize,
    k: usize,
    data: Vec<f64>, // row-major, n * n
}

impl BandMatrix {
    /// Zero matrix of order `n` and bandwidth `k`.
    pub fn zeros(n: usize, k: usize) -> Result<Self> {
        validate_dimensions(n, k)?;
        Ok(BandMatrix {
            n,
            k,
            data: vec![0.0; n * n],
        })
    }

    /// Wraps a row-major `n × n` buffer after checking symmetry and band structure.
    pub fn from_row_major(n: usize, k: usize, data: Vec<f64>) -> Result<Self> {
        validate_dimensions(n, k)?;
        if data.len() != n * n {
            return Err(EigenError::DimensionMismatch {
                expected: n * n,
                found: data.len(),
            });
        }
        let matrix = BandMatrix { n, k, data };
        matrix.validate()?;
        Ok(matrix)
    }

    /// Builds a matrix from dense rows, e.g. as read from a CSV file.
    pub fn from_rows(rows: &[Vec<f64>], k: usize) -> Result<Self> {
        let n = rows.len();
        validate_dimensions(n, k)?;
        let mut data = Vec::with_capacity(n * n);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(EigenError::InvalidInput(format!(
                    "row {} has {} entries but the matrix has order {}",
                    i,
                    row.len(),
                    n
                )));
            }
            data.extend_from_slice(row);
        }
        Self::from_row_major(n, k, data)
    }

    /// Builds a matrix from dense rows and infers the bandwidth.
    pub fn from_rows_detect(rows: &[Vec<f64>]) -> Result<Self> {
        let k = detect_bandwidth(rows);
        Self::from_rows(rows, k)
    }

    pub fn from_dmatrix(matrix: &DMatrix<f64>, k: usize) -> Result<Self> {
        if matrix.nrows() != matrix.ncols() {
            return Err(EigenError::InvalidInput(format!(
                "matrix must be square, got {}x{}",
                matrix.nrows(),
                matrix.ncols()
            )));
        }
        let n = matrix.nrows();
        validate_dimensions(n, k)?;
        let data = (0..n)
            .flat_map(|i| (0..n).map(move |j| matrix[(i, j)]))
            .collect();
        Self::from_row_major(n, k, data)
    }

    pub fn to_dmatrix(&self) -> DMatrix<f64> {
        DMatrix::from_row_slice(self.n, self.n, &self.data)
    }

    /// Random symmetric band matrix with standard normal entries inside the band.
    pub fn random<R: Rng + ?Sized>(n: usize, k: usize, rng: &mut R) -> Result<Self> {
        let mut matrix = Self::zeros(n, k)?;
        for i in 0..n {
            for j in i.saturating_sub(k)..=i {
                let value: f64 = StandardNormal.sample(rng);
                matrix[(i, j)] = value;
                matrix[(j, i)] = value;
            }
        }
        Ok(matrix)
    }

    /// Order `n` of the matrix.
    pub fn order(&self) -> usize {
        self.n
    }

    /// Number of sub-diagonals `k`.
    pub fn bandwidth(&self) -> usize {
        self.k
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    pub fn trace(&self) -> f64 {
        (0..self.n).map(|i| self[(i, i)]).sum()
    }

    /// Largest absolute entry.
    pub fn max_abs(&self) -> f64 {
        self.data.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
    }

    /// Largest `|A[i][j] - A[j][i]|` over the whole matrix.
    pub fn asymmetry(&self) -> f64 {
        let mut worst = 0.0_f64;
        for i in 0..self.n {
            for j in 0..i {
                worst = worst.max((self[(i, j)] - self[(j, i)]).abs());
            }
        }
        worst
    }

    pub fn is_symmetric(&self, tol: f64) -> bool {
        self.asymmetry() <= tol
    }

    /// Multiplies every entry by `factor`.
    pub fn scale(&mut self, factor: f64) {
        for value in &mut self.data {
            *value *= factor;
        }
    }

    /// Applies `G A G^T` for the rotation `rot` in the plane `(p, q)`:
    /// rows `p` and `q` are rotated across all columns, then columns `p` and `q`
    /// across all rows.
    pub fn rotate_similarity(&mut self, p: usize, q: usize, rot: GivensRotation) {
        let n = self.n;
        for col in 0..n {
            let (tp, tq) = rot.rotate(self.data[p * n + col], self.data[q * n + col]);
            self.data[p * n + col] = tp;
            self.data[q * n + col] = tq;
        }
        for row in 0..n {
            let (tp, tq) = rot.rotate(self.data[row * n + p], self.data[row * n + q]);
            self.data[row * n + p] = tp;
            self.data[row * n + q] = tq;
        }
    }

    /// Re-checks finiteness, band structure and symmetry. Entries written
    /// through `IndexMut` bypass the constructor checks.
    pub(crate) fn validate(&self) -> Result<()> {
        for i in 0..self.n {
            for j in 0..self.n {
                let value = self[(i, j)];
                if !value.is_finite() {
                    return Err(EigenError::InvalidInput(format!(
                        "entry ({}, {}) is not finite",
                        i, j
                    )));
                }
                if i.abs_diff(j) > self.k && value != 0.0 {
                    return Err(EigenError::InvalidInput(format!(
                        "entry ({}, {}) = {} lies outside bandwidth {}",
                        i, j, value, self.k
                    )));
                }
            }
        }
        let asymmetry = self.asymmetry();
        if asymmetry > SYMMETRY_TOLERANCE {
            return Err(EigenError::InvalidInput(format!(
                "matrix is not symmetric (max asymmetry {:e})",
                asymmetry
            )));
        }
        Ok(())
    }
}

impl Index<(usize, usize)> for BandMatrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        assert!(i < self.n && j < self.n, "index ({}, {}) out of bounds", i, j);
        &self.data[i * self.n + j]
    }
}

impl IndexMut<(usize, usize)> for BandMatrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        assert!(i < self.n && j < self.n, "index ({}, {}) out of bounds", i, j);
        &mut self.data[i * self.n + j]
    }
}

/// Smallest `k` such that every nonzero entry satisfies `|i - j| <= k`.
pub fn detect_bandwidth(rows: &[Vec<f64>]) -> usize {
    let mut k = 0;
    for (i, row) in rows.iter().enumerate() {
        for (j, &value) in row.iter().enumerate() {
            if value != 0.0 {
                k = k.max(i.abs_diff(j));
            }
        }
    }
    k
}

fn validate_dimensions(n: usize, k: usize) -> Result<()> {
    if n == 0 {
        return Err(EigenError::InvalidInput(
            "matrix order must be positive".to_string(),
        ));
    }
    if k >= n {
        return Err(EigenError::InvalidInput(format!(
            "bandwidth {} must be smaller than the order {}",
            k, n
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn rejects_invalid_dimensions() {
        assert!(matches!(
            BandMatrix::zeros(0, 0),
            Err(EigenError::InvalidInput(_))
        ));
        assert!(matches!(
            BandMatrix::zeros(3, 3),
            Err(EigenError::InvalidInput(_))
        ));
        assert_eq!(
            BandMatrix::from_row_major(2, 1, vec![1.0; 3]),
            Err(EigenError::DimensionMismatch {
                expected: 4,
                found: 3
            })
        );
    }

    #[test]
    fn rejects_entries_outside_band_and_asymmetry() {
        let rows = vec![
            vec![1.0, 0.0, 2.0],
            vec![0.0, 1.0, 0.0],
            vec![2.0, 0.0, 1.0],
        ];
        assert!(BandMatrix::from_rows(&rows, 1).is_err());
        assert!(BandMatrix::from_rows(&rows, 2).is_ok());

        let skew = vec![vec![1.0, 2.0], vec![3.0, 1.0]];
        assert!(BandMatrix::from_rows(&skew, 1).is_err());
    }

    #[test]
    fn detects_bandwidth() {
        let rows = vec![
            vec![4.0, 1.0, 0.0, 0.0],
            vec![1.0, 3.0, 0.0, 5.0],
            vec![0.0, 0.0, 2.0, 0.0],
            vec![0.0, 5.0, 0.0, 1.0],
        ];
        assert_eq!(detect_bandwidth(&rows), 2);
        assert_eq!(BandMatrix::from_rows_detect(&rows).unwrap().bandwidth(), 2);
    }

    #[test]
    fn random_matrix_respects_band() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let matrix = BandMatrix::random(8, 2, &mut rng).unwrap();
        assert!(matrix.is_symmetric(0.0));
        for i in 0..8usize {
            for j in 0..8 {
                if i.abs_diff(j) > 2 {
                    assert_eq!(matrix[(i, j)], 0.0);
                }
            }
        }
    }

    #[test]
    fn dmatrix_round_trip() {
        let rows = vec![vec![2.0, -1.0], vec![-1.0, 2.0]];
        let matrix = BandMatrix::from_rows(&rows, 1).unwrap();
        let dense = matrix.to_dmatrix();
        assert_eq!(dense[(0, 1)], -1.0);
        assert_eq!(BandMatrix::from_dmatrix(&dense, 1).unwrap(), matrix);
    }
}
