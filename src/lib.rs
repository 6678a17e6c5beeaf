//! Eigenvalues of real symmetric band matrices.
//!
//! The pipeline reduces a [`BandMatrix`] to a [`TridiagonalForm`] with Givens
//! rotations ([`tridiagonalize_band`]) and then iterates implicit shifted QR
//! sweeps ([`step_qr_tridiag`]) with splitting and deflation until the
//! off-diagonal vanishes ([`solve_tridiagonal`]). [`qr_eigs_band`] chains both.
//!
//! ```rust
//! use bandeig::{qr_eigs_band, BandMatrix};
//!
//! let rows = vec![
//!     vec![2.0, -1.0, 0.0],
//!     vec![-1.0, 2.0, -1.0],
//!     vec![0.0, -1.0, 2.0],
//! ];
//! let mut a = BandMatrix::from_rows(&rows, 1).unwrap();
//! let results = qr_eigs_band(&mut a, 1e-12, 100).unwrap();
//! let expected = [2.0 - 2.0_f64.sqrt(), 2.0, 2.0 + 2.0_f64.sqrt()];
//! for (got, want) in results.eigenvalues.iter().zip(expected) {
//!     assert!((got - want).abs() < 1e-10);
//! }
//! ```

pub mod band;
pub mod eigen_print;
pub mod error;
pub mod givens;
pub mod io;
pub mod qr;
pub mod reduce;
pub mod solver;
pub mod tridiagonal;

pub use band::BandMatrix;
pub use error::{EigenError, Result};
pub use qr::{step_qr_tridiag, ShiftStrategy, SweepOutcome};
pub use reduce::{tridiagonalize_band, tridiagonalize_band_with, ReductionStats};
pub use solver::{
    qr_eigs_band, qr_eigs_band_with, reference_eigenvalues, solve_tridiagonal, EigenResults,
    SolveStats, SolverConfig,
};
pub use tridiagonal::{ActiveRange, TridiagonalForm};
