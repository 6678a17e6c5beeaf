// src/error.rs

//! Error type shared by the reduction, the QR driver and the CSV harness.
//!
//! Skipped rotations are not errors; they are counted in the reduction stats.
//! Non-convergence is a soft failure: the caller's buffers stay well defined and
//! hold the partially converged tridiagonal form.

use thiserror::Error;

/// Status code reported for a converged solve.
pub const STATUS_OK: i32 = 0;
/// Status code reported when the iteration budget runs out.
pub const STATUS_NO_CONVERGENCE: i32 = 1;
/// Status code reported for rejected input.
pub const STATUS_INVALID_INPUT: i32 = 2;

pub type Result<T> = std::result::Result<T, EigenError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EigenError {
    /// The matrix, tolerance or budget violates a precondition.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A buffer does not have the length its dimensions require.
    #[error("Dimension mismatch: expected {expected} entries but found {found}.")]
    DimensionMismatch { expected: usize, found: usize },

    /// The QR iteration budget was exhausted before every block converged.
    #[error(
        "QR iteration did not converge after {iterations} iterations: {unconverged} active block(s) remain."
    )]
    NoConvergence { iterations: usize, unconverged: usize },

    #[error("I/O error: {0}")]
    Io(String),

    #[error("CSV error: {0}")]
    Csv(String),
}

impl EigenError {
    /// Maps the error onto the numeric status convention (`0` success,
    /// `1` non-convergence, `2` invalid input).
    pub fn status_code(&self) -> i32 {
        match self {
            EigenError::NoConvergence { .. } => STATUS_NO_CONVERGENCE,
            EigenError::InvalidInput(_) | EigenError::DimensionMismatch { .. } => {
                STATUS_INVALID_INPUT
            }
            EigenError::Io(_) | EigenError::Csv(_) => STATUS_INVALID_INPUT,
        }
    }

    pub fn is_convergence_failure(&self) -> bool {
        matches!(self, EigenError::NoConvergence { .. })
    }
}

impl From<std::io::Error> for EigenError {
    fn from(e: std::io::Error) -> Self {
        EigenError::Io(e.to_string())
    }
}

impl From<csv::Error> for EigenError {
    fn from(e: csv::Error) -> Self {
        EigenError::Csv(e.to_string())
    }
}

/// Status code for any solver result.
pub fn status_code<T>(result: &Result<T>) -> i32 {
    match result {
        Ok(_) => STATUS_OK,
        Err(e) => e.status_code(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_convergence_message() {
        let error = EigenError::NoConvergence {
            iterations: 30,
            unconverged: 2,
        };
        assert_eq!(
            error.to_string(),
            "QR iteration did not converge after 30 iterations: 2 active block(s) remain."
        );
        assert!(error.is_convergence_failure());
    }

    #[test]
    fn test_dimension_mismatch_message() {
        let error = EigenError::DimensionMismatch {
            expected: 25,
            found: 24,
        };
        assert_eq!(
            error.to_string(),
            "Dimension mismatch: expected 25 entries but found 24."
        );
    }

    #[test]
    fn test_status_codes() {
        let ok: Result<()> = Ok(());
        assert_eq!(status_code(&ok), STATUS_OK);

        let failed: Result<()> = Err(EigenError::NoConvergence {
            iterations: 0,
            unconverged: 1,
        });
        assert_eq!(status_code(&failed), STATUS_NO_CONVERGENCE);

        let invalid: Result<()> = Err(EigenError::InvalidInput("n must be positive".into()));
        assert_eq!(status_code(&invalid), STATUS_INVALID_INPUT);
        assert!(!invalid.unwrap_err().is_convergence_failure());
    }
}
