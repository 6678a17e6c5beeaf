// tests/test_io.rs

use bandeig::io::{load_matrix_csv, save_eigenvalues_csv, save_matrix_csv};
use bandeig::{qr_eigs_band, BandMatrix, EigenError};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_matrix_csv_round_trip_and_solve() {
    let rows = vec![
        vec![4.0, 1.0, 2.0, 0.0, 0.0],
        vec![1.0, 3.0, 1.0, 2.0, 0.0],
        vec![2.0, 1.0, 4.0, 1.0, 0.0],
        vec![0.0, 2.0, 1.0, 5.0, 1.0],
        vec![0.0, 0.0, 0.0, 1.0, 3.0],
    ];
    let tmp_file = NamedTempFile::new().expect("Failed to create temp file");
    save_matrix_csv(&rows, tmp_file.path()).expect("Failed to save matrix");

    let loaded = load_matrix_csv(tmp_file.path()).expect("Failed to load matrix");
    assert_eq!(loaded, rows);

    let mut a = BandMatrix::from_rows_detect(&loaded).unwrap();
    assert_eq!(a.bandwidth(), 2);
    let results = qr_eigs_band(&mut a, 1e-12, 1000).unwrap();
    assert_eq!(results.eigenvalues.len(), 5);
}

#[test]
fn test_eigenvalues_are_written_one_per_line() {
    let values = vec![-1.5, 0.25, 3.0];
    let tmp_file = NamedTempFile::new().expect("Failed to create temp file");
    save_eigenvalues_csv(&values, tmp_file.path()).expect("Failed to save eigenvalues");

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(tmp_file.path())
        .expect("Failed to create CSV reader");
    let loaded: Vec<f64> = rdr
        .deserialize()
        .map(|record| record.expect("Failed to deserialize"))
        .collect();

    assert_eq!(loaded, values);
}

#[test]
fn test_whitespace_is_trimmed() {
    let mut tmp_file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(tmp_file, "2.0, -1.0").unwrap();
    writeln!(tmp_file, " -1.0 ,2.0").unwrap();
    tmp_file.flush().unwrap();

    let loaded = load_matrix_csv(tmp_file.path()).unwrap();
    assert_eq!(loaded, vec![vec![2.0, -1.0], vec![-1.0, 2.0]]);
}

#[test]
fn test_non_numeric_field_is_rejected() {
    let mut tmp_file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(tmp_file, "1.0,abc").unwrap();
    tmp_file.flush().unwrap();

    let result = load_matrix_csv(tmp_file.path());
    assert!(matches!(result, Err(EigenError::InvalidInput(_))));
}

#[test]
fn test_ragged_rows_are_rejected() {
    let mut tmp_file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(tmp_file, "1.0,2.0").unwrap();
    writeln!(tmp_file, "2.0").unwrap();
    tmp_file.flush().unwrap();

    let result = load_matrix_csv(tmp_file.path());
    assert!(matches!(result, Err(EigenError::Csv(_))));
}

#[test]
fn test_empty_file_is_rejected() {
    let tmp_file = NamedTempFile::new().expect("Failed to create temp file");
    let result = load_matrix_csv(tmp_file.path());
    assert!(matches!(result, Err(EigenError::InvalidInput(_))));
}

#[test]
fn test_missing_file_is_an_error() {
    let result = load_matrix_csv("/nonexistent/bandeig/matrix.csv");
    assert!(result.is_err());
}
