// src/io.rs

//! CSV input and output for the command line harness.

use crate::error::{EigenError, Result};
use csv::{ReaderBuilder, WriterBuilder};
use std::path::Path;

/// Reads a headerless CSV file with one matrix row per line.
pub fn load_matrix_csv<P: AsRef<Path>>(csv_path: P) -> Result<Vec<Vec<f64>>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_path(csv_path.as_ref())?;

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        let row = record
            .iter()
            .map(|field| {
                field.parse::<f64>().map_err(|_| {
                    EigenError::InvalidInput(format!(
                        "row {}: '{}' is not a number",
                        line + 1,
                        field
                    ))
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(EigenError::InvalidInput(format!(
            "{} contains no matrix rows",
            csv_path.as_ref().display()
        )));
    }
    Ok(rows)
}

/// Writes the eigenvalues as a single CSV column.
pub fn save_eigenvalues_csv<P: AsRef<Path>>(values: &[f64], csv_path: P) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(csv_path)?;
    for value in values {
        writer.write_record(&[value.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes a dense matrix as headerless CSV.
pub fn save_matrix_csv<P: AsRef<Path>>(rows: &[Vec<f64>], csv_path: P) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(csv_path)?;
    for row in rows {
        writer.write_record(row.iter().map(|v| v.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}
