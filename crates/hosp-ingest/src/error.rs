//! Error types for patient table ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// A source table could not be loaded. Always fatal for the run.
#[derive(Debug, Error)]
pub enum SourceReadError {
    // === File System Errors ===
    /// CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === CSV Parsing Errors ===
    /// Malformed CSV.
    #[error("failed to parse CSV {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// CSV file has no header row.
    #[error("CSV file is empty: {path}")]
    EmptyCsv { path: PathBuf },

    // === Schema Errors ===
    /// Required column not found in the header.
    #[error("required column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },

    /// Row without a patient identifier.
    #[error("missing PatientID on row {row} of {path}")]
    MissingPatientId { row: usize, path: PathBuf },

    /// Non-numeric value in a numeric column.
    #[error("invalid number '{value}' in column '{column}' on row {row} of {path}")]
    InvalidNumber {
        column: String,
        value: String,
        row: usize,
        path: PathBuf,
    },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, SourceReadError>;
