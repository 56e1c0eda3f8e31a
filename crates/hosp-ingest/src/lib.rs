//! Patient table ingestion.
//!
//! Loads the primary and supplementary CSV sources into [`PatientTable`]s.
//! Missing cells and NA markers become `None` here so later stages never deal
//! with format-specific sentinels.
//!
//! [`PatientTable`]: hosp_model::PatientTable

pub mod csv_table;
pub mod error;

pub use csv_table::{NULL_SENTINELS, is_null_sentinel, read_patient_table};
pub use error::{Result, SourceReadError};
