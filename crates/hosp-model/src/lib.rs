//! Data model for the patient record reconciliation pipeline.

pub mod error;
pub mod ids;
pub mod options;
pub mod patient;

pub use error::{ModelError, Result};
pub use ids::PatientId;
pub use options::{CleaningOptions, EmptyMeanPolicy, RequiredField};
pub use patient::{
    DerivedRecord, DerivedTable, PatientRecord, PatientTable, Statut, UnifiedPatientRecord,
    UnifiedPatientTable, columns,
};
