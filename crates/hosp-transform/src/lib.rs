//! Cleaning and reconciliation stages for patient tables.
//!
//! Each stage is a plain function that consumes a table and returns a new one:
//!
//! 1. [`filter::filter_required`] drops rows missing required fields
//! 2. [`normalization::normalize_table`] canonicalizes diagnoses and dates
//! 3. [`impute::impute_table`] fills the remaining gaps
//! 4. [`derive::derive_table`] adds Age and Statut
//! 5. [`reconcile::reconcile`] joins the two sources into one table

pub mod derive;
pub mod filter;
pub mod impute;
pub mod normalization;
pub mod reconcile;

pub use derive::{HEALTHY_DIAGNOSIS, derive_age, derive_record, derive_statut, derive_table};
pub use filter::{FilterReport, filter_required, filter_required_with_report, has_field};
pub use impute::{ImputationReport, impute_table, mean_treatment_cost};
pub use normalization::{
    NormalizationReport, normalize_date, normalize_diagnosis, normalize_record, normalize_table,
    normalize_table_with_report, parse_date,
};
pub use reconcile::{ReconcileReport, coalesce, reconcile, reconcile_with_report};
