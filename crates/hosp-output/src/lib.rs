//! Output generation for the reconciliation pipeline.
//!
//! Writes cleaned per-source tables and the unified table as CSV, and appends
//! stage lines to the audit log.

pub mod audit;
pub mod csv_writer;
pub mod error;

pub use audit::{AuditLog, FileAuditLog, MemoryAuditLog};
pub use csv_writer::{ensure_parent_dir, write_patient_table, write_unified_table};
pub use error::{OutputError, Result};
