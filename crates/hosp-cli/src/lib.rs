//! CLI library components for the patient record reconciliation tool.

pub mod logging;
pub mod pipeline;
pub mod types;
