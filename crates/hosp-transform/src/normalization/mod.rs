//! Field normalization for patient tables.
//!
//! Diagnoses are uppercased and trimmed; DOB and LastVisit are rewritten as
//! `DD/MM/YYYY`, with unparseable dates coerced to missing.

pub mod datetime;
pub mod text;

use tracing::{debug, info_span, trace};

use hosp_model::{PatientRecord, PatientTable};

pub use datetime::{DAY_FIRST_FORMAT, format_day_first, normalize_date, parse_date, parse_day_first};
pub use text::normalize_diagnosis;

/// Counts of date values that could not be parsed and were set to missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizationReport {
    pub dob_coerced: usize,
    pub last_visit_coerced: usize,
}

/// Normalize one record's text and date fields.
pub fn normalize_record(record: PatientRecord) -> PatientRecord {
    normalize_record_counted(record, &mut NormalizationReport::default())
}

fn normalize_date_field(value: Option<String>, coerced: &mut usize) -> Option<String> {
    let raw = value?;
    let normalized = normalize_date(&raw);
    if normalized.is_none() {
        trace!("unparseable date coerced to missing");
        *coerced += 1;
    }
    normalized
}

fn normalize_record_counted(
    record: PatientRecord,
    report: &mut NormalizationReport,
) -> PatientRecord {
    PatientRecord {
        diagnosis: record.diagnosis.as_deref().map(normalize_diagnosis),
        dob: normalize_date_field(record.dob, &mut report.dob_coerced),
        last_visit: normalize_date_field(record.last_visit, &mut report.last_visit_coerced),
        ..record
    }
}

/// Normalize every record of a table, keeping order and schema.
pub fn normalize_table(table: PatientTable) -> PatientTable {
    normalize_table_with_report(table).0
}

/// Like [`normalize_table`], also reporting how many dates were coerced to missing.
pub fn normalize_table_with_report(table: PatientTable) -> (PatientTable, NormalizationReport) {
    let span = info_span!("normalize", source = %table.source);
    let _guard = span.enter();

    let mut report = NormalizationReport::default();
    let PatientTable {
        source,
        columns,
        records,
    } = table;
    let records = records
        .into_iter()
        .map(|record| normalize_record_counted(record, &mut report))
        .collect();
    debug!(
        dob_coerced = report.dob_coerced,
        last_visit_coerced = report.last_visit_coerced,
        "normalized diagnosis and date fields"
    );
    (
        PatientTable {
            source,
            columns,
            records,
        },
        report,
    )
}
