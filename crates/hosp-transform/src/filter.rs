//! Row filter: drop records missing a required field.

use tracing::{debug, info_span};

use hosp_model::{PatientRecord, PatientTable, RequiredField};

/// Returns true if `field` holds a value on `record`.
pub fn has_field(record: &PatientRecord, field: RequiredField) -> bool {
    match field {
        RequiredField::Diagnosis => record.diagnosis.is_some(),
        RequiredField::TreatmentCost => record.treatment_cost.is_some(),
        RequiredField::Dob => record.dob.is_some(),
        RequiredField::LastVisit => record.last_visit.is_some(),
    }
}

/// Rows kept and dropped by one filter pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterReport {
    pub kept: usize,
    pub dropped: usize,
}

/// Keep only records where every required field is present.
///
/// Order of the surviving records is preserved. An empty result is valid.
pub fn filter_required(table: PatientTable, required: &[RequiredField]) -> PatientTable {
    filter_required_with_report(table, required).0
}

pub fn filter_required_with_report(
    table: PatientTable,
    required: &[RequiredField],
) -> (PatientTable, FilterReport) {
    let span = info_span!("filter", source = %table.source);
    let _guard = span.enter();

    let before = table.len();
    let PatientTable {
        source,
        columns,
        records,
    } = table;
    let records: Vec<PatientRecord> = records
        .into_iter()
        .filter(|record| required.iter().all(|field| has_field(record, *field)))
        .collect();
    let report = FilterReport {
        kept: records.len(),
        dropped: before - records.len(),
    };
    debug!(
        kept = report.kept,
        dropped = report.dropped,
        required = ?required,
        "filtered rows missing required fields"
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
