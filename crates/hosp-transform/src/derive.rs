//! Derived fields: Age and Statut.

use chrono::Datelike;
use tracing::{debug, info_span};

use hosp_model::{DerivedRecord, DerivedTable, PatientRecord, PatientTable, Statut};

use crate::normalization::parse_day_first;

/// Diagnosis value that marks a patient as healthy, after normalization.
pub const HEALTHY_DIAGNOSIS: &str = "HEALTHY";

/// Age as `reference_year - birth year`.
///
/// Month and day are ignored: someone born in December is counted a year older
/// than they are for most of the year. DOB must already be `DD/MM/YYYY`.
pub fn derive_age(dob: Option<&str>, reference_year: i32) -> Option<i32> {
    dob.and_then(parse_day_first)
        .map(|date| reference_year - date.year())
}

/// `Sain` for an exact `HEALTHY` diagnosis, `Malade` otherwise.
pub fn derive_statut(diagnosis: Option<&str>) -> Statut {
    if diagnosis == Some(HEALTHY_DIAGNOSIS) {
        Statut::Sain
    } else {
        Statut::Malade
    }
}

pub fn derive_record(record: PatientRecord, reference_year: i32) -> DerivedRecord {
    DerivedRecord {
        age: derive_age(record.dob.as_deref(), reference_year),
        statut: derive_statut(record.diagnosis.as_deref()),
        record,
    }
}

/// Add Age and Statut to every record of a cleaned table.
pub fn derive_table(table: PatientTable, reference_year: i32) -> DerivedTable {
    let span = info_span!("derive", source = %table.source, reference_year);
    let _guard = span.enter();

    let records: Vec<DerivedRecord> = table
        .records
        .into_iter()
        .map(|record| derive_record(record, reference_year))
        .collect();
    debug!(
        with_age = records.iter().filter(|r| r.age.is_some()).count(),
        healthy = records.iter().filter(|r| r.statut == Statut::Sain).count(),
        "derived age and status"
    );
    DerivedTable {
        source: table.source,
        records,
    }
}
