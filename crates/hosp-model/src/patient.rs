//! Patient records and the tables that carry them between pipeline stages.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::PatientId;

/// Column names used by the source files and the outputs.
pub mod columns {
    pub const PATIENT_ID: &str = "PatientID";
    pub const NAME: &str = "Name";
    pub const DOB: &str = "DOB";
    pub const LAST_VISIT: &str = "LastVisit";
    pub const DIAGNOSIS: &str = "Diagnosis";
    pub const TREATMENT_COST: &str = "TreatmentCost";
    pub const NOM: &str = "Nom";
    pub const AGE: &str = "Age";
    pub const STATUT: &str = "Statut";

    /// Columns every source file must provide.
    pub const SOURCE_COLUMNS: [&str; 6] =
        [PATIENT_ID, NAME, DOB, LAST_VISIT, DIAGNOSIS, TREATMENT_COST];

    /// Column order of the unified output.
    pub const UNIFIED_COLUMNS: [&str; 8] = [
        PATIENT_ID,
        NOM,
        DOB,
        DIAGNOSIS,
        LAST_VISIT,
        TREATMENT_COST,
        AGE,
        STATUT,
    ];
}

/// One row of a source table.
///
/// Dates stay textual: raw on load, `DD/MM/YYYY` once normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub patient_id: PatientId,
    pub name: Option<String>,
    pub dob: Option<String>,
    pub last_visit: Option<String>,
    pub diagnosis: Option<String>,
    pub treatment_cost: Option<f64>,
    /// Values of non-standard source columns, keyed by header.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Option<String>>,
}

impl PatientRecord {
    pub fn new(patient_id: PatientId) -> Self {
        Self {
            patient_id,
            name: None,
            dob: None,
            last_visit: None,
            diagnosis: None,
            treatment_cost: None,
            extra: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_dob(mut self, dob: impl Into<String>) -> Self {
        self.dob = Some(dob.into());
        self
    }

    #[must_use]
    pub fn with_last_visit(mut self, last_visit: impl Into<String>) -> Self {
        self.last_visit = Some(last_visit.into());
        self
    }

    #[must_use]
    pub fn with_diagnosis(mut self, diagnosis: impl Into<String>) -> Self {
        self.diagnosis = Some(diagnosis.into());
        self
    }

    #[must_use]
    pub fn with_treatment_cost(mut self, cost: f64) -> Self {
        self.treatment_cost = Some(cost);
        self
    }
}

/// An ordered collection of records loaded from one source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientTable {
    /// Label of the origin, used in logs and audit lines.
    pub source: String,
    /// Header order of the source file.
    pub columns: Vec<String>,
    pub records: Vec<PatientRecord>,
}

impl PatientTable {
    /// Empty table with the standard source columns.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            columns: columns::SOURCE_COLUMNS
                .iter()
                .map(ToString::to_string)
                .collect(),
            records: Vec::new(),
        }
    }

    /// Builds a table with the standard columns from records.
    pub fn from_records(source: impl Into<String>, records: Vec<PatientRecord>) -> Self {
        Self {
            records,
            ..Self::new(source)
        }
    }

    pub fn push(&mut self, record: PatientRecord) {
        self.records.push(record);
    }

    /// Same source and schema, different rows.
    #[must_use]
    pub fn with_records(self, records: Vec<PatientRecord>) -> Self {
        Self {
            source: self.source,
            columns: self.columns,
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PatientRecord> + '_ {
        self.records.iter()
    }
}

/// Health status derived from the normalized diagnosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Statut {
    Sain,
    Malade,
}

impl Statut {
    pub fn as_str(&self) -> &'static str {
        match self {
            Statut::Sain => "Sain",
            Statut::Malade => "Malade",
        }
    }
}

impl fmt::Display for Statut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cleaned record with its derived fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedRecord {
    pub record: PatientRecord,
    pub age: Option<i32>,
    pub statut: Statut,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedTable {
    pub source: String,
    pub records: Vec<DerivedRecord>,
}

impl DerivedTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// One row of the reconciled output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedPatientRecord {
    pub patient_id: PatientId,
    pub nom: Option<String>,
    pub dob: Option<String>,
    pub diagnosis: Option<String>,
    pub last_visit: Option<String>,
    pub treatment_cost: Option<f64>,
    pub age: Option<i32>,
    pub statut: Option<Statut>,
}

/// Reconciled table: one record per distinct patient id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnifiedPatientTable {
    pub records: Vec<UnifiedPatientRecord>,
}

impl UnifiedPatientTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, id: &PatientId) -> Option<&UnifiedPatientRecord> {
        self.records.iter().find(|record| &record.patient_id == id)
    }
}
