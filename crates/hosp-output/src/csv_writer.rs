//! CSV writers for cleaned and unified patient tables.

use std::fs;
use std::path::Path;

use csv::WriterBuilder;
use tracing::info;

use hosp_model::columns::{
    DIAGNOSIS, DOB, LAST_VISIT, NAME, PATIENT_ID, TREATMENT_COST, UNIFIED_COLUMNS,
};
use hosp_model::{PatientRecord, PatientTable, UnifiedPatientRecord, UnifiedPatientTable};

use crate::error::{OutputError, Result};

/// Ensure a parent directory exists for a file path.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| OutputError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

fn format_cost(cost: Option<f64>) -> String {
    cost.as_ref().map(ToString::to_string).unwrap_or_default()
}

fn patient_cell(record: &PatientRecord, column: &str) -> String {
    match column {
        PATIENT_ID => record.patient_id.to_string(),
        NAME => record.name.clone().unwrap_or_default(),
        DOB => record.dob.clone().unwrap_or_default(),
        LAST_VISIT => record.last_visit.clone().unwrap_or_default(),
        DIAGNOSIS => record.diagnosis.clone().unwrap_or_default(),
        TREATMENT_COST => format_cost(record.treatment_cost),
        other => record
            .extra
            .get(other)
            .cloned()
            .flatten()
            .unwrap_or_default(),
    }
}

fn unified_row(record: &UnifiedPatientRecord) -> [String; UNIFIED_COLUMNS.len()] {
    [
        record.patient_id.to_string(),
        record.nom.clone().unwrap_or_default(),
        record.dob.clone().unwrap_or_default(),
        record.diagnosis.clone().unwrap_or_default(),
        record.last_visit.clone().unwrap_or_default(),
        format_cost(record.treatment_cost),
        record.age.as_ref().map(ToString::to_string).unwrap_or_default(),
        record
            .statut
            .map(|statut| statut.as_str().to_string())
            .unwrap_or_default(),
    ]
}

fn write_rows<I, R>(path: &Path, header: &[&str], rows: I) -> Result<usize>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator,
    R::Item: AsRef<[u8]>,
{
    ensure_parent_dir(path)?;
    let csv_err = |source| OutputError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = WriterBuilder::new().from_path(path).map_err(csv_err)?;
    writer.write_record(header).map_err(csv_err)?;
    let mut count = 0usize;
    for row in rows {
        writer.write_record(row).map_err(csv_err)?;
        count += 1;
    }
    writer.flush().map_err(|source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(count)
}

/// Write a cleaned source table, keeping its header order.
///
/// Missing values become empty cells; non-standard columns come from
/// [`PatientRecord::extra`].
pub fn write_patient_table(table: &PatientTable, path: &Path) -> Result<()> {
    let header: Vec<&str> = table.columns.iter().map(String::as_str).collect();
    let rows = table.iter().map(|record| {
        header
            .iter()
            .map(|column| patient_cell(record, column))
            .collect::<Vec<_>>()
    });
    let count = write_rows(path, &header, rows)?;
    info!(
        source = %table.source,
        path = %path.display(),
        rows = count,
        "wrote cleaned table"
    );
    Ok(())
}

/// Write the unified table with its fixed column set.
pub fn write_unified_table(table: &UnifiedPatientTable, path: &Path) -> Result<()> {
    let count = write_rows(path, &UNIFIED_COLUMNS, table.records.iter().map(unified_row))?;
    info!(path = %path.display(), rows = count, "wrote unified table");
    Ok(())
}
