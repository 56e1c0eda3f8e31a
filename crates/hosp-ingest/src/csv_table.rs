use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info};

use hosp_model::{PatientId, PatientRecord, PatientTable, columns};

use crate::error::{Result, SourceReadError};

/// Cell values read as missing, matching the usual spreadsheet/pandas NA markers.
pub const NULL_SENTINELS: [&str; 19] = [
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "<NA>", "#N/A",
    "#NA", "-1.#IND", "1.#IND", "-1.#QNAN", "1.#QNAN", "#N/A N/A",
];

/// Returns true if a trimmed cell stands for a missing value.
pub fn is_null_sentinel(value: &str) -> bool {
    NULL_SENTINELS.contains(&value)
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

fn normalize_cell(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    if is_null_sentinel(trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|value| value.trim().is_empty())
}

/// Positions of the standard columns within a source header.
struct ColumnIndex {
    patient_id: usize,
    name: usize,
    dob: usize,
    last_visit: usize,
    diagnosis: usize,
    treatment_cost: usize,
}

impl ColumnIndex {
    fn build(headers: &[String], path: &Path) -> Result<Self> {
        let find = |column: &str| {
            headers
                .iter()
                .position(|header| header == column)
                .ok_or_else(|| SourceReadError::MissingColumn {
                    column: column.to_string(),
                    path: path.to_path_buf(),
                })
        };
        Ok(Self {
            patient_id: find(columns::PATIENT_ID)?,
            name: find(columns::NAME)?,
            dob: find(columns::DOB)?,
            last_visit: find(columns::LAST_VISIT)?,
            diagnosis: find(columns::DIAGNOSIS)?,
            treatment_cost: find(columns::TREATMENT_COST)?,
        })
    }

    fn is_standard(&self, idx: usize) -> bool {
        [
            self.patient_id,
            self.name,
            self.dob,
            self.last_visit,
            self.diagnosis,
            self.treatment_cost,
        ]
        .contains(&idx)
    }
}

fn open_source(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            SourceReadError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            SourceReadError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

fn parse_cost(value: Option<String>, row: usize, path: &Path) -> Result<Option<f64>> {
    let Some(value) = value else {
        return Ok(None);
    };
    match value.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(Some(number)),
        _ => Err(SourceReadError::InvalidNumber {
            column: columns::TREATMENT_COST.to_string(),
            value,
            row,
            path: path.to_path_buf(),
        }),
    }
}

/// Reads a headered patient CSV into a [`PatientTable`].
///
/// Header order and row order are kept. Blank rows are skipped, short rows are
/// padded with missing cells, and every null sentinel becomes `None`.
pub fn read_patient_table(path: &Path, source: &str) -> Result<PatientTable> {
    let file = open_source(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let csv_error = |source: csv::Error| SourceReadError::CsvParse {
        path: path.to_path_buf(),
        source,
    };

    let mut records = reader.records();
    let headers: Vec<String> = loop {
        match records.next() {
            Some(record) => {
                let record = record.map_err(csv_error)?;
                if !is_blank(&record) {
                    break record.iter().map(normalize_header).collect();
                }
            }
            None => {
                return Err(SourceReadError::EmptyCsv {
                    path: path.to_path_buf(),
                });
            }
        }
    };
    let index = ColumnIndex::build(&headers, path)?;

    let mut table = PatientTable {
        source: source.to_string(),
        columns: headers.clone(),
        records: Vec::new(),
    };
    for record in records {
        let record = record.map_err(csv_error)?;
        if is_blank(&record) {
            continue;
        }
        let row = record
            .position()
            .map_or(table.len() + 2, |position| position.line() as usize);
        let cell = |idx: usize| record.get(idx).and_then(normalize_cell);

        let patient_id = cell(index.patient_id)
            .and_then(|value| PatientId::new(value).ok())
            .ok_or_else(|| SourceReadError::MissingPatientId {
                row,
                path: path.to_path_buf(),
            })?;
        let mut patient = PatientRecord::new(patient_id);
        patient.name = cell(index.name);
        patient.dob = cell(index.dob);
        patient.last_visit = cell(index.last_visit);
        patient.diagnosis = cell(index.diagnosis);
        patient.treatment_cost = parse_cost(cell(index.treatment_cost), row, path)?;
        for (idx, header) in headers.iter().enumerate() {
            if !index.is_standard(idx) {
                patient.extra.insert(header.clone(), cell(idx));
            }
        }
        table.push(patient);
    }

    debug!(
        path = %path.display(),
        extra_columns = headers.len().saturating_sub(columns::SOURCE_COLUMNS.len()),
        "read source header"
    );
    info!(
        source = %source,
        rows = table.len(),
        columns = table.columns.len(),
        "loaded patient table"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_header_collapses_whitespace() {
        assert_eq!(normalize_header("\u{feff} Patient   ID "), "Patient ID");
        assert_eq!(normalize_header("DOB"), "DOB");
    }

    #[test]
    fn test_null_sentinels() {
        assert!(is_null_sentinel(""));
        assert!(is_null_sentinel("NaN"));
        assert!(is_null_sentinel("N/A"));
        assert!(!is_null_sentinel("0"));
        assert!(!is_null_sentinel("Nancy"));
    }

    #[test]
    fn test_normalize_cell_maps_sentinels_to_none() {
        assert_eq!(normalize_cell("  flu "), Some("flu".to_string()));
        assert_eq!(normalize_cell("   "), None);
        assert_eq!(normalize_cell("nan"), None);
    }

    #[test]
    fn test_parse_cost() {
        let path = Path::new("t.csv");
        assert_eq!(parse_cost(Some("12.5".into()), 2, path).unwrap(), Some(12.5));
        assert_eq!(parse_cost(None, 2, path).unwrap(), None);
        assert!(matches!(
            parse_cost(Some("inf".into()), 2, path),
            Err(SourceReadError::InvalidNumber { .. })
        ));
    }
}
