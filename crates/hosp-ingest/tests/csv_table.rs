use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use hosp_ingest::{SourceReadError, read_patient_table};

fn create_temp_csv(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file
}

const HEADER: &str = "PatientID,Name,DOB,LastVisit,Diagnosis,TreatmentCost";

#[test]
fn reads_rows_in_order_with_typed_fields() {
    let file = create_temp_csv(&format!(
        "{HEADER}\n1,Alice,1990-03-15,2024-01-02, healthy ,100\n2,Bob,,,flu,250.5\n"
    ));
    let table = read_patient_table(file.path(), "primary").expect("read csv");

    assert_eq!(table.source, "primary");
    assert_eq!(table.len(), 2);
    let first = &table.records[0];
    assert_eq!(first.patient_id.as_str(), "1");
    assert_eq!(first.name.as_deref(), Some("Alice"));
    assert_eq!(first.dob.as_deref(), Some("1990-03-15"));
    assert_eq!(first.diagnosis.as_deref(), Some("healthy"));
    assert_eq!(first.treatment_cost, Some(100.0));

    let second = &table.records[1];
    assert_eq!(second.patient_id.as_str(), "2");
    assert_eq!(second.dob, None);
    assert_eq!(second.last_visit, None);
    assert_eq!(second.treatment_cost, Some(250.5));
}

#[test]
fn na_markers_become_missing() {
    let file = create_temp_csv(&format!("{HEADER}\n3,Carol,NaN,N/A,NULL,nan\n"));
    let table = read_patient_table(file.path(), "primary").expect("read csv");

    let record = &table.records[0];
    assert_eq!(record.dob, None);
    assert_eq!(record.last_visit, None);
    assert_eq!(record.diagnosis, None);
    assert_eq!(record.treatment_cost, None);
}

#[test]
fn keeps_extra_columns_and_header_order() {
    let file = create_temp_csv(
        "Ward,PatientID,Name,DOB,LastVisit,Diagnosis,TreatmentCost\nB2,4,Dan,,,flu,10\n",
    );
    let table = read_patient_table(file.path(), "primary").expect("read csv");

    assert_eq!(
        table.columns,
        vec![
            "Ward",
            "PatientID",
            "Name",
            "DOB",
            "LastVisit",
            "Diagnosis",
            "TreatmentCost"
        ]
    );
    assert_eq!(
        table.records[0].extra.get("Ward"),
        Some(&Some("B2".to_string()))
    );
}

#[test]
fn skips_blank_rows_and_pads_short_rows() {
    let file = create_temp_csv(&format!("{HEADER}\n\n5,Eve,1980-01-01\n,,,,,\n"));
    let table = read_patient_table(file.path(), "primary").expect("read csv");

    assert_eq!(table.len(), 1);
    assert_eq!(table.records[0].diagnosis, None);
    assert_eq!(table.records[0].treatment_cost, None);
}

#[test]
fn strips_utf8_bom_from_header() {
    let file = create_temp_csv(&format!("\u{feff}{HEADER}\n6,Fay,,,flu,1\n"));
    let table = read_patient_table(file.path(), "primary").expect("read csv");
    assert_eq!(table.columns[0], "PatientID");
}

#[test]
fn missing_file_is_file_not_found() {
    let result = read_patient_table(Path::new("/nonexistent/hospital_data.csv"), "primary");
    assert!(matches!(result, Err(SourceReadError::FileNotFound { .. })));
}

#[test]
fn empty_file_is_rejected() {
    let file = create_temp_csv("");
    let result = read_patient_table(file.path(), "primary");
    assert!(matches!(result, Err(SourceReadError::EmptyCsv { .. })));
}

#[test]
fn missing_required_column_is_rejected() {
    let file = create_temp_csv("PatientID,Name,DOB,LastVisit,Diagnosis\n1,A,,,flu\n");
    let result = read_patient_table(file.path(), "primary");
    match result {
        Err(SourceReadError::MissingColumn { column, .. }) => {
            assert_eq!(column, "TreatmentCost");
        }
        other => panic!("expected missing column, got {other:?}"),
    }
}

#[test]
fn non_numeric_cost_is_rejected_with_row() {
    let file = create_temp_csv(&format!("{HEADER}\n1,A,,,flu,10\n2,B,,,flu,lots\n"));
    let result = read_patient_table(file.path(), "primary");
    match result {
        Err(SourceReadError::InvalidNumber { value, row, .. }) => {
            assert_eq!(value, "lots");
            assert_eq!(row, 3);
        }
        other => panic!("expected invalid number, got {other:?}"),
    }
}

#[test]
fn blank_patient_id_is_rejected() {
    let file = create_temp_csv(&format!("{HEADER}\n,A,,,flu,10\n"));
    let result = read_patient_table(file.path(), "primary");
    assert!(matches!(
        result,
        Err(SourceReadError::MissingPatientId { row: 2, .. })
    ));
}
