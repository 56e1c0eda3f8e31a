//! Integration tests for the CSV writers.

use std::fs;

use tempfile::TempDir;

use hosp_model::{
    PatientId, PatientRecord, PatientTable, Statut, UnifiedPatientRecord, UnifiedPatientTable,
};
use hosp_output::{OutputError, write_patient_table, write_unified_table};

fn id(value: &str) -> PatientId {
    PatientId::new(value).unwrap()
}

fn unified(value: &str) -> UnifiedPatientRecord {
    UnifiedPatientRecord {
        patient_id: id(value),
        nom: None,
        dob: None,
        diagnosis: None,
        last_visit: None,
        treatment_cost: None,
        age: None,
        statut: None,
    }
}

#[test]
fn test_cleaned_table_keeps_header_order_and_extras() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hospital_cleaned.csv");

    let mut table = PatientTable::new("primary");
    table.columns = vec![
        "PatientID".to_string(),
        "Diagnosis".to_string(),
        "Ward".to_string(),
        "Name".to_string(),
        "DOB".to_string(),
        "LastVisit".to_string(),
        "TreatmentCost".to_string(),
    ];
    let mut first = PatientRecord::new(id("1"))
        .with_name("Ada")
        .with_diagnosis("HEALTHY")
        .with_dob("15/03/1990")
        .with_last_visit("31/12/2024")
        .with_treatment_cost(150.0);
    first.extra.insert("Ward".to_string(), Some("B, east".to_string()));
    let second = PatientRecord::new(id("2"))
        .with_diagnosis("FLU")
        .with_last_visit("02/01/2024")
        .with_treatment_cost(99.5);
    table.push(first);
    table.push(second);

    write_patient_table(&table, &path).unwrap();
    let written = fs::read_to_string(&path).unwrap();
    insta::assert_snapshot!(written, @r#"
    PatientID,Diagnosis,Ward,Name,DOB,LastVisit,TreatmentCost
    1,HEALTHY,"B, east",Ada,15/03/1990,31/12/2024,150
    2,FLU,,,,02/01/2024,99.5
    "#);
}

#[test]
fn test_unified_table_columns_and_nulls() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hospital_final.csv");

    let table = UnifiedPatientTable {
        records: vec![
            UnifiedPatientRecord {
                nom: Some("Ada".to_string()),
                dob: Some("15/03/1990".to_string()),
                diagnosis: Some("HEALTHY".to_string()),
                last_visit: Some("31/12/2024".to_string()),
                treatment_cost: Some(150.0),
                age: Some(35),
                statut: Some(Statut::Sain),
                ..unified("1")
            },
            UnifiedPatientRecord {
                diagnosis: Some("FLU".to_string()),
                treatment_cost: Some(20.25),
                statut: Some(Statut::Malade),
                ..unified("7")
            },
        ],
    };

    write_unified_table(&table, &path).unwrap();
    let written = fs::read_to_string(&path).unwrap();
    insta::assert_snapshot!(written, @r"
    PatientID,Nom,DOB,Diagnosis,LastVisit,TreatmentCost,Age,Statut
    1,Ada,15/03/1990,HEALTHY,31/12/2024,150,35,Sain
    7,,,FLU,,20.25,,Malade
    ");
}

#[test]
fn test_empty_unified_table_writes_header_only() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("final.csv");

    write_unified_table(&UnifiedPatientTable::default(), &path).unwrap();
    let written = fs::read_to_string(&path).unwrap();
    assert_eq!(
        written,
        "PatientID,Nom,DOB,Diagnosis,LastVisit,TreatmentCost,Age,Statut\n"
    );
}

#[test]
fn test_creates_missing_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("out").join("cleaned.csv");

    write_patient_table(&PatientTable::new("primary"), &path).unwrap();
    assert!(path.exists());
}

#[test]
fn test_unwritable_target_is_an_error() {
    let dir = TempDir::new().unwrap();
    // The target is an existing directory, so it cannot be opened as a file.
    let err = write_unified_table(&UnifiedPatientTable::default(), dir.path()).unwrap_err();
    assert!(matches!(err, OutputError::Csv { .. }));
}
