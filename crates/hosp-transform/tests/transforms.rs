//! Stage-level behavior of the cleaning and reconciliation pipeline.

use hosp_model::{
    CleaningOptions, PatientId, PatientRecord, PatientTable, RequiredField, Statut,
};
use hosp_transform::{
    derive_table, filter_required, impute_table, normalize_table, reconcile,
    reconcile_with_report,
};

fn id(value: &str) -> PatientId {
    PatientId::new(value).unwrap()
}

fn record(value: &str) -> PatientRecord {
    PatientRecord::new(id(value))
}

/// Filter, normalize, impute and derive one table with default options.
fn clean(table: PatientTable, options: &CleaningOptions, year: i32) -> hosp_model::DerivedTable {
    let table = filter_required(table, &options.required_fields);
    let table = normalize_table(table);
    let (table, _) = impute_table(table, options);
    derive_table(table, year)
}

#[test]
fn normalization_is_idempotent() {
    let table = PatientTable::from_records(
        "primary",
        vec![
            record("1")
                .with_diagnosis(" healthy ")
                .with_dob("1990-03-15")
                .with_last_visit("Jan 15, 2024"),
            record("2").with_diagnosis("FLU").with_dob("garbage"),
        ],
    );
    let once = normalize_table(table);
    let twice = normalize_table(once.clone());
    assert_eq!(once, twice);
    assert_eq!(once.records[0].dob.as_deref(), Some("15/03/1990"));
    assert_eq!(once.records[0].last_visit.as_deref(), Some("15/01/2024"));
    assert_eq!(once.records[1].dob, None);
}

#[test]
fn imputed_cost_is_mean_of_present_values() {
    let table = PatientTable::from_records(
        "primary",
        vec![
            record("1").with_treatment_cost(100.0),
            record("2"),
            record("3").with_treatment_cost(300.0),
        ],
    );
    let (table, report) = impute_table(table, &CleaningOptions::default());
    let costs: Vec<Option<f64>> = table.iter().map(|r| r.treatment_cost).collect();
    assert_eq!(costs, vec![Some(100.0), Some(200.0), Some(300.0)]);
    assert_eq!(report.treatment_cost_mean, Some(200.0));
    assert_eq!(report.treatment_cost_filled, 1);
}

#[test]
fn status_follows_normalized_diagnosis() {
    let table = PatientTable::from_records(
        "primary",
        vec![
            record("1").with_diagnosis("healthy").with_treatment_cost(1.0),
            record("2").with_diagnosis("flu").with_treatment_cost(1.0),
        ],
    );
    let derived = clean(table, &CleaningOptions::default(), 2025);
    assert_eq!(derived.records[0].record.diagnosis.as_deref(), Some("HEALTHY"));
    assert_eq!(derived.records[0].statut, Statut::Sain);
    assert_eq!(derived.records[1].record.diagnosis.as_deref(), Some("FLU"));
    assert_eq!(derived.records[1].statut, Statut::Malade);
}

#[test]
fn age_is_naive_year_difference() {
    let table = PatientTable::from_records(
        "primary",
        vec![
            record("1")
                .with_diagnosis("flu")
                .with_treatment_cost(1.0)
                .with_dob("15/03/1990"),
            record("2")
                .with_diagnosis("flu")
                .with_treatment_cost(1.0)
                .with_dob("31/12/1990"),
        ],
    );
    let derived = clean(table, &CleaningOptions::default(), 2025);
    // Both count as 35 in 2025 regardless of birthday.
    assert_eq!(derived.records[0].age, Some(35));
    assert_eq!(derived.records[1].age, Some(35));
}

#[test]
fn reconciliation_keeps_one_row_per_id_with_primary_values() {
    let options = CleaningOptions::default();
    let primary = PatientTable::from_records(
        "primary",
        vec![record("7").with_diagnosis("flu").with_treatment_cost(10.0)],
    );
    let supplementary = PatientTable::from_records(
        "supplementary",
        vec![
            record("7")
                .with_diagnosis("healthy")
                .with_treatment_cost(20.0)
                .with_name("Grace"),
        ],
    );
    let unified = reconcile(
        clean(primary, &options, 2025),
        clean(supplementary, &options, 2025),
    );

    assert_eq!(unified.len(), 1);
    let row = unified.find(&id("7")).expect("patient 7");
    assert_eq!(row.diagnosis.as_deref(), Some("FLU"));
    assert_eq!(row.treatment_cost, Some(10.0));
    assert_eq!(row.statut, Some(Statut::Malade));
    // Missing on the primary side, so taken from the supplementary one.
    assert_eq!(row.nom.as_deref(), Some("Grace"));
}

#[test]
fn supplementary_only_ids_still_appear() {
    let options = CleaningOptions::default();
    let primary = PatientTable::from_records(
        "primary",
        vec![record("1").with_diagnosis("flu").with_treatment_cost(10.0)],
    );
    let supplementary = PatientTable::from_records(
        "supplementary",
        vec![
            record("9")
                .with_name("Ivan")
                .with_diagnosis("healthy")
                .with_treatment_cost(40.0)
                .with_dob("2000-06-01"),
        ],
    );
    let (unified, report) = reconcile_with_report(
        clean(primary, &options, 2025),
        clean(supplementary, &options, 2025),
    );

    assert_eq!(unified.len(), 2);
    assert_eq!(report.primary_only, 1);
    assert_eq!(report.supplementary_only, 1);
    let row = unified.find(&id("9")).expect("patient 9");
    assert_eq!(row.nom.as_deref(), Some("Ivan"));
    assert_eq!(row.diagnosis.as_deref(), Some("HEALTHY"));
    assert_eq!(row.dob.as_deref(), Some("01/06/2000"));
    assert_eq!(row.age, Some(25));
    assert_eq!(row.statut, Some(Statut::Sain));
}

#[test]
fn unified_rows_are_ordered_by_numeric_id() {
    let options = CleaningOptions::default();
    let make = |ids: &[&str], source: &str| {
        PatientTable::from_records(
            source,
            ids.iter()
                .map(|value| record(value).with_diagnosis("flu").with_treatment_cost(1.0))
                .collect(),
        )
    };
    let unified = reconcile(
        clean(make(&["10", "2"], "primary"), &options, 2025),
        clean(make(&["1", "2"], "supplementary"), &options, 2025),
    );
    let ids: Vec<&str> = unified
        .records
        .iter()
        .map(|r| r.patient_id.as_str())
        .collect();
    assert_eq!(ids, vec!["1", "2", "10"]);
}

#[test]
fn duplicate_ids_within_a_side_keep_the_first() {
    let options = CleaningOptions::default();
    let primary = PatientTable::from_records(
        "primary",
        vec![
            record("3").with_diagnosis("flu").with_treatment_cost(1.0),
            record("3").with_diagnosis("cold").with_treatment_cost(2.0),
        ],
    );
    let supplementary = PatientTable::new("supplementary");
    let (unified, report) = reconcile_with_report(
        clean(primary, &options, 2025),
        clean(supplementary, &options, 2025),
    );
    assert_eq!(unified.len(), 1);
    assert_eq!(report.duplicates_dropped, 1);
    assert_eq!(unified.records[0].diagnosis.as_deref(), Some("FLU"));
}

#[test]
fn end_to_end_example_row() {
    // TreatmentCost is not required here so the null-cost row reaches the imputer.
    let options = CleaningOptions::default()
        .with_required_fields(vec![RequiredField::Diagnosis])
        .with_reference_year(2025);
    let primary = PatientTable::from_records(
        "primary",
        vec![
            record("1").with_diagnosis(" healthy ").with_dob("1990-03-15"),
            record("2").with_diagnosis("flu").with_treatment_cost(100.0),
            record("3").with_diagnosis("flu").with_treatment_cost(200.0),
        ],
    );
    let derived = clean(primary, &options, options.reference_year());
    let unified = reconcile(
        derived,
        clean(PatientTable::new("supplementary"), &options, 2025),
    );

    let row = unified.find(&id("1")).expect("patient 1");
    assert_eq!(row.diagnosis.as_deref(), Some("HEALTHY"));
    assert_eq!(row.treatment_cost, Some(150.0));
    assert_eq!(row.last_visit.as_deref(), Some("31/12/2024"));
    assert_eq!(row.dob.as_deref(), Some("15/03/1990"));
    assert_eq!(row.age, Some(2025 - 1990));
    assert_eq!(row.statut, Some(Statut::Sain));
}

#[test]
fn default_filter_drops_rows_before_imputation() {
    let primary = PatientTable::from_records(
        "primary",
        vec![
            record("1").with_diagnosis("flu"),
            record("2").with_treatment_cost(5.0),
            record("3").with_diagnosis("flu").with_treatment_cost(5.0),
        ],
    );
    let derived = clean(primary, &CleaningOptions::default(), 2025);
    assert_eq!(derived.len(), 1);
    assert_eq!(derived.records[0].record.patient_id.as_str(), "3");
}
