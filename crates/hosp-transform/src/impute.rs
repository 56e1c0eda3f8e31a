//! Missing-value imputation.
//!
//! Each table is imputed from its own statistics only. The treatment cost mean
//! is computed once, from the values present before any fill, so imputed values
//! never feed back into the mean.

use tracing::{debug, info_span, warn};

use hosp_model::{CleaningOptions, EmptyMeanPolicy, PatientRecord, PatientTable};

/// What the imputer filled in for one table.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ImputationReport {
    pub diagnosis_filled: usize,
    pub treatment_cost_filled: usize,
    pub last_visit_filled: usize,
    /// Mean of the non-missing costs, `None` if the table had none.
    pub treatment_cost_mean: Option<f64>,
}

/// Arithmetic mean of the present treatment costs.
pub fn mean_treatment_cost(records: &[PatientRecord]) -> Option<f64> {
    let (sum, count) = records
        .iter()
        .filter_map(|record| record.treatment_cost)
        .fold((0.0_f64, 0usize), |(sum, count), cost| (sum + cost, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Fill missing Diagnosis, TreatmentCost and LastVisit values.
pub fn impute_table(
    table: PatientTable,
    options: &CleaningOptions,
) -> (PatientTable, ImputationReport) {
    let span = info_span!("impute", source = %table.source);
    let _guard = span.enter();

    let mean = mean_treatment_cost(&table.records);
    let mut report = ImputationReport {
        treatment_cost_mean: mean,
        ..ImputationReport::default()
    };

    let cost_fill = match (mean, options.empty_mean) {
        (Some(mean), _) => Some(mean),
        (None, EmptyMeanPolicy::Zero) => Some(0.0),
        (None, EmptyMeanPolicy::LeaveMissing) => None,
    };
    let missing_costs = table
        .iter()
        .filter(|record| record.treatment_cost.is_none())
        .count();
    if mean.is_none() && missing_costs > 0 {
        warn!(
            missing = missing_costs,
            policy = ?options.empty_mean,
            "no treatment cost to average; applying empty-mean policy"
        );
    }

    let PatientTable {
        source,
        columns,
        records,
    } = table;
    let records = records
        .into_iter()
        .map(|mut record| {
            if record.diagnosis.is_none() {
                record.diagnosis = Some(options.unknown_diagnosis.clone());
                report.diagnosis_filled += 1;
            }
            if record.treatment_cost.is_none() && cost_fill.is_some() {
                record.treatment_cost = cost_fill;
                report.treatment_cost_filled += 1;
            }
            if record.last_visit.is_none() {
                record.last_visit = Some(options.default_last_visit.clone());
                report.last_visit_filled += 1;
            }
            record
        })
        .collect();

    debug!(
        diagnosis_filled = report.diagnosis_filled,
        treatment_cost_filled = report.treatment_cost_filled,
        last_visit_filled = report.last_visit_filled,
        mean = ?report.treatment_cost_mean,
        "imputed missing values"
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

#[cfg(test)]
mod tests {
    use super::*;
    use hosp_model::PatientId;

    fn record(id: &str) -> PatientRecord {
        PatientRecord::new(PatientId::new(id).unwrap())
    }

    fn costs(table: &PatientTable) -> Vec<Option<f64>> {
        table.iter().map(|r| r.treatment_cost).collect()
    }

    #[test]
    fn test_mean_ignores_missing() {
        let records = vec![
            record("1").with_treatment_cost(100.0),
            record("2"),
            record("3").with_treatment_cost(300.0),
        ];
        assert_eq!(mean_treatment_cost(&records), Some(200.0));
        assert_eq!(mean_treatment_cost(&[record("4")]), None);
    }

    #[test]
    fn test_fills_literals() {
        let table = PatientTable::from_records("primary", vec![record("1")]);
        let (table, report) = impute_table(table, &CleaningOptions::default());
        let imputed = &table.records[0];
        assert_eq!(imputed.diagnosis.as_deref(), Some("Inconnu"));
        assert_eq!(imputed.last_visit.as_deref(), Some("31/12/2024"));
        assert_eq!(report.diagnosis_filled, 1);
        assert_eq!(report.last_visit_filled, 1);
    }

    #[test]
    fn test_present_values_are_untouched() {
        let table = PatientTable::from_records(
            "primary",
            vec![
                record("1")
                    .with_diagnosis("FLU")
                    .with_last_visit("02/01/2024")
                    .with_treatment_cost(12.0),
            ],
        );
        let (imputed, report) = impute_table(table.clone(), &CleaningOptions::default());
        assert_eq!(imputed, table);
        assert_eq!(report.diagnosis_filled, 0);
        assert_eq!(report.treatment_cost_filled, 0);
    }

    #[test]
    fn test_empty_mean_zero_policy() {
        let table = PatientTable::from_records("primary", vec![record("1"), record("2")]);
        let (table, report) = impute_table(table, &CleaningOptions::default());
        assert_eq!(costs(&table), vec![Some(0.0), Some(0.0)]);
        assert_eq!(report.treatment_cost_mean, None);
        assert_eq!(report.treatment_cost_filled, 2);
    }

    #[test]
    fn test_empty_mean_leave_missing_policy() {
        let options = CleaningOptions::default().with_empty_mean(EmptyMeanPolicy::LeaveMissing);
        let table = PatientTable::from_records("primary", vec![record("1")]);
        let (table, report) = impute_table(table, &options);
        assert_eq!(costs(&table), vec![None]);
        assert_eq!(report.treatment_cost_filled, 0);
    }

    #[test]
    fn test_tables_use_their_own_mean() {
        let primary = PatientTable::from_records(
            "primary",
            vec![record("1").with_treatment_cost(10.0), record("2")],
        );
        let supplementary = PatientTable::from_records(
            "supplementary",
            vec![record("3").with_treatment_cost(1000.0), record("4")],
        );
        let options = CleaningOptions::default();
        let (primary, _) = impute_table(primary, &options);
        let (supplementary, _) = impute_table(supplementary, &options);
        assert_eq!(costs(&primary), vec![Some(10.0), Some(10.0)]);
        assert_eq!(costs(&supplementary), vec![Some(1000.0), Some(1000.0)]);
    }
}
