//! Outer join of the primary and supplementary tables on PatientID.

use std::collections::BTreeMap;

use tracing::{debug, info_span, warn};

use hosp_model::{
    DerivedRecord, DerivedTable, PatientId, PatientRecord, UnifiedPatientRecord,
    UnifiedPatientTable,
};

/// First present value, primary before supplementary.
pub fn coalesce<T>(primary: Option<T>, supplementary: Option<T>) -> Option<T> {
    primary.or(supplementary)
}

/// Join statistics for one reconciliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub matched: usize,
    pub primary_only: usize,
    pub supplementary_only: usize,
    /// Repeated ids within one side that were dropped.
    pub duplicates_dropped: usize,
}

#[derive(Default)]
struct Sides {
    primary: Option<DerivedRecord>,
    supplementary: Option<DerivedRecord>,
}

impl Sides {
    fn primary_slot(&mut self) -> &mut Option<DerivedRecord> {
        &mut self.primary
    }

    fn supplementary_slot(&mut self) -> &mut Option<DerivedRecord> {
        &mut self.supplementary
    }
}

fn coalesce_field<T>(
    primary: Option<&PatientRecord>,
    supplementary: Option<&PatientRecord>,
    get: impl Fn(&PatientRecord) -> Option<T>,
) -> Option<T> {
    coalesce(primary.and_then(&get), supplementary.and_then(&get))
}

fn unify(id: PatientId, sides: Sides) -> UnifiedPatientRecord {
    let (p_rec, p_age, p_statut) = match sides.primary {
        Some(d) => (Some(d.record), d.age, Some(d.statut)),
        None => (None, None, None),
    };
    let (s_rec, s_age, s_statut) = match sides.supplementary {
        Some(d) => (Some(d.record), d.age, Some(d.statut)),
        None => (None, None, None),
    };
    let (p, s) = (p_rec.as_ref(), s_rec.as_ref());

    UnifiedPatientRecord {
        patient_id: id,
        nom: coalesce_field(p, s, |r| r.name.clone()),
        dob: coalesce_field(p, s, |r| r.dob.clone()),
        diagnosis: coalesce_field(p, s, |r| r.diagnosis.clone()),
        last_visit: coalesce_field(p, s, |r| r.last_visit.clone()),
        treatment_cost: coalesce_field(p, s, |r| r.treatment_cost),
        age: coalesce(p_age, s_age),
        statut: coalesce(p_statut, s_statut),
    }
}

fn insert_side(
    joined: &mut BTreeMap<PatientId, Sides>,
    table: DerivedTable,
    pick: fn(&mut Sides) -> &mut Option<DerivedRecord>,
    report: &mut ReconcileReport,
) {
    let mut duplicates = 0usize;
    for derived in table.records {
        let slot = pick(joined.entry(derived.record.patient_id.clone()).or_default());
        if slot.is_some() {
            duplicates += 1;
        } else {
            *slot = Some(derived);
        }
    }
    if duplicates > 0 {
        warn!(
            source = %table.source,
            duplicates,
            "duplicate patient ids; keeping the first record of each"
        );
        report.duplicates_dropped += duplicates;
    }
}

/// Full outer join on PatientID with per-field left-biased coalescing.
///
/// One output row per distinct id, ordered by id. Columns other than the
/// unified set are dropped.
pub fn reconcile_with_report(
    primary: DerivedTable,
    supplementary: DerivedTable,
) -> (UnifiedPatientTable, ReconcileReport) {
    let span = info_span!(
        "reconcile",
        primary = %primary.source,
        supplementary = %supplementary.source
    );
    let _guard = span.enter();

    let mut report = ReconcileReport::default();
    let mut joined: BTreeMap<PatientId, Sides> = BTreeMap::new();
    insert_side(&mut joined, primary, Sides::primary_slot, &mut report);
    insert_side(
        &mut joined,
        supplementary,
        Sides::supplementary_slot,
        &mut report,
    );

    let records = joined
        .into_iter()
        .map(|(id, sides)| {
            match (&sides.primary, &sides.supplementary) {
                (Some(_), Some(_)) => report.matched += 1,
                (Some(_), None) => report.primary_only += 1,
                (None, Some(_)) => report.supplementary_only += 1,
                (None, None) => {}
            }
            unify(id, sides)
        })
        .collect();

    debug!(
        matched = report.matched,
        primary_only = report.primary_only,
        supplementary_only = report.supplementary_only,
        duplicates_dropped = report.duplicates_dropped,
        "reconciled tables"
    );
    (UnifiedPatientTable { records }, report)
}

pub fn reconcile(primary: DerivedTable, supplementary: DerivedTable) -> UnifiedPatientTable {
    reconcile_with_report(primary, supplementary).0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coalesce_prefers_primary() {
        assert_eq!(coalesce(Some(1), Some(2)), Some(1));
        assert_eq!(coalesce(None, Some(2)), Some(2));
        assert_eq!(coalesce::<i32>(None, None), None);
    }
}
