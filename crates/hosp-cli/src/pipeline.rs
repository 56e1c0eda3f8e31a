//! Reconciliation pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Load**: Read both source CSV files
//! 2. **Filter**: Drop rows missing required fields
//! 3. **Normalize**: Canonicalize diagnoses and dates
//! 4. **Impute**: Fill remaining gaps per table
//! 5. **Write cleaned**: Persist the cleaned per-source tables
//! 6. **Derive**: Add Age and Statut
//! 7. **Reconcile**: Outer join on PatientID with coalescing
//! 8. **Write final**: Persist the unified table
//!
//! Every stage appends one line to the injected audit log. A failing stage
//! stops the run, so the final table only exists after a complete run.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info, info_span, trace};

use hosp_ingest::read_patient_table;
use hosp_model::{
    CleaningOptions, DerivedTable, PatientTable, RequiredField, UnifiedPatientTable,
};
use hosp_output::{AuditLog, write_patient_table, write_unified_table};
use hosp_transform::{
    FilterReport, ImputationReport, NormalizationReport, derive_table,
    filter_required_with_report, impute_table, normalize_table_with_report,
    reconcile_with_report,
};

use crate::logging::redact_value;
use crate::types::{RunResult, SourcePair, SourceSummary};

pub const DEFAULT_PRIMARY_INPUT: &str = "hospital_data.csv";
pub const DEFAULT_SUPPLEMENTARY_INPUT: &str = "additional_hospital_data.csv";

pub const PRIMARY_CLEANED_FILE: &str = "hospital_cleaned.csv";
pub const SUPPLEMENTARY_CLEANED_FILE: &str = "additional_hospital_cleaned.csv";
pub const FINAL_FILE: &str = "hospital_final.csv";
pub const AUDIT_LOG_FILE: &str = "audit_log.txt";

/// Source labels carried through logs and the audit trail.
pub const PRIMARY_SOURCE: &str = "primary";
pub const SUPPLEMENTARY_SOURCE: &str = "supplementary";

/// Where the pipeline writes its tables.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub cleaned: SourcePair<PathBuf>,
    pub final_table: PathBuf,
    /// When false every stage still runs but nothing is written.
    pub write: bool,
}

impl OutputConfig {
    /// Default file names inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            cleaned: SourcePair::new(
                dir.join(PRIMARY_CLEANED_FILE),
                dir.join(SUPPLEMENTARY_CLEANED_FILE),
            ),
            final_table: dir.join(FINAL_FILE),
            write: true,
        }
    }

    #[must_use]
    pub fn dry_run(mut self) -> Self {
        self.write = false;
        self
    }
}

pub fn audit_log_path(output_dir: &Path) -> PathBuf {
    output_dir.join(AUDIT_LOG_FILE)
}

fn record(audit: &mut dyn AuditLog, line: &str) -> Result<()> {
    debug!(line, "audit");
    audit.record(line).context("append to audit log")
}

// ============================================================================
// Stage 1: Load
// ============================================================================

/// Read both source tables. Any structural problem aborts the run.
pub fn load_sources(inputs: &SourcePair<PathBuf>) -> Result<SourcePair<PatientTable>> {
    let primary = read_patient_table(&inputs.primary, PRIMARY_SOURCE)
        .with_context(|| format!("load {PRIMARY_SOURCE} table"))?;
    let supplementary = read_patient_table(&inputs.supplementary, SUPPLEMENTARY_SOURCE)
        .with_context(|| format!("load {SUPPLEMENTARY_SOURCE} table"))?;
    Ok(SourcePair::new(primary, supplementary))
}

// ============================================================================
// Stages 2-4: Filter, normalize, impute
// ============================================================================

/// Result of cleaning both tables.
#[derive(Debug)]
pub struct CleanResult {
    pub tables: SourcePair<PatientTable>,
    pub filter: SourcePair<FilterReport>,
    pub normalization: SourcePair<NormalizationReport>,
    pub imputation: SourcePair<ImputationReport>,
}

fn describe_fields(options: &CleaningOptions) -> String {
    if options.required_fields.is_empty() {
        return "no required fields".to_string();
    }
    options
        .required_fields
        .iter()
        .map(RequiredField::column)
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_mean(mean: Option<f64>) -> String {
    mean.as_ref()
        .map_or_else(|| "undefined".to_string(), ToString::to_string)
}

/// Filter, normalize and impute both tables, auditing each stage once.
pub fn clean_sources(
    tables: SourcePair<PatientTable>,
    options: &CleaningOptions,
    audit: &mut dyn AuditLog,
) -> Result<CleanResult> {
    let filtered =
        tables.map(|table| filter_required_with_report(table, &options.required_fields));
    let filter = SourcePair::new(filtered.primary.1, filtered.supplementary.1);
    let filtered = filtered.map(|(table, _)| table);
    record(
        audit,
        &format!(
            "Filter: dropped rows missing {} ({} of {} {PRIMARY_SOURCE} rows kept, {} of {} {SUPPLEMENTARY_SOURCE} rows kept)",
            describe_fields(options),
            filter.primary.kept,
            filter.primary.kept + filter.primary.dropped,
            filter.supplementary.kept,
            filter.supplementary.kept + filter.supplementary.dropped,
        ),
    )?;

    let normalized = filtered.map(normalize_table_with_report);
    let normalization = SourcePair::new(normalized.primary.1, normalized.supplementary.1);
    let normalized = normalized.map(|(table, _)| table);
    record(
        audit,
        &format!(
            "Normalize: uppercased and trimmed Diagnosis, rewrote DOB and LastVisit as DD/MM/YYYY ({} {PRIMARY_SOURCE} and {} {SUPPLEMENTARY_SOURCE} dates unparseable)",
            normalization.primary.dob_coerced + normalization.primary.last_visit_coerced,
            normalization.supplementary.dob_coerced
                + normalization.supplementary.last_visit_coerced,
        ),
    )?;

    let imputed = normalized.map(|table| impute_table(table, options));
    let imputation = SourcePair::new(imputed.primary.1, imputed.supplementary.1);
    let tables = imputed.map(|(table, _)| table);
    record(
        audit,
        &format!(
            "Impute: Diagnosis -> '{}', TreatmentCost -> table mean ({PRIMARY_SOURCE} {}, {SUPPLEMENTARY_SOURCE} {}), LastVisit -> {}",
            options.unknown_diagnosis,
            format_mean(imputation.primary.treatment_cost_mean),
            format_mean(imputation.supplementary.treatment_cost_mean),
            options.default_last_visit,
        ),
    )?;

    Ok(CleanResult {
        tables,
        filter,
        normalization,
        imputation,
    })
}

// ============================================================================
// Stage 5: Write cleaned tables
// ============================================================================

/// Persist the cleaned tables. Returns the paths written, if any.
pub fn write_cleaned(
    tables: &SourcePair<PatientTable>,
    outputs: &OutputConfig,
    audit: &mut dyn AuditLog,
) -> Result<Option<SourcePair<PathBuf>>> {
    if !outputs.write {
        record(audit, "Write cleaned: skipped (dry run)")?;
        return Ok(None);
    }
    write_patient_table(&tables.primary, &outputs.cleaned.primary)
        .with_context(|| format!("write {PRIMARY_SOURCE} cleaned table"))?;
    write_patient_table(&tables.supplementary, &outputs.cleaned.supplementary)
        .with_context(|| format!("write {SUPPLEMENTARY_SOURCE} cleaned table"))?;
    record(
        audit,
        &format!(
            "Write cleaned: saved {} and {}",
            outputs.cleaned.primary.display(),
            outputs.cleaned.supplementary.display()
        ),
    )?;
    Ok(Some(outputs.cleaned.clone()))
}

// ============================================================================
// Stages 6-7: Derive, reconcile
// ============================================================================

pub fn derive_sources(
    tables: SourcePair<PatientTable>,
    reference_year: i32,
    audit: &mut dyn AuditLog,
) -> Result<SourcePair<DerivedTable>> {
    let derived = tables.map(|table| derive_table(table, reference_year));
    record(
        audit,
        &format!(
            "Derive: added Age (reference year {reference_year}) and Statut to {} {PRIMARY_SOURCE} and {} {SUPPLEMENTARY_SOURCE} rows",
            derived.primary.len(),
            derived.supplementary.len(),
        ),
    )?;
    Ok(derived)
}

pub fn reconcile_sources(
    derived: SourcePair<DerivedTable>,
    audit: &mut dyn AuditLog,
) -> Result<(UnifiedPatientTable, hosp_transform::ReconcileReport)> {
    let (unified, report) = reconcile_with_report(derived.primary, derived.supplementary);
    for row in &unified.records {
        trace!(
            patient_id = redact_value(row.patient_id.as_str()),
            statut = ?row.statut,
            "unified patient"
        );
    }
    record(
        audit,
        &format!(
            "Reconcile: merged on PatientID into {} patients ({} in both, {} {PRIMARY_SOURCE} only, {} {SUPPLEMENTARY_SOURCE} only, {} duplicates dropped)",
            unified.len(),
            report.matched,
            report.primary_only,
            report.supplementary_only,
            report.duplicates_dropped,
        ),
    )?;
    Ok((unified, report))
}

// ============================================================================
// Stage 8: Write final table
// ============================================================================

pub fn write_final(
    unified: &UnifiedPatientTable,
    outputs: &OutputConfig,
    audit: &mut dyn AuditLog,
) -> Result<Option<PathBuf>> {
    if !outputs.write {
        record(audit, "Write final: skipped (dry run)")?;
        return Ok(None);
    }
    write_unified_table(unified, &outputs.final_table).context("write final table")?;
    record(
        audit,
        &format!(
            "Write final: saved {} rows to {}",
            unified.len(),
            outputs.final_table.display()
        ),
    )?;
    Ok(Some(outputs.final_table.clone()))
}

// ============================================================================
// Driver
// ============================================================================

/// Run every stage in order against the two inputs.
pub fn run_pipeline(
    inputs: &SourcePair<PathBuf>,
    options: &CleaningOptions,
    outputs: &OutputConfig,
    audit: &mut dyn AuditLog,
) -> Result<RunResult> {
    let span = info_span!(
        "pipeline",
        primary = %inputs.primary.display(),
        supplementary = %inputs.supplementary.display()
    );
    let _guard = span.enter();
    let start = Instant::now();
    let reference_year = options.reference_year();

    let tables = info_span!("load").in_scope(|| load_sources(inputs))?;
    let loaded = tables.as_ref().map(PatientTable::len);
    record(
        audit,
        &format!(
            "Load: read {} rows from {} and {} rows from {}",
            loaded.primary,
            inputs.primary.display(),
            loaded.supplementary,
            inputs.supplementary.display()
        ),
    )?;

    let CleanResult {
        tables,
        filter,
        normalization,
        imputation,
    } = clean_sources(tables, options, audit)?;
    let cleaned_output = write_cleaned(&tables, outputs, audit)?;
    let derived = derive_sources(tables, reference_year, audit)?;
    let (unified, reconcile) = reconcile_sources(derived, audit)?;
    let final_output = write_final(&unified, outputs, audit)?;

    let cleaned_paths = match cleaned_output {
        Some(paths) => paths.map(Some),
        None => SourcePair::new(None, None),
    };
    let sources = SourcePair::new(
        SourceSummary {
            source: PRIMARY_SOURCE.to_string(),
            input: inputs.primary.clone(),
            loaded: loaded.primary,
            kept: filter.primary.kept,
            normalization: normalization.primary,
            imputation: imputation.primary,
            cleaned_output: cleaned_paths.primary,
        },
        SourceSummary {
            source: SUPPLEMENTARY_SOURCE.to_string(),
            input: inputs.supplementary.clone(),
            loaded: loaded.supplementary,
            kept: filter.supplementary.kept,
            normalization: normalization.supplementary,
            imputation: imputation.supplementary,
            cleaned_output: cleaned_paths.supplementary,
        },
    );

    info!(
        rows = unified.len(),
        dry_run = !outputs.write,
        duration_ms = start.elapsed().as_millis(),
        "pipeline complete"
    );
    Ok(RunResult {
        sources,
        reconcile,
        unified_rows: unified.len(),
        reference_year,
        final_output,
        audit_log: None,
        dry_run: !outputs.write,
    })
}
