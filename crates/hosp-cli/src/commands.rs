use anyhow::{Context, Result};
use tracing::{info, info_span};

use hosp_cli::pipeline::{OutputConfig, audit_log_path, run_pipeline};
use hosp_cli::types::{RunResult, SourcePair};
use hosp_model::{CleaningOptions, EmptyMeanPolicy};
use hosp_output::{FileAuditLog, MemoryAuditLog};

use crate::cli::{Cli, EmptyMeanArg};

/// Cleaning options from the config file, with CLI flags taking precedence.
pub fn cleaning_options(cli: &Cli) -> Result<CleaningOptions> {
    let mut options = match &cli.config {
        Some(path) => CleaningOptions::from_toml_file(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => CleaningOptions::default(),
    };
    if let Some(year) = cli.reference_year {
        options = options.with_reference_year(year);
    }
    if let Some(policy) = cli.empty_mean {
        options = options.with_empty_mean(match policy {
            EmptyMeanArg::Zero => EmptyMeanPolicy::Zero,
            EmptyMeanArg::LeaveMissing => EmptyMeanPolicy::LeaveMissing,
        });
    }
    options.validate().context("validate cleaning options")?;
    Ok(options)
}

pub fn run_reconcile(cli: &Cli) -> Result<RunResult> {
    let span = info_span!("reconcile_run", output_dir = %cli.output_dir.display());
    let _guard = span.enter();

    let options = cleaning_options(cli)?;
    let inputs = SourcePair::new(cli.primary.clone(), cli.supplementary.clone());

    if cli.dry_run {
        let outputs = OutputConfig::in_dir(&cli.output_dir).dry_run();
        let mut audit = MemoryAuditLog::new();
        let result = run_pipeline(&inputs, &options, &outputs, &mut audit)?;
        for line in audit.lines() {
            info!(line = %line, "dry run audit");
        }
        return Ok(result);
    }

    let audit_path = audit_log_path(&cli.output_dir);
    let mut audit = FileAuditLog::open(&audit_path)
        .with_context(|| format!("open audit log {}", audit_path.display()))?;
    let outputs = OutputConfig::in_dir(&cli.output_dir);
    let mut result = run_pipeline(&inputs, &options, &outputs, &mut audit)?;
    result.audit_log = Some(audit.path().to_path_buf());
    Ok(result)
}
