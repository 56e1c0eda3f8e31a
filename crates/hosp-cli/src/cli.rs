//! CLI argument definitions for the reconciliation tool.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use hosp_cli::pipeline::{DEFAULT_PRIMARY_INPUT, DEFAULT_SUPPLEMENTARY_INPUT};

#[derive(Parser)]
#[command(
    name = "hosp-reconcile",
    version,
    about = "Clean two hospital patient files and merge them into one table",
    long_about = "Clean two hospital patient CSV files and reconcile them on PatientID.\n\n\
                  Writes one cleaned CSV per input, the unified hospital_final.csv, and\n\
                  appends one line per stage to audit_log.txt in the output directory."
)]
pub struct Cli {
    /// Primary patient file; its values win when both files have one.
    #[arg(value_name = "PRIMARY", default_value = DEFAULT_PRIMARY_INPUT)]
    pub primary: PathBuf,

    /// Supplementary patient file, used to fill gaps and add patients.
    #[arg(value_name = "SUPPLEMENTARY", default_value = DEFAULT_SUPPLEMENTARY_INPUT)]
    pub supplementary: PathBuf,

    /// Output directory for cleaned tables, the final table and the audit log.
    #[arg(long = "output-dir", value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// TOML file with cleaning options.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Year ages are computed against (default: current year).
    #[arg(long = "reference-year", value_name = "YEAR")]
    pub reference_year: Option<i32>,

    /// What to fill missing treatment costs with when a table has none to average.
    #[arg(long = "empty-mean", value_enum)]
    pub empty_mean: Option<EmptyMeanArg>,

    /// Run every stage without writing any file.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Allow patient values in trace logs.
    #[arg(long = "log-data")]
    pub log_data: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum EmptyMeanArg {
    Zero,
    LeaveMissing,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
