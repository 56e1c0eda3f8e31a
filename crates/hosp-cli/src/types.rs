use std::path::PathBuf;

use hosp_transform::{ImputationReport, NormalizationReport, ReconcileReport};

/// Both inputs of the pipeline, or anything computed per input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourcePair<T> {
    pub primary: T,
    pub supplementary: T,
}

impl<T> SourcePair<T> {
    pub fn new(primary: T, supplementary: T) -> Self {
        Self {
            primary,
            supplementary,
        }
    }

    pub fn as_ref(&self) -> SourcePair<&T> {
        SourcePair::new(&self.primary, &self.supplementary)
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> SourcePair<U> {
        SourcePair::new(f(self.primary), f(self.supplementary))
    }
}

#[derive(Debug, Clone)]
pub struct SourceSummary {
    pub source: String,
    pub input: PathBuf,
    pub loaded: usize,
    pub kept: usize,
    pub normalization: NormalizationReport,
    pub imputation: ImputationReport,
    pub cleaned_output: Option<PathBuf>,
}

impl SourceSummary {
    pub fn dropped(&self) -> usize {
        self.loaded.saturating_sub(self.kept)
    }
}

#[derive(Debug, Clone)]
pub struct RunResult {
    pub sources: SourcePair<SourceSummary>,
    pub reconcile: ReconcileReport,
    pub unified_rows: usize,
    pub reference_year: i32,
    pub final_output: Option<PathBuf>,
    pub audit_log: Option<PathBuf>,
    pub dry_run: bool,
}
