//! Configuration options for the cleaning pipeline.

use std::fs;
use std::path::Path;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::patient::columns;
use crate::{ModelError, Result};

/// Fields the row filter can require to be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequiredField {
    Diagnosis,
    TreatmentCost,
    #[serde(rename = "DOB")]
    Dob,
    LastVisit,
}

impl RequiredField {
    pub fn column(&self) -> &'static str {
        match self {
            RequiredField::Diagnosis => columns::DIAGNOSIS,
            RequiredField::TreatmentCost => columns::TREATMENT_COST,
            RequiredField::Dob => columns::DOB,
            RequiredField::LastVisit => columns::LAST_VISIT,
        }
    }
}

/// What to do when a table has no treatment cost to average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmptyMeanPolicy {
    /// Fill missing costs with 0.
    #[default]
    Zero,
    /// Keep missing costs missing.
    LeaveMissing,
}

/// Options controlling the cleaning stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CleaningOptions {
    /// Records missing any of these fields are dropped before normalization.
    pub required_fields: Vec<RequiredField>,

    /// Replacement for a missing diagnosis.
    pub unknown_diagnosis: String,

    /// Replacement for a missing last visit, as `DD/MM/YYYY`.
    pub default_last_visit: String,

    /// Policy for tables without any treatment cost.
    pub empty_mean: EmptyMeanPolicy,

    /// Year ages are computed against. Defaults to the current year.
    pub reference_year: Option<i32>,
}

impl Default for CleaningOptions {
    fn default() -> Self {
        Self {
            required_fields: vec![RequiredField::Diagnosis, RequiredField::TreatmentCost],
            unknown_diagnosis: "Inconnu".to_string(),
            default_last_visit: "31/12/2024".to_string(),
            empty_mean: EmptyMeanPolicy::default(),
            reference_year: None,
        }
    }
}

impl CleaningOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self> {
        let options: Self = toml::from_str(text).map_err(|source| ModelError::ConfigParse {
            path: origin.to_path_buf(),
            source,
        })?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| ModelError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, path)
    }

    pub fn validate(&self) -> Result<()> {
        if NaiveDate::parse_from_str(&self.default_last_visit, "%d/%m/%Y").is_err() {
            return Err(ModelError::InvalidDateLiteral {
                field: "default_last_visit",
                value: self.default_last_visit.clone(),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn with_required_fields(mut self, fields: Vec<RequiredField>) -> Self {
        self.required_fields = fields;
        self
    }

    #[must_use]
    pub fn with_empty_mean(mut self, policy: EmptyMeanPolicy) -> Self {
        self.empty_mean = policy;
        self
    }

    #[must_use]
    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.reference_year = Some(year);
        self
    }

    /// The configured reference year, or the current local year.
    pub fn reference_year(&self) -> i32 {
        self.reference_year.unwrap_or_else(|| Local::now().year())
    }
}
