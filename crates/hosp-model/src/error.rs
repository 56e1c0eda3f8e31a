use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid patient id: {0:?}")]
    InvalidPatientId(String),

    #[error("invalid date literal {value:?} for {field} (expected DD/MM/YYYY)")]
    InvalidDateLiteral { field: &'static str, value: String },

    /// Options file could not be read.
    #[error("failed to read options file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Options file is not valid TOML or has unknown keys.
    #[error("invalid options file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
