//! Append-only audit trail of pipeline stages.
//!
//! Each stage appends one human-readable line. The log is injected into the
//! pipeline driver so tests can capture lines in memory.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::csv_writer::ensure_parent_dir;
use crate::error::{OutputError, Result};

/// Sink for audit lines, in execution order.
pub trait AuditLog {
    fn record(&mut self, line: &str) -> Result<()>;
}

/// Audit log backed by a file opened in append mode.
///
/// Lines from earlier runs are kept; nothing is ever truncated.
#[derive(Debug)]
pub struct FileAuditLog {
    path: PathBuf,
    file: File,
}

impl FileAuditLog {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        ensure_parent_dir(&path)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| OutputError::AuditLog {
                path: path.clone(),
                source,
            })?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditLog for FileAuditLog {
    fn record(&mut self, line: &str) -> Result<()> {
        debug!(path = %self.path.display(), line, "audit");
        writeln!(self.file, "{line}")
            .and_then(|()| self.file.flush())
            .map_err(|source| OutputError::AuditLog {
                path: self.path.clone(),
                source,
            })
    }
}

/// In-memory audit log, for dry runs and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryAuditLog {
    lines: Vec<String>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl AuditLog for MemoryAuditLog {
    fn record(&mut self, line: &str) -> Result<()> {
        self.lines.push(line.to_string());
        Ok(())
    }
}

impl<L: AuditLog + ?Sized> AuditLog for &mut L {
    fn record(&mut self, line: &str) -> Result<()> {
        (**self).record(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_log_keeps_order() {
        let mut log = MemoryAuditLog::new();
        log.record("first").unwrap();
        log.record("second").unwrap();
        assert_eq!(log.lines(), ["first", "second"]);
    }
}
