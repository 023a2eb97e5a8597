//! Append-only JSONL journal of recorded changes

use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use tracing::warn;

use super::change::{AuditRecord, Change};
use crate::error::TrackerResult;

/// Writes one JSON object per line to `audit.log`
pub struct AuditJournal {
    path: PathBuf,
}

impl AuditJournal {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a change stamped with the current time
    pub fn record(&self, change: Change) -> TrackerResult<AuditRecord> {
        let record = AuditRecord::now(change);
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut line = serde_json::to_string(&record)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        file.flush()?;
        Ok(record)
    }

    /// Every record in the journal, oldest first
    ///
    /// Lines that do not parse are skipped with a warning.
    pub fn read_all(&self) -> TrackerResult<Vec<AuditRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(fs::File::open(&self.path)?);
        let mut records = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(&line) {
                Ok(record) => records.push(record),
                Err(e) => warn!(line = index + 1, error = %e, "skipping malformed audit record"),
            }
        }
        Ok(records)
    }

    /// The last `limit` records, newest first
    pub fn recent(&self, limit: usize) -> TrackerResult<Vec<AuditRecord>> {
        let mut records = self.read_all()?;
        records.reverse();
        records.truncate(limit);
        Ok(records)
    }
}
