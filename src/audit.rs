//! Internal audit log: one CSV line per state-changing operation.

use crate::errors::AppResult;
use crate::ui::messages::warning;
use chrono::Local;
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

/// Write an internal log line.
pub fn ttlog(path: &Path, operation: &str, target: &str, message: &str) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(file);

    wtr.serialize(AuditEntry {
        date: Local::now().to_rfc3339(),
        operation: operation.to_string(),
        target: target.to_string(),
        message: message.to_string(),
    })?;
    wtr.flush()?;
    Ok(())
}

/// Like [`ttlog`], but a failure only produces a warning.
pub fn record(path: &Path, operation: &str, target: &str, message: &str) {
    if let Err(e) = ttlog(path, operation, target, message) {
        warning(format!("Failed to write internal log: {e}"));
    }
}

pub fn read_entries(path: &Path) -> AppResult<Vec<AuditEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let mut rdr = ReaderBuilder::new().has_headers(false).from_path(path)?;
    let mut entries = Vec::new();
    for r in rdr.deserialize() {
        let entry: AuditEntry = r?;
        entries.push(entry);
    }
    Ok(entries)
}
