//! Append-only check-in ledger backed by a CSV file.

mod file;

use crate::errors::AppResult;
use crate::models::{CheckinEvent, CheckinStatus};
use crate::utils::path::{FileStamp, file_stamp};
use file::Layout;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

pub use file::{LEDGER_HEADERS, LedgerLock};

/// In-memory copy of the ledger file.
///
/// Events are only ever added through [`Ledger::append`], which persists the
/// record before extending the in-memory sequence. Other processes may
/// append to the same file; [`Ledger::refresh`] picks their events up.
#[derive(Debug)]
pub struct Ledger {
    path: PathBuf,
    events: Vec<CheckinEvent>,
    layout: Layout,
    stamp: Option<FileStamp>,
}

impl Ledger {
    /// Load the ledger at `path`. A missing or empty file is an empty ledger.
    pub fn open(path: &Path) -> AppResult<Self> {
        let mut ledger = Self {
            path: path.to_path_buf(),
            events: Vec::new(),
            layout: Layout::canonical(),
            stamp: None,
        };
        ledger.reload()?;
        Ok(ledger)
    }

    /// Re-read the file if it changed since it was last seen.
    /// Returns whether a reload happened.
    pub fn refresh(&mut self) -> AppResult<bool> {
        if file_stamp(&self.path)? == self.stamp {
            return Ok(false);
        }
        self.reload()?;
        debug!(path = %self.path.display(), events = self.events.len(), "ledger reloaded");
        Ok(true)
    }

    fn reload(&mut self) -> AppResult<()> {
        let stamp = file_stamp(&self.path)?;
        let (events, layout) = match stamp {
            Some(s) if s.len > 0 => file::read_events(&self.path)?,
            _ => (Vec::new(), Layout::canonical()),
        };
        self.events = events;
        self.layout = layout;
        self.stamp = stamp;
        Ok(())
    }

    /// Advisory lock on the ledger shared by every process using it.
    /// Writers take it exclusively, readers shared.
    pub fn lock_file(&self, exclusive: bool) -> AppResult<LedgerLock> {
        file::lock(&self.path, exclusive)
    }

    pub fn events(&self) -> &[CheckinEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Persist `event` and then record it in memory.
    /// If the write fails the ledger is left untouched.
    ///
    /// Callers sharing the file with other processes hold the exclusive
    /// [`LedgerLock`] and call [`Ledger::refresh`] first.
    pub fn append(&mut self, event: CheckinEvent) -> AppResult<&CheckinEvent> {
        let was_empty = self.stamp.is_none_or(|s| s.len == 0);
        file::append_event(&self.path, &event, &self.layout)?;
        if was_empty {
            self.layout = Layout::canonical();
        }
        // an unreadable stamp only forces the next refresh to reload
        self.stamp = file_stamp(&self.path).ok().flatten();
        self.events.push(event);
        Ok(&self.events[self.events.len() - 1])
    }

    pub fn latest_for(&self, employee_id: &str) -> Option<&CheckinEvent> {
        self.events
            .iter()
            .rev()
            .find(|e| e.employee_id == employee_id)
    }

    /// Status of the most recent event, or `NotStarted`.
    pub fn current_status(&self, employee_id: &str) -> CheckinStatus {
        self.latest_for(employee_id)
            .map(|e| e.status)
            .unwrap_or(CheckinStatus::NotStarted)
    }

    pub fn history_for(&self, employee_id: &str) -> Vec<&CheckinEvent> {
        self.events
            .iter()
            .filter(|e| e.employee_id == employee_id)
            .collect()
    }
}

/// Latest event of each employee, in ledger order.
pub fn latest_per_employee(events: &[CheckinEvent]) -> Vec<&CheckinEvent> {
    let mut last_index: HashMap<&str, usize> = HashMap::new();
    for (i, e) in events.iter().enumerate() {
        last_index.insert(e.employee_id.as_str(), i);
    }

    events
        .iter()
        .enumerate()
        .filter(|(i, e)| last_index.get(e.employee_id.as_str()) == Some(i))
        .map(|(_, e)| e)
        .collect()
}
