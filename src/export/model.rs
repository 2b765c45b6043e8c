// src/export/model.rs

use crate::models::CheckinEvent;
use chrono::NaiveDateTime;
use serde::Serialize;

/// Flat export row: one ledger event.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct CheckinExport {
    pub employee_id: String,
    pub name: String,
    pub department: String,
    pub timestamp: String,
    pub status: String,
    #[serde(skip)]
    pub(crate) at: NaiveDateTime,
}

impl From<&CheckinEvent> for CheckinExport {
    fn from(e: &CheckinEvent) -> Self {
        Self {
            employee_id: e.employee_id.clone(),
            name: e.name.clone(),
            department: e.department.clone(),
            timestamp: e.timestamp_str(),
            status: e.status.as_str().to_string(),
            at: e.timestamp,
        }
    }
}

/// Header for CSV / XLSX
pub(crate) fn get_headers() -> Vec<&'static str> {
    vec!["employee_id", "name", "department", "timestamp", "status"]
}

/// Index of the timestamp column in [`get_headers`].
pub(crate) const TIMESTAMP_COLUMN: usize = 3;

pub(crate) fn export_to_row(e: &CheckinExport) -> Vec<String> {
    vec![
        e.employee_id.clone(),
        e.name.clone(),
        e.department.clone(),
        e.timestamp.clone(),
        e.status.clone(),
    ]
}
