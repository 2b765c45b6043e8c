use super::{employee::Employee, status::CheckinStatus};
use chrono::{Local, NaiveDateTime, Timelike};
use serde::Serialize;

/// Timestamp format used by the ledger file and exports.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One ledger entry.
///
/// Name and department are copied from the roster when the event is written
/// and are never re-joined against later rosters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckinEvent {
    pub employee_id: String,
    pub name: String,
    pub department: String,
    pub timestamp: NaiveDateTime,
    pub status: CheckinStatus,
}

impl CheckinEvent {
    pub fn for_employee(employee: &Employee, status: CheckinStatus, at: NaiveDateTime) -> Self {
        Self {
            employee_id: employee.id.clone(),
            name: employee.name.clone(),
            department: employee.department.clone(),
            timestamp: at,
            status,
        }
    }

    pub fn timestamp_str(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Local time without sub-second precision, matching what the ledger stores.
pub fn now_truncated() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}
