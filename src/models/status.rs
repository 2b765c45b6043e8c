use serde::{Deserialize, Serialize};
use std::fmt;

/// Inventory-count status of an employee.
///
/// `NotStarted` is implicit: it is what an employee without ledger events is
/// in, and it is never written to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckinStatus {
    NotStarted,
    InProgress,
    CrossChecking,
    Completed,
}

impl CheckinStatus {
    /// Statuses an employee may submit, in their natural order.
    pub const SUBMITTABLE: [CheckinStatus; 3] = [
        CheckinStatus::InProgress,
        CheckinStatus::CrossChecking,
        CheckinStatus::Completed,
    ];

    /// Canonical label, as written to the ledger.
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckinStatus::NotStarted => "NOT_STARTED",
            CheckinStatus::InProgress => "IN_PROGRESS",
            CheckinStatus::CrossChecking => "CROSS_CHECKING",
            CheckinStatus::Completed => "COMPLETED",
        }
    }

    /// Human readable label for tables and dashboards.
    pub fn display_label(&self) -> &'static str {
        match self {
            CheckinStatus::NotStarted => "Not started",
            CheckinStatus::InProgress => "In progress",
            CheckinStatus::CrossChecking => "Cross-checking",
            CheckinStatus::Completed => "Completed",
        }
    }

    /// Parse a status label.
    ///
    /// Accepts the canonical labels in any case, `-`/space separated variants
    /// and the labels written by the legacy spreadsheet workflow.
    pub fn from_label(s: &str) -> Option<Self> {
        let trimmed = s.trim();

        match trimmed {
            "Chưa kiểm kê" => return Some(CheckinStatus::NotStarted),
            "Đang KK" => return Some(CheckinStatus::InProgress),
            "Đối chiếu KK" => return Some(CheckinStatus::CrossChecking),
            "Kết thúc KK" => return Some(CheckinStatus::Completed),
            _ => {}
        }

        let normalized = trimmed.to_uppercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "NOT_STARTED" => Some(CheckinStatus::NotStarted),
            "IN_PROGRESS" => Some(CheckinStatus::InProgress),
            "CROSS_CHECKING" => Some(CheckinStatus::CrossChecking),
            "COMPLETED" | "DONE" => Some(CheckinStatus::Completed),
            _ => None,
        }
    }

    pub fn is_submittable(&self) -> bool {
        !matches!(self, CheckinStatus::NotStarted)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, CheckinStatus::Completed)
    }
}

impl fmt::Display for CheckinStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
