use crate::core::session::Session;
use crate::errors::{AppError, AppResult};
use crate::models::checkin::now_truncated;
use crate::models::{CheckinEvent, CheckinStatus, Employee};
use crate::store::Store;
use chrono::NaiveDateTime;
use tracing::{info, warn};

/// Current status of one employee together with their roster entry.
#[derive(Debug, Clone, serde::Serialize)]
pub struct EmployeeStatus {
    pub employee_id: String,
    pub name: String,
    pub department: String,
    pub status: CheckinStatus,
    pub last_update: Option<String>,
}

pub struct CheckinLogic;

impl CheckinLogic {
    /// Status of the most recent ledger event, or `NotStarted`.
    pub fn current_status(store: &Store, employee_id: &str) -> AppResult<CheckinStatus> {
        let ledger = store.ledger()?;
        Ok(ledger.current_status(employee_id.trim()))
    }

    /// Status view for the logged-in employee.
    pub fn status_of(store: &Store, session: &Session) -> AppResult<EmployeeStatus> {
        let employee = Self::rostered(store, session)?;
        let ledger = store.ledger()?;
        let latest = ledger.latest_for(&employee.id);

        Ok(EmployeeStatus {
            employee_id: employee.id.clone(),
            name: employee.name.clone(),
            department: employee.department.clone(),
            status: latest.map(|e| e.status).unwrap_or(CheckinStatus::NotStarted),
            last_update: latest.map(|e| e.timestamp_str()),
        })
    }

    pub fn submit(
        store: &Store,
        session: &Session,
        status: CheckinStatus,
    ) -> AppResult<CheckinEvent> {
        Self::submit_at(store, session, status, now_truncated())
    }

    /// Append a status event for the session's employee.
    ///
    /// Any submittable status is accepted unless the employee already
    /// completed. The ledger lock and the ledger file lock are held from the
    /// status check until the event is on disk, and the check sees events
    /// appended by other processes.
    pub fn submit_at(
        store: &Store,
        session: &Session,
        status: CheckinStatus,
        at: NaiveDateTime,
    ) -> AppResult<CheckinEvent> {
        if !status.is_submittable() {
            return Err(AppError::InvalidStatus(format!(
                "{status} cannot be submitted"
            )));
        }

        let employee = Self::rostered(store, session)?;

        let (mut ledger, _file_lock) = store.ledger_for_write()?;
        if ledger.current_status(&employee.id).is_terminal() {
            warn!(employee = %employee.id, requested = %status, "check-in after completion rejected");
            return Err(AppError::TerminalStateViolation(employee.id.clone()));
        }

        let event = ledger
            .append(CheckinEvent::for_employee(&employee, status, at))?
            .clone();

        info!(
            employee = %event.employee_id,
            department = %event.department,
            status = %event.status,
            "check-in recorded"
        );
        Ok(event)
    }

    fn rostered(store: &Store, session: &Session) -> AppResult<Employee> {
        let roster = store.roster()?;
        roster
            .find(&session.employee_id)
            .cloned()
            .ok_or_else(|| AppError::UnknownEmployee(session.employee_id.clone()))
    }
}

/// Parse a status submitted from the CLI or a form field.
pub fn parse_submission(raw: &str) -> AppResult<CheckinStatus> {
    CheckinStatus::from_label(raw)
        .filter(|s| s.is_submittable())
        .ok_or_else(|| {
            AppError::InvalidStatus(format!(
                "'{}' (expected one of: {})",
                raw.trim(),
                CheckinStatus::SUBMITTABLE
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })
}
