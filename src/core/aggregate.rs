//! Per-department progress.

use crate::core::auth::AuthLogic;
use crate::core::session::Session;
use crate::errors::AppResult;
use crate::ledger::latest_per_employee;
use crate::models::{CheckinEvent, CheckinStatus, DepartmentStat};
use crate::roster::Roster;
use crate::store::Store;
use std::collections::HashMap;

/// Label of the company-wide row produced by [`overall`].
pub const TOTAL_LABEL: &str = "TOTAL";

#[derive(Default)]
struct Counts {
    in_progress: usize,
    cross_checking: usize,
    completed: usize,
}

/// One stat per roster department, ordered by department label.
///
/// Only the latest event of each employee counts, grouped by the department
/// recorded on that event. Departments without events get zero counts and
/// events from departments no longer on the roster are ignored.
pub fn department_stats(roster: &Roster, events: &[CheckinEvent]) -> Vec<DepartmentStat> {
    let mut counts: HashMap<&str, Counts> = HashMap::new();
    for event in latest_per_employee(events) {
        let c = counts.entry(event.department.as_str()).or_default();
        match event.status {
            CheckinStatus::InProgress => c.in_progress += 1,
            CheckinStatus::CrossChecking => c.cross_checking += 1,
            CheckinStatus::Completed => c.completed += 1,
            CheckinStatus::NotStarted => {}
        }
    }

    roster
        .department_totals()
        .into_iter()
        .map(|(department, total)| {
            let c = counts.remove(department).unwrap_or_default();

            // Employees who moved department after checking in can push the
            // snapshot counts above the head count; cap in status order.
            let completed = c.completed.min(total);
            let cross_checking = c.cross_checking.min(total - completed);
            let in_progress = c.in_progress.min(total - completed - cross_checking);

            DepartmentStat {
                department: department.to_string(),
                total,
                not_started: total - completed - cross_checking - in_progress,
                in_progress,
                cross_checking,
                completed,
                completion_percentage: completion_percentage(completed, total),
            }
        })
        .collect()
}

/// completed / total × 100 rounded to one decimal, 0 for an empty department.
pub fn completion_percentage(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let pct = completed as f64 / total as f64 * 100.0;
    (pct * 10.0).round() / 10.0
}

/// Company-wide totals as a single row.
pub fn overall(stats: &[DepartmentStat]) -> DepartmentStat {
    let mut all = DepartmentStat::empty(TOTAL_LABEL, 0);
    for s in stats {
        all.total += s.total;
        all.not_started += s.not_started;
        all.in_progress += s.in_progress;
        all.cross_checking += s.cross_checking;
        all.completed += s.completed;
    }
    all.completion_percentage = completion_percentage(all.completed, all.total);
    all
}

pub struct AggregateLogic;

impl AggregateLogic {
    /// Admin dashboard: per-department stats of the current roster and ledger.
    pub fn dashboard(store: &Store, session: &Session) -> AppResult<Vec<DepartmentStat>> {
        AuthLogic::require_admin(store, session)?;
        let roster = store.roster()?;
        let ledger = store.ledger()?;
        Ok(department_stats(&roster, ledger.events()))
    }
}
