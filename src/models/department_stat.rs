use serde::Serialize;

/// Progress of one department, derived on demand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentStat {
    pub department: String,
    pub total: usize,
    pub not_started: usize,
    pub in_progress: usize,
    pub cross_checking: usize,
    pub completed: usize,
    pub completion_percentage: f64,
}

impl DepartmentStat {
    pub fn empty(department: &str, total: usize) -> Self {
        Self {
            department: department.to_string(),
            total,
            not_started: total,
            in_progress: 0,
            cross_checking: 0,
            completed: 0,
            completion_percentage: 0.0,
        }
    }

    /// Employees that reported any status.
    pub fn started(&self) -> usize {
        self.in_progress + self.cross_checking + self.completed
    }
}
