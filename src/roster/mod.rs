//! Roster: the employees allowed to check in.

pub mod ingest;

use crate::models::Employee;
use std::collections::{BTreeMap, HashMap};

/// Immutable set of employees, indexed by identifier.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    employees: Vec<Employee>,
    by_id: HashMap<String, usize>,
}

impl Roster {
    /// Build a roster from already validated rows.
    /// Identifiers are expected to be unique; on duplicates the first row wins.
    pub fn new(employees: Vec<Employee>) -> Self {
        let mut by_id = HashMap::with_capacity(employees.len());
        for (i, e) in employees.iter().enumerate() {
            by_id.entry(e.id.clone()).or_insert(i);
        }
        Self { employees, by_id }
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&Employee> {
        self.by_id.get(id.trim()).map(|&i| &self.employees[i])
    }

    /// Plaintext credential match. Both values are compared trimmed.
    pub fn authenticate(&self, id: &str, credential: &str) -> Option<&Employee> {
        self.find(id)
            .filter(|e| e.credential.trim() == credential.trim())
    }

    /// Head count per department, ordered by department label.
    pub fn department_totals(&self) -> BTreeMap<&str, usize> {
        let mut totals = BTreeMap::new();
        for e in &self.employees {
            *totals.entry(e.department.as_str()).or_insert(0) += 1;
        }
        totals
    }

    pub fn departments(&self) -> Vec<&str> {
        self.department_totals().into_keys().collect()
    }
}
