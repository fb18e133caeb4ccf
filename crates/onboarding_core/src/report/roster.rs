//! Employee list filtering and sorting.

use super::progress::{compute_progress, ProgressSummary};
use crate::model::employee::{Employee, OrgDepartment};
use crate::model::task::TaskSetMap;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RosterSort {
    #[default]
    Name,
    Department,
    /// Newest joiners first.
    JoiningDate,
    /// Highest overall progress first.
    Progress,
}

impl RosterSort {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "name" => Some(Self::Name),
            "department" => Some(Self::Department),
            "joining" | "joining_date" | "joiningdate" => Some(Self::JoiningDate),
            "progress" => Some(Self::Progress),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterQuery {
    /// Case-insensitive match on name, email, id or department label.
    pub search: String,
    pub department: Option<OrgDepartment>,
    pub sort: RosterSort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosterEntry<'a> {
    pub employee: &'a Employee,
    /// All zeros when the employee has no task set.
    pub progress: ProgressSummary,
}

pub fn roster<'a>(
    employees: &'a [Employee],
    task_sets: &TaskSetMap,
    query: &RosterQuery,
) -> Vec<RosterEntry<'a>> {
    let needle = query.search.trim().to_lowercase();
    let mut entries: Vec<RosterEntry<'a>> = employees
        .iter()
        .filter(|employee| query.department.map_or(true, |wanted| employee.department == wanted))
        .filter(|employee| needle.is_empty() || matches_search(employee, &needle))
        .map(|employee| RosterEntry {
            employee,
            progress: task_sets
                .get(&employee.id)
                .map(compute_progress)
                .unwrap_or_default(),
        })
        .collect();

    entries.sort_by(|left, right| compare(left, right, query.sort));
    entries
}

fn matches_search(employee: &Employee, needle: &str) -> bool {
    [
        employee.name.as_str(),
        employee.email.as_str(),
        employee.id.as_str(),
        employee.department.as_str(),
    ]
    .into_iter()
    .any(|field| field.to_lowercase().contains(needle))
}

fn compare(left: &RosterEntry<'_>, right: &RosterEntry<'_>, sort: RosterSort) -> Ordering {
    match sort {
        RosterSort::Name => left
            .employee
            .name
            .to_lowercase()
            .cmp(&right.employee.name.to_lowercase()),
        RosterSort::Department => left
            .employee
            .department
            .as_str()
            .cmp(right.employee.department.as_str()),
        RosterSort::JoiningDate => right
            .employee
            .joining_date
            .cmp(&left.employee.joining_date),
        RosterSort::Progress => right.progress.overall.cmp(&left.progress.overall),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::employee::EmployeeStatus;
    use crate::model::task::{OnboardingTaskSet, TaskStatus};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn employee(id: &str, name: &str, department: OrgDepartment, day: u32) -> Employee {
        Employee {
            id: id.to_string(),
            name: name.to_string(),
            email: format!("{}@company.com", name.to_lowercase().replace(' ', ".")),
            department,
            job_role: "Staff".to_string(),
            joining_date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            status: EmployeeStatus::Active,
        }
    }

    fn setup() -> (Vec<Employee>, TaskSetMap) {
        let employees = vec![
            employee("EMP001", "zoe park", OrgDepartment::Sales, 10),
            employee("EMP002", "Adam Cole", OrgDepartment::Engineering, 20),
            employee("EMP003", "Maya Ortiz", OrgDepartment::Finance, 5),
        ];
        let mut sets = TaskSetMap::new();
        for emp in &employees {
            sets.insert(emp.id.clone(), OnboardingTaskSet::from_catalog(emp.joining_date));
        }
        let maya = sets.get_mut("EMP003").unwrap();
        maya.hr.tasks[0].set_status(TaskStatus::Completed, Utc::now());
        (employees, sets)
    }

    fn ids(entries: &[RosterEntry<'_>]) -> Vec<String> {
        entries.iter().map(|entry| entry.employee.id.clone()).collect()
    }

    #[test]
    fn sorts_by_each_key() {
        let (employees, sets) = setup();
        let mut query = RosterQuery::default();
        assert_eq!(ids(&roster(&employees, &sets, &query)), ["EMP002", "EMP003", "EMP001"]);

        query.sort = RosterSort::Department;
        assert_eq!(ids(&roster(&employees, &sets, &query)), ["EMP002", "EMP003", "EMP001"]);

        query.sort = RosterSort::JoiningDate;
        assert_eq!(ids(&roster(&employees, &sets, &query)), ["EMP002", "EMP001", "EMP003"]);

        query.sort = RosterSort::Progress;
        let sorted = roster(&employees, &sets, &query);
        assert_eq!(sorted[0].employee.id, "EMP003");
        assert_eq!(sorted[0].progress.overall, 9);
    }

    #[test]
    fn search_and_department_filter() {
        let (employees, sets) = setup();
        let query = RosterQuery {
            search: "emp001".to_string(),
            ..RosterQuery::default()
        };
        assert_eq!(ids(&roster(&employees, &sets, &query)), ["EMP001"]);

        let query = RosterQuery {
            search: "finance".to_string(),
            ..RosterQuery::default()
        };
        assert_eq!(ids(&roster(&employees, &sets, &query)), ["EMP003"]);

        let query = RosterQuery {
            department: Some(OrgDepartment::Engineering),
            ..RosterQuery::default()
        };
        assert_eq!(ids(&roster(&employees, &sets, &query)), ["EMP002"]);
    }
}
