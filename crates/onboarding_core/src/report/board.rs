//! Cross-employee task board.

use crate::model::employee::Employee;
use crate::model::task::{Department, Task, TaskSetMap, TaskStatus};
use std::collections::BTreeMap;

/// Board filters. Empty `query` matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardFilter {
    /// `None` shows every bucket.
    pub department: Option<Department>,
    pub status: Option<TaskStatus>,
    /// Case-insensitive match on task title or employee name.
    pub query: String,
}

/// One task row on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardEntry<'a> {
    pub employee: &'a Employee,
    pub department: Department,
    pub task: &'a Task,
}

/// Lists tasks in employee order, then bucket order, then catalog order.
pub fn task_board<'a>(
    employees: &'a [Employee],
    task_sets: &'a TaskSetMap,
    filter: &BoardFilter,
) -> Vec<BoardEntry<'a>> {
    let needle = filter.query.trim().to_lowercase();
    let mut entries = Vec::new();

    for employee in employees {
        let Some(set) = task_sets.get(&employee.id) else {
            continue;
        };
        for (department, task) in set.iter() {
            if filter.department.is_some_and(|wanted| wanted != department) {
                continue;
            }
            if filter.status.is_some_and(|wanted| wanted != task.status) {
                continue;
            }
            if !needle.is_empty()
                && !task.title.to_lowercase().contains(&needle)
                && !employee.name.to_lowercase().contains(&needle)
            {
                continue;
            }
            entries.push(BoardEntry {
                employee,
                department,
                task,
            });
        }
    }

    entries
}

/// Groups board rows by task status, preserving row order within a group.
pub fn group_by_status<'a>(
    entries: Vec<BoardEntry<'a>>,
) -> BTreeMap<TaskStatus, Vec<BoardEntry<'a>>> {
    let mut groups: BTreeMap<TaskStatus, Vec<BoardEntry<'a>>> = BTreeMap::new();
    for entry in entries {
        groups.entry(entry.task.status).or_default().push(entry);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::employee::{EmployeeStatus, OrgDepartment};
    use crate::model::task::OnboardingTaskSet;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn setup() -> (Vec<Employee>, TaskSetMap) {
        let joining = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let employees: Vec<Employee> = [("EMP001", "Sarah Johnson"), ("EMP002", "Michael Chen")]
            .into_iter()
            .map(|(id, name)| Employee {
                id: id.to_string(),
                name: name.to_string(),
                email: format!("{id}@company.com"),
                department: OrgDepartment::Engineering,
                job_role: "Engineer".to_string(),
                joining_date: joining,
                created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                status: EmployeeStatus::Active,
            })
            .collect();

        let mut sets = TaskSetMap::new();
        let mut first = OnboardingTaskSet::from_catalog(joining);
        first.it.tasks[1].set_status(TaskStatus::Completed, Utc::now());
        sets.insert("EMP001".to_string(), first);
        sets.insert(
            "EMP002".to_string(),
            OnboardingTaskSet::from_catalog(joining),
        );
        (employees, sets)
    }

    #[test]
    fn unfiltered_board_lists_every_task() {
        let (employees, sets) = setup();
        let board = task_board(&employees, &sets, &BoardFilter::default());
        assert_eq!(board.len(), 22);
        assert_eq!(board[0].employee.id, "EMP001");
        assert_eq!(board[0].task.id, "hr-1");
    }

    #[test]
    fn filters_combine() {
        let (employees, sets) = setup();
        let it_only = BoardFilter {
            department: Some(Department::It),
            ..BoardFilter::default()
        };
        assert_eq!(task_board(&employees, &sets, &it_only).len(), 8);

        let completed = BoardFilter {
            status: Some(TaskStatus::Completed),
            ..BoardFilter::default()
        };
        let rows = task_board(&employees, &sets, &completed);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].task.id, "it-2");

        let by_name = BoardFilter {
            query: "MICHAEL".to_string(),
            ..BoardFilter::default()
        };
        assert_eq!(task_board(&employees, &sets, &by_name).len(), 11);

        let by_title = BoardFilter {
            department: Some(Department::Admin),
            query: "desk".to_string(),
            ..BoardFilter::default()
        };
        assert_eq!(task_board(&employees, &sets, &by_title).len(), 2);
    }

    #[test]
    fn grouping_splits_by_status() {
        let (employees, sets) = setup();
        let groups = group_by_status(task_board(&employees, &sets, &BoardFilter::default()));
        assert_eq!(groups[&TaskStatus::Completed].len(), 1);
        assert_eq!(groups[&TaskStatus::NotStarted].len(), 21);
        assert!(!groups.contains_key(&TaskStatus::InProgress));
    }
}
