//! Fleet-level rollups for dashboards and reports.
//!
//! Employees drive every fold; task sets without a matching employee are
//! ignored and employees without a task set count as "not onboarding".

use super::progress::{
    compute_progress, department_counts, is_fully_completed, overall_counts, percent, TaskCounts,
};
use crate::model::employee::{Employee, OrgDepartment};
use crate::model::task::{Department, OnboardingTaskSet, TaskSetMap, TaskStatus};
use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Headline numbers of the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_employees: usize,
    /// Employees that own a task set.
    pub total_onboarding: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub hr_pending: usize,
    pub it_pending: usize,
    pub admin_pending: usize,
    /// Open tasks whose due date passed.
    pub delayed: usize,
    /// `round(100 * completed / total_onboarding)`.
    pub completion_rate: u32,
}

impl DashboardStats {
    pub fn pending(&self, department: Department) -> usize {
        match department {
            Department::Hr => self.hr_pending,
            Department::It => self.it_pending,
            Department::Admin => self.admin_pending,
        }
    }
}

fn onboarding<'a>(
    employees: &'a [Employee],
    task_sets: &'a TaskSetMap,
) -> impl Iterator<Item = (&'a Employee, &'a OnboardingTaskSet)> + 'a {
    employees
        .iter()
        .filter_map(move |employee| task_sets.get(&employee.id).map(|set| (employee, set)))
}

pub fn dashboard_stats(
    employees: &[Employee],
    task_sets: &TaskSetMap,
    now: DateTime<Utc>,
) -> DashboardStats {
    let mut stats = DashboardStats {
        total_employees: employees.len(),
        ..DashboardStats::default()
    };

    for (_, set) in onboarding(employees, task_sets) {
        stats.total_onboarding += 1;
        if is_fully_completed(set) {
            stats.completed += 1;
        }

        for (department, task) in set.iter() {
            if task.is_completed() {
                continue;
            }
            match department {
                Department::Hr => stats.hr_pending += 1,
                Department::It => stats.it_pending += 1,
                Department::Admin => stats.admin_pending += 1,
            }
            if task.is_delayed(now) {
                stats.delayed += 1;
            }
        }
    }

    stats.in_progress = stats.total_onboarding - stats.completed;
    stats.completion_rate = percent(stats.completed, stats.total_onboarding);
    stats
}

/// Employees per organisation department, in `OrgDepartment::ALL` order,
/// omitting empty departments.
pub fn headcount_by_department(employees: &[Employee]) -> Vec<(OrgDepartment, usize)> {
    OrgDepartment::ALL
        .into_iter()
        .map(|department| {
            let count = employees
                .iter()
                .filter(|employee| employee.department == department)
                .count();
            (department, count)
        })
        .filter(|(_, count)| *count > 0)
        .collect()
}

/// Task totals of every employee in one organisation department.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrgDepartmentTasks {
    pub department: OrgDepartment,
    pub completed: usize,
    pub total: usize,
    pub pending: usize,
}

pub fn org_department_breakdown(
    employees: &[Employee],
    task_sets: &TaskSetMap,
) -> Vec<OrgDepartmentTasks> {
    let mut totals: BTreeMap<OrgDepartment, TaskCounts> = BTreeMap::new();
    for employee in employees {
        let entry = totals.entry(employee.department).or_default();
        if let Some(set) = task_sets.get(&employee.id) {
            *entry = entry.add(overall_counts(set));
        }
    }

    totals
        .into_iter()
        .map(|(department, counts)| OrgDepartmentTasks {
            department,
            completed: counts.completed,
            total: counts.total,
            pending: counts.pending(),
        })
        .collect()
}

/// Task count per status across the fleet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusDistribution {
    pub not_started: usize,
    pub in_progress: usize,
    pub completed: usize,
}

impl StatusDistribution {
    pub fn count(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::NotStarted => self.not_started,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::Completed => self.completed,
        }
    }
}

pub fn status_distribution(employees: &[Employee], task_sets: &TaskSetMap) -> StatusDistribution {
    let mut distribution = StatusDistribution::default();
    for (_, set) in onboarding(employees, task_sets) {
        for (_, task) in set.iter() {
            match task.status {
                TaskStatus::NotStarted => distribution.not_started += 1,
                TaskStatus::InProgress => distribution.in_progress += 1,
                TaskStatus::Completed => distribution.completed += 1,
            }
        }
    }
    distribution
}

/// Employees joining in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelinePoint {
    pub year: i32,
    pub month: u32,
    /// Short label such as `Jan 2024`.
    pub label: String,
    pub employees: usize,
    /// Mean overall progress, rounded; employees without tasks count as 0.
    pub avg_completion: u32,
}

/// Joining-month timeline in chronological order.
pub fn joining_timeline(employees: &[Employee], task_sets: &TaskSetMap) -> Vec<TimelinePoint> {
    let mut months: BTreeMap<(i32, u32), (usize, u32, String)> = BTreeMap::new();
    for employee in employees {
        let date = employee.joining_date;
        let entry = months
            .entry((date.year(), date.month()))
            .or_insert_with(|| (0, 0, date.format("%b %Y").to_string()));
        entry.0 += 1;
        if let Some(set) = task_sets.get(&employee.id) {
            entry.1 += compute_progress(set).overall;
        }
    }

    months
        .into_iter()
        .map(|((year, month), (count, progress_sum, label))| TimelinePoint {
            year,
            month,
            label,
            employees: count,
            avg_completion: percent(progress_sum as usize, count * 100),
        })
        .collect()
}

/// Completion of one task bucket across the fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BucketCompletion {
    pub department: Department,
    pub completed: usize,
    pub total: usize,
    pub pending: usize,
    pub rate: u32,
}

pub fn bucket_completion(employees: &[Employee], task_sets: &TaskSetMap) -> Vec<BucketCompletion> {
    Department::ALL
        .into_iter()
        .map(|department| {
            let counts = onboarding(employees, task_sets)
                .map(|(_, set)| department_counts(set, department))
                .fold(TaskCounts::default(), TaskCounts::add);
            BucketCompletion {
                department,
                completed: counts.completed,
                total: counts.total,
                pending: counts.pending(),
                rate: counts.percent(),
            }
        })
        .collect()
}

/// Mean of every employee's unrounded overall completion, rounded once.
///
/// Employees without a task set count as 0; an empty roster yields 0.
pub fn average_completion(employees: &[Employee], task_sets: &TaskSetMap) -> u32 {
    if employees.is_empty() {
        return 0;
    }
    let sum: f64 = employees
        .iter()
        .filter_map(|employee| task_sets.get(&employee.id))
        .map(overall_counts)
        .filter(|counts| counts.total > 0)
        .map(|counts| counts.completed as f64 * 100.0 / counts.total as f64)
        .sum();
    (sum / employees.len() as f64).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::employee::EmployeeStatus;
    use chrono::{NaiveDate, TimeZone};

    fn employee(id: &str, department: OrgDepartment, joining: (i32, u32, u32)) -> Employee {
        Employee {
            id: id.to_string(),
            name: format!("Person {id}"),
            email: format!("{id}@company.com"),
            department,
            job_role: "Analyst".to_string(),
            joining_date: NaiveDate::from_ymd_opt(joining.0, joining.1, joining.2).unwrap(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            status: EmployeeStatus::Active,
        }
    }

    fn fleet() -> (Vec<Employee>, TaskSetMap) {
        let employees = vec![
            employee("EMP001", OrgDepartment::Engineering, (2024, 1, 15)),
            employee("EMP002", OrgDepartment::Sales, (2024, 1, 20)),
            employee("EMP003", OrgDepartment::Engineering, (2024, 2, 1)),
        ];
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let mut sets = TaskSetMap::new();

        let mut done = OnboardingTaskSet::from_catalog(employees[0].joining_date);
        for department in Department::ALL {
            for task in &mut done.bucket_mut(department).tasks {
                task.set_status(TaskStatus::Completed, now);
            }
        }
        sets.insert("EMP001".to_string(), done);

        let mut partial = OnboardingTaskSet::from_catalog(employees[1].joining_date);
        partial.hr.tasks[0].set_status(TaskStatus::Completed, now);
        partial.it.tasks[0].set_status(TaskStatus::InProgress, now);
        sets.insert("EMP002".to_string(), partial);

        (employees, sets)
    }

    #[test]
    fn dashboard_counts_completed_pending_and_delayed() {
        let (employees, sets) = fleet();
        let now = Utc.with_ymd_and_hms(2024, 1, 25, 0, 0, 0).unwrap();
        let stats = dashboard_stats(&employees, &sets, now);

        assert_eq!(stats.total_employees, 3);
        assert_eq!(stats.total_onboarding, 2);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.hr_pending, 3);
        assert_eq!(stats.it_pending, 4);
        assert_eq!(stats.admin_pending, 3);
        assert_eq!(stats.delayed, 10);
        assert_eq!(stats.completion_rate, 50);
    }

    #[test]
    fn nothing_is_delayed_before_due_date() {
        let (employees, sets) = fleet();
        let now = Utc.with_ymd_and_hms(2024, 1, 19, 0, 0, 0).unwrap();
        assert_eq!(dashboard_stats(&employees, &sets, now).delayed, 0);
    }

    #[test]
    fn headcount_and_org_breakdown_group_by_department() {
        let (employees, sets) = fleet();
        assert_eq!(
            headcount_by_department(&employees),
            vec![(OrgDepartment::Engineering, 2), (OrgDepartment::Sales, 1)]
        );

        let breakdown = org_department_breakdown(&employees, &sets);
        let engineering = breakdown
            .iter()
            .find(|row| row.department == OrgDepartment::Engineering)
            .unwrap();
        assert_eq!((engineering.completed, engineering.total), (11, 11));
        let sales = breakdown
            .iter()
            .find(|row| row.department == OrgDepartment::Sales)
            .unwrap();
        assert_eq!((sales.completed, sales.total, sales.pending), (1, 11, 10));
    }

    #[test]
    fn distribution_and_buckets_cover_every_task() {
        let (employees, sets) = fleet();
        let distribution = status_distribution(&employees, &sets);
        assert_eq!(distribution.completed, 12);
        assert_eq!(distribution.in_progress, 1);
        assert_eq!(distribution.not_started, 9);

        let buckets = bucket_completion(&employees, &sets);
        assert_eq!(buckets[0].department, Department::Hr);
        assert_eq!((buckets[0].completed, buckets[0].total), (5, 8));
        assert_eq!(buckets[0].rate, 63);
        assert_eq!(buckets[2].rate, 50);
    }

    #[test]
    fn timeline_is_chronological_with_average_progress() {
        let (employees, sets) = fleet();
        let timeline = joining_timeline(&employees, &sets);

        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[0].label, "Jan 2024");
        assert_eq!(timeline[0].employees, 2);
        // (100 + 9) / 2 = 54.5
        assert_eq!(timeline[0].avg_completion, 55);
        assert_eq!(timeline[1].label, "Feb 2024");
        assert_eq!(timeline[1].avg_completion, 0);
    }

    #[test]
    fn average_completion_counts_employees_without_tasks_as_zero() {
        let (employees, sets) = fleet();
        // (100 + 100/11 + 0) / 3
        assert_eq!(average_completion(&employees, &sets), 36);
        assert_eq!(average_completion(&employees[2..], &sets), 0);
        assert_eq!(average_completion(&[], &sets), 0);
    }
}
