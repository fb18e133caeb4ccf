//! Completion percentages for one task set.

use crate::model::task::{Department, OnboardingTaskSet};
use serde::Serialize;

/// Completed/total counts for one scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskCounts {
    pub completed: usize,
    pub total: usize,
}

impl TaskCounts {
    pub fn pending(self) -> usize {
        self.total - self.completed
    }

    pub fn percent(self) -> u32 {
        percent(self.completed, self.total)
    }

    pub fn add(self, other: TaskCounts) -> TaskCounts {
        TaskCounts {
            completed: self.completed + other.completed,
            total: self.total + other.total,
        }
    }
}

/// Rounded completion percentages of one employee.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProgressSummary {
    pub hr: u32,
    pub it: u32,
    pub admin: u32,
    pub overall: u32,
}

impl ProgressSummary {
    pub fn department(&self, department: Department) -> u32 {
        match department {
            Department::Hr => self.hr,
            Department::It => self.it,
            Department::Admin => self.admin,
        }
    }
}

/// `round(100 * completed / total)` with half-up rounding; 0 for an empty
/// scope.
pub fn percent(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let completed = completed as u64;
    let total = total as u64;
    ((200 * completed + total) / (2 * total)) as u32
}

pub fn department_counts(set: &OnboardingTaskSet, department: Department) -> TaskCounts {
    let bucket = set.bucket(department);
    TaskCounts {
        completed: bucket.completed_count(),
        total: bucket.len(),
    }
}

pub fn overall_counts(set: &OnboardingTaskSet) -> TaskCounts {
    Department::ALL
        .into_iter()
        .map(|department| department_counts(set, department))
        .fold(TaskCounts::default(), TaskCounts::add)
}

pub fn compute_progress(set: &OnboardingTaskSet) -> ProgressSummary {
    ProgressSummary {
        hr: department_counts(set, Department::Hr).percent(),
        it: department_counts(set, Department::It).percent(),
        admin: department_counts(set, Department::Admin).percent(),
        overall: overall_counts(set).percent(),
    }
}

/// Every task in every bucket is completed (vacuously true when empty).
pub fn is_fully_completed(set: &OnboardingTaskSet) -> bool {
    let counts = overall_counts(set);
    counts.completed == counts.total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::TaskStatus;
    use chrono::{NaiveDate, Utc};

    fn catalog_set() -> OnboardingTaskSet {
        OnboardingTaskSet::from_catalog(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
    }

    #[test]
    fn percent_rounds_half_up() {
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(1, 8), 13);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(4, 11), 36);
        assert_eq!(percent(5, 5), 100);
    }

    #[test]
    fn empty_set_reports_zero_everywhere() {
        let progress = compute_progress(&OnboardingTaskSet::default());
        assert_eq!(progress, ProgressSummary::default());
        assert!(is_fully_completed(&OnboardingTaskSet::default()));
    }

    #[test]
    fn completing_hr_bucket_gives_thirty_six_percent_overall() {
        let mut set = catalog_set();
        for task in &mut set.hr.tasks {
            task.set_status(TaskStatus::Completed, Utc::now());
        }

        let progress = compute_progress(&set);
        assert_eq!(progress.hr, 100);
        assert_eq!(progress.it, 0);
        assert_eq!(progress.admin, 0);
        assert_eq!(progress.overall, 36);
        assert!(!is_fully_completed(&set));
    }

    #[test]
    fn overall_is_hundred_only_when_everything_completed() {
        let mut set = catalog_set();
        let now = Utc::now();
        for department in Department::ALL {
            for task in &mut set.bucket_mut(department).tasks {
                task.set_status(TaskStatus::Completed, now);
            }
        }
        assert_eq!(compute_progress(&set).overall, 100);
        assert!(is_fully_completed(&set));

        set.admin.tasks[2].set_status(TaskStatus::InProgress, now);
        assert_eq!(compute_progress(&set).overall, 91);
        assert!(!is_fully_completed(&set));
    }
}
