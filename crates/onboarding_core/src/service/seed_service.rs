//! Demo dataset seeder.
//!
//! # Invariants
//! - Seeding is a no-op whenever at least one employee exists.
//! - Output depends only on the clock: five employees, preset completion
//!   per bucket, no activity entries.

use crate::clock::Clock;
use crate::model::employee::{Employee, EmployeeStatus, OrgDepartment};
use crate::model::task::{start_of_day_utc, Department, OnboardingTaskSet, TaskSetMap, TaskStatus};
use crate::repo::onboarding_repo::{OnboardingRepository, RepoResult};
use crate::store::KeyValueStore;
use chrono::{DateTime, NaiveDate, Utc};
use log::info;

/// Result of one seeding attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded { employees: usize },
    AlreadyPopulated { employees: usize },
}

struct DemoEmployee {
    id: &'static str,
    name: &'static str,
    email: &'static str,
    department: OrgDepartment,
    job_role: &'static str,
    joining: (i32, u32, u32),
    created: (i32, u32, u32),
    /// Target completion percent for hr, it, admin.
    progress: [u32; 3],
}

const DEMO_EMPLOYEES: [DemoEmployee; 5] = [
    DemoEmployee {
        id: "EMP001",
        name: "Sarah Johnson",
        email: "sarah.johnson@company.com",
        department: OrgDepartment::Engineering,
        job_role: "Senior Software Engineer",
        joining: (2024, 1, 15),
        created: (2024, 1, 10),
        progress: [100, 100, 100],
    },
    DemoEmployee {
        id: "EMP002",
        name: "Michael Chen",
        email: "michael.chen@company.com",
        department: OrgDepartment::Marketing,
        job_role: "Marketing Manager",
        joining: (2024, 1, 20),
        created: (2024, 1, 12),
        progress: [80, 60, 40],
    },
    DemoEmployee {
        id: "EMP003",
        name: "Emily Rodriguez",
        email: "emily.rodriguez@company.com",
        department: OrgDepartment::Sales,
        job_role: "Sales Executive",
        joining: (2024, 1, 25),
        created: (2024, 1, 18),
        progress: [60, 30, 0],
    },
    DemoEmployee {
        id: "EMP004",
        name: "David Park",
        email: "david.park@company.com",
        department: OrgDepartment::Engineering,
        job_role: "DevOps Engineer",
        joining: (2024, 2, 1),
        created: (2024, 1, 22),
        progress: [40, 0, 0],
    },
    DemoEmployee {
        id: "EMP005",
        name: "Jessica Williams",
        email: "jessica.williams@company.com",
        department: OrgDepartment::HumanResources,
        job_role: "HR Specialist",
        joining: (2024, 2, 5),
        created: (2024, 1, 28),
        progress: [20, 0, 0],
    },
];

const FOUR_STEP_THRESHOLDS: &[u32] = &[25, 50, 75, 100];
const THREE_STEP_THRESHOLDS: &[u32] = &[33, 66, 100];

fn thresholds(department: Department) -> &'static [u32] {
    match department {
        Department::Hr | Department::It => FOUR_STEP_THRESHOLDS,
        Department::Admin => THREE_STEP_THRESHOLDS,
    }
}

/// Status of the `index`-th task in a bucket seeded at `percent`.
///
/// Completed once `percent` reaches its threshold; in progress once the
/// previous task's threshold is reached.
pub fn seeded_status(index: usize, percent: u32, thresholds: &[u32]) -> TaskStatus {
    let reached = |position: usize| thresholds.get(position).is_some_and(|limit| percent >= *limit);
    if reached(index) {
        TaskStatus::Completed
    } else if index > 0 && reached(index - 1) {
        TaskStatus::InProgress
    } else {
        TaskStatus::NotStarted
    }
}

pub struct DemoSeeder<S: KeyValueStore, C: Clock> {
    repo: OnboardingRepository<S>,
    clock: C,
}

impl<S: KeyValueStore, C: Clock> DemoSeeder<S, C> {
    pub fn new(repo: OnboardingRepository<S>, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Writes the demo dataset unless employees already exist.
    pub fn seed(&self) -> RepoResult<SeedOutcome> {
        let existing = self.repo.load_employees()?;
        if !existing.is_empty() {
            info!(
                "event=demo_seed module=service status=skipped employees={}",
                existing.len()
            );
            return Ok(SeedOutcome::AlreadyPopulated {
                employees: existing.len(),
            });
        }

        let (employees, task_sets) = demo_dataset(self.clock.now());
        self.repo.save_roster(&employees, &task_sets)?;
        info!(
            "event=demo_seed module=service status=ok employees={}",
            employees.len()
        );
        Ok(SeedOutcome::Seeded {
            employees: employees.len(),
        })
    }
}

/// Builds the demo employees and task sets; completed tasks are stamped
/// with `now`.
pub fn demo_dataset(now: DateTime<Utc>) -> (Vec<Employee>, TaskSetMap) {
    let mut employees = Vec::with_capacity(DEMO_EMPLOYEES.len());
    let mut task_sets = TaskSetMap::new();

    for demo in &DEMO_EMPLOYEES {
        let joining_date = date(demo.joining);
        let mut set = OnboardingTaskSet::from_catalog(joining_date);
        for (slot, department) in Department::ALL.into_iter().enumerate() {
            let percent = demo.progress[slot];
            for (index, task) in set.bucket_mut(department).tasks.iter_mut().enumerate() {
                task.set_status(seeded_status(index, percent, thresholds(department)), now);
            }
        }

        employees.push(Employee {
            id: demo.id.to_string(),
            name: demo.name.to_string(),
            email: demo.email.to_string(),
            department: demo.department,
            job_role: demo.job_role.to_string(),
            joining_date,
            created_at: start_of_day_utc(date(demo.created)),
            status: EmployeeStatus::Active,
        });
        task_sets.insert(demo.id.to_string(), set);
    }

    (employees, task_sets)
}

fn date((year, month, day): (i32, u32, u32)) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_status_follows_thresholds() {
        let four = FOUR_STEP_THRESHOLDS;
        let statuses: Vec<TaskStatus> = (0..4).map(|i| seeded_status(i, 60, four)).collect();
        assert_eq!(
            statuses,
            vec![
                TaskStatus::Completed,
                TaskStatus::Completed,
                TaskStatus::InProgress,
                TaskStatus::NotStarted,
            ]
        );

        assert_eq!(seeded_status(0, 20, four), TaskStatus::NotStarted);
        assert_eq!(seeded_status(1, 20, four), TaskStatus::NotStarted);
        assert_eq!(seeded_status(0, 40, THREE_STEP_THRESHOLDS), TaskStatus::Completed);
        assert_eq!(seeded_status(1, 40, THREE_STEP_THRESHOLDS), TaskStatus::InProgress);
        assert_eq!(seeded_status(2, 40, THREE_STEP_THRESHOLDS), TaskStatus::NotStarted);
    }

    #[test]
    fn demo_dataset_is_consistent() {
        let (employees, sets) = demo_dataset(Utc::now());
        assert_eq!(employees.len(), 5);
        assert_eq!(sets.len(), 5);
        assert!(sets
            .values()
            .flat_map(|set| set.iter())
            .all(|(_, task)| task.is_consistent()));
    }
}
