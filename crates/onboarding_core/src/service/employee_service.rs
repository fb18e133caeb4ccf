//! Employee use-case service.
//!
//! # Responsibility
//! - Create employees together with their catalog task set.
//! - Read employees and task sets back for detail views.
//!
//! # Invariants
//! - Creation validates input before loading or writing anything.
//! - Employee list and task-set map are written in one store batch.

use crate::clock::Clock;
use crate::model::activity::{ActivityKind, NewActivity};
use crate::model::employee::{
    format_employee_id, Employee, EmployeeId, EmployeeStatus, EmployeeValidationError,
    NewEmployee,
};
use crate::model::task::OnboardingTaskSet;
use crate::repo::onboarding_repo::{OnboardingRepository, RepoError, RepoResult};
use crate::report::progress::{compute_progress, ProgressSummary};
use crate::store::KeyValueStore;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Actor recorded on every `employee_created` activity.
const EMPLOYEE_CREATOR: &str = "HR";

#[derive(Debug)]
pub enum EmployeeServiceError {
    Validation(EmployeeValidationError),
    Repo(RepoError),
}

impl Display for EmployeeServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EmployeeServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<EmployeeValidationError> for EmployeeServiceError {
    fn from(value: EmployeeValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for EmployeeServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Employee with its task set and derived progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeOverview {
    pub employee: Employee,
    /// `None` when the task set is missing (interrupted creation).
    pub tasks: Option<OnboardingTaskSet>,
    pub progress: ProgressSummary,
}

pub struct EmployeeService<S: KeyValueStore, C: Clock> {
    repo: OnboardingRepository<S>,
    clock: C,
}

impl<S: KeyValueStore, C: Clock> EmployeeService<S, C> {
    pub fn new(repo: OnboardingRepository<S>, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Creates one employee and instantiates its onboarding task set.
    ///
    /// # Contract
    /// - Every field is required; the first blank or malformed field is
    ///   returned as `EmployeeServiceError::Validation` with no mutation.
    /// - Id is `EMP` + (employee count + 1), bumped past ids already taken.
    /// - Every task is `not_started` and due on the joining date.
    /// - Appends one `employee_created` activity.
    pub fn create_employee(&self, input: &NewEmployee) -> Result<Employee, EmployeeServiceError> {
        let validated = input.validate().map_err(|err| {
            warn!(
                "event=employee_create module=service status=rejected reason={}",
                err.code()
            );
            err
        })?;

        let mut employees = self.repo.load_employees()?;
        let mut task_sets = self.repo.load_task_sets()?;
        let now = self.clock.now();

        let employee = Employee {
            id: next_employee_id(&employees),
            name: validated.name,
            email: validated.email,
            department: validated.department,
            job_role: validated.job_role,
            joining_date: validated.joining_date,
            created_at: now,
            status: EmployeeStatus::Active,
        };
        task_sets.insert(
            employee.id.clone(),
            OnboardingTaskSet::from_catalog(employee.joining_date),
        );
        employees.push(employee.clone());
        self.repo.save_roster(&employees, &task_sets)?;

        self.repo.append_activity(
            NewActivity::new(
                ActivityKind::EmployeeCreated,
                EMPLOYEE_CREATOR,
                format!("New employee {} added to onboarding", employee.name),
            )
            .for_employee(employee.id.clone(), Some(employee.name.clone()))
            .into_activity(now),
        )?;

        info!(
            "event=employee_create module=service status=ok employee_id={} department={} employees={}",
            employee.id,
            employee.department,
            employees.len()
        );
        Ok(employee)
    }

    pub fn list_employees(&self) -> RepoResult<Vec<Employee>> {
        self.repo.load_employees()
    }

    pub fn get_employee(&self, id: &str) -> RepoResult<Option<Employee>> {
        Ok(self
            .repo
            .load_employees()?
            .into_iter()
            .find(|employee| employee.id == id))
    }

    pub fn get_task_set(&self, id: &str) -> RepoResult<Option<OnboardingTaskSet>> {
        Ok(self.repo.load_task_sets()?.remove(id))
    }

    /// Loads one employee with tasks and progress for a detail view.
    pub fn get_overview(&self, id: &str) -> RepoResult<Option<EmployeeOverview>> {
        let Some(employee) = self.get_employee(id)? else {
            return Ok(None);
        };
        let tasks = self.get_task_set(id)?;
        let progress = tasks.as_ref().map(compute_progress).unwrap_or_default();
        Ok(Some(EmployeeOverview {
            employee,
            tasks,
            progress,
        }))
    }
}

/// `EMP` + (count + 1), skipping forward while that id is already in use.
pub fn next_employee_id(existing: &[Employee]) -> EmployeeId {
    let mut sequence = existing.len() + 1;
    loop {
        let candidate = format_employee_id(sequence);
        if existing.iter().all(|employee| employee.id != candidate) {
            return candidate;
        }
        sequence += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::employee::OrgDepartment;
    use chrono::{NaiveDate, Utc};

    fn employee(id: &str) -> Employee {
        Employee {
            id: id.to_string(),
            name: "x".to_string(),
            email: "x@y.z".to_string(),
            department: OrgDepartment::Sales,
            job_role: "r".to_string(),
            joining_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            created_at: Utc::now(),
            status: EmployeeStatus::Active,
        }
    }

    #[test]
    fn next_id_follows_count() {
        assert_eq!(next_employee_id(&[]), "EMP001");
        assert_eq!(
            next_employee_id(&[employee("EMP001"), employee("EMP002")]),
            "EMP003"
        );
    }

    #[test]
    fn next_id_skips_taken_sequence() {
        let existing = [employee("EMP001"), employee("EMP003")];
        assert_eq!(next_employee_id(&existing), "EMP004");
    }
}
