//! Task mutation use-case service.
//!
//! # Responsibility
//! - Change task status and append comments for one employee.
//! - Record each change in the activity log under the active session.
//!
//! # Invariants
//! - Tasks are addressed by `(employee_id, department, task_id)`; any
//!   unresolved component makes the call a logged no-op.
//! - Updates are last-writer-wins with no transition validation.
//! - The role gate is not re-checked here; callers consult
//!   `Role::can_edit` before offering the action.

use crate::clock::Clock;
use crate::model::activity::{ActivityKind, NewActivity};
use crate::model::employee::Employee;
use crate::model::session::Session;
use crate::model::task::{Comment, Department, Task, TaskSetMap, TaskStatus};
use crate::repo::onboarding_repo::{OnboardingRepository, RepoError};
use crate::store::KeyValueStore;
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

#[derive(Debug)]
pub enum TaskServiceError {
    /// No user is logged in to attribute the change to.
    NoActiveSession,
    Repo(RepoError),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoActiveSession => write!(f, "no active session; log in before editing tasks"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NoActiveSession => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for TaskServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

pub struct TaskService<S: KeyValueStore, C: Clock> {
    repo: OnboardingRepository<S>,
    clock: C,
}

/// Resolved mutation target: the employee and the full map holding its task.
struct Target {
    employee: Employee,
    task_sets: TaskSetMap,
}

impl<S: KeyValueStore, C: Clock> TaskService<S, C> {
    pub fn new(repo: OnboardingRepository<S>, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Sets the status of one task.
    ///
    /// # Contract
    /// - Returns `Ok(None)` without writing when the key does not resolve.
    /// - `completed_at` becomes now for `Completed`, `None` otherwise.
    /// - Persists the task-set map and appends one `task_updated` activity.
    pub fn set_task_status(
        &self,
        employee_id: &str,
        department: Department,
        task_id: &str,
        status: TaskStatus,
    ) -> Result<Option<Task>, TaskServiceError> {
        let session = self.require_session()?;
        let Some(mut target) = self.resolve("task_status_update", employee_id, department, task_id)?
        else {
            return Ok(None);
        };

        let now = self.clock.now();
        let updated = match target.task_mut(employee_id, department, task_id) {
            Some(task) => {
                task.set_status(status, now);
                task.clone()
            }
            None => return Ok(None),
        };
        self.repo.save_task_sets(&target.task_sets)?;

        self.repo.append_activity(
            NewActivity::new(
                ActivityKind::TaskUpdated,
                session.name,
                format!("Updated {} to {}", updated.title, status),
            )
            .for_employee(target.employee.id, Some(target.employee.name))
            .into_activity(now),
        )?;

        info!(
            "event=task_status_update module=service status=ok employee_id={} department={} task_id={} new_status={}",
            employee_id, department, task_id, status
        );
        Ok(Some(updated))
    }

    /// Appends a comment to one task.
    ///
    /// # Contract
    /// - Blank `text` returns `Ok(None)` and changes nothing.
    /// - Unresolved keys return `Ok(None)` and change nothing.
    /// - The comment is appended last and attributed to the session user.
    /// - Persists the task-set map and appends one `comment_added` activity.
    pub fn add_comment(
        &self,
        employee_id: &str,
        department: Department,
        task_id: &str,
        text: &str,
    ) -> Result<Option<Comment>, TaskServiceError> {
        if text.trim().is_empty() {
            debug!("event=comment_add module=service status=skipped reason=blank_text");
            return Ok(None);
        }

        let session = self.require_session()?;
        let Some(mut target) = self.resolve("comment_add", employee_id, department, task_id)?
        else {
            return Ok(None);
        };

        let now = self.clock.now();
        let comment = Comment {
            id: Uuid::new_v4(),
            user: session.name.clone(),
            role: session.role,
            text: text.to_string(),
            timestamp: now,
        };
        let title = match target.task_mut(employee_id, department, task_id) {
            Some(task) => {
                task.comments.push(comment.clone());
                task.title.clone()
            }
            None => return Ok(None),
        };
        self.repo.save_task_sets(&target.task_sets)?;

        self.repo.append_activity(
            NewActivity::new(
                ActivityKind::CommentAdded,
                session.name,
                format!("Added comment to {title}"),
            )
            .for_employee(target.employee.id, Some(target.employee.name))
            .into_activity(now),
        )?;

        info!(
            "event=comment_add module=service status=ok employee_id={} department={} task_id={} chars={}",
            employee_id,
            department,
            task_id,
            text.chars().count()
        );
        Ok(Some(comment))
    }

    fn require_session(&self) -> Result<Session, TaskServiceError> {
        self.repo.load_session()?.ok_or_else(|| {
            warn!("event=task_mutation module=service status=rejected reason=no_session");
            TaskServiceError::NoActiveSession
        })
    }

    /// Loads employee and task sets and checks the full composite key.
    fn resolve(
        &self,
        event: &str,
        employee_id: &str,
        department: Department,
        task_id: &str,
    ) -> Result<Option<Target>, TaskServiceError> {
        let employee = self
            .repo
            .load_employees()?
            .into_iter()
            .find(|employee| employee.id == employee_id);
        let Some(employee) = employee else {
            warn!(
                "event={event} module=service status=skipped reason=employee_not_found employee_id={employee_id}"
            );
            return Ok(None);
        };

        let task_sets = self.repo.load_task_sets()?;
        let found = task_sets
            .get(employee_id)
            .map(|set| set.task(department, task_id).is_some());
        match found {
            Some(true) => Ok(Some(Target {
                employee,
                task_sets,
            })),
            Some(false) => {
                warn!(
                    "event={event} module=service status=skipped reason=task_not_found employee_id={employee_id} department={department} task_id={task_id}"
                );
                Ok(None)
            }
            None => {
                warn!(
                    "event={event} module=service status=skipped reason=task_set_not_found employee_id={employee_id}"
                );
                Ok(None)
            }
        }
    }
}

impl Target {
    fn task_mut(&mut self, employee_id: &str, department: Department, task_id: &str) -> Option<&mut Task> {
        self.task_sets
            .get_mut(employee_id)?
            .task_mut(department, task_id)
    }
}
