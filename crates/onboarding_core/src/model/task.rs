//! Onboarding task model and per-department task catalog.
//!
//! # Responsibility
//! - Define task buckets (`hr|it|admin`), task status and comment shapes.
//! - Instantiate the fixed task catalog for a newly created employee.
//!
//! # Invariants
//! - A task set always carries exactly the three department buckets.
//! - `completed_at` is `Some` iff `status == Completed`; `set_status` is the
//!   only mutation path that touches either field.
//! - Comments are append-only.

use crate::model::employee::EmployeeId;
use crate::model::session::Role;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Task bucket owned by one onboarding department.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Department {
    Hr,
    It,
    Admin,
}

impl Department {
    /// Buckets in display order.
    pub const ALL: [Department; 3] = [Self::Hr, Self::It, Self::Admin];

    /// Stable storage/key form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hr => "hr",
            Self::It => "it",
            Self::Admin => "admin",
        }
    }

    /// Human-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Hr => "HR",
            Self::It => "IT",
            Self::Admin => "Admin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "hr" => Some(Self::Hr),
            "it" => Some(Self::It),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl Display for Department {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [Self::NotStarted, Self::InProgress, Self::Completed];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "not_started" => Some(Self::NotStarted),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comment attached to one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    /// Author display name.
    pub user: String,
    /// Author role at the time of writing.
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// One onboarding task instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Department-scoped id such as `hr-1`.
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub due_date: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Task {
    /// Builds a `not_started` task from one catalog template.
    pub fn from_template(template: &TaskTemplate, due_date: DateTime<Utc>) -> Self {
        Self {
            id: template.id.to_string(),
            title: template.title.to_string(),
            description: template.description.to_string(),
            status: TaskStatus::NotStarted,
            due_date,
            completed_at: None,
            comments: Vec::new(),
        }
    }

    /// Moves the task to `status`, keeping `completed_at` consistent.
    ///
    /// No transition rules apply: a completed task may move back to
    /// `not_started`.
    pub fn set_status(&mut self, status: TaskStatus, now: DateTime<Utc>) {
        self.status = status;
        self.completed_at = if status == TaskStatus::Completed {
            Some(now)
        } else {
            None
        };
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Open task whose due date already passed.
    pub fn is_delayed(&self, now: DateTime<Utc>) -> bool {
        !self.is_completed() && self.due_date < now
    }

    /// Returns whether `completed_at` agrees with `status`.
    pub fn is_consistent(&self) -> bool {
        self.is_completed() == self.completed_at.is_some()
    }
}

/// Ordered tasks of one department bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentTasks {
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl DepartmentTasks {
    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.is_completed()).count()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// All onboarding tasks of one employee, split by department.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingTaskSet {
    #[serde(default)]
    pub hr: DepartmentTasks,
    #[serde(default)]
    pub it: DepartmentTasks,
    #[serde(default)]
    pub admin: DepartmentTasks,
}

/// Task sets of every employee keyed by employee id.
pub type TaskSetMap = BTreeMap<EmployeeId, OnboardingTaskSet>;

impl OnboardingTaskSet {
    /// Instantiates the full catalog with every due date on `joining_date`.
    pub fn from_catalog(joining_date: NaiveDate) -> Self {
        let due_date = start_of_day_utc(joining_date);
        let build = |department: Department| DepartmentTasks {
            tasks: catalog(department)
                .iter()
                .map(|template| Task::from_template(template, due_date))
                .collect(),
        };

        Self {
            hr: build(Department::Hr),
            it: build(Department::It),
            admin: build(Department::Admin),
        }
    }

    pub fn bucket(&self, department: Department) -> &DepartmentTasks {
        match department {
            Department::Hr => &self.hr,
            Department::It => &self.it,
            Department::Admin => &self.admin,
        }
    }

    pub fn bucket_mut(&mut self, department: Department) -> &mut DepartmentTasks {
        match department {
            Department::Hr => &mut self.hr,
            Department::It => &mut self.it,
            Department::Admin => &mut self.admin,
        }
    }

    pub fn task(&self, department: Department, task_id: &str) -> Option<&Task> {
        self.bucket(department)
            .tasks
            .iter()
            .find(|task| task.id == task_id)
    }

    pub fn task_mut(&mut self, department: Department, task_id: &str) -> Option<&mut Task> {
        self.bucket_mut(department)
            .tasks
            .iter_mut()
            .find(|task| task.id == task_id)
    }

    /// Iterates every task together with its bucket, in bucket order.
    pub fn iter(&self) -> impl Iterator<Item = (Department, &Task)> + '_ {
        Department::ALL.into_iter().flat_map(move |department| {
            self.bucket(department)
                .tasks
                .iter()
                .map(move |task| (department, task))
        })
    }

    pub fn total_count(&self) -> usize {
        Department::ALL
            .into_iter()
            .map(|department| self.bucket(department).len())
            .sum()
    }

    pub fn completed_count(&self) -> usize {
        Department::ALL
            .into_iter()
            .map(|department| self.bucket(department).completed_count())
            .sum()
    }
}

/// Template for one catalog task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskTemplate {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

const HR_CATALOG: &[TaskTemplate] = &[
    TaskTemplate {
        id: "hr-1",
        title: "Employment Contract",
        description: "Review and sign employment contract",
    },
    TaskTemplate {
        id: "hr-2",
        title: "Company Policies",
        description: "Read and acknowledge company policies",
    },
    TaskTemplate {
        id: "hr-3",
        title: "Tax Documents",
        description: "Submit W-4 and state tax forms",
    },
    TaskTemplate {
        id: "hr-4",
        title: "Benefits Enrollment",
        description: "Complete health insurance and benefits selection",
    },
];

const IT_CATALOG: &[TaskTemplate] = &[
    TaskTemplate {
        id: "it-1",
        title: "Email Account Setup",
        description: "Create company email account",
    },
    TaskTemplate {
        id: "it-2",
        title: "Laptop Assignment",
        description: "Assign and configure laptop",
    },
    TaskTemplate {
        id: "it-3",
        title: "Software Access",
        description: "Grant access to required software and tools",
    },
    TaskTemplate {
        id: "it-4",
        title: "VPN & Security Setup",
        description: "Configure VPN and security credentials",
    },
];

const ADMIN_CATALOG: &[TaskTemplate] = &[
    TaskTemplate {
        id: "admin-1",
        title: "ID Card Creation",
        description: "Create employee ID card",
    },
    TaskTemplate {
        id: "admin-2",
        title: "Desk Assignment",
        description: "Assign desk and seating arrangement",
    },
    TaskTemplate {
        id: "admin-3",
        title: "Office Supplies",
        description: "Provide office supplies and equipment",
    },
];

/// Returns the fixed task catalog of one department.
pub fn catalog(department: Department) -> &'static [TaskTemplate] {
    match department {
        Department::Hr => HR_CATALOG,
        Department::It => IT_CATALOG,
        Department::Admin => ADMIN_CATALOG,
    }
}

/// Midnight UTC of `date`; used as the due timestamp of catalog tasks.
pub fn start_of_day_utc(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}
