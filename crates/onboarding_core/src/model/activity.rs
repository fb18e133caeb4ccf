//! Activity log model.
//!
//! # Responsibility
//! - Define audit entries for login/logout, employee creation and task edits.
//! - Keep the global log bounded and newest-first.
//!
//! # Invariants
//! - The log never holds more than its cap; the oldest entries fall off.
//! - Employee references are denormalized copies and may dangle.

use crate::model::employee::EmployeeId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Number of entries retained when no explicit cap is configured.
pub const DEFAULT_ACTIVITY_LOG_CAP: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Login,
    Logout,
    EmployeeCreated,
    TaskUpdated,
    CommentAdded,
}

impl ActivityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Logout => "logout",
            Self::EmployeeCreated => "employee_created",
            Self::TaskUpdated => "task_updated",
            Self::CommentAdded => "comment_added",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "login" => Some(Self::Login),
            "logout" => Some(Self::Logout),
            "employee_created" => Some(Self::EmployeeCreated),
            "task_updated" => Some(Self::TaskUpdated),
            "comment_added" => Some(Self::CommentAdded),
            _ => None,
        }
    }
}

impl Display for ActivityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One persisted activity entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub user: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<EmployeeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_name: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Activity payload before id and timestamp are stamped on append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActivity {
    pub kind: ActivityKind,
    pub user: String,
    pub description: String,
    pub employee_id: Option<EmployeeId>,
    pub employee_name: Option<String>,
}

impl NewActivity {
    pub fn new(kind: ActivityKind, user: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind,
            user: user.into(),
            description: description.into(),
            employee_id: None,
            employee_name: None,
        }
    }

    /// Attaches the employee this entry refers to.
    pub fn for_employee(mut self, id: impl Into<EmployeeId>, name: Option<String>) -> Self {
        self.employee_id = Some(id.into());
        self.employee_name = name;
        self
    }

    /// Stamps a fresh id and `timestamp`.
    pub fn into_activity(self, timestamp: DateTime<Utc>) -> Activity {
        Activity {
            id: Uuid::new_v4(),
            kind: self.kind,
            user: self.user,
            description: self.description,
            employee_id: self.employee_id,
            employee_name: self.employee_name,
            timestamp,
        }
    }
}

/// Prepends `entry` and drops everything beyond `cap`.
pub fn push_bounded(log: &mut Vec<Activity>, entry: Activity, cap: usize) {
    log.insert(0, entry);
    log.truncate(cap);
}

/// Filters the log by optional kind and a case-insensitive query matched
/// against description and user.
pub fn filter_activities<'a>(
    log: &'a [Activity],
    kind: Option<ActivityKind>,
    query: &str,
) -> Vec<&'a Activity> {
    let needle = query.trim().to_lowercase();
    log.iter()
        .filter(|entry| kind.map_or(true, |kind| entry.kind == kind))
        .filter(|entry| {
            needle.is_empty()
                || entry.description.to_lowercase().contains(&needle)
                || entry.user.to_lowercase().contains(&needle)
        })
        .collect()
}
