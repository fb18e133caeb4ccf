//! Login session, role gate and UI preference model.
//!
//! # Responsibility
//! - Define the single-slot session record persisted on login.
//! - Decide which task buckets a role may edit.
//!
//! # Invariants
//! - `hr` may edit every bucket; `it` and `admin` only their own.
//! - The role gate is advisory: mutation entry points do not re-check it.

use crate::model::task::Department;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

static NAME_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[._\-+\s]+").expect("valid name separator regex"));

/// Role chosen at login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Hr,
    It,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Self::Hr, Self::It, Self::Admin];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hr => "hr",
            Self::It => "it",
            Self::Admin => "admin",
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

    /// Task bucket owned by this role.
    pub fn department(self) -> Department {
        match self {
            Self::Hr => Department::Hr,
            Self::It => Department::It,
            Self::Admin => Department::Admin,
        }
    }

    /// Returns whether this role may change tasks in `department`.
    pub fn can_edit(self, department: Department) -> bool {
        self == Self::Hr || self.department() == department
    }

    /// Buckets shown on the task board by default: all for `hr`, own bucket
    /// otherwise.
    pub fn default_board_scope(self) -> Option<Department> {
        match self {
            Self::Hr => None,
            other => Some(other.department()),
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logged-in user. At most one is stored at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub name: String,
    pub login_at: DateTime<Utc>,
}

impl Session {
    pub fn can_edit(&self, department: Department) -> bool {
        self.role.can_edit(department)
    }
}

/// Derives a display name from the local part of `email`.
///
/// `jane.doe-smith@x.io` becomes `Jane Doe Smith`; an empty or
/// separator-only local part yields an empty string.
pub fn derive_display_name(email: &str) -> String {
    let local = email.trim().split('@').next().unwrap_or_default();
    NAME_SEPARATOR_RE
        .split(local)
        .filter(|segment| !segment.is_empty())
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Color theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}
