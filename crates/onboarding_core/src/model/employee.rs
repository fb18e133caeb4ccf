//! Employee domain model.
//!
//! # Responsibility
//! - Define the employee record and its creation input.
//! - Validate creation input before any store mutation happens.
//!
//! # Invariants
//! - `id` has the shape `EMP` + zero-padded sequence and is never reassigned.
//! - Only `status` may change after creation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable employee identifier, e.g. `EMP007`.
pub type EmployeeId = String;

const EMPLOYEE_ID_PREFIX: &str = "EMP";
const JOINING_DATE_FORMAT: &str = "%Y-%m-%d";

/// Formats one employee id from a 1-based sequence number.
pub fn format_employee_id(sequence: usize) -> EmployeeId {
    format!("{EMPLOYEE_ID_PREFIX}{sequence:03}")
}

/// Extracts the numeric sequence from an employee id.
///
/// Returns `None` when the prefix or the numeric suffix is malformed.
pub fn parse_employee_sequence(id: &str) -> Option<usize> {
    id.strip_prefix(EMPLOYEE_ID_PREFIX)?.parse().ok()
}

/// Business unit the employee is hired into.
///
/// Distinct from the `hr|it|admin` task buckets: an Engineering hire still
/// owns HR, IT and Admin onboarding tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OrgDepartment {
    Engineering,
    Marketing,
    Sales,
    #[serde(rename = "HR")]
    HumanResources,
    Finance,
    Operations,
}

impl OrgDepartment {
    pub const ALL: [OrgDepartment; 6] = [
        Self::Engineering,
        Self::Marketing,
        Self::Sales,
        Self::HumanResources,
        Self::Finance,
        Self::Operations,
    ];

    /// Display label, identical to the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Engineering => "Engineering",
            Self::Marketing => "Marketing",
            Self::Sales => "Sales",
            Self::HumanResources => "HR",
            Self::Finance => "Finance",
            Self::Operations => "Operations",
        }
    }

    /// Parses a department label, ignoring case and surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim();
        Self::ALL
            .into_iter()
            .find(|department| department.as_str().eq_ignore_ascii_case(normalized))
    }
}

impl Display for OrgDepartment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Employment status. Every record is created `active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    #[default]
    Active,
}

/// Persisted employee record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub email: String,
    pub department: OrgDepartment,
    pub job_role: String,
    /// Calendar date; serialized as `YYYY-MM-DD`.
    pub joining_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub status: EmployeeStatus,
}

/// Raw creation input as collected from a form.
///
/// Every field is text so that a missing department or date surfaces as a
/// validation rejection instead of a parse failure at the call site.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub department: String,
    pub job_role: String,
    /// `YYYY-MM-DD`.
    pub joining_date: String,
}

/// Creation input after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedEmployee {
    pub name: String,
    pub email: String,
    pub department: OrgDepartment,
    pub job_role: String,
    pub joining_date: NaiveDate,
}

impl NewEmployee {
    /// Checks that every field is present and well formed.
    ///
    /// Text fields are trimmed; the first missing field is reported.
    pub fn validate(&self) -> Result<ValidatedEmployee, EmployeeValidationError> {
        let name = required("name", &self.name)?;
        let email = required("email", &self.email)?;
        let department_text = required("department", &self.department)?;
        let job_role = required("job_role", &self.job_role)?;
        let joining_text = required("joining_date", &self.joining_date)?;

        let department = OrgDepartment::parse(department_text)
            .ok_or_else(|| EmployeeValidationError::UnknownDepartment(department_text.to_string()))?;
        let joining_date = NaiveDate::parse_from_str(joining_text, JOINING_DATE_FORMAT)
            .map_err(|_| EmployeeValidationError::InvalidJoiningDate(joining_text.to_string()))?;

        Ok(ValidatedEmployee {
            name: name.to_string(),
            email: email.to_string(),
            department,
            job_role: job_role.to_string(),
            joining_date,
        })
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, EmployeeValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EmployeeValidationError::MissingField(field));
    }
    Ok(trimmed)
}

/// Validation failures for employee creation input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeeValidationError {
    MissingField(&'static str),
    UnknownDepartment(String),
    InvalidJoiningDate(String),
}

impl EmployeeValidationError {
    /// Stable, text-free code for log records.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "missing_field",
            Self::UnknownDepartment(_) => "unknown_department",
            Self::InvalidJoiningDate(_) => "invalid_joining_date",
        }
    }
}

impl Display for EmployeeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "required field `{field}` is empty"),
            Self::UnknownDepartment(value) => write!(f, "unknown department `{value}`"),
            Self::InvalidJoiningDate(value) => {
                write!(f, "joining date `{value}` is not a YYYY-MM-DD date")
            }
        }
    }
}

impl Error for EmployeeValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_input() -> NewEmployee {
        NewEmployee {
            name: "Dana Lee".to_string(),
            email: "dana.lee@company.com".to_string(),
            department: "Engineering".to_string(),
            job_role: "Platform Engineer".to_string(),
            joining_date: "2024-03-01".to_string(),
        }
    }

    #[test]
    fn employee_ids_are_zero_padded() {
        assert_eq!(format_employee_id(1), "EMP001");
        assert_eq!(format_employee_id(42), "EMP042");
        assert_eq!(format_employee_id(1234), "EMP1234");
        assert_eq!(parse_employee_sequence("EMP042"), Some(42));
        assert_eq!(parse_employee_sequence("USR042"), None);
    }

    #[test]
    fn validate_trims_and_parses_fields() {
        let mut input = complete_input();
        input.name = "  Dana Lee ".to_string();
        input.department = "engineering".to_string();

        let validated = input.validate().unwrap();
        assert_eq!(validated.name, "Dana Lee");
        assert_eq!(validated.department, OrgDepartment::Engineering);
        assert_eq!(
            validated.joining_date,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
    }

    #[test]
    fn validate_reports_first_missing_field() {
        let mut input = complete_input();
        input.job_role = "   ".to_string();
        assert_eq!(
            input.validate().unwrap_err(),
            EmployeeValidationError::MissingField("job_role")
        );

        let empty = NewEmployee::default();
        assert_eq!(
            empty.validate().unwrap_err(),
            EmployeeValidationError::MissingField("name")
        );
    }

    #[test]
    fn validate_rejects_malformed_department_and_date() {
        let mut input = complete_input();
        input.department = "Legal".to_string();
        assert!(matches!(
            input.validate(),
            Err(EmployeeValidationError::UnknownDepartment(_))
        ));

        let mut input = complete_input();
        input.joining_date = "03/01/2024".to_string();
        assert!(matches!(
            input.validate(),
            Err(EmployeeValidationError::InvalidJoiningDate(_))
        ));
    }

    #[test]
    fn hr_department_serializes_as_acronym() {
        let json = serde_json::to_string(&OrgDepartment::HumanResources).unwrap();
        assert_eq!(json, "\"HR\"");
    }
}
