//! Core domain logic for the employee onboarding tracker.
//! This crate is the single source of truth for onboarding invariants.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod report;
pub mod service;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, CoreConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::activity::{Activity, ActivityKind, NewActivity};
pub use model::employee::{
    Employee, EmployeeId, EmployeeStatus, EmployeeValidationError, NewEmployee, OrgDepartment,
};
pub use model::session::{Role, Session, Theme};
pub use model::task::{Comment, Department, OnboardingTaskSet, Task, TaskSetMap, TaskStatus};
pub use repo::onboarding_repo::{OnboardingRepository, RepoError, RepoResult};
pub use report::progress::{compute_progress, ProgressSummary};
pub use service::employee_service::{EmployeeService, EmployeeServiceError};
pub use service::report_service::{FleetSnapshot, ReportService};
pub use service::seed_service::{DemoSeeder, SeedOutcome};
pub use service::session_service::{SessionService, SessionServiceError};
pub use service::task_service::{TaskService, TaskServiceError};
pub use store::{KeyValueStore, MemoryStore, SqliteStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
