//! Onboarding domain model.
//!
//! # Responsibility
//! - Define canonical data structures for employees, onboarding task sets,
//!   the activity log and the login session.
//! - Keep JSON field naming stable for the persisted store layout.
//!
//! # Invariants
//! - Every employee owns exactly one `OnboardingTaskSet` keyed by its id.
//! - `Task::completed_at` is set iff `Task::status == TaskStatus::Completed`.
//! - Activity references to employees are denormalized copies, never joins.

pub mod activity;
pub mod employee;
pub mod session;
pub mod task;
