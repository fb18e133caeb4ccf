//! Onboarding use-case services.
//!
//! # Responsibility
//! - Orchestrate repository reads/writes into the domain operations.
//! - Append activity entries for every user-visible mutation.
//!
//! # Invariants
//! - Services never touch the store except through `OnboardingRepository`.
//! - Lookup misses are logged no-ops (`Ok(None)`); validation failures are
//!   typed errors and leave the store untouched.

pub mod employee_service;
pub mod report_service;
pub mod seed_service;
pub mod session_service;
pub mod task_service;
