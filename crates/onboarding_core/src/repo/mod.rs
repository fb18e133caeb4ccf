//! Typed access to the onboarding store layout.
//!
//! # Responsibility
//! - Map domain records onto fixed, namespaced store keys.
//! - Keep JSON (de)serialization details out of service code.
//!
//! # Invariants
//! - Absent keys read as empty collections / `None` / default theme.
//! - Unparseable persisted JSON is reported, never silently replaced.

pub mod onboarding_repo;
