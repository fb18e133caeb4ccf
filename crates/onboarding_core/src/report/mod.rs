//! Read-side projections over employees and task sets.
//!
//! # Responsibility
//! - Compute per-employee progress and fleet-level rollups.
//! - Build task board, roster and notification views.
//!
//! # Invariants
//! - Every function here is pure; `now` is always passed in.
//! - Percentages are derived on read and never persisted.

pub mod board;
pub mod fleet;
pub mod notifications;
pub mod progress;
pub mod roster;
