//! Read-side service for dashboards, reports and the activity feed.
//!
//! # Responsibility
//! - Load one consistent snapshot of employees and task sets.
//! - Expose the pure `report::*` projections over that snapshot.

use crate::clock::Clock;
use crate::config::{CoreConfig, DEFAULT_NOTIFICATION_LIMIT, DEFAULT_UPCOMING_WINDOW_DAYS};
use crate::model::activity::{filter_activities, Activity, ActivityKind};
use crate::model::employee::{Employee, OrgDepartment};
use crate::model::task::{TaskSetMap, TaskStatus};
use crate::report::board::{group_by_status, task_board, BoardEntry, BoardFilter};
use crate::report::fleet::{
    average_completion, bucket_completion, dashboard_stats, headcount_by_department, joining_timeline,
    org_department_breakdown, status_distribution, BucketCompletion, DashboardStats,
    OrgDepartmentTasks, StatusDistribution, TimelinePoint,
};
use crate::report::notifications::{build_notifications, Notification};
use crate::report::progress::{compute_progress, ProgressSummary};
use crate::report::roster::{roster, RosterEntry, RosterQuery};
use crate::repo::onboarding_repo::{OnboardingRepository, RepoResult};
use crate::store::KeyValueStore;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Employees and task sets read together, plus the instant they were read.
#[derive(Debug, Clone)]
pub struct FleetSnapshot {
    pub employees: Vec<Employee>,
    pub task_sets: TaskSetMap,
    pub taken_at: DateTime<Utc>,
}

impl FleetSnapshot {
    pub fn dashboard(&self) -> DashboardStats {
        dashboard_stats(&self.employees, &self.task_sets, self.taken_at)
    }

    pub fn progress_of(&self, employee_id: &str) -> Option<ProgressSummary> {
        self.task_sets.get(employee_id).map(compute_progress)
    }

    pub fn average_completion(&self) -> u32 {
        average_completion(&self.employees, &self.task_sets)
    }

    pub fn headcount(&self) -> Vec<(OrgDepartment, usize)> {
        headcount_by_department(&self.employees)
    }

    pub fn org_breakdown(&self) -> Vec<OrgDepartmentTasks> {
        org_department_breakdown(&self.employees, &self.task_sets)
    }

    pub fn status_distribution(&self) -> StatusDistribution {
        status_distribution(&self.employees, &self.task_sets)
    }

    pub fn timeline(&self) -> Vec<TimelinePoint> {
        joining_timeline(&self.employees, &self.task_sets)
    }

    pub fn bucket_completion(&self) -> Vec<BucketCompletion> {
        bucket_completion(&self.employees, &self.task_sets)
    }

    pub fn roster(&self, query: &RosterQuery) -> Vec<RosterEntry<'_>> {
        roster(&self.employees, &self.task_sets, query)
    }

    pub fn board(&self, filter: &BoardFilter) -> Vec<BoardEntry<'_>> {
        task_board(&self.employees, &self.task_sets, filter)
    }

    pub fn board_by_status(
        &self,
        filter: &BoardFilter,
    ) -> BTreeMap<TaskStatus, Vec<BoardEntry<'_>>> {
        group_by_status(self.board(filter))
    }
}

pub struct ReportService<S: KeyValueStore, C: Clock> {
    repo: OnboardingRepository<S>,
    clock: C,
    notification_limit: usize,
    upcoming_window_days: i64,
}

impl<S: KeyValueStore, C: Clock> ReportService<S, C> {
    pub fn new(repo: OnboardingRepository<S>, clock: C) -> Self {
        Self {
            repo,
            clock,
            notification_limit: DEFAULT_NOTIFICATION_LIMIT,
            upcoming_window_days: DEFAULT_UPCOMING_WINDOW_DAYS,
        }
    }

    /// Applies notification settings from `config`.
    pub fn with_config(mut self, config: &CoreConfig) -> Self {
        self.notification_limit = config.notifications.limit;
        self.upcoming_window_days = config.notifications.upcoming_window_days;
        self
    }

    pub fn snapshot(&self) -> RepoResult<FleetSnapshot> {
        Ok(FleetSnapshot {
            employees: self.repo.load_employees()?,
            task_sets: self.repo.load_task_sets()?,
            taken_at: self.clock.now(),
        })
    }

    pub fn dashboard(&self) -> RepoResult<DashboardStats> {
        Ok(self.snapshot()?.dashboard())
    }

    /// Progress of one employee; `None` when it has no task set.
    pub fn employee_progress(&self, employee_id: &str) -> RepoResult<Option<ProgressSummary>> {
        Ok(self.repo.load_task_sets()?.get(employee_id).map(compute_progress))
    }

    pub fn notifications(&self) -> RepoResult<Vec<Notification>> {
        let snapshot = self.snapshot()?;
        Ok(build_notifications(
            &snapshot.employees,
            &snapshot.task_sets,
            snapshot.taken_at,
            self.upcoming_window_days,
            self.notification_limit,
        ))
    }

    /// Activity log entries, newest first, filtered by kind and text.
    pub fn activity(&self, kind: Option<ActivityKind>, query: &str) -> RepoResult<Vec<Activity>> {
        let log = self.repo.load_activity()?;
        Ok(filter_activities(&log, kind, query)
            .into_iter()
            .cloned()
            .collect())
    }
}
