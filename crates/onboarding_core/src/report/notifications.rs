//! Pending-work and upcoming-joining notices.

use crate::model::employee::{Employee, EmployeeId};
use crate::model::task::{start_of_day_utc, Department, TaskSetMap};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    /// One bucket of one employee still has open tasks.
    Pending {
        employee_id: EmployeeId,
        employee_name: String,
        department: Department,
        count: usize,
        joining_date: NaiveDate,
    },
    /// Employee joins within the upcoming window.
    Upcoming {
        employee_id: EmployeeId,
        employee_name: String,
        days: i64,
        joining_date: NaiveDate,
    },
}

/// Builds notices per employee (pending buckets first, then the upcoming
/// notice) and keeps the first `limit`.
pub fn build_notifications(
    employees: &[Employee],
    task_sets: &TaskSetMap,
    now: DateTime<Utc>,
    upcoming_window_days: i64,
    limit: usize,
) -> Vec<Notification> {
    let mut notices = Vec::new();

    for employee in employees {
        if let Some(set) = task_sets.get(&employee.id) {
            for department in Department::ALL {
                let open = set
                    .bucket(department)
                    .tasks
                    .iter()
                    .filter(|task| !task.is_completed())
                    .count();
                if open > 0 {
                    notices.push(Notification::Pending {
                        employee_id: employee.id.clone(),
                        employee_name: employee.name.clone(),
                        department,
                        count: open,
                        joining_date: employee.joining_date,
                    });
                }
            }
        }

        let days = days_until(employee.joining_date, now);
        if days > 0 && days <= upcoming_window_days {
            notices.push(Notification::Upcoming {
                employee_id: employee.id.clone(),
                employee_name: employee.name.clone(),
                days,
                joining_date: employee.joining_date,
            });
        }
    }

    notices.truncate(limit);
    notices
}

/// Whole days from `now` to the start of `date`, rounded up; zero or
/// negative once the date has begun.
pub fn days_until(date: NaiveDate, now: DateTime<Utc>) -> i64 {
    let remaining_ms = (start_of_day_utc(date) - now).num_milliseconds();
    if remaining_ms <= 0 {
        return remaining_ms / MILLIS_PER_DAY;
    }
    (remaining_ms + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
}
