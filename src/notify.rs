use chrono::NaiveDateTime;

use crate::models::{Notification, Severity, Task};
use crate::utils;

/// Derive the notification feed from a task list and the current instant.
///
/// Completed tasks are excluded. Classification happens on every call
/// against the instant passed in; nothing is cached, so two calls around a
/// due-time boundary may classify the same task differently. Output keeps
/// the input task order.
pub fn derive(tasks: &[Task], now: NaiveDateTime) -> Vec<Notification> {
    tasks
        .iter()
        .filter(|task| !task.is_done)
        .map(|task| {
            let due = utils::parse_timestamp(&task.due_time);
            let severity = classify(due, now);
            Notification {
                severity,
                rendered_text: render(severity, task),
            }
        })
        .collect()
}

/// Overdue wins over DueToday: a task due earlier today whose time has
/// passed is Overdue, not DueToday.
fn classify(due: NaiveDateTime, now: NaiveDateTime) -> Severity {
    if due < now {
        Severity::Overdue
    } else if due.date() == now.date() {
        Severity::DueToday
    } else {
        Severity::Upcoming
    }
}

fn render(severity: Severity, task: &Task) -> String {
    format!(
        "{}: {} ({}) - Due: {} (Created: {})",
        severity.label(),
        task.subject_name,
        task.course_code,
        task.due_time,
        task.created_time
    )
}
