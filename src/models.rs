use serde::{Deserialize, Serialize};

use crate::utils;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Option<i64>,
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub course: String,
    pub year_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Option<i64>,
    pub owner_username: String,
    pub subject_name: String,
    pub course_code: String,
    pub due_time: String,     // YYYY-MM-DD hh:mm AM/PM
    pub created_time: String, // same format, stamped at creation
    pub is_done: bool,
    pub completion_percentage: f64,
}

impl Task {
    pub fn new(
        owner_username: String,
        subject_name: String,
        course_code: String,
        due_time: String,
    ) -> Self {
        Self {
            id: None,
            owner_username,
            subject_name,
            course_code,
            due_time,
            created_time: utils::now_timestamp(),
            is_done: false,
            completion_percentage: 0.0,
        }
    }
}

/// Classification of a pending task relative to the current instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Overdue,
    DueToday,
    Upcoming,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Overdue => "Overdue",
            Severity::DueToday => "Due Today",
            Severity::Upcoming => "Due",
        }
    }
}

/// Derived on demand from the task list; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub severity: Severity,
    pub rendered_text: String,
}
