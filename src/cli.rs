use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::auth::{RegisterOutcome, UserStore};
use crate::database::Database;
use crate::database::DatabaseError;
use crate::planner::TaskPlanner;
use crate::utils::{self, validate_timestamp};

#[derive(Parser)]
#[command(name = "studytrack")]
#[command(about = "Student task planner with due-date notifications")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Use development mode (uses separate dev config/database)
    #[arg(long)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register a new account
    Register {
        /// Username (unique, case-insensitive)
        username: String,
        /// Password
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        course: String,
        #[arg(long)]
        year_level: String,
    },
    /// Verify a username/password pair
    Login {
        username: String,
        password: String,
    },
    /// Show a registered profile
    Profile {
        username: String,
    },
    /// Add a task for a user
    AddTask {
        /// Owner username
        username: String,
        /// Subject name
        subject: String,
        /// Course code
        #[arg(long)]
        course_code: String,
        /// Due time (YYYY-MM-DD hh:mm AM/PM)
        #[arg(long)]
        due: String,
    },
    /// List a user's tasks
    ListTasks {
        username: String,
    },
    /// Overwrite a task's subject, course code and due time
    EditTask {
        username: String,
        /// Task ID
        id: i64,
        subject: String,
        #[arg(long)]
        course_code: String,
        /// Due time (YYYY-MM-DD hh:mm AM/PM)
        #[arg(long)]
        due: String,
    },
    /// Flip a task between pending and done
    ToggleTask {
        username: String,
        /// Task ID
        id: i64,
    },
    /// Delete a task
    DeleteTask {
        username: String,
        /// Task ID
        id: i64,
    },
    /// Show the due-date notification feed
    Notifications {
        username: String,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),
    #[error("Failed to parse due time: {0}")]
    DateParseError(String),
}

fn check_due_time(due: &str) -> Result<(), CliError> {
    validate_timestamp(due).map_err(|e| {
        CliError::DateParseError(format!(
            "Invalid due time '{}' (expected YYYY-MM-DD hh:mm AM/PM): {}",
            due, e
        ))
    })?;
    Ok(())
}

/// Handle the register command
pub fn handle_register(
    username: String,
    password: String,
    first_name: String,
    last_name: String,
    course: String,
    year_level: String,
    db: &Database,
) -> Result<(), CliError> {
    let users = UserStore::new(db);
    match users.register(
        &first_name,
        &last_name,
        &course,
        &year_level,
        &username,
        &password,
    )? {
        RegisterOutcome::Created(id) => println!("Account created successfully (ID: {})", id),
        RegisterOutcome::AlreadyExists => println!("Username is already taken"),
    }
    Ok(())
}

/// Handle the login command
pub fn handle_login(username: String, password: String, db: &Database) -> Result<(), CliError> {
    let users = UserStore::new(db);
    if users.verify_credentials(&username, &password)? {
        println!("Login successful");
    } else {
        println!("Invalid username or password");
    }
    Ok(())
}

/// Handle the profile command
pub fn handle_profile(username: String, db: &Database) -> Result<(), CliError> {
    let users = UserStore::new(db);
    match users.get_profile(&username)? {
        Some(profile) => {
            println!("{} {}", profile.first_name, profile.last_name);
            println!("{} - Year {}", profile.course, profile.year_level);
            println!("Username: {}", profile.username);
        }
        None => println!("No profile found for '{}'", username.trim()),
    }
    Ok(())
}

/// Handle the add-task command
pub fn handle_add_task(
    username: String,
    subject: String,
    course_code: String,
    due: String,
    db: &Database,
) -> Result<(), CliError> {
    check_due_time(&due)?;

    let mut planner = TaskPlanner::new(db, &username)?;
    let task = planner.add_task(&subject, &course_code, &due)?;
    println!(
        "Task created successfully (ID: {})",
        task.id.unwrap_or_default()
    );
    Ok(())
}

/// Handle the list-tasks command
pub fn handle_list_tasks(username: String, db: &Database) -> Result<(), CliError> {
    let planner = TaskPlanner::new(db, &username)?;
    if planner.tasks().is_empty() {
        println!("No tasks for '{}'", planner.owner());
        return Ok(());
    }
    for task in planner.tasks() {
        let marker = if task.is_done { "x" } else { " " };
        println!(
            "[{}] {}. {} ({}) - Due: {}",
            marker,
            task.id.unwrap_or_default(),
            task.subject_name,
            task.course_code,
            task.due_time
        );
    }
    Ok(())
}

/// Handle the edit-task command
pub fn handle_edit_task(
    username: String,
    id: i64,
    subject: String,
    course_code: String,
    due: String,
    db: &Database,
) -> Result<(), CliError> {
    check_due_time(&due)?;

    let mut planner = TaskPlanner::new(db, &username)?;
    planner.start_editing_task(id);
    planner.update_task(id, &subject, &course_code, &due)?;
    planner.clear_editing_task();
    println!("Task updated");
    Ok(())
}

/// Handle the toggle-task command
pub fn handle_toggle_task(username: String, id: i64, db: &Database) -> Result<(), CliError> {
    let mut planner = TaskPlanner::new(db, &username)?;
    planner.toggle_task_status(id)?;
    match planner.tasks().iter().find(|t| t.id == Some(id)) {
        Some(task) if task.is_done => println!("Task marked as done"),
        Some(_) => println!("Task marked as pending"),
        None => println!("No task with ID {}", id),
    }
    Ok(())
}

/// Handle the delete-task command
pub fn handle_delete_task(username: String, id: i64, db: &Database) -> Result<(), CliError> {
    let mut planner = TaskPlanner::new(db, &username)?;
    planner.delete_task(id)?;
    println!("Task deleted");
    Ok(())
}

/// Handle the notifications command
pub fn handle_notifications(username: String, db: &Database) -> Result<(), CliError> {
    let planner = TaskPlanner::new(db, &username)?;
    let feed = planner.notifications(utils::now_naive());
    if feed.is_empty() {
        println!("No notifications");
        return Ok(());
    }
    for notification in feed {
        println!("{}", notification.rendered_text);
    }
    Ok(())
}
