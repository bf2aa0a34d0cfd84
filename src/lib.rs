pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod models;
pub mod notify;
pub mod planner;
pub mod utils;

pub use auth::UserStore;
pub use config::Config;
pub use database::Database;
pub use models::{Notification, Severity, Task, User};
pub use planner::TaskPlanner;
pub use utils::Profile;
