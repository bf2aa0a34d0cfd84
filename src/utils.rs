use chrono::NaiveDateTime;
use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

/// Timestamp format used for all due/created times, both in storage and
/// display: 12-hour clock with AM/PM marker (e.g. "2024-06-15 06:00 PM").
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %I:%M %p";

/// Profile mode for the application (dev or prod)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Dev,
    Prod,
}

/// Get the configuration directory path for studytrack
/// If profile is Dev, uses "studytrack-dev" instead of "studytrack"
pub fn get_config_dir(profile: Profile) -> Option<PathBuf> {
    let app_name = match profile {
        Profile::Dev => "studytrack-dev",
        Profile::Prod => "studytrack",
    };
    ProjectDirs::from("com", "studytrack", app_name).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the data directory path for studytrack
/// If profile is Dev, uses "studytrack-dev" instead of "studytrack"
pub fn get_data_dir(profile: Profile) -> Option<PathBuf> {
    let app_name = match profile {
        Profile::Dev => "studytrack-dev",
        Profile::Prod => "studytrack",
    };
    ProjectDirs::from("com", "studytrack", app_name).map(|dirs| dirs.data_dir().to_path_buf())
}

/// Expand `~` in a path string to the user's home directory
pub fn expand_path(path: &str) -> PathBuf {
    if path.starts_with("~/") {
        if let Some(home) = BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            return home.join(&path[2..]);
        }
    }
    PathBuf::from(path)
}

/// Current local time rendered in [`TIMESTAMP_FORMAT`]
pub fn now_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Current local time as a naive timestamp, for classification
pub fn now_naive() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Parse a timestamp in [`TIMESTAMP_FORMAT`], trimming surrounding whitespace.
/// Malformed values degrade to the Unix epoch instead of erroring; stored
/// timestamps are display strings and a bad one must not break the feed.
pub fn parse_timestamp(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT)
        .unwrap_or_else(|_| chrono::DateTime::UNIX_EPOCH.naive_utc())
}

/// Strict variant for validating user input at the CLI edge
pub fn validate_timestamp(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT)
}
