use rusqlite::Connection;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::{Task, User};

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),
    #[error("Failed to create database directory: {0}")]
    DirectoryError(String),
}

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Create a new database connection and initialize the schema
    pub fn new(path: &str) -> Result<Self, DatabaseError> {
        let db_path = PathBuf::from(path);

        // Create parent directory if it doesn't exist
        if let Some(parent) = db_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DatabaseError::DirectoryError(e.to_string()))?;
            }
        }

        // Open or create the database
        let conn = Connection::open(&db_path)?;

        let db = Database { conn };
        db.initialize_schema()?;

        Ok(db)
    }

    /// Initialize the database schema (tables and indexes)
    fn initialize_schema(&self) -> Result<(), DatabaseError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                username    TEXT UNIQUE NOT NULL,
                password    TEXT NOT NULL,
                first_name  TEXT NOT NULL,
                last_name   TEXT NOT NULL,
                course      TEXT NOT NULL,
                year_level  TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS tasks (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                username     TEXT NOT NULL,
                subject_name TEXT NOT NULL,
                course_code  TEXT NOT NULL,
                due_time     TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_users_username ON users(username)",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_tasks_username ON tasks(username)",
            [],
        )?;

        // Migrate existing tables to add task completion columns if missing
        self.migrate_extend_tasks()?;

        Ok(())
    }

    /// Migrate the tasks table to carry completion state and creation time.
    /// Older databases only stored subject/course/due columns; rows from them
    /// decode with the column defaults.
    fn migrate_extend_tasks(&self) -> Result<(), DatabaseError> {
        // Helper to check if a column exists
        fn column_exists(
            conn: &Connection,
            table: &str,
            column: &str,
        ) -> Result<bool, DatabaseError> {
            let mut stmt =
                conn.prepare("SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2")?;
            let count: i64 = stmt.query_row(rusqlite::params![table, column], |row| row.get(0))?;
            Ok(count > 0)
        }

        if !column_exists(&self.conn, "tasks", "is_done")? {
            self.conn.execute(
                "ALTER TABLE tasks ADD COLUMN is_done INTEGER NOT NULL DEFAULT 0",
                [],
            )?;
        }

        if !column_exists(&self.conn, "tasks", "completion_percentage")? {
            self.conn.execute(
                "ALTER TABLE tasks ADD COLUMN completion_percentage REAL NOT NULL DEFAULT 0",
                [],
            )?;
        }

        if !column_exists(&self.conn, "tasks", "created_time")? {
            self.conn
                .execute("ALTER TABLE tasks ADD COLUMN created_time TEXT", [])?;
        }

        Ok(())
    }

    /// Insert a user into the database and return its ID
    pub fn insert_user(&self, user: &User) -> Result<i64, DatabaseError> {
        self.conn.execute(
            "INSERT INTO users (username, password, first_name, last_name, course, year_level)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                user.username,
                user.password_hash,
                user.first_name,
                user.last_name,
                user.course,
                user.year_level
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Helper function to map a row to a User
    fn row_to_user(row: &rusqlite::Row) -> Result<User, rusqlite::Error> {
        Ok(User {
            id: Some(row.get(0)?),
            username: row.get(1)?,
            password_hash: row.get(2)?,
            first_name: row.get(3)?,
            last_name: row.get(4)?,
            course: row.get(5)?,
            year_level: row.get(6)?,
        })
    }

    /// Look up a user by username (trimmed, case-insensitive).
    /// Returns None when no row matches.
    pub fn find_user(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, username, password, first_name, last_name, course, year_level
             FROM users WHERE username = ?1 COLLATE NOCASE",
        )?;

        let result = stmt.query_row(rusqlite::params![username.trim()], Self::row_to_user);

        match result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DatabaseError::from(e)),
        }
    }

    /// Insert a task into the database and return its ID
    pub fn insert_task(&self, task: &Task) -> Result<i64, DatabaseError> {
        self.conn.execute(
            "INSERT INTO tasks (username, subject_name, course_code, due_time, is_done, completion_percentage, created_time)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                task.owner_username,
                task.subject_name,
                task.course_code,
                task.due_time,
                if task.is_done { 1 } else { 0 },
                task.completion_percentage,
                task.created_time
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Helper function to map a row to a Task
    fn row_to_task(row: &rusqlite::Row) -> Result<Task, rusqlite::Error> {
        Ok(Task {
            id: Some(row.get(0)?),
            owner_username: row.get(1)?,
            subject_name: row.get(2)?,
            course_code: row.get(3)?,
            due_time: row.get(4)?,
            is_done: row.get::<_, i64>(5)? != 0,
            completion_percentage: row.get(6)?,
            // Pre-migration rows have no created_time; leave it empty and let
            // timestamp parsing degrade to the epoch.
            created_time: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
        })
    }

    /// Get all tasks belonging to an owner (trimmed, case-insensitive match),
    /// in insertion order
    pub fn list_tasks_by_owner(&self, owner: &str) -> Result<Vec<Task>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, username, subject_name, course_code, due_time, is_done, completion_percentage, created_time
             FROM tasks WHERE username = ?1 COLLATE NOCASE ORDER BY id ASC",
        )?;
        let tasks = stmt
            .query_map(rusqlite::params![owner.trim()], Self::row_to_task)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(tasks)
    }

    /// Update an existing task's fields
    pub fn update_task(&self, task: &Task) -> Result<(), DatabaseError> {
        let id = task.id.ok_or_else(|| {
            DatabaseError::SqliteError(rusqlite::Error::InvalidColumnType(
                0,
                "id".to_string(),
                rusqlite::types::Type::Null,
            ))
        })?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "UPDATE tasks SET subject_name = ?1, course_code = ?2, due_time = ?3,
             is_done = ?4, completion_percentage = ?5 WHERE id = ?6",
            rusqlite::params![
                task.subject_name,
                task.course_code,
                task.due_time,
                if task.is_done { 1 } else { 0 },
                task.completion_percentage,
                id
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Set a task's completion flag
    pub fn set_task_done(&self, id: i64, done: bool) -> Result<(), DatabaseError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "UPDATE tasks SET is_done = ?1 WHERE id = ?2",
            rusqlite::params![if done { 1 } else { 0 }, id],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Delete a task by ID
    pub fn delete_task(&self, id: i64) -> Result<(), DatabaseError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM tasks WHERE id = ?1", rusqlite::params![id])?;
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Task;

    fn open_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("app.db");
        let db = Database::new(path.to_str().expect("utf-8 path")).expect("open db");
        (dir, db)
    }

    #[test]
    fn task_round_trips_through_storage() {
        let (_dir, db) = open_db();
        let task = Task::new(
            "mia".to_string(),
            "Data Structures".to_string(),
            "CS201".to_string(),
            "2024-06-15 06:00 PM".to_string(),
        );
        let id = db.insert_task(&task).expect("insert");

        let tasks = db.list_tasks_by_owner("mia").expect("list");
        assert_eq!(tasks.len(), 1);
        let stored = &tasks[0];
        assert_eq!(stored.id, Some(id));
        assert_eq!(stored.subject_name, "Data Structures");
        assert_eq!(stored.course_code, "CS201");
        assert_eq!(stored.due_time, "2024-06-15 06:00 PM");
        assert_eq!(stored.created_time, task.created_time);
        assert!(!stored.is_done);
        assert_eq!(stored.completion_percentage, 0.0);
    }

    #[test]
    fn owner_filter_is_trimmed_and_case_insensitive() {
        let (_dir, db) = open_db();
        let task = Task::new(
            "Mia".to_string(),
            "Algorithms".to_string(),
            "CS301".to_string(),
            "2024-06-16 09:00 AM".to_string(),
        );
        db.insert_task(&task).expect("insert");

        assert_eq!(db.list_tasks_by_owner("mia").expect("list").len(), 1);
        assert_eq!(db.list_tasks_by_owner("  MIA  ").expect("list").len(), 1);
    }

    #[test]
    fn tasks_never_leak_across_owners() {
        let (_dir, db) = open_db();
        for owner in ["mia", "noah"] {
            let task = Task::new(
                owner.to_string(),
                "Calculus".to_string(),
                "MATH101".to_string(),
                "2024-06-16 09:00 AM".to_string(),
            );
            db.insert_task(&task).expect("insert");
        }

        let mine = db.list_tasks_by_owner("mia").expect("list");
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].owner_username, "mia");
    }

    #[test]
    fn list_preserves_insertion_order() {
        let (_dir, db) = open_db();
        for subject in ["first", "second", "third"] {
            let task = Task::new(
                "mia".to_string(),
                subject.to_string(),
                "CS101".to_string(),
                "2024-06-16 09:00 AM".to_string(),
            );
            db.insert_task(&task).expect("insert");
        }

        let subjects: Vec<String> = db
            .list_tasks_by_owner("mia")
            .expect("list")
            .into_iter()
            .map(|t| t.subject_name)
            .collect();
        assert_eq!(subjects, vec!["first", "second", "third"]);
    }

    #[test]
    fn update_and_done_flag_are_durable() {
        let (_dir, db) = open_db();
        let task = Task::new(
            "mia".to_string(),
            "Physics".to_string(),
            "PHYS110".to_string(),
            "2024-06-16 09:00 AM".to_string(),
        );
        let id = db.insert_task(&task).expect("insert");

        db.set_task_done(id, true).expect("set done");
        let mut stored = db.list_tasks_by_owner("mia").expect("list").remove(0);
        assert!(stored.is_done);

        stored.subject_name = "Physics II".to_string();
        db.update_task(&stored).expect("update");
        let stored = db.list_tasks_by_owner("mia").expect("list").remove(0);
        assert_eq!(stored.subject_name, "Physics II");
        assert!(stored.is_done, "update must not clear the done flag");
    }

    #[test]
    fn delete_removes_only_the_given_task() {
        let (_dir, db) = open_db();
        let mut ids = Vec::new();
        for subject in ["keep", "drop"] {
            let task = Task::new(
                "mia".to_string(),
                subject.to_string(),
                "CS101".to_string(),
                "2024-06-16 09:00 AM".to_string(),
            );
            ids.push(db.insert_task(&task).expect("insert"));
        }

        db.delete_task(ids[1]).expect("delete");
        let tasks = db.list_tasks_by_owner("mia").expect("list");
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].subject_name, "keep");
    }

    #[test]
    fn legacy_rows_survive_the_completion_migration() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("app.db");

        // Seed a database with the pre-migration tasks layout
        {
            let conn = Connection::open(&path).expect("open raw");
            conn.execute(
                "CREATE TABLE tasks (
                    id           INTEGER PRIMARY KEY AUTOINCREMENT,
                    username     TEXT NOT NULL,
                    subject_name TEXT NOT NULL,
                    course_code  TEXT NOT NULL,
                    due_time     TEXT NOT NULL
                )",
                [],
            )
            .expect("create legacy table");
            conn.execute(
                "INSERT INTO tasks (username, subject_name, course_code, due_time)
                 VALUES ('mia', 'Ethics', 'PHIL105', '2024-06-16 09:00 AM')",
                [],
            )
            .expect("insert legacy row");
        }

        let db = Database::new(path.to_str().expect("utf-8 path")).expect("migrate");
        let tasks = db.list_tasks_by_owner("mia").expect("list");
        assert_eq!(tasks.len(), 1);
        assert!(!tasks[0].is_done);
        assert_eq!(tasks[0].completion_percentage, 0.0);
        assert_eq!(tasks[0].created_time, "");
    }
}
