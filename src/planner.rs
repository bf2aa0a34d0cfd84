use chrono::NaiveDateTime;

use crate::database::{Database, DatabaseError};
use crate::models::{Notification, Task};
use crate::notify;

/// Callback invoked with the fresh projection after every mutation
pub type ProjectionObserver = Box<dyn Fn(&[Task])>;

/// The in-memory task list for one owner, kept write-through with the
/// database. This is the single writer of the projection; every consumer
/// (task list, notification feed) reads from it, and observers registered
/// with [`subscribe`](TaskPlanner::subscribe) are called after each mutating
/// operation so no consumer is left holding a stale copy.
///
/// Operations on an id that is not in the projection do nothing; a missing
/// task is not an error here, the row is simply already gone.
pub struct TaskPlanner<'a> {
    db: &'a Database,
    owner: String,
    tasks: Vec<Task>,
    editing_task_id: Option<i64>,
    observers: Vec<ProjectionObserver>,
}

impl<'a> TaskPlanner<'a> {
    /// Load the owner's tasks from storage into a fresh projection
    pub fn new(db: &'a Database, owner: &str) -> Result<Self, DatabaseError> {
        let owner = owner.trim().to_string();
        let tasks = db.list_tasks_by_owner(&owner)?;
        Ok(Self {
            db,
            owner,
            tasks,
            editing_task_id: None,
            observers: Vec::new(),
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Register a change observer. It fires after every mutation, with the
    /// projection as it stands once the durable write has committed.
    pub fn subscribe(&mut self, observer: impl Fn(&[Task]) + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn notify_observers(&self) {
        for observer in &self.observers {
            observer(&self.tasks);
        }
    }

    /// Create a task and append it to the projection. The id comes from the
    /// store's autoincrement row id, so ids are never reused after a delete.
    pub fn add_task(
        &mut self,
        subject_name: &str,
        course_code: &str,
        due_time: &str,
    ) -> Result<Task, DatabaseError> {
        let mut task = Task::new(
            self.owner.clone(),
            subject_name.to_string(),
            course_code.to_string(),
            due_time.to_string(),
        );
        let id = self.db.insert_task(&task)?;
        task.id = Some(id);
        self.tasks.push(task.clone());
        self.notify_observers();
        Ok(task)
    }

    /// Overwrite a task's subject, course code and due time. Completion
    /// state and creation time carry over unchanged; they are not editable
    /// through this path.
    pub fn update_task(
        &mut self,
        id: i64,
        subject_name: &str,
        course_code: &str,
        due_time: &str,
    ) -> Result<(), DatabaseError> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == Some(id)) else {
            return Ok(());
        };
        task.subject_name = subject_name.to_string();
        task.course_code = course_code.to_string();
        task.due_time = due_time.to_string();

        let snapshot = task.clone();
        self.db.update_task(&snapshot)?;
        self.notify_observers();
        Ok(())
    }

    /// Flip a task between pending and done
    pub fn toggle_task_status(&mut self, id: i64) -> Result<(), DatabaseError> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == Some(id)) else {
            return Ok(());
        };
        task.is_done = !task.is_done;
        let done = task.is_done;

        self.db.set_task_done(id, done)?;
        self.notify_observers();
        Ok(())
    }

    /// Remove a task from the projection and from storage
    pub fn delete_task(&mut self, id: i64) -> Result<(), DatabaseError> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != Some(id));
        if self.tasks.len() == before {
            return Ok(());
        }
        if self.editing_task_id == Some(id) {
            self.editing_task_id = None;
        }

        self.db.delete_task(id)?;
        self.notify_observers();
        Ok(())
    }

    /// Mark a task as the one currently open in an edit form. Ephemeral
    /// UI-session state, never persisted.
    pub fn start_editing_task(&mut self, id: i64) {
        if self.tasks.iter().any(|t| t.id == Some(id)) {
            self.editing_task_id = Some(id);
        }
    }

    pub fn clear_editing_task(&mut self) {
        self.editing_task_id = None;
    }

    pub fn editing_task_id(&self) -> Option<i64> {
        self.editing_task_id
    }

    /// The notification feed for this projection at the given instant.
    /// Recomputed on every call; nothing is cached.
    pub fn notifications(&self, now: NaiveDateTime) -> Vec<Notification> {
        notify::derive(&self.tasks, now)
    }
}
