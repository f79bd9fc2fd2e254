//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical to-do record and its completion lifecycle.
//! - Provide display helpers used by list and detail screens.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - A persisted task has a non-blank title or a non-blank description.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a task.
pub type TaskId = Uuid;

/// One to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub completed: bool,
}

/// Validation failure for task write paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Both title and description are blank.
    Empty(TaskId),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty(id) => write!(f, "task {id} has neither title nor description"),
        }
    }
}

impl Error for TaskValidationError {}

impl Task {
    /// Creates an active task with a generated ID.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), title, description, false)
    }

    /// Creates a task with a caller-provided ID.
    ///
    /// Used by edit and sync paths where identity already exists.
    pub fn with_id(
        id: TaskId,
        title: impl Into<String>,
        description: impl Into<String>,
        completed: bool,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            completed,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn is_active(&self) -> bool {
        !self.completed
    }

    /// Returns whether both title and description are blank.
    pub fn is_empty(&self) -> bool {
        self.title.trim().is_empty() && self.description.trim().is_empty()
    }

    /// Text shown in list rows: the title, or the description when the
    /// title is blank.
    pub fn title_for_list(&self) -> &str {
        if self.title.trim().is_empty() {
            self.description.as_str()
        } else {
            self.title.as_str()
        }
    }

    /// Returns a copy with the completion flag set to `completed`.
    pub fn with_completed(&self, completed: bool) -> Self {
        Self {
            completed,
            ..self.clone()
        }
    }

    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.is_empty() {
            return Err(TaskValidationError::Empty(self.id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Task, TaskValidationError};

    #[test]
    fn new_task_is_active() {
        let task = Task::new("title", "description");
        assert!(task.is_active());
        assert!(!task.is_completed());
    }

    #[test]
    fn title_for_list_falls_back_to_description() {
        let task = Task::new("  ", "only description");
        assert_eq!(task.title_for_list(), "only description");

        let titled = Task::new("title", "description");
        assert_eq!(titled.title_for_list(), "title");
    }

    #[test]
    fn validate_rejects_blank_task() {
        let task = Task::new(" ", "\n");
        assert!(task.is_empty());
        assert_eq!(task.validate(), Err(TaskValidationError::Empty(task.id)));
        assert!(Task::new("", "desc").validate().is_ok());
    }

    #[test]
    fn with_completed_changes_only_flag() {
        let task = Task::new("a", "b");
        let done = task.with_completed(true);
        assert_eq!(done.id, task.id);
        assert_eq!(done.title, task.title);
        assert_eq!(done.description, task.description);
        assert!(done.completed);
    }

    #[test]
    fn task_serializes_with_snake_case_fields() {
        let task = Task::new("a", "b");
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["title"], "a");
        assert_eq!(json["completed"], false);
        assert_eq!(json["id"], task.id.to_string());
    }
}
