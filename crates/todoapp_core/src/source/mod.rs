//! Task data source contracts and implementations.
//!
//! # Responsibility
//! - Define the CRUD contract shared by local, remote and composed sources.
//! - Keep SQL details inside the local source.
//!
//! # Invariants
//! - Write paths validate tasks before persisting them.
//! - Toggling completion never touches title or description.
//! - Sources return semantic errors (`NotFound`) next to transport errors.

use crate::db::DbError;
use crate::model::task::{Task, TaskId, TaskValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod local;
pub mod remote;

pub type RepoResult<T> = Result<T, RepoError>;

/// Error shared by every task data source.
#[derive(Debug)]
pub enum RepoError {
    Validation(TaskValidationError),
    Db(DbError),
    NotFound(TaskId),
    InvalidData(String),
    /// Remote source rejected or could not serve the call.
    Remote(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted task data: {message}"),
            Self::Remote(message) => write!(f, "remote task source failed: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection is not migrated: expected schema version {expected_version}, found {actual_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TaskValidationError> for RepoError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// CRUD contract over the task collection.
pub trait TasksDataSource {
    fn get_tasks(&self) -> RepoResult<Vec<Task>>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    /// Inserts the task, replacing any row with the same ID.
    fn save_task(&self, task: &Task) -> RepoResult<()>;
    /// Inserts or replaces every task atomically.
    fn save_tasks(&self, tasks: &[Task]) -> RepoResult<()>;
    fn complete_task(&self, id: TaskId) -> RepoResult<()>;
    fn activate_task(&self, id: TaskId) -> RepoResult<()>;
    /// Deletes every completed task and returns how many were removed.
    fn clear_completed_tasks(&self) -> RepoResult<usize>;
    fn refresh_tasks(&self) -> RepoResult<()>;
    fn delete_all_tasks(&self) -> RepoResult<()>;
    /// Deletes one task. Unknown IDs are ignored.
    fn delete_task(&self, id: TaskId) -> RepoResult<()>;
}

impl<T: TasksDataSource + ?Sized> TasksDataSource for &T {
    fn get_tasks(&self) -> RepoResult<Vec<Task>> {
        (**self).get_tasks()
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        (**self).get_task(id)
    }

    fn save_task(&self, task: &Task) -> RepoResult<()> {
        (**self).save_task(task)
    }

    fn save_tasks(&self, tasks: &[Task]) -> RepoResult<()> {
        (**self).save_tasks(tasks)
    }

    fn complete_task(&self, id: TaskId) -> RepoResult<()> {
        (**self).complete_task(id)
    }

    fn activate_task(&self, id: TaskId) -> RepoResult<()> {
        (**self).activate_task(id)
    }

    fn clear_completed_tasks(&self) -> RepoResult<usize> {
        (**self).clear_completed_tasks()
    }

    fn refresh_tasks(&self) -> RepoResult<()> {
        (**self).refresh_tasks()
    }

    fn delete_all_tasks(&self) -> RepoResult<()> {
        (**self).delete_all_tasks()
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        (**self).delete_task(id)
    }
}
