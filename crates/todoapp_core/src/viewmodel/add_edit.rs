//! Add/edit task screen view-model.
//!
//! # Invariants
//! - Tasks with blank title and description are never saved.
//! - Editing keeps the stored completion flag.

use crate::model::task::{Task, TaskId};
use crate::repository::TasksStore;
use crate::source::{RepoError, RepoResult};
use crate::viewmodel::navigation::{Destination, Navigator, ScreenResult};
use crate::viewmodel::resources::{EnglishResources, Message, ResourceProvider};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum AddEditError {
    /// Title and description are blank; carries the display text.
    EmptyTask(String),
    Repo(RepoError),
}

impl Display for AddEditError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTask(message) => write!(f, "{message}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AddEditError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::EmptyTask(_) => None,
        }
    }
}

impl From<RepoError> for AddEditError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

pub struct AddEditTaskViewModel<S, N, P = EnglishResources> {
    store: S,
    navigator: N,
    resources: P,
    task_id: Option<TaskId>,
}

impl<S: TasksStore, N: Navigator> AddEditTaskViewModel<S, N> {
    /// `task_id = None` opens the screen in add mode.
    pub fn new(store: S, navigator: N, task_id: Option<TaskId>) -> Self {
        Self::with_resources(store, navigator, EnglishResources, task_id)
    }
}

impl<S: TasksStore, N: Navigator, P: ResourceProvider> AddEditTaskViewModel<S, N, P> {
    pub fn with_resources(store: S, navigator: N, resources: P, task_id: Option<TaskId>) -> Self {
        Self {
            store,
            navigator,
            resources,
            task_id,
        }
    }

    pub fn is_new_task(&self) -> bool {
        self.task_id.is_none()
    }

    /// Loads the task being edited. Returns `None` in add mode.
    pub fn populate(&self) -> RepoResult<Option<Task>> {
        let Some(id) = self.task_id else {
            return Ok(None);
        };
        match self.store.get_task(id)? {
            Some(task) => Ok(Some(task)),
            None => Err(RepoError::NotFound(id)),
        }
    }

    /// Saves the form and closes the screen on success.
    pub fn save_task(&self, title: &str, description: &str) -> Result<TaskId, AddEditError> {
        let task = match self.task_id {
            None => Task::new(title, description),
            Some(id) => {
                let completed = self
                    .store
                    .get_task(id)?
                    .is_some_and(|existing| existing.completed);
                Task::with_id(id, title, description, completed)
            }
        };

        if task.is_empty() {
            return Err(AddEditError::EmptyTask(
                self.resources.text(Message::EmptyTask),
            ));
        }

        self.store.save_task(&task)?;
        self.navigator
            .navigate(Destination::Back(ScreenResult::TaskSaved));
        Ok(task.id)
    }

    pub fn cancel(&self) {
        self.navigator
            .navigate(Destination::Back(ScreenResult::Cancelled));
    }
}
