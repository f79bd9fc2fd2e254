//! Task detail screen view-model.

use crate::model::task::TaskId;
use crate::repository::TasksStore;
use crate::source::RepoResult;
use crate::viewmodel::navigation::{Destination, Navigator, ScreenResult};
use crate::viewmodel::resources::{EnglishResources, Message, ResourceProvider};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDetailUiModel {
    /// `false` when the task no longer exists; `title` then holds the
    /// no-data placeholder.
    pub found: bool,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub show_title: bool,
    pub show_description: bool,
}

pub struct TaskDetailViewModel<S, N, P = EnglishResources> {
    store: S,
    navigator: N,
    resources: P,
    task_id: TaskId,
}

impl<S: TasksStore, N: Navigator> TaskDetailViewModel<S, N> {
    pub fn new(store: S, navigator: N, task_id: TaskId) -> Self {
        Self::with_resources(store, navigator, EnglishResources, task_id)
    }
}

impl<S: TasksStore, N: Navigator, P: ResourceProvider> TaskDetailViewModel<S, N, P> {
    pub fn with_resources(store: S, navigator: N, resources: P, task_id: TaskId) -> Self {
        Self {
            store,
            navigator,
            resources,
            task_id,
        }
    }

    pub fn task_id(&self) -> TaskId {
        self.task_id
    }

    pub fn ui_model(&self) -> RepoResult<TaskDetailUiModel> {
        let model = match self.store.get_task(self.task_id)? {
            Some(task) => TaskDetailUiModel {
                found: true,
                show_title: !task.title.trim().is_empty(),
                show_description: !task.description.trim().is_empty(),
                completed: task.completed,
                title: task.title,
                description: task.description,
            },
            None => TaskDetailUiModel {
                found: false,
                title: self.resources.text(Message::NoData),
                description: String::new(),
                completed: false,
                show_title: true,
                show_description: false,
            },
        };
        Ok(model)
    }

    /// Toggles completion and returns the snackbar text.
    pub fn set_completed(&self, completed: bool) -> RepoResult<String> {
        if completed {
            self.store.complete_task(self.task_id)?;
            Ok(self.resources.text(Message::TaskMarkedComplete))
        } else {
            self.store.activate_task(self.task_id)?;
            Ok(self.resources.text(Message::TaskMarkedActive))
        }
    }

    /// Deletes the task and closes the screen.
    pub fn delete_task(&self) -> RepoResult<()> {
        self.store.delete_task(self.task_id)?;
        self.navigator
            .navigate(Destination::Back(ScreenResult::TaskDeleted));
        Ok(())
    }

    pub fn edit_task(&self) {
        self.navigator.navigate(Destination::EditTask(self.task_id));
    }
}
