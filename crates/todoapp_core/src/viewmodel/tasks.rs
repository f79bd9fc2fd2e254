//! Task list screen view-model.
//!
//! # Responsibility
//! - Filter the task collection and build the list UI model.
//! - Handle row check toggles, bulk clear and refresh requests.
//! - Route add/open actions through the navigator.
//!
//! # Invariants
//! - The empty-state model is present exactly when the filtered list is empty.
//! - Only the `All` filter offers the add-task shortcut in the empty state.

use crate::model::task::{Task, TaskId};
use crate::observe::TaskSubscription;
use crate::repository::TasksStore;
use crate::source::RepoResult;
use crate::viewmodel::navigation::{Destination, Navigator, ScreenResult};
use crate::viewmodel::resources::{EnglishResources, Message, ResourceProvider};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Which tasks the list shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TasksFilterType {
    #[default]
    All,
    Active,
    Completed,
}

impl TasksFilterType {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => task.is_active(),
            Self::Completed => task.is_completed(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFilterError(String);

impl Display for ParseFilterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported filter `{}`; expected all|active|completed",
            self.0
        )
    }
}

impl Error for ParseFilterError {}

impl FromStr for TasksFilterType {
    type Err = ParseFilterError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" | "done" => Ok(Self::Completed),
            other => Err(ParseFilterError(other.to_string())),
        }
    }
}

/// Icon shown by the empty state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoTasksIcon {
    AssignmentTurnedIn,
    CheckCircle,
    VerifiedUser,
}

/// Empty-state content for the list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoTasksModel {
    pub text: String,
    pub icon: NoTasksIcon,
    pub show_add_task: bool,
}

/// One list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: TaskId,
    pub title: String,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TasksUiModel {
    pub filter_label: String,
    pub items: Vec<TaskItem>,
    pub no_tasks: Option<NoTasksModel>,
}

impl TasksUiModel {
    pub fn is_list_visible(&self) -> bool {
        !self.items.is_empty()
    }
}

pub struct TasksViewModel<S, N, P = EnglishResources> {
    store: S,
    navigator: N,
    resources: P,
    filter: TasksFilterType,
    changes: TaskSubscription,
}

impl<S: TasksStore, N: Navigator> TasksViewModel<S, N> {
    pub fn new(store: S, navigator: N) -> Self {
        Self::with_resources(store, navigator, EnglishResources)
    }
}

impl<S: TasksStore, N: Navigator, P: ResourceProvider> TasksViewModel<S, N, P> {
    pub fn with_resources(store: S, navigator: N, resources: P) -> Self {
        let changes = store.subscribe();
        Self {
            store,
            navigator,
            resources,
            filter: TasksFilterType::default(),
            changes,
        }
    }

    pub fn filter(&self) -> TasksFilterType {
        self.filter
    }

    pub fn set_filter(&mut self, filter: TasksFilterType) {
        self.filter = filter;
    }

    /// Returns whether the task collection changed since the last call.
    pub fn take_changes(&mut self) -> bool {
        self.changes.drain()
    }

    /// Builds the list model for the current filter.
    pub fn ui_model(&self) -> RepoResult<TasksUiModel> {
        let items = self
            .store
            .get_tasks()?
            .into_iter()
            .filter(|task| self.filter.matches(task))
            .map(|task| TaskItem {
                id: task.id,
                title: task.title_for_list().to_string(),
                completed: task.completed,
            })
            .collect::<Vec<_>>();

        let no_tasks = items.is_empty().then(|| self.no_tasks_model());
        Ok(TasksUiModel {
            filter_label: self.resources.text(self.filter_label()),
            items,
            no_tasks,
        })
    }

    /// Builds the list model, folding load failures into a message.
    pub fn ui_model_or_message(&self) -> Result<TasksUiModel, String> {
        self.ui_model().map_err(|err| {
            log::warn!("event=tasks_load module=viewmodel.tasks status=error error={err}");
            self.resources.text(Message::LoadingTasksError)
        })
    }

    /// Applies a row check toggle and returns the snackbar text.
    pub fn set_task_completed(&self, id: TaskId, completed: bool) -> RepoResult<String> {
        if completed {
            self.store.complete_task(id)?;
            Ok(self.resources.text(Message::TaskMarkedComplete))
        } else {
            self.store.activate_task(id)?;
            Ok(self.resources.text(Message::TaskMarkedActive))
        }
    }

    pub fn clear_completed_tasks(&self) -> RepoResult<String> {
        self.store.clear_completed_tasks()?;
        Ok(self.resources.text(Message::CompletedTasksCleared))
    }

    /// Forces the next load to go back to the remote source.
    pub fn force_refresh(&self) -> RepoResult<()> {
        self.store.refresh_tasks()
    }

    pub fn add_new_task(&self) {
        self.navigator.navigate(Destination::AddTask);
    }

    pub fn open_task_details(&self, id: TaskId) {
        self.navigator.navigate(Destination::TaskDetails(id));
    }

    /// Maps a result reported by a child screen to snackbar text.
    pub fn handle_screen_result(&self, result: ScreenResult) -> Option<String> {
        match result {
            ScreenResult::TaskSaved => Some(self.resources.text(Message::TaskSaved)),
            ScreenResult::TaskDeleted => Some(self.resources.text(Message::TaskDeleted)),
            ScreenResult::Cancelled => None,
        }
    }

    fn filter_label(&self) -> Message {
        match self.filter {
            TasksFilterType::All => Message::LabelAll,
            TasksFilterType::Active => Message::LabelActive,
            TasksFilterType::Completed => Message::LabelCompleted,
        }
    }

    fn no_tasks_model(&self) -> NoTasksModel {
        let (message, icon) = match self.filter {
            TasksFilterType::All => (Message::NoTasksAll, NoTasksIcon::AssignmentTurnedIn),
            TasksFilterType::Active => (Message::NoTasksActive, NoTasksIcon::CheckCircle),
            TasksFilterType::Completed => (Message::NoTasksCompleted, NoTasksIcon::VerifiedUser),
        };
        NoTasksModel {
            text: self.resources.text(message),
            icon,
            show_add_task: self.filter == TasksFilterType::All,
        }
    }
}
