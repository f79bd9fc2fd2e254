//! Statistics screen view-model.
//!
//! # Responsibility
//! - Count active and completed tasks after a forced refresh.
//! - Expose the screen state as a short lazy stream: loading, then result.
//!
//! # Invariants
//! - Reported counts equal the number of tasks with each flag value.
//! - Repository failures never escape; they become the error placeholder.

use crate::model::task::Task;
use crate::repository::TasksStore;
use crate::source::RepoResult;
use crate::viewmodel::resources::{EnglishResources, Message, ResourceProvider};
use log::warn;
use std::iter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatisticsState {
    Loading,
    Empty,
    Loaded { active: usize, completed: usize },
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatisticsUiModel {
    pub state: StatisticsState,
    pub text: String,
}

/// Returns `(active, completed)` counts.
pub fn count_tasks(tasks: &[Task]) -> (usize, usize) {
    let completed = tasks.iter().filter(|task| task.is_completed()).count();
    (tasks.len() - completed, completed)
}

pub struct StatisticsViewModel<S, P = EnglishResources> {
    store: S,
    resources: P,
}

impl<S: TasksStore> StatisticsViewModel<S> {
    pub fn new(store: S) -> Self {
        Self::with_resources(store, EnglishResources)
    }
}

impl<S: TasksStore, P: ResourceProvider> StatisticsViewModel<S, P> {
    pub fn with_resources(store: S, resources: P) -> Self {
        Self { store, resources }
    }

    /// Yields the loading model first; the counts are computed only when
    /// the second item is pulled.
    pub fn ui_models(&self) -> impl Iterator<Item = StatisticsUiModel> + '_ {
        iter::once(self.model(StatisticsState::Loading)).chain(iter::once_with(|| self.load()))
    }

    /// Refreshes the repository and returns the final model.
    pub fn load(&self) -> StatisticsUiModel {
        match self.fetch_counts() {
            Ok((0, 0)) => self.model(StatisticsState::Empty),
            Ok((active, completed)) => self.model(StatisticsState::Loaded { active, completed }),
            Err(err) => {
                warn!("event=statistics_load module=viewmodel.statistics status=error error={err}");
                self.model(StatisticsState::Error)
            }
        }
    }

    fn fetch_counts(&self) -> RepoResult<(usize, usize)> {
        self.store.refresh_tasks()?;
        let tasks = self.store.get_tasks()?;
        Ok(count_tasks(&tasks))
    }

    fn model(&self, state: StatisticsState) -> StatisticsUiModel {
        let message = match state {
            StatisticsState::Loading => Message::Loading,
            StatisticsState::Empty => Message::StatisticsNoTasks,
            StatisticsState::Loaded { active, completed } => {
                Message::StatisticsActiveCompleted { active, completed }
            }
            StatisticsState::Error => Message::StatisticsError,
        };
        StatisticsUiModel {
            state,
            text: self.resources.text(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::count_tasks;
    use crate::model::task::Task;

    #[test]
    fn count_tasks_splits_by_flag() {
        let tasks = vec![
            Task::new("a", ""),
            Task::new("b", "").with_completed(true),
            Task::new("c", "").with_completed(true),
        ];
        assert_eq!(count_tasks(&tasks), (1, 2));
        assert_eq!(count_tasks(&[]), (0, 0));
    }
}
