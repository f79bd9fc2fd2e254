//! In-process stand-in for the remote task service.
//!
//! # Responsibility
//! - Serve the task contract from memory with optional simulated latency.
//! - Simulate an offline backend through an availability switch.
//!
//! # Invariants
//! - Insertion order is preserved for listing.
//! - Completion toggles on unknown IDs are ignored, as a backend would
//!   accept them idempotently.

use crate::model::task::{Task, TaskId};
use crate::source::{RepoError, RepoResult, TasksDataSource};
use log::warn;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

/// Thread-safe fake remote task service.
#[derive(Debug, Default)]
pub struct InMemoryRemoteDataSource {
    tasks: Mutex<Vec<Task>>,
    latency: Duration,
    offline: AtomicBool,
}

impl InMemoryRemoteDataSource {
    /// Creates an empty remote with no latency.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a remote holding the two sample tasks shipped with the app.
    pub fn seeded() -> Self {
        let remote = Self::new();
        if let Ok(mut tasks) = remote.tasks.lock() {
            tasks.push(Task::new(
                "Build tower in Pisa",
                "Ground looks good, no foundation work required.",
            ));
            tasks.push(Task::new(
                "Finish bridge in Tacoma",
                "Found awesome girders at half the cost!",
            ));
        }
        remote
    }

    /// Delays every call by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Toggles simulated connectivity. Offline calls fail with `Remote`.
    pub fn set_available(&self, available: bool) {
        self.offline.store(!available, Ordering::SeqCst);
    }

    pub fn is_available(&self) -> bool {
        !self.offline.load(Ordering::SeqCst)
    }

    fn connect(&self) -> RepoResult<MutexGuard<'_, Vec<Task>>> {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }
        if !self.is_available() {
            warn!("event=remote_call module=source.remote status=error error_code=offline");
            return Err(RepoError::Remote("remote service unavailable".to_string()));
        }
        self.tasks
            .lock()
            .map_err(|_| RepoError::Remote("remote store lock poisoned".to_string()))
    }

    fn set_completed(&self, id: TaskId, completed: bool) -> RepoResult<()> {
        let mut tasks = self.connect()?;
        if let Some(task) = tasks.iter_mut().find(|task| task.id == id) {
            task.completed = completed;
        }
        Ok(())
    }
}

fn upsert(tasks: &mut Vec<Task>, task: &Task) {
    match tasks.iter_mut().find(|existing| existing.id == task.id) {
        Some(existing) => *existing = task.clone(),
        None => tasks.push(task.clone()),
    }
}

impl TasksDataSource for InMemoryRemoteDataSource {
    fn get_tasks(&self) -> RepoResult<Vec<Task>> {
        Ok(self.connect()?.clone())
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        Ok(self.connect()?.iter().find(|task| task.id == id).cloned())
    }

    fn save_task(&self, task: &Task) -> RepoResult<()> {
        task.validate()?;
        let mut tasks = self.connect()?;
        upsert(&mut tasks, task);
        Ok(())
    }

    fn save_tasks(&self, batch: &[Task]) -> RepoResult<()> {
        for task in batch {
            task.validate()?;
        }
        let mut tasks = self.connect()?;
        for task in batch {
            upsert(&mut tasks, task);
        }
        Ok(())
    }

    fn complete_task(&self, id: TaskId) -> RepoResult<()> {
        self.set_completed(id, true)
    }

    fn activate_task(&self, id: TaskId) -> RepoResult<()> {
        self.set_completed(id, false)
    }

    fn clear_completed_tasks(&self) -> RepoResult<usize> {
        let mut tasks = self.connect()?;
        let before = tasks.len();
        tasks.retain(Task::is_active);
        Ok(before - tasks.len())
    }

    fn refresh_tasks(&self) -> RepoResult<()> {
        Ok(())
    }

    fn delete_all_tasks(&self) -> RepoResult<()> {
        self.connect()?.clear();
        Ok(())
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        self.connect()?.retain(|task| task.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::InMemoryRemoteDataSource;
    use crate::model::task::Task;
    use crate::source::{RepoError, TasksDataSource};

    #[test]
    fn seeded_remote_serves_sample_tasks() {
        let remote = InMemoryRemoteDataSource::seeded();
        let tasks = remote.get_tasks().unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].title, "Build tower in Pisa");
        assert!(tasks.iter().all(Task::is_active));
    }

    #[test]
    fn save_replaces_existing_task_in_place() {
        let remote = InMemoryRemoteDataSource::new();
        let first = Task::new("first", "");
        let second = Task::new("second", "");
        remote.save_tasks(&[first.clone(), second.clone()]).unwrap();

        let renamed = Task::with_id(first.id, "renamed", "", false);
        remote.save_task(&renamed).unwrap();

        let titles: Vec<String> = remote
            .get_tasks()
            .unwrap()
            .into_iter()
            .map(|task| task.title)
            .collect();
        assert_eq!(titles, vec!["renamed".to_string(), "second".to_string()]);
    }

    #[test]
    fn offline_remote_fails_every_call() {
        let remote = InMemoryRemoteDataSource::seeded();
        remote.set_available(false);
        assert!(matches!(remote.get_tasks(), Err(RepoError::Remote(_))));
        assert!(matches!(
            remote.clear_completed_tasks(),
            Err(RepoError::Remote(_))
        ));

        remote.set_available(true);
        assert_eq!(remote.get_tasks().unwrap().len(), 2);
    }

    #[test]
    fn clear_completed_reports_removed_count() {
        let remote = InMemoryRemoteDataSource::new();
        let done = Task::new("done", "").with_completed(true);
        let open = Task::new("open", "");
        remote.save_tasks(&[done, open.clone()]).unwrap();

        assert_eq!(remote.clear_completed_tasks().unwrap(), 1);
        assert_eq!(remote.get_tasks().unwrap(), vec![open]);
    }
}
