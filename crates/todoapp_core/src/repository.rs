//! Composed task repository.
//!
//! # Responsibility
//! - Merge the local store and the optional remote source behind one
//!   `TasksDataSource`.
//! - Keep an in-memory cache and orchestrate refreshes.
//! - Broadcast a `TaskChange` after every successful mutation.
//!
//! # Invariants
//! - Writes hit the remote first, then the local store, then the cache.
//! - A clean cache is authoritative for reads.
//! - A dirty cache is rebuilt from the remote merged over local contents;
//!   rows only the local store knows are kept.
//! - The cache is either absent or holds the full collection, never a subset.

use crate::model::task::{Task, TaskId};
use crate::observe::{TaskChange, TaskChanges, TaskSubscription};
use crate::source::remote::InMemoryRemoteDataSource;
use crate::source::{RepoError, RepoResult, TasksDataSource};
use log::{info, warn};
use std::cell::RefCell;
use std::time::Instant;

/// A task source that also publishes change notifications.
pub trait TasksStore: TasksDataSource {
    fn subscribe(&self) -> TaskSubscription;
}

#[derive(Debug, Default)]
struct TaskCache {
    tasks: Option<Vec<Task>>,
    dirty: bool,
}

impl TaskCache {
    fn fill(&mut self, tasks: Vec<Task>) {
        self.tasks = Some(tasks);
        self.dirty = false;
    }

    fn clean_snapshot(&self) -> Option<Vec<Task>> {
        if self.dirty {
            return None;
        }
        self.tasks.clone()
    }

    fn find(&self, id: TaskId) -> Option<Task> {
        self.tasks
            .as_ref()?
            .iter()
            .find(|task| task.id == id)
            .cloned()
    }

    fn upsert(&mut self, task: &Task) {
        let Some(tasks) = self.tasks.as_mut() else {
            return;
        };
        match tasks.iter_mut().find(|existing| existing.id == task.id) {
            Some(existing) => *existing = task.clone(),
            None => tasks.push(task.clone()),
        }
    }

    fn retain(&mut self, keep: impl FnMut(&Task) -> bool) {
        if let Some(tasks) = self.tasks.as_mut() {
            tasks.retain(keep);
        }
    }
}

/// Repository composing a local store with an optional remote source.
pub struct TasksRepository<L, R = InMemoryRemoteDataSource> {
    local: L,
    remote: Option<R>,
    cache: RefCell<TaskCache>,
    changes: TaskChanges,
}

impl<L: TasksDataSource> TasksRepository<L> {
    /// Creates a repository that never talks to a remote source.
    pub fn local_only(local: L) -> Self {
        Self::from_parts(local, None)
    }
}

impl<L: TasksDataSource, R: TasksDataSource> TasksRepository<L, R> {
    pub fn new(local: L, remote: R) -> Self {
        Self::from_parts(local, Some(remote))
    }

    /// Creates a repository whose remote is decided at runtime.
    pub fn from_parts(local: L, remote: Option<R>) -> Self {
        Self {
            local,
            remote,
            cache: RefCell::new(TaskCache::default()),
            changes: TaskChanges::new(),
        }
    }

    pub fn local(&self) -> &L {
        &self.local
    }

    pub fn remote(&self) -> Option<&R> {
        self.remote.as_ref()
    }

    /// Returns whether the next read will reload from the remote.
    pub fn is_cache_dirty(&self) -> bool {
        self.cache.borrow().dirty
    }

    /// Returns whether the full collection is held in memory.
    pub fn is_cached(&self) -> bool {
        self.cache.borrow().tasks.is_some()
    }

    /// Drops the cache; the next read goes back to the local store.
    pub fn invalidate_cache(&self) {
        *self.cache.borrow_mut() = TaskCache::default();
    }

    fn on_remote(&self, call: impl FnOnce(&R) -> RepoResult<()>) -> RepoResult<()> {
        match self.remote.as_ref() {
            Some(remote) => call(remote),
            None => Ok(()),
        }
    }

    /// Merges the remote collection into the local store and refills the
    /// cache from it. Local-only rows are kept.
    fn reload_from_remote(&self) -> RepoResult<Vec<Task>> {
        let started_at = Instant::now();
        if let Some(remote) = self.remote.as_ref() {
            let fetched = remote.get_tasks()?;
            self.local.save_tasks(&fetched)?;
        }
        let tasks = self.local.get_tasks()?;

        self.cache.borrow_mut().fill(tasks.clone());
        info!(
            "event=tasks_refresh module=repository status=ok count={} remote={} duration_ms={}",
            tasks.len(),
            self.remote.is_some(),
            started_at.elapsed().as_millis()
        );
        self.changes.publish(TaskChange::Refreshed);
        Ok(tasks)
    }

    fn set_completed(&self, id: TaskId, completed: bool) -> RepoResult<Task> {
        let task = self.get_task(id)?.ok_or(RepoError::NotFound(id))?;
        let updated = task.with_completed(completed);

        self.on_remote(|remote| {
            if completed {
                remote.complete_task(id)
            } else {
                remote.activate_task(id)
            }
        })?;

        let local_result = if completed {
            self.local.complete_task(id)
        } else {
            self.local.activate_task(id)
        };
        match local_result {
            // Known only to the remote so far.
            Err(RepoError::NotFound(_)) => self.local.save_task(&updated)?,
            other => other?,
        }

        self.cache.borrow_mut().upsert(&updated);
        Ok(updated)
    }
}

impl<L: TasksDataSource, R: TasksDataSource> TasksDataSource for TasksRepository<L, R> {
    fn get_tasks(&self) -> RepoResult<Vec<Task>> {
        if let Some(tasks) = self.cache.borrow().clean_snapshot() {
            return Ok(tasks);
        }

        if self.is_cache_dirty() {
            return self.reload_from_remote();
        }

        let local = self.local.get_tasks()?;
        if !local.is_empty() || self.remote.is_none() {
            self.cache.borrow_mut().fill(local.clone());
            return Ok(local);
        }

        match self.reload_from_remote() {
            Ok(tasks) => Ok(tasks),
            Err(err) => {
                warn!(
                    "event=tasks_remote_fallback module=repository status=error error={}",
                    err
                );
                Ok(local)
            }
        }
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        if let Some(task) = self.cache.borrow().find(id) {
            return Ok(Some(task));
        }

        let mut found = self.local.get_task(id)?;
        if found.is_none() {
            if let Some(remote) = self.remote.as_ref() {
                found = remote.get_task(id)?;
            }
        }

        if let Some(task) = found.as_ref() {
            self.cache.borrow_mut().upsert(task);
        }
        Ok(found)
    }

    fn save_task(&self, task: &Task) -> RepoResult<()> {
        task.validate()?;
        self.on_remote(|remote| remote.save_task(task))?;
        self.local.save_task(task)?;
        self.cache.borrow_mut().upsert(task);
        self.changes.publish(TaskChange::Saved(task.id));
        Ok(())
    }

    fn save_tasks(&self, tasks: &[Task]) -> RepoResult<()> {
        self.on_remote(|remote| remote.save_tasks(tasks))?;
        self.local.save_tasks(tasks)?;
        let mut cache = self.cache.borrow_mut();
        for task in tasks {
            cache.upsert(task);
            self.changes.publish(TaskChange::Saved(task.id));
        }
        Ok(())
    }

    fn complete_task(&self, id: TaskId) -> RepoResult<()> {
        self.set_completed(id, true)?;
        self.changes.publish(TaskChange::Completed(id));
        Ok(())
    }

    fn activate_task(&self, id: TaskId) -> RepoResult<()> {
        self.set_completed(id, false)?;
        self.changes.publish(TaskChange::Activated(id));
        Ok(())
    }

    fn clear_completed_tasks(&self) -> RepoResult<usize> {
        self.on_remote(|remote| remote.clear_completed_tasks().map(|_| ()))?;
        let removed = self.local.clear_completed_tasks()?;
        self.cache.borrow_mut().retain(Task::is_active);
        self.changes.publish(TaskChange::CompletedCleared(removed));
        Ok(removed)
    }

    fn refresh_tasks(&self) -> RepoResult<()> {
        self.cache.borrow_mut().dirty = true;
        Ok(())
    }

    fn delete_all_tasks(&self) -> RepoResult<()> {
        self.on_remote(|remote| remote.delete_all_tasks())?;
        self.local.delete_all_tasks()?;
        self.cache.borrow_mut().fill(Vec::new());
        self.changes.publish(TaskChange::AllDeleted);
        Ok(())
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        self.on_remote(|remote| remote.delete_task(id))?;
        self.local.delete_task(id)?;
        self.cache.borrow_mut().retain(|task| task.id != id);
        self.changes.publish(TaskChange::Deleted(id));
        Ok(())
    }
}

impl<L: TasksDataSource, R: TasksDataSource> TasksStore for TasksRepository<L, R> {
    fn subscribe(&self) -> TaskSubscription {
        self.changes.subscribe()
    }
}

impl<T: TasksStore + ?Sized> TasksStore for &T {
    fn subscribe(&self) -> TaskSubscription {
        (**self).subscribe()
    }
}
