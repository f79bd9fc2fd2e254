//! Change notification streams for the task collection.
//!
//! # Responsibility
//! - Publish one `TaskChange` per successful repository mutation.
//! - Let UIs poll (`try_next`) or await (`recv`) changes.
//!
//! # Invariants
//! - Publishing never fails, even with no subscribers.
//! - A subscriber that falls behind receives `TaskChange::Resync` and must
//!   reload its state.

use crate::model::task::TaskId;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// One observed mutation of the task collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskChange {
    Saved(TaskId),
    Completed(TaskId),
    Activated(TaskId),
    Deleted(TaskId),
    /// Completed tasks were removed; carries the removed count.
    CompletedCleared(usize),
    AllDeleted,
    /// Cache was reloaded from the remote source.
    Refreshed,
    /// Events were dropped for this subscriber.
    Resync,
}

/// Publisher side owned by the repository.
#[derive(Debug, Clone)]
pub struct TaskChanges {
    sender: broadcast::Sender<TaskChange>,
}

impl Default for TaskChanges {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskChanges {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn publish(&self, change: TaskChange) {
        // No receivers is a normal state for headless callers.
        let _ = self.sender.send(change);
    }

    pub fn subscribe(&self) -> TaskSubscription {
        TaskSubscription {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Receiver side handed to view-models and hosts.
#[derive(Debug)]
pub struct TaskSubscription {
    receiver: broadcast::Receiver<TaskChange>,
}

impl TaskSubscription {
    /// Returns the next pending change without blocking.
    pub fn try_next(&mut self) -> Option<TaskChange> {
        match self.receiver.try_recv() {
            Ok(change) => Some(change),
            Err(TryRecvError::Lagged(_)) => Some(TaskChange::Resync),
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => None,
        }
    }

    /// Drains pending changes; returns whether any were observed.
    pub fn drain(&mut self) -> bool {
        let mut changed = false;
        while self.try_next().is_some() {
            changed = true;
        }
        changed
    }

    /// Waits for the next change. Returns `None` once the publisher is gone.
    pub async fn recv(&mut self) -> Option<TaskChange> {
        match self.receiver.recv().await {
            Ok(change) => Some(change),
            Err(RecvError::Lagged(_)) => Some(TaskChange::Resync),
            Err(RecvError::Closed) => None,
        }
    }
}
