//! Domain model for to-do items.
//!
//! # Responsibility
//! - Define the task record shared by storage, repository and view-models.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod task;
