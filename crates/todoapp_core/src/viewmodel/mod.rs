//! Screen view-models.
//!
//! # Responsibility
//! - Turn repository data into UI-ready value objects.
//! - Translate UI events into repository calls and navigation requests.
//!
//! # Invariants
//! - View-models never touch SQL or remote details directly.
//! - User-facing text always comes from a `ResourceProvider`.

pub mod add_edit;
pub mod navigation;
pub mod resources;
pub mod statistics;
pub mod task_detail;
pub mod tasks;
