//! Core domain logic for the to-do app.
//! UI hosts (FFI, CLI) only talk to the view-models and repository exported here.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod observe;
pub mod repository;
pub mod source;
pub mod viewmodel;

pub use config::{ConfigError, CoreConfig, RemoteConfig};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel};
pub use model::task::{Task, TaskId, TaskValidationError};
pub use observe::{TaskChange, TaskChanges, TaskSubscription};
pub use repository::{TasksRepository, TasksStore};
pub use source::local::SqliteTasksDataSource;
pub use source::remote::InMemoryRemoteDataSource;
pub use source::{RepoError, RepoResult, TasksDataSource};
pub use viewmodel::add_edit::{AddEditError, AddEditTaskViewModel};
pub use viewmodel::navigation::{Destination, Navigator, PendingNavigator, ScreenResult};
pub use viewmodel::resources::{EnglishResources, Message, ResourceProvider};
pub use viewmodel::statistics::{
    count_tasks, StatisticsState, StatisticsUiModel, StatisticsViewModel,
};
pub use viewmodel::task_detail::{TaskDetailUiModel, TaskDetailViewModel};
pub use viewmodel::tasks::{
    NoTasksIcon, NoTasksModel, TaskItem, TasksFilterType, TasksUiModel, TasksViewModel,
};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
