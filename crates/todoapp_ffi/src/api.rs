//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose screen-level task operations to Dart via FRB.
//! - Fold core errors into response envelopes with readable messages.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every call opens the configured database and runs migrations first.

use log::warn;
use once_cell::sync::Lazy;
use todoapp_core::db::open_db;
use todoapp_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    AddEditTaskViewModel, CoreConfig, Destination, InMemoryRemoteDataSource, PendingNavigator,
    ScreenResult, SqliteTasksDataSource, StatisticsViewModel, TaskDetailViewModel, TaskId,
    TasksFilterType, TasksRepository, TasksStore, TasksViewModel,
};
use uuid::Uuid;

const ENTRY_DB_FILE_NAME: &str = "todoapp_entry.sqlite3";

static ENTRY_CONFIG: Lazy<CoreConfig> = Lazy::new(|| {
    let defaults = CoreConfig {
        db_path: std::env::temp_dir().join(ENTRY_DB_FILE_NAME),
        ..CoreConfig::default()
    };
    defaults.clone().with_env_overrides().unwrap_or_else(|err| {
        warn!("event=ffi_config module=ffi status=error error={err}");
        defaults
    })
});

static ENTRY_REMOTE: Lazy<Option<InMemoryRemoteDataSource>> =
    Lazy::new(|| ENTRY_CONFIG.remote_source());

type EntryRepository<'conn> =
    TasksRepository<SqliteTasksDataSource<'conn>, &'static InMemoryRemoteDataSource>;

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// # FFI contract
/// - `level`: `trace|debug|info|warn|error`, case-insensitive.
/// - `log_dir`: absolute directory for rolling log files.
/// - Idempotent for the same pair; returns an error message otherwise.
/// - Returns an empty string on success.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One row of the task list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListItem {
    pub task_id: String,
    pub title: String,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TasksListResponse {
    pub ok: bool,
    pub filter_label: String,
    pub items: Vec<TaskListItem>,
    /// Empty-state text; set only when `items` is empty.
    pub empty_message: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDetailResponse {
    pub ok: bool,
    pub found: bool,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub message: String,
}

/// Generic action envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskActionResponse {
    pub ok: bool,
    pub task_id: Option<String>,
    /// Snackbar or error text.
    pub message: String,
    /// Screen the UI should open next, e.g. `back:task_saved`.
    pub navigate_to: Option<String>,
}

impl TaskActionResponse {
    fn success(message: impl Into<String>, task_id: Option<String>) -> Self {
        Self {
            ok: true,
            task_id,
            message: message.into(),
            navigate_to: None,
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            task_id: None,
            message: message.into(),
            navigate_to: None,
        }
    }

    fn navigating(mut self, navigator: &PendingNavigator) -> Self {
        self.navigate_to = navigator.last().map(destination_label);
        self
    }
}

/// Lists tasks for `filter` (`all|active|completed`).
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_list(filter: String) -> TasksListResponse {
    let result = with_repository(|repo| {
        let filter = filter
            .parse::<TasksFilterType>()
            .map_err(|err| err.to_string())?;
        let navigator = PendingNavigator::new();
        let mut vm = TasksViewModel::new(repo, &navigator);
        vm.set_filter(filter);
        vm.ui_model_or_message()
    });

    match result {
        Ok(model) => TasksListResponse {
            ok: true,
            message: format!("{} task(s).", model.items.len()),
            empty_message: model.no_tasks.map(|empty| empty.text),
            items: model
                .items
                .into_iter()
                .map(|item| TaskListItem {
                    task_id: item.id.to_string(),
                    title: item.title,
                    completed: item.completed,
                })
                .collect(),
            filter_label: model.filter_label,
        },
        Err(err) => TasksListResponse {
            ok: false,
            filter_label: String::new(),
            items: Vec::new(),
            empty_message: None,
            message: format!("tasks_list failed: {err}"),
        },
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_get(task_id: String) -> TaskDetailResponse {
    let result = with_repository(|repo| {
        let id = parse_task_id(&task_id)?;
        let navigator = PendingNavigator::new();
        TaskDetailViewModel::new(repo, &navigator, id)
            .ui_model()
            .map_err(|err| err.to_string())
    });

    match result {
        Ok(model) => TaskDetailResponse {
            ok: true,
            found: model.found,
            title: model.title,
            description: model.description,
            completed: model.completed,
            message: String::new(),
        },
        Err(err) => TaskDetailResponse {
            ok: false,
            found: false,
            title: String::new(),
            description: String::new(),
            completed: false,
            message: format!("task_get failed: {err}"),
        },
    }
}

/// Creates (`task_id = None`) or edits a task.
#[flutter_rust_bridge::frb(sync)]
pub fn task_save(
    task_id: Option<String>,
    title: String,
    description: String,
) -> TaskActionResponse {
    let navigator = PendingNavigator::new();
    let result = with_repository(|repo| {
        let id = task_id.as_deref().map(parse_task_id).transpose()?;
        let saved = AddEditTaskViewModel::new(repo, &navigator, id)
            .save_task(title.trim(), description.trim())
            .map_err(|err| err.to_string())?;
        Ok((saved, back_result_message(repo, &navigator)))
    });

    match result {
        Ok((id, message)) => {
            TaskActionResponse::success(message, Some(id.to_string())).navigating(&navigator)
        }
        Err(err) => TaskActionResponse::failure(err),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_set_completed(task_id: String, completed: bool) -> TaskActionResponse {
    let result = with_repository(|repo| {
        let id = parse_task_id(&task_id)?;
        let navigator = PendingNavigator::new();
        TaskDetailViewModel::new(repo, &navigator, id)
            .set_completed(completed)
            .map_err(|err| err.to_string())
    });

    match result {
        Ok(message) => TaskActionResponse::success(message, Some(task_id)),
        Err(err) => TaskActionResponse::failure(format!("task_set_completed failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(task_id: String) -> TaskActionResponse {
    let navigator = PendingNavigator::new();
    let result = with_repository(|repo| {
        let id = parse_task_id(&task_id)?;
        TaskDetailViewModel::new(repo, &navigator, id)
            .delete_task()
            .map_err(|err| err.to_string())?;
        Ok(back_result_message(repo, &navigator))
    });

    match result {
        Ok(message) => {
            TaskActionResponse::success(message, Some(task_id)).navigating(&navigator)
        }
        Err(err) => TaskActionResponse::failure(format!("task_delete failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn tasks_clear_completed() -> TaskActionResponse {
    let result = with_repository(|repo| {
        let navigator = PendingNavigator::new();
        TasksViewModel::new(repo, &navigator)
            .clear_completed_tasks()
            .map_err(|err| err.to_string())
    });

    match result {
        Ok(message) => TaskActionResponse::success(message, None),
        Err(err) => TaskActionResponse::failure(format!("tasks_clear_completed failed: {err}")),
    }
}

/// Merges remote tasks into the local store, when a remote is configured.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_refresh() -> TaskActionResponse {
    let result = with_repository(|repo| {
        let navigator = PendingNavigator::new();
        let vm = TasksViewModel::new(repo, &navigator);
        vm.force_refresh().map_err(|err| err.to_string())?;
        vm.ui_model().map_err(|err| err.to_string())
    });

    match result {
        Ok(model) => {
            TaskActionResponse::success(format!("{} task(s) loaded.", model.items.len()), None)
        }
        Err(err) => TaskActionResponse::failure(format!("tasks_refresh failed: {err}")),
    }
}

/// Returns the statistics screen text; failures yield the error placeholder.
#[flutter_rust_bridge::frb(sync)]
pub fn statistics_text() -> String {
    let result = with_repository(|repo| Ok(statistics_text_for(repo)));
    result.unwrap_or_else(|err| format!("statistics failed: {err}"))
}

fn statistics_text_for<S: TasksStore>(store: S) -> String {
    StatisticsViewModel::new(store).load().text
}

/// Snackbar text the list screen shows when the pending navigation returns to it.
fn back_result_message(repo: &EntryRepository<'_>, navigator: &PendingNavigator) -> String {
    let list_navigator = PendingNavigator::new();
    match navigator.last() {
        Some(Destination::Back(result)) => TasksViewModel::new(repo, &list_navigator)
            .handle_screen_result(result)
            .unwrap_or_default(),
        _ => String::new(),
    }
}

fn with_repository<T>(
    f: impl FnOnce(&EntryRepository<'_>) -> Result<T, String>,
) -> Result<T, String> {
    let conn =
        open_db(&ENTRY_CONFIG.db_path).map_err(|err| format!("task DB open failed: {err}"))?;
    let local = SqliteTasksDataSource::try_new(&conn)
        .map_err(|err| format!("task store init failed: {err}"))?;
    let repo = TasksRepository::from_parts(local, (*ENTRY_REMOTE).as_ref());
    f(&repo)
}

fn parse_task_id(raw: &str) -> Result<TaskId, String> {
    Uuid::parse_str(raw.trim()).map_err(|_| format!("invalid task id `{}`", raw.trim()))
}

fn destination_label(destination: Destination) -> String {
    match destination {
        Destination::AddTask => "add_task".to_string(),
        Destination::TaskDetails(id) => format!("task_details:{id}"),
        Destination::EditTask(id) => format!("edit_task:{id}"),
        Destination::Back(ScreenResult::TaskSaved) => "back:task_saved".to_string(),
        Destination::Back(ScreenResult::TaskDeleted) => "back:task_deleted".to_string(),
        Destination::Back(ScreenResult::Cancelled) => "back:cancelled".to_string(),
    }
}
