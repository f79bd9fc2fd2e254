use rusqlite::Connection;
use todoapp_core::db::open_db_in_memory;
use todoapp_core::{
    AddEditError, AddEditTaskViewModel, Destination, InMemoryRemoteDataSource, Message,
    NoTasksIcon, PendingNavigator, ResourceProvider, ScreenResult, SqliteTasksDataSource,
    StatisticsState, StatisticsViewModel, Task, TaskDetailViewModel, TasksDataSource,
    TasksFilterType, TasksRepository, TasksViewModel,
};
use uuid::Uuid;

type Repo<'conn> = TasksRepository<SqliteTasksDataSource<'conn>>;

fn local_repo(conn: &Connection) -> Repo<'_> {
    TasksRepository::local_only(SqliteTasksDataSource::try_new(conn).unwrap())
}

fn seed(repo: &Repo<'_>) -> (Task, Task, Task) {
    let active = Task::new("Write report", "quarterly");
    let done = Task::new("", "Pay rent").with_completed(true);
    let other = Task::new("Call mum", "");
    repo.save_tasks(&[active.clone(), done.clone(), other.clone()])
        .unwrap();
    (active, done, other)
}

#[test]
fn tasks_list_filters_and_labels() {
    let conn = open_db_in_memory().unwrap();
    let repo = local_repo(&conn);
    let (active, done, other) = seed(&repo);
    let navigator = PendingNavigator::new();
    let mut vm = TasksViewModel::new(&repo, &navigator);

    let all = vm.ui_model().unwrap();
    assert_eq!(all.filter_label, "All TO-DOs");
    assert_eq!(all.items.len(), 3);
    assert!(all.no_tasks.is_none());
    assert_eq!(all.items[1].title, "Pay rent");

    vm.set_filter(TasksFilterType::Active);
    let ids: Vec<Uuid> = vm.ui_model().unwrap().items.iter().map(|item| item.id).collect();
    assert_eq!(ids, vec![active.id, other.id]);

    vm.set_filter(TasksFilterType::Completed);
    let completed = vm.ui_model().unwrap();
    assert_eq!(completed.filter_label, "Completed TO-DOs");
    assert_eq!(completed.items.len(), 1);
    assert_eq!(completed.items[0].id, done.id);
    assert!(completed.items[0].completed);
}

#[test]
fn empty_state_depends_on_filter() {
    let conn = open_db_in_memory().unwrap();
    let repo = local_repo(&conn);
    let navigator = PendingNavigator::new();
    let mut vm = TasksViewModel::new(&repo, &navigator);

    let model = vm.ui_model().unwrap();
    assert!(!model.is_list_visible());
    let empty = model.no_tasks.unwrap();
    assert_eq!(empty.text, "You have no TO-DOs!");
    assert_eq!(empty.icon, NoTasksIcon::AssignmentTurnedIn);
    assert!(empty.show_add_task);

    vm.set_filter(TasksFilterType::Completed);
    let empty = vm.ui_model().unwrap().no_tasks.unwrap();
    assert_eq!(empty.text, "You have no completed TO-DOs!");
    assert!(!empty.show_add_task);
}

#[test]
fn tasks_list_actions_return_snackbar_text_and_notify() {
    let conn = open_db_in_memory().unwrap();
    let repo = local_repo(&conn);
    let (active, done, _) = seed(&repo);
    let navigator = PendingNavigator::new();
    let mut vm = TasksViewModel::new(&repo, &navigator);
    assert!(!vm.take_changes());

    assert_eq!(
        vm.set_task_completed(active.id, true).unwrap(),
        "Task marked complete"
    );
    assert_eq!(
        vm.set_task_completed(done.id, false).unwrap(),
        "Task marked active"
    );
    assert!(vm.take_changes());
    assert!(!vm.take_changes());

    assert_eq!(vm.clear_completed_tasks().unwrap(), "Completed tasks cleared");
    let remaining: Vec<Uuid> = repo.get_tasks().unwrap().iter().map(|task| task.id).collect();
    assert!(!remaining.contains(&active.id));
    assert!(remaining.contains(&done.id));
}

#[test]
fn tasks_list_navigation_and_screen_results() {
    let conn = open_db_in_memory().unwrap();
    let repo = local_repo(&conn);
    let navigator = PendingNavigator::new();
    let vm = TasksViewModel::new(&repo, &navigator);

    let id = Uuid::new_v4();
    vm.add_new_task();
    vm.open_task_details(id);
    assert_eq!(
        navigator.take(),
        vec![Destination::AddTask, Destination::TaskDetails(id)]
    );

    assert_eq!(
        vm.handle_screen_result(ScreenResult::TaskSaved).as_deref(),
        Some("TO-DO saved")
    );
    assert_eq!(vm.handle_screen_result(ScreenResult::Cancelled), None);
}

#[test]
fn tasks_list_load_failure_becomes_message() {
    let conn = open_db_in_memory().unwrap();
    let remote = InMemoryRemoteDataSource::seeded();
    let repo = TasksRepository::new(SqliteTasksDataSource::try_new(&conn).unwrap(), remote);
    repo.get_tasks().unwrap();
    repo.remote().unwrap().set_available(false);

    let navigator = PendingNavigator::new();
    let vm = TasksViewModel::new(&repo, &navigator);
    vm.force_refresh().unwrap();
    assert_eq!(
        vm.ui_model_or_message().unwrap_err(),
        "Error while loading tasks"
    );
}

#[test]
fn task_detail_shows_task_and_placeholder() {
    let conn = open_db_in_memory().unwrap();
    let repo = local_repo(&conn);
    let (active, done, _) = seed(&repo);
    let navigator = PendingNavigator::new();

    let model = TaskDetailViewModel::new(&repo, &navigator, active.id)
        .ui_model()
        .unwrap();
    assert!(model.found);
    assert_eq!(model.title, "Write report");
    assert!(model.show_description);

    let untitled = TaskDetailViewModel::new(&repo, &navigator, done.id)
        .ui_model()
        .unwrap();
    assert!(!untitled.show_title);
    assert!(untitled.completed);

    let missing = TaskDetailViewModel::new(&repo, &navigator, Uuid::new_v4())
        .ui_model()
        .unwrap();
    assert!(!missing.found);
    assert_eq!(missing.title, "No data");
}

#[test]
fn task_detail_toggle_delete_and_edit() {
    let conn = open_db_in_memory().unwrap();
    let repo = local_repo(&conn);
    let (active, _, _) = seed(&repo);
    let navigator = PendingNavigator::new();
    let vm = TaskDetailViewModel::new(&repo, &navigator, active.id);

    assert_eq!(vm.set_completed(true).unwrap(), "Task marked complete");
    assert!(vm.ui_model().unwrap().completed);

    vm.edit_task();
    assert_eq!(navigator.last(), Some(Destination::EditTask(active.id)));

    vm.delete_task().unwrap();
    assert_eq!(
        navigator.last(),
        Some(Destination::Back(ScreenResult::TaskDeleted))
    );
    assert_eq!(repo.get_task(active.id).unwrap(), None);
}

#[test]
fn add_task_saves_and_navigates_back() {
    let conn = open_db_in_memory().unwrap();
    let repo = local_repo(&conn);
    let navigator = PendingNavigator::new();
    let vm = AddEditTaskViewModel::new(&repo, &navigator, None);
    assert!(vm.is_new_task());
    assert_eq!(vm.populate().unwrap(), None);

    let id = vm.save_task("Groceries", "eggs, bread").unwrap();
    let saved = repo.get_task(id).unwrap().unwrap();
    assert_eq!(saved.title, "Groceries");
    assert!(saved.is_active());
    assert_eq!(
        navigator.take(),
        vec![Destination::Back(ScreenResult::TaskSaved)]
    );
}

#[test]
fn add_rejects_empty_task_without_navigating() {
    let conn = open_db_in_memory().unwrap();
    let repo = local_repo(&conn);
    let navigator = PendingNavigator::new();
    let vm = AddEditTaskViewModel::new(&repo, &navigator, None);

    let err = vm.save_task("  ", "").unwrap_err();
    assert!(matches!(&err, AddEditError::EmptyTask(text) if text == "TO-DOs cannot be empty"));
    assert!(navigator.take().is_empty());
    assert!(repo.get_tasks().unwrap().is_empty());
}

#[test]
fn edit_keeps_completion_flag() {
    let conn = open_db_in_memory().unwrap();
    let repo = local_repo(&conn);
    let (_, done, _) = seed(&repo);
    let navigator = PendingNavigator::new();
    let vm = AddEditTaskViewModel::new(&repo, &navigator, Some(done.id));

    assert_eq!(vm.populate().unwrap(), Some(done.clone()));
    vm.save_task("Pay rent", "before the 5th").unwrap();

    let edited = repo.get_task(done.id).unwrap().unwrap();
    assert_eq!(edited.description, "before the 5th");
    assert!(edited.completed);
}

#[test]
fn cancel_navigates_back_without_saving() {
    let conn = open_db_in_memory().unwrap();
    let repo = local_repo(&conn);
    let navigator = PendingNavigator::new();
    let vm = AddEditTaskViewModel::new(&repo, &navigator, None);

    vm.cancel();
    assert_eq!(
        navigator.take(),
        vec![Destination::Back(ScreenResult::Cancelled)]
    );
    assert!(repo.get_tasks().unwrap().is_empty());
}

#[test]
fn statistics_stream_emits_loading_then_counts() {
    let conn = open_db_in_memory().unwrap();
    let repo = local_repo(&conn);
    seed(&repo);
    let vm = StatisticsViewModel::new(&repo);

    let models: Vec<_> = vm.ui_models().collect();
    assert_eq!(models.len(), 2);
    assert_eq!(models[0].state, StatisticsState::Loading);
    assert_eq!(
        models[1].state,
        StatisticsState::Loaded {
            active: 2,
            completed: 1
        }
    );
    assert_eq!(models[1].text, "Active tasks: 2\nCompleted tasks: 1");
}

#[test]
fn statistics_counts_match_task_flags() {
    let conn = open_db_in_memory().unwrap();
    let repo = local_repo(&conn);
    let vm = StatisticsViewModel::new(&repo);

    assert_eq!(vm.load().state, StatisticsState::Empty);
    assert_eq!(vm.load().text, "You have no tasks.");

    for index in 0..7 {
        let task = Task::new(format!("task {index}"), "").with_completed(index % 3 == 0);
        repo.save_task(&task).unwrap();
    }
    let tasks = repo.get_tasks().unwrap();
    let expected_completed = tasks.iter().filter(|task| task.completed).count();
    let expected_active = tasks.iter().filter(|task| !task.completed).count();

    assert_eq!(
        vm.load().state,
        StatisticsState::Loaded {
            active: expected_active,
            completed: expected_completed
        }
    );
}

#[test]
fn statistics_load_keeps_locally_stored_tasks() {
    let conn = open_db_in_memory().unwrap();
    let mine = Task::new("my task", "").with_completed(true);
    SqliteTasksDataSource::try_new(&conn)
        .unwrap()
        .save_task(&mine)
        .unwrap();
    let repo = TasksRepository::new(
        SqliteTasksDataSource::try_new(&conn).unwrap(),
        InMemoryRemoteDataSource::seeded(),
    );

    let model = StatisticsViewModel::new(&repo).load();
    assert_eq!(model.text, "Active tasks: 2\nCompleted tasks: 1");
    assert_eq!(repo.get_task(mine.id).unwrap(), Some(mine.clone()));
    assert!(repo.local().get_tasks().unwrap().contains(&mine));
}

#[test]
fn statistics_error_becomes_placeholder() {
    let conn = open_db_in_memory().unwrap();
    let remote = InMemoryRemoteDataSource::seeded();
    remote.set_available(false);
    let repo = TasksRepository::new(SqliteTasksDataSource::try_new(&conn).unwrap(), remote);
    let vm = StatisticsViewModel::new(&repo);

    let model = vm.load();
    assert_eq!(model.state, StatisticsState::Error);
    assert_eq!(model.text, "Error");
}

struct Shouting;

impl ResourceProvider for Shouting {
    fn text(&self, message: Message) -> String {
        format!("{message:?}").to_uppercase()
    }
}

#[test]
fn custom_resources_are_used_for_text() {
    let conn = open_db_in_memory().unwrap();
    let repo = local_repo(&conn);
    let vm = StatisticsViewModel::with_resources(&repo, Shouting);

    assert_eq!(vm.load().text, "STATISTICSNOTASKS");
}
