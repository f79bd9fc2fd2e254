//! Command-line front end for the to-do core.
//!
//! Drives the same view-models as the mobile UI; navigation requests are
//! resolved in-process and reported as plain text.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use todoapp_core::db::open_db;
use todoapp_core::{
    init_logging, AddEditTaskViewModel, CoreConfig, Destination, PendingNavigator,
    SqliteTasksDataSource, StatisticsViewModel, TaskDetailViewModel, TaskId, TasksFilterType,
    TasksRepository, TasksStore, TasksViewModel,
};

/// Manage a local to-do list.
#[derive(Parser, Debug)]
#[command(name = "todoapp", author, version, about, long_about = None)]
struct Args {
    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database path (overrides config and environment)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List tasks
    List {
        /// all | active | completed
        #[arg(long, default_value = "all")]
        filter: TasksFilterType,
    },
    /// Show one task
    Show { id: TaskId },
    /// Add a task
    Add {
        title: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Edit title and/or description of a task
    Edit {
        id: TaskId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Mark a task completed
    Complete { id: TaskId },
    /// Mark a task active
    Activate { id: TaskId },
    /// Delete a task
    Delete { id: TaskId },
    /// Delete every completed task
    ClearCompleted,
    /// Reload tasks from the remote source
    Refresh,
    /// Show active/completed counts
    Stats,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    if let Some(log_dir) = config.log_dir.as_ref() {
        let log_dir = log_dir.to_string_lossy();
        init_logging(&config.log_level, &log_dir)
            .map_err(anyhow::Error::msg)
            .context("failed to initialize logging")?;
    }

    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open {}", config.db_path.display()))?;
    let local = SqliteTasksDataSource::try_new(&conn)?;
    let repo = TasksRepository::from_parts(local, config.remote_source());
    run(&repo, args.command)
}

fn load_config(args: &Args) -> Result<CoreConfig> {
    let config = match args.config.as_ref() {
        Some(path) => CoreConfig::load(path)?,
        None => CoreConfig::default(),
    };
    let mut config = config.with_env_overrides()?;
    if let Some(db) = args.db.clone() {
        config.db_path = db;
    }
    Ok(config)
}

fn run<S: TasksStore>(store: &S, command: Command) -> Result<()> {
    let navigator = PendingNavigator::new();
    let tasks = TasksViewModel::new(store, &navigator);

    match command {
        Command::List { filter } => {
            let mut tasks = tasks;
            tasks.set_filter(filter);
            let model = tasks.ui_model_or_message().map_err(anyhow::Error::msg)?;
            println!("{}", model.filter_label);
            for item in &model.items {
                let mark = if item.completed { "x" } else { " " };
                println!("[{mark}] {}  {}", item.id, item.title);
            }
            if let Some(empty) = model.no_tasks {
                println!("{}", empty.text);
            }
        }
        Command::Show { id } => {
            let model = TaskDetailViewModel::new(store, &navigator, id).ui_model()?;
            if !model.found {
                bail!("{}", model.title);
            }
            let state = if model.completed { "completed" } else { "active" };
            println!("{} ({state})", model.title);
            if model.show_description {
                println!("{}", model.description);
            }
        }
        Command::Add { title, description } => {
            AddEditTaskViewModel::new(store, &navigator, None).save_task(&title, &description)?;
            report_navigation(&tasks, &navigator);
        }
        Command::Edit {
            id,
            title,
            description,
        } => {
            let vm = AddEditTaskViewModel::new(store, &navigator, Some(id));
            let current = vm
                .populate()?
                .with_context(|| format!("task {id} not found"))?;
            vm.save_task(
                title.as_deref().unwrap_or(&current.title),
                description.as_deref().unwrap_or(&current.description),
            )?;
            report_navigation(&tasks, &navigator);
        }
        Command::Complete { id } => println!("{}", tasks.set_task_completed(id, true)?),
        Command::Activate { id } => println!("{}", tasks.set_task_completed(id, false)?),
        Command::Delete { id } => {
            TaskDetailViewModel::new(store, &navigator, id).delete_task()?;
            report_navigation(&tasks, &navigator);
        }
        Command::ClearCompleted => println!("{}", tasks.clear_completed_tasks()?),
        Command::Refresh => {
            tasks.force_refresh()?;
            let model = tasks.ui_model()?;
            println!("{} task(s) loaded", model.items.len());
        }
        Command::Stats => {
            let statistics = StatisticsViewModel::new(store);
            println!("{}", statistics.load().text);
        }
    }

    Ok(())
}

fn report_navigation<S: TasksStore>(
    tasks: &TasksViewModel<S, &PendingNavigator>,
    navigator: &PendingNavigator,
) {
    for destination in navigator.take() {
        if let Destination::Back(result) = destination {
            if let Some(message) = tasks.handle_screen_result(result) {
                println!("{message}");
            }
        }
    }
}
