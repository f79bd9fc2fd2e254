//! User-facing text lookup.

/// Text keys used by view-models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    Loading,
    LoadingTasksError,
    StatisticsNoTasks,
    StatisticsActiveCompleted { active: usize, completed: usize },
    StatisticsError,
    LabelAll,
    LabelActive,
    LabelCompleted,
    NoTasksAll,
    NoTasksActive,
    NoTasksCompleted,
    TaskMarkedComplete,
    TaskMarkedActive,
    CompletedTasksCleared,
    TaskSaved,
    TaskDeleted,
    EmptyTask,
    NoData,
}

/// Resolves `Message` keys into display strings.
pub trait ResourceProvider {
    fn text(&self, message: Message) -> String;
}

impl<P: ResourceProvider + ?Sized> ResourceProvider for &P {
    fn text(&self, message: Message) -> String {
        (**self).text(message)
    }
}

/// Built-in English strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishResources;

impl ResourceProvider for EnglishResources {
    fn text(&self, message: Message) -> String {
        let text = match message {
            Message::StatisticsActiveCompleted { active, completed } => {
                return format!("Active tasks: {active}\nCompleted tasks: {completed}");
            }
            Message::Loading => "Loading…",
            Message::LoadingTasksError => "Error while loading tasks",
            Message::StatisticsNoTasks => "You have no tasks.",
            Message::StatisticsError => "Error",
            Message::LabelAll => "All TO-DOs",
            Message::LabelActive => "Active TO-DOs",
            Message::LabelCompleted => "Completed TO-DOs",
            Message::NoTasksAll => "You have no TO-DOs!",
            Message::NoTasksActive => "You have no active TO-DOs!",
            Message::NoTasksCompleted => "You have no completed TO-DOs!",
            Message::TaskMarkedComplete => "Task marked complete",
            Message::TaskMarkedActive => "Task marked active",
            Message::CompletedTasksCleared => "Completed tasks cleared",
            Message::TaskSaved => "TO-DO saved",
            Message::TaskDeleted => "Task was deleted",
            Message::EmptyTask => "TO-DOs cannot be empty",
            Message::NoData => "No data",
        };
        text.to_string()
    }
}
