//! Task list view state

use std::sync::Arc;
use todo_backend::{Result, TasksRepository};
use todo_shared::{Task, TaskFilter};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::event::{EditResult, EventReceiver, EventSender, Message, UiEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoTasksIcon {
    CheckCircle,
    VerifiedUser,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TasksViewState {
    pub filter: TaskFilter,
    pub filtering_label: &'static str,
    pub no_tasks_label: &'static str,
    pub no_tasks_icon: NoTasksIcon,
    pub tasks_add_view_visible: bool,
    pub items: Vec<Task>,
    pub data_loading: bool,
    /// Only set once a load has finished, so nothing flashes the empty screen.
    pub empty: bool,
    pub data_loading_error: bool,
}

#[derive(Debug, Clone)]
enum Loaded {
    Pending,
    Tasks(Vec<Task>),
    Failed,
}

impl TasksViewState {
    fn render(filter: TaskFilter, loaded: &Loaded) -> Self {
        let (filtering_label, no_tasks_label, no_tasks_icon, tasks_add_view_visible) = match filter {
            TaskFilter::All => ("All Tasks", "You have no tasks!", NoTasksIcon::CheckCircle, true),
            TaskFilter::Active => (
                "Active Tasks",
                "You have no active tasks!",
                NoTasksIcon::CheckCircle,
                false,
            ),
            TaskFilter::Completed => (
                "Completed Tasks",
                "You have no completed tasks!",
                NoTasksIcon::VerifiedUser,
                false,
            ),
        };

        let items = match loaded {
            Loaded::Tasks(tasks) => filter.apply(tasks),
            Loaded::Pending | Loaded::Failed => Vec::new(),
        };

        let data_loading = matches!(loaded, Loaded::Pending);
        Self {
            filter,
            filtering_label,
            no_tasks_label,
            no_tasks_icon,
            tasks_add_view_visible,
            data_loading,
            empty: !data_loading && items.is_empty(),
            items,
            data_loading_error: matches!(loaded, Loaded::Failed),
        }
    }
}

enum Command {
    Filter(TaskFilter),
    Reload(bool),
}

/// Filtered, live view over the repository's tasks.
///
/// Must be created inside a tokio runtime; a background task keeps the state
/// in sync with storage until the view model is dropped.
pub struct TasksViewModel {
    repository: Arc<dyn TasksRepository>,
    filter: TaskFilter,
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<TasksViewState>,
    events: EventSender,
    result_message_shown: bool,
    worker: JoinHandle<()>,
}

impl TasksViewModel {
    pub fn new(repository: Arc<dyn TasksRepository>) -> (Self, EventReceiver) {
        Self::with_filter(repository, TaskFilter::default())
    }

    /// Restores a filter kept from an earlier session.
    pub fn with_filter(
        repository: Arc<dyn TasksRepository>,
        filter: TaskFilter,
    ) -> (Self, EventReceiver) {
        let (events, receiver) = EventSender::channel();
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (state_tx, state) = watch::channel(TasksViewState::render(filter, &Loaded::Pending));

        let worker = tokio::spawn(run(
            Arc::clone(&repository),
            filter,
            command_rx,
            state_tx,
            events.clone(),
        ));

        let view_model = Self {
            repository,
            filter,
            commands,
            state,
            events,
            result_message_shown: false,
            worker,
        };
        (view_model, receiver)
    }

    pub fn state(&self) -> watch::Receiver<TasksViewState> {
        self.state.clone()
    }

    pub fn current(&self) -> TasksViewState {
        self.state.borrow().clone()
    }

    pub fn filter(&self) -> TaskFilter {
        self.filter
    }

    pub fn set_filtering(&mut self, filter: TaskFilter) {
        self.filter = filter;
        let _ = self.commands.send(Command::Filter(filter));
    }

    /// Re-reads the task list outside of the change stream.
    pub fn load_tasks(&self, force_update: bool) {
        let _ = self.commands.send(Command::Reload(force_update));
    }

    pub async fn clear_completed_tasks(&self) {
        match self.repository.clear_completed_tasks().await {
            Ok(()) => self.events.message(Message::CompletedTasksCleared),
            Err(e) => self.failed("clear_completed_tasks", e),
        }
    }

    pub async fn complete_task(&self, task: &Task, completed: bool) {
        let (result, message) = if completed {
            (self.repository.complete_task(task).await, Message::TaskMarkedComplete)
        } else {
            (self.repository.activate_task(task).await, Message::TaskMarkedActive)
        };
        match result {
            Ok(()) => self.events.message(message),
            Err(e) => self.failed("complete_task", e),
        }
    }

    pub fn open_task(&self, task_id: &str) {
        self.events.send(UiEvent::OpenTask(task_id.to_string()));
    }

    pub fn add_new_task(&self) {
        self.events.send(UiEvent::NewTask);
    }

    /// Shows the outcome of the add/edit or detail screen, once.
    pub fn show_edit_result_message(&mut self, result: EditResult) {
        if self.result_message_shown {
            return;
        }
        self.events.message(result.message());
        self.result_message_shown = true;
    }

    fn failed(&self, operation: &'static str, error: todo_backend::TaskError) {
        warn!(operation, error = %error, "Task operation failed");
        self.events.message(Message::OperationFailed);
    }
}

impl Drop for TasksViewModel {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

async fn run(
    repository: Arc<dyn TasksRepository>,
    mut filter: TaskFilter,
    mut commands: mpsc::UnboundedReceiver<Command>,
    state: watch::Sender<TasksViewState>,
    events: EventSender,
) {
    let mut observer = repository.observe_tasks();
    let mut loaded = Loaded::Pending;

    loop {
        tokio::select! {
            snapshot = observer.next() => match snapshot {
                Some(snapshot) => loaded = receive(snapshot, &events),
                None => break,
            },
            command = commands.recv() => match command {
                Some(Command::Filter(next)) => {
                    debug!(filter = ?next, "Filter changed");
                    filter = next;
                }
                Some(Command::Reload(force_update)) => {
                    loaded = receive(repository.get_tasks(force_update).await, &events);
                }
                None => break,
            },
        }

        let next = TasksViewState::render(filter, &loaded);
        state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }

    debug!("Task list stream closed");
}

fn receive(snapshot: Result<Vec<Task>>, events: &EventSender) -> Loaded {
    match snapshot {
        Ok(tasks) => Loaded::Tasks(tasks),
        Err(e) => {
            warn!(error = %e, "Could not load tasks");
            events.message(Message::LoadingTasksError);
            Loaded::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tasks() -> Vec<Task> {
        vec![
            Task::with_id("a", "", true, "1"),
            Task::with_id("b", "", false, "2"),
        ]
    }

    #[test]
    fn labels_follow_the_filter() {
        let all = TasksViewState::render(TaskFilter::All, &Loaded::Pending);
        assert_eq!(all.filtering_label, "All Tasks");
        assert!(all.tasks_add_view_visible);

        let completed = TasksViewState::render(TaskFilter::Completed, &Loaded::Pending);
        assert_eq!(completed.no_tasks_label, "You have no completed tasks!");
        assert_eq!(completed.no_tasks_icon, NoTasksIcon::VerifiedUser);
        assert!(!completed.tasks_add_view_visible);
    }

    #[test]
    fn render_filters_loaded_tasks() {
        let state = TasksViewState::render(TaskFilter::Active, &Loaded::Tasks(tasks()));
        assert_eq!(state.items, vec![tasks()[1].clone()]);
        assert!(!state.empty);
        assert!(!state.data_loading_error);
    }

    #[test]
    fn pending_load_is_not_empty() {
        let state = TasksViewState::render(TaskFilter::All, &Loaded::Pending);
        assert!(state.data_loading);
        assert!(!state.empty);
        assert!(state.items.is_empty());

        let loaded = TasksViewState::render(TaskFilter::All, &Loaded::Tasks(Vec::new()));
        assert!(!loaded.data_loading);
        assert!(loaded.empty);
    }

    #[test]
    fn failed_load_renders_empty_with_error() {
        let state = TasksViewState::render(TaskFilter::All, &Loaded::Failed);
        assert!(state.items.is_empty());
        assert!(state.empty);
        assert!(state.data_loading_error);
    }
}
