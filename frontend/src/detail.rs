//! Task detail view state

use std::sync::Arc;
use todo_backend::{TaskError, TasksRepository};
use todo_shared::Task;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::event::{EventReceiver, EventSender, Message, UiEvent};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailViewState {
    pub task: Option<Task>,
    pub data_loading: bool,
    pub is_data_available: bool,
}

impl DetailViewState {
    pub fn completed(&self) -> bool {
        self.task.as_ref().is_some_and(|t| t.completed)
    }

    fn loaded(task: Task) -> Self {
        Self {
            task: Some(task),
            data_loading: false,
            is_data_available: true,
        }
    }
}

/// A missing task leaves the screen blank; any other failure is also reported.
fn receive(result: Result<Task, TaskError>, events: &EventSender) -> DetailViewState {
    match result {
        Ok(task) => DetailViewState::loaded(task),
        Err(e) if e.is_not_found() => {
            debug!(error = %e, "Task is not available");
            DetailViewState::default()
        }
        Err(e) => {
            warn!(error = %e, "Could not load task");
            events.message(Message::LoadingTasksError);
            DetailViewState::default()
        }
    }
}

pub struct TaskDetailViewModel {
    repository: Arc<dyn TasksRepository>,
    events: EventSender,
    task_id: Option<String>,
    state_tx: Arc<watch::Sender<DetailViewState>>,
    state: watch::Receiver<DetailViewState>,
    worker: Option<JoinHandle<()>>,
}

impl TaskDetailViewModel {
    pub fn new(repository: Arc<dyn TasksRepository>) -> (Self, EventReceiver) {
        let (events, receiver) = EventSender::channel();
        let (state_tx, state) = watch::channel(DetailViewState::default());
        let view_model = Self {
            repository,
            events,
            task_id: None,
            state_tx: Arc::new(state_tx),
            state,
            worker: None,
        };
        (view_model, receiver)
    }

    /// Follows `task_id` until another task is started or the view model is dropped.
    ///
    /// Must be called inside a tokio runtime; the task is followed from a
    /// background task.
    pub fn start(&mut self, task_id: &str) {
        if self.task_id.as_deref() == Some(task_id) {
            return;
        }
        if let Some(worker) = self.worker.take() {
            worker.abort();
        }

        self.task_id = Some(task_id.to_string());
        self.state_tx.send_replace(DetailViewState {
            data_loading: true,
            ..DetailViewState::default()
        });

        let mut observer = self.repository.observe_task(task_id);
        let state = Arc::clone(&self.state_tx);
        let events = self.events.clone();
        let id = task_id.to_string();
        self.worker = Some(tokio::spawn(async move {
            while let Some(result) = observer.next().await {
                state.send_replace(receive(result, &events));
            }
            debug!(task_id = %id, "Task detail stream closed");
        }));
    }

    pub fn state(&self) -> watch::Receiver<DetailViewState> {
        self.state.clone()
    }

    pub fn current(&self) -> DetailViewState {
        self.state.borrow().clone()
    }

    pub async fn set_completed(&self, completed: bool) {
        let Some(task) = self.current().task else {
            return;
        };
        let (result, message) = if completed {
            (self.repository.complete_task(&task).await, Message::TaskMarkedComplete)
        } else {
            (self.repository.activate_task(&task).await, Message::TaskMarkedActive)
        };
        match result {
            Ok(()) => self.events.message(message),
            Err(e) => self.failed("set_completed", e),
        }
    }

    pub async fn delete_task(&self) {
        let Some(task_id) = self.task_id.as_deref() else {
            return;
        };
        match self.repository.delete_task(task_id).await {
            Ok(()) => self.events.send(UiEvent::TaskDeleted),
            Err(e) => self.failed("delete_task", e),
        }
    }

    pub fn edit_task(&self) {
        if let Some(task_id) = &self.task_id {
            self.events.send(UiEvent::EditTask(task_id.clone()));
        }
    }

    /// Reloads the task outside of the change stream.
    pub async fn refresh(&self) {
        let Some(task_id) = self.task_id.as_deref() else {
            return;
        };
        let result = self.repository.get_task(task_id, true).await;
        self.state_tx.send_replace(receive(result, &self.events));
    }

    fn failed(&self, operation: &'static str, error: TaskError) {
        warn!(operation, error = %error, "Task operation failed");
        self.events.message(Message::OperationFailed);
    }
}

impl Drop for TaskDetailViewModel {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.abort();
        }
    }
}
