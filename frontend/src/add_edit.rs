//! Add / edit task form

use std::sync::Arc;
use todo_backend::TasksRepository;
use todo_shared::{Task, TaskDraft};
use tracing::{debug, warn};

use crate::event::{EventReceiver, EventSender, Message, UiEvent};

pub struct AddEditTaskViewModel {
    repository: Arc<dyn TasksRepository>,
    events: EventSender,
    pub title: String,
    pub description: String,
    task_id: Option<String>,
    is_new_task: bool,
    is_data_loaded: bool,
    data_loading: bool,
    task_completed: bool,
}

impl AddEditTaskViewModel {
    pub fn new(repository: Arc<dyn TasksRepository>) -> (Self, EventReceiver) {
        let (events, receiver) = EventSender::channel();
        let view_model = Self {
            repository,
            events,
            title: String::new(),
            description: String::new(),
            task_id: None,
            is_new_task: true,
            is_data_loaded: false,
            data_loading: false,
            task_completed: false,
        };
        (view_model, receiver)
    }

    /// `None` starts a new task; `Some(id)` loads the task to edit, once.
    ///
    /// Taking `&mut self` keeps a second call from overlapping a load in flight.
    pub async fn start(&mut self, task_id: Option<&str>) {
        let Some(task_id) = task_id else {
            self.task_id = None;
            self.is_new_task = true;
            return;
        };
        self.task_id = Some(task_id.to_string());
        if self.is_data_loaded {
            return;
        }

        self.is_new_task = false;
        self.data_loading = true;

        match self.repository.get_task(task_id, false).await {
            Ok(task) => self.on_task_loaded(task),
            Err(e) => {
                debug!(task_id, error = %e, "Task to edit is not available");
            }
        }
        self.data_loading = false;
    }

    fn on_task_loaded(&mut self, task: Task) {
        self.title = task.title;
        self.description = task.description;
        self.task_completed = task.completed;
        self.is_data_loaded = true;
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn is_new_task(&self) -> bool {
        self.is_new_task
    }

    pub fn data_loading(&self) -> bool {
        self.data_loading
    }

    pub async fn save_task(&mut self) {
        let draft = TaskDraft::new(self.title.clone(), self.description.clone());

        let task = match (&self.task_id, self.is_new_task) {
            (Some(id), false) => draft.into_task(id.clone(), self.task_completed),
            _ => draft.into_new_task(),
        };
        let task = match task {
            Ok(task) => task,
            Err(_) => {
                self.events.message(Message::EmptyTask);
                return;
            }
        };

        match self.repository.save_task(&task).await {
            Ok(()) => self.events.send(UiEvent::TaskSaved),
            Err(e) => {
                warn!(task_id = %task.id, error = %e, "Failed to save task");
                self.events.message(Message::OperationFailed);
            }
        }
    }
}
