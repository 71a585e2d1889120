use std::fmt;
use tokio::sync::mpsc;

/// One-shot notifications for whoever renders the screens.
///
/// Each event is delivered once through the receiver handed out by the view model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    OpenTask(String),
    NewTask,
    EditTask(String),
    TaskSaved,
    TaskDeleted,
    ShowMessage(Message),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    TaskMarkedComplete,
    TaskMarkedActive,
    CompletedTasksCleared,
    LoadingTasksError,
    EmptyTask,
    TaskSaved,
    TaskAdded,
    TaskDeleted,
    OperationFailed,
}

impl Message {
    pub fn text(&self) -> &'static str {
        match self {
            Message::TaskMarkedComplete => "Task marked complete",
            Message::TaskMarkedActive => "Task marked active",
            Message::CompletedTasksCleared => "Completed tasks cleared",
            Message::LoadingTasksError => "Error while loading tasks",
            Message::EmptyTask => "Tasks cannot be empty",
            Message::TaskSaved => "Task saved",
            Message::TaskAdded => "Task added",
            Message::TaskDeleted => "Task was deleted",
            Message::OperationFailed => "Something went wrong, please try again",
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// How the add/edit or detail screen finished, reported back to the task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditResult {
    Edited,
    Added,
    Deleted,
}

impl EditResult {
    pub fn message(&self) -> Message {
        match self {
            EditResult::Edited => Message::TaskSaved,
            EditResult::Added => Message::TaskAdded,
            EditResult::Deleted => Message::TaskDeleted,
        }
    }
}

pub type EventReceiver = mpsc::UnboundedReceiver<UiEvent>;

#[derive(Debug, Clone)]
pub(crate) struct EventSender(mpsc::UnboundedSender<UiEvent>);

impl EventSender {
    pub(crate) fn channel() -> (Self, EventReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self(tx), rx)
    }

    // a dropped receiver means nobody is showing the screen anymore
    pub(crate) fn send(&self, event: UiEvent) {
        let _ = self.0.send(event);
    }

    pub(crate) fn message(&self, message: Message) {
        self.send(UiEvent::ShowMessage(message));
    }
}
