use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub mod filter;
pub mod stats;

pub use filter::{filter_tasks, TaskFilter};
pub use stats::TaskStats;

/// Shown in lists when a task has no title.
pub const UNTITLED_PLACEHOLDER: &str = "(untitled)";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub completed: bool,
}

/// User input for a task that has not been validated yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Tasks cannot be empty")]
pub struct EmptyTaskRejected;

impl Task {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_id(title, description, false, Uuid::new_v4().to_string())
    }

    pub fn with_id(
        title: impl Into<String>,
        description: impl Into<String>,
        completed: bool,
        id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            completed,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.completed
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Empty tasks must never be persisted.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.description.is_empty()
    }

    pub fn title_for_list(&self) -> &str {
        if self.title.is_empty() {
            UNTITLED_PLACEHOLDER
        } else {
            &self.title
        }
    }
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.description.is_empty()
    }

    pub fn validate(&self) -> Result<(), EmptyTaskRejected> {
        if self.is_empty() {
            Err(EmptyTaskRejected)
        } else {
            Ok(())
        }
    }

    /// Builds a fresh task with a generated id.
    pub fn into_new_task(self) -> Result<Task, EmptyTaskRejected> {
        self.validate()?;
        Ok(Task::new(self.title, self.description))
    }

    /// Builds the replacement for an existing task, keeping its id and completion.
    pub fn into_task(self, id: impl Into<String>, completed: bool) -> Result<Task, EmptyTaskRejected> {
        self.validate()?;
        Ok(Task::with_id(self.title, self.description, completed, id))
    }
}
