use serde::{Deserialize, Serialize};

use crate::Task;

/// Client-side view selector over the full task set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl TaskFilter {
    pub const ALL: [TaskFilter; 3] = [TaskFilter::All, TaskFilter::Active, TaskFilter::Completed];

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Active => task.is_active(),
            TaskFilter::Completed => task.is_completed(),
        }
    }

    /// Keeps input order and duplicates.
    pub fn apply(&self, tasks: &[Task]) -> Vec<Task> {
        tasks.iter().filter(|t| self.matches(t)).cloned().collect()
    }
}

pub fn filter_tasks(tasks: &[Task], filter: TaskFilter) -> Vec<Task> {
    filter.apply(tasks)
}
