//! Task data sources
//!
//! A data source turns storage outcomes into tagged results. The local one
//! wraps a [`TaskDao`]; a remote one would implement the same trait.

use async_trait::async_trait;
use std::sync::Arc;
use todo_shared::Task;
use tracing::{debug, warn};

use crate::dao::TaskDao;
use crate::error::TaskError;
use crate::observe::Observer;
use crate::Result;

#[async_trait]
pub trait TaskDataSource: Send + Sync {
    fn observe_tasks(&self) -> Observer<Result<Vec<Task>>>;

    fn observe_task(&self, task_id: &str) -> Observer<Result<Task>>;

    async fn get_tasks(&self) -> Result<Vec<Task>>;

    async fn get_task(&self, task_id: &str) -> Result<Task>;

    async fn save_task(&self, task: &Task) -> Result<()>;

    async fn complete_task(&self, task: &Task) -> Result<()>;

    async fn activate_task(&self, task: &Task) -> Result<()>;

    /// Returns how many completed tasks were removed.
    async fn clear_completed_tasks(&self) -> Result<u64>;

    async fn delete_all_tasks(&self) -> Result<()>;

    /// Returns how many tasks were removed (0 or 1).
    async fn delete_task(&self, task_id: &str) -> Result<u64>;
}

/// Data source backed by the local task table.
pub struct LocalTaskDataSource {
    dao: Arc<dyn TaskDao>,
}

impl LocalTaskDataSource {
    pub fn new(dao: Arc<dyn TaskDao>) -> Self {
        Self { dao }
    }

    async fn set_completed(&self, task_id: &str, completed: bool) -> Result<()> {
        let rows = self
            .dao
            .set_completed(task_id, completed)
            .await
            .inspect_err(|e| warn!(task_id, error = %e, "Failed to update completion"))?;
        debug!(task_id, completed, rows, "Completion updated");
        Ok(())
    }
}

#[async_trait]
impl TaskDataSource for LocalTaskDataSource {
    fn observe_tasks(&self) -> Observer<Result<Vec<Task>>> {
        self.dao
            .observe_all()
            .map(|snapshot| snapshot.map_err(TaskError::from))
    }

    fn observe_task(&self, task_id: &str) -> Observer<Result<Task>> {
        let id = task_id.to_string();
        self.dao.observe_by_id(task_id).map(move |snapshot| match snapshot {
            Ok(Some(task)) => Ok(task),
            Ok(None) => Err(TaskError::NotFound(id.clone())),
            Err(e) => Err(e.into()),
        })
    }

    async fn get_tasks(&self) -> Result<Vec<Task>> {
        let tasks = self
            .dao
            .get_all()
            .await
            .inspect_err(|e| warn!(error = %e, "Failed to load tasks"))?;
        debug!(count = tasks.len(), "Loaded tasks");
        Ok(tasks)
    }

    async fn get_task(&self, task_id: &str) -> Result<Task> {
        match self.dao.get_by_id(task_id).await {
            Ok(Some(task)) => Ok(task),
            Ok(None) => {
                debug!(task_id, "Task not found");
                Err(TaskError::NotFound(task_id.to_string()))
            }
            Err(e) => {
                warn!(task_id, error = %e, "Failed to load task");
                Err(e.into())
            }
        }
    }

    async fn save_task(&self, task: &Task) -> Result<()> {
        self.dao
            .upsert(task)
            .await
            .inspect_err(|e| warn!(task_id = %task.id, error = %e, "Failed to save task"))?;
        debug!(task_id = %task.id, "Task saved");
        Ok(())
    }

    async fn complete_task(&self, task: &Task) -> Result<()> {
        self.set_completed(&task.id, true).await
    }

    async fn activate_task(&self, task: &Task) -> Result<()> {
        self.set_completed(&task.id, false).await
    }

    async fn clear_completed_tasks(&self) -> Result<u64> {
        let removed = self
            .dao
            .delete_completed()
            .await
            .inspect_err(|e| warn!(error = %e, "Failed to clear completed tasks"))?;
        debug!(removed, "Cleared completed tasks");
        Ok(removed)
    }

    async fn delete_all_tasks(&self) -> Result<()> {
        let removed = self
            .dao
            .delete_all()
            .await
            .inspect_err(|e| warn!(error = %e, "Failed to delete tasks"))?;
        debug!(removed, "Deleted all tasks");
        Ok(())
    }

    async fn delete_task(&self, task_id: &str) -> Result<u64> {
        let removed = self
            .dao
            .delete_by_id(task_id)
            .await
            .inspect_err(|e| warn!(task_id, error = %e, "Failed to delete task"))?;
        debug!(task_id, removed, "Deleted task");
        Ok(removed)
    }
}
