//! Repository facade

use async_trait::async_trait;
use std::sync::Arc;
use todo_shared::Task;
use tracing::{debug, trace};

use crate::observe::Observer;
use crate::source::TaskDataSource;
use crate::Result;

/// The single seam the presentation layer depends on.
///
/// Reads hand back `Ok(value)` or `Err(TaskError)`; nothing past this boundary
/// needs to catch panics. `force_update` exists so a remote-backed
/// implementation can bypass its cache.
#[async_trait]
pub trait TasksRepository: Send + Sync {
    fn observe_tasks(&self) -> Observer<Result<Vec<Task>>>;

    fn observe_task(&self, task_id: &str) -> Observer<Result<Task>>;

    async fn get_tasks(&self, force_update: bool) -> Result<Vec<Task>>;

    async fn get_task(&self, task_id: &str, force_update: bool) -> Result<Task>;

    /// Inserts or fully replaces the task. Callers reject empty tasks first.
    async fn save_task(&self, task: &Task) -> Result<()>;

    async fn complete_task(&self, task: &Task) -> Result<()>;

    /// Looks the task up first; an unknown id is reported as `NotFound`.
    async fn complete_task_by_id(&self, task_id: &str) -> Result<()>;

    async fn activate_task(&self, task: &Task) -> Result<()>;

    /// Looks the task up first; an unknown id is reported as `NotFound`.
    async fn activate_task_by_id(&self, task_id: &str) -> Result<()>;

    async fn clear_completed_tasks(&self) -> Result<()>;

    async fn delete_all_tasks(&self) -> Result<()>;

    async fn delete_task(&self, task_id: &str) -> Result<()>;
}

/// Stateless repository over one data source.
pub struct DefaultTasksRepository {
    local: Arc<dyn TaskDataSource>,
}

impl DefaultTasksRepository {
    pub fn new(local: Arc<dyn TaskDataSource>) -> Self {
        Self { local }
    }
}

#[async_trait]
impl TasksRepository for DefaultTasksRepository {
    fn observe_tasks(&self) -> Observer<Result<Vec<Task>>> {
        self.local.observe_tasks()
    }

    fn observe_task(&self, task_id: &str) -> Observer<Result<Task>> {
        self.local.observe_task(task_id)
    }

    async fn get_tasks(&self, force_update: bool) -> Result<Vec<Task>> {
        trace!(force_update, "get_tasks");
        self.local.get_tasks().await
    }

    async fn get_task(&self, task_id: &str, force_update: bool) -> Result<Task> {
        trace!(task_id, force_update, "get_task");
        self.local.get_task(task_id).await
    }

    async fn save_task(&self, task: &Task) -> Result<()> {
        self.local.save_task(task).await
    }

    async fn complete_task(&self, task: &Task) -> Result<()> {
        self.local.complete_task(task).await
    }

    async fn complete_task_by_id(&self, task_id: &str) -> Result<()> {
        let task = self.local.get_task(task_id).await?;
        self.complete_task(&task).await
    }

    async fn activate_task(&self, task: &Task) -> Result<()> {
        self.local.activate_task(task).await
    }

    async fn activate_task_by_id(&self, task_id: &str) -> Result<()> {
        let task = self.local.get_task(task_id).await?;
        self.activate_task(&task).await
    }

    async fn clear_completed_tasks(&self) -> Result<()> {
        let removed = self.local.clear_completed_tasks().await?;
        debug!(removed, "clear_completed_tasks");
        Ok(())
    }

    async fn delete_all_tasks(&self) -> Result<()> {
        self.local.delete_all_tasks().await
    }

    async fn delete_task(&self, task_id: &str) -> Result<()> {
        self.local.delete_task(task_id).await.map(|_| ())
    }
}
