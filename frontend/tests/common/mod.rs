#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use todo_backend::observe::{ChangeNotifier, Observer, Snapshot};
use todo_backend::{repository_for, Result, SqliteTaskDao, StorageError, TaskError, TasksRepository};
use todo_frontend::{EventReceiver, UiEvent};
use todo_shared::Task;
use tokio::sync::watch;
use tokio::time::timeout;

pub async fn repository() -> Arc<dyn TasksRepository> {
    repository_for(Arc::new(SqliteTaskDao::in_memory().await.unwrap()))
}

pub async fn wait_for<T: Clone>(rx: &mut watch::Receiver<T>, f: impl FnMut(&T) -> bool) -> T {
    timeout(Duration::from_secs(2), rx.wait_for(f))
        .await
        .expect("timed out waiting for state")
        .expect("state channel closed")
        .clone()
}

pub async fn next_event(rx: &mut EventReceiver) -> UiEvent {
    timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for event")
        .expect("event channel closed")
}

fn broken() -> TaskError {
    TaskError::Storage(StorageError::InvalidRow("disk on fire".to_string()))
}

struct BrokenList;

#[async_trait]
impl Snapshot for BrokenList {
    type Output = Result<Vec<Task>>;

    async fn fetch(&self) -> Self::Output {
        Err(broken())
    }
}

struct BrokenTask;

#[async_trait]
impl Snapshot for BrokenTask {
    type Output = Result<Task>;

    async fn fetch(&self) -> Self::Output {
        Err(broken())
    }
}

/// Repository whose storage always fails.
#[derive(Default)]
pub struct FailingRepository {
    notifier: ChangeNotifier,
}

#[async_trait]
impl TasksRepository for FailingRepository {
    fn observe_tasks(&self) -> Observer<Result<Vec<Task>>> {
        self.notifier.observe(BrokenList)
    }

    fn observe_task(&self, _task_id: &str) -> Observer<Result<Task>> {
        self.notifier.observe(BrokenTask)
    }

    async fn get_tasks(&self, _force_update: bool) -> Result<Vec<Task>> {
        Err(broken())
    }

    async fn get_task(&self, _task_id: &str, _force_update: bool) -> Result<Task> {
        Err(broken())
    }

    async fn save_task(&self, _task: &Task) -> Result<()> {
        Err(broken())
    }

    async fn complete_task(&self, _task: &Task) -> Result<()> {
        Err(broken())
    }

    async fn complete_task_by_id(&self, _task_id: &str) -> Result<()> {
        Err(broken())
    }

    async fn activate_task(&self, _task: &Task) -> Result<()> {
        Err(broken())
    }

    async fn activate_task_by_id(&self, _task_id: &str) -> Result<()> {
        Err(broken())
    }

    async fn clear_completed_tasks(&self) -> Result<()> {
        Err(broken())
    }

    async fn delete_all_tasks(&self) -> Result<()> {
        Err(broken())
    }

    async fn delete_task(&self, _task_id: &str) -> Result<()> {
        Err(broken())
    }
}
