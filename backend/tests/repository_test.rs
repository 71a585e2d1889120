use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use todo_backend::observe::{ChangeNotifier, Observer, Snapshot};
use todo_backend::{repository_for, SqliteTaskDao, StorageError, TaskDao, TaskError, TasksRepository};
use todo_shared::{filter_tasks, Task, TaskFilter};
use tokio::time::timeout;

async fn repository() -> Arc<dyn TasksRepository> {
    repository_for(Arc::new(SqliteTaskDao::in_memory().await.unwrap()))
}

#[tokio::test]
async fn test_get_task_success_and_not_found() {
    let repo = repository().await;
    let task = Task::with_id("Buy milk", "2%", false, "1");
    repo.save_task(&task).await.unwrap();

    assert_eq!(repo.get_task("1", false).await.unwrap(), task);

    let err = repo.get_task("missing", true).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_force_update_does_not_change_local_reads() {
    let repo = repository().await;
    repo.save_task(&Task::new("a", "")).await.unwrap();

    assert_eq!(
        repo.get_tasks(true).await.unwrap(),
        repo.get_tasks(false).await.unwrap()
    );
}

#[tokio::test]
async fn test_complete_and_activate_by_value() {
    let repo = repository().await;
    let task = Task::with_id("Buy milk", "2%", false, "1");
    repo.save_task(&task).await.unwrap();

    repo.complete_task(&task).await.unwrap();
    assert!(repo.get_task("1", false).await.unwrap().completed);

    repo.activate_task(&task).await.unwrap();
    assert!(!repo.get_task("1", false).await.unwrap().completed);
}

#[tokio::test]
async fn test_complete_and_activate_by_id() {
    let repo = repository().await;
    repo.save_task(&Task::with_id("Buy milk", "2%", false, "1"))
        .await
        .unwrap();

    repo.complete_task_by_id("1").await.unwrap();
    let task = repo.get_task("1", false).await.unwrap();
    assert!(task.completed);
    assert_eq!(task.title, "Buy milk");

    repo.activate_task_by_id("1").await.unwrap();
    assert!(!repo.get_task("1", false).await.unwrap().completed);
}

#[tokio::test]
async fn test_by_id_overloads_report_unknown_ids() {
    let repo = repository().await;

    let err = repo.complete_task_by_id("ghost").await.unwrap_err();
    assert!(err.is_not_found());
    let err = repo.activate_task_by_id("ghost").await.unwrap_err();
    assert!(err.is_not_found());

    assert!(repo.get_tasks(false).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_clear_completed_delete_and_delete_all() {
    let repo = repository().await;
    repo.save_task(&Task::with_id("a", "", true, "1")).await.unwrap();
    repo.save_task(&Task::with_id("b", "", false, "2")).await.unwrap();
    repo.save_task(&Task::with_id("c", "", false, "3")).await.unwrap();

    repo.clear_completed_tasks().await.unwrap();
    let ids: Vec<_> = repo
        .get_tasks(false)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(ids, vec!["2", "3"]);

    repo.delete_task("2").await.unwrap();
    repo.delete_task("2").await.unwrap();
    assert_eq!(repo.get_tasks(false).await.unwrap().len(), 1);

    repo.delete_all_tasks().await.unwrap();
    assert!(repo.get_tasks(false).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_filter_over_repository_snapshot() {
    let repo = repository().await;
    repo.save_task(&Task::with_id("a", "", true, "1")).await.unwrap();
    repo.save_task(&Task::with_id("b", "", false, "2")).await.unwrap();
    repo.save_task(&Task::with_id("c", "", true, "3")).await.unwrap();

    let all = repo.get_tasks(false).await.unwrap();
    let active = filter_tasks(&all, TaskFilter::Active);
    assert_eq!(active, vec![all[1].clone()]);
}

#[tokio::test]
async fn test_every_observer_sees_the_write() {
    let repo = repository().await;
    let mut first = repo.observe_tasks();
    let mut second = repo.observe_tasks();
    assert!(first.next().await.unwrap().unwrap().is_empty());
    assert!(second.next().await.unwrap().unwrap().is_empty());

    let task = Task::new("Buy milk", "2%");
    repo.save_task(&task).await.unwrap();

    for observer in [&mut first, &mut second] {
        let seen = timeout(Duration::from_secs(1), observer.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(seen, vec![task.clone()]);
    }
}

#[tokio::test]
async fn test_observe_task_reports_not_found_while_absent() {
    let repo = repository().await;
    let mut observer = repo.observe_task("1");
    assert!(observer.next().await.unwrap().unwrap_err().is_not_found());

    let task = Task::with_id("Buy milk", "2%", false, "1");
    repo.save_task(&task).await.unwrap();
    assert_eq!(observer.next().await.unwrap().unwrap(), task);
}

struct Broken;

#[async_trait]
impl Snapshot for Broken {
    type Output = Result<Vec<Task>, StorageError>;

    async fn fetch(&self) -> Self::Output {
        Err(broken())
    }
}

struct BrokenOne;

#[async_trait]
impl Snapshot for BrokenOne {
    type Output = Result<Option<Task>, StorageError>;

    async fn fetch(&self) -> Self::Output {
        Err(broken())
    }
}

fn broken() -> StorageError {
    StorageError::InvalidRow("disk on fire".to_string())
}

/// Storage whose every call fails.
struct FailingDao {
    notifier: ChangeNotifier,
}

#[async_trait]
impl TaskDao for FailingDao {
    fn observe_all(&self) -> Observer<Result<Vec<Task>, StorageError>> {
        self.notifier.observe(Broken)
    }

    fn observe_by_id(&self, _id: &str) -> Observer<Result<Option<Task>, StorageError>> {
        self.notifier.observe(BrokenOne)
    }

    async fn get_all(&self) -> Result<Vec<Task>, StorageError> {
        Err(broken())
    }

    async fn get_by_id(&self, _id: &str) -> Result<Option<Task>, StorageError> {
        Err(broken())
    }

    async fn upsert(&self, _task: &Task) -> Result<(), StorageError> {
        Err(broken())
    }

    async fn set_completed(&self, _id: &str, _completed: bool) -> Result<u64, StorageError> {
        Err(broken())
    }

    async fn delete_by_id(&self, _id: &str) -> Result<u64, StorageError> {
        Err(broken())
    }

    async fn delete_all(&self) -> Result<u64, StorageError> {
        Err(broken())
    }

    async fn delete_completed(&self) -> Result<u64, StorageError> {
        Err(broken())
    }
}

#[tokio::test]
async fn test_storage_failures_surface_as_storage_errors() {
    let repo = repository_for(Arc::new(FailingDao {
        notifier: ChangeNotifier::new(),
    }));

    assert!(matches!(
        repo.get_tasks(false).await,
        Err(TaskError::Storage(_))
    ));
    assert!(matches!(
        repo.get_task("1", false).await,
        Err(TaskError::Storage(_))
    ));
    assert!(matches!(
        repo.complete_task_by_id("1").await,
        Err(TaskError::Storage(_))
    ));
    assert!(repo.save_task(&Task::new("a", "")).await.is_err());
    assert!(repo.clear_completed_tasks().await.is_err());

    let mut observer = repo.observe_tasks();
    assert!(matches!(
        observer.next().await,
        Some(Err(TaskError::Storage(_)))
    ));
    let mut observer = repo.observe_task("1");
    assert!(matches!(
        observer.next().await,
        Some(Err(TaskError::Storage(_)))
    ));
}
