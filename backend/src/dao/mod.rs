/// SQLite implementation
pub mod sqlite;

use async_trait::async_trait;
use todo_shared::Task;

use crate::error::StorageError;
use crate::observe::Observer;

pub use sqlite::SqliteTaskDao;

/// Durable store of task rows.
///
/// `get_by_id` reports a missing row as `Ok(None)`; `Err` always means the
/// storage engine failed.
#[async_trait]
pub trait TaskDao: Send + Sync {
    /// Live view of every row, re-emitted after each committed write.
    fn observe_all(&self) -> Observer<Result<Vec<Task>, StorageError>>;

    /// Live view of one row; `None` while it does not exist.
    fn observe_by_id(&self, id: &str) -> Observer<Result<Option<Task>, StorageError>>;

    async fn get_all(&self) -> Result<Vec<Task>, StorageError>;

    async fn get_by_id(&self, id: &str) -> Result<Option<Task>, StorageError>;

    /// Inserts the task, or replaces every column of the row with the same id.
    async fn upsert(&self, task: &Task) -> Result<(), StorageError>;

    /// Updates only the completion flag. An unknown id affects no rows.
    async fn set_completed(&self, id: &str, completed: bool) -> Result<u64, StorageError>;

    async fn delete_by_id(&self, id: &str) -> Result<u64, StorageError>;

    async fn delete_all(&self) -> Result<u64, StorageError>;

    /// Removes every completed row and returns how many went.
    async fn delete_completed(&self) -> Result<u64, StorageError>;
}
