//! SQLite-backed task table

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use std::str::FromStr;
use std::time::Duration;
use todo_shared::Task;
use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::dao::TaskDao;
use crate::error::StorageError;
use crate::observe::{ChangeNotifier, Observer, Snapshot};

const SELECT_ALL: &str = "SELECT entryid, title, description, completed FROM tasks ORDER BY rowid";
const SELECT_BY_ID: &str =
    "SELECT entryid, title, description, completed FROM tasks WHERE entryid = ?1";

#[derive(Debug, FromRow)]
struct TaskRow {
    entryid: String,
    title: String,
    description: String,
    completed: i64,
}

impl TaskRow {
    fn into_task(self) -> Result<Task, StorageError> {
        let completed = match self.completed {
            0 => false,
            1 => true,
            other => {
                return Err(StorageError::InvalidRow(format!(
                    "task {} has completed = {}",
                    self.entryid, other
                )))
            }
        };
        Ok(Task::with_id(self.title, self.description, completed, self.entryid))
    }
}

/// Task DAO over a sqlx connection pool.
///
/// Clones share the pool and the change notifier.
#[derive(Clone)]
pub struct SqliteTaskDao {
    pool: SqlitePool,
    notifier: ChangeNotifier,
}

impl SqliteTaskDao {
    /// Opens (creating if missing) the database named by `config` and ensures the table exists.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        info!(database_url = %config.database_url, "Opened task store");

        let dao = Self::from_pool(pool);
        dao.migrate().await?;
        Ok(dao)
    }

    /// Private in-memory database, mostly for tests.
    pub async fn in_memory() -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

        // every connection would get its own memory database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await?;

        let dao = Self::from_pool(pool);
        dao.migrate().await?;
        Ok(dao)
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self {
            pool,
            notifier: ChangeNotifier::new(),
        }
    }

    pub async fn migrate(&self) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tasks (
                entryid TEXT PRIMARY KEY NOT NULL,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                completed INTEGER NOT NULL DEFAULT 0
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    fn committed(&self, operation: &'static str, rows: u64) -> u64 {
        debug!(operation, rows, "Write committed");
        if rows > 0 {
            self.notifier.notify();
        }
        rows
    }
}

async fn fetch_all(pool: &SqlitePool) -> Result<Vec<Task>, StorageError> {
    let rows: Vec<TaskRow> = sqlx::query_as(SELECT_ALL).fetch_all(pool).await?;
    rows.into_iter().map(TaskRow::into_task).collect()
}

async fn fetch_by_id(pool: &SqlitePool, id: &str) -> Result<Option<Task>, StorageError> {
    let row: Option<TaskRow> = sqlx::query_as(SELECT_BY_ID)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.map(TaskRow::into_task).transpose()
}

struct AllTasks {
    pool: SqlitePool,
}

#[async_trait]
impl Snapshot for AllTasks {
    type Output = Result<Vec<Task>, StorageError>;

    async fn fetch(&self) -> Self::Output {
        fetch_all(&self.pool).await
    }
}

struct TaskById {
    pool: SqlitePool,
    id: String,
}

#[async_trait]
impl Snapshot for TaskById {
    type Output = Result<Option<Task>, StorageError>;

    async fn fetch(&self) -> Self::Output {
        fetch_by_id(&self.pool, &self.id).await
    }
}

#[async_trait]
impl TaskDao for SqliteTaskDao {
    fn observe_all(&self) -> Observer<Result<Vec<Task>, StorageError>> {
        self.notifier.observe(AllTasks {
            pool: self.pool.clone(),
        })
    }

    fn observe_by_id(&self, id: &str) -> Observer<Result<Option<Task>, StorageError>> {
        self.notifier.observe(TaskById {
            pool: self.pool.clone(),
            id: id.to_string(),
        })
    }

    async fn get_all(&self) -> Result<Vec<Task>, StorageError> {
        fetch_all(&self.pool).await
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Task>, StorageError> {
        fetch_by_id(&self.pool, id).await
    }

    async fn upsert(&self, task: &Task) -> Result<(), StorageError> {
        let result = sqlx::query(
            "INSERT OR REPLACE INTO tasks (entryid, title, description, completed) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.completed)
        .execute(&self.pool)
        .await?;

        self.committed("upsert", result.rows_affected());
        Ok(())
    }

    async fn set_completed(&self, id: &str, completed: bool) -> Result<u64, StorageError> {
        let result = sqlx::query("UPDATE tasks SET completed = ?1 WHERE entryid = ?2")
            .bind(completed)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(self.committed("set_completed", result.rows_affected()))
    }

    async fn delete_by_id(&self, id: &str) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM tasks WHERE entryid = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(self.committed("delete_by_id", result.rows_affected()))
    }

    async fn delete_all(&self) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM tasks").execute(&self.pool).await?;

        Ok(self.committed("delete_all", result.rows_affected()))
    }

    async fn delete_completed(&self) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM tasks WHERE completed = 1")
            .execute(&self.pool)
            .await?;

        Ok(self.committed("delete_completed", result.rows_affected()))
    }
}
