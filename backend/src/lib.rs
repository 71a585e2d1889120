//! Local task storage: SQLite table, change notification, data source and
//! repository facade.

/// Store configuration
pub mod config;
/// Storage contract and its SQLite implementation
pub mod dao;
/// Error types
pub mod error;
/// Change notification and live snapshots
pub mod observe;
/// Repository facade
pub mod repository;
/// Data sources
pub mod source;

pub use config::StoreConfig;
pub use dao::{SqliteTaskDao, TaskDao};
pub use error::{ConfigError, StorageError, TaskError};
pub use observe::{ChangeNotifier, Observer};
pub use repository::{DefaultTasksRepository, TasksRepository};
pub use source::{LocalTaskDataSource, TaskDataSource};

use std::sync::Arc;

/// Result type for repository and data source operations
pub type Result<T> = std::result::Result<T, TaskError>;

/// Builds the repository over a storage handle.
pub fn repository_for(dao: Arc<dyn TaskDao>) -> Arc<dyn TasksRepository> {
    let local = Arc::new(LocalTaskDataSource::new(dao));
    Arc::new(DefaultTasksRepository::new(local))
}

/// Opens the configured database and builds the repository on top of it.
pub async fn open_repository(
    config: &StoreConfig,
) -> std::result::Result<Arc<dyn TasksRepository>, StorageError> {
    let dao = SqliteTaskDao::connect(config).await?;
    Ok(repository_for(Arc::new(dao)))
}
