use thiserror::Error;

/// Failures raised by the storage engine.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid row: {0}")]
    InvalidRow(String),
}

/// Error side of every repository result.
#[derive(Error, Debug)]
pub enum TaskError {
    /// Expected outcome of a point lookup, not a fault.
    #[error("Task not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl TaskError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, TaskError::NotFound(_))
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },

    #[error("Missing configuration: {0}")]
    Missing(&'static str),
}
