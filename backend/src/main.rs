//! Opens the task store, ensures the schema and reports what it holds.

use todo_backend::{open_repository, StoreConfig};
use todo_shared::TaskStats;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = StoreConfig::from_env()?;
    info!(
        database_url = %config.database_url,
        max_connections = config.max_connections,
        "Starting task store"
    );

    let repository = open_repository(&config).await?;
    let tasks = repository.get_tasks(true).await?;
    let stats = TaskStats::from_tasks(&tasks);

    info!(
        total = stats.total,
        active = stats.active,
        completed = stats.completed,
        completed_percent = stats.completed_percent(),
        "Task store ready"
    );

    Ok(())
}
