//! Store configuration

use serde::{Deserialize, Serialize};
use std::env;
use tracing::info;

use crate::error::ConfigError;

pub const DATABASE_URL_VAR: &str = "TODO_DATABASE_URL";
pub const MAX_CONNECTIONS_VAR: &str = "TODO_MAX_CONNECTIONS";

/// Where and how the task table is opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite connection URL, e.g. `sqlite://tasks.db`
    pub database_url: String,

    /// Upper bound on pooled connections
    pub max_connections: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://tasks.db".to_string(),
            max_connections: 5,
        }
    }
}

impl StoreConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }

    /// Reads `TODO_DATABASE_URL` and `TODO_MAX_CONNECTIONS`, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup(DATABASE_URL_VAR) {
            info!(database_url = %url, "Using database from environment");
            config.database_url = url;
        }

        if let Some(raw) = lookup(MAX_CONNECTIONS_VAR) {
            config.max_connections = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                key: MAX_CONNECTIONS_VAR,
                value: raw.clone(),
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::Missing(DATABASE_URL_VAR));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: MAX_CONNECTIONS_VAR,
                value: self.max_connections.to_string(),
            });
        }
        Ok(())
    }
}
