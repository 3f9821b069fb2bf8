//! CLI configuration.

use std::env;

use todo_store::StorageConfig;

/// Configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Selected storage backend.
    pub storage: StorageConfig,
    /// Log level.
    pub log_level: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            storage: StorageConfig::from_env()?,
            log_level: env::var("TODO_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string()),
        })
    }
}
