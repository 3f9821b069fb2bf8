//! Storage backend selection.

use std::{env, path::PathBuf};

use crate::{TaskStoreError, TaskStoreResult};

/// Default task file for the file backend.
pub const DEFAULT_TASK_PATH: &str = "tasks.json";

/// Default list file for the file backend.
pub const DEFAULT_LIST_PATH: &str = "lists.json";

/// Which backend to use and where it keeps its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    /// Nothing is persisted.
    Memory,
    /// One JSON file per entity type.
    File {
        tasks_path: PathBuf,
        lists_path: PathBuf,
    },
    /// SQLite database.
    Sql { url: String },
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::File {
            tasks_path: PathBuf::from(DEFAULT_TASK_PATH),
            lists_path: PathBuf::from(DEFAULT_LIST_PATH),
        }
    }
}

impl StorageConfig {
    /// Loads configuration from environment variables.
    ///
    /// - `TODO_STORAGE_TYPE`: `file` (default), `sql` or `memory`
    /// - `TODO_TASK_PATH`, `TODO_LIST_PATH`: files for the file backend
    /// - `TODO_SQL_PATH`: database path or `sqlite:` URL, required for `sql`
    pub fn from_env() -> TaskStoreResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> TaskStoreResult<Self> {
        let storage_type = lookup("TODO_STORAGE_TYPE").unwrap_or_else(|| "file".to_string());

        match storage_type.trim().to_lowercase().as_str() {
            "" | "file" => Ok(Self::File {
                tasks_path: lookup("TODO_TASK_PATH")
                    .filter(|p| !p.is_empty())
                    .unwrap_or_else(|| DEFAULT_TASK_PATH.to_string())
                    .into(),
                lists_path: lookup("TODO_LIST_PATH")
                    .filter(|p| !p.is_empty())
                    .unwrap_or_else(|| DEFAULT_LIST_PATH.to_string())
                    .into(),
            }),
            "sql" => {
                let path = lookup("TODO_SQL_PATH")
                    .filter(|p| !p.is_empty())
                    .ok_or_else(|| {
                        TaskStoreError::InvalidConfig(
                            "TODO_SQL_PATH is required when TODO_STORAGE_TYPE is sql".to_string(),
                        )
                    })?;
                Ok(Self::Sql {
                    url: sqlite_url(&path),
                })
            }
            "memory" => Ok(Self::Memory),
            other => Err(TaskStoreError::InvalidConfig(format!(
                "unknown TODO_STORAGE_TYPE: {other}"
            ))),
        }
    }
}

/// Turns a bare database path into a SQLite URL that creates the file.
fn sqlite_url(path: &str) -> String {
    if path.starts_with("sqlite:") {
        path.to_string()
    } else {
        format!("sqlite:{path}?mode=rwc")
    }
}
