//! SQLite-backed list and task stores.
//!
//! One table per entity type. Every operation is a single statement, so
//! nothing here is atomic across the two tables.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use entities::{List, Task};
use sqlx::{sqlite::SqlitePoolOptions, FromRow, SqlitePool};

use crate::{ListStore, TaskStore, TaskStoreError, TaskStoreResult};

const LISTS_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS lists (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    created_at DATETIME
)
"#;

const TASKS_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS tasks (
    id TEXT PRIMARY KEY,
    list_id TEXT NOT NULL,
    text TEXT NOT NULL,
    completed INTEGER DEFAULT 0,
    created_at DATETIME
)
"#;

/// Opens a connection pool for the given SQLite URL.
///
/// In-memory databases exist per connection, so those pools are pinned to a
/// single connection that is never recycled.
pub async fn connect_sqlite(url: &str) -> TaskStoreResult<SqlitePool> {
    let in_memory = url.contains(":memory:") || url.contains("mode=memory");

    let options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    let pool = options.connect(url).await?;
    tracing::info!(in_memory, "Connected to SQLite database");
    Ok(pool)
}

/// Database row for List
#[derive(Debug, FromRow)]
struct ListRow {
    id: String,
    name: String,
    created_at: DateTime<Utc>,
}

impl From<ListRow> for List {
    fn from(row: ListRow) -> Self {
        List {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
        }
    }
}

/// Database row for Task
#[derive(Debug, FromRow)]
struct TaskRow {
    id: String,
    list_id: String,
    text: String,
    completed: bool,
    created_at: DateTime<Utc>,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Task {
            id: row.id,
            list_id: row.list_id,
            text: row.text,
            completed: row.completed,
            created_at: row.created_at,
        }
    }
}

/// List store backed by the `lists` table.
#[derive(Debug, Clone)]
pub struct SqlListStore {
    pool: SqlitePool,
}

impl SqlListStore {
    /// Creates the store, creating the `lists` table if it does not exist.
    pub async fn new(pool: SqlitePool) -> TaskStoreResult<Self> {
        sqlx::query(LISTS_SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl ListStore for SqlListStore {
    async fn create_list(&self, list: List) -> TaskStoreResult<List> {
        sqlx::query("INSERT INTO lists (id, name, created_at) VALUES (?, ?, ?)")
            .bind(&list.id)
            .bind(&list.name)
            .bind(list.created_at)
            .execute(&self.pool)
            .await?;

        Ok(list)
    }

    async fn update_list(&self, list: List) -> TaskStoreResult<List> {
        let result = sqlx::query("UPDATE lists SET name = ? WHERE id = ?")
            .bind(&list.name)
            .bind(&list.id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            tracing::debug!(list_id = %list.id, "Ignoring update of missing list");
        }

        Ok(list)
    }

    async fn get_list(&self, id: &str) -> TaskStoreResult<List> {
        let row: Option<ListRow> =
            sqlx::query_as("SELECT id, name, created_at FROM lists WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(List::from)
            .ok_or_else(|| TaskStoreError::not_found("List", id))
    }

    async fn get_lists(&self) -> TaskStoreResult<Vec<List>> {
        let rows: Vec<ListRow> = sqlx::query_as("SELECT id, name, created_at FROM lists")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(List::from).collect())
    }

    async fn delete_list(&self, id: &str) -> TaskStoreResult<()> {
        sqlx::query("DELETE FROM lists WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_lists(&self) -> TaskStoreResult<()> {
        sqlx::query("DELETE FROM lists")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// Task store backed by the `tasks` table.
#[derive(Debug, Clone)]
pub struct SqlTaskStore {
    pool: SqlitePool,
}

impl SqlTaskStore {
    /// Creates the store, creating the `tasks` table if it does not exist.
    pub async fn new(pool: SqlitePool) -> TaskStoreResult<Self> {
        sqlx::query(TASKS_SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl TaskStore for SqlTaskStore {
    async fn create_task(&self, task: Task) -> TaskStoreResult<Task> {
        sqlx::query(
            "INSERT INTO tasks (id, list_id, text, completed, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&task.id)
        .bind(&task.list_id)
        .bind(&task.text)
        .bind(task.completed)
        .bind(task.created_at)
        .execute(&self.pool)
        .await?;

        Ok(task)
    }

    async fn update_task(&self, task: Task) -> TaskStoreResult<Task> {
        let result = sqlx::query("UPDATE tasks SET text = ?, completed = ? WHERE id = ?")
            .bind(&task.text)
            .bind(task.completed)
            .bind(&task.id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            tracing::debug!(task_id = %task.id, "Ignoring update of missing task");
        }

        Ok(task)
    }

    async fn get_task(&self, id: &str) -> TaskStoreResult<Task> {
        let row: Option<TaskRow> = sqlx::query_as(
            "SELECT id, list_id, text, completed, created_at
             FROM tasks
             WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Task::from)
            .ok_or_else(|| TaskStoreError::not_found("Task", id))
    }

    async fn get_all_tasks(&self) -> TaskStoreResult<Vec<Task>> {
        let rows: Vec<TaskRow> =
            sqlx::query_as("SELECT id, list_id, text, completed, created_at FROM tasks")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(Task::from).collect())
    }

    async fn get_tasks(&self, list_id: &str) -> TaskStoreResult<Vec<Task>> {
        let rows: Vec<TaskRow> = sqlx::query_as(
            "SELECT id, list_id, text, completed, created_at
             FROM tasks
             WHERE list_id = ?",
        )
        .bind(list_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Task::from).collect())
    }

    async fn delete_task(&self, id: &str) -> TaskStoreResult<()> {
        sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_tasks(&self, list_id: &str) -> TaskStoreResult<()> {
        sqlx::query("DELETE FROM tasks WHERE list_id = ?")
            .bind(list_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
