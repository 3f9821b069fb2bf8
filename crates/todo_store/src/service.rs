//! Storage service combining a task store and a list store.

use std::sync::Arc;

use chrono::Utc;
use entities::{List, Task};
use uuid::Uuid;

use crate::{
    connect_sqlite, FileListStore, FileTaskStore, ListStore, MemoryListStore, MemoryTaskStore,
    SqlListStore, SqlTaskStore, StorageConfig, TaskStore, TaskStoreResult,
};

/// Single entry point for list and task operations.
///
/// Assigns identities and creation timestamps, orders results by creation
/// time and deletes a list's tasks together with the list. Backends are held
/// behind their traits only.
#[derive(Clone)]
pub struct Storage {
    tasks: Arc<dyn TaskStore>,
    lists: Arc<dyn ListStore>,
}

impl Storage {
    /// Creates a storage service over the given backends.
    pub fn new(tasks: Arc<dyn TaskStore>, lists: Arc<dyn ListStore>) -> Self {
        Self { tasks, lists }
    }

    /// Creates a storage service that keeps everything in memory.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryTaskStore::new()),
            Arc::new(MemoryListStore::new()),
        )
    }

    /// Opens the backends selected by `config`.
    pub async fn open(config: &StorageConfig) -> TaskStoreResult<Self> {
        let storage = match config {
            StorageConfig::Memory => Self::in_memory(),
            StorageConfig::File {
                tasks_path,
                lists_path,
            } => {
                let tasks = FileTaskStore::open(tasks_path).await?;
                let lists = FileListStore::open(lists_path).await?;
                Self::new(Arc::new(tasks), Arc::new(lists))
            }
            StorageConfig::Sql { url } => {
                let pool = connect_sqlite(url).await?;
                let lists = SqlListStore::new(pool.clone()).await?;
                let tasks = SqlTaskStore::new(pool).await?;
                Self::new(Arc::new(tasks), Arc::new(lists))
            }
        };

        tracing::info!(backend = backend_name(config), "Opened storage");
        Ok(storage)
    }

    // ========== Task Operations ==========

    /// Stores a new task, assigning it a fresh ID and creation time.
    pub async fn store_task(&self, mut task: Task) -> TaskStoreResult<Task> {
        task.id = Uuid::new_v4().to_string();
        task.created_at = Utc::now();

        tracing::debug!(task_id = %task.id, list_id = %task.list_id, "Storing task");
        self.tasks.create_task(task).await
    }

    /// Gets a task by ID.
    pub async fn get_task(&self, id: &str) -> TaskStoreResult<Task> {
        self.tasks.get_task(id).await
    }

    /// Gets a list's tasks, oldest first.
    pub async fn get_tasks(&self, list_id: &str) -> TaskStoreResult<Vec<Task>> {
        let mut tasks = self.tasks.get_tasks(list_id).await?;
        tasks.sort_by_key(|t| t.created_at);
        Ok(tasks)
    }

    /// Saves changes to an existing task.
    pub async fn update_task(&self, task: Task) -> TaskStoreResult<Task> {
        self.tasks.update_task(task).await
    }

    /// Flips a task's completion state and saves it.
    pub async fn toggle_task(&self, id: &str) -> TaskStoreResult<Task> {
        let mut task = self.tasks.get_task(id).await?;
        task.toggle();
        self.tasks.update_task(task).await
    }

    /// Deletes a task.
    pub async fn delete_task(&self, id: &str) -> TaskStoreResult<()> {
        self.tasks.delete_task(id).await
    }

    /// Deletes every task on a list, keeping the list.
    pub async fn delete_tasks(&self, list_id: &str) -> TaskStoreResult<()> {
        self.tasks.delete_tasks(list_id).await
    }

    // ========== List Operations ==========

    /// Stores a new list, assigning it a fresh ID and creation time.
    pub async fn store_list(&self, mut list: List) -> TaskStoreResult<List> {
        list.id = Uuid::new_v4().to_string();
        list.created_at = Utc::now();

        tracing::debug!(list_id = %list.id, "Storing list");
        self.lists.create_list(list).await
    }

    /// Gets a list by ID.
    pub async fn get_list(&self, id: &str) -> TaskStoreResult<List> {
        self.lists.get_list(id).await
    }

    /// Gets all lists, oldest first.
    pub async fn get_lists(&self) -> TaskStoreResult<Vec<List>> {
        let mut lists = self.lists.get_lists().await?;
        lists.sort_by_key(|l| l.created_at);
        Ok(lists)
    }

    /// Saves changes to an existing list.
    pub async fn update_list(&self, list: List) -> TaskStoreResult<List> {
        self.lists.update_list(list).await
    }

    /// Deletes a list and its tasks.
    ///
    /// Tasks go first. If that fails the list is left alone; if deleting the
    /// list fails afterwards the tasks stay deleted.
    pub async fn delete_list(&self, id: &str) -> TaskStoreResult<()> {
        self.tasks.delete_tasks(id).await?;
        self.lists.delete_list(id).await?;

        tracing::debug!(list_id = %id, "Deleted list with its tasks");
        Ok(())
    }

    /// Deletes the tasks of every list.
    ///
    /// The lists themselves are kept. Stops at the first list whose tasks
    /// cannot be deleted, so earlier lists may already be emptied.
    pub async fn delete_lists(&self) -> TaskStoreResult<()> {
        let lists = self.get_lists().await?;
        for list in &lists {
            self.delete_tasks(&list.id).await?;
        }

        tracing::debug!(count = lists.len(), "Deleted tasks of all lists");
        Ok(())
    }
}

fn backend_name(config: &StorageConfig) -> &'static str {
    match config {
        StorageConfig::Memory => "memory",
        StorageConfig::File { .. } => "file",
        StorageConfig::Sql { .. } => "sql",
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::Duration;

    use super::*;
    use crate::TaskStoreError;

    /// Task store whose `delete_tasks` fails for one list.
    struct FailingDeleteTasks {
        inner: MemoryTaskStore,
        failing_list_id: String,
    }

    #[async_trait]
    impl TaskStore for FailingDeleteTasks {
        async fn create_task(&self, task: Task) -> TaskStoreResult<Task> {
            self.inner.create_task(task).await
        }

        async fn update_task(&self, task: Task) -> TaskStoreResult<Task> {
            self.inner.update_task(task).await
        }

        async fn get_task(&self, id: &str) -> TaskStoreResult<Task> {
            self.inner.get_task(id).await
        }

        async fn get_all_tasks(&self) -> TaskStoreResult<Vec<Task>> {
            self.inner.get_all_tasks().await
        }

        async fn get_tasks(&self, list_id: &str) -> TaskStoreResult<Vec<Task>> {
            self.inner.get_tasks(list_id).await
        }

        async fn delete_task(&self, id: &str) -> TaskStoreResult<()> {
            self.inner.delete_task(id).await
        }

        async fn delete_tasks(&self, list_id: &str) -> TaskStoreResult<()> {
            if list_id == self.failing_list_id {
                return Err(TaskStoreError::Io(std::io::Error::other("disk full")));
            }
            self.inner.delete_tasks(list_id).await
        }
    }

    /// List store whose `delete_list` always fails.
    struct FailingDeleteList {
        inner: MemoryListStore,
    }

    #[async_trait]
    impl ListStore for FailingDeleteList {
        async fn create_list(&self, list: List) -> TaskStoreResult<List> {
            self.inner.create_list(list).await
        }

        async fn update_list(&self, list: List) -> TaskStoreResult<List> {
            self.inner.update_list(list).await
        }

        async fn get_list(&self, id: &str) -> TaskStoreResult<List> {
            self.inner.get_list(id).await
        }

        async fn get_lists(&self) -> TaskStoreResult<Vec<List>> {
            self.inner.get_lists().await
        }

        async fn delete_list(&self, _id: &str) -> TaskStoreResult<()> {
            Err(TaskStoreError::Io(std::io::Error::other("read-only")))
        }

        async fn delete_lists(&self) -> TaskStoreResult<()> {
            self.inner.delete_lists().await
        }
    }

    #[tokio::test]
    async fn test_store_assigns_identity_and_timestamp() {
        let storage = Storage::in_memory();
        let before = Utc::now();

        let draft = List {
            id: "caller-chosen".to_string(),
            ..List::new("Groceries")
        };
        let list = storage.store_list(draft).await.unwrap();

        assert_ne!(list.id, "caller-chosen");
        assert!(Uuid::parse_str(&list.id).is_ok());
        assert!(list.created_at >= before);
        assert_eq!(storage.get_list(&list.id).await.unwrap(), list);
    }

    #[tokio::test]
    async fn test_results_sorted_by_creation_time() {
        let tasks = Arc::new(MemoryTaskStore::new());
        let lists = Arc::new(MemoryListStore::new());
        let storage = Storage::new(tasks.clone(), lists.clone());

        let now = Utc::now();
        for (i, offset) in [5, -3, 0, 12, -8].into_iter().enumerate() {
            let created_at = now + Duration::seconds(offset);
            tasks
                .create_task(Task {
                    id: format!("t{i}"),
                    list_id: "l1".to_string(),
                    text: format!("task {i}"),
                    completed: false,
                    created_at,
                })
                .await
                .unwrap();
            lists
                .create_list(List {
                    id: format!("l{i}"),
                    name: format!("list {i}"),
                    created_at,
                })
                .await
                .unwrap();
        }

        let fetched = storage.get_tasks("l1").await.unwrap();
        assert_eq!(fetched.len(), 5);
        assert!(fetched.windows(2).all(|w| w[0].created_at <= w[1].created_at));
        assert_eq!(fetched[0].id, "t4");

        let fetched = storage.get_lists().await.unwrap();
        assert!(fetched.windows(2).all(|w| w[0].created_at <= w[1].created_at));
        assert_eq!(fetched[4].id, "l3");
    }

    #[tokio::test]
    async fn test_toggle_task() {
        let storage = Storage::in_memory();
        let list = storage.store_list(List::new("Chores")).await.unwrap();
        let task = storage
            .store_task(Task::new(&list.id, "Dishes"))
            .await
            .unwrap();

        let toggled = storage.toggle_task(&task.id).await.unwrap();
        assert!(toggled.completed);
        assert!(storage.get_task(&task.id).await.unwrap().completed);

        let err = storage.toggle_task("missing").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_list_cascades() {
        let storage = Storage::in_memory();
        let keep = storage.store_list(List::new("Keep")).await.unwrap();
        let drop = storage.store_list(List::new("Drop")).await.unwrap();
        storage.store_task(Task::new(&keep.id, "a")).await.unwrap();
        storage.store_task(Task::new(&drop.id, "b")).await.unwrap();
        storage.store_task(Task::new(&drop.id, "c")).await.unwrap();

        storage.delete_list(&drop.id).await.unwrap();

        let lists = storage.get_lists().await.unwrap();
        assert_eq!(lists, vec![keep.clone()]);
        assert!(storage.get_tasks(&drop.id).await.unwrap().is_empty());
        assert_eq!(storage.get_tasks(&keep.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_list_keeps_list_when_tasks_fail() {
        let lists = Arc::new(MemoryListStore::new());
        let list = lists
            .create_list(List {
                id: "sticky".to_string(),
                ..List::new("Sticky")
            })
            .await
            .unwrap();

        let tasks = Arc::new(FailingDeleteTasks {
            inner: MemoryTaskStore::new(),
            failing_list_id: "sticky".to_string(),
        });
        let storage = Storage::new(tasks, lists);

        let err = storage.delete_list("sticky").await.unwrap_err();
        assert!(matches!(err, TaskStoreError::Io(_)));
        assert_eq!(storage.get_list("sticky").await.unwrap(), list);
    }

    #[tokio::test]
    async fn test_delete_list_failure_leaves_tasks_deleted() {
        let storage = Storage::new(
            Arc::new(MemoryTaskStore::new()),
            Arc::new(FailingDeleteList {
                inner: MemoryListStore::new(),
            }),
        );
        let list = storage.store_list(List::new("Stuck")).await.unwrap();
        storage.store_task(Task::new(&list.id, "a")).await.unwrap();
        storage.store_task(Task::new(&list.id, "b")).await.unwrap();

        let err = storage.delete_list(&list.id).await.unwrap_err();
        assert!(matches!(err, TaskStoreError::Io(_)));
        assert!(storage.get_tasks(&list.id).await.unwrap().is_empty());
        assert_eq!(storage.get_list(&list.id).await.unwrap(), list);
    }

    #[tokio::test]
    async fn test_delete_lists_removes_tasks_but_keeps_lists() {
        let storage = Storage::in_memory();
        let a = storage.store_list(List::new("A")).await.unwrap();
        let b = storage.store_list(List::new("B")).await.unwrap();
        storage.store_task(Task::new(&a.id, "a1")).await.unwrap();
        storage.store_task(Task::new(&b.id, "b1")).await.unwrap();

        storage.delete_lists().await.unwrap();

        assert_eq!(storage.get_lists().await.unwrap().len(), 2);
        assert!(storage.get_tasks(&a.id).await.unwrap().is_empty());
        assert!(storage.get_tasks(&b.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_lists_stops_at_first_failure() {
        let lists = Arc::new(MemoryListStore::new());
        let now = Utc::now();
        for (id, offset) in [("first", 0), ("second", 1), ("third", 2)] {
            lists
                .create_list(List {
                    id: id.to_string(),
                    name: id.to_string(),
                    created_at: now + Duration::seconds(offset),
                })
                .await
                .unwrap();
        }

        let tasks = Arc::new(FailingDeleteTasks {
            inner: MemoryTaskStore::new(),
            failing_list_id: "second".to_string(),
        });
        for list_id in ["first", "second", "third"] {
            tasks
                .create_task(Task {
                    id: format!("{list_id}-task"),
                    created_at: now,
                    ..Task::new(list_id, "work")
                })
                .await
                .unwrap();
        }

        let storage = Storage::new(tasks, lists);
        assert!(storage.delete_lists().await.is_err());

        assert!(storage.get_tasks("first").await.unwrap().is_empty());
        assert_eq!(storage.get_tasks("second").await.unwrap().len(), 1);
        assert_eq!(storage.get_tasks("third").await.unwrap().len(), 1);
        assert_eq!(storage.get_lists().await.unwrap().len(), 3);
    }
}
