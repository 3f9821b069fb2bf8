//! In-memory list and task stores.
//!
//! These are the authoritative caches behind the file backend and can be
//! used on their own when nothing needs to survive the process.

use std::collections::HashMap;

use async_trait::async_trait;
use entities::{List, Task};
use tokio::sync::RwLock;

use crate::{ListStore, TaskStore, TaskStoreError, TaskStoreResult};

/// In-memory list store.
#[derive(Debug, Default)]
pub struct MemoryListStore {
    lists: RwLock<HashMap<String, List>>,
}

impl MemoryListStore {
    /// Creates an empty in-memory list store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ListStore for MemoryListStore {
    async fn create_list(&self, list: List) -> TaskStoreResult<List> {
        let mut lists = self.lists.write().await;
        lists.insert(list.id.clone(), list.clone());
        Ok(list)
    }

    async fn update_list(&self, list: List) -> TaskStoreResult<List> {
        let mut lists = self.lists.write().await;
        match lists.get_mut(&list.id) {
            Some(stored) => *stored = list.clone(),
            None => tracing::debug!(list_id = %list.id, "Ignoring update of missing list"),
        }
        Ok(list)
    }

    async fn get_list(&self, id: &str) -> TaskStoreResult<List> {
        let lists = self.lists.read().await;
        lists
            .get(id)
            .cloned()
            .ok_or_else(|| TaskStoreError::not_found("List", id))
    }

    async fn get_lists(&self) -> TaskStoreResult<Vec<List>> {
        let lists = self.lists.read().await;
        Ok(lists.values().cloned().collect())
    }

    async fn delete_list(&self, id: &str) -> TaskStoreResult<()> {
        let mut lists = self.lists.write().await;
        lists.remove(id);
        Ok(())
    }

    async fn delete_lists(&self) -> TaskStoreResult<()> {
        let mut lists = self.lists.write().await;
        lists.clear();
        Ok(())
    }
}

/// In-memory task store.
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    tasks: RwLock<HashMap<String, Task>>,
}

impl MemoryTaskStore {
    /// Creates an empty in-memory task store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn create_task(&self, task: Task) -> TaskStoreResult<Task> {
        let mut tasks = self.tasks.write().await;
        tasks.insert(task.id.clone(), task.clone());
        Ok(task)
    }

    async fn update_task(&self, task: Task) -> TaskStoreResult<Task> {
        let mut tasks = self.tasks.write().await;
        match tasks.get_mut(&task.id) {
            Some(stored) => *stored = task.clone(),
            None => tracing::debug!(task_id = %task.id, "Ignoring update of missing task"),
        }
        Ok(task)
    }

    async fn get_task(&self, id: &str) -> TaskStoreResult<Task> {
        let tasks = self.tasks.read().await;
        tasks
            .get(id)
            .cloned()
            .ok_or_else(|| TaskStoreError::not_found("Task", id))
    }

    async fn get_all_tasks(&self) -> TaskStoreResult<Vec<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.values().cloned().collect())
    }

    async fn get_tasks(&self, list_id: &str) -> TaskStoreResult<Vec<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks
            .values()
            .filter(|t| t.list_id == list_id)
            .cloned()
            .collect())
    }

    async fn delete_task(&self, id: &str) -> TaskStoreResult<()> {
        let mut tasks = self.tasks.write().await;
        tasks.remove(id);
        Ok(())
    }

    async fn delete_tasks(&self, list_id: &str) -> TaskStoreResult<()> {
        let mut tasks = self.tasks.write().await;
        tasks.retain(|_, t| t.list_id != list_id);
        Ok(())
    }
}
