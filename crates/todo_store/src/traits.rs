//! List and task store trait definitions.

use async_trait::async_trait;
use entities::{List, Task};

use crate::TaskStoreResult;

/// Storage operations for lists.
///
/// Implementations own the physical representation only. Identity and
/// timestamp assignment, ordering and cascades live in [`crate::Storage`].
#[async_trait]
pub trait ListStore: Send + Sync {
    /// Stores a list under its ID, replacing any list with the same ID.
    async fn create_list(&self, list: List) -> TaskStoreResult<List>;

    /// Replaces a stored list. Updating a missing list is a no-op.
    async fn update_list(&self, list: List) -> TaskStoreResult<List>;

    /// Gets a list by ID.
    async fn get_list(&self, id: &str) -> TaskStoreResult<List>;

    /// Gets all lists in no particular order.
    async fn get_lists(&self) -> TaskStoreResult<Vec<List>>;

    /// Deletes a list. Deleting a missing list is not an error.
    async fn delete_list(&self, id: &str) -> TaskStoreResult<()>;

    /// Deletes every list.
    async fn delete_lists(&self) -> TaskStoreResult<()>;
}

/// Storage operations for tasks.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Stores a task under its ID, replacing any task with the same ID.
    async fn create_task(&self, task: Task) -> TaskStoreResult<Task>;

    /// Replaces a stored task. Updating a missing task is a no-op.
    async fn update_task(&self, task: Task) -> TaskStoreResult<Task>;

    /// Gets a task by ID.
    async fn get_task(&self, id: &str) -> TaskStoreResult<Task>;

    /// Gets every task in no particular order.
    async fn get_all_tasks(&self) -> TaskStoreResult<Vec<Task>>;

    /// Gets the tasks owned by a list in no particular order.
    async fn get_tasks(&self, list_id: &str) -> TaskStoreResult<Vec<Task>>;

    /// Deletes a task. Deleting a missing task is not an error.
    async fn delete_task(&self, id: &str) -> TaskStoreResult<()>;

    /// Deletes every task owned by a list.
    async fn delete_tasks(&self, list_id: &str) -> TaskStoreResult<()>;
}
