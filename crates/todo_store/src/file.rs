//! File-persisted list and task stores.
//!
//! Each store keeps its entities in a memory store and owns one JSON file
//! holding an array of them. Reads are served from memory. Every mutation
//! truncates the file, applies the change in memory and writes the whole
//! collection back.
//!
//! There is no locking around the file itself: concurrent mutations from
//! several tasks can interleave their rewrites. Only a single writer per
//! file is supported.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use entities::{List, Task};
use serde::{de::DeserializeOwned, Serialize};
use tokio::{
    fs::{self, File, OpenOptions},
    io::AsyncWriteExt,
};

use crate::{ListStore, MemoryListStore, MemoryTaskStore, TaskStore, TaskStoreResult};

/// JSON file holding a full snapshot of one entity collection.
#[derive(Debug)]
struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    /// Reads every entity from the file, creating it empty if it is missing.
    async fn load<T: DeserializeOwned>(path: &Path) -> TaskStoreResult<(Self, Vec<T>)> {
        let contents = if fs::try_exists(path).await? {
            fs::read_to_string(path).await?
        } else {
            File::create(path).await?;
            String::new()
        };

        let items = if contents.trim().is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(&contents)?
        };

        let snapshot = Self {
            path: path.to_path_buf(),
        };
        Ok((snapshot, items))
    }

    /// Opens the file for a rewrite, discarding its current contents.
    async fn truncate(&self) -> TaskStoreResult<File> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .await?;
        Ok(file)
    }

    /// Writes the full collection into a file returned by [`Self::truncate`].
    async fn write<T: Serialize>(&self, mut file: File, items: &[T]) -> TaskStoreResult<()> {
        let mut bytes = serde_json::to_vec(items)?;
        bytes.push(b'\n');
        file.write_all(&bytes).await?;
        file.flush().await?;

        tracing::debug!(path = %self.path.display(), count = items.len(), "Rewrote snapshot file");
        Ok(())
    }
}

/// List store persisted to a JSON file.
#[derive(Debug)]
pub struct FileListStore {
    file: SnapshotFile,
    cache: MemoryListStore,
}

impl FileListStore {
    /// Opens the store at `path`, loading any lists already saved there.
    pub async fn open(path: impl AsRef<Path>) -> TaskStoreResult<Self> {
        let (file, lists) = SnapshotFile::load::<List>(path.as_ref()).await?;

        let cache = MemoryListStore::new();
        let count = lists.len();
        for list in lists {
            cache.create_list(list).await?;
        }

        tracing::info!(path = %file.path.display(), count, "Loaded list file");
        Ok(Self { file, cache })
    }

    async fn persist(&self, file: File) -> TaskStoreResult<()> {
        let lists = self.cache.get_lists().await?;
        self.file.write(file, &lists).await
    }
}

#[async_trait]
impl ListStore for FileListStore {
    async fn create_list(&self, list: List) -> TaskStoreResult<List> {
        let file = self.file.truncate().await?;
        let list = self.cache.create_list(list).await?;
        self.persist(file).await?;
        Ok(list)
    }

    async fn update_list(&self, list: List) -> TaskStoreResult<List> {
        let file = self.file.truncate().await?;
        let list = self.cache.update_list(list).await?;
        self.persist(file).await?;
        Ok(list)
    }

    async fn get_list(&self, id: &str) -> TaskStoreResult<List> {
        self.cache.get_list(id).await
    }

    async fn get_lists(&self) -> TaskStoreResult<Vec<List>> {
        self.cache.get_lists().await
    }

    async fn delete_list(&self, id: &str) -> TaskStoreResult<()> {
        let file = self.file.truncate().await?;
        self.cache.delete_list(id).await?;
        self.persist(file).await
    }

    async fn delete_lists(&self) -> TaskStoreResult<()> {
        let file = self.file.truncate().await?;
        self.cache.delete_lists().await?;
        self.persist(file).await
    }
}

/// Task store persisted to a JSON file.
#[derive(Debug)]
pub struct FileTaskStore {
    file: SnapshotFile,
    cache: MemoryTaskStore,
}

impl FileTaskStore {
    /// Opens the store at `path`, loading any tasks already saved there.
    pub async fn open(path: impl AsRef<Path>) -> TaskStoreResult<Self> {
        let (file, tasks) = SnapshotFile::load::<Task>(path.as_ref()).await?;

        let cache = MemoryTaskStore::new();
        let count = tasks.len();
        for task in tasks {
            cache.create_task(task).await?;
        }

        tracing::info!(path = %file.path.display(), count, "Loaded task file");
        Ok(Self { file, cache })
    }

    async fn persist(&self, file: File) -> TaskStoreResult<()> {
        let tasks = self.cache.get_all_tasks().await?;
        self.file.write(file, &tasks).await
    }
}

#[async_trait]
impl TaskStore for FileTaskStore {
    async fn create_task(&self, task: Task) -> TaskStoreResult<Task> {
        let file = self.file.truncate().await?;
        let task = self.cache.create_task(task).await?;
        self.persist(file).await?;
        Ok(task)
    }

    async fn update_task(&self, task: Task) -> TaskStoreResult<Task> {
        let file = self.file.truncate().await?;
        let task = self.cache.update_task(task).await?;
        self.persist(file).await?;
        Ok(task)
    }

    async fn get_task(&self, id: &str) -> TaskStoreResult<Task> {
        self.cache.get_task(id).await
    }

    async fn get_all_tasks(&self) -> TaskStoreResult<Vec<Task>> {
        self.cache.get_all_tasks().await
    }

    async fn get_tasks(&self, list_id: &str) -> TaskStoreResult<Vec<Task>> {
        self.cache.get_tasks(list_id).await
    }

    async fn delete_task(&self, id: &str) -> TaskStoreResult<()> {
        let file = self.file.truncate().await?;
        self.cache.delete_task(id).await?;
        self.persist(file).await
    }

    async fn delete_tasks(&self, list_id: &str) -> TaskStoreResult<()> {
        let file = self.file.truncate().await?;
        self.cache.delete_tasks(list_id).await?;
        self.persist(file).await
    }
}
