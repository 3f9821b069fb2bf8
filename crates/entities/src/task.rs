//! Task entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single item on a list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier, assigned by the storage service on creation.
    pub id: String,
    /// Identity of the owning list.
    ///
    /// Not enforced by any backend; the storage service keeps it consistent
    /// by deleting a list's tasks together with the list.
    pub list_id: String,
    /// Task description.
    pub text: String,
    /// Whether the task is done.
    #[serde(default)]
    pub completed: bool,
    /// When this task was created.
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Creates an unsaved, incomplete task on the given list.
    pub fn new(list_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            list_id: list_id.into(),
            text: text.into(),
            ..Default::default()
        }
    }

    /// Flips the completion state.
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}
