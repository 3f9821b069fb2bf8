//! List entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named collection of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct List {
    /// Unique identifier, assigned by the storage service on creation.
    pub id: String,
    /// Display name.
    pub name: String,
    /// When this list was created.
    pub created_at: DateTime<Utc>,
}

impl List {
    /// Creates an unsaved list with the given name.
    ///
    /// The identity and creation timestamp are left blank; they are filled
    /// in when the list is stored.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}
