//! Task domain model
//!
//! A task is a piece of markdown content with a completion flag and an
//! optional dependency on a single other task. The dependency is the only
//! structural relation in the model: each task has at most one parent, so
//! the collection forms a forest.

use serde::{Deserialize, Serialize};

use super::id::TaskId;

/// A single task in the list
///
/// The wire format is fixed:
/// `{"id": 1700000000123, "content": "Buy milk", "isCompleted": false, "dependsOn": null}`.
/// The order of tasks in the persisted list equals the manual display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,

    /// Markdown source content; empty while a freshly added task is being
    /// composed
    pub content: String,

    /// Completion flag, independent of the hierarchy
    pub is_completed: bool,

    /// The task this one is nested under, if any
    #[serde(default)]
    pub depends_on: Option<TaskId>,
}

impl Task {
    /// Creates a new top-level, incomplete task with empty content
    pub fn new(id: TaskId) -> Self {
        Self {
            id,
            content: String::new(),
            is_completed: false,
            depends_on: None,
        }
    }

    /// Creates a task with content, for callers that skip the compose step
    pub fn with_content(id: TaskId, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::new(id)
        }
    }

    /// Returns true if the content is empty or whitespace-only
    ///
    /// Such a task is an abandoned draft and is discarded when editing ends.
    pub fn is_draft(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Returns true if this task is nested under another task
    pub fn has_parent(&self) -> bool {
        self.depends_on.is_some()
    }
}
