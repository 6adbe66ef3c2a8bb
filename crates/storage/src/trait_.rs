//! Task store trait definition
//!
//! Abstract interface both backends satisfy, so the view layer stays
//! backend-agnostic

use async_trait::async_trait;
use std::sync::Arc;
use taskdeck_core::{Task, TaskId};

use crate::error::Result;

/// CRUD operations over the task collection
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Short backend name for logs and status lines
    fn name(&self) -> &'static str;

    /// List at most `limit` tasks; `None` means the backend default.
    async fn list_tasks(&self, limit: Option<usize>) -> Result<Vec<Task>>;

    /// Create a task with a backend-assigned id and `completed = false`.
    async fn create_task(&self, title: &str) -> Result<Task>;

    /// Flip completion away from `completed`, the currently displayed flag.
    /// The stored record ends up with `completed = !completed`.
    async fn update_task(&self, id: TaskId, completed: bool) -> Result<Task>;

    /// Replace the title of an existing task.
    async fn rename_task(&self, id: TaskId, title: &str) -> Result<Task>;

    /// Remove a task. Removing an unknown id is not an error.
    async fn delete_task(&self, id: TaskId) -> Result<()>;
}

/// Shared task store reference
pub type SharedTaskStore = Arc<dyn TaskStore>;
