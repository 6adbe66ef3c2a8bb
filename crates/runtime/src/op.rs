//! Store calls issued by the controller
//!
//! A `PendingOp` is produced by a controller `begin_*` step, executed against a
//! store (possibly on another task), and the resulting `Completion` is handed
//! back to the controller to reconcile.

use taskdeck_core::{Task, TaskId, TaskTitle};
use taskdeck_storage::{StoreError, TaskStore};

/// A store call waiting to be executed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingOp {
    Load {
        limit: Option<usize>,
    },
    Create {
        provisional: TaskId,
        title: TaskTitle,
    },
    Toggle {
        id: TaskId,
        completed: bool,
    },
    Rename {
        id: TaskId,
        title: TaskTitle,
    },
    Delete {
        id: TaskId,
    },
}

/// Result of an executed `PendingOp`
#[derive(Debug)]
pub enum Completion {
    Loaded(Result<Vec<Task>, StoreError>),
    Created {
        provisional: TaskId,
        result: Result<Task, StoreError>,
    },
    Toggled {
        id: TaskId,
        result: Result<Task, StoreError>,
    },
    Renamed {
        id: TaskId,
        title: TaskTitle,
        result: Result<Task, StoreError>,
    },
    Deleted {
        id: TaskId,
        result: Result<(), StoreError>,
    },
}

impl PendingOp {
    /// Run the store call. Always yields a completion; failures are carried
    /// inside it rather than returned.
    pub async fn execute(self, store: &dyn TaskStore) -> Completion {
        match self {
            PendingOp::Load { limit } => Completion::Loaded(store.list_tasks(limit).await),
            PendingOp::Create { provisional, title } => Completion::Created {
                provisional,
                result: store.create_task(title.as_str()).await,
            },
            PendingOp::Toggle { id, completed } => Completion::Toggled {
                id,
                result: store.update_task(id, completed).await,
            },
            PendingOp::Rename { id, title } => {
                let result = store.rename_task(id, title.as_str()).await;
                Completion::Renamed { id, title, result }
            }
            PendingOp::Delete { id } => Completion::Deleted {
                id,
                result: store.delete_task(id).await,
            },
        }
    }
}
