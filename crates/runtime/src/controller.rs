//! Task list controller
//!
//! Owns the session's working copy of the task collection and reconciles it
//! with store results:
//! - create is optimistic and is not rolled back on failure
//! - toggle is pessimistic: the row flips only once the store confirms
//! - delete and edit go through a confirmation step first
//!
//! Every store failure ends up as user-facing text, either the list banner
//! (loading) or a blocking alert (writes).

use std::sync::Arc;

use taskdeck_core::{Task, TaskId, TaskTitle, next_task_id};
use taskdeck_storage::{SharedTaskStore, StoreError, TaskStore};
use tracing::{debug, warn};

use crate::op::{Completion, PendingOp};

pub const LOAD_FAILED: &str = "Failed to load todos. Please try again.";
pub const ADD_FAILED: &str = "Failed to add todo. Please try again.";
pub const UPDATE_FAILED: &str = "Failed to update todo. Please try again.";
pub const RENAME_FAILED: &str = "Failed to rename todo. Please try again.";
pub const DELETE_FAILED: &str = "Failed to delete todo. Please try again.";
pub const BLANK_TITLE: &str = "Task title cannot be empty.";

/// What a row is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowState {
    Viewing,
    Editing,
    PendingEditConfirm,
    PendingDeleteConfirm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditStage {
    /// Draft is being typed
    Editing,
    /// Draft submitted, waiting for the user to confirm
    PendingConfirm,
}

/// The single in-progress title edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub id: TaskId,
    pub draft: String,
    pub stage: EditStage,
}

pub struct TaskListController {
    store: SharedTaskStore,
    tasks: Vec<Task>,
    fetch_limit: Option<usize>,
    loading: bool,
    adding: bool,
    banner: Option<String>,
    alert: Option<String>,
    edit: Option<EditSession>,
    pending_delete: Option<TaskId>,
}

impl std::fmt::Debug for TaskListController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskListController")
            .field("store", &self.store.name())
            .field("tasks", &self.tasks.len())
            .field("loading", &self.loading)
            .field("adding", &self.adding)
            .finish_non_exhaustive()
    }
}

impl TaskListController {
    pub fn new(store: SharedTaskStore) -> Self {
        Self {
            store,
            tasks: Vec::new(),
            fetch_limit: None,
            loading: false,
            adding: false,
            banner: None,
            alert: None,
            edit: None,
            pending_delete: None,
        }
    }

    /// Limit passed to every listing; `None` leaves it to the backend.
    pub fn with_fetch_limit(mut self, limit: Option<usize>) -> Self {
        self.fetch_limit = limit;
        self
    }

    pub fn store(&self) -> SharedTaskStore {
        Arc::clone(&self.store)
    }

    // ============ Read access ============

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// True while a create is in flight; the add control is disabled.
    pub fn is_adding(&self) -> bool {
        self.adding
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn edit_session(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    pub fn pending_delete(&self) -> Option<TaskId> {
        self.pending_delete
    }

    pub fn active_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.completed).count()
    }

    pub fn done_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }

    pub fn row_state(&self, id: TaskId) -> RowState {
        if self.pending_delete == Some(id) {
            return RowState::PendingDeleteConfirm;
        }
        match &self.edit {
            Some(edit) if edit.id == id => match edit.stage {
                EditStage::Editing => RowState::Editing,
                EditStage::PendingConfirm => RowState::PendingEditConfirm,
            },
            _ => RowState::Viewing,
        }
    }

    // ============ Begin steps ============

    pub fn begin_load(&mut self) -> PendingOp {
        self.loading = true;
        self.banner = None;
        PendingOp::Load {
            limit: self.fetch_limit,
        }
    }

    /// Optimistically prepend the new task. Blank titles and a create while
    /// another one is in flight are ignored.
    pub fn begin_create(&mut self, raw_title: &str) -> Option<PendingOp> {
        if self.adding {
            debug!("create ignored: another create in flight");
            return None;
        }
        let title = TaskTitle::parse(raw_title).ok()?;
        let provisional = next_task_id(&self.tasks, chrono::Utc::now().timestamp_millis());
        self.tasks.insert(0, Task::new(provisional, title.clone()));
        self.adding = true;
        Some(PendingOp::Create { provisional, title })
    }

    pub fn begin_toggle(&mut self, id: TaskId) -> Option<PendingOp> {
        let task = self.task(id)?;
        Some(PendingOp::Toggle {
            id,
            completed: task.completed,
        })
    }

    /// Put `id` into the shared delete-confirmation slot, replacing whatever
    /// was waiting there.
    pub fn request_delete(&mut self, id: TaskId) -> bool {
        if self.task(id).is_none() {
            return false;
        }
        self.pending_delete = Some(id);
        true
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Consume the confirmation slot.
    pub fn begin_delete(&mut self) -> Option<PendingOp> {
        let id = self.pending_delete.take()?;
        Some(PendingOp::Delete { id })
    }

    /// Enter editing with the current title as draft. Any other edit in
    /// progress is discarded.
    pub fn start_edit(&mut self, id: TaskId) -> bool {
        let Some(draft) = self.task(id).map(|t| t.title.clone()) else {
            return false;
        };
        self.edit = Some(EditSession {
            id,
            draft,
            stage: EditStage::Editing,
        });
        true
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        if let Some(edit) = self.edit.as_mut()
            && edit.stage == EditStage::Editing
        {
            edit.draft = draft.into();
        }
    }

    /// Move the draft to confirmation. A blank draft raises an alert and
    /// stays in editing.
    pub fn submit_edit(&mut self) -> bool {
        let Some(edit) = self.edit.as_mut() else {
            return false;
        };
        if edit.stage != EditStage::Editing {
            return false;
        }
        if TaskTitle::parse(&edit.draft).is_err() {
            self.alert = Some(BLANK_TITLE.to_string());
            return false;
        }
        edit.stage = EditStage::PendingConfirm;
        true
    }

    /// Discard the draft at either stage.
    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    /// Consume a confirmed edit. The row goes back to viewing immediately and
    /// shows the new title only once the store accepts it.
    pub fn begin_rename(&mut self) -> Option<PendingOp> {
        let edit = self.edit.take_if(|e| e.stage == EditStage::PendingConfirm)?;
        let title = TaskTitle::parse(&edit.draft).ok()?;
        Some(PendingOp::Rename { id: edit.id, title })
    }

    // ============ Reconciliation ============

    pub fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::Loaded(result) => {
                self.loading = false;
                match result {
                    Ok(tasks) => {
                        debug!(count = tasks.len(), "tasks loaded");
                        self.tasks = tasks;
                    }
                    Err(e) => {
                        self.report_failure("load", &e);
                        self.tasks.clear();
                        self.banner = Some(LOAD_FAILED.to_string());
                    }
                }
            }
            Completion::Created {
                provisional,
                result,
            } => {
                self.adding = false;
                match result {
                    Ok(created) => self.adopt_created(provisional, created),
                    Err(e) => {
                        self.report_failure("create", &e);
                        self.alert = Some(ADD_FAILED.to_string());
                    }
                }
            }
            Completion::Toggled { id, result } => match result {
                Ok(updated) => {
                    if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
                        task.completed = updated.completed;
                        debug!(%id, completed = task.completed, "task toggled");
                    }
                }
                Err(e) => {
                    self.report_failure("toggle", &e);
                    self.alert = Some(UPDATE_FAILED.to_string());
                }
            },
            Completion::Renamed { id, title, result } => match result {
                Ok(_) => {
                    if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
                        task.title = title.into_inner();
                        debug!(%id, "task renamed");
                    }
                }
                Err(e) => {
                    self.report_failure("rename", &e);
                    self.alert = Some(RENAME_FAILED.to_string());
                }
            },
            Completion::Deleted { id, result } => match result {
                Ok(()) => {
                    self.tasks.retain(|t| t.id != id);
                    if self.edit.as_ref().is_some_and(|e| e.id == id) {
                        self.edit = None;
                    }
                    debug!(%id, "task deleted");
                }
                Err(e) => {
                    self.report_failure("delete", &e);
                    self.alert = Some(DELETE_FAILED.to_string());
                }
            },
        }
    }

    /// Swap the provisional id for the backend's, unless that id is already
    /// held by another row. The shown title is kept.
    fn adopt_created(&mut self, provisional: TaskId, created: Task) {
        let taken = self
            .tasks
            .iter()
            .any(|t| t.id == created.id && t.id != provisional);
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == provisional) else {
            return;
        };
        if taken {
            warn!(provisional = %provisional, id = %created.id, "backend id already held; keeping provisional id");
        } else {
            task.id = created.id;
        }
        task.user_id = created.user_id;
        if self.pending_delete == Some(provisional) && !taken {
            self.pending_delete = Some(created.id);
        }
        if let Some(edit) = self.edit.as_mut()
            && edit.id == provisional
            && !taken
        {
            edit.id = created.id;
        }
        debug!(id = %task.id, "task created");
    }

    fn report_failure(&self, action: &str, error: &StoreError) {
        warn!(action, backend = self.store.name(), kind = ?error.kind(), error = %error, "store operation failed");
    }

    // ============ Composed operations ============

    async fn run(&mut self, op: Option<PendingOp>) {
        if let Some(op) = op {
            let store = Arc::clone(&self.store);
            let completion = op.execute(store.as_ref()).await;
            self.apply(completion);
        }
    }

    pub async fn load(&mut self) {
        let op = self.begin_load();
        self.run(Some(op)).await;
    }

    pub async fn create(&mut self, title: &str) {
        let op = self.begin_create(title);
        self.run(op).await;
    }

    pub async fn toggle(&mut self, id: TaskId) {
        let op = self.begin_toggle(id);
        self.run(op).await;
    }

    pub async fn confirm_delete(&mut self) {
        let op = self.begin_delete();
        self.run(op).await;
    }

    pub async fn confirm_edit(&mut self) {
        let op = self.begin_rename();
        self.run(op).await;
    }
}
