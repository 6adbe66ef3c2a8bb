//! Local task store
//!
//! Keeps the whole collection as one JSON array under a single key. Every
//! operation reads the entry; every mutation rewrites it. The read-modify-write
//! is not guarded against another process touching the same key.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use taskdeck_core::{LocalConfig, Task, TaskId, TaskTitle, next_task_id, sample_tasks};
use tracing::{debug, info};

use crate::error::{Result, StoreError};
use crate::file::FileKeyValueStore;
use crate::kv::SharedKeyValueStore;
use crate::trait_::TaskStore;

pub struct LocalTaskStore {
    kv: SharedKeyValueStore,
    key: String,
    latency: Duration,
    /// Serializes every read-modify-write of the entry, seeding included.
    guard: Mutex<()>,
    /// Highest id handed out by this instance; ids issued within the same
    /// millisecond must not collide with one that was already deleted.
    last_issued: AtomicU64,
}

impl std::fmt::Debug for LocalTaskStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalTaskStore")
            .field("key", &self.key)
            .field("latency", &self.latency)
            .finish_non_exhaustive()
    }
}

impl LocalTaskStore {
    pub fn new(kv: SharedKeyValueStore, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
            latency: Duration::ZERO,
            guard: Mutex::new(()),
            last_issued: AtomicU64::new(0),
        }
    }

    /// File-backed store rooted at the configured data directory
    pub fn from_config(config: &LocalConfig) -> Self {
        let kv = std::sync::Arc::new(FileKeyValueStore::new(&config.data_dir));
        Self::new(kv, config.storage_key.clone())
            .with_latency(Duration::from_millis(config.simulated_latency_ms))
    }

    /// Delay applied before every operation, to mimic a slow backend
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    /// Read the persisted collection, seeding the sample set if the entry is
    /// absent. An entry that exists, even an empty list, is never reseeded.
    /// Callers must hold `guard`.
    async fn load(&self) -> Result<Vec<Task>> {
        match self.kv.get(&self.key).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => {
                let seeded = sample_tasks();
                self.save(&seeded).await?;
                info!(key = %self.key, count = seeded.len(), "seeded local task store");
                Ok(seeded)
            }
        }
    }

    fn issue_id(&self, tasks: &[Task]) -> TaskId {
        let candidate = next_task_id(tasks, chrono::Utc::now().timestamp_millis()).get();
        let next = |previous: u64| candidate.max(previous + 1);
        let previous = self
            .last_issued
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |previous| {
                Some(next(previous))
            })
            .unwrap_or_else(|previous| previous);
        TaskId(next(previous))
    }

    async fn save(&self, tasks: &[Task]) -> Result<()> {
        let raw = serde_json::to_string(tasks)?;
        self.kv.set(&self.key, &raw).await
    }

    async fn modify(
        &self,
        id: TaskId,
        apply: impl FnOnce(&mut Task) + Send,
    ) -> Result<Task> {
        let _guard = self.guard.lock().await;
        let mut tasks = self.load().await?;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))?;
        apply(task);
        let updated = task.clone();
        self.save(&tasks).await?;
        Ok(updated)
    }
}

#[async_trait]
impl TaskStore for LocalTaskStore {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn list_tasks(&self, limit: Option<usize>) -> Result<Vec<Task>> {
        self.simulate_latency().await;
        let _guard = self.guard.lock().await;
        let mut tasks = self.load().await.map_err(|e| match e {
            StoreError::Fetch(_) => e,
            other => StoreError::Fetch(other.to_string()),
        })?;
        if let Some(limit) = limit {
            tasks.truncate(limit);
        }
        debug!(count = tasks.len(), "listed local tasks");
        Ok(tasks)
    }

    async fn create_task(&self, title: &str) -> Result<Task> {
        let title = TaskTitle::parse(title)?;
        self.simulate_latency().await;
        let _guard = self.guard.lock().await;
        let mut tasks = self.load().await?;
        let id = self.issue_id(&tasks);
        let task = Task::new(id, title);
        tasks.insert(0, task.clone());
        self.save(&tasks).await?;
        debug!(%id, "created local task");
        Ok(task)
    }

    async fn update_task(&self, id: TaskId, completed: bool) -> Result<Task> {
        self.simulate_latency().await;
        let updated = self.modify(id, |task| task.completed = !completed).await?;
        debug!(%id, completed = updated.completed, "updated local task");
        Ok(updated)
    }

    async fn rename_task(&self, id: TaskId, title: &str) -> Result<Task> {
        let title = TaskTitle::parse(title)?;
        self.simulate_latency().await;
        let updated = self
            .modify(id, move |task| task.title = title.into_inner())
            .await?;
        debug!(%id, "renamed local task");
        Ok(updated)
    }

    async fn delete_task(&self, id: TaskId) -> Result<()> {
        self.simulate_latency().await;
        let _guard = self.guard.lock().await;
        let mut tasks = self.load().await?;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() != before {
            self.save(&tasks).await?;
            debug!(%id, "deleted local task");
        } else {
            debug!(%id, "delete of unknown local task ignored");
        }
        Ok(())
    }
}
