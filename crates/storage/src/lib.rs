// Taskdeck Storage Layer
//
// Task store interface with interchangeable backends

pub mod error;
pub mod trait_;
pub mod kv;
pub mod memory;
pub mod file;
pub mod local;
pub mod remote;

pub use error::{ErrorKind, Operation, Result, StoreError};
pub use file::FileKeyValueStore;
pub use kv::{KeyValueStore, SharedKeyValueStore};
pub use local::LocalTaskStore;
pub use memory::{MemoryKeyValueStore, create_memory_kv};
pub use remote::RemoteTaskStore;
pub use trait_::*;

use std::sync::Arc;
use std::time::Duration;
use taskdeck_core::{BackendKind, TaskdeckConfig};

/// Build the store selected by `config.backend`.
///
/// With `ephemeral`, the local backend keeps its collection in memory only.
pub fn create_task_store(config: &TaskdeckConfig, ephemeral: bool) -> Result<SharedTaskStore> {
    let store: SharedTaskStore = match config.backend {
        BackendKind::Remote => Arc::new(RemoteTaskStore::new(&config.remote)?),
        BackendKind::Local if ephemeral => Arc::new(
            LocalTaskStore::new(create_memory_kv(), config.local.storage_key.clone())
                .with_latency(Duration::from_millis(config.local.simulated_latency_ms)),
        ),
        BackendKind::Local => Arc::new(LocalTaskStore::from_config(&config.local)),
    };
    tracing::debug!(backend = store.name(), "task store ready");
    Ok(store)
}
