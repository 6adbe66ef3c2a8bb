//! Persisted key-value port used by the local task store

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;

/// String-keyed persisted entries
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

pub type SharedKeyValueStore = Arc<dyn KeyValueStore>;
