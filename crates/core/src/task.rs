//! Task record types
//!
//! Field names follow the JSON shape served by the remote todo API, so the
//! same types are used on the wire and in the local persisted collection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Unique identifier for a task, assigned by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl TaskId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(TaskId)
    }
}

impl From<u64> for TaskId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Owner of a task; only the remote backend cares about it
pub type UserId = u64;

/// A single task record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub completed: bool,
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
}

impl Task {
    /// A freshly created, not yet completed task
    pub fn new(id: TaskId, title: TaskTitle) -> Self {
        Self {
            id,
            title: title.into_inner(),
            completed: false,
            user_id: None,
        }
    }

    pub fn with_owner(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TitleError {
    #[error("task title cannot be empty")]
    Blank,
}

/// A title that is known to be non-empty after trimming
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskTitle(String);

impl TaskTitle {
    /// Trim surrounding whitespace and reject blank input.
    pub fn parse(raw: &str) -> Result<Self, TitleError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TitleError::Blank);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TaskTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TaskTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Next id for a collection held in `existing`.
///
/// Ids are derived from wall-clock milliseconds but always exceed every id
/// already present, so a deleted id is never handed out again.
pub fn next_task_id<'a>(existing: impl IntoIterator<Item = &'a Task>, now_millis: i64) -> TaskId {
    let floor = existing
        .into_iter()
        .map(|t| t.id.0)
        .max()
        .map_or(1, |max| max.saturating_add(1));
    let now = u64::try_from(now_millis).unwrap_or(0);
    TaskId(now.max(floor))
}
