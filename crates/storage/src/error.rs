//! Store error taxonomy

use taskdeck_core::{TaskId, TitleError};
use thiserror::Error;

/// Coarse category of a store failure, as the view layer reports it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Listing failed
    Fetch,
    /// Create, update, rename or delete failed
    Write,
    /// Update target missing (local backend only)
    NotFound,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to fetch tasks: {0}")]
    Fetch(String),

    #[error("failed to write task: {0}")]
    Write(String),

    #[error("task {0} not found")]
    NotFound(TaskId),

    #[error("invalid title: {0}")]
    InvalidTitle(#[from] TitleError),

    #[error("HTTP {status} from {operation}")]
    Status {
        operation: Operation,
        status: u16,
    },

    #[error("network error during {operation}: {source}")]
    Network {
        operation: Operation,
        source: reqwest::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    #[error("unexpected response to {operation}: {message}")]
    Response {
        operation: Operation,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Store operation a failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Create,
    Update,
    Rename,
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Operation::List => "list",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Rename => "rename",
            Operation::Delete => "delete",
        };
        f.write_str(name)
    }
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Fetch(_) => ErrorKind::Fetch,
            StoreError::NotFound(_) => ErrorKind::NotFound,
            StoreError::Status { operation, .. }
            | StoreError::Network { operation, .. }
            | StoreError::Response { operation, .. } => {
                if *operation == Operation::List {
                    ErrorKind::Fetch
                } else {
                    ErrorKind::Write
                }
            }
            StoreError::Write(_)
            | StoreError::InvalidTitle(_)
            | StoreError::Client(_)
            | StoreError::Io(_)
            | StoreError::Serialize(_) => ErrorKind::Write,
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
