use std::path::PathBuf;
use thiserror::Error;

use super::model::TaskId;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Task title cannot be empty")]
    InvalidTitle,

    #[error("Priority must be between 1 and 10, got {0}")]
    InvalidPriority(i64),

    #[error("Malformed task record: {0}")]
    MalformedRecord(String),

    #[error("No task IDs left after {0}")]
    IdsExhausted(TaskId),

    #[error("Task {0} not found")]
    NotFound(TaskId),

    #[error("Failed to access task file {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode tasks: {0}")]
    Encode(#[from] serde_json::Error),
}

impl TaskError {
    /// True for the errors raised when creating or updating a task with bad input.
    pub fn is_validation(&self) -> bool {
        matches!(self, TaskError::InvalidTitle | TaskError::InvalidPriority(_))
    }
}

pub type Result<T> = std::result::Result<T, TaskError>;
