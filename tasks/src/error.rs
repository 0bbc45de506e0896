//! Error types for the task lifecycle.

use thiserror::Error;
use uuid::Uuid;

use crate::task::TaskStatus;

/// Result type alias for task operations.
pub type Result<T> = std::result::Result<T, TaskError>;

/// Errors that can occur in the task lifecycle.
#[derive(Error, Debug)]
pub enum TaskError {
    /// A status transition outside the legal set was attempted.
    #[error("illegal task transition: {from} -> {to}")]
    IllegalTransition { from: TaskStatus, to: TaskStatus },

    /// Unknown task type value.
    #[error("invalid task type: '{0}'")]
    InvalidType(String),

    /// Unknown task status value.
    #[error("invalid task status: '{0}'")]
    InvalidStatus(String),

    /// Unknown task priority value.
    #[error("invalid task priority: '{0}'")]
    InvalidPriority(String),

    /// No task registered under the given id.
    #[error("task not found: {0}")]
    NotFound(Uuid),

    /// Archival was attempted on a task that is still live.
    #[error("task {0} has not reached a terminal status")]
    NotTerminal(Uuid),
}
