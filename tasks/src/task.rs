//! Task model and lifecycle state machine.
//!
//! A task is created in `pending` and moves through a closed set of legal
//! transitions until it reaches a terminal status. Illegal transitions are
//! rejected, never silently coerced, and leave the task unchanged.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::{Result, TaskError};

/// Kind of pipeline work a task tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskType {
    /// Extract, chunk and persist vector items.
    Vectorization,
    /// Summarize a collection of content.
    Summary,
    /// Keep a collection in sync with its source.
    AutoUpdate,
    /// Export a collection.
    Export,
    /// Import a collection.
    Import,
}

impl FromStr for TaskType {
    type Err = TaskError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "vectorization" => Ok(Self::Vectorization),
            "summary" => Ok(Self::Summary),
            "auto-update" => Ok(Self::AutoUpdate),
            "export" => Ok(Self::Export),
            "import" => Ok(Self::Import),
            other => Err(TaskError::InvalidType(other.to_string())),
        }
    }
}

/// Status of a task within its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Created, not yet accepted into a work queue.
    Pending,
    /// Accepted into a work queue.
    Queued,
    /// A worker is processing the task.
    Running,
    /// Work finished successfully.
    Completed,
    /// Unrecoverable error during execution.
    Failed,
    /// Cancelled before or during execution.
    Cancelled,
    /// Determined unnecessary before ever queueing.
    Skipped,
}

impl TaskStatus {
    /// Whether this status ends the lifecycle.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Failed | Self::Cancelled | Self::Skipped
        )
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
            Self::Skipped => "skipped",
        };
        f.write_str(name)
    }
}

impl FromStr for TaskStatus {
    type Err = TaskError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "pending" => Ok(Self::Pending),
            "queued" => Ok(Self::Queued),
            "running" => Ok(Self::Running),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "cancelled" => Ok(Self::Cancelled),
            "skipped" => Ok(Self::Skipped),
            other => Err(TaskError::InvalidStatus(other.to_string())),
        }
    }
}

/// Selection order among queued tasks. Ordering, not preemption: a running
/// task is never displaced by a higher-priority arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low = 0,
    Normal = 1,
    High = 2,
    Urgent = 3,
}

impl FromStr for TaskPriority {
    type Err = TaskError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "low" => Ok(Self::Low),
            "normal" => Ok(Self::Normal),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            other => Err(TaskError::InvalidPriority(other.to_string())),
        }
    }
}

/// A trackable unit of pipeline work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: Uuid,

    /// Kind of work this task tracks.
    pub task_type: TaskType,

    /// Current lifecycle status.
    pub status: TaskStatus,

    /// Selection order among queued tasks.
    pub priority: TaskPriority,

    /// When the task was created.
    pub created_at: DateTime<Utc>,

    /// When the task reached a terminal status.
    pub finished_at: Option<DateTime<Utc>>,

    /// Failure message, set when the task fails.
    pub error: Option<String>,
}

impl Task {
    /// Create a new task in `pending`.
    pub fn new(task_type: TaskType, priority: TaskPriority) -> Self {
        Self {
            id: Uuid::new_v4(),
            task_type,
            status: TaskStatus::Pending,
            priority,
            created_at: Utc::now(),
            finished_at: None,
            error: None,
        }
    }

    /// Whether the task has reached a terminal status.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Attempt a status transition.
    ///
    /// Illegal transitions are rejected with
    /// [`TaskError::IllegalTransition`] and leave the status unchanged.
    pub fn transition(&mut self, to: TaskStatus) -> Result<()> {
        if !Self::is_legal(self.status, to) {
            return Err(TaskError::IllegalTransition {
                from: self.status,
                to,
            });
        }
        debug!(id = %self.id, from = %self.status, to = %to, "task transition");
        self.status = to;
        if to.is_terminal() {
            self.finished_at = Some(Utc::now());
        }
        Ok(())
    }

    /// Transition to `failed`, recording the failure message.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<()> {
        self.transition(TaskStatus::Failed)?;
        self.error = Some(message.into());
        Ok(())
    }

    fn is_legal(from: TaskStatus, to: TaskStatus) -> bool {
        use TaskStatus::*;
        matches!(
            (from, to),
            (Pending, Queued)
                | (Pending, Skipped)
                | (Queued, Running)
                | (Queued, Cancelled)
                | (Running, Completed)
                | (Running, Failed)
                | (Running, Cancelled)
        )
    }
}
