//! # Task Lifecycle
//!
//! This crate models a unit of pipeline work (vectorization, summary,
//! auto-update, export, import) through a closed state machine:
//!
//! ```text
//! pending ──► queued ──► running ──► completed
//!    │           │           ├─────► failed
//!    ▼           ▼           └─────► cancelled
//! skipped    cancelled
//! ```
//!
//! Any other transition is illegal and rejected, never silently coerced.
//! Queued tasks are selected by priority (urgent first) with FIFO ties;
//! priority orders selection, it does not preempt running work. Task
//! records are mutated under a per-task lock so concurrent workers cannot
//! both claim the same task.

pub mod error;
pub mod queue;
pub mod registry;
pub mod task;

pub use error::{Result, TaskError};
pub use queue::TaskQueue;
pub use registry::TaskRegistry;
pub use task::{Task, TaskPriority, TaskStatus, TaskType};
