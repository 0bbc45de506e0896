//! Error types for the vectorization pipeline.

use thiserror::Error;

use crate::store::StoreError;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can occur in the vectorization pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Content extraction error.
    #[error("extraction error: {0}")]
    Extract(#[from] recall_extract::ExtractError),

    /// Task lifecycle error.
    #[error("task error: {0}")]
    Task(#[from] recall_tasks::TaskError),

    /// Storage boundary error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}
