//! Error types for content extraction.

use thiserror::Error;

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Errors that can occur during content extraction.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// A tag rule failed validation at construction time.
    #[error("invalid tag rule '{pattern}': {reason}")]
    InvalidTagRule { pattern: String, reason: String },

    /// An attachment could not be read.
    #[error("attachment read failed for '{path}': {message}")]
    Attachment { path: String, message: String },

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
