//! Storage boundary contract.
//!
//! The pipeline persists chunk-derived items through this trait and never
//! sees the remote vector store's wire protocol. Cancellation is a
//! first-class outcome, distinguishable from a genuine failure.

use async_trait::async_trait;
use recall_extract::VectorItem;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Result type alias for storage operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by the storage boundary.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading a collection's saved hashes failed.
    #[error("hash read for collection '{collection}' failed: {message}")]
    Read { collection: String, message: String },

    /// Persisting items failed. Carries enough context for the caller to
    /// retry the whole batch.
    #[error("insert into collection '{collection}' failed ({items} items): {message}")]
    Insert {
        collection: String,
        items: usize,
        message: String,
    },

    /// A similarity query failed.
    #[error("query against collection '{collection}' failed: {message}")]
    Query { collection: String, message: String },

    /// Purging a collection failed.
    #[error("purge of collection '{collection}' failed: {message}")]
    Purge { collection: String, message: String },

    /// The operation observed a cancellation signal. Not a failure.
    #[error("operation on collection '{collection}' was cancelled")]
    Cancelled { collection: String },
}

impl StoreError {
    /// Whether this error is an observed cancellation rather than a
    /// genuine failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// Options for an insert operation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct InsertOptions {
    /// Ask the store to persist items without its own hash-based
    /// deduplication pass.
    pub skip_deduplication: bool,
}

/// Result of a similarity query: parallel lists of item hashes and their
/// metadata payloads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryResult {
    pub hashes: Vec<u64>,
    pub metadata: Vec<serde_json::Value>,
}

/// Derived statistics for a collection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CollectionStats {
    /// Whether the collection holds any items.
    pub exists: bool,

    /// Number of saved content hashes.
    pub hash_count: usize,
}

/// Contract implemented by the external vector store.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Existing content hashes in a collection, for dedup decisions.
    async fn get_saved_hashes(&self, collection_id: &str) -> StoreResult<Vec<u64>>;

    /// Persist chunk-derived items. An observed abort surfaces as
    /// [`StoreError::Cancelled`], distinguishable from a failure.
    async fn insert_vector_items(
        &self,
        collection_id: &str,
        items: &[VectorItem],
        cancel: &CancellationToken,
        options: &InsertOptions,
    ) -> StoreResult<()>;

    /// Similarity search over a collection.
    async fn query_collection(
        &self,
        collection_id: &str,
        search_text: &str,
        top_k: usize,
        threshold: f32,
    ) -> StoreResult<QueryResult>;

    /// Delete a collection's vectors. Returns whether anything was
    /// deleted. On success any local cache keyed by the collection must
    /// be invalidated by the caller.
    async fn purge_vector_index(&self, collection_id: &str) -> StoreResult<bool>;

    /// Whether a collection holds any items.
    async fn collection_exists(&self, collection_id: &str) -> StoreResult<bool> {
        Ok(!self.get_saved_hashes(collection_id).await?.is_empty())
    }

    /// Derived statistics built on [`VectorStore::get_saved_hashes`].
    async fn get_collection_stats(&self, collection_id: &str) -> StoreResult<CollectionStats> {
        let hashes = self.get_saved_hashes(collection_id).await?;
        Ok(CollectionStats {
            exists: !hashes.is_empty(),
            hash_count: hashes.len(),
        })
    }
}
