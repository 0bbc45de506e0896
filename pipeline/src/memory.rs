//! In-memory [`VectorStore`] implementation.
//!
//! Backs the integration tests and small deployments that do not need a
//! remote vector database. Queries score by lowercase token overlap, which
//! is crude but deterministic.

use std::collections::HashMap;

use async_trait::async_trait;
use recall_extract::VectorItem;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::store::{InsertOptions, QueryResult, StoreError, StoreResult, VectorStore};

/// A process-local vector store keyed by collection id.
#[derive(Debug, Default)]
pub struct MemoryVectorStore {
    collections: RwLock<HashMap<String, Vec<VectorItem>>>,
}

impl MemoryVectorStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items currently held in a collection.
    pub async fn item_count(&self, collection_id: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection_id)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

fn overlap_score(query: &str, text: &str) -> f32 {
    let query_tokens: Vec<String> = query
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();
    if query_tokens.is_empty() {
        return 0.0;
    }
    let text_lower = text.to_lowercase();
    let hits = query_tokens
        .iter()
        .filter(|token| text_lower.contains(token.as_str()))
        .count();
    hits as f32 / query_tokens.len() as f32
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn get_saved_hashes(&self, collection_id: &str) -> StoreResult<Vec<u64>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection_id)
            .map(|items| items.iter().map(|item| item.hash).collect())
            .unwrap_or_default())
    }

    async fn insert_vector_items(
        &self,
        collection_id: &str,
        items: &[VectorItem],
        cancel: &CancellationToken,
        options: &InsertOptions,
    ) -> StoreResult<()> {
        if cancel.is_cancelled() {
            return Err(StoreError::Cancelled {
                collection: collection_id.to_string(),
            });
        }

        let mut collections = self.collections.write().await;
        let entry = collections.entry(collection_id.to_string()).or_default();

        let mut inserted = 0usize;
        for item in items {
            let duplicate = !options.skip_deduplication
                && entry.iter().any(|existing| existing.hash == item.hash);
            if duplicate {
                continue;
            }
            entry.push(item.clone());
            inserted += 1;
        }

        debug!(collection_id, inserted, total = entry.len(), "stored items");
        Ok(())
    }

    async fn query_collection(
        &self,
        collection_id: &str,
        search_text: &str,
        top_k: usize,
        threshold: f32,
    ) -> StoreResult<QueryResult> {
        let collections = self.collections.read().await;
        let Some(items) = collections.get(collection_id) else {
            return Ok(QueryResult::default());
        };

        let mut scored: Vec<(f32, &VectorItem)> = items
            .iter()
            .map(|item| (overlap_score(search_text, &item.text), item))
            .filter(|(score, _)| *score >= threshold)
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);

        let mut result = QueryResult::default();
        for (_, item) in scored {
            result.hashes.push(item.hash);
            let metadata =
                serde_json::to_value(&item.metadata).map_err(|err| StoreError::Query {
                    collection: collection_id.to_string(),
                    message: err.to_string(),
                })?;
            result.metadata.push(metadata);
        }
        Ok(result)
    }

    async fn purge_vector_index(&self, collection_id: &str) -> StoreResult<bool> {
        let removed = self
            .collections
            .write()
            .await
            .remove(collection_id)
            .is_some();
        debug!(collection_id, removed, "purged collection");
        Ok(removed)
    }
}
