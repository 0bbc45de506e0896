//! Saved-hash cache keyed by collection id.
//!
//! Avoids refetching a collection's hashes from the storage boundary on
//! every deduplication pass. Entries are invalidated whenever the backing
//! collection is purged.

use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::debug;

/// In-memory cache of saved content hashes per collection.
#[derive(Debug, Default)]
pub struct HashCache {
    entries: RwLock<HashMap<String, Vec<u64>>>,
}

impl HashCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached hashes for a collection, if present.
    pub async fn get(&self, collection_id: &str) -> Option<Vec<u64>> {
        self.entries.read().await.get(collection_id).cloned()
    }

    /// Replace the cached hashes for a collection.
    pub async fn put(&self, collection_id: &str, hashes: Vec<u64>) {
        self.entries
            .write()
            .await
            .insert(collection_id.to_string(), hashes);
    }

    /// Append newly persisted hashes to an existing entry. A collection
    /// that was never cached stays uncached until the next full fetch.
    pub async fn extend(&self, collection_id: &str, hashes: &[u64]) {
        let mut entries = self.entries.write().await;
        if let Some(cached) = entries.get_mut(collection_id) {
            cached.extend_from_slice(hashes);
        }
    }

    /// Drop the cached entry for a collection.
    pub async fn invalidate(&self, collection_id: &str) {
        if self.entries.write().await.remove(collection_id).is_some() {
            debug!(collection_id, "invalidated hash cache entry");
        }
    }

    /// Whether a collection currently has a cached entry.
    pub async fn contains(&self, collection_id: &str) -> bool {
        self.entries.read().await.contains_key(collection_id)
    }
}
