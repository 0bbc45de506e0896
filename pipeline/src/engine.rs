//! Pipeline orchestration.
//!
//! Ties the extractors, the chunking engine, the task lifecycle and the
//! storage boundary together: a vectorization run is extracted, chunked,
//! deduplicated against saved hashes, then persisted under a tracked task
//! whose terminal status reflects how the run ended.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use recall_chunking::chunk_records;
use recall_extract::{
    AttachmentStore, Content, ContentSource, DefaultSelector, ExtractionReport, MessageSelector,
    SkippedItem, VectorItem, extract_chat, extract_files,
};
use recall_tasks::{Task, TaskRegistry, TaskStatus, TaskType};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::cache::HashCache;
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::store::{CollectionStats, InsertOptions, QueryResult, StoreResult, VectorStore};

/// Counters describing one vectorization run.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PipelineStats {
    /// Content entries produced by extraction.
    pub contents_extracted: usize,

    /// Source items that yielded no content.
    pub items_skipped: usize,

    /// Vector items produced by chunking.
    pub chunks_produced: usize,

    /// Items dropped because their hash was already saved.
    pub items_deduplicated: usize,

    /// Items handed to the store.
    pub items_inserted: usize,

    /// Wall-clock duration of the run in milliseconds.
    pub elapsed_ms: u64,
}

/// Result of a vectorization run that did not fail outright.
///
/// `status` is one of the terminal task statuses: `completed`, `skipped`
/// (nothing new to persist) or `cancelled` (abort signal observed).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorizeOutcome {
    /// Id of the task that tracked the run.
    pub task_id: Uuid,

    /// Terminal status the task ended in.
    pub status: TaskStatus,

    /// Run counters.
    pub stats: PipelineStats,

    /// Source items skipped during extraction.
    pub skipped: Vec<SkippedItem>,
}

/// The vectorization pipeline engine.
///
/// Holds the storage boundary, the optional attachment store for file
/// sources, the message selector for chat sources and the task registry
/// tracking run lifecycles. Construct with [`VectorPipeline::new`] and the
/// `with_*` builders.
pub struct VectorPipeline {
    config: PipelineConfig,
    store: Arc<dyn VectorStore>,
    attachments: Option<Arc<dyn AttachmentStore>>,
    selector: Arc<dyn MessageSelector>,
    registry: TaskRegistry,
    hash_cache: HashCache,
}

impl VectorPipeline {
    /// Create a pipeline over a storage boundary with default settings.
    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        Self {
            config: PipelineConfig::default(),
            store,
            attachments: None,
            selector: Arc::new(DefaultSelector),
            registry: TaskRegistry::new(),
            hash_cache: HashCache::new(),
        }
    }

    /// Set the pipeline configuration.
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the attachment store used for file sources.
    pub fn with_attachments(mut self, attachments: Arc<dyn AttachmentStore>) -> Self {
        self.attachments = Some(attachments);
        self
    }

    /// Set the message selector used for chat sources.
    pub fn with_selector(mut self, selector: Arc<dyn MessageSelector>) -> Self {
        self.selector = selector;
        self
    }

    /// The task registry tracking pipeline runs.
    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    /// Run the full pipeline for a source against a collection.
    ///
    /// The run is tracked by a task: it ends `completed` when items were
    /// persisted, `skipped` when extraction and deduplication left nothing
    /// to persist, `cancelled` when the abort signal was observed, and
    /// `failed` (with the error propagated) when the insert reported a
    /// genuine failure. A failed saved-hash read degrades to inserting
    /// without local deduplication rather than failing the run.
    pub async fn vectorize(
        &self,
        collection_id: &str,
        source: &ContentSource,
        cancel: &CancellationToken,
    ) -> Result<VectorizeOutcome> {
        let started = Instant::now();
        let task_id = self
            .registry
            .insert(Task::new(TaskType::Vectorization, self.config.priority))
            .await;

        let report = self.extract(source).await;
        let mut stats = PipelineStats {
            contents_extracted: report.contents.len(),
            items_skipped: report.skipped.len(),
            ..Default::default()
        };

        let items = self.chunk_contents(&report.contents);
        stats.chunks_produced = items.len();

        let items = if self.config.skip_deduplication {
            items
        } else {
            match self.saved_hashes(collection_id).await {
                Ok(saved) => {
                    let saved: HashSet<u64> = saved.into_iter().collect();
                    let before = items.len();
                    let kept: Vec<VectorItem> = items
                        .into_iter()
                        .filter(|item| !saved.contains(&item.hash))
                        .collect();
                    stats.items_deduplicated = before - kept.len();
                    kept
                }
                Err(error) => {
                    // A run that never reached the store cannot fail; the
                    // store's own hash check still applies on insert.
                    warn!(
                        collection_id,
                        %error,
                        "saved-hash read failed, inserting without local deduplication"
                    );
                    items
                }
            }
        };

        if items.is_empty() {
            let status = self.registry.transition(task_id, TaskStatus::Skipped).await?;
            stats.elapsed_ms = elapsed_ms(started);
            info!(collection_id, %task_id, "nothing new to persist, run skipped");
            return Ok(VectorizeOutcome {
                task_id,
                status,
                stats,
                skipped: report.skipped,
            });
        }

        self.registry.transition(task_id, TaskStatus::Queued).await?;
        if cancel.is_cancelled() {
            let status = self
                .registry
                .transition(task_id, TaskStatus::Cancelled)
                .await?;
            stats.elapsed_ms = elapsed_ms(started);
            info!(collection_id, %task_id, "run cancelled before starting");
            return Ok(VectorizeOutcome {
                task_id,
                status,
                stats,
                skipped: report.skipped,
            });
        }
        self.registry.transition(task_id, TaskStatus::Running).await?;

        let options = InsertOptions {
            skip_deduplication: self.config.skip_deduplication,
        };
        match self
            .store
            .insert_vector_items(collection_id, &items, cancel, &options)
            .await
        {
            Ok(()) => {
                stats.items_inserted = items.len();
                let hashes: Vec<u64> = items.iter().map(|item| item.hash).collect();
                self.hash_cache.extend(collection_id, &hashes).await;
                let status = self
                    .registry
                    .transition(task_id, TaskStatus::Completed)
                    .await?;
                stats.elapsed_ms = elapsed_ms(started);
                info!(
                    collection_id,
                    %task_id,
                    inserted = stats.items_inserted,
                    deduplicated = stats.items_deduplicated,
                    "vectorization run completed"
                );
                Ok(VectorizeOutcome {
                    task_id,
                    status,
                    stats,
                    skipped: report.skipped,
                })
            }
            Err(error) if error.is_cancelled() => {
                let status = self
                    .registry
                    .transition(task_id, TaskStatus::Cancelled)
                    .await?;
                stats.elapsed_ms = elapsed_ms(started);
                info!(collection_id, %task_id, "run cancelled during insert");
                Ok(VectorizeOutcome {
                    task_id,
                    status,
                    stats,
                    skipped: report.skipped,
                })
            }
            Err(error) => {
                self.registry.fail(task_id, error.to_string()).await?;
                Err(PipelineError::Store(error))
            }
        }
    }

    /// Extract content from a source without persisting anything.
    pub async fn extract(&self, source: &ContentSource) -> ExtractionReport {
        match source {
            ContentSource::Chat { messages, settings } => ExtractionReport::from_contents(
                extract_chat(messages, settings, self.selector.as_ref()),
            ),
            ContentSource::Files { paths } => match &self.attachments {
                Some(store) => extract_files(store.as_ref(), paths).await,
                None => {
                    warn!("file source given but no attachment store is configured");
                    ExtractionReport {
                        contents: Vec::new(),
                        skipped: paths
                            .iter()
                            .map(|path| SkippedItem {
                                id: path.clone(),
                                reason: "no attachment store configured".to_string(),
                            })
                            .collect(),
                    }
                }
            },
        }
    }

    /// Similarity search over a collection.
    pub async fn query(
        &self,
        collection_id: &str,
        search_text: &str,
        top_k: usize,
        threshold: f32,
    ) -> Result<QueryResult> {
        Ok(self
            .store
            .query_collection(collection_id, search_text, top_k, threshold)
            .await?)
    }

    /// Delete a collection's vectors, invalidating the saved-hash cache
    /// when anything was removed. Returns whether anything was removed.
    pub async fn purge(&self, collection_id: &str) -> Result<bool> {
        let removed = self.store.purge_vector_index(collection_id).await?;
        if removed {
            self.hash_cache.invalidate(collection_id).await;
        }
        Ok(removed)
    }

    /// Whether a collection holds any items.
    pub async fn collection_exists(&self, collection_id: &str) -> Result<bool> {
        Ok(self.store.collection_exists(collection_id).await?)
    }

    /// Derived statistics for a collection.
    pub async fn collection_stats(&self, collection_id: &str) -> Result<CollectionStats> {
        Ok(self.store.get_collection_stats(collection_id).await?)
    }

    /// Turn extracted content into vector items, chunking entries whose
    /// text exceeds the configured chunk size.
    fn chunk_contents(&self, contents: &[Content]) -> Vec<VectorItem> {
        let mut items = Vec::with_capacity(contents.len());
        for content in contents {
            let char_count = content.text.chars().count();
            if char_count > self.config.chunking.chunk_size {
                let records = chunk_records(&content.text, &self.config.chunking);
                if records.len() > 1 {
                    debug!(
                        id = content.id,
                        chars = char_count,
                        chunks = records.len(),
                        "chunked oversized content"
                    );
                    for record in records {
                        let mut metadata = content.metadata.clone();
                        metadata.chunk_index = Some(record.index);
                        metadata.total_chunks = Some(record.total_chunks);
                        items.push(VectorItem::new(record.text, content.source_type, metadata));
                    }
                    continue;
                }
            }
            items.push(VectorItem::from_content(content));
        }
        items
    }

    /// Saved hashes for a collection, cache-first.
    async fn saved_hashes(&self, collection_id: &str) -> StoreResult<Vec<u64>> {
        if let Some(cached) = self.hash_cache.get(collection_id).await {
            return Ok(cached);
        }
        let hashes = self.store.get_saved_hashes(collection_id).await?;
        self.hash_cache
            .put(collection_id, hashes.clone())
            .await;
        Ok(hashes)
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryVectorStore;
    use pretty_assertions::assert_eq;
    use recall_chunking::ChunkConfig;
    use recall_extract::{ChatMessage, ChatSettings};

    fn pipeline() -> VectorPipeline {
        VectorPipeline::new(Arc::new(MemoryVectorStore::new()))
    }

    #[tokio::test]
    async fn file_source_without_store_skips_every_path() {
        let source = ContentSource::files(["/a.txt", "/b.txt"]);
        let report = pipeline().extract(&source).await;

        assert!(report.contents.is_empty());
        assert_eq!(report.skipped.len(), 2);
        assert_eq!(report.skipped[0].reason, "no attachment store configured");
    }

    #[tokio::test]
    async fn short_content_is_not_chunked() {
        let config = PipelineConfig::new().with_chunking(ChunkConfig::new(50));
        let pipeline = pipeline().with_config(config);
        let source = ContentSource::chat(
            vec![ChatMessage::new("Aria", false, "short text")],
            ChatSettings::default(),
        );

        let report = pipeline.extract(&source).await;
        let items = pipeline.chunk_contents(&report.contents);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].metadata.chunk_index, None);
    }

    #[tokio::test]
    async fn oversized_content_carries_chunk_metadata() {
        let config = PipelineConfig::new().with_chunking(ChunkConfig::new(20));
        let pipeline = pipeline().with_config(config);
        let text = "Alpha beta. Gamma delta. Epsilon zeta. Eta theta.";
        let source = ContentSource::chat(
            vec![ChatMessage::new("Aria", false, text)],
            ChatSettings::default(),
        );

        let report = pipeline.extract(&source).await;
        let items = pipeline.chunk_contents(&report.contents);

        assert!(items.len() > 1);
        for (position, item) in items.iter().enumerate() {
            assert_eq!(item.metadata.chunk_index, Some(position));
            assert_eq!(item.metadata.total_chunks, Some(items.len()));
        }
    }
}
