//! End-to-end pipeline tests over the in-memory store.

use std::sync::Arc;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use recall_chunking::ChunkConfig;
use recall_extract::{
    ChatMessage, ChatSettings, ContentSource, FsAttachmentStore, TagMode, TagRule, VectorItem,
};
use recall_pipeline::{
    InsertOptions, MemoryVectorStore, PipelineConfig, PipelineError, QueryResult, StoreError,
    StoreResult, VectorPipeline, VectorStore,
};
use recall_tasks::TaskStatus;
use tokio_util::sync::CancellationToken;

fn chat_source() -> ContentSource {
    let settings = ChatSettings::default()
        .with_tag_rules(vec![TagRule::new("story", TagMode::Inner).unwrap()]);
    ContentSource::chat(
        vec![
            ChatMessage::new("Aria", false, "Welcome to the long tale."),
            ChatMessage::new("Aria", false, "prelude <story>The dragon slept.</story>"),
            ChatMessage::new("You", true, "Tell me more about the dragon."),
        ],
        settings,
    )
}

#[tokio::test]
async fn chat_run_completes_and_persists_items() {
    let store = Arc::new(MemoryVectorStore::new());
    let pipeline = VectorPipeline::new(store.clone());
    let cancel = CancellationToken::new();

    let outcome = pipeline
        .vectorize("col", &chat_source(), &cancel)
        .await
        .unwrap();

    assert_eq!(outcome.status, TaskStatus::Completed);
    assert_eq!(outcome.stats.contents_extracted, 3);
    assert_eq!(outcome.stats.items_inserted, 3);
    assert_eq!(outcome.stats.items_deduplicated, 0);
    assert_eq!(store.item_count("col").await, 3);

    let task = pipeline.registry().get(outcome.task_id).await.unwrap();
    assert_eq!(task.status, TaskStatus::Completed);
    assert!(task.finished_at.is_some());
}

#[tokio::test]
async fn rerun_with_identical_content_is_skipped() {
    let pipeline = VectorPipeline::new(Arc::new(MemoryVectorStore::new()));
    let cancel = CancellationToken::new();

    let first = pipeline
        .vectorize("col", &chat_source(), &cancel)
        .await
        .unwrap();
    assert_eq!(first.status, TaskStatus::Completed);

    let second = pipeline
        .vectorize("col", &chat_source(), &cancel)
        .await
        .unwrap();
    assert_eq!(second.status, TaskStatus::Skipped);
    assert_eq!(second.stats.items_deduplicated, 3);
    assert_eq!(second.stats.items_inserted, 0);
}

#[tokio::test]
async fn pre_cancelled_run_ends_cancelled_not_failed() {
    let pipeline = VectorPipeline::new(Arc::new(MemoryVectorStore::new()));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let outcome = pipeline
        .vectorize("col", &chat_source(), &cancel)
        .await
        .unwrap();

    assert_eq!(outcome.status, TaskStatus::Cancelled);
    assert_eq!(outcome.stats.items_inserted, 0);

    let task = pipeline.registry().get(outcome.task_id).await.unwrap();
    assert_eq!(task.status, TaskStatus::Cancelled);
    assert_eq!(task.error, None);
}

#[tokio::test]
async fn purge_empties_the_collection_and_allows_reinsert() {
    let store = Arc::new(MemoryVectorStore::new());
    let pipeline = VectorPipeline::new(store.clone());
    let cancel = CancellationToken::new();

    pipeline
        .vectorize("col", &chat_source(), &cancel)
        .await
        .unwrap();
    assert!(pipeline.collection_exists("col").await.unwrap());

    assert!(pipeline.purge("col").await.unwrap());
    assert!(!pipeline.collection_exists("col").await.unwrap());
    assert!(!pipeline.purge("col").await.unwrap());

    // The saved-hash cache was invalidated, so the same content inserts
    // again instead of being deduplicated against stale hashes.
    let rerun = pipeline
        .vectorize("col", &chat_source(), &cancel)
        .await
        .unwrap();
    assert_eq!(rerun.status, TaskStatus::Completed);
    assert_eq!(rerun.stats.items_inserted, 3);
}

#[tokio::test]
async fn oversized_content_is_chunked_before_persisting() {
    let store = Arc::new(MemoryVectorStore::new());
    let config = PipelineConfig::new()
        .with_chunking(ChunkConfig::new(20).with_overlap_percent(50.0));
    let pipeline = VectorPipeline::new(store.clone()).with_config(config);
    let cancel = CancellationToken::new();

    let source = ContentSource::chat(
        vec![ChatMessage::new(
            "Aria",
            false,
            "Alpha beta. Gamma delta. Epsilon zeta. Eta theta.",
        )],
        ChatSettings::default(),
    );

    let outcome = pipeline.vectorize("col", &source, &cancel).await.unwrap();

    assert_eq!(outcome.status, TaskStatus::Completed);
    assert!(outcome.stats.chunks_produced > 1);
    assert_eq!(store.item_count("col").await, outcome.stats.chunks_produced);
}

#[tokio::test]
async fn file_source_reads_attachments_and_reports_skips() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("notes.txt"), "dragon lore on disk").unwrap();

    let pipeline = VectorPipeline::new(Arc::new(MemoryVectorStore::new()))
        .with_attachments(Arc::new(FsAttachmentStore::new(dir.path())));
    let cancel = CancellationToken::new();

    let source = ContentSource::files(["notes.txt", "missing.txt"]);
    let outcome = pipeline.vectorize("col", &source, &cancel).await.unwrap();

    assert_eq!(outcome.status, TaskStatus::Completed);
    assert_eq!(outcome.stats.contents_extracted, 1);
    assert_eq!(outcome.stats.items_skipped, 1);
    assert_eq!(outcome.skipped[0].id, "missing.txt");
}

/// Store whose insert always fails with a genuine storage error.
struct RejectingStore;

#[async_trait]
impl VectorStore for RejectingStore {
    async fn get_saved_hashes(&self, _collection_id: &str) -> StoreResult<Vec<u64>> {
        Ok(Vec::new())
    }

    async fn insert_vector_items(
        &self,
        collection_id: &str,
        items: &[VectorItem],
        _cancel: &CancellationToken,
        _options: &InsertOptions,
    ) -> StoreResult<()> {
        Err(StoreError::Insert {
            collection: collection_id.to_string(),
            items: items.len(),
            message: "backend unavailable".to_string(),
        })
    }

    async fn query_collection(
        &self,
        _collection_id: &str,
        _search_text: &str,
        _top_k: usize,
        _threshold: f32,
    ) -> StoreResult<QueryResult> {
        Ok(QueryResult::default())
    }

    async fn purge_vector_index(&self, _collection_id: &str) -> StoreResult<bool> {
        Ok(false)
    }
}

/// Store that observes the abort signal while inserting.
struct AbortingStore;

#[async_trait]
impl VectorStore for AbortingStore {
    async fn get_saved_hashes(&self, _collection_id: &str) -> StoreResult<Vec<u64>> {
        Ok(Vec::new())
    }

    async fn insert_vector_items(
        &self,
        collection_id: &str,
        _items: &[VectorItem],
        _cancel: &CancellationToken,
        _options: &InsertOptions,
    ) -> StoreResult<()> {
        Err(StoreError::Cancelled {
            collection: collection_id.to_string(),
        })
    }

    async fn query_collection(
        &self,
        _collection_id: &str,
        _search_text: &str,
        _top_k: usize,
        _threshold: f32,
    ) -> StoreResult<QueryResult> {
        Ok(QueryResult::default())
    }

    async fn purge_vector_index(&self, _collection_id: &str) -> StoreResult<bool> {
        Ok(false)
    }
}

/// Store whose saved-hash reads fail but whose inserts succeed.
struct HashReadFailingStore;

#[async_trait]
impl VectorStore for HashReadFailingStore {
    async fn get_saved_hashes(&self, collection_id: &str) -> StoreResult<Vec<u64>> {
        Err(StoreError::Read {
            collection: collection_id.to_string(),
            message: "hash index offline".to_string(),
        })
    }

    async fn insert_vector_items(
        &self,
        _collection_id: &str,
        _items: &[VectorItem],
        _cancel: &CancellationToken,
        _options: &InsertOptions,
    ) -> StoreResult<()> {
        Ok(())
    }

    async fn query_collection(
        &self,
        _collection_id: &str,
        _search_text: &str,
        _top_k: usize,
        _threshold: f32,
    ) -> StoreResult<QueryResult> {
        Ok(QueryResult::default())
    }

    async fn purge_vector_index(&self, _collection_id: &str) -> StoreResult<bool> {
        Ok(false)
    }
}

#[tokio::test]
async fn insert_failure_fails_the_task_and_propagates() {
    let pipeline = VectorPipeline::new(Arc::new(RejectingStore));
    let cancel = CancellationToken::new();

    let error = pipeline
        .vectorize("col", &chat_source(), &cancel)
        .await
        .unwrap_err();
    match error {
        PipelineError::Store(StoreError::Insert {
            collection,
            items,
            message,
        }) => {
            assert_eq!(collection, "col");
            assert_eq!(items, 3);
            assert_eq!(message, "backend unavailable");
        }
        other => panic!("unexpected error: {other}"),
    }

    let tasks = pipeline.registry().tasks().await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].status, TaskStatus::Failed);
    let reason = tasks[0].error.as_deref().unwrap();
    assert!(reason.contains("backend unavailable"));
}

#[tokio::test]
async fn abort_observed_by_the_store_ends_cancelled_not_failed() {
    let pipeline = VectorPipeline::new(Arc::new(AbortingStore));
    // The token is never cancelled, so the queued checkpoint passes and
    // the abort is reported by the store itself.
    let cancel = CancellationToken::new();

    let outcome = pipeline
        .vectorize("col", &chat_source(), &cancel)
        .await
        .unwrap();

    assert_eq!(outcome.status, TaskStatus::Cancelled);
    assert_eq!(outcome.stats.items_inserted, 0);

    let task = pipeline.registry().get(outcome.task_id).await.unwrap();
    assert_eq!(task.status, TaskStatus::Cancelled);
    assert_eq!(task.error, None);
}

#[tokio::test]
async fn saved_hash_read_failure_degrades_to_insert_without_dedup() {
    let pipeline = VectorPipeline::new(Arc::new(HashReadFailingStore));
    let cancel = CancellationToken::new();

    let outcome = pipeline
        .vectorize("col", &chat_source(), &cancel)
        .await
        .unwrap();

    assert_eq!(outcome.status, TaskStatus::Completed);
    assert_eq!(outcome.stats.items_deduplicated, 0);
    assert_eq!(outcome.stats.items_inserted, 3);
}

#[tokio::test]
async fn query_finds_persisted_text() {
    let pipeline = VectorPipeline::new(Arc::new(MemoryVectorStore::new()));
    let cancel = CancellationToken::new();

    pipeline
        .vectorize("col", &chat_source(), &cancel)
        .await
        .unwrap();

    let result = pipeline.query("col", "dragon", 5, 0.5).await.unwrap();
    assert!(!result.hashes.is_empty());

    let stats = pipeline.collection_stats("col").await.unwrap();
    assert!(stats.exists);
    assert_eq!(stats.hash_count, 3);
}
