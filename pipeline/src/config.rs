//! Configuration for the vectorization pipeline.

use recall_chunking::ChunkConfig;
use recall_tasks::TaskPriority;
use serde::{Deserialize, Serialize};

/// Configuration for the vectorization pipeline, passed explicitly into
/// the engine rather than read from ambient global state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Chunking engine configuration.
    pub chunking: ChunkConfig,

    /// Priority assigned to vectorization tasks.
    pub priority: TaskPriority,

    /// Skip hash-based deduplication against saved hashes.
    pub skip_deduplication: bool,
}

impl PipelineConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self {
            chunking: ChunkConfig::default(),
            priority: TaskPriority::Normal,
            skip_deduplication: false,
        }
    }

    /// Set the chunking configuration.
    pub fn with_chunking(mut self, chunking: ChunkConfig) -> Self {
        self.chunking = chunking;
        self
    }

    /// Set the task priority for pipeline runs.
    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Disable hash-based deduplication.
    pub fn with_skip_deduplication(mut self, skip: bool) -> Self {
        self.skip_deduplication = skip;
        self
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new()
    }
}
