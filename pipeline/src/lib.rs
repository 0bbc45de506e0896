//! # Vectorization Pipeline
//!
//! This crate orchestrates the full vectorization flow and owns the
//! storage boundary the flow persists through:
//!
//! - **Engine**: extract, chunk, deduplicate and persist a content source
//!   under a tracked task whose terminal status reflects the run outcome
//! - **Storage boundary**: the [`VectorStore`] contract plus an in-memory
//!   implementation for tests and small deployments
//! - **Hash cache**: saved content hashes per collection, invalidated on
//!   purge
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                        VectorPipeline                            │
//! ├──────────────────────────────────────────────────────────────────┤
//! │ ContentSource ─► extract ─► chunk ─► dedup ─► VectorStore        │
//! │                     │                  │          │              │
//! │                     ▼                  ▼          ▼              │
//! │               TaskRegistry        HashCache   insert / query     │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod memory;
pub mod store;

pub use cache::HashCache;
pub use config::PipelineConfig;
pub use engine::{PipelineStats, VectorPipeline, VectorizeOutcome};
pub use error::{PipelineError, Result};
pub use memory::MemoryVectorStore;
pub use store::{
    CollectionStats, InsertOptions, QueryResult, StoreError, StoreResult, VectorStore,
};
