//! # Chunking
//!
//! This crate splits normalized text into bounded-size fragments suitable
//! for embedding and vector storage. It provides:
//!
//! - **Delimiter cascading**: split on the coarsest boundary that keeps
//!   pieces under the target size (paragraph > line > word > character)
//! - **Percentage-based overlap**: carry sentence-trimmed context across
//!   adjacent chunk boundaries
//! - **Deterministic output**: chunking is a pure function of its inputs,
//!   safe to invoke concurrently for different sources
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Chunking Engine                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  text ──► split_recursive ──► base chunks ──► overlap blending  │
//! │               │                                    │            │
//! │               ▼                                    ▼            │
//! │        delimiter cascade                     ChunkRecord        │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod overlap;
pub mod splitter;

pub use overlap::{ChunkRecord, trim_to_end_sentence, trim_to_start_sentence};
pub use splitter::{ChunkConfig, chunk_records, split_text_into_chunks};
