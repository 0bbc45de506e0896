//! # Content Extraction
//!
//! This crate turns heterogeneous content sources into normalized
//! [`Content`] entries ready for chunking and vectorization. It provides:
//!
//! - **Chat extraction**: tag-filtered extraction from conversational
//!   history, with user and opening messages passing through unfiltered
//! - **File extraction**: concurrent, order-preserving attachment reads
//!   where per-path failures degrade to a shorter result list
//! - **Tag rule engine**: ordered first-match-wins substring extraction
//! - **Vector items**: content enriched with a deterministic text hash for
//!   storage-layer deduplication
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Content Extractors                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ContentSource ──► extract_chat / extract_files ──► Content     │
//! │       │                   │                            │        │
//! │       ▼                   ▼                            ▼        │
//! │  MessageSelector    AttachmentStore               VectorItem    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod chat;
pub mod content;
pub mod error;
pub mod file;
pub mod source;
pub mod tags;

pub use chat::{ChatMessage, ChatSettings, DefaultSelector, MessageSelector, extract_chat};
pub use content::{Content, ContentMetadata, SourceType, VectorItem, text_hash};
pub use error::{ExtractError, Result};
pub use file::{
    AttachmentStore, ExtractionReport, FsAttachmentStore, SkippedItem, extract_files,
};
pub use source::ContentSource;
pub use tags::{TagMode, TagRule, extract_tag_content};
