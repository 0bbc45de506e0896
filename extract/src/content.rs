//! Normalized content units and vectorization-ready items.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Kind of source a [`Content`] entry was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    /// Conversational message history.
    Chat,
    /// An attached file.
    File,
}

/// Source-specific attributes carried alongside extracted text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentMetadata {
    /// Index of the source message within its chat, if any.
    pub chat_index: Option<usize>,

    /// Whether the source message was authored by the user.
    pub is_user: bool,

    /// Whether the source message opens its chat history.
    pub is_first: bool,

    /// Author name of the source message, if any.
    pub author: Option<String>,

    /// Derived filename (final path segment) for file sources.
    pub file_name: Option<String>,

    /// Full path for file sources.
    pub file_path: Option<String>,

    /// Index of this chunk within its parent content, once chunked.
    pub chunk_index: Option<usize>,

    /// Total chunks produced from the parent content, once chunked.
    pub total_chunks: Option<usize>,
}

/// A normalized unit of extracted text.
///
/// Created by an extractor from exactly one source record and immutable
/// once created; the chunking engine consumes it without mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    /// Stable unique identifier, derived from the source message index or
    /// file path.
    pub id: String,

    /// Kind of source this entry came from.
    pub source_type: SourceType,

    /// Extracted text, raw or tag-filtered. May be empty.
    pub text: String,

    /// Source-specific attributes.
    pub metadata: ContentMetadata,
}

impl Content {
    /// Create a content entry for a chat message.
    pub fn from_chat_message(
        index: usize,
        text: impl Into<String>,
        metadata: ContentMetadata,
    ) -> Self {
        Self {
            id: format!("chat-{index}"),
            source_type: SourceType::Chat,
            text: text.into(),
            metadata,
        }
    }

    /// Create a content entry for a file attachment. The id is the path
    /// itself; the derived filename is the path's final segment.
    pub fn from_file(path: impl Into<String>, text: impl Into<String>) -> Self {
        let path = path.into();
        let file_name = path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(path.as_str())
            .to_string();
        Self {
            id: path.clone(),
            source_type: SourceType::File,
            text: text.into(),
            metadata: ContentMetadata {
                file_name: Some(file_name),
                file_path: Some(path),
                ..Default::default()
            },
        }
    }
}

/// The unit handed to the storage boundary for persistence.
///
/// One-to-one with its source content before chunking, or one per chunk
/// after, sharing the parent's metadata plus a chunk index. `text` is
/// always present (possibly empty).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorItem {
    /// Deterministic hash of the final (post-chunk) text.
    pub hash: u64,

    /// The text to embed and persist.
    pub text: String,

    /// Kind of source this item came from.
    pub source_type: SourceType,

    /// Attributes inherited from the parent content.
    pub metadata: ContentMetadata,
}

impl VectorItem {
    /// Create an item from final text and its parent's metadata. The hash
    /// is computed from the text, so identical text always yields an
    /// identical hash.
    pub fn new(
        text: impl Into<String>,
        source_type: SourceType,
        metadata: ContentMetadata,
    ) -> Self {
        let text = text.into();
        Self {
            hash: text_hash(&text),
            text,
            source_type,
            metadata,
        }
    }

    /// Create an item covering a whole content entry, without chunking.
    pub fn from_content(content: &Content) -> Self {
        Self::new(
            content.text.clone(),
            content.source_type,
            content.metadata.clone(),
        )
    }
}

/// Deterministic 64-bit hash of a text, for storage-layer deduplication.
///
/// SHA-256 truncated to the first eight bytes; stable across runs and
/// platforms.
pub fn text_hash(text: &str) -> u64 {
    let digest = Sha256::digest(text.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn file_content_derives_filename_from_path() {
        let content = Content::from_file("/data/notes/a.txt", "body");
        assert_eq!(content.id, "/data/notes/a.txt");
        assert_eq!(content.metadata.file_name, Some("a.txt".to_string()));
        assert_eq!(
            content.metadata.file_path,
            Some("/data/notes/a.txt".to_string())
        );
    }

    #[test]
    fn identical_text_yields_identical_hash() {
        assert_eq!(text_hash("same text"), text_hash("same text"));
        assert_ne!(text_hash("same text"), text_hash("other text"));
    }

    #[test]
    fn vector_item_hash_tracks_final_text() {
        let content = Content::from_file("/a.txt", "full text here");
        let whole = VectorItem::from_content(&content);
        let chunked = VectorItem::new("full text", content.source_type, content.metadata);
        assert_eq!(whole.hash, text_hash("full text here"));
        assert_eq!(chunked.hash, text_hash("full text"));
        assert_ne!(whole.hash, chunked.hash);
    }

    #[test]
    fn empty_text_is_allowed() {
        let item = VectorItem::new("", SourceType::Chat, ContentMetadata::default());
        assert_eq!(item.text, "");
        assert_eq!(item.hash, text_hash(""));
    }
}
