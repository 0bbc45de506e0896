//! Source configurations dispatched to the matching extractor.

use serde::{Deserialize, Serialize};

use crate::chat::{ChatMessage, ChatSettings};

/// A content source handed to the extraction pipeline.
///
/// A closed set of variants dispatched by pattern matching; no open-ended
/// plugin extension is required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ContentSource {
    /// A conversational history plus its extraction settings.
    Chat {
        messages: Vec<ChatMessage>,
        settings: ChatSettings,
    },

    /// A list of file-path identifiers resolved via the attachment store.
    Files { paths: Vec<String> },
}

impl ContentSource {
    /// Build a chat source.
    pub fn chat(messages: Vec<ChatMessage>, settings: ChatSettings) -> Self {
        Self::Chat { messages, settings }
    }

    /// Build a file source.
    pub fn files(paths: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::Files {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}
