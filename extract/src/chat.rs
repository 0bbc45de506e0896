//! Chat history extraction.
//!
//! Filters a conversational history down to a configured subset and emits
//! one [`Content`] entry per selected message. The opening message and
//! user-authored messages pass through unfiltered; assistant responses go
//! through the tag rule engine, since only they are expected to carry
//! structural tags.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::content::{Content, ContentMetadata};
use crate::tags::{TagRule, extract_tag_content};

/// A single message in a chat history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Display name of the author.
    pub author: String,

    /// Whether the message was authored by the user.
    pub is_user: bool,

    /// Whether the message is hidden from the visible transcript.
    pub is_hidden: bool,

    /// Message body.
    pub text: String,
}

impl ChatMessage {
    /// Create a visible message.
    pub fn new(author: impl Into<String>, is_user: bool, text: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            is_user,
            is_hidden: false,
            text: text.into(),
        }
    }

    /// Mark the message as hidden.
    pub fn hidden(mut self) -> Self {
        self.is_hidden = true;
        self
    }
}

/// Settings for chat extraction, passed explicitly into each call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSettings {
    /// Whether chat extraction is enabled at all.
    pub enabled: bool,

    /// Ordered tag rules applied to assistant messages.
    pub tag_rules: Vec<TagRule>,

    /// Include user-authored messages.
    pub include_user: bool,

    /// Include assistant-authored messages.
    pub include_assistant: bool,

    /// Include hidden messages.
    pub include_hidden: bool,

    /// Restrict extraction to a half-open index range `[start, end)`.
    pub range: Option<(usize, usize)>,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            tag_rules: Vec::new(),
            include_user: true,
            include_assistant: true,
            include_hidden: false,
            range: None,
        }
    }
}

impl ChatSettings {
    /// Set the tag rules applied to assistant messages.
    pub fn with_tag_rules(mut self, rules: Vec<TagRule>) -> Self {
        self.tag_rules = rules;
        self
    }

    /// Restrict extraction to a half-open index range.
    pub fn with_range(mut self, start: usize, end: usize) -> Self {
        self.range = Some((start, end));
        self
    }

    /// Include hidden messages.
    pub fn with_hidden(mut self) -> Self {
        self.include_hidden = true;
        self
    }
}

/// Message-selection boundary.
///
/// Given a chat history and the selection-relevant settings, returns the
/// ordered subset of messages to extract, as `(original_index, message)`
/// pairs. The extractor treats this as a black box so callers can supply
/// richer selection semantics.
pub trait MessageSelector: Send + Sync {
    fn select<'a>(
        &self,
        chat: &'a [ChatMessage],
        settings: &ChatSettings,
    ) -> Vec<(usize, &'a ChatMessage)>;
}

/// Default selector honoring the type, hidden and range settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSelector;

impl MessageSelector for DefaultSelector {
    fn select<'a>(
        &self,
        chat: &'a [ChatMessage],
        settings: &ChatSettings,
    ) -> Vec<(usize, &'a ChatMessage)> {
        chat.iter()
            .enumerate()
            .filter(|(index, message)| {
                if let Some((start, end)) = settings.range {
                    if *index < start || *index >= end {
                        return false;
                    }
                }
                if message.is_hidden && !settings.include_hidden {
                    return false;
                }
                if message.is_user {
                    settings.include_user
                } else {
                    settings.include_assistant
                }
            })
            .collect()
    }
}

/// Extract content from a chat history.
///
/// Returns one entry per selected message, in chat order. A disabled
/// configuration or an empty history yields an empty list, never an error.
pub fn extract_chat(
    chat: &[ChatMessage],
    settings: &ChatSettings,
    selector: &dyn MessageSelector,
) -> Vec<Content> {
    if !settings.enabled || chat.is_empty() {
        return Vec::new();
    }

    let selected = selector.select(chat, settings);
    debug!(
        selected = selected.len(),
        total = chat.len(),
        "selected chat messages for extraction"
    );

    selected
        .into_iter()
        .map(|(index, message)| {
            let is_first = index == 0;
            // The opening message and user input are assumed not to carry
            // structural tags; everything else is tag-filtered.
            let text = if is_first || message.is_user {
                message.text.clone()
            } else {
                extract_tag_content(&message.text, &settings.tag_rules)
            };
            let metadata = ContentMetadata {
                chat_index: Some(index),
                is_user: message.is_user,
                is_first,
                author: Some(message.author.clone()),
                ..Default::default()
            };
            Content::from_chat_message(index, text, metadata)
        })
        .collect()
}
