//! Tag rule engine.
//!
//! Extracts substrings from a message body according to an ordered set of
//! tag rules. The first rule whose pattern matches the text wins; a rule
//! whose pattern is absent falls through to the next one.

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, Result};

/// How a matched tag contributes to the extracted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagMode {
    /// Content strictly inside the named tag.
    Inner,
    /// The whole tagged block, markers included.
    Full,
}

/// A pattern describing a delimiter/tag pair to extract from a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRule {
    /// Tag name to match, e.g. `summary` for `<summary>...</summary>`.
    pub pattern: String,

    /// Extraction mode.
    pub mode: TagMode,
}

impl TagRule {
    /// Create a rule, validating the pattern at construction time.
    ///
    /// Patterns are tag names: non-empty, limited to ASCII alphanumerics,
    /// `_` and `-`. Anything else is rejected here rather than silently
    /// failing to match later.
    pub fn new(pattern: impl Into<String>, mode: TagMode) -> Result<Self> {
        let pattern = pattern.into();
        if pattern.is_empty() {
            return Err(ExtractError::InvalidTagRule {
                pattern,
                reason: "pattern must not be empty".to_string(),
            });
        }
        if !pattern
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ExtractError::InvalidTagRule {
                pattern,
                reason: "pattern must be a tag name (ASCII alphanumeric, `_` or `-`)".to_string(),
            });
        }
        Ok(Self { pattern, mode })
    }

    /// Apply this rule to a text, returning the extracted substring(s)
    /// joined by newlines, or `None` if the pattern does not occur.
    pub fn apply(&self, text: &str) -> Option<String> {
        let regex = self.regex()?;
        let mut pieces: Vec<&str> = Vec::new();
        for captures in regex.captures_iter(text) {
            let piece = match self.mode {
                TagMode::Inner => captures.get(1)?.as_str(),
                TagMode::Full => captures.get(0)?.as_str(),
            };
            pieces.push(piece.trim());
        }
        if pieces.is_empty() {
            return None;
        }
        Some(pieces.join("\n"))
    }

    fn regex(&self) -> Option<Regex> {
        // The pattern charset is validated at construction, so this only
        // fails for rules deserialized from untrusted input; those simply
        // never match.
        let tag = &self.pattern;
        Regex::new(&format!(r"(?is)<{tag}(?:\s[^>]*)?>(.*?)</{tag}\s*>")).ok()
    }
}

/// Apply an ordered set of rules to a message body.
///
/// First matching rule wins. Fallback policy when no rule matches: the
/// full original text passes through unchanged. Rule sets are often
/// incomplete for older messages, and dropping their text would silently
/// lose content.
pub fn extract_tag_content(text: &str, rules: &[TagRule]) -> String {
    for rule in rules {
        if let Some(extracted) = rule.apply(text) {
            return extracted;
        }
    }
    text.to_string()
}
