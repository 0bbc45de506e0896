//! Recursive delimiter-cascade text splitting.
//!
//! Text is split on the coarsest delimiter that keeps pieces under the
//! target size, falling back to finer delimiters only where a piece is
//! still too large. The empty-string delimiter at the end of the cascade
//! guarantees termination by allowing character-level cuts.

use serde::{Deserialize, Serialize};

use crate::overlap::{ChunkRecord, blend_overlap};

/// Default delimiter cascade: paragraph, line, word, character.
const DELIMITER_CASCADE: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Configuration for the chunking engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkConfig {
    /// Target chunk size in characters.
    pub chunk_size: usize,

    /// Overlap between adjacent chunks, as a percentage of `chunk_size`.
    pub overlap_percent: f64,

    /// Optional delimiter tried before the standard cascade.
    pub force_delimiter: Option<String>,
}

impl ChunkConfig {
    /// Create a configuration with the given chunk size and no overlap.
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size,
            overlap_percent: 0.0,
            force_delimiter: None,
        }
    }

    /// Set the overlap percentage.
    pub fn with_overlap_percent(mut self, percent: f64) -> Self {
        self.overlap_percent = percent;
        self
    }

    /// Set a delimiter to try before the standard cascade.
    pub fn with_force_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.force_delimiter = Some(delimiter.into());
        self
    }

    /// Overlap size in characters, rounded from the configured percentage.
    pub fn overlap_size(&self) -> usize {
        (self.chunk_size as f64 * self.overlap_percent / 100.0).round() as usize
    }
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self::new(512)
    }
}

/// Split text into overlap-blended chunk strings.
///
/// Convenience wrapper over [`chunk_records`] that discards the per-chunk
/// overlap bookkeeping.
pub fn split_text_into_chunks(text: &str, config: &ChunkConfig) -> Vec<String> {
    chunk_records(text, config)
        .into_iter()
        .map(|record| record.text)
        .collect()
}

/// Split text into [`ChunkRecord`]s with overlap bookkeeping.
///
/// The effective split target is reduced by the overlap size (clamped to at
/// least one character) so that final chunks do not greatly exceed
/// `chunk_size` once overlap is blended back in. Empty input yields an
/// empty list.
pub fn chunk_records(text: &str, config: &ChunkConfig) -> Vec<ChunkRecord> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let overlap_size = config.overlap_size();
    let adjusted_chunk_size = config.chunk_size.saturating_sub(overlap_size).max(1);

    let mut cascade: Vec<&str> = Vec::with_capacity(DELIMITER_CASCADE.len() + 1);
    if let Some(delimiter) = config.force_delimiter.as_deref() {
        if !delimiter.is_empty() {
            cascade.push(delimiter);
        }
    }
    cascade.extend(DELIMITER_CASCADE);

    let base = split_recursive(text, adjusted_chunk_size, &cascade);
    blend_overlap(base, overlap_size)
}

/// Recursively split `text` into pieces bounded by `limit` characters.
fn split_recursive(text: &str, limit: usize, delimiters: &[&str]) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }
    if char_len(text) <= limit {
        return vec![text.to_string()];
    }

    let Some((&delimiter, finer)) = delimiters.split_first() else {
        return split_characters(text, limit);
    };
    if delimiter.is_empty() {
        return split_characters(text, limit);
    }

    // A delimiter that never appears yields a single oversized part, which
    // falls through to the finer delimiters exactly as if it were absent.
    let mut pieces: Vec<String> = Vec::new();
    for part in text.split(delimiter) {
        if char_len(part) <= limit {
            pieces.push(part.to_string());
        } else {
            pieces.extend(split_recursive(part, limit, finer));
        }
    }

    merge_pieces(pieces, delimiter, limit)
}

/// Greedily merge adjacent pieces back together while they fit the limit,
/// rejoining with the delimiter they were split on.
fn merge_pieces(pieces: Vec<String>, delimiter: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for piece in pieces {
        if piece.is_empty() {
            continue;
        }
        if current.is_empty() {
            current = piece;
        } else if char_len(&current) + char_len(delimiter) + char_len(&piece) <= limit {
            current.push_str(delimiter);
            current.push_str(&piece);
        } else {
            push_trimmed(&mut chunks, &current);
            current = piece;
        }
    }
    push_trimmed(&mut chunks, &current);

    chunks
}

/// Last-resort character-level split.
fn split_characters(text: &str, limit: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(limit.max(1))
        .map(|window| window.iter().collect::<String>())
        .filter_map(|piece| {
            let trimmed = piece.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .collect()
}

fn push_trimmed(chunks: &mut Vec<String>, piece: &str) {
    let trimmed = piece.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_text_yields_no_chunks() {
        let config = ChunkConfig::new(100);
        assert_eq!(split_text_into_chunks("", &config), Vec::<String>::new());
        assert_eq!(
            split_text_into_chunks("  \n\n ", &config),
            Vec::<String>::new()
        );
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let config = ChunkConfig::new(100);
        let chunks = split_text_into_chunks("hello world", &config);
        assert_eq!(chunks, vec!["hello world".to_string()]);
    }

    #[test]
    fn splits_on_paragraphs_first() {
        let config = ChunkConfig::new(15);
        let text = "para1 line.\n\npara2 line.\n\npara3.";
        let chunks = split_text_into_chunks(text, &config);
        assert_eq!(chunks, vec!["para1 line.", "para2 line.", "para3."]);
    }

    #[test]
    fn word_split_reconstructs_with_delimiter() {
        let config = ChunkConfig::new(20);
        let text = "Alpha beta. Gamma delta. Epsilon zeta. Eta theta.";
        let chunks = split_text_into_chunks(text, &config);
        assert_eq!(
            chunks,
            vec!["Alpha beta. Gamma", "delta. Epsilon zeta.", "Eta theta."]
        );
        assert_eq!(chunks.join(" "), text);
    }

    #[test]
    fn chunks_respect_the_size_limit() {
        let config = ChunkConfig::new(20);
        let text = "Alpha beta. Gamma delta. Epsilon zeta. Eta theta.";
        for chunk in split_text_into_chunks(text, &config) {
            assert!(char_len(&chunk) <= 20, "oversized chunk: {chunk:?}");
        }
    }

    #[test]
    fn forced_delimiter_takes_precedence() {
        let config = ChunkConfig::new(1).with_force_delimiter("|");
        let chunks = split_text_into_chunks("a|b|c", &config);
        assert_eq!(chunks, vec!["a", "b", "c"]);
    }

    #[test]
    fn absent_forced_delimiter_falls_through() {
        let text = "Alpha beta. Gamma delta. Epsilon zeta. Eta theta.";
        let plain = split_text_into_chunks(text, &ChunkConfig::new(20));
        let forced =
            split_text_into_chunks(text, &ChunkConfig::new(20).with_force_delimiter("@@@"));
        assert_eq!(plain, forced);
    }

    #[test]
    fn unbroken_text_falls_back_to_characters() {
        let config = ChunkConfig::new(10);
        let text = "x".repeat(25);
        let chunks = split_text_into_chunks(&text, &config);
        assert_eq!(chunks, vec!["x".repeat(10), "x".repeat(10), "x".repeat(5)]);
    }

    #[test]
    fn multibyte_text_splits_on_char_boundaries() {
        let config = ChunkConfig::new(4);
        let text = "ααααααα";
        let chunks = split_text_into_chunks(text, &config);
        assert_eq!(chunks, vec!["αααα", "ααα"]);
    }

    #[test]
    fn chunking_is_deterministic() {
        let config = ChunkConfig::new(20).with_overlap_percent(50.0);
        let text = "Alpha beta. Gamma delta. Epsilon zeta. Eta theta.";
        assert_eq!(
            split_text_into_chunks(text, &config),
            split_text_into_chunks(text, &config)
        );
    }

    #[test]
    fn overlap_larger_than_chunk_size_is_clamped() {
        let config = ChunkConfig::new(10).with_overlap_percent(100.0);
        let chunks = split_text_into_chunks("a short sentence that must survive.", &config);
        assert!(!chunks.is_empty());
    }

    #[test]
    fn overlap_size_rounds_from_percentage() {
        assert_eq!(ChunkConfig::new(400).with_overlap_percent(10.0).overlap_size(), 40);
        assert_eq!(ChunkConfig::new(30).with_overlap_percent(25.0).overlap_size(), 8);
        assert_eq!(ChunkConfig::new(100).overlap_size(), 0);
    }
}
