//! Sentence-trimmed overlap blending between adjacent chunks.
//!
//! Each chunk may carry up to half the configured overlap size from the end
//! of its predecessor and the start of its successor. Carried text is
//! trimmed to sentence boundaries so chunk edges never cut mid-sentence.

use serde::{Deserialize, Serialize};

use crate::splitter::char_len;

/// Characters treated as sentence terminators when trimming overlap.
const SENTENCE_TERMINATORS: [char; 4] = ['.', '!', '?', '\n'];

/// A chunk produced by a single chunking invocation.
///
/// `text` is the final overlap-blended chunk; `start_overlap` and
/// `end_overlap` record the sentence-trimmed carry-over substrings blended
/// into it. Indices are 0-based and contiguous for a fixed input and
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// The chunk text, including any blended overlap.
    pub text: String,

    /// Sentence-trimmed carry-over from the end of the previous chunk.
    pub start_overlap: String,

    /// Sentence-trimmed carry-over from the start of the next chunk.
    pub end_overlap: String,

    /// Position of this chunk within the invocation.
    pub index: usize,

    /// Total number of chunks produced by the invocation.
    pub total_chunks: usize,
}

/// Blend overlap into a list of base chunks.
///
/// With `overlap_size == 0` the base chunks pass through untouched. The
/// first chunk never receives a start overlap and the last never receives
/// an end overlap; empty overlap pieces are omitted without introducing a
/// stray separator.
pub(crate) fn blend_overlap(base: Vec<String>, overlap_size: usize) -> Vec<ChunkRecord> {
    let total_chunks = base.len();
    let half_overlap = overlap_size / 2;

    base.iter()
        .enumerate()
        .map(|(index, chunk)| {
            let start_overlap = if half_overlap > 0 && index > 0 {
                trim_to_start_sentence(last_chars(&base[index - 1], half_overlap))
            } else {
                String::new()
            };
            let end_overlap = if half_overlap > 0 && index + 1 < total_chunks {
                trim_to_end_sentence(first_chars(&base[index + 1], half_overlap))
            } else {
                String::new()
            };

            let text = [start_overlap.as_str(), chunk, end_overlap.as_str()]
                .iter()
                .filter(|part| !part.is_empty())
                .copied()
                .collect::<Vec<_>>()
                .join(" ");

            ChunkRecord {
                text,
                start_overlap,
                end_overlap,
                index,
                total_chunks,
            }
        })
        .collect()
}

/// Trim forward to the nearest sentence start, discarding a leading
/// partial sentence. Returns an empty string when the input contains no
/// sentence boundary at all (the whole window is mid-sentence).
pub fn trim_to_start_sentence(input: &str) -> String {
    for (offset, ch) in input.char_indices() {
        if SENTENCE_TERMINATORS.contains(&ch) {
            return input[offset + ch.len_utf8()..].trim_start().to_string();
        }
    }
    String::new()
}

/// Trim backward to the nearest sentence end, discarding a trailing
/// partial sentence. Returns an empty string when the input contains no
/// sentence boundary at all.
pub fn trim_to_end_sentence(input: &str) -> String {
    for (offset, ch) in input.char_indices().rev() {
        if SENTENCE_TERMINATORS.contains(&ch) {
            return input[..offset + ch.len_utf8()].trim_end().to_string();
        }
    }
    String::new()
}

/// First `count` characters of `text` (not bytes).
fn first_chars(text: &str, count: usize) -> &str {
    match text.char_indices().nth(count) {
        Some((offset, _)) => &text[..offset],
        None => text,
    }
}

/// Last `count` characters of `text` (not bytes).
fn last_chars(text: &str, count: usize) -> &str {
    let len = char_len(text);
    if len <= count {
        return text;
    }
    match text.char_indices().nth(len - count) {
        Some((offset, _)) => &text[offset..],
        None => text,
    }
}
