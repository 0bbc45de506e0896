//! File attachment extraction.
//!
//! Reads attachment contents through the [`AttachmentStore`] boundary.
//! Paths are fetched concurrently but results are reassembled in input
//! order; a failure reading one path is captured as a skipped item and
//! never aborts extraction of the others.

use std::path::PathBuf;

use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::content::Content;
use crate::error::{ExtractError, Result};

/// External attachment store boundary.
///
/// `Ok(None)` means the path has no stored attachment; errors mean the
/// read itself failed. The file extractor recovers from both per path.
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    async fn get_file_attachment(&self, path: &str) -> Result<Option<String>>;
}

/// Attachment store backed by the local filesystem, resolving paths
/// relative to a root directory.
pub struct FsAttachmentStore {
    root: PathBuf,
}

impl FsAttachmentStore {
    /// Create a store rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl AttachmentStore for FsAttachmentStore {
    async fn get_file_attachment(&self, path: &str) -> Result<Option<String>> {
        let full = self.root.join(path.trim_start_matches('/'));
        match tokio::fs::read_to_string(&full).await {
            Ok(text) => Ok(Some(text)),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(ExtractError::Attachment {
                path: path.to_string(),
                message: error.to_string(),
            }),
        }
    }
}

/// A source item that produced no content, with the reason it was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedItem {
    /// Identifier of the skipped source item (the path, for files).
    pub id: String,

    /// Why the item was skipped.
    pub reason: String,
}

/// Aggregated result of an extraction call.
///
/// Per-item failures are modeled as skipped items rather than log output,
/// so callers and tests can assert on them directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionReport {
    /// Successfully extracted content, in source order.
    pub contents: Vec<Content>,

    /// Items that yielded no content.
    pub skipped: Vec<SkippedItem>,
}

impl ExtractionReport {
    /// Wrap already-extracted content with no skipped items.
    pub fn from_contents(contents: Vec<Content>) -> Self {
        Self {
            contents,
            skipped: Vec::new(),
        }
    }
}

/// Extract content from a list of file paths.
///
/// All paths are fetched concurrently and joined before returning, so one
/// slow or failing path cannot block or lose the others. Output preserves
/// input-list order; failed reads produce a gap, never a reordering. This
/// function never fails as a whole.
pub async fn extract_files(store: &dyn AttachmentStore, paths: &[String]) -> ExtractionReport {
    let fetches = paths
        .iter()
        .map(|path| store.get_file_attachment(path));
    let results = join_all(fetches).await;

    let mut report = ExtractionReport::default();
    for (path, result) in paths.iter().zip(results) {
        match result {
            Ok(Some(text)) => {
                debug!(path, bytes = text.len(), "extracted file attachment");
                report.contents.push(Content::from_file(path.clone(), text));
            }
            Ok(None) => {
                warn!(path, "attachment not found, skipping");
                report.skipped.push(SkippedItem {
                    id: path.clone(),
                    reason: "attachment not found".to_string(),
                });
            }
            Err(error) => {
                warn!(path, %error, "attachment read failed, skipping");
                report.skipped.push(SkippedItem {
                    id: path.clone(),
                    reason: error.to_string(),
                });
            }
        }
    }
    report
}
