//! Error types for the snapshot pipeline.
//!
//! Structural errors (invalid or duplicate folder records) abort the
//! hierarchy-build phase; per-message errors (unknown folder attribution) are
//! isolated so one bad message does not prevent emission of the rest.

use crate::types::{FolderId, MessageId};
use thiserror::Error;

/// Crate-wide error enumeration
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// A page request to the remote store failed. Terminates the in-progress
    /// sequence; retries, if desired, are layered by the caller.
    #[error("page fetch failed: {0}")]
    Fetch(String),

    /// A folder record is missing its id; the whole hierarchy build fails
    /// rather than silently skipping, since a partial hierarchy produces
    /// silently wrong paths.
    #[error("folder record has no id (display name: {display_name:?})")]
    InvalidNode { display_name: String },

    /// The same folder id was observed twice within one enumeration pass.
    #[error("duplicate folder id within one enumeration pass: {0}")]
    DuplicateId(FolderId),

    /// A message's parent folder id has no entry in the path table. Reported
    /// per message; other messages may still resolve correctly.
    #[error("message {message_id} references unknown folder {folder_id}")]
    UnknownFolder {
        message_id: MessageId,
        folder_id: FolderId,
    },

    /// A distinguished folder lookup matched nothing.
    #[error("no folder named {0:?}")]
    FolderNotFound(String),

    /// A distinguished folder lookup expected exactly one match.
    #[error("expected exactly one folder named {name:?}, found {count}")]
    AmbiguousFolder { name: String, count: usize },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to encode output record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write output record: {0}")]
    Output(#[from] std::io::Error),

    #[error("runtime error: {0}")]
    Runtime(String),
}

impl SnapshotError {
    /// Whether this error is scoped to a single message rather than the whole
    /// run. Message-scoped errors are logged and counted instead of aborting
    /// the streaming phase.
    pub fn is_message_scoped(&self) -> bool {
        matches!(self, SnapshotError::UnknownFolder { .. })
    }
}

impl From<reqwest::Error> for SnapshotError {
    fn from(err: reqwest::Error) -> Self {
        SnapshotError::Fetch(err.to_string())
    }
}

impl From<config::ConfigError> for SnapshotError {
    fn from(err: config::ConfigError) -> Self {
        SnapshotError::Config(err.to_string())
    }
}
