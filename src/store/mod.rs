//! Remote Mailbox Store
//!
//! Narrow interface over the remote store's paged listing capability. The core
//! treats the store as opaque: it supplies folder pages filtered to
//! hierarchy-eligible (mail-class) folders, message pages scoped to a source
//! folder with an optional exclusion, and distinguished-folder lookups.
//! Failures propagate as [`SnapshotError::Fetch`].

pub mod http;

use crate::error::SnapshotError;
use crate::hierarchy::FolderNode;
use crate::page::{Page, PageCursor};
use crate::types::{FolderId, MessageId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Follow-up flag state of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagStatus {
    NotFlagged,
    Flagged,
    Complete,
}

/// A raw message as returned by the remote listing, before folder attribution.
///
/// Produced transiently by the enumerator and handed to the projector; not
/// retained by the core.
#[derive(Debug, Clone)]
pub struct RawMessage {
    pub id: MessageId,
    pub parent_folder_id: FolderId,
    pub received_at: DateTime<Utc>,
    pub subject: String,
    pub flag: FlagStatus,
    pub completed_at: Option<DateTime<Utc>>,
    pub is_read: bool,
}

/// Which messages a message-page fetch covers: everything under one source
/// folder, minus an optionally excluded folder (junk).
#[derive(Debug, Clone)]
pub struct MessageScope {
    pub source_folder: FolderId,
    pub excluded_folder: Option<FolderId>,
}

/// Remote paged-listing capability, for both folder-typed and message-typed
/// collections.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetch one page of hierarchy-eligible folders, deep-traversed from the
    /// message-folder root.
    async fn fetch_folder_page(
        &self,
        cursor: PageCursor,
        page_size: usize,
    ) -> Result<Page<FolderNode>, SnapshotError>;

    /// Fetch one page of messages within the given scope.
    async fn fetch_message_page(
        &self,
        scope: &MessageScope,
        cursor: PageCursor,
        page_size: usize,
    ) -> Result<Page<RawMessage>, SnapshotError>;

    /// Find folders whose display name matches exactly. Returns all matches;
    /// callers needing a distinguished folder enforce the exactly-one
    /// contract themselves.
    async fn find_folders_by_name(&self, display_name: &str)
        -> Result<Vec<FolderNode>, SnapshotError>;

    /// Id of the well-known junk folder.
    async fn junk_folder_id(&self) -> Result<FolderId, SnapshotError>;
}

/// Resolve a folder expected to exist exactly once by display name.
///
/// Zero matches is `FolderNotFound`, more than one is `AmbiguousFolder`;
/// the result set is never indexed blindly.
pub async fn resolve_single_folder<S: RemoteStore + ?Sized>(
    store: &S,
    display_name: &str,
) -> Result<FolderNode, SnapshotError> {
    let mut matches = store.find_folders_by_name(display_name).await?;
    match matches.len() {
        0 => Err(SnapshotError::FolderNotFound(display_name.to_string())),
        1 => Ok(matches.remove(0)),
        count => Err(SnapshotError::AmbiguousFolder {
            name: display_name.to_string(),
            count,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    /// Store exposing only the name lookup; the paged listings are unused by
    /// these tests.
    struct NamedFolders {
        folders: Vec<FolderNode>,
    }

    #[async_trait]
    impl RemoteStore for NamedFolders {
        async fn fetch_folder_page(
            &self,
            _cursor: PageCursor,
            _page_size: usize,
        ) -> Result<Page<FolderNode>, SnapshotError> {
            Ok(Page::last(Vec::new()))
        }

        async fn fetch_message_page(
            &self,
            _scope: &MessageScope,
            _cursor: PageCursor,
            _page_size: usize,
        ) -> Result<Page<RawMessage>, SnapshotError> {
            Ok(Page::last(Vec::new()))
        }

        async fn find_folders_by_name(
            &self,
            display_name: &str,
        ) -> Result<Vec<FolderNode>, SnapshotError> {
            Ok(self
                .folders
                .iter()
                .filter(|f| f.display_name == display_name)
                .cloned()
                .collect())
        }

        async fn junk_folder_id(&self) -> Result<FolderId, SnapshotError> {
            Ok("junk".to_string())
        }
    }

    fn named(id: &str, name: &str) -> FolderNode {
        FolderNode {
            id: id.to_string(),
            parent_id: None,
            display_name: name.to_string(),
        }
    }

    #[test]
    fn test_single_match_resolves() {
        let store = NamedFolders {
            folders: vec![named("f1", "AllItems"), named("f2", "Inbox")],
        };
        let folder = block_on(resolve_single_folder(&store, "AllItems")).unwrap();
        assert_eq!(folder.id, "f1");
    }

    #[test]
    fn test_zero_matches_is_not_found() {
        let store = NamedFolders { folders: vec![] };
        let err = block_on(resolve_single_folder(&store, "AllItems")).unwrap_err();
        assert!(matches!(err, SnapshotError::FolderNotFound(name) if name == "AllItems"));
    }

    #[test]
    fn test_multiple_matches_is_ambiguous() {
        let store = NamedFolders {
            folders: vec![named("f1", "AllItems"), named("f2", "AllItems")],
        };
        let err = block_on(resolve_single_folder(&store, "AllItems")).unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::AmbiguousFolder { count: 2, .. }
        ));
    }
}
