//! Folder Hierarchy Reconstruction
//!
//! Rebuilds full folder paths from a flat collection of parent-linked folder
//! records fetched in unspecified order. Pagination gives no ordering guarantee
//! between parents and children (a parent may arrive on a later page than its
//! child), so the full node set is materialized before any path is resolved.
//! Traversal tolerates missing and cyclic parent references.

use crate::error::SnapshotError;
use crate::types::FolderId;
use futures::stream::{Stream, StreamExt};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Path separator for fully-qualified folder paths.
pub const PATH_SEPARATOR: char = '/';

/// A folder-like node with an id, optional parent id, and display name.
///
/// Immutable after creation; held only for the duration of path computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderNode {
    pub id: FolderId,
    pub parent_id: Option<FolderId>,
    pub display_name: String,
}

/// Materializes the full set of hierarchy-eligible folder records needed
/// before any path can be resolved.
#[derive(Debug, Default)]
pub struct FolderGraphBuilder {
    nodes: HashMap<FolderId, FolderNode>,
}

impl FolderGraphBuilder {
    pub fn new() -> Self {
        FolderGraphBuilder {
            nodes: HashMap::new(),
        }
    }

    /// Add one folder record.
    ///
    /// A record without an id is rejected with `InvalidNode`, failing the
    /// whole build. Seeing an id twice within one enumeration pass is a
    /// `DuplicateId` error; the safer explicit policy over last-wins
    /// overwriting.
    pub fn insert(&mut self, node: FolderNode) -> Result<(), SnapshotError> {
        if node.id.is_empty() {
            return Err(SnapshotError::InvalidNode {
                display_name: node.display_name,
            });
        }
        if self.nodes.contains_key(&node.id) {
            return Err(SnapshotError::DuplicateId(node.id));
        }
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Drain a folder stream to completion, building the node map.
    ///
    /// This is the synchronization point between enumeration and path
    /// resolution: the stream must be exhausted before paths are computed.
    pub async fn collect<S>(mut stream: S) -> Result<Self, SnapshotError>
    where
        S: Stream<Item = Result<FolderNode, SnapshotError>> + Unpin,
    {
        let mut builder = FolderGraphBuilder::new();
        while let Some(node) = stream.next().await {
            builder.insert(node?)?;
        }
        debug!(folders = builder.len(), "folder graph materialized");
        Ok(builder)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Resolve the path of every node into a read-only [`PathTable`].
    pub fn into_path_table(self) -> PathTable {
        let mut resolver = PathResolver::new(&self.nodes);
        let paths = self
            .nodes
            .keys()
            .map(|id| (id.clone(), resolver.resolve(id)))
            .collect();
        PathTable { paths }
    }
}

/// Computes root-to-node display paths by walking parent links.
///
/// Resolution is a pure function of the immutable node map. Resolved paths are
/// memoized per queried node; the memo is deliberately not consulted mid-walk,
/// because splicing a memoized ancestor prefix into a walk that crosses a
/// cycle would make the result depend on resolution order.
pub struct PathResolver<'a> {
    nodes: &'a HashMap<FolderId, FolderNode>,
    memo: HashMap<FolderId, String>,
}

impl<'a> PathResolver<'a> {
    pub fn new(nodes: &'a HashMap<FolderId, FolderNode>) -> Self {
        PathResolver {
            nodes,
            memo: HashMap::new(),
        }
    }

    /// Resolve the display path of the node with the given id.
    ///
    /// Walks parent links upward, collecting display names. The walk stops at
    /// a node without a parent id, at a parent id absent from the map, or when
    /// a visited id reappears (cycle guard), so it terminates after at most
    /// one step per distinct node and returns the best-effort partial path.
    ///
    /// The id must be present in the node map this resolver was built over.
    pub fn resolve(&mut self, id: &FolderId) -> String {
        if let Some(done) = self.memo.get(id) {
            return done.clone();
        }
        let Some(node) = self.nodes.get(id) else {
            return String::new();
        };

        let mut names = vec![node.display_name.clone()];
        let mut visited: HashSet<&FolderId> = HashSet::new();
        visited.insert(&node.id);
        let mut current = node;

        let path = loop {
            let Some(parent_id) = current.parent_id.as_ref() else {
                // Hierarchy root as far as the map knows.
                break join_reversed(names);
            };
            let Some(parent) = self.nodes.get(parent_id) else {
                // Parent was never enumerated; path is rooted at this
                // unreachable point.
                break join_reversed(names);
            };
            if !visited.insert(&parent.id) {
                debug!(folder = %id, "parent cycle detected, returning partial path");
                break join_reversed(names);
            }
            names.push(parent.display_name.clone());
            current = parent;
        };

        self.memo.insert(id.clone(), path.clone());
        path
    }
}

fn join_reversed(mut names: Vec<String>) -> String {
    names.reverse();
    names.join(&PATH_SEPARATOR.to_string())
}

/// Read-only mapping from folder id to fully-qualified display path.
///
/// Built once per extraction run and passed explicitly to consumers; safe to
/// share across concurrent lookups. Must be rebuilt if the underlying
/// hierarchy changes, since the source provides no incremental-update signal.
#[derive(Debug, Clone, Default)]
pub struct PathTable {
    paths: HashMap<FolderId, String>,
}

impl PathTable {
    pub fn get(&self, id: &str) -> Option<&str> {
        self.paths.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
