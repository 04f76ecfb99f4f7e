//! Snapshot Run Orchestration
//!
//! Drives the two-phase extraction pipeline: phase one enumerates
//! hierarchy-eligible folders and builds the path table; phase two streams
//! messages, projects each against the table, and writes one JSON record per
//! line. Structural errors abort the run; unknown-folder attribution is
//! counted per message and never retracts already-emitted output.

use crate::config::ExtractionConfig;
use crate::error::SnapshotError;
use crate::hierarchy::{FolderGraphBuilder, FolderNode, PathTable};
use crate::page::{Page, PageCursor, PageFetcher, PaginatedEnumerator};
use crate::project::MessageProjector;
use crate::store::{resolve_single_folder, MessageScope, RawMessage, RemoteStore};
use async_trait::async_trait;
use futures::{pin_mut, StreamExt};
use serde::Serialize;
use std::io::Write;
use tracing::{error, info, warn};

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub folders: usize,
    pub messages_emitted: usize,
    pub messages_skipped: usize,
}

/// Adapts the store's folder listing to the [`PageFetcher`] contract.
struct FolderPages<'a, S: ?Sized> {
    store: &'a S,
}

#[async_trait]
impl<'a, S> PageFetcher for FolderPages<'a, S>
where
    S: RemoteStore + ?Sized,
{
    type Item = FolderNode;

    async fn fetch_page(
        &self,
        cursor: PageCursor,
        page_size: usize,
    ) -> Result<Page<FolderNode>, SnapshotError> {
        self.store.fetch_folder_page(cursor, page_size).await
    }
}

/// Adapts the store's message listing, scoped to one source folder, to the
/// [`PageFetcher`] contract.
struct MessagePages<'a, S: ?Sized> {
    store: &'a S,
    scope: MessageScope,
}

#[async_trait]
impl<'a, S> PageFetcher for MessagePages<'a, S>
where
    S: RemoteStore + ?Sized,
{
    type Item = RawMessage;

    async fn fetch_page(
        &self,
        cursor: PageCursor,
        page_size: usize,
    ) -> Result<Page<RawMessage>, SnapshotError> {
        self.store
            .fetch_message_page(&self.scope, cursor, page_size)
            .await
    }
}

/// One extraction run over a remote store.
pub struct SnapshotRunner<'a, S: RemoteStore + ?Sized> {
    store: &'a S,
    settings: ExtractionConfig,
}

impl<'a, S: RemoteStore + ?Sized> SnapshotRunner<'a, S> {
    pub fn new(store: &'a S, settings: ExtractionConfig) -> Self {
        SnapshotRunner { store, settings }
    }

    /// Run both phases, writing one JSON record per message to `out`.
    pub async fn run<W: Write>(&self, out: &mut W) -> Result<RunSummary, SnapshotError> {
        let table = self.load_hierarchy().await.map_err(|err| {
            error!(phase = "hierarchy", %err, "hierarchy load failed");
            err
        })?;
        self.stream_messages(&table, out).await.map_err(|err| {
            error!(phase = "messages", %err, "message streaming failed");
            err
        })
    }

    /// Phase one: enumerate folders to exhaustion and build the path table.
    pub async fn load_hierarchy(&self) -> Result<PathTable, SnapshotError> {
        info!("loading folder hierarchy");
        let enumerator = PaginatedEnumerator::new(
            FolderPages { store: self.store },
            self.settings.folder_page_size,
        );
        let stream = enumerator.stream();
        pin_mut!(stream);
        let builder = FolderGraphBuilder::collect(stream).await?;
        let table = builder.into_path_table();
        info!(folders = table.len(), "path table built");
        Ok(table)
    }

    /// Phase two: stream messages, join them against the path table, and
    /// write one JSON line per record.
    pub async fn stream_messages<W: Write>(
        &self,
        table: &PathTable,
        out: &mut W,
    ) -> Result<RunSummary, SnapshotError> {
        let source = resolve_single_folder(self.store, &self.settings.all_items_folder).await?;
        let excluded_folder = if self.settings.exclude_junk {
            Some(self.store.junk_folder_id().await?)
        } else {
            None
        };
        info!(source = %source.display_name, exclude_junk = self.settings.exclude_junk, "streaming messages");

        let enumerator = PaginatedEnumerator::new(
            MessagePages {
                store: self.store,
                scope: MessageScope {
                    source_folder: source.id,
                    excluded_folder,
                },
            },
            self.settings.message_page_size,
        );
        let projector = MessageProjector::new(table);
        let mut summary = RunSummary {
            folders: table.len(),
            ..RunSummary::default()
        };

        let stream = enumerator.stream();
        pin_mut!(stream);
        while let Some(item) = stream.next().await {
            match projector.project(item?) {
                Ok(record) => {
                    serde_json::to_writer(&mut *out, &record)?;
                    out.write_all(b"\n")?;
                    summary.messages_emitted += 1;
                }
                Err(err) if err.is_message_scoped() => {
                    warn!(%err, "skipping message with unresolved folder");
                    summary.messages_skipped += 1;
                }
                Err(err) => return Err(err),
            }
        }

        info!(
            emitted = summary.messages_emitted,
            skipped = summary.messages_skipped,
            "message streaming complete"
        );
        Ok(summary)
    }
}
