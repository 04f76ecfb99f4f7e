//! Paginated Remote Enumeration
//!
//! Converts an offset/page-based remote listing capability into a single lazy,
//! forward-only sequence, hiding pagination mechanics from consumers. Each call
//! to [`PaginatedEnumerator::stream`] begins a fresh fetch loop from the initial
//! cursor; a produced stream may only be consumed once, forward.

use crate::error::SnapshotError;
use async_trait::async_trait;
use futures::stream::{self, Stream, StreamExt};

/// Opaque continuation marker for paginated fetches.
///
/// Owned by the enumerator; never surfaced to stream consumers. Fetcher
/// implementations read the current offset and advance it by the number of
/// items they return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor(usize);

impl PageCursor {
    /// Cursor pointing at the start of the collection.
    pub fn start() -> Self {
        PageCursor(0)
    }

    /// Offset of the next item to fetch.
    pub fn offset(&self) -> usize {
        self.0
    }

    /// Cursor advanced past `count` items.
    pub fn advance(&self, count: usize) -> Self {
        PageCursor(self.0 + count)
    }
}

/// One page of raw items plus continuation state.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Items of this page, in remote order.
    pub items: Vec<T>,
    /// Cursor for the following page; meaningless when `has_more` is false.
    pub next_cursor: PageCursor,
    /// Whether the remote source reports more data after this page.
    pub has_more: bool,
}

impl<T> Page<T> {
    /// A terminal page carrying the last batch of items.
    pub fn last(items: Vec<T>) -> Self {
        Page {
            items,
            next_cursor: PageCursor::start(),
            has_more: false,
        }
    }
}

/// One remote "list" call: given a cursor and a page size, return one page of
/// raw items plus continuation state.
#[async_trait]
pub trait PageFetcher {
    type Item;

    async fn fetch_page(
        &self,
        cursor: PageCursor,
        page_size: usize,
    ) -> Result<Page<Self::Item>, SnapshotError>;
}

/// Drives repeated [`PageFetcher`] calls, producing a single lazy sequence of
/// raw items until the remote source reports no more data.
pub struct PaginatedEnumerator<F> {
    fetcher: F,
    page_size: usize,
}

impl<F> PaginatedEnumerator<F>
where
    F: PageFetcher,
{
    pub fn new(fetcher: F, page_size: usize) -> Self {
        PaginatedEnumerator { fetcher, page_size }
    }

    /// Produce a fresh lazy stream of items starting from the initial cursor.
    ///
    /// Items of page k are yielded, in page order, strictly before any item of
    /// page k+1. The stream ends when the source reports `has_more == false`;
    /// an empty first page is an empty stream, not an error. A page fetch
    /// failure surfaces as a single `Err` item terminating the stream.
    pub fn stream(&self) -> impl Stream<Item = Result<F::Item, SnapshotError>> + '_ {
        stream::unfold(Some(PageCursor::start()), move |state| async move {
            let cursor = state?;
            match self.fetcher.fetch_page(cursor, self.page_size).await {
                Ok(page) => {
                    let next = page.has_more.then_some(page.next_cursor);
                    let items: Vec<Result<F::Item, SnapshotError>> =
                        page.items.into_iter().map(Ok).collect();
                    Some((stream::iter(items), next))
                }
                Err(err) => Some((stream::iter(vec![Err(err)]), None)),
            }
        })
        .flatten()
    }
}
