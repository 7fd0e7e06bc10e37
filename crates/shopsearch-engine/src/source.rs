//! Suggestion sources.
//!
//! A source turns a query into an ordered list of entries. Sources return
//! boxed `'static` futures so the debouncer can spawn, delay and abort them
//! without borrowing the source.

use futures::future::BoxFuture;
use shopsearch_core::{SearchError, SuggestionEntry};

/// Future produced by a source for one query.
pub type SearchFuture = BoxFuture<'static, Result<Vec<SuggestionEntry>, SearchError>>;

/// Where a source's matches come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// A backend search endpoint. Result order is the server's.
    Remote,
    /// A fixed in-memory list filtered on the client.
    Local,
}

/// Capability "produce matches for a query".
///
/// An empty query yields an empty list by convention, never an error.
#[cfg_attr(test, mockall::automock)]
pub trait SuggestionSource: Send + Sync {
    /// Produce matches for `query`. The query is used verbatim.
    fn search(&self, query: String) -> SearchFuture;

    /// Which variant this source is.
    fn kind(&self) -> SourceKind;
}
