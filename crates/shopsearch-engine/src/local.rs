//! In-memory suggestion source for static menus.

use std::sync::Arc;

use futures::future;
use shopsearch_core::{MatchFields, MenuEntry, SuggestionEntry};

use crate::source::{SearchFuture, SourceKind, SuggestionSource};

/// Filters a fixed list of entries by case-insensitive substring match.
///
/// Matches keep source order; nothing is re-ranked.
#[derive(Debug, Clone)]
pub struct LocalSuggestionSource {
    entries: Arc<Vec<SuggestionEntry>>,
    fields: MatchFields,
}

impl LocalSuggestionSource {
    /// Create a source over a flat list of entries.
    pub fn new(entries: Vec<SuggestionEntry>) -> Self {
        Self {
            entries: Arc::new(entries),
            fields: MatchFields::default(),
        }
    }

    /// Create a source from a menu tree, flattened depth-first.
    pub fn from_menu(menu: &[MenuEntry]) -> Self {
        let mut entries = Vec::new();
        for node in menu {
            node.flatten(&mut entries);
        }
        tracing::debug!("Flattened menu into {} entries", entries.len());
        Self::new(entries)
    }

    /// Set which fields are matched.
    pub fn with_fields(mut self, fields: MatchFields) -> Self {
        self.fields = fields;
        self
    }

    /// Filter synchronously.
    pub fn filter(&self, query: &str) -> Vec<SuggestionEntry> {
        if query.is_empty() {
            return Vec::new();
        }
        let needle = query.to_lowercase();
        self.entries
            .iter()
            .filter(|entry| entry.matches(&needle, self.fields))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SuggestionSource for LocalSuggestionSource {
    fn search(&self, query: String) -> SearchFuture {
        Box::pin(future::ready(Ok(self.filter(&query))))
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Local
    }
}
