//! Current candidate list of a surface.

use std::sync::Arc;

use shopsearch_core::{SearchError, SuggestionEntry};

use crate::source::{SourceKind, SuggestionSource};

/// What the surface knows about results for the current query.
///
/// `Ready(vec![])` ("no results found") is deliberately distinct from `Idle`
/// ("nothing searched yet").
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ResultsState {
    /// No query has produced results yet, or the query is below threshold.
    #[default]
    Idle,
    /// A search finished with this list.
    Ready(Vec<SuggestionEntry>),
}

/// Holds the ordered candidate list and the source that produces it.
pub struct SuggestionIndex {
    source: Arc<dyn SuggestionSource>,
    state: ResultsState,
    loading: bool,
    max_results: Option<usize>,
}

impl SuggestionIndex {
    pub fn new(source: Arc<dyn SuggestionSource>) -> Self {
        Self {
            source,
            state: ResultsState::Idle,
            loading: false,
            max_results: None,
        }
    }

    /// Keep at most `max` entries, in source order.
    pub fn with_max_results(mut self, max: Option<usize>) -> Self {
        self.max_results = max;
        self
    }

    /// Shared handle to the source, for dispatching.
    pub fn source(&self) -> Arc<dyn SuggestionSource> {
        self.source.clone()
    }

    pub fn source_kind(&self) -> SourceKind {
        self.source.kind()
    }

    /// Mark a dispatch as pending. The current list stays visible.
    pub fn begin_search(&mut self) {
        self.loading = true;
    }

    /// Replace the list with a search outcome.
    ///
    /// Failures become an empty list; the error is logged, never returned.
    /// Returns the new list length.
    pub fn finish_search(
        &mut self,
        query: &str,
        result: Result<Vec<SuggestionEntry>, SearchError>,
    ) -> usize {
        self.loading = false;

        let mut entries = match result {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Search for {:?} failed: {}", query, e);
                Vec::new()
            }
        };

        if let Some(max) = self.max_results {
            entries.truncate(max);
        }

        tracing::debug!("Query {:?} produced {} suggestions", query, entries.len());
        let len = entries.len();
        self.state = ResultsState::Ready(entries);
        len
    }

    /// Drop the list and return to the untouched state.
    pub fn clear(&mut self) {
        self.state = ResultsState::Idle;
        self.loading = false;
    }

    pub fn state(&self) -> &ResultsState {
        &self.state
    }

    /// Current entries; empty when idle.
    pub fn entries(&self) -> &[SuggestionEntry] {
        match &self.state {
            ResultsState::Idle => &[],
            ResultsState::Ready(entries) => entries,
        }
    }

    pub fn get(&self, index: usize) -> Option<&SuggestionEntry> {
        self.entries().get(index)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// A search finished and matched nothing.
    pub fn is_no_results(&self) -> bool {
        matches!(&self.state, ResultsState::Ready(entries) if entries.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::LocalSuggestionSource;

    fn index() -> SuggestionIndex {
        SuggestionIndex::new(Arc::new(LocalSuggestionSource::new(Vec::new())))
    }

    fn laptops() -> Vec<SuggestionEntry> {
        vec![
            SuggestionEntry::new(1u64, "Laptop"),
            SuggestionEntry::new(2u64, "Laptop Stand"),
            SuggestionEntry::new(3u64, "Laptop Sleeve"),
        ]
    }

    #[test]
    fn test_initial_state_is_idle_not_empty_results() {
        let index = index();
        assert_eq!(index.state(), &ResultsState::Idle);
        assert!(index.is_empty());
        assert!(!index.is_no_results());
    }

    #[test]
    fn test_empty_result_is_explicit_no_results() {
        let mut index = index();
        index.begin_search();
        assert!(index.is_loading());

        let len = index.finish_search("xyz123notfound", Ok(Vec::new()));
        assert_eq!(len, 0);
        assert!(!index.is_loading());
        assert!(index.is_no_results());
    }

    #[test]
    fn test_failure_becomes_empty_list() {
        let mut index = index();
        index.finish_search("laptop", Ok(laptops()));
        index.begin_search();

        let len = index.finish_search(
            "laptops",
            Err(SearchError::Transport("connection reset".to_string())),
        );
        assert_eq!(len, 0);
        assert!(!index.is_loading());
        assert!(index.is_no_results());
    }

    #[test]
    fn test_list_is_replaced_wholesale() {
        let mut index = index();
        index.finish_search("lap", Ok(laptops()));
        assert_eq!(index.len(), 3);
        assert_eq!(index.get(1).unwrap().label, "Laptop Stand");

        index.finish_search("laptop s", Ok(laptops()[1..].to_vec()));
        assert_eq!(index.len(), 2);
        assert_eq!(index.get(0).unwrap().label, "Laptop Stand");
    }

    #[test]
    fn test_max_results_keeps_source_order() {
        let mut index = index().with_max_results(Some(2));
        index.finish_search("lap", Ok(laptops()));
        let labels: Vec<_> = index.entries().iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["Laptop", "Laptop Stand"]);
    }

    #[test]
    fn test_clear_returns_to_idle() {
        let mut index = index();
        index.finish_search("lap", Ok(laptops()));
        index.clear();
        assert_eq!(index.state(), &ResultsState::Idle);
        assert_eq!(index.source_kind(), SourceKind::Local);
    }
}
