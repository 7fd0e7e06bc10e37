//! Debounced query dispatch.
//!
//! Each keystroke cancels the previously scheduled dispatch before scheduling
//! a new one. Finished searches are delivered on a channel tagged with the
//! generation that produced them, so a result that slipped past cancellation
//! can still be recognised as stale when it arrives.

use std::sync::Arc;
use std::time::Duration;

use shopsearch_core::{
    SearchError, SuggestionEntry, DEFAULT_DEBOUNCE_MS, DEFAULT_MIN_QUERY_LENGTH,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use unicode_segmentation::UnicodeSegmentation;

use crate::source::SuggestionSource;

/// A finished search, tagged with the input generation that scheduled it.
#[derive(Debug)]
pub struct SearchCompletion {
    pub generation: u64,
    pub query: String,
    pub result: Result<Vec<SuggestionEntry>, SearchError>,
}

/// What `on_input` did with the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// Query too short: nothing scheduled, suggestions should be cleared now.
    Cleared,
    /// A dispatch is scheduled after the quiet period.
    Scheduled { generation: u64 },
}

/// Coalesces rapid keystrokes into one dispatch per quiet period.
///
/// Owned by one surface. Spawning requires a tokio runtime context.
pub struct QueryDebouncer {
    delay: Duration,
    min_query_length: usize,
    generation: u64,
    pending_query: String,
    handle: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<SearchCompletion>,
}

impl QueryDebouncer {
    /// Create a debouncer and the receiver its completions arrive on.
    pub fn new(
        delay: Duration,
        min_query_length: usize,
    ) -> (Self, mpsc::UnboundedReceiver<SearchCompletion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let debouncer = Self {
            delay,
            min_query_length,
            generation: 0,
            pending_query: String::new(),
            handle: None,
            tx,
        };
        (debouncer, rx)
    }

    /// Create with the default 300 ms delay and 2 character threshold.
    pub fn with_defaults() -> (Self, mpsc::UnboundedReceiver<SearchCompletion>) {
        Self::new(
            Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            DEFAULT_MIN_QUERY_LENGTH,
        )
    }

    /// Record `text` and schedule its dispatch, superseding anything pending.
    pub fn on_input(&mut self, text: &str, source: Arc<dyn SuggestionSource>) -> InputOutcome {
        self.cancel();
        self.pending_query = text.to_string();

        if text.graphemes(true).count() <= self.min_query_length {
            tracing::debug!("Query {:?} below threshold, clearing", text);
            return InputOutcome::Cleared;
        }

        let generation = self.generation;
        let delay = self.delay;
        let query = self.pending_query.clone();
        let tx = self.tx.clone();

        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tracing::debug!("Dispatching query {:?} (generation {})", query, generation);
            let result = source.search(query.clone()).await;
            let _ = tx.send(SearchCompletion {
                generation,
                query,
                result,
            });
        }));

        InputOutcome::Scheduled { generation }
    }

    /// Abort the pending dispatch and invalidate any in-flight result.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            if !handle.is_finished() {
                tracing::debug!("Cancelling dispatch for generation {}", self.generation);
            }
            handle.abort();
        }
        self.generation += 1;
    }

    /// Whether a scheduled dispatch has yet to deliver its completion.
    pub fn is_pending(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Whether a completion belongs to the most recent input.
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pending_query(&self) -> &str {
        &self.pending_query
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn min_query_length(&self) -> usize {
        self.min_query_length
    }
}

impl Drop for QueryDebouncer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
