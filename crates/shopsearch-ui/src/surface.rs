//! Search surface - one interactive suggestion overlay.
//!
//! Wires the debouncer, the suggestion index and the selection state machine
//! together and carries out the side effects selection transitions request.
//!
//! ## Flow
//!
//! ```text
//! input() ──► QueryDebouncer ──(quiet period)──► SuggestionSource
//!                                                     │
//! pump() ◄──────────── SearchCompletion ◄─────────────┘
//!   │  stale generation or closed surface: discarded
//!   ▼
//! SuggestionIndex ──► NavigableSelection ──► confirm ──► SelectionCallback
//! ```

use std::sync::Arc;

use shopsearch_core::{
    ConfigError, MenuEntry, SearchConfig, SelectionState, SuggestionEntry, SurfaceCommand,
    SurfaceId,
};
use shopsearch_engine::{
    BindingLease, HttpSuggestionSource, InputOutcome, KeyDispatch, KeyEvent, KeyboardHub,
    KeymapRegistry, LocalSuggestionSource, QueryDebouncer, ResultsState, SearchCompletion,
    ShellChannel, ShellEvent, SuggestionIndex, SuggestionSource,
};
use tokio::sync::mpsc;

use crate::model::{NavigableSelection, ScrollHandle, SelectionEffect, SurfaceView, Viewport};

// =============================================================================
// Selection Callback
// =============================================================================

/// Receives each confirmed selection exactly once.
///
/// The embedding application decides what selecting means (navigate to the
/// product page, open a dashboard route).
pub trait SelectionCallback: Send {
    fn on_suggestion_selected(&mut self, entry: SuggestionEntry);
}

impl<F> SelectionCallback for F
where
    F: FnMut(SuggestionEntry) + Send,
{
    fn on_suggestion_selected(&mut self, entry: SuggestionEntry) {
        self(entry)
    }
}

// =============================================================================
// Search Surface
// =============================================================================

/// One search-surface instance. Owns its query, list and selection
/// exclusively; nothing is shared between instances.
///
/// Must be driven from inside a tokio runtime.
pub struct SearchSurface {
    id: SurfaceId,
    query: String,
    debouncer: QueryDebouncer,
    completions: mpsc::UnboundedReceiver<SearchCompletion>,
    index: SuggestionIndex,
    selection: NavigableSelection,
    viewport: Viewport,
    scroll_handle: Option<Box<dyn ScrollHandle>>,
    keymap: Arc<KeymapRegistry>,
    hub: KeyboardHub,
    lease: Option<BindingLease>,
    on_select: Box<dyn SelectionCallback>,
    shell: Option<ShellChannel>,
}

impl SearchSurface {
    /// Create a closed surface.
    ///
    /// Fails only when the configured key binding overrides are invalid.
    pub fn new(
        source: Arc<dyn SuggestionSource>,
        config: &SearchConfig,
        hub: KeyboardHub,
        on_select: impl SelectionCallback + 'static,
    ) -> Result<Self, ConfigError> {
        let keymap = KeymapRegistry::from_overrides(&config.keymap)?;
        let (debouncer, completions) =
            QueryDebouncer::new(config.debounce(), config.min_query_length);
        let index = SuggestionIndex::new(source).with_max_results(config.max_results);

        let surface = Self {
            id: SurfaceId::new(),
            query: String::new(),
            debouncer,
            completions,
            index,
            selection: NavigableSelection::new(),
            viewport: Viewport::default(),
            scroll_handle: None,
            keymap: Arc::new(keymap),
            hub,
            lease: None,
            on_select: Box::new(on_select),
            shell: None,
        };
        tracing::debug!(
            "Surface {} created ({:?} source)",
            surface.id,
            surface.index.source_kind()
        );
        Ok(surface)
    }

    /// Surface over a static menu, matched on the configured `match_fields`.
    pub fn local(
        menu: &[MenuEntry],
        config: &SearchConfig,
        hub: KeyboardHub,
        on_select: impl SelectionCallback + 'static,
    ) -> Result<Self, ConfigError> {
        let source = LocalSuggestionSource::from_menu(menu).with_fields(config.match_fields());
        Self::new(Arc::new(source), config, hub, on_select)
    }

    /// Surface over the configured `[remote]` search endpoint.
    pub fn remote(
        config: &SearchConfig,
        hub: KeyboardHub,
        on_select: impl SelectionCallback + 'static,
    ) -> Result<Self, ConfigError> {
        let remote = config.remote.as_ref().ok_or(ConfigError::MissingRemote)?;
        let source = HttpSuggestionSource::new(remote)?;
        Self::new(Arc::new(source), config, hub, on_select)
    }

    /// Publish selections and closes on a shell channel.
    pub fn with_shell(mut self, shell: ShellChannel) -> Self {
        self.shell = Some(shell);
        self
    }

    /// Use a viewport matching the rendered list.
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    /// Forward scroll offsets to the rendered list.
    pub fn with_scroll_handle(mut self, handle: impl ScrollHandle + 'static) -> Self {
        self.scroll_handle = Some(Box::new(handle));
        self
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_open(&self) -> bool {
        self.selection.is_open()
    }

    pub fn selection_state(&self) -> SelectionState {
        self.selection.state()
    }

    pub fn suggestions(&self) -> &[SuggestionEntry] {
        self.index.entries()
    }

    pub fn highlighted_entry(&self) -> Option<&SuggestionEntry> {
        self.selection.index().and_then(|i| self.index.get(i))
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Render model for the current state.
    pub fn view(&self) -> SurfaceView<'_> {
        if !self.selection.is_open() {
            return SurfaceView::Hidden;
        }
        let loading = self.index.is_loading();
        match self.index.state() {
            ResultsState::Idle if loading => SurfaceView::Loading,
            ResultsState::Idle => SurfaceView::Hidden,
            ResultsState::Ready(entries) if entries.is_empty() => {
                if loading {
                    SurfaceView::Loading
                } else {
                    SurfaceView::NoResults
                }
            }
            ResultsState::Ready(entries) => SurfaceView::Suggestions {
                entries,
                highlighted: self.selection.index(),
                refreshing: loading,
            },
        }
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    /// Focus / open. Registers key bindings.
    pub fn open(&mut self) {
        let effects = self.selection.open();
        self.run_effects(effects);
    }

    /// Escape, click-away or explicit close. Full reset.
    pub fn close(&mut self) {
        let effects = self.selection.close();
        self.run_effects(effects);
    }

    /// The query text changed. Opens the surface if it was closed.
    pub fn input(&mut self, text: &str) {
        if !self.selection.is_open() {
            self.open();
        }
        self.query = text.to_string();

        match self.debouncer.on_input(text, self.index.source()) {
            InputOutcome::Cleared => {
                self.index.clear();
                self.selection.replace_list(0);
                self.reset_scroll();
            }
            InputOutcome::Scheduled { .. } => self.index.begin_search(),
        }
    }

    /// Apply a navigation command.
    pub fn command(&mut self, command: SurfaceCommand) {
        let effects = self.selection.apply(command);
        self.run_effects(effects);
    }

    /// Pointer hover over a row.
    pub fn highlight(&mut self, index: usize) {
        let effects = self.selection.highlight(index);
        self.run_effects(effects);
    }

    /// Handle a key from the global key stream.
    ///
    /// Returns `true` if the key was bound and consumed. Keys typed inside
    /// the search input are handled like any other.
    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        if self.lease.is_none() {
            return false;
        }
        let Some(command) = self.keymap.lookup(&event.keystroke) else {
            return false;
        };
        tracing::debug!(
            "Surface {}: {} ({:?}) -> {}",
            self.id,
            event.keystroke,
            event.origin,
            command
        );
        self.command(command);
        true
    }

    /// Handle a command routed by the [`KeyboardHub`].
    pub fn handle_dispatch(&mut self, dispatch: KeyDispatch) -> bool {
        if dispatch.surface != self.id || self.lease.is_none() {
            return false;
        }
        self.command(dispatch.command);
        true
    }

    // -------------------------------------------------------------------------
    // Search Results
    // -------------------------------------------------------------------------

    /// Wait for the next search to finish and apply it.
    ///
    /// Stale completions are skipped. Returns `true` once a current
    /// completion was applied, `false` as soon as no dispatch is left to wait
    /// for (query below threshold, surface closed).
    pub async fn pump(&mut self) -> bool {
        loop {
            // Checked before draining: a finished dispatch has already sent.
            let pending = self.debouncer.is_pending();
            match self.completions.try_recv() {
                Ok(completion) => {
                    if self.apply_completion(completion) {
                        return true;
                    }
                    continue;
                }
                Err(_) if !pending => return false,
                Err(_) => {}
            }
            match self.completions.recv().await {
                Some(completion) => {
                    if self.apply_completion(completion) {
                        return true;
                    }
                }
                None => return false,
            }
        }
    }

    /// Apply every completion that has already arrived, without waiting.
    ///
    /// Returns how many were applied.
    pub fn try_pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.completions.try_recv() {
            if self.apply_completion(completion) {
                applied += 1;
            }
        }
        applied
    }

    fn apply_completion(&mut self, completion: SearchCompletion) -> bool {
        if !self.selection.is_open() {
            tracing::debug!(
                "Surface {}: discarding result for {:?} after close",
                self.id,
                completion.query
            );
            return false;
        }
        if !self.debouncer.is_current(completion.generation) {
            tracing::debug!(
                "Surface {}: discarding stale result for {:?} (generation {})",
                self.id,
                completion.query,
                completion.generation
            );
            return false;
        }

        let len = self.index.finish_search(&completion.query, completion.result);
        self.selection.replace_list(len);
        self.reset_scroll();
        true
    }

    // -------------------------------------------------------------------------
    // Effects
    // -------------------------------------------------------------------------

    /// Back to the top of a fresh list, in the model and the rendered list.
    fn reset_scroll(&mut self) {
        if self.viewport.offset() == 0.0 {
            return;
        }
        self.viewport.reset();
        if let Some(handle) = self.scroll_handle.as_mut() {
            handle.scroll_to(0.0);
        }
    }

    fn run_effects(&mut self, effects: Vec<SelectionEffect>) {
        for effect in effects {
            match effect {
                SelectionEffect::AcquireBindings => {
                    self.lease = Some(self.hub.register(self.id, self.keymap.clone()));
                }
                SelectionEffect::Commit(index) => self.commit(index),
                SelectionEffect::ClearQuery => self.query.clear(),
                SelectionEffect::ClearSuggestions => {
                    self.index.clear();
                    self.reset_scroll();
                }
                SelectionEffect::CancelPending => self.debouncer.cancel(),
                SelectionEffect::ReleaseBindings => {
                    self.lease = None;
                    if let Some(shell) = &self.shell {
                        shell.publish(ShellEvent::SurfaceClosed { surface: self.id });
                    }
                }
                SelectionEffect::ScrollIntoView(index) => {
                    if let Some(offset) = self.viewport.scroll_into_view(index) {
                        if let Some(handle) = self.scroll_handle.as_mut() {
                            handle.scroll_to(offset);
                        }
                    }
                }
            }
        }
    }

    fn commit(&mut self, index: usize) {
        let Some(entry) = self.index.get(index).cloned() else {
            tracing::warn!("Surface {}: no suggestion at index {}", self.id, index);
            return;
        };
        tracing::debug!("Surface {}: selected {:?}", self.id, entry.label);

        if let Some(shell) = &self.shell {
            shell.publish(ShellEvent::SuggestionSelected {
                surface: self.id,
                entry: entry.clone(),
            });
        }
        self.on_select.on_suggestion_selected(entry);
    }
}

impl Drop for SearchSurface {
    fn drop(&mut self) {
        if self.lease.is_some() {
            tracing::debug!("Surface {} dropped while open", self.id);
        }
    }
}

// =============================================================================
// Scripted Source for Testing
// =============================================================================

#[cfg(test)]
pub mod mock {
    use super::*;
    use parking_lot::Mutex;
    use shopsearch_core::SearchError;
    use shopsearch_engine::{SearchFuture, SourceKind};
    use std::collections::HashMap;
    use std::time::Duration;

    type Scripted = (Duration, Result<Vec<SuggestionEntry>, SearchError>);

    /// Source answering from a script, with a per-query delay.
    #[derive(Default)]
    pub struct ScriptedSource {
        responses: Mutex<HashMap<String, Scripted>>,
        pub calls: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedSource {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(self, query: &str, entries: Vec<SuggestionEntry>) -> Self {
            self.respond_after(query, Duration::ZERO, Ok(entries))
        }

        pub fn respond_after(
            self,
            query: &str,
            delay: Duration,
            result: Result<Vec<SuggestionEntry>, SearchError>,
        ) -> Self {
            self.responses
                .lock()
                .insert(query.to_string(), (delay, result));
            self
        }
    }

    impl SuggestionSource for ScriptedSource {
        fn search(&self, query: String) -> SearchFuture {
            let (delay, result) = self
                .responses
                .lock()
                .get(&query)
                .cloned()
                .unwrap_or((Duration::ZERO, Ok(Vec::new())));
            self.calls.lock().push(query);

            Box::pin(async move {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                result
            })
        }

        fn kind(&self) -> SourceKind {
            SourceKind::Remote
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::mock::*;
    use super::*;
    use parking_lot::Mutex;
    use serde_json::json;
    use shopsearch_core::SearchError;
    use shopsearch_engine::{KeyOrigin, Keystroke, LocalSuggestionSource};
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    type Selected = Arc<Mutex<Vec<SuggestionEntry>>>;

    fn laptops() -> Vec<SuggestionEntry> {
        vec![
            SuggestionEntry::new(1u64, "Laptop"),
            SuggestionEntry::new(2u64, "Laptop Stand"),
        ]
    }

    fn surface_with(source: ScriptedSource, hub: &KeyboardHub) -> (SearchSurface, Selected) {
        let selected: Selected = Arc::default();
        let sink = selected.clone();
        let surface = SearchSurface::new(
            Arc::new(source),
            &SearchConfig::default(),
            hub.clone(),
            move |entry: SuggestionEntry| sink.lock().push(entry),
        )
        .unwrap();
        (surface, selected)
    }

    async fn pump(surface: &mut SearchSurface) -> bool {
        tokio::time::timeout(Duration::from_secs(10), surface.pump())
            .await
            .unwrap_or(false)
    }

    fn key(name: &str) -> KeyEvent {
        KeyEvent::in_input(name)
    }

    #[tokio::test(start_paused = true)]
    async fn test_end_to_end_select_laptop() {
        let hub = KeyboardHub::new();
        let source = ScriptedSource::new().respond("lap", laptops());
        let calls = source.calls.clone();
        let (mut surface, selected) = surface_with(source, &hub);

        surface.input("la");
        assert_eq!(surface.view(), SurfaceView::Hidden);
        assert!(surface.suggestions().is_empty());

        surface.input("lap");
        let started = tokio::time::Instant::now();
        assert!(pump(&mut surface).await);
        assert!(started.elapsed() >= Duration::from_millis(300));
        assert_eq!(*calls.lock(), vec!["lap".to_string()]);
        assert_eq!(surface.suggestions().len(), 2);
        assert_eq!(surface.selection_state().signed_index(), -1);

        assert!(surface.handle_key(&key("down")));
        assert_eq!(surface.highlighted_entry().unwrap().label, "Laptop");
        assert!(surface.handle_key(&key("down")));
        assert_eq!(surface.highlighted_entry().unwrap().label, "Laptop Stand");
        assert!(surface.handle_key(&key("up")));
        assert_eq!(surface.selection_state().index, Some(0));

        assert!(surface.handle_key(&key("enter")));
        let selected = selected.lock();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0], SuggestionEntry::new(1u64, "Laptop"));

        assert!(!surface.is_open());
        assert_eq!(surface.query(), "");
        assert!(surface.suggestions().is_empty());
        assert_eq!(hub.active_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_results_is_distinct_from_untouched() {
        let hub = KeyboardHub::new();
        let (mut surface, _) = surface_with(ScriptedSource::new(), &hub);

        surface.open();
        assert_eq!(surface.view(), SurfaceView::Hidden);

        surface.input("xyz123notfound");
        assert_eq!(surface.view(), SurfaceView::Loading);
        assert!(pump(&mut surface).await);
        assert_eq!(surface.view(), SurfaceView::NoResults);
        insta::assert_snapshot!(surface.view().to_string(), @"No results found");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_result_never_overwrites_newer_query() {
        let hub = KeyboardHub::new();
        let source = ScriptedSource::new()
            .respond_after(
                "abc",
                Duration::from_millis(1_000),
                Ok(vec![SuggestionEntry::new("old", "From abc")]),
            )
            .respond_after(
                "abcd",
                Duration::from_millis(10),
                Ok(vec![SuggestionEntry::new("new", "From abcd")]),
            );
        let calls = source.calls.clone();
        let (mut surface, _) = surface_with(source, &hub);

        surface.input("abc");
        // "abc" is now in flight.
        tokio::time::sleep(Duration::from_millis(350)).await;
        surface.input("abcd");

        assert!(pump(&mut surface).await);
        assert_eq!(surface.suggestions()[0].label, "From abcd");

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(surface.try_pump(), 0);
        assert_eq!(surface.suggestions()[0].label, "From abcd");
        assert_eq!(*calls.lock(), vec!["abc".to_string(), "abcd".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_generation_is_discarded_on_arrival() {
        let hub = KeyboardHub::new();
        let (mut surface, _) = surface_with(ScriptedSource::new(), &hub);

        surface.input("laptop");
        let stale = surface.debouncer.generation() - 1;
        let applied = surface.apply_completion(SearchCompletion {
            generation: stale,
            query: "lapto".to_string(),
            result: Ok(laptops()),
        });
        assert!(!applied);
        assert!(surface.suggestions().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_results_reset_highlight() {
        let hub = KeyboardHub::new();
        let source = ScriptedSource::new()
            .respond("lap", laptops())
            .respond("laptop", laptops());
        let (mut surface, _) = surface_with(source, &hub);

        surface.input("lap");
        pump(&mut surface).await;
        surface.command(SurfaceCommand::Last);
        assert_eq!(surface.selection_state().index, Some(1));

        surface.input("laptop");
        // Old list still shown while the new query is in flight.
        assert_eq!(surface.selection_state().index, Some(1));
        pump(&mut surface).await;
        assert_eq!(surface.selection_state().index, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shortening_below_threshold_clears_immediately() {
        let hub = KeyboardHub::new();
        let (mut surface, _) = surface_with(ScriptedSource::new().respond("lap", laptops()), &hub);

        surface.input("lap");
        pump(&mut surface).await;
        surface.command(SurfaceCommand::Next);

        surface.input("la");
        assert!(surface.suggestions().is_empty());
        assert_eq!(surface.selection_state().index, None);
        assert_eq!(surface.view(), SurfaceView::Hidden);
        assert!(surface.is_open());
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_without_highlight_is_noop() {
        let hub = KeyboardHub::new();
        let (mut surface, selected) =
            surface_with(ScriptedSource::new().respond("lap", laptops()), &hub);

        surface.input("lap");
        pump(&mut surface).await;

        let before = surface.selection_state();
        assert!(surface.handle_key(&key("enter")));
        assert!(selected.lock().is_empty());
        assert_eq!(surface.selection_state(), before);
        assert_eq!(surface.query(), "lap");
        assert_eq!(surface.suggestions().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_escape_resets_and_discards_in_flight() {
        let hub = KeyboardHub::new();
        let shell = ShellChannel::new();
        let mut events = shell.subscribe();
        let source = ScriptedSource::new().respond_after(
            "laptop",
            Duration::from_millis(500),
            Ok(laptops()),
        );
        let (surface, selected) = surface_with(source, &hub);
        let mut surface = surface.with_shell(shell);

        surface.input("laptop");
        tokio::time::sleep(Duration::from_millis(350)).await;
        assert_eq!(hub.active_count(), 1);

        assert!(surface.handle_key(&KeyEvent::new(Keystroke::key("escape"), KeyOrigin::TextInput)));
        assert!(!surface.is_open());
        assert_eq!(surface.query(), "");
        assert_eq!(hub.active_count(), 0);
        assert_eq!(
            events.try_recv().unwrap(),
            ShellEvent::SurfaceClosed { surface: surface.id() }
        );

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(surface.try_pump(), 0);
        assert!(surface.suggestions().is_empty());
        assert!(selected.lock().is_empty());

        // Keys are no longer consumed once closed.
        assert!(!surface.handle_key(&key("down")));

        // Reopening starts from scratch.
        surface.open();
        assert_eq!(surface.view(), SurfaceView::Hidden);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_failure_shows_empty_results() {
        let hub = KeyboardHub::new();
        let source = ScriptedSource::new().respond_after(
            "laptop",
            Duration::ZERO,
            Err(SearchError::Status {
                status: 500,
                body: "boom".to_string(),
            }),
        );
        let (mut surface, _) = surface_with(source, &hub);

        surface.input("laptop");
        assert!(pump(&mut surface).await);
        assert_eq!(surface.view(), SurfaceView::NoResults);
        assert!(surface.is_open());
    }

    #[tokio::test(start_paused = true)]
    async fn test_highlight_scrolls_into_view() {
        let hub = KeyboardHub::new();
        let many: Vec<_> = (1..=6u64)
            .map(|i| SuggestionEntry::new(i, format!("Laptop {i}")))
            .collect();
        let offsets = Arc::new(Mutex::new(Vec::new()));
        let sink = offsets.clone();
        let (surface, _) = surface_with(ScriptedSource::new().respond("lap", many), &hub);
        let mut surface = surface
            .with_viewport(Viewport::new(80.0, 40.0))
            .with_scroll_handle(move |offset: f32| sink.lock().push(offset));

        surface.input("lap");
        pump(&mut surface).await;

        surface.command(SurfaceCommand::Next);
        surface.command(SurfaceCommand::Next);
        assert!(offsets.lock().is_empty());

        surface.command(SurfaceCommand::Next);
        assert_eq!(*offsets.lock(), vec![40.0]);

        surface.command(SurfaceCommand::First);
        assert_eq!(*offsets.lock(), vec![40.0, 0.0]);
        assert!(surface.viewport().is_fully_visible(0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_list_scrolls_back_to_top() {
        let hub = KeyboardHub::new();
        let many: Vec<_> = (1..=6u64)
            .map(|i| SuggestionEntry::new(i, format!("Laptop {i}")))
            .collect();
        let offsets = Arc::new(Mutex::new(Vec::new()));
        let sink = offsets.clone();
        let source = ScriptedSource::new()
            .respond("lap", many.clone())
            .respond("lapt", many);
        let (surface, _) = surface_with(source, &hub);
        let mut surface = surface
            .with_viewport(Viewport::new(80.0, 40.0))
            .with_scroll_handle(move |offset: f32| sink.lock().push(offset));

        surface.input("lap");
        assert!(pump(&mut surface).await);
        surface.command(SurfaceCommand::Last);
        assert_eq!(*offsets.lock(), vec![160.0]);

        surface.input("lapt");
        assert!(pump(&mut surface).await);
        surface.command(SurfaceCommand::Next);
        assert_eq!(offsets.lock().last(), Some(&0.0));
        assert_eq!(surface.viewport().offset(), 0.0);
        assert!(surface.viewport().is_fully_visible(0));

        // Shortening the query below the threshold clears the list as well.
        surface.command(SurfaceCommand::Last);
        assert_eq!(offsets.lock().last(), Some(&160.0));
        surface.input("la");
        assert_eq!(offsets.lock().last(), Some(&0.0));

        // Untouched offsets are not re-sent.
        let sent = offsets.lock().len();
        surface.close();
        assert_eq!(offsets.lock().len(), sent);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pump_returns_when_nothing_is_in_flight() {
        let hub = KeyboardHub::new();
        let (mut surface, _) = surface_with(ScriptedSource::new().respond("lap", laptops()), &hub);
        let started = tokio::time::Instant::now();

        assert!(!surface.pump().await);

        surface.input("la");
        assert!(!surface.pump().await);

        surface.input("laptop");
        surface.close();
        assert!(!surface.pump().await);
        assert_eq!(started.elapsed(), Duration::ZERO);

        surface.input("lap");
        assert!(surface.pump().await);
        assert!(!surface.pump().await);
        assert_eq!(surface.suggestions().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_view_snapshot() {
        let hub = KeyboardHub::new();
        let entries = vec![
            SuggestionEntry::new(1u64, "Laptop").with_price(999.0, Some(899.0)),
            SuggestionEntry::new(2u64, "Laptop Stand").with_price(30.0, None),
        ];
        let (mut surface, _) = surface_with(ScriptedSource::new().respond("lap", entries), &hub);

        surface.input("lap");
        pump(&mut surface).await;
        surface.highlight(1);

        insta::assert_snapshot!(surface.view().to_string(), @r"
        - Laptop (899.00, was 999.00)
        > Laptop Stand (30.00)
        ");
    }

    #[tokio::test(start_paused = true)]
    async fn test_dashboard_palette_over_local_menu() {
        let hub = KeyboardHub::new();
        let shell = ShellChannel::new();
        let mut events = shell.subscribe();
        let menu = vec![
            MenuEntry::new("overview", "Overview", "/dashboard"),
            MenuEntry::group(
                "catalog",
                "Catalog",
                vec![
                    MenuEntry::new("products", "Products", "/dashboard/products"),
                    MenuEntry::new("add-product", "Add Product", "/dashboard/products/new"),
                ],
            ),
        ];
        let routes: Arc<Mutex<Vec<String>>> = Arc::default();
        let sink = routes.clone();
        let mut surface = SearchSurface::new(
            Arc::new(LocalSuggestionSource::from_menu(&menu)),
            &SearchConfig::default(),
            hub.clone(),
            move |entry: SuggestionEntry| sink.lock().extend(entry.target),
        )
        .unwrap()
        .with_shell(shell);

        surface.input("product");
        assert!(pump(&mut surface).await);
        assert_eq!(surface.suggestions().len(), 2);

        // The shell routes keys through the hub.
        let dispatch = hub.dispatch(&key("ArrowDown")).unwrap();
        assert!(surface.handle_dispatch(dispatch));
        let dispatch = hub.dispatch(&key("ArrowDown")).unwrap();
        assert!(surface.handle_dispatch(dispatch));
        let dispatch = hub.dispatch(&key("Enter")).unwrap();
        assert!(surface.handle_dispatch(dispatch));

        assert_eq!(*routes.lock(), vec!["/dashboard/products/new".to_string()]);
        match events.try_recv().unwrap() {
            ShellEvent::SuggestionSelected { surface: id, entry } => {
                assert_eq!(id, surface.id());
                assert_eq!(entry.id.as_ref(), "add-product");
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(hub.dispatch(&key("down")).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_surfaces_do_not_interfere() {
        let hub = KeyboardHub::new();
        let (mut storefront, _) =
            surface_with(ScriptedSource::new().respond("lap", laptops()), &hub);
        let (mut palette, _) = surface_with(ScriptedSource::new(), &hub);

        storefront.input("lap");
        palette.input("ord");
        assert!(pump(&mut storefront).await);
        assert!(pump(&mut palette).await);

        assert_eq!(storefront.suggestions().len(), 2);
        assert!(palette.suggestions().is_empty());
        assert_eq!(hub.active_count(), 2);

        palette.close();
        assert_eq!(hub.active_count(), 1);
        assert!(storefront.handle_key(&key("down")));
        assert_eq!(storefront.selection_state().index, Some(0));
    }

    #[test]
    fn test_invalid_keymap_override() {
        let mut config = SearchConfig::default();
        config.keymap.insert("ctrl+j".to_string(), "teleport".to_string());

        let result = SearchSurface::new(
            Arc::new(ScriptedSource::new()),
            &config,
            KeyboardHub::new(),
            |_entry: SuggestionEntry| {},
        );
        assert!(matches!(result, Err(ConfigError::UnknownCommand { .. })));
    }

    fn sales_menu() -> Vec<MenuEntry> {
        vec![
            MenuEntry::new("orders", "Orders", "/dashboard/sales"),
            MenuEntry::new("reports", "Reports", "/dashboard/reports"),
        ]
    }

    async fn local_matches(config: &SearchConfig, query: &str) -> Vec<String> {
        let mut surface =
            SearchSurface::local(&sales_menu(), config, KeyboardHub::new(), |_: SuggestionEntry| {})
                .unwrap();
        surface.input(query);
        assert!(pump(&mut surface).await);
        surface.suggestions().iter().map(|e| e.label.clone()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_local_surface_uses_configured_match_fields() {
        let defaults = SearchConfig::default();
        assert!(local_matches(&defaults, "sales").await.is_empty());
        assert_eq!(local_matches(&defaults, "orders").await, vec!["Orders"]);

        let by_route = SearchConfig::from_toml(r#"match_fields = ["target"]"#).unwrap();
        assert_eq!(local_matches(&by_route, "sales").await, vec!["Orders"]);
        assert!(local_matches(&by_route, "orders").await.is_empty());
    }

    #[test]
    fn test_remote_surface_requires_valid_endpoint() {
        let result = SearchSurface::remote(
            &SearchConfig::default(),
            KeyboardHub::new(),
            |_: SuggestionEntry| {},
        );
        assert!(matches!(result, Err(ConfigError::MissingRemote)));

        let config = SearchConfig::from_toml(
            r#"
            [remote]
            endpoint = "not a url"
            "#,
        )
        .unwrap();
        let result = SearchSurface::remote(&config, KeyboardHub::new(), |_: SuggestionEntry| {});
        assert!(matches!(
            result,
            Err(ConfigError::Remote(SearchError::InvalidEndpoint { .. }))
        ));
    }

    #[tokio::test]
    async fn test_remote_surface_searches_configured_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products/search"))
            .and(query_param("term", "laptop"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 1, "name": "Laptop", "slug": "laptop" },
                { "id": 2, "name": "Laptop Stand", "slug": "laptop-stand" }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let config = SearchConfig::from_toml(&format!(
            r#"
            debounce_ms = 10

            [remote]
            endpoint = "{}/api/products/search"
            query_param = "term"
            "#,
            server.uri()
        ))
        .unwrap();
        let mut surface =
            SearchSurface::remote(&config, KeyboardHub::new(), |_: SuggestionEntry| {}).unwrap();

        surface.input("laptop");
        assert!(pump(&mut surface).await);
        let labels: Vec<_> = surface.suggestions().iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["Laptop", "Laptop Stand"]);
    }
}
