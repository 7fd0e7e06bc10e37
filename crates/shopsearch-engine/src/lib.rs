//! Suggestion search engine for Shopsearch.
//!
//! This crate provides the toolkit-independent pieces of a search surface:
//! - `SuggestionSource` with remote (HTTP) and local (menu) variants
//! - `QueryDebouncer` for last-query-wins dispatch
//! - `SuggestionIndex` holding the current candidate list
//! - `KeymapRegistry` and `KeyboardHub` for scoped key bindings
//! - `ShellChannel` for explicit shell-wide notifications

pub mod channel;
pub mod debounce;
pub mod index;
pub mod keymap;
pub mod local;
pub mod remote;
pub mod source;

pub use channel::{ShellChannel, ShellEvent};
pub use debounce::{InputOutcome, QueryDebouncer, SearchCompletion};
pub use index::{ResultsState, SuggestionIndex};
pub use keymap::{
    BindingLease, KeyDispatch, KeyEvent, KeyOrigin, KeyboardHub, KeymapRegistry, Keystroke,
    Modifiers,
};
pub use local::LocalSuggestionSource;
pub use remote::HttpSuggestionSource;
pub use source::{SearchFuture, SourceKind, SuggestionSource};
