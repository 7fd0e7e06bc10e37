//! Core types for the Shopsearch suggestion engine.
//!
//! This crate contains shared data structures that are used across all Shopsearch crates:
//! - Suggestion entries and menu entries
//! - Surface commands
//! - Selection snapshots and surface ids
//! - Configuration types
//! - Error types

mod command;
mod config;
mod entry;
mod error;
mod selection;

pub use command::{available_commands, SurfaceCommand};
pub use config::{
    config_dir, config_path, RemoteConfig, SearchConfig, DEFAULT_DEBOUNCE_MS,
    DEFAULT_MIN_QUERY_LENGTH,
};
pub use entry::{EntryId, MatchField, MatchFields, MenuEntry, SuggestionEntry};
pub use error::{ConfigError, SearchError};
pub use selection::{SelectionState, SurfaceId};
