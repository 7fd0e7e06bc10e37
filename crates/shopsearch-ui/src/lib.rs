//! Shopsearch search surface.
//!
//! Keyboard-navigable suggestion overlay shared by the storefront search box
//! and the dashboard command palette. The embedding UI feeds it text input and
//! key events, draws [`SurfaceView`], and reacts to confirmed selections.

pub mod logging;
pub mod model;
pub mod surface;

pub use model::{
    NavigableSelection, ScrollHandle, SelectionEffect, SurfacePhase, SurfaceView, Viewport,
};
pub use shopsearch_core::{
    SearchConfig, SelectionState, SuggestionEntry, SurfaceCommand, SurfaceId,
};
pub use shopsearch_engine::{
    KeyEvent, KeyOrigin, KeyboardHub, Keystroke, ShellChannel, ShellEvent,
};
pub use surface::{SearchSurface, SelectionCallback};
