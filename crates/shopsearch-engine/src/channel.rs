//! Pub/sub channel scoped to one application shell.
//!
//! Components that care about what a surface did (a header badge, a recent
//! searches list) subscribe here explicitly instead of listening on an
//! ambient global event bus.

use shopsearch_core::{SuggestionEntry, SurfaceId};
use tokio::sync::broadcast;

const DEFAULT_CAPACITY: usize = 64;

/// Events published by search surfaces.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellEvent {
    /// A suggestion was confirmed.
    SuggestionSelected {
        surface: SurfaceId,
        entry: SuggestionEntry,
    },
    /// A surface closed and reset.
    SurfaceClosed { surface: SurfaceId },
}

/// Broadcast channel owned by the application shell.
#[derive(Debug, Clone)]
pub struct ShellChannel {
    tx: broadcast::Sender<ShellEvent>,
}

impl ShellChannel {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish to current subscribers. Returns how many received it.
    pub fn publish(&self, event: ShellEvent) -> usize {
        // No subscribers is fine.
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ShellEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ShellChannel {
    fn default() -> Self {
        Self::new()
    }
}
