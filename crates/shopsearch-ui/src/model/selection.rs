//! Highlight state machine for a suggestion surface.
//!
//! Transitions are pure: they update the phase and return the side effects
//! the owning surface must carry out, in order. No transition can fail;
//! commands that make no sense in the current state are no-ops.

use shopsearch_core::{SelectionState, SurfaceCommand};

// =============================================================================
// Surface Phase
// =============================================================================

/// Top-level state. Invalid states are impossible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SurfacePhase {
    /// Surface is closed, no UI visible.
    #[default]
    Closed,
    /// Surface is open. `None` means nothing is highlighted.
    Open { index: Option<usize> },
}

impl SurfacePhase {
    pub fn is_open(&self) -> bool {
        matches!(self, SurfacePhase::Open { .. })
    }

    pub fn index(&self) -> Option<usize> {
        match self {
            SurfacePhase::Open { index } => *index,
            SurfacePhase::Closed => None,
        }
    }
}

// =============================================================================
// Effects
// =============================================================================

/// Side effect requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEffect {
    /// Register key bindings on the global key stream.
    AcquireBindings,
    /// Invoke the selection callback with the entry at this index.
    Commit(usize),
    /// Clear the query text.
    ClearQuery,
    /// Drop the suggestion list.
    ClearSuggestions,
    /// Cancel pending dispatch and discard in-flight results.
    CancelPending,
    /// Unregister key bindings.
    ReleaseBindings,
    /// Bring the row at this index into the visible region.
    ScrollIntoView(usize),
}

const CLOSE_EFFECTS: [SelectionEffect; 4] = [
    SelectionEffect::ClearQuery,
    SelectionEffect::ClearSuggestions,
    SelectionEffect::CancelPending,
    SelectionEffect::ReleaseBindings,
];

// =============================================================================
// Navigable Selection
// =============================================================================

/// Tracks which suggestion is highlighted over a list of `len` entries.
///
/// Movement clamps at both ends; "previous" from the first entry stays there.
#[derive(Debug, Default)]
pub struct NavigableSelection {
    phase: SurfacePhase,
    len: usize,
}

impl NavigableSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SurfacePhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase.is_open()
    }

    pub fn index(&self) -> Option<usize> {
        self.phase.index()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn state(&self) -> SelectionState {
        SelectionState {
            index: self.phase.index(),
            is_open: self.phase.is_open(),
        }
    }

    /// Closed -> Open with nothing highlighted.
    pub fn open(&mut self) -> Vec<SelectionEffect> {
        if self.phase.is_open() {
            return Vec::new();
        }
        tracing::debug!("Selection: open");
        self.phase = SurfacePhase::Open { index: None };
        self.len = 0;
        vec![SelectionEffect::AcquireBindings]
    }

    /// Any open state -> Closed, with a full reset.
    pub fn close(&mut self) -> Vec<SelectionEffect> {
        if !self.phase.is_open() {
            return Vec::new();
        }
        tracing::debug!("Selection: close");
        self.phase = SurfacePhase::Closed;
        self.len = 0;
        CLOSE_EFFECTS.to_vec()
    }

    /// Highlight the next entry, or the first when nothing is highlighted.
    pub fn next(&mut self) -> Vec<SelectionEffect> {
        let SurfacePhase::Open { index } = self.phase else {
            return Vec::new();
        };
        if self.len == 0 {
            return Vec::new();
        }
        let target = match index {
            None => 0,
            Some(i) => (i + 1).min(self.len - 1),
        };
        self.move_to(index, target)
    }

    /// Highlight the previous entry. Clamped at 0, never wraps.
    pub fn previous(&mut self) -> Vec<SelectionEffect> {
        let SurfacePhase::Open { index: Some(i) } = self.phase else {
            return Vec::new();
        };
        self.move_to(Some(i), i.saturating_sub(1))
    }

    /// Highlight the first entry.
    pub fn first(&mut self) -> Vec<SelectionEffect> {
        let SurfacePhase::Open { index } = self.phase else {
            return Vec::new();
        };
        if self.len == 0 {
            return Vec::new();
        }
        self.move_to(index, 0)
    }

    /// Highlight the last entry.
    pub fn last(&mut self) -> Vec<SelectionEffect> {
        let SurfacePhase::Open { index } = self.phase else {
            return Vec::new();
        };
        if self.len == 0 {
            return Vec::new();
        }
        self.move_to(index, self.len - 1)
    }

    /// Highlight a specific entry (pointer hover). Out-of-range is ignored.
    pub fn highlight(&mut self, target: usize) -> Vec<SelectionEffect> {
        let SurfacePhase::Open { index } = self.phase else {
            return Vec::new();
        };
        if target >= self.len {
            return Vec::new();
        }
        self.move_to(index, target)
    }

    /// Commit the highlighted entry and close.
    ///
    /// Without a highlight this is a no-op: no commit, no state change.
    pub fn confirm(&mut self) -> Vec<SelectionEffect> {
        let SurfacePhase::Open { index: Some(i) } = self.phase else {
            return Vec::new();
        };
        tracing::debug!("Selection: confirm {}", i);
        self.phase = SurfacePhase::Closed;
        self.len = 0;

        let mut effects = Vec::with_capacity(CLOSE_EFFECTS.len() + 1);
        effects.push(SelectionEffect::Commit(i));
        effects.extend(CLOSE_EFFECTS);
        effects
    }

    /// The suggestion list was replaced. The highlight is dropped, never
    /// reinterpreted against the new list.
    pub fn replace_list(&mut self, len: usize) {
        if let SurfacePhase::Open { index } = &mut self.phase {
            *index = None;
            self.len = len;
        }
    }

    /// Apply a surface command.
    pub fn apply(&mut self, command: SurfaceCommand) -> Vec<SelectionEffect> {
        match command {
            SurfaceCommand::Next => self.next(),
            SurfaceCommand::Previous => self.previous(),
            SurfaceCommand::First => self.first(),
            SurfaceCommand::Last => self.last(),
            SurfaceCommand::Confirm => self.confirm(),
            SurfaceCommand::Close => self.close(),
        }
    }

    fn move_to(&mut self, from: Option<usize>, to: usize) -> Vec<SelectionEffect> {
        self.phase = SurfacePhase::Open { index: Some(to) };
        if from == Some(to) {
            Vec::new()
        } else {
            vec![SelectionEffect::ScrollIntoView(to)]
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
