//! Selection snapshot and surface identity types.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Observable selection state of a surface.
///
/// `index == None` means nothing is highlighted. When set, it is always a
/// valid index into the current suggestion list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    pub index: Option<usize>,
    pub is_open: bool,
}

impl SelectionState {
    /// Index with `-1` standing for "no highlight".
    pub fn signed_index(&self) -> isize {
        self.index.map_or(-1, |i| i as isize)
    }
}

/// Unique identifier of a search-surface instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceId(pub Uuid);

impl SurfaceId {
    /// Generate a new unique surface ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SurfaceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
