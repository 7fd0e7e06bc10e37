//! Commands a suggestion surface responds to.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A navigation command, usually produced by a key binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceCommand {
    /// Highlight the next suggestion.
    Next,
    /// Highlight the previous suggestion.
    Previous,
    /// Highlight the first suggestion.
    First,
    /// Highlight the last suggestion.
    Last,
    /// Commit the highlighted suggestion.
    Confirm,
    /// Close the surface and reset it.
    Close,
}

impl SurfaceCommand {
    /// Look up a command by its configuration name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "next" | "cursor_down" => Some(Self::Next),
            "previous" | "prev" | "cursor_up" => Some(Self::Previous),
            "first" | "cursor_home" => Some(Self::First),
            "last" | "cursor_end" => Some(Self::Last),
            "confirm" | "submit" => Some(Self::Confirm),
            "close" | "dismiss" => Some(Self::Close),
            _ => None,
        }
    }

    /// Canonical configuration name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::Previous => "previous",
            Self::First => "first",
            Self::Last => "last",
            Self::Confirm => "confirm",
            Self::Close => "close",
        }
    }
}

impl fmt::Display for SurfaceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Get all canonical command names.
pub fn available_commands() -> &'static [&'static str] {
    &["next", "previous", "first", "last", "confirm", "close"]
}
