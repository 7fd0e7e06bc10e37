//! Key bindings for suggestion surfaces.
//!
//! ## Architecture
//!
//! ```text
//! [config.toml]                 [application shell]
//!      │                               │
//!      ▼                               ▼
//! [keymap] overrides ───►  KeymapRegistry      KeyboardHub (global key stream)
//!                                │                     ▲
//!                                └── surface open ─────┘ register() -> BindingLease
//!                                    surface close ──► lease dropped, bindings gone
//! ```
//!
//! Bindings fire regardless of whether the key event came from a text input.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;
use parking_lot::RwLock;
use shopsearch_core::{ConfigError, SurfaceCommand, SurfaceId};

// =============================================================================
// Keystroke
// =============================================================================

bitflags! {
    /// Modifier keys held during a keystroke.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const CTRL = 1;
        const ALT = 1 << 1;
        const SHIFT = 1 << 2;
        const CMD = 1 << 3;
    }
}

/// A normalised key plus modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Keystroke {
    pub key: String,
    pub modifiers: Modifiers,
}

impl Keystroke {
    /// A key with no modifiers.
    pub fn key(key: &str) -> Self {
        Self {
            key: normalize_key(key),
            modifiers: Modifiers::empty(),
        }
    }

    /// Parse "ctrl+n", "cmd-shift-z" or a browser key name like "ArrowDown".
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let normalized = s.trim().replace('+', "-");
        if s.trim() == "-" {
            return Ok(Self::key("-"));
        }
        let mut parts: Vec<&str> = normalized.split('-').collect();
        // "ctrl--" binds the minus key.
        if normalized.ends_with("--") {
            parts.pop();
            if let Some(last) = parts.last_mut() {
                *last = "-";
            }
        }

        let Some((key, mods)) = parts.split_last() else {
            return Err(ConfigError::InvalidKeystroke(s.to_string()));
        };
        if key.is_empty() {
            return Err(ConfigError::InvalidKeystroke(s.to_string()));
        }

        let mut modifiers = Modifiers::empty();
        for m in mods {
            modifiers |= match m.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => Modifiers::CTRL,
                "alt" | "option" => Modifiers::ALT,
                "shift" => Modifiers::SHIFT,
                "cmd" | "meta" | "super" => Modifiers::CMD,
                _ => return Err(ConfigError::InvalidKeystroke(s.to_string())),
            };
        }

        Ok(Self {
            key: normalize_key(key),
            modifiers,
        })
    }
}

impl fmt::Display for Keystroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, name) in [
            (Modifiers::CTRL, "ctrl"),
            (Modifiers::ALT, "alt"),
            (Modifiers::SHIFT, "shift"),
            (Modifiers::CMD, "cmd"),
        ] {
            if self.modifiers.contains(flag) {
                write!(f, "{}+", name)?;
            }
        }
        f.write_str(&self.key)
    }
}

/// Map browser and shorthand key names onto one spelling.
fn normalize_key(key: &str) -> String {
    let lower = key.to_ascii_lowercase();
    match lower.as_str() {
        "arrowdown" => "down".to_string(),
        "arrowup" => "up".to_string(),
        "arrowleft" => "left".to_string(),
        "arrowright" => "right".to_string(),
        "esc" => "escape".to_string(),
        "return" => "enter".to_string(),
        _ => lower,
    }
}

// =============================================================================
// Key Event
// =============================================================================

/// Where the key event was raised.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyOrigin {
    /// Focus is inside a text field (the search input itself).
    TextInput,
    /// Anywhere else in the document.
    #[default]
    Document,
}

/// A key event from the global key stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub keystroke: Keystroke,
    pub origin: KeyOrigin,
}

impl KeyEvent {
    pub fn new(keystroke: Keystroke, origin: KeyOrigin) -> Self {
        Self { keystroke, origin }
    }

    /// Unmodified key pressed while typing in the search input.
    pub fn in_input(key: &str) -> Self {
        Self::new(Keystroke::key(key), KeyOrigin::TextInput)
    }
}

// =============================================================================
// Keymap Registry
// =============================================================================

/// Keystroke to command table of one surface.
///
/// Later bindings for the same keystroke override earlier ones.
#[derive(Debug, Default)]
pub struct KeymapRegistry {
    bindings: RwLock<HashMap<Keystroke, SurfaceCommand>>,
}

impl KeymapRegistry {
    /// Create a new empty keymap registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the default bindings.
    ///
    /// Down/Up move the highlight, Enter confirms, Escape closes.
    /// Ctrl+N / Ctrl+P mirror Down / Up.
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        for (key, command) in [
            ("down", SurfaceCommand::Next),
            ("up", SurfaceCommand::Previous),
            ("enter", SurfaceCommand::Confirm),
            ("escape", SurfaceCommand::Close),
            ("ctrl+n", SurfaceCommand::Next),
            ("ctrl+p", SurfaceCommand::Previous),
            ("home", SurfaceCommand::First),
            ("end", SurfaceCommand::Last),
        ] {
            if let Ok(keystroke) = Keystroke::parse(key) {
                registry.set(keystroke, command);
            }
        }
        tracing::debug!("Registered {} default bindings", registry.binding_count());
        registry
    }

    /// Defaults plus user overrides from configuration.
    pub fn from_overrides<'a>(
        overrides: impl IntoIterator<Item = (&'a String, &'a String)>,
    ) -> Result<Self, ConfigError> {
        let registry = Self::with_defaults();
        for (key, command_name) in overrides {
            let keystroke = Keystroke::parse(key)?;
            if command_name == "none" {
                registry.del(&keystroke);
                continue;
            }
            let command = SurfaceCommand::from_name(command_name).ok_or_else(|| {
                ConfigError::UnknownCommand {
                    key: key.clone(),
                    command: command_name.clone(),
                }
            })?;
            tracing::debug!("Binding override: {} -> {}", keystroke, command);
            registry.set(keystroke, command);
        }
        Ok(registry)
    }

    /// Add a binding. If the keystroke is already bound, it's overwritten.
    pub fn set(&self, keystroke: Keystroke, command: SurfaceCommand) {
        self.bindings.write().insert(keystroke, command);
    }

    /// Delete a binding. Returns `true` if one was removed.
    pub fn del(&self, keystroke: &Keystroke) -> bool {
        self.bindings.write().remove(keystroke).is_some()
    }

    /// Command bound to a keystroke.
    pub fn lookup(&self, keystroke: &Keystroke) -> Option<SurfaceCommand> {
        self.bindings.read().get(keystroke).copied()
    }

    /// Get the number of bindings.
    pub fn binding_count(&self) -> usize {
        self.bindings.read().len()
    }
}

// =============================================================================
// Keyboard Hub
// =============================================================================

/// A command routed to the surface that owns the binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyDispatch {
    pub surface: SurfaceId,
    pub command: SurfaceCommand,
}

#[derive(Default)]
struct HubInner {
    /// Active registrations, most recently opened last.
    active: RwLock<Vec<(SurfaceId, Arc<KeymapRegistry>)>>,
}

/// The global key-event stream of an application shell.
///
/// Surfaces register their keymap while open. The most recently opened
/// surface gets first refusal on each key.
#[derive(Clone, Default)]
pub struct KeyboardHub {
    inner: Arc<HubInner>,
}

impl KeyboardHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a surface's bindings until the returned lease is dropped.
    ///
    /// Re-registering the same surface replaces its previous registration.
    pub fn register(&self, surface: SurfaceId, keymap: Arc<KeymapRegistry>) -> BindingLease {
        let mut active = self.inner.active.write();
        active.retain(|(id, _)| *id != surface);
        active.push((surface, keymap));
        tracing::debug!("Surface {} bindings registered ({} active)", surface, active.len());

        BindingLease {
            inner: self.inner.clone(),
            surface,
        }
    }

    /// Route a key event to the topmost surface that binds it.
    pub fn dispatch(&self, event: &KeyEvent) -> Option<KeyDispatch> {
        self.inner
            .active
            .read()
            .iter()
            .rev()
            .find_map(|(surface, keymap)| {
                keymap.lookup(&event.keystroke).map(|command| KeyDispatch {
                    surface: *surface,
                    command,
                })
            })
    }

    pub fn is_registered(&self, surface: SurfaceId) -> bool {
        self.inner.active.read().iter().any(|(id, _)| *id == surface)
    }

    /// Get the number of active registrations.
    pub fn active_count(&self) -> usize {
        self.inner.active.read().len()
    }
}

/// Scoped registration on a [`KeyboardHub`]. Dropping it unregisters.
#[must_use = "bindings are released as soon as the lease is dropped"]
pub struct BindingLease {
    inner: Arc<HubInner>,
    surface: SurfaceId,
}

impl BindingLease {
    pub fn surface(&self) -> SurfaceId {
        self.surface
    }
}

impl fmt::Debug for BindingLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingLease")
            .field("surface", &self.surface)
            .finish()
    }
}

impl Drop for BindingLease {
    fn drop(&mut self) {
        let mut active = self.inner.active.write();
        active.retain(|(id, _)| *id != self.surface);
        tracing::debug!(
            "Surface {} bindings released ({} active)",
            self.surface,
            active.len()
        );
    }
}
