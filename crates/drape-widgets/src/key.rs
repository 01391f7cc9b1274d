//! Key bindings used by overlays (the close key, by default Escape).

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A key binding that maps one or more key combinations to a described action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// The set of key combinations that trigger this binding.
    pub keys: Vec<KeyCombination>,
    /// A human-readable description of the action this binding performs.
    pub description: String,
    /// Whether this binding is currently active. Disabled bindings never match.
    pub enabled: bool,
}

/// A single key press with optional modifier keys (Ctrl, Alt, Shift).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombination {
    pub code: KeyCode,
    /// Modifier keys that must be held alongside the base key.
    pub modifiers: KeyModifiers,
}

impl Binding {
    pub fn new(key: KeyCombination, description: impl Into<String>) -> Self {
        Self {
            keys: vec![key],
            description: description.into(),
            enabled: true,
        }
    }

    pub fn with_keys(keys: Vec<KeyCombination>, description: impl Into<String>) -> Self {
        Self {
            keys,
            description: description.into(),
            enabled: true,
        }
    }

    /// Escape, the conventional way to dismiss an overlay.
    pub fn close() -> Self {
        Self::new(KeyCombination::new(KeyCode::Esc), "close")
    }

    /// Whether `event` matches any combination. Extra held modifiers are
    /// tolerated. Always `false` when disabled.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        if !self.enabled {
            return false;
        }
        self.keys
            .iter()
            .any(|k| k.code == event.code && event.modifiers.contains(k.modifiers))
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

impl Default for Binding {
    fn default() -> Self {
        Self::close()
    }
}

impl KeyCombination {
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::CONTROL,
        }
    }

    pub fn with_modifiers(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }
}
