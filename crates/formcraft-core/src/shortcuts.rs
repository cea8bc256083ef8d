//! Keyboard shortcuts for the editor.

use serde::{Deserialize, Serialize};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Cmd on macOS.
    pub fn primary(self) -> bool {
        self.ctrl || self.meta
    }

    pub fn primary_only() -> Self {
        Self {
            ctrl: true,
            ..Self::default()
        }
    }

    pub fn primary_shift() -> Self {
        Self {
            ctrl: true,
            shift: true,
            ..Self::default()
        }
    }
}

/// Command triggered by a shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditorCommand {
    Undo,
    Redo,
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub primary: bool,
    pub shift: bool,
    /// Fires whether or not Shift is held.
    pub any_shift: bool,
    pub command: EditorCommand,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        primary: bool,
        shift: bool,
        command: EditorCommand,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            primary,
            shift,
            any_shift: false,
            command,
            description,
        }
    }

    pub fn ignoring_shift(mut self) -> Self {
        self.any_shift = true;
        self
    }

    /// Check if a key press triggers this shortcut.
    pub fn matches(&self, key: &str, modifiers: Modifiers) -> bool {
        key.eq_ignore_ascii_case(self.key)
            && modifiers.primary() == self.primary
            && (self.any_shift || modifiers.shift == self.shift)
    }

    /// Format the shortcut for display on the host platform.
    pub fn format(&self) -> String {
        self.format_for(cfg!(target_os = "macos"))
    }

    /// Format the shortcut for display (e.g., "Ctrl+Shift+Z", or "Cmd+Shift+Z"
    /// when `mac` is set).
    pub fn format_for(&self, mac: bool) -> String {
        let mut parts = Vec::new();
        if self.primary {
            parts.push(if mac { "Cmd" } else { "Ctrl" });
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Z", true, false, EditorCommand::Undo, "Undo"),
            Shortcut::new("Z", true, true, EditorCommand::Redo, "Redo"),
            Shortcut::new("Y", true, false, EditorCommand::Redo, "Redo").ignoring_shift(),
        ]
    }

    /// Find the command for a key press.
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<EditorCommand> {
        Self::all()
            .into_iter()
            .find(|shortcut| shortcut.matches(key, modifiers))
            .map(|shortcut| shortcut.command)
    }
}

/// Keyboard bindings that are live only while the editor is mounted.
#[derive(Debug, Clone, Default)]
pub struct KeyBindings {
    mounted: bool,
}

impl KeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mount(&mut self) {
        self.mounted = true;
    }

    pub fn unmount(&mut self) {
        self.mounted = false;
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Resolve a key press. Nothing resolves while unmounted.
    pub fn handle_key(&self, key: &str, modifiers: Modifiers) -> Option<EditorCommand> {
        if !self.mounted {
            return None;
        }
        ShortcutRegistry::resolve(key, modifiers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mounted() -> KeyBindings {
        let mut bindings = KeyBindings::new();
        bindings.mount();
        bindings
    }

    #[test]
    fn test_undo_redo_bindings() {
        let bindings = mounted();
        assert_eq!(bindings.handle_key("z", Modifiers::primary_only()), Some(EditorCommand::Undo));
        assert_eq!(bindings.handle_key("Z", Modifiers::primary_shift()), Some(EditorCommand::Redo));
        assert_eq!(bindings.handle_key("y", Modifiers::primary_only()), Some(EditorCommand::Redo));
    }

    #[test]
    fn test_y_redoes_with_or_without_shift() {
        let bindings = mounted();
        assert_eq!(bindings.handle_key("Y", Modifiers::primary_shift()), Some(EditorCommand::Redo));
        assert_eq!(bindings.handle_key("z", Modifiers::primary_only()), Some(EditorCommand::Undo));
        assert_eq!(bindings.handle_key("Z", Modifiers::primary_shift()), Some(EditorCommand::Redo));
        let shift_only = Modifiers {
            shift: true,
            ..Modifiers::default()
        };
        assert_eq!(bindings.handle_key("y", shift_only), None);
    }

    #[test]
    fn test_meta_is_primary() {
        let bindings = mounted();
        let cmd = Modifiers {
            meta: true,
            ..Modifiers::default()
        };
        assert_eq!(bindings.handle_key("z", cmd), Some(EditorCommand::Undo));
    }

    #[test]
    fn test_requires_primary() {
        let bindings = mounted();
        assert_eq!(bindings.handle_key("z", Modifiers::default()), None);
        assert_eq!(bindings.handle_key("x", Modifiers::primary_only()), None);
    }

    #[test]
    fn test_inactive_while_unmounted() {
        let mut bindings = mounted();
        bindings.unmount();
        assert_eq!(bindings.handle_key("z", Modifiers::primary_only()), None);
    }

    #[test]
    fn test_format() {
        let shortcuts = ShortcutRegistry::all();
        let formatted: Vec<String> = shortcuts.iter().map(|s| s.format_for(false)).collect();
        assert_eq!(formatted, vec!["Ctrl+Z", "Ctrl+Shift+Z", "Ctrl+Y"]);
        let formatted: Vec<String> = shortcuts.iter().map(|s| s.format_for(true)).collect();
        assert_eq!(formatted, vec!["Cmd+Z", "Cmd+Shift+Z", "Cmd+Y"]);
        assert_eq!(shortcuts[0].format(), shortcuts[0].format_for(cfg!(target_os = "macos")));
    }
}
