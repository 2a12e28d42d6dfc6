//! Keyboard shortcut registry and documentation.

use glyphink_core::{KeyEvent, Modifiers};
use std::io::{self, Write};

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    /// Key name as the platform reports it.
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl".to_string());
        }
        if self.shift {
            parts.push("Shift".to_string());
        }
        parts.push(if self.key.chars().count() == 1 {
            self.key.to_uppercase()
        } else {
            self.key.to_string()
        });
        parts.join("+")
    }

    /// The key press this shortcut stands for.
    pub fn key_event(&self) -> KeyEvent {
        KeyEvent::pressed(
            self.key,
            Modifiers {
                ctrl: self.ctrl,
                shift: self.shift,
                ..Modifiers::NONE
            },
        )
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("z", true, false, "Undo"),
            Shortcut::new("z", true, true, "Redo"),
            Shortcut::new("y", true, false, "Redo"),
            Shortcut::new("g", true, false, "Group selected strokes"),
            Shortcut::new("g", true, true, "Ungroup selected strokes"),
            Shortcut::new("Delete", false, false, "Delete selected strokes"),
            Shortcut::new("Backspace", false, false, "Delete selected strokes"),
            Shortcut::new("Escape", false, false, "Cancel current gesture"),
            Shortcut::new("[", false, false, "Thinner strokes"),
            Shortcut::new("]", false, false, "Thicker strokes"),
            Shortcut::new("s", false, false, "Stroke mode"),
            Shortcut::new("c", false, false, "Circle mode"),
            Shortcut::new("v", false, false, "Select mode"),
            Shortcut::new("l", false, false, "Insert letter skeleton"),
            Shortcut::new("ArrowLeft", false, false, "Nudge selection left"),
            Shortcut::new("ArrowRight", false, false, "Nudge selection right"),
            Shortcut::new("ArrowUp", false, false, "Nudge selection up"),
            Shortcut::new("ArrowDown", false, false, "Nudge selection down"),
            Shortcut::new("ArrowLeft", false, true, "Nudge selection left by 10"),
            Shortcut::new("ArrowRight", false, true, "Nudge selection right by 10"),
            Shortcut::new("ArrowUp", false, true, "Nudge selection up by 10"),
            Shortcut::new("ArrowDown", false, true, "Nudge selection down by 10"),
        ]
    }

    /// Write a listing of all shortcuts.
    pub fn write_all(out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "=== Keyboard Shortcuts ===")?;
        for shortcut in Self::all() {
            writeln!(out, "  {:20} {}", shortcut.format(), shortcut.description)?;
        }
        Ok(())
    }
}
