//! Pointer and keyboard events, and the editor commands keys map to.

use crate::tools::DrawMode;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Width change applied by the `[` and `]` keys.
pub const WIDTH_STEP: f64 = 1.0;
/// Arrow-key nudge distance.
pub const NUDGE_STEP: f64 = 1.0;
/// Arrow-key nudge distance with Shift held.
pub const NUDGE_STEP_LARGE: f64 = 10.0;

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };

    /// Shift, Ctrl or Meta: add to / remove from the selection.
    pub fn multi_select(&self) -> bool {
        self.shift || self.ctrl || self.meta
    }

    /// Ctrl or Cmd.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Pointer event in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point, modifiers: Modifiers },
    Move { position: Point },
    Up { position: Point },
    /// Pointer left the canvas.
    Leave,
}

/// Keyboard event. Keys are named like the platform reports them
/// (`"z"`, `"Delete"`, `"ArrowLeft"`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum KeyEvent {
    Pressed { key: String, modifiers: Modifiers },
    Released { key: String },
}

impl KeyEvent {
    pub fn pressed(key: impl Into<String>, modifiers: Modifiers) -> Self {
        KeyEvent::Pressed {
            key: key.into(),
            modifiers,
        }
    }
}

/// A direct editing command, as issued by toolbar buttons or shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EditorCommand {
    /// Change the width of every selected stroke by a delta.
    AdjustWidth(f64),
    DeleteSelected,
    ClearAll,
    Group,
    Ungroup,
    Undo,
    Redo,
    SetMode(DrawMode),
    /// Insert the current letter's default skeleton.
    InsertSkeleton,
    /// Scale the selection around its bounding-box centre.
    Scale { sx: f64, sy: f64 },
    /// Move the selection by an offset.
    Nudge { dx: f64, dy: f64 },
    /// Abandon the pending start point, preview and any active drag.
    CancelGesture,
}

/// Map a key press to an editor command.
pub fn command_for_key(event: &KeyEvent) -> Option<EditorCommand> {
    let KeyEvent::Pressed { key, modifiers } = event else {
        return None;
    };

    if modifiers.command() {
        return match (key.as_str(), modifiers.shift) {
            ("z" | "Z", false) => Some(EditorCommand::Undo),
            ("z" | "Z", true) | ("y" | "Y", _) => Some(EditorCommand::Redo),
            ("g" | "G", false) => Some(EditorCommand::Group),
            ("g" | "G", true) => Some(EditorCommand::Ungroup),
            _ => None,
        };
    }

    let step = if modifiers.shift { NUDGE_STEP_LARGE } else { NUDGE_STEP };
    let command = match key.as_str() {
        "Delete" | "Backspace" => EditorCommand::DeleteSelected,
        "Escape" => EditorCommand::CancelGesture,
        "[" => EditorCommand::AdjustWidth(-WIDTH_STEP),
        "]" => EditorCommand::AdjustWidth(WIDTH_STEP),
        "s" | "S" => EditorCommand::SetMode(DrawMode::Stroke),
        "c" | "C" => EditorCommand::SetMode(DrawMode::Circle),
        "v" | "V" => EditorCommand::SetMode(DrawMode::Select),
        "l" | "L" => EditorCommand::InsertSkeleton,
        "ArrowLeft" => EditorCommand::Nudge { dx: -step, dy: 0.0 },
        "ArrowRight" => EditorCommand::Nudge { dx: step, dy: 0.0 },
        "ArrowUp" => EditorCommand::Nudge { dx: 0.0, dy: -step },
        "ArrowDown" => EditorCommand::Nudge { dx: 0.0, dy: step },
        _ => return None,
    };
    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(key: &str, modifiers: Modifiers) -> Option<EditorCommand> {
        command_for_key(&KeyEvent::pressed(key, modifiers))
    }

    #[test]
    fn test_undo_redo_keys() {
        let ctrl_shift = Modifiers {
            shift: true,
            ..Modifiers::CTRL
        };
        let cmd = Modifiers {
            meta: true,
            ..Modifiers::NONE
        };
        assert_eq!(press("z", Modifiers::CTRL), Some(EditorCommand::Undo));
        assert_eq!(press("Z", ctrl_shift), Some(EditorCommand::Redo));
        assert_eq!(press("y", Modifiers::CTRL), Some(EditorCommand::Redo));
        assert_eq!(press("z", cmd), Some(EditorCommand::Undo));
        assert_eq!(press("z", Modifiers::NONE), None);
    }

    #[test]
    fn test_group_keys() {
        let ctrl_shift = Modifiers {
            shift: true,
            ..Modifiers::CTRL
        };
        assert_eq!(press("g", Modifiers::CTRL), Some(EditorCommand::Group));
        assert_eq!(press("G", ctrl_shift), Some(EditorCommand::Ungroup));
    }

    #[test]
    fn test_plain_keys() {
        assert_eq!(press("Backspace", Modifiers::NONE), Some(EditorCommand::DeleteSelected));
        assert_eq!(press("]", Modifiers::NONE), Some(EditorCommand::AdjustWidth(1.0)));
        assert_eq!(press("v", Modifiers::NONE), Some(EditorCommand::SetMode(DrawMode::Select)));
        assert_eq!(
            press("ArrowUp", Modifiers::SHIFT),
            Some(EditorCommand::Nudge { dx: 0.0, dy: -10.0 })
        );
        assert_eq!(press("q", Modifiers::NONE), None);
    }

    #[test]
    fn test_release_ignored() {
        let event = KeyEvent::Released { key: "Delete".into() };
        assert_eq!(command_for_key(&event), None);
    }

    #[test]
    fn test_multi_select_modifiers() {
        assert!(Modifiers::SHIFT.multi_select());
        assert!(Modifiers::CTRL.multi_select());
        assert!(!Modifiers { alt: true, ..Modifiers::NONE }.multi_select());
    }
}
