//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. `key` is the
//! DOM `KeyboardEvent.key` value. On macOS `meta` is ⌘; elsewhere `ctrl`
//! plays the same role.

use crate::input::Modifiers;
use crate::tools::ToolKind;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Tool switching ──
    Tool(ToolKind),
    /// Swap back to the previously active tool.
    ToggleLastTool,

    // ── Edit ──
    Undo,
    Redo,
    Delete,
    SelectAll,
    Duplicate,
    ToggleLock,

    // ── View ──
    ZoomIn,
    ZoomOut,
    ResetZoom,
    ZoomToFit,

    // ── Z-order ──
    SendBackward,
    BringForward,
    SendToBack,
    BringToFront,

    Deselect,
}

pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action, `None` if the combo is unbound.
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        let cmd = modifiers.command();
        let shift = modifiers.shift;

        // Modifier combos first (most specific).
        if cmd && shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                "l" | "L" => Some(ShortcutAction::ToggleLock),
                "[" | "{" => Some(ShortcutAction::SendToBack),
                "]" | "}" => Some(ShortcutAction::BringToFront),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                "a" | "A" => Some(ShortcutAction::SelectAll),
                "d" | "D" => Some(ShortcutAction::Duplicate),
                "=" | "+" => Some(ShortcutAction::ZoomIn),
                "-" => Some(ShortcutAction::ZoomOut),
                "0" => Some(ShortcutAction::ResetZoom),
                "[" => Some(ShortcutAction::SendBackward),
                "]" => Some(ShortcutAction::BringForward),
                _ => None,
            };
        }

        if shift {
            return match key {
                "1" | "!" => Some(ShortcutAction::ZoomToFit),
                _ => None,
            };
        }

        // Single keys (no modifiers).
        match key {
            "v" | "V" | "1" => Some(ShortcutAction::Tool(ToolKind::Select)),
            "r" | "R" | "2" => Some(ShortcutAction::Tool(ToolKind::Rectangle)),
            "o" | "O" | "3" => Some(ShortcutAction::Tool(ToolKind::Ellipse)),
            "a" | "A" | "4" => Some(ShortcutAction::Tool(ToolKind::Arrow)),
            "l" | "L" | "5" => Some(ShortcutAction::Tool(ToolKind::Line)),
            "p" | "P" | "6" => Some(ShortcutAction::Tool(ToolKind::Draw)),
            "t" | "T" | "7" => Some(ShortcutAction::Tool(ToolKind::Text)),
            "Tab" => Some(ShortcutAction::ToggleLastTool),
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Deselect),
            _ => None,
        }
    }
}
