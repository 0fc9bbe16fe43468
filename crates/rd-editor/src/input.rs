//! Input abstraction layer.
//!
//! Normalizes mouse, touch and stylus events into plain structs the editor
//! consumes. Coordinates are always screen pixels relative to the canvas.

use kurbo::Point;

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    pub const ALT: Self = Self {
        alt: true,
        ..Self::NONE
    };

    /// Platform command key: ⌘ on macOS, Ctrl elsewhere.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PointerButton {
    #[default]
    Primary,
    Middle,
    Secondary,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PointerKind {
    #[default]
    Mouse,
    Pen,
    Touch,
}

/// A pointer event from any device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    /// Host pointer id; distinguishes fingers in a multi-touch gesture.
    pub pointer_id: u32,
    pub x: f64,
    pub y: f64,
    /// 0.0 ..= 1.0 when the device reports it.
    pub pressure: Option<f64>,
    pub button: PointerButton,
    pub kind: PointerKind,
    pub modifiers: Modifiers,
}

impl PointerInput {
    /// Primary-button mouse event at `(x, y)`.
    pub fn mouse(x: f64, y: f64) -> Self {
        Self {
            pointer_id: 1,
            x,
            y,
            pressure: None,
            button: PointerButton::Primary,
            kind: PointerKind::Mouse,
            modifiers: Modifiers::NONE,
        }
    }

    /// Pen contact with real pressure.
    pub fn pen(x: f64, y: f64, pressure: f64) -> Self {
        Self {
            pressure: Some(pressure),
            kind: PointerKind::Pen,
            ..Self::mouse(x, y)
        }
    }

    pub fn touch(pointer_id: u32, x: f64, y: f64) -> Self {
        Self {
            pointer_id,
            kind: PointerKind::Touch,
            ..Self::mouse(x, y)
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A key press. `key` is the DOM `KeyboardEvent.key` value (`"z"`, `"Delete"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: String,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// A wheel or trackpad scroll, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelInput {
    pub x: f64,
    pub y: f64,
    pub delta_x: f64,
    pub delta_y: f64,
    pub modifiers: Modifiers,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_is_ctrl_or_meta() {
        assert!(!Modifiers::NONE.command());
        assert!(Modifiers { ctrl: true, ..Modifiers::NONE }.command());
        assert!(Modifiers { meta: true, ..Modifiers::NONE }.command());
    }

    #[test]
    fn pen_carries_pressure() {
        let p = PointerInput::pen(3.0, 4.0, 0.8);
        assert_eq!(p.pressure, Some(0.8));
        assert_eq!(p.kind, PointerKind::Pen);
        assert_eq!(p.position(), Point::new(3.0, 4.0));
    }
}
