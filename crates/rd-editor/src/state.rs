//! Transient interaction state shared by every tool.
//!
//! Tools are stateless; whatever a gesture needs to remember between
//! pointer events lives here, owned by the `ToolManager`. Switching tools
//! resets it.

use crate::input::Modifiers;
use kurbo::{Point, Vec2};
use rd_core::{Color, ResizeHandle, SelectionFrame, Shape, ShapeId, StrokePoint, TextAlign};
use std::collections::HashMap;

/// What the active gesture is doing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ToolPhase {
    #[default]
    Idle,
    /// Dragging out a new shape preview.
    Creating,
    Moving,
    Resizing(ResizeHandle),
    Rotating,
    /// Accumulating freehand points.
    Drawing,
}

/// An open inline text editor.
#[derive(Debug, Clone, PartialEq)]
pub struct TextEditSession {
    /// The shape being edited, or `None` for a new text at `anchor`.
    pub shape_id: Option<ShapeId>,
    /// World position of the text box's top-left corner.
    pub anchor: Point,
    pub content: String,
    /// Opacity to restore on the hidden shape.
    pub original_opacity: f64,
    pub font_size: f64,
    pub color: Color,
    pub align: TextAlign,
    pub rotation: f64,
}

/// Where and how the host should place its inline editor, in screen space.
#[derive(Debug, Clone, PartialEq)]
pub struct TextEditRegion {
    pub position: Point,
    /// Font size in screen pixels.
    pub font_px: f64,
    pub color: Color,
    pub align: TextAlign,
    pub rotation: f64,
    pub content: String,
}

#[derive(Debug, Clone, Default)]
pub struct ToolState {
    pub phase: ToolPhase,
    /// World position of the pointer-down that started the gesture.
    pub drag_start: Point,
    pub drag_current: Point,
    /// Pointer angle around the frame center at rotation start.
    pub rotation_origin: f64,
    pub active_shape_id: Option<ShapeId>,
    pub start_positions: HashMap<ShapeId, Point>,
    pub start_rotations: HashMap<ShapeId, f64>,
    pub start_frame: Option<SelectionFrame>,
    /// Deep copies of the affected shapes taken when the gesture began.
    pub snapshots: Vec<Shape>,
    /// Shape being drawn, not yet in the store.
    pub preview: Option<Shape>,
    /// Freehand samples in world space.
    pub points: Vec<StrokePoint>,
    pub text_edit: Option<TextEditSession>,
    /// Host time (ms) at which a blurred text editor confirms itself.
    pub pending_blur: Option<f64>,
    /// Modifiers of the latest pointer event, replayed when capture is lost.
    pub modifiers: Modifiers,
}

impl ToolState {
    /// Whether a pointer gesture is in flight.
    pub fn is_dragging(&self) -> bool {
        self.phase != ToolPhase::Idle
    }

    pub fn drag_delta(&self) -> Vec2 {
        self.drag_current - self.drag_start
    }

    /// Start a gesture at `point`.
    pub fn begin(&mut self, phase: ToolPhase, point: Point) {
        self.phase = phase;
        self.drag_start = point;
        self.drag_current = point;
    }

    /// Forget the current gesture. An open text session survives.
    pub fn end_gesture(&mut self) {
        let text_edit = self.text_edit.take();
        let pending_blur = self.pending_blur.take();
        *self = Self {
            text_edit,
            pending_blur,
            ..Self::default()
        };
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_gesture_keeps_text_session() {
        let mut state = ToolState::default();
        state.begin(ToolPhase::Moving, Point::new(1.0, 2.0));
        state.drag_current = Point::new(4.0, 6.0);
        assert_eq!(state.drag_delta(), Vec2::new(3.0, 4.0));
        state.text_edit = Some(TextEditSession {
            shape_id: None,
            anchor: Point::ZERO,
            content: String::new(),
            original_opacity: 1.0,
            font_size: 20.0,
            color: Color::BLACK,
            align: TextAlign::Left,
            rotation: 0.0,
        });

        state.end_gesture();
        assert!(!state.is_dragging());
        assert!(state.text_edit.is_some());

        state.reset();
        assert!(state.text_edit.is_none());
    }
}
