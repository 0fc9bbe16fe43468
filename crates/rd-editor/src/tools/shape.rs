//! Rectangle and ellipse creation.

use super::{Cursor, Tool, ToolEventContext, ToolKind, ToolResult, commit_preview, preview_overlay};
use crate::input::PointerButton;
use crate::state::{ToolPhase, ToolState};
use kurbo::{Point, Rect};
use rd_core::{Shape, ShapeProps, Store, Viewport};
use rd_render::OverlayItem;

/// Drags out a rectangle or an ellipse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxTool {
    ellipse: bool,
}

impl BoxTool {
    pub const RECTANGLE: BoxTool = BoxTool { ellipse: false };
    pub const ELLIPSE: BoxTool = BoxTool { ellipse: true };

    fn props(&self) -> ShapeProps {
        if self.ellipse {
            ShapeProps::Ellipse
        } else {
            ShapeProps::Rectangle { corner_radius: 0.0 }
        }
    }
}

/// Bounds of a box dragged from `start` to `end`. `square` forces equal
/// sides (the longer one wins); `from_center` grows the box around `start`.
pub fn box_bounds(start: Point, end: Point, square: bool, from_center: bool) -> Rect {
    let mut dx = end.x - start.x;
    let mut dy = end.y - start.y;
    if square {
        let side = dx.abs().max(dy.abs());
        dx = side.copysign(dx);
        dy = side.copysign(dy);
    }
    if from_center {
        Rect::new(start.x - dx.abs(), start.y - dy.abs(), start.x + dx.abs(), start.y + dy.abs())
    } else {
        Rect::from_points(start, Point::new(start.x + dx, start.y + dy))
    }
}

impl Tool for BoxTool {
    fn kind(&self) -> ToolKind {
        if self.ellipse { ToolKind::Ellipse } else { ToolKind::Rectangle }
    }

    fn on_pointer_down(&self, store: &mut Store, state: &mut ToolState, ctx: &ToolEventContext) -> ToolResult {
        if ctx.button != PointerButton::Primary {
            return ToolResult::ignored();
        }
        let p = ctx.canvas_point;
        let props = self.props();
        let mut preview = Shape::new(store.new_shape_id(props.shape_type()), props, p.x, p.y, 0.0, 0.0);
        preview.seed = store.next_seed();
        preview.style = store.config().default_style.clone();
        preview.roughness = store.config().default_roughness;

        store.clear_selection();
        state.begin(ToolPhase::Creating, p);
        state.active_shape_id = Some(preview.id);
        state.preview = Some(preview);
        ToolResult::captured().with_cursor(Cursor::Crosshair)
    }

    fn on_pointer_move(&self, _store: &mut Store, state: &mut ToolState, ctx: &ToolEventContext) -> ToolResult {
        if state.phase != ToolPhase::Creating {
            return ToolResult::ignored();
        }
        state.drag_current = ctx.canvas_point;
        let bounds = box_bounds(
            state.drag_start,
            state.drag_current,
            ctx.modifiers.shift,
            ctx.modifiers.alt,
        );
        if let Some(preview) = state.preview.as_mut() {
            preview.x = bounds.x0;
            preview.y = bounds.y0;
            preview.width = bounds.width();
            preview.height = bounds.height();
        }
        ToolResult::handled()
    }

    fn on_pointer_up(&self, store: &mut Store, state: &mut ToolState, ctx: &ToolEventContext) -> ToolResult {
        if state.phase != ToolPhase::Creating {
            return ToolResult::ignored();
        }
        self.on_pointer_move(store, state, ctx);
        commit_preview(store, state)
    }

    fn render_overlay(&self, _store: &Store, state: &ToolState, _viewport: &Viewport) -> Vec<OverlayItem> {
        preview_overlay(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_keeps_drag_direction() {
        let r = box_bounds(Point::new(50.0, 50.0), Point::new(20.0, 60.0), true, false);
        assert_eq!(r, Rect::new(20.0, 50.0, 50.0, 80.0));
    }

    #[test]
    fn from_center_doubles_extent() {
        let r = box_bounds(Point::new(100.0, 100.0), Point::new(130.0, 90.0), false, true);
        assert_eq!(r, Rect::new(70.0, 90.0, 130.0, 110.0));
    }

    #[test]
    fn square_from_center() {
        let r = box_bounds(Point::new(0.0, 0.0), Point::new(10.0, 4.0), true, true);
        assert_eq!(r, Rect::new(-10.0, -10.0, 10.0, 10.0));
    }
}
