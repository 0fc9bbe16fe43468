//! Line and arrow creation.

use super::{Cursor, Tool, ToolEventContext, ToolKind, ToolResult, commit_preview, preview_overlay};
use crate::input::PointerButton;
use crate::state::{ToolPhase, ToolState};
use kurbo::{Point, Rect};
use rd_core::geometry::snap_angle;
use rd_core::{ArrowProps, Arrowhead, LinearProps, Shape, ShapeProps, Store, Viewport};
use rd_render::OverlayItem;
use std::f64::consts::FRAC_PI_4;

/// Drags out a two-point line or arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearTool {
    arrow: bool,
}

impl LinearTool {
    pub const LINE: LinearTool = LinearTool { arrow: false };
    pub const ARROW: LinearTool = LinearTool { arrow: true };

    fn props(&self, points: Vec<Point>) -> ShapeProps {
        if self.arrow {
            ShapeProps::Arrow(ArrowProps {
                points,
                start_head: None,
                end_head: Some(Arrowhead::Triangle),
            })
        } else {
            ShapeProps::Line(LinearProps { points })
        }
    }
}

/// Write the segment `start → end` (world space) onto `shape`, storing the
/// points relative to the new origin.
fn set_segment(shape: &mut Shape, start: Point, end: Point) {
    let bounds = Rect::from_points(start, end);
    let origin = bounds.origin();
    let relative = vec![(start - origin).to_point(), (end - origin).to_point()];
    shape.x = origin.x;
    shape.y = origin.y;
    shape.width = bounds.width();
    shape.height = bounds.height();
    match &mut shape.props {
        ShapeProps::Line(line) => line.points = relative,
        ShapeProps::Arrow(arrow) => arrow.points = relative,
        _ => {}
    }
}

impl Tool for LinearTool {
    fn kind(&self) -> ToolKind {
        if self.arrow { ToolKind::Arrow } else { ToolKind::Line }
    }

    fn on_pointer_down(&self, store: &mut Store, state: &mut ToolState, ctx: &ToolEventContext) -> ToolResult {
        if ctx.button != PointerButton::Primary {
            return ToolResult::ignored();
        }
        let p = ctx.canvas_point;
        let props = self.props(vec![Point::ZERO, Point::ZERO]);
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
        let end = if ctx.modifiers.shift {
            snap_angle(state.drag_start, ctx.canvas_point, FRAC_PI_4)
        } else {
            ctx.canvas_point
        };
        state.drag_current = end;
        let start = state.drag_start;
        if let Some(preview) = state.preview.as_mut() {
            set_segment(preview, start, end);
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
