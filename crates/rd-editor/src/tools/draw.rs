//! Freehand drawing.

use super::{Cursor, DEFAULT_PRESSURE, Tool, ToolEventContext, ToolKind, ToolResult};
use crate::input::PointerButton;
use crate::state::{ToolPhase, ToolState};
use rd_core::geometry::points_bounds;
use rd_core::{PathProps, Shape, ShapeProps, ShapeType, Store, StrokePoint, Viewport};
use rd_render::OverlayItem;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawTool;

/// Halve `points` by keeping every other sample, always keeping the last.
pub fn thin_points(points: &mut Vec<StrokePoint>) {
    let Some(&last) = points.last() else { return };
    let mut index = 0;
    points.retain(|_| {
        let keep = index % 2 == 0;
        index += 1;
        keep
    });
    if points.last() != Some(&last) {
        points.push(last);
    }
}

/// Mouse strokes carry no pressure information; their width is faked from
/// pointer speed instead.
fn needs_simulated_pressure(points: &[StrokePoint]) -> bool {
    points.iter().all(|p| p.pressure == DEFAULT_PRESSURE)
}

/// Path shape for world-space `points`, normalized so its origin is the
/// top-left of their bounds.
pub fn path_from_points(store: &mut Store, points: &[StrokePoint]) -> Option<Shape> {
    let bounds = points_bounds(points.iter().map(StrokePoint::point))?;
    let relative = points
        .iter()
        .map(|p| StrokePoint::new(p.x - bounds.x0, p.y - bounds.y0, p.pressure))
        .collect();
    let props = ShapeProps::Path(PathProps {
        points: relative,
        simulate_pressure: needs_simulated_pressure(points),
    });
    let mut shape = Shape::new(
        store.new_shape_id(ShapeType::Path),
        props,
        bounds.x0,
        bounds.y0,
        bounds.width(),
        bounds.height(),
    );
    shape.seed = store.next_seed();
    shape.style = store.config().default_style.clone();
    shape.roughness = store.config().default_roughness;
    Some(shape)
}

impl Tool for DrawTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Draw
    }

    fn on_deactivate(&self, store: &mut Store, _state: &mut ToolState) {
        store.set_drawing(false);
    }

    fn on_pointer_down(&self, store: &mut Store, state: &mut ToolState, ctx: &ToolEventContext) -> ToolResult {
        if ctx.button != PointerButton::Primary {
            return ToolResult::ignored();
        }
        let p = ctx.canvas_point;
        store.clear_selection();
        store.set_drawing(true);
        state.begin(ToolPhase::Drawing, p);
        state.points.clear();
        state.points.push(StrokePoint::new(p.x, p.y, ctx.pressure));
        ToolResult::captured().with_cursor(Cursor::Crosshair)
    }

    fn on_pointer_move(&self, store: &mut Store, state: &mut ToolState, ctx: &ToolEventContext) -> ToolResult {
        if state.phase != ToolPhase::Drawing {
            return ToolResult::ignored();
        }
        let p = ctx.canvas_point;
        state.drag_current = p;
        state.points.push(StrokePoint::new(p.x, p.y, ctx.pressure));
        if state.points.len() > store.config().max_draw_points {
            thin_points(&mut state.points);
            log::trace!("draw: thinned stroke to {} points", state.points.len());
        }
        ToolResult::handled()
    }

    fn on_pointer_up(&self, store: &mut Store, state: &mut ToolState, _ctx: &ToolEventContext) -> ToolResult {
        if state.phase != ToolPhase::Drawing {
            return ToolResult::ignored();
        }
        store.set_drawing(false);
        let points = std::mem::take(&mut state.points);
        state.end_gesture();
        if points.len() < 2 {
            return ToolResult::handled();
        }
        if let Some(shape) = path_from_points(store, &points) {
            log::debug!("draw: committing {} with {} points", shape.id, points.len());
            store.add_shape(shape, true);
        }
        ToolResult::handled()
    }

    fn render_overlay(&self, store: &Store, state: &ToolState, _viewport: &Viewport) -> Vec<OverlayItem> {
        if state.phase != ToolPhase::Drawing {
            return Vec::new();
        }
        vec![OverlayItem::DrawPreview {
            points: state.points.clone(),
            style: store.config().default_style.clone(),
            simulate_pressure: needs_simulated_pressure(&state.points),
        }]
    }
}
