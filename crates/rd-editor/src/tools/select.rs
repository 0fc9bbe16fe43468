//! Selection, move, resize and rotate.
//!
//! Pointer-down priority: rotation handle, then resize handles of the
//! current selection frame, then shapes. Every drag mutates the store with
//! `record = false` and is recorded as one batched update on release, and
//! only if the pointer actually moved.

use super::{Cursor, Tool, ToolEventContext, ToolKind, ToolRequest, ToolResult};
use crate::input::{Modifiers, PointerButton};
use crate::state::{ToolPhase, ToolState};
use kurbo::{Point, Vec2};
use rd_core::geometry::{normalize_angle, rotate_point, snap_rotation};
use rd_core::handles::{hit_test_handles, hit_test_rotation_handle};
use rd_core::resize::{ResizeOptions, apply_resize, map_rect, resize_frame};
use rd_core::{ResizeHandle, Shape, ShapeId, ShapePatch, ShapeProps, Store, Viewport};
use rd_render::OverlayItem;
use std::f64::consts::PI;

/// Shift-rotation step: 15°.
pub const ROTATION_SNAP: f64 = PI / 12.0;

/// Shift-nudge multiplier.
const NUDGE_MULTIPLIER: f64 = 10.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectTool;

/// Selected shapes that drags may modify.
fn movable_selection(store: &Store) -> Vec<Shape> {
    store.scene().selected_shapes().filter(|s| !s.is_locked).cloned().collect()
}

/// Constrain `delta` to its dominant axis.
fn dominant_axis(delta: Vec2) -> Vec2 {
    if delta.x.abs() >= delta.y.abs() {
        Vec2::new(delta.x, 0.0)
    } else {
        Vec2::new(0.0, delta.y)
    }
}

impl SelectTool {
    fn begin_transform(&self, store: &Store, state: &mut ToolState, phase: ToolPhase, ctx: &ToolEventContext) -> bool {
        let Some(frame) = store.selection_frame() else {
            return false;
        };
        let snapshots = movable_selection(store);
        if snapshots.is_empty() {
            return false;
        }
        state.begin(phase, ctx.canvas_point);
        state.start_frame = Some(frame);
        state.start_rotations = snapshots.iter().map(|s| (s.id, s.rotation)).collect();
        state.rotation_origin = (ctx.canvas_point - frame.bounds.center()).atan2();
        state.snapshots = snapshots;
        true
    }

    fn begin_move(&self, store: &Store, state: &mut ToolState, ctx: &ToolEventContext, hit: ShapeId) {
        let snapshots = movable_selection(store);
        state.begin(ToolPhase::Moving, ctx.canvas_point);
        state.active_shape_id = Some(hit);
        state.start_positions = snapshots.iter().map(|s| (s.id, s.origin())).collect();
        state.snapshots = snapshots;
    }

    fn drag_move(&self, store: &mut Store, state: &ToolState, modifiers: Modifiers) {
        let mut delta = state.drag_delta();
        if modifiers.shift {
            delta = dominant_axis(delta);
        }
        let patches: Vec<(ShapeId, ShapePatch)> = state
            .start_positions
            .iter()
            .map(|(id, start)| (*id, ShapePatch::position(start.x + delta.x, start.y + delta.y)))
            .collect();
        store.update_shapes(&patches, false);
    }

    fn drag_resize(&self, store: &mut Store, state: &ToolState, handle: ResizeHandle, modifiers: Modifiers) {
        let Some(frame) = state.start_frame else { return };
        let images_only = state.snapshots.iter().all(|s| matches!(s.props, ShapeProps::Image(_)));
        let opts = ResizeOptions {
            keep_aspect: modifiers.shift || images_only,
            min_size: store.config().min_resize_size,
        };
        let new_frame = resize_frame(&frame, handle, state.drag_delta(), opts);
        let ctx = store.resize_context();
        let resized: Vec<Shape> = state
            .snapshots
            .iter()
            .map(|start| {
                let bounds = if state.snapshots.len() == 1 {
                    new_frame
                } else {
                    map_rect(frame.bounds, new_frame, start.rect())
                };
                let mut shape = start.clone();
                apply_resize(&mut shape, start, bounds, handle, &ctx);
                shape
            })
            .collect();
        store.replace_shapes(resized, false);
    }

    fn drag_rotate(&self, store: &mut Store, state: &ToolState, modifiers: Modifiers) {
        let Some(frame) = state.start_frame else { return };
        let center = frame.bounds.center();
        let mut delta = (state.drag_current - center).atan2() - state.rotation_origin;
        if modifiers.shift {
            delta = match state.snapshots.as_slice() {
                // A single shape snaps its absolute angle.
                [single] => snap_rotation(single.rotation + delta, ROTATION_SNAP) - single.rotation,
                _ => snap_rotation(delta, ROTATION_SNAP),
            };
        }
        let rotated: Vec<Shape> = state
            .snapshots
            .iter()
            .map(|start| {
                let c = rotate_point(start.center(), center, delta);
                let mut shape = start.clone();
                shape.x = c.x - start.width / 2.0;
                shape.y = c.y - start.height / 2.0;
                shape.rotation = normalize_angle(start.rotation + delta);
                shape
            })
            .collect();
        store.replace_shapes(rotated, false);
    }
}

impl Tool for SelectTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Select
    }

    fn on_pointer_down(&self, store: &mut Store, state: &mut ToolState, ctx: &ToolEventContext) -> ToolResult {
        if ctx.button != PointerButton::Primary {
            return ToolResult::ignored();
        }
        let p = ctx.canvas_point;
        let zoom = ctx.viewport.zoom;
        let handle_size = store.config().handle_size;
        let rotation_offset = store.config().rotation_handle_offset;

        if let Some(frame) = store.selection_frame() {
            if hit_test_rotation_handle(&frame, p, handle_size, rotation_offset, zoom)
                && self.begin_transform(store, state, ToolPhase::Rotating, ctx)
            {
                log::debug!("select: rotating {} shape(s)", state.snapshots.len());
                return ToolResult::captured().with_cursor(Cursor::Grab);
            }
            if let Some(handle) = hit_test_handles(&frame, p, handle_size, zoom)
                && self.begin_transform(store, state, ToolPhase::Resizing(handle), ctx)
            {
                log::debug!("select: resizing from {handle:?}");
                return ToolResult::captured().with_cursor(Cursor::Resize(handle));
            }
        }

        match store.shape_at_point(p) {
            Some(id) => {
                if ctx.modifiers.shift {
                    store.toggle_selection(&id);
                } else if !store.is_selected(&id) {
                    store.select(&id);
                }
                if !store.is_selected(&id) {
                    // Shift-click removed it; nothing to drag.
                    return ToolResult::handled();
                }
                self.begin_move(store, state, ctx, id);
                ToolResult::captured().with_cursor(Cursor::Move)
            }
            None => {
                if !ctx.modifiers.shift {
                    store.clear_selection();
                }
                ToolResult::handled()
            }
        }
    }

    fn on_pointer_move(&self, store: &mut Store, state: &mut ToolState, ctx: &ToolEventContext) -> ToolResult {
        state.drag_current = ctx.canvas_point;
        match state.phase {
            ToolPhase::Moving => self.drag_move(store, state, ctx.modifiers),
            ToolPhase::Resizing(handle) => self.drag_resize(store, state, handle, ctx.modifiers),
            ToolPhase::Rotating => self.drag_rotate(store, state, ctx.modifiers),
            _ => return ToolResult::ignored(),
        }
        ToolResult::handled()
    }

    fn on_pointer_up(&self, store: &mut Store, state: &mut ToolState, ctx: &ToolEventContext) -> ToolResult {
        if !matches!(
            state.phase,
            ToolPhase::Moving | ToolPhase::Resizing(_) | ToolPhase::Rotating
        ) {
            state.end_gesture();
            return ToolResult::ignored();
        }
        if ctx.canvas_point != state.drag_current {
            self.on_pointer_move(store, state, ctx);
        }
        let moved = state.drag_current != state.drag_start;
        let before = std::mem::take(&mut state.snapshots);
        state.end_gesture();
        if moved {
            let after: Vec<Shape> = before.iter().filter_map(|s| store.shape(&s.id).cloned()).collect();
            if store.record_batch_update(before, after) {
                log::debug!("select: recorded drag");
            }
        }
        ToolResult::handled()
    }

    fn on_double_click(&self, store: &mut Store, _state: &mut ToolState, ctx: &ToolEventContext) -> ToolResult {
        match store.shape_at_point(ctx.canvas_point) {
            Some(id) if store.shape(&id).is_some_and(Shape::is_text) => {
                ToolResult::handled().with_request(ToolRequest::EditText(id))
            }
            Some(_) => ToolResult::ignored(),
            None => ToolResult::handled().with_request(ToolRequest::CreateText(ctx.canvas_point)),
        }
    }

    fn on_key_down(&self, store: &mut Store, state: &mut ToolState, key: &str, modifiers: Modifiers) -> ToolResult {
        if state.is_dragging() {
            return ToolResult::ignored();
        }
        let step = store.config().nudge_step * if modifiers.shift { NUDGE_MULTIPLIER } else { 1.0 };
        let delta = match key {
            "ArrowLeft" => Vec2::new(-step, 0.0),
            "ArrowRight" => Vec2::new(step, 0.0),
            "ArrowUp" => Vec2::new(0.0, -step),
            "ArrowDown" => Vec2::new(0.0, step),
            _ => return ToolResult::ignored(),
        };
        let patches: Vec<(ShapeId, ShapePatch)> = movable_selection(store)
            .iter()
            .map(|s| (s.id, ShapePatch::position(s.x + delta.x, s.y + delta.y)))
            .collect();
        if patches.is_empty() {
            return ToolResult::ignored();
        }
        store.update_shapes(&patches, true);
        ToolResult::handled()
    }

    fn render_overlay(&self, store: &Store, state: &ToolState, _viewport: &Viewport) -> Vec<OverlayItem> {
        match state.phase {
            ToolPhase::Resizing(_) => store
                .selection_frame()
                .map(|frame| vec![OverlayItem::Dimensions { bounds: frame.bounds }])
                .unwrap_or_default(),
            ToolPhase::Rotating => {
                let Some(frame) = store.selection_frame() else {
                    return Vec::new();
                };
                let angle = state
                    .snapshots
                    .first()
                    .and_then(|s| store.shape(&s.id))
                    .map(|s| s.rotation)
                    .unwrap_or(0.0);
                let top = Point::new(frame.bounds.center().x, frame.bounds.y0);
                vec![OverlayItem::Angle {
                    anchor: frame.to_world(top),
                    angle,
                }]
            }
            _ => Vec::new(),
        }
    }
}
