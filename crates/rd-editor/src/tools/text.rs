//! Text placement and inline editing sessions.
//!
//! The editor surface itself belongs to the host. A session records what
//! is being edited; the host positions its input from [`edit_region`] and
//! pushes keystrokes back through [`set_content`]. While a session is open
//! on an existing shape that shape is hidden (opacity 0, not recorded) so
//! the host's editor can sit exactly on top of it.

use super::{Cursor, Tool, ToolEventContext, ToolKind, ToolResult};
use crate::input::PointerButton;
use crate::state::{TextEditRegion, TextEditSession, ToolState};
use kurbo::Point;
use rd_core::text::layout_for_shape;
use rd_core::{Shape, ShapeId, ShapePatch, ShapeProps, ShapeType, Store, TextAlign, TextProps};

/// Line height for new text, as a multiple of the font size.
const DEFAULT_LINE_HEIGHT: f64 = 1.25;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextTool;

/// Open a session on text shape `id`, hiding it. Any open session is
/// confirmed first. Returns `false` for missing, locked or non-text shapes.
pub fn open_existing(store: &mut Store, state: &mut ToolState, id: ShapeId) -> bool {
    confirm(store, state);
    let Some(shape) = store.shape(&id) else {
        return false;
    };
    let Some(props) = shape.text_props() else {
        return false;
    };
    if shape.is_locked {
        return false;
    }
    state.text_edit = Some(TextEditSession {
        shape_id: Some(id),
        anchor: shape.origin(),
        content: props.text.clone(),
        original_opacity: shape.opacity,
        font_size: props.font_size,
        color: shape.style.stroke_color,
        align: props.text_align,
        rotation: shape.rotation,
    });
    store.update_shape(&id, &ShapePatch::opacity(0.0), false);
    log::debug!("text: editing {id}");
    true
}

/// Open a session for a new text at world point `anchor`. Any open
/// session is confirmed first.
pub fn open_new(store: &mut Store, state: &mut ToolState, anchor: Point) {
    confirm(store, state);
    let config = store.config();
    state.text_edit = Some(TextEditSession {
        shape_id: None,
        anchor,
        content: String::new(),
        original_opacity: 1.0,
        font_size: config.default_font_size,
        color: config.default_style.stroke_color,
        align: TextAlign::Left,
        rotation: 0.0,
    });
    log::debug!("text: new session at ({}, {})", anchor.x, anchor.y);
}

/// Replace the draft text of the open session.
pub fn set_content(state: &mut ToolState, content: &str) -> bool {
    match state.text_edit.as_mut() {
        Some(session) => {
            session.content = content.to_string();
            true
        }
        None => false,
    }
}

/// Where the host should show its editor, in screen space.
pub fn edit_region(store: &Store, state: &ToolState) -> Option<TextEditRegion> {
    let session = state.text_edit.as_ref()?;
    let view = store.viewport();
    Some(TextEditRegion {
        position: view.world_to_screen(session.anchor),
        font_px: session.font_size * view.zoom,
        color: session.color,
        align: session.align,
        rotation: session.rotation,
        content: session.content.clone(),
    })
}

/// Close the open session and commit it. Non-empty content creates or
/// updates the text with history; empty content on an existing shape only
/// restores it. Returns the shape that was created or updated.
pub fn confirm(store: &mut Store, state: &mut ToolState) -> Option<ShapeId> {
    state.pending_blur = None;
    let session = state.text_edit.take()?;
    let empty = session.content.trim().is_empty();
    match session.shape_id {
        Some(id) => {
            let mut before = store.shape(&id)?.clone();
            before.opacity = session.original_opacity;
            if empty {
                store.update_shape(&id, &ShapePatch::opacity(session.original_opacity), false);
                return None;
            }
            let mut after = before.clone();
            if let Some(props) = after.text_props_mut() {
                props.text = session.content;
            }
            fit_text(store, &mut after);
            store.replace_shapes(vec![after.clone()], false);
            store.record_batch_update(vec![before], vec![after]);
            log::debug!("text: updated {id}");
            Some(id)
        }
        None if empty => None,
        None => {
            let config = store.config();
            let props = TextProps {
                text: session.content,
                font_size: session.font_size,
                font_family: config.default_font_family.clone(),
                text_align: session.align,
                line_height: DEFAULT_LINE_HEIGHT,
                auto_width: true,
            };
            let style = config.default_style.clone();
            let roughness = config.default_roughness;
            let id = store.new_shape_id(ShapeType::Text);
            let mut shape = Shape::new(id, ShapeProps::Text(props), session.anchor.x, session.anchor.y, 0.0, 0.0);
            shape.seed = store.next_seed();
            shape.style = style;
            shape.roughness = roughness;
            fit_text(store, &mut shape);
            if !store.add_shape(shape, true) {
                return None;
            }
            store.select(&id);
            log::debug!("text: created {id}");
            Some(id)
        }
    }
}

/// Close the open session without committing.
pub fn cancel(store: &mut Store, state: &mut ToolState) {
    state.pending_blur = None;
    if let Some(TextEditSession {
        shape_id: Some(id),
        original_opacity,
        ..
    }) = state.text_edit.take()
    {
        store.update_shape(&id, &ShapePatch::opacity(original_opacity), false);
    }
}

/// Size a text shape to its laid-out content.
fn fit_text(store: &Store, shape: &mut Shape) {
    let Some(props) = shape.text_props() else { return };
    let layout = layout_for_shape(props, shape.width, store.text_measure());
    if props.auto_width {
        shape.width = layout.width;
    }
    shape.height = layout.height;
}

impl Tool for TextTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Text
    }

    fn on_deactivate(&self, store: &mut Store, state: &mut ToolState) {
        confirm(store, state);
    }

    fn on_pointer_down(&self, store: &mut Store, state: &mut ToolState, ctx: &ToolEventContext) -> ToolResult {
        if ctx.button != PointerButton::Primary {
            return ToolResult::ignored();
        }
        confirm(store, state);
        let p = ctx.canvas_point;
        let opened = match store.shape_at_point(p) {
            Some(id) if store.shape(&id).is_some_and(Shape::is_text) => open_existing(store, state, id),
            _ => false,
        };
        if !opened {
            store.clear_selection();
            open_new(store, state, p);
        }
        ToolResult::handled().with_cursor(Cursor::Text)
    }

    fn on_pointer_move(&self, _store: &mut Store, _state: &mut ToolState, _ctx: &ToolEventContext) -> ToolResult {
        ToolResult::ignored().with_cursor(Cursor::Text)
    }

    fn on_pointer_up(&self, _store: &mut Store, _state: &mut ToolState, _ctx: &ToolEventContext) -> ToolResult {
        ToolResult::ignored()
    }
}
