//! Tool system for canvas interactions.
//!
//! Each tool turns pointer and keyboard input into `Store` mutations. Tools
//! are stateless unit structs; the gesture in flight lives in the
//! [`ToolState`] the manager passes in.
//!
//! ## Modifier behaviors
//!
//! | Modifier | Select | Rectangle / Ellipse | Line / Arrow |
//! |----------|--------|---------------------|--------------|
//! | **Shift** | Toggle selection, axis-constrain move, 15° rotation, keep aspect | Square / circle | 45° snap |
//! | **Alt** | | Draw from center | |

pub mod draw;
pub mod linear;
pub mod select;
pub mod shape;
pub mod text;

use crate::input::{Modifiers, PointerButton, PointerInput};
use crate::state::ToolState;
use kurbo::Point;
use rd_core::{ResizeHandle, ShapeId, Store, Viewport};
use rd_render::OverlayItem;

pub use draw::DrawTool;
pub use linear::LinearTool;
pub use select::SelectTool;
pub use shape::BoxTool;
pub use text::TextTool;

/// Pressure assumed for devices that do not report one.
pub const DEFAULT_PRESSURE: f64 = 0.5;

/// The active tool determines how input events are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    Select,
    Rectangle,
    Ellipse,
    Line,
    Arrow,
    Draw,
    Text,
}

impl ToolKind {
    pub const ALL: [ToolKind; 7] = [
        ToolKind::Select,
        ToolKind::Rectangle,
        ToolKind::Ellipse,
        ToolKind::Line,
        ToolKind::Arrow,
        ToolKind::Draw,
        ToolKind::Text,
    ];
}

/// Pointer cursor the host should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Default,
    Crosshair,
    Move,
    Text,
    Grab,
    Resize(ResizeHandle),
}

impl Cursor {
    /// CSS `cursor` value.
    pub fn css_name(&self) -> &'static str {
        match self {
            Cursor::Default => "default",
            Cursor::Crosshair => "crosshair",
            Cursor::Move => "move",
            Cursor::Text => "text",
            Cursor::Grab => "grab",
            Cursor::Resize(handle) => handle.cursor_name(),
        }
    }
}

/// Something a tool asks the manager to do on its behalf.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToolRequest {
    /// Open the inline editor on an existing text shape.
    EditText(ShapeId),
    /// Open the inline editor for a new text at this world point.
    CreateText(Point),
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ToolResult {
    pub handled: bool,
    /// Keep receiving pointer events outside the canvas until release.
    pub capture: bool,
    pub cursor: Option<Cursor>,
    pub request: Option<ToolRequest>,
}

impl ToolResult {
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn handled() -> Self {
        Self {
            handled: true,
            ..Self::default()
        }
    }

    /// Handled, with pointer capture for the rest of the gesture.
    pub fn captured() -> Self {
        Self {
            handled: true,
            capture: true,
            ..Self::default()
        }
    }

    pub fn with_cursor(mut self, cursor: Cursor) -> Self {
        self.cursor = Some(cursor);
        self
    }

    pub fn with_request(mut self, request: ToolRequest) -> Self {
        self.request = Some(request);
        self
    }
}

/// A pointer event resolved against the current viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolEventContext {
    pub screen_point: Point,
    /// World-space position.
    pub canvas_point: Point,
    pub viewport: Viewport,
    pub modifiers: Modifiers,
    pub button: PointerButton,
    pub pressure: f64,
}

impl ToolEventContext {
    pub fn new(input: &PointerInput, viewport: Viewport) -> Self {
        let screen_point = input.position();
        Self {
            screen_point,
            canvas_point: viewport.screen_to_world(screen_point),
            viewport,
            modifiers: input.modifiers,
            button: input.button,
            pressure: input.pressure.filter(|p| *p > 0.0).unwrap_or(DEFAULT_PRESSURE),
        }
    }
}

/// Trait for tools that handle input and mutate the store.
pub trait Tool {
    fn kind(&self) -> ToolKind;

    fn on_activate(&self, _store: &mut Store, _state: &mut ToolState) {}

    fn on_deactivate(&self, _store: &mut Store, _state: &mut ToolState) {}

    fn on_pointer_down(&self, store: &mut Store, state: &mut ToolState, ctx: &ToolEventContext) -> ToolResult;

    fn on_pointer_move(&self, store: &mut Store, state: &mut ToolState, ctx: &ToolEventContext) -> ToolResult;

    fn on_pointer_up(&self, store: &mut Store, state: &mut ToolState, ctx: &ToolEventContext) -> ToolResult;

    /// Capture was lost mid-gesture. The in-flight operation is finalized
    /// exactly as a release at the last known position would.
    fn on_pointer_cancel(&self, store: &mut Store, state: &mut ToolState, ctx: &ToolEventContext) -> ToolResult {
        self.on_pointer_up(store, state, ctx)
    }

    fn on_double_click(&self, _store: &mut Store, _state: &mut ToolState, _ctx: &ToolEventContext) -> ToolResult {
        ToolResult::ignored()
    }

    fn on_key_down(
        &self,
        _store: &mut Store,
        _state: &mut ToolState,
        _key: &str,
        _modifiers: Modifiers,
    ) -> ToolResult {
        ToolResult::ignored()
    }

    /// Interactive-layer items for the gesture in flight (world space).
    fn render_overlay(&self, _store: &Store, _state: &ToolState, _viewport: &Viewport) -> Vec<OverlayItem> {
        Vec::new()
    }
}

// ─── Preview helpers (box and linear tools) ──────────────────────────────

/// Commit the drag preview: discarded if smaller than `min_shape_size` in
/// both dimensions, otherwise added with history and selected.
pub(crate) fn commit_preview(store: &mut Store, state: &mut ToolState) -> ToolResult {
    let Some(preview) = state.preview.take() else {
        state.end_gesture();
        return ToolResult::ignored();
    };
    state.end_gesture();
    let min = store.config().min_shape_size;
    if preview.width < min && preview.height < min {
        log::debug!("discarding undersized {} ({}×{})", preview.id, preview.width, preview.height);
        return ToolResult::handled();
    }
    let id = preview.id;
    if store.add_shape(preview, true) {
        log::debug!("committed {id}");
        store.select(&id);
    }
    ToolResult::handled()
}

/// Size label under the preview while dragging.
pub(crate) fn preview_overlay(state: &ToolState) -> Vec<OverlayItem> {
    match &state.preview {
        Some(p) => vec![OverlayItem::Dimensions { bounds: p.rect() }],
        None => Vec::new(),
    }
}
