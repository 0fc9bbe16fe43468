//! Tool registry and dispatch.
//!
//! The manager owns every tool, the active and previous tool kinds and
//! the single [`ToolState`]. Pointer and keyboard input enter here and are
//! forwarded to the active tool; requests coming back from tools (open a
//! text editor) are carried out here so tools never reach across to each
//! other.

use crate::input::{Modifiers, PointerButton};
use crate::state::{TextEditRegion, ToolPhase, ToolState};
use crate::tools::{
    BoxTool, DEFAULT_PRESSURE, DrawTool, LinearTool, SelectTool, TextTool, Tool, ToolEventContext, ToolKind,
    ToolRequest, ToolResult, text,
};
use kurbo::Rect;
use rd_core::{ShapeId, Store, Viewport};
use rd_render::{OverlayItem, Transient};
use std::collections::HashMap;

pub struct ToolManager {
    tools: HashMap<ToolKind, Box<dyn Tool>>,
    active: ToolKind,
    previous: ToolKind,
    state: ToolState,
}

impl Default for ToolManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolManager {
    /// Manager with every built-in tool registered and Select active.
    pub fn new() -> Self {
        let mut manager = Self {
            tools: HashMap::new(),
            active: ToolKind::Select,
            previous: ToolKind::Select,
            state: ToolState::default(),
        };
        manager.register(Box::new(SelectTool));
        manager.register(Box::new(BoxTool::RECTANGLE));
        manager.register(Box::new(BoxTool::ELLIPSE));
        manager.register(Box::new(LinearTool::LINE));
        manager.register(Box::new(LinearTool::ARROW));
        manager.register(Box::new(DrawTool));
        manager.register(Box::new(TextTool));
        manager
    }

    /// Register (or replace) the tool for its kind.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.insert(tool.kind(), tool);
    }

    pub fn get_tool(&self, kind: ToolKind) -> Option<&dyn Tool> {
        self.tools.get(&kind).map(|t| t.as_ref())
    }

    pub fn active_tool(&self) -> ToolKind {
        self.active
    }

    pub fn previous_tool(&self) -> ToolKind {
        self.previous
    }

    pub fn state(&self) -> &ToolState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_dragging()
    }

    /// Synthetic context at the last known pointer position, used to
    /// finalize a gesture nobody will release.
    fn last_known_context(&self, store: &Store) -> ToolEventContext {
        let viewport = store.viewport();
        let canvas_point = self.state.drag_current;
        ToolEventContext {
            screen_point: viewport.world_to_screen(canvas_point),
            canvas_point,
            viewport,
            modifiers: self.state.modifiers,
            button: PointerButton::Primary,
            pressure: DEFAULT_PRESSURE,
        }
    }

    /// Switch tools: finalize the in-flight gesture, deactivate the current
    /// tool, clear the selection, reset the state, activate the next tool.
    pub fn set_active_tool(&mut self, store: &mut Store, kind: ToolKind) -> bool {
        if kind == self.active || !self.tools.contains_key(&kind) {
            return false;
        }
        if self.state.is_dragging() {
            let ctx = self.last_known_context(store);
            if let Some(tool) = self.tools.get(&self.active) {
                tool.on_pointer_cancel(store, &mut self.state, &ctx);
            }
        }
        if let Some(tool) = self.tools.get(&self.active) {
            tool.on_deactivate(store, &mut self.state);
        }
        text::confirm(store, &mut self.state);
        store.clear_selection();
        self.state.reset();

        log::debug!("tool: {:?} → {kind:?}", self.active);
        self.previous = self.active;
        self.active = kind;
        if let Some(tool) = self.tools.get(&kind) {
            tool.on_activate(store, &mut self.state);
        }
        true
    }

    pub fn toggle_last_tool(&mut self, store: &mut Store) -> bool {
        self.set_active_tool(store, self.previous)
    }

    fn handle_request(&mut self, store: &mut Store, result: &ToolResult) {
        match result.request {
            Some(ToolRequest::EditText(id)) => {
                text::open_existing(store, &mut self.state, id);
            }
            Some(ToolRequest::CreateText(point)) => {
                store.clear_selection();
                text::open_new(store, &mut self.state, point);
            }
            None => {}
        }
    }

    pub fn pointer_down(&mut self, store: &mut Store, ctx: &ToolEventContext) -> ToolResult {
        // Clicking elsewhere commits an open editor; the text tool does
        // this itself so it can reopen on the same click.
        if self.active != ToolKind::Text && self.state.text_edit.is_some() {
            text::confirm(store, &mut self.state);
        }
        self.state.modifiers = ctx.modifiers;
        let Some(tool) = self.tools.get(&self.active) else {
            return ToolResult::ignored();
        };
        let result = tool.on_pointer_down(store, &mut self.state, ctx);
        self.handle_request(store, &result);
        result
    }

    pub fn pointer_move(&mut self, store: &mut Store, ctx: &ToolEventContext) -> ToolResult {
        self.state.modifiers = ctx.modifiers;
        match self.tools.get(&self.active) {
            Some(tool) => tool.on_pointer_move(store, &mut self.state, ctx),
            None => ToolResult::ignored(),
        }
    }

    pub fn pointer_up(&mut self, store: &mut Store, ctx: &ToolEventContext) -> ToolResult {
        self.state.modifiers = ctx.modifiers;
        match self.tools.get(&self.active) {
            Some(tool) => tool.on_pointer_up(store, &mut self.state, ctx),
            None => ToolResult::ignored(),
        }
    }

    /// Capture was lost; finalize whatever is in flight.
    pub fn pointer_cancel(&mut self, store: &mut Store) -> ToolResult {
        if !self.state.is_dragging() {
            return ToolResult::ignored();
        }
        let ctx = self.last_known_context(store);
        match self.tools.get(&self.active) {
            Some(tool) => tool.on_pointer_cancel(store, &mut self.state, &ctx),
            None => ToolResult::ignored(),
        }
    }

    pub fn double_click(&mut self, store: &mut Store, ctx: &ToolEventContext) -> ToolResult {
        let Some(tool) = self.tools.get(&self.active) else {
            return ToolResult::ignored();
        };
        let result = tool.on_double_click(store, &mut self.state, ctx);
        self.handle_request(store, &result);
        result
    }

    pub fn key_down(&mut self, store: &mut Store, key: &str, modifiers: Modifiers) -> ToolResult {
        match self.tools.get(&self.active) {
            Some(tool) => tool.on_key_down(store, &mut self.state, key, modifiers),
            None => ToolResult::ignored(),
        }
    }

    /// Overlay items for the active gesture plus the open text editor.
    pub fn render_overlay(&self, store: &Store, viewport: &Viewport) -> Vec<OverlayItem> {
        let mut items = match self.tools.get(&self.active) {
            Some(tool) => tool.render_overlay(store, &self.state, viewport),
            None => Vec::new(),
        };
        if let Some(session) = &self.state.text_edit {
            let bounds = session
                .shape_id
                .and_then(|id| store.shape(&id))
                .map(|s| s.rect())
                .unwrap_or_else(|| {
                    let line = session.font_size * 1.25;
                    Rect::new(session.anchor.x, session.anchor.y, session.anchor.x + line, session.anchor.y + line)
                });
            items.push(OverlayItem::TextEditBox {
                bounds,
                rotation: session.rotation,
            });
        }
        items
    }

    /// Shapes the renderer should take off the static layer this frame.
    pub fn transient_shapes(&self, store: &Store) -> Transient {
        let mut transient = Transient::default();
        if matches!(
            self.state.phase,
            ToolPhase::Moving | ToolPhase::Resizing(_) | ToolPhase::Rotating
        ) {
            transient.ids = self
                .state
                .snapshots
                .iter()
                .map(|s| s.id)
                .filter(|id| store.scene().contains(id))
                .collect();
        }
        transient.previews.extend(self.state.preview.clone());
        transient
    }

    // ─── Text editing ────────────────────────────────────────────────────

    pub fn is_editing_text(&self) -> bool {
        self.state.text_edit.is_some()
    }

    pub fn text_edit_region(&self, store: &Store) -> Option<TextEditRegion> {
        text::edit_region(store, &self.state)
    }

    pub fn set_text_content(&mut self, content: &str) -> bool {
        text::set_content(&mut self.state, content)
    }

    pub fn confirm_text(&mut self, store: &mut Store) -> Option<ShapeId> {
        text::confirm(store, &mut self.state)
    }

    pub fn cancel_text(&mut self, store: &mut Store) {
        text::cancel(store, &mut self.state);
    }

    /// The host editor lost focus at `now_ms`; confirm after the debounce
    /// unless focus comes back first.
    pub fn text_blur(&mut self, store: &Store, now_ms: f64) {
        if self.state.text_edit.is_some() {
            self.state.pending_blur = Some(now_ms + store.config().blur_confirm_delay_ms);
        }
    }

    pub fn text_focus(&mut self) {
        self.state.pending_blur = None;
    }

    /// Fire a due blur confirmation. Returns `true` if one fired.
    pub fn tick(&mut self, store: &mut Store, now_ms: f64) -> bool {
        match self.state.pending_blur {
            Some(due) if now_ms >= due => {
                log::debug!("text: blur confirmed");
                text::confirm(store, &mut self.state);
                true
            }
            _ => false,
        }
    }
}
