//! Editor session: one store, one tool manager, one render pipeline.
//!
//! The host forwards raw input and calls [`Editor::frame`] from its frame
//! callback whenever [`Editor::is_frame_pending`] says a paint is due. Store
//! changes reach the scheduler through a listener registered in
//! [`Editor::new`] and removed on drop.

use crate::gesture::{GestureTracker, GestureUpdate};
use crate::input::{KeyEvent, PointerInput, PointerKind, WheelInput};
use crate::manager::ToolManager;
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::state::TextEditRegion;
use crate::tools::{ToolEventContext, ToolKind, ToolResult};
use kurbo::{Point, Size};
use rd_core::{Document, DocumentError, EditorConfig, ListenerId, ShapeId, Store, StoreChange};
use rd_render::{DirtyLayers, FrameScheduler, Layer, RenderPipeline, Theme};
use smallvec::SmallVec;
use std::rc::Rc;

pub struct Editor {
    store: Store,
    tools: ToolManager,
    pipeline: RenderPipeline,
    scheduler: Rc<FrameScheduler>,
    gestures: GestureTracker,
    /// Touches stay with the gesture until every finger has lifted.
    touch_suppressed: bool,
    /// Extra fingers that landed while a tool gesture was running.
    ignored_touches: SmallVec<[u32; 4]>,
    listener: ListenerId,
}

impl Editor {
    pub fn new(config: EditorConfig, theme: Theme, surface: Size) -> Self {
        let mut store = Store::new(config);
        let scheduler = Rc::new(FrameScheduler::new());
        let sink = Rc::clone(&scheduler);
        let listener = store.subscribe(move |change| {
            match change {
                StoreChange::Selection => sink.request(Layer::Interactive),
                StoreChange::Viewport | StoreChange::Document => sink.mark_all(),
                StoreChange::Shapes | StoreChange::History => {
                    sink.request(Layer::Interactive);
                    sink.request(Layer::Static)
                }
            };
        });
        scheduler.mark_all();
        Self {
            store,
            tools: ToolManager::new(),
            pipeline: RenderPipeline::new(theme, surface),
            scheduler,
            gestures: GestureTracker::new(),
            touch_suppressed: false,
            ignored_touches: SmallVec::new(),
            listener,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Direct store access. Mutations still schedule repaints.
    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    pub fn tools(&self) -> &ToolManager {
        &self.tools
    }

    pub fn pipeline(&self) -> &RenderPipeline {
        &self.pipeline
    }

    pub fn pipeline_mut(&mut self) -> &mut RenderPipeline {
        &mut self.pipeline
    }

    pub fn is_frame_pending(&self) -> bool {
        self.scheduler.is_frame_pending()
    }

    // ─── Frames ──────────────────────────────────────────────────────────

    /// Paint whatever is dirty. Returns the layers that were repainted.
    pub fn frame(&mut self) -> DirtyLayers {
        let dirty = self.scheduler.take_frame();
        if !dirty.any() {
            return dirty;
        }
        let viewport = self.store.viewport();
        let transient = self.tools.transient_shapes(&self.store);
        let overlays = self.tools.render_overlay(&self.store, &viewport);
        self.pipeline
            .render(dirty, &self.store, &transient, &overlays, self.scheduler.is_dragging());
        log::trace!("frame: {dirty:?}");
        dirty
    }

    /// Advance host time. Fires a due text blur confirmation.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        self.store.set_time(now_ms);
        let fired = self.tools.tick(&mut self.store, now_ms);
        if fired {
            self.scheduler.request(Layer::Interactive);
        }
        fired
    }

    pub fn resize_surface(&mut self, surface: Size) {
        self.pipeline.set_surface(surface);
        self.scheduler.mark_all();
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.pipeline.set_theme(theme);
        self.scheduler.mark_all();
    }

    pub fn set_show_grid(&mut self, show: bool) {
        self.pipeline.set_show_grid(show);
        self.scheduler.request(Layer::Static);
    }

    // ─── Tools ───────────────────────────────────────────────────────────

    pub fn active_tool(&self) -> ToolKind {
        self.tools.active_tool()
    }

    pub fn set_tool(&mut self, kind: ToolKind) -> bool {
        let changed = self.tools.set_active_tool(&mut self.store, kind);
        if changed {
            self.after_tool_event(true);
        }
        changed
    }

    /// Keep the scheduler's drag mode in step with the tool state, then
    /// repaint the interactive layer if the event did anything.
    fn after_tool_event(&mut self, handled: bool) {
        let dragging = self.tools.is_dragging();
        if dragging != self.scheduler.is_dragging() {
            if dragging {
                // Repaint once without the shapes that just became transient.
                self.scheduler.request(Layer::Static);
                self.scheduler.set_dragging(true);
            } else {
                self.scheduler.set_dragging(false);
                self.pipeline.end_drag();
                self.scheduler.request(Layer::Static);
            }
        }
        if handled {
            self.scheduler.request(Layer::Interactive);
        }
    }

    fn context(&self, input: &PointerInput) -> ToolEventContext {
        ToolEventContext::new(input, self.store.viewport())
    }

    // ─── Pointer input ───────────────────────────────────────────────────

    pub fn pointer_down(&mut self, input: &PointerInput) -> ToolResult {
        if input.kind == PointerKind::Touch && self.touch_down(input) {
            return ToolResult::handled();
        }
        let ctx = self.context(input);
        let result = self.tools.pointer_down(&mut self.store, &ctx);
        self.after_tool_event(result.handled);
        result
    }

    pub fn pointer_move(&mut self, input: &PointerInput) -> ToolResult {
        if input.kind == PointerKind::Touch && self.touch_move(input) {
            return ToolResult::handled();
        }
        let ctx = self.context(input);
        let result = self.tools.pointer_move(&mut self.store, &ctx);
        self.after_tool_event(result.handled);
        result
    }

    pub fn pointer_up(&mut self, input: &PointerInput) -> ToolResult {
        if input.kind == PointerKind::Touch && self.touch_up(input) {
            return ToolResult::handled();
        }
        let ctx = self.context(input);
        let result = self.tools.pointer_up(&mut self.store, &ctx);
        self.after_tool_event(true);
        result
    }

    /// Pointer capture was lost. The in-flight gesture is finalized.
    pub fn pointer_cancel(&mut self) -> ToolResult {
        self.gestures.reset();
        self.touch_suppressed = false;
        self.ignored_touches.clear();
        let result = self.tools.pointer_cancel(&mut self.store);
        self.after_tool_event(true);
        result
    }

    pub fn double_click(&mut self, input: &PointerInput) -> ToolResult {
        let ctx = self.context(input);
        let result = self.tools.double_click(&mut self.store, &ctx);
        self.after_tool_event(result.handled);
        result
    }

    /// Returns `true` if the touch belongs to a pinch gesture and must not
    /// reach the active tool.
    fn touch_down(&mut self, input: &PointerInput) -> bool {
        if self.touch_suppressed {
            self.gestures.touch_down(input.pointer_id, input.position());
            return true;
        }
        if self.tools.is_dragging() {
            // A tool gesture owns the first finger; extra fingers are ignored.
            self.ignored_touches.push(input.pointer_id);
            return true;
        }
        if self.gestures.touch_down(input.pointer_id, input.position()) {
            log::debug!("gesture: start");
            self.touch_suppressed = true;
            return true;
        }
        false
    }

    fn touch_move(&mut self, input: &PointerInput) -> bool {
        if self.ignored_touches.contains(&input.pointer_id) {
            return true;
        }
        let update = self.gestures.touch_move(input.pointer_id, input.position());
        if !self.touch_suppressed {
            return false;
        }
        if let Some(update) = update {
            self.apply_gesture(update);
        }
        true
    }

    fn touch_up(&mut self, input: &PointerInput) -> bool {
        let before = self.ignored_touches.len();
        self.ignored_touches.retain(|id| *id != input.pointer_id);
        if self.ignored_touches.len() != before {
            return true;
        }
        if self.gestures.touch_up(input.pointer_id) {
            log::debug!("gesture: end");
        }
        if !self.touch_suppressed {
            return false;
        }
        if self.gestures.touch_count() == 0 {
            self.touch_suppressed = false;
        }
        true
    }

    fn apply_gesture(&mut self, update: GestureUpdate) {
        self.store.pan(update.pan.x, update.pan.y);
        let zoom = self.store.viewport().zoom * update.zoom_factor;
        self.store.zoom_to(zoom, Some(update.anchor));
    }

    pub fn wheel(&mut self, input: &WheelInput) -> bool {
        if input.modifiers.command() {
            let speed = self.store.config().wheel_zoom_speed;
            let zoom = self.store.viewport().zoom * (-input.delta_y * speed).exp();
            self.store.zoom_to(zoom, Some(Point::new(input.x, input.y)))
        } else {
            let before = self.store.viewport();
            self.store.pan(-input.delta_x, -input.delta_y);
            self.store.viewport() != before
        }
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    /// Route a key press to the active tool, then to the shortcut map.
    /// Returns `true` if anything handled it. Keys are ignored while a
    /// pointer gesture is in flight.
    pub fn key_down(&mut self, event: &KeyEvent) -> bool {
        if self.store.is_drawing() || self.tools.is_editing_text() || self.tools.is_dragging() {
            return false;
        }
        let result = self.tools.key_down(&mut self.store, &event.key, event.modifiers);
        if result.handled {
            self.after_tool_event(true);
            return true;
        }
        match ShortcutMap::resolve(&event.key, event.modifiers) {
            Some(action) => {
                let done = self.run_action(action);
                self.after_tool_event(done);
                done
            }
            None => false,
        }
    }

    fn surface_center(&self) -> Point {
        let size = self.pipeline.surface();
        Point::new(size.width / 2.0, size.height / 2.0)
    }

    fn unlocked_selection(&self) -> Vec<ShapeId> {
        self.store
            .selected_ids()
            .into_iter()
            .filter(|id| self.store.shape(id).is_some_and(|s| !s.is_locked))
            .collect()
    }

    pub fn run_action(&mut self, action: ShortcutAction) -> bool {
        log::debug!("shortcut: {action:?}");
        let step = self.store.config().zoom_step;
        let center = Some(self.surface_center());
        let selected = self.store.selected_ids();
        match action {
            ShortcutAction::Tool(kind) => self.tools.set_active_tool(&mut self.store, kind),
            ShortcutAction::ToggleLastTool => self.tools.toggle_last_tool(&mut self.store),
            ShortcutAction::Undo => self.store.undo(),
            ShortcutAction::Redo => self.store.redo(),
            ShortcutAction::Delete => {
                let ids = self.unlocked_selection();
                self.store.delete_shapes(&ids, true) > 0
            }
            ShortcutAction::SelectAll => {
                self.store.select_all();
                true
            }
            ShortcutAction::Duplicate => !self.store.duplicate_selection().is_empty(),
            ShortcutAction::ToggleLock => self.store.toggle_lock(),
            ShortcutAction::ZoomIn => self.store.zoom(step, center),
            ShortcutAction::ZoomOut => self.store.zoom(-step, center),
            ShortcutAction::ResetZoom => self.store.reset_zoom(center),
            ShortcutAction::ZoomToFit => self.store.zoom_to_fit(self.pipeline.surface()),
            ShortcutAction::SendBackward => self.store.send_backward(&selected),
            ShortcutAction::BringForward => self.store.bring_forward(&selected),
            ShortcutAction::SendToBack => self.store.send_to_back(&selected),
            ShortcutAction::BringToFront => self.store.bring_to_front(&selected),
            ShortcutAction::Deselect => self.store.clear_selection(),
        }
    }

    // ─── Text editing ────────────────────────────────────────────────────

    pub fn text_edit_region(&self) -> Option<TextEditRegion> {
        self.tools.text_edit_region(&self.store)
    }

    pub fn set_text_content(&mut self, content: &str) -> bool {
        let changed = self.tools.set_text_content(content);
        if changed {
            self.scheduler.request(Layer::Interactive);
        }
        changed
    }

    pub fn confirm_text(&mut self) -> Option<ShapeId> {
        let id = self.tools.confirm_text(&mut self.store);
        self.scheduler.request(Layer::Interactive);
        id
    }

    pub fn cancel_text(&mut self) {
        self.tools.cancel_text(&mut self.store);
        self.scheduler.request(Layer::Interactive);
    }

    /// The host's inline editor lost focus at `now_ms`.
    pub fn text_blur(&mut self, now_ms: f64) {
        self.tools.text_blur(&self.store, now_ms);
    }

    pub fn text_focus(&mut self) {
        self.tools.text_focus();
    }

    // ─── Documents ───────────────────────────────────────────────────────

    pub fn to_document(&self) -> Document {
        self.store.to_document()
    }

    /// Replace the scene. In-flight gestures and text sessions are
    /// finalized against the old scene first.
    pub fn load_document(&mut self, doc: Document) -> Result<(), DocumentError> {
        doc.validate(self.store.config().min_zoom, self.store.config().max_zoom)?;
        self.tools.pointer_cancel(&mut self.store);
        self.tools.cancel_text(&mut self.store);
        self.after_tool_event(false);
        self.store.load_document(doc)
    }

    pub fn load_json(&mut self, json: &str) -> Result<(), DocumentError> {
        self.load_document(Document::from_json(json)?)
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        self.store.to_document().to_json()
    }
}

impl Drop for Editor {
    fn drop(&mut self) {
        self.store.unsubscribe(self.listener);
    }
}
