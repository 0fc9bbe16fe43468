//! The editor store: scene, selection, viewport and history behind one
//! mutation API.
//!
//! Every mutation takes a `record` flag. Drags call with `record = false`
//! on every move and hand a single before/after batch to
//! `record_batch_update` on pointer-up, so one gesture is one undo step.
//!
//! Observers register with `subscribe` and are told what kind of state
//! changed; the editor uses this to mark render layers dirty.

use crate::config::EditorConfig;
use crate::document::{Document, DocumentError};
use crate::geometry::union_bounds;
use crate::handles::SelectionFrame;
use crate::hit;
use crate::history::{History, HistoryAction};
use crate::id::ShapeId;
use crate::model::{Shape, ShapePatch, ShapeType};
use crate::registry::ShapeRegistry;
use crate::resize::ResizeContext;
use crate::rng::Rng;
use crate::scene::Scene;
use crate::text::{EstimateMeasure, TextMeasure};
use crate::viewport::Viewport;
use kurbo::{Point, Rect, Size};

pub type ListenerId = u64;

/// What kind of state a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreChange {
    Shapes,
    Selection,
    Viewport,
    History,
    /// A whole document was loaded; everything changed.
    Document,
}

type Listener = Box<dyn FnMut(StoreChange)>;

pub struct Store {
    scene: Scene,
    viewport: Viewport,
    history: History,
    config: EditorConfig,
    registry: ShapeRegistry,
    text_measure: Box<dyn TextMeasure>,
    rng: Rng,
    is_drawing: bool,
    /// Host clock, used to timestamp history entries.
    now_ms: f64,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: ListenerId,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Store {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            scene: Scene::default(),
            viewport: Viewport::default(),
            history: History::new(config.max_history),
            rng: Rng::new(config.initial_seed),
            registry: ShapeRegistry::default(),
            text_measure: Box::new(EstimateMeasure::default()),
            is_drawing: false,
            now_ms: 0.0,
            listeners: Vec::new(),
            next_listener: 1,
            config,
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn registry(&self) -> &ShapeRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ShapeRegistry {
        &mut self.registry
    }

    pub fn text_measure(&self) -> &dyn TextMeasure {
        self.text_measure.as_ref()
    }

    /// Swap in the host's text metrics.
    pub fn set_text_measure(&mut self, measure: Box<dyn TextMeasure>) {
        self.text_measure = measure;
    }

    pub fn shape(&self, id: &ShapeId) -> Option<&Shape> {
        self.scene.get(id)
    }

    /// Shapes back-to-front.
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.scene.iter()
    }

    pub fn selected_ids(&self) -> Vec<ShapeId> {
        self.scene.selected_ids()
    }

    pub fn is_selected(&self, id: &ShapeId) -> bool {
        self.scene.is_selected(id)
    }

    pub fn set_time(&mut self, now_ms: f64) {
        self.now_ms = now_ms;
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn is_drawing(&self) -> bool {
        self.is_drawing
    }

    pub fn set_drawing(&mut self, drawing: bool) {
        self.is_drawing = drawing;
    }

    /// Next seed for a new shape's hand-drawn wobble.
    pub fn next_seed(&mut self) -> u32 {
        self.rng.next_u32()
    }

    /// Fresh id for a shape of `shape_type`.
    pub fn new_shape_id(&self, shape_type: ShapeType) -> ShapeId {
        ShapeId::with_prefix(shape_type.as_str())
    }

    pub fn resize_context(&self) -> ResizeContext<'_> {
        ResizeContext {
            measure: self.text_measure.as_ref(),
            min_font_size: self.config.min_font_size,
            registry: &self.registry,
        }
    }

    // ─── Observers ───────────────────────────────────────────────────────

    pub fn subscribe(&mut self, listener: impl FnMut(StoreChange) + 'static) -> ListenerId {
        let id = self.next_listener;
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, change: StoreChange) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(change);
        }
    }

    fn record(&mut self, action: HistoryAction) {
        self.history.record(action, self.now_ms);
        self.notify(StoreChange::History);
    }

    // ─── Shapes ──────────────────────────────────────────────────────────

    /// Add a shape on top. Returns `false` if its id is already taken.
    pub fn add_shape(&mut self, shape: Shape, record: bool) -> bool {
        self.add_shapes(vec![shape], record) == 1
    }

    /// Add shapes on top as one history entry. Shapes whose id is taken
    /// are skipped. Returns how many were added.
    pub fn add_shapes(&mut self, shapes: Vec<Shape>, record: bool) -> usize {
        let mut added = Vec::with_capacity(shapes.len());
        for shape in shapes {
            if self.scene.contains(&shape.id) {
                log::warn!("add_shape: id {} already exists", shape.id);
                continue;
            }
            added.push(shape.clone());
            self.scene.insert(shape);
        }
        if added.is_empty() {
            return 0;
        }
        let n = added.len();
        if record {
            self.record(HistoryAction::Create { shapes: added });
        }
        self.notify(StoreChange::Shapes);
        n
    }

    /// Merge `patch` into shape `id`. No-op (returns `false`) if absent.
    pub fn update_shape(&mut self, id: &ShapeId, patch: &ShapePatch, record: bool) -> bool {
        self.update_shapes(&[(*id, patch.clone())], record) > 0
    }

    /// Apply several patches; with `record` they form one history entry.
    pub fn update_shapes(&mut self, patches: &[(ShapeId, ShapePatch)], record: bool) -> usize {
        let mut before = Vec::new();
        let mut after = Vec::new();
        for (id, patch) in patches {
            let Some(shape) = self.scene.get_mut(id) else {
                continue;
            };
            let prev = shape.clone();
            shape.apply_patch(patch);
            if *shape != prev {
                after.push(shape.clone());
                before.push(prev);
            }
        }
        if after.is_empty() {
            return 0;
        }
        let n = after.len();
        if record {
            self.record(HistoryAction::Update { before, after });
        }
        self.notify(StoreChange::Shapes);
        n
    }

    /// Overwrite existing shapes wholesale (ids not present are skipped).
    /// Used by drags that change more than a patch expresses conveniently.
    pub fn replace_shapes(&mut self, shapes: Vec<Shape>, record: bool) -> usize {
        let patches: Vec<_> = shapes
            .iter()
            .filter_map(|s| self.scene.get(&s.id).map(|cur| (s.id, ShapePatch::diff(cur, s))))
            .filter(|(_, p)| !p.is_empty())
            .collect();
        self.update_shapes(&patches, record)
    }

    pub fn delete_shape(&mut self, id: &ShapeId, record: bool) -> bool {
        self.delete_shapes(&[*id], record) == 1
    }

    /// Remove shapes from the map, the z-order and the selection.
    pub fn delete_shapes(&mut self, ids: &[ShapeId], record: bool) -> usize {
        let mut targets: Vec<(usize, ShapeId)> = ids
            .iter()
            .filter_map(|id| self.scene.index_of(id).map(|i| (i, *id)))
            .collect();
        targets.sort_by_key(|(i, _)| *i);
        targets.dedup();
        if targets.is_empty() {
            return 0;
        }

        let positions: Vec<usize> = targets.iter().map(|(i, _)| *i).collect();
        let had_selection = targets.iter().any(|(_, id)| self.scene.is_selected(id));
        let mut shapes = Vec::with_capacity(targets.len());
        // Highest index first so earlier positions stay valid.
        for (_, id) in targets.iter().rev() {
            if let Some((shape, _)) = self.scene.remove(id) {
                shapes.push(shape);
            }
        }
        shapes.reverse();
        let n = shapes.len();

        if record {
            self.record(HistoryAction::Delete { shapes, positions });
        }
        self.notify(StoreChange::Shapes);
        if had_selection {
            self.notify(StoreChange::Selection);
        }
        n
    }

    pub fn clear_shapes(&mut self, record: bool) -> usize {
        let ids = self.scene.order().to_vec();
        self.delete_shapes(&ids, record)
    }

    /// Copy the selection (offset, fresh ids and seeds) as one history
    /// entry and select the copies.
    pub fn duplicate_selection(&mut self) -> Vec<ShapeId> {
        let offset = self.config.duplicate_offset;
        let originals: Vec<Shape> = self.scene.selected_shapes().cloned().collect();
        let mut copies = Vec::with_capacity(originals.len());
        for mut shape in originals {
            shape.id = self.new_shape_id(shape.shape_type());
            shape.seed = self.next_seed();
            shape.x += offset;
            shape.y += offset;
            shape.parent_id = None;
            copies.push(shape);
        }
        let ids: Vec<ShapeId> = copies.iter().map(|s| s.id).collect();
        if self.add_shapes(copies, true) > 0 {
            self.select_multiple(&ids);
        }
        ids
    }

    /// Lock every selected shape, or unlock them all if all are locked.
    pub fn toggle_lock(&mut self) -> bool {
        let selected: Vec<&Shape> = self.scene.selected_shapes().collect();
        if selected.is_empty() {
            return false;
        }
        let lock = selected.iter().any(|s| !s.is_locked);
        let patches: Vec<_> = selected
            .iter()
            .map(|s| {
                (
                    s.id,
                    ShapePatch {
                        is_locked: Some(lock),
                        ..Default::default()
                    },
                )
            })
            .collect();
        self.update_shapes(&patches, true) > 0
    }

    // ─── Z-order ─────────────────────────────────────────────────────────

    fn reorder(&mut self, f: impl FnOnce(&mut Scene) -> bool) -> bool {
        let changed = f(&mut self.scene);
        if changed {
            self.notify(StoreChange::Shapes);
        }
        changed
    }

    pub fn bring_to_front(&mut self, ids: &[ShapeId]) -> bool {
        self.reorder(|s| s.bring_to_front(ids))
    }

    pub fn send_to_back(&mut self, ids: &[ShapeId]) -> bool {
        self.reorder(|s| s.send_to_back(ids))
    }

    pub fn bring_forward(&mut self, ids: &[ShapeId]) -> bool {
        self.reorder(|s| s.bring_forward(ids))
    }

    pub fn send_backward(&mut self, ids: &[ShapeId]) -> bool {
        self.reorder(|s| s.send_backward(ids))
    }

    // ─── Selection ───────────────────────────────────────────────────────

    /// Replace the selection with `id`. Unknown ids leave it untouched.
    pub fn select(&mut self, id: &ShapeId) -> bool {
        if !self.scene.contains(id) {
            return false;
        }
        self.scene.set_selection([*id]);
        self.notify(StoreChange::Selection);
        true
    }

    pub fn select_multiple(&mut self, ids: &[ShapeId]) {
        self.scene.set_selection(ids.iter().copied());
        self.notify(StoreChange::Selection);
    }

    pub fn toggle_selection(&mut self, id: &ShapeId) -> bool {
        let changed = self.scene.toggle_selected(*id);
        if changed {
            self.notify(StoreChange::Selection);
        }
        changed
    }

    pub fn deselect(&mut self, id: &ShapeId) -> bool {
        let changed = self.scene.deselect(id);
        if changed {
            self.notify(StoreChange::Selection);
        }
        changed
    }

    pub fn clear_selection(&mut self) -> bool {
        let changed = self.scene.clear_selection();
        if changed {
            self.notify(StoreChange::Selection);
        }
        changed
    }

    pub fn select_all(&mut self) {
        let ids = self.scene.order().to_vec();
        self.select_multiple(&ids);
    }

    /// Frame that selection handles are laid out on. A single shape keeps
    /// its rotation; a multi-selection uses the axis-aligned union.
    pub fn selection_frame(&self) -> Option<SelectionFrame> {
        let selected: Vec<&Shape> = self.scene.selected_shapes().filter(|s| !s.is_locked).collect();
        let corners_only = !selected.is_empty() && selected.iter().all(|s| s.is_text());
        match selected.as_slice() {
            [] => None,
            [single] => Some(SelectionFrame {
                bounds: single.rect(),
                rotation: single.rotation,
                corners_only,
            }),
            many => Some(SelectionFrame {
                bounds: union_bounds(many.iter().copied())?,
                rotation: 0.0,
                corners_only,
            }),
        }
    }

    /// Topmost unlocked shape under `point` (world space). The hit
    /// tolerance is constant in screen pixels.
    pub fn shape_at_point(&self, point: Point) -> Option<ShapeId> {
        let tolerance = self.config.hit_tolerance / self.viewport.zoom;
        hit::shape_at_point(&self.scene, point, tolerance, &self.registry)
    }

    // ─── History ─────────────────────────────────────────────────────────

    /// Record a drag as one update entry. No-op if either side is empty
    /// or nothing changed.
    pub fn record_batch_update(&mut self, before: Vec<Shape>, after: Vec<Shape>) -> bool {
        if before.is_empty() || after.is_empty() || before == after {
            return false;
        }
        self.record(HistoryAction::Update { before, after });
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        let Some(entry) = self.history.step_back() else {
            return false;
        };
        let action = entry.action.clone();
        log::debug!("undo {}", action.label());
        match action {
            HistoryAction::Create { shapes } => {
                for shape in &shapes {
                    self.scene.remove(&shape.id);
                }
            }
            HistoryAction::Delete { shapes, positions } => self.restore_deleted(shapes, positions),
            HistoryAction::Update { before, .. } => self.restore_snapshots(before),
        }
        self.after_history_step();
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(entry) = self.history.step_forward() else {
            return false;
        };
        let action = entry.action.clone();
        log::debug!("redo {}", action.label());
        match action {
            HistoryAction::Create { shapes } => {
                for shape in shapes {
                    if !self.scene.contains(&shape.id) {
                        self.scene.insert(shape);
                    }
                }
            }
            HistoryAction::Delete { shapes, .. } => {
                for shape in &shapes {
                    self.scene.remove(&shape.id);
                }
            }
            HistoryAction::Update { after, .. } => self.restore_snapshots(after),
        }
        self.after_history_step();
        true
    }

    fn restore_deleted(&mut self, shapes: Vec<Shape>, positions: Vec<usize>) {
        let mut pairs: Vec<(usize, Shape)> = positions.into_iter().zip(shapes).collect();
        pairs.sort_by_key(|(i, _)| *i);
        for (index, shape) in pairs {
            if !self.scene.contains(&shape.id) {
                self.scene.insert_at(shape, index);
            }
        }
    }

    fn restore_snapshots(&mut self, shapes: Vec<Shape>) {
        for shape in shapes {
            if self.scene.contains(&shape.id) {
                self.scene.insert(shape);
            }
        }
    }

    fn after_history_step(&mut self) {
        if cfg!(debug_assertions) {
            self.scene.check_invariants();
        }
        self.notify(StoreChange::Shapes);
        self.notify(StoreChange::Selection);
        self.notify(StoreChange::History);
    }

    // ─── Viewport ────────────────────────────────────────────────────────

    pub fn pan(&mut self, dx: f64, dy: f64) {
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        self.viewport.pan(dx, dy);
        self.notify(StoreChange::Viewport);
    }

    /// Change the zoom by `delta` (clamped). With `center` (screen space)
    /// the world point under it stays put.
    pub fn zoom(&mut self, delta: f64, center: Option<Point>) -> bool {
        let target = self.viewport.zoom + delta;
        self.zoom_to(target, center)
    }

    pub fn zoom_to(&mut self, zoom: f64, center: Option<Point>) -> bool {
        let (min, max) = (self.config.min_zoom, self.config.max_zoom);
        let changed = self.viewport.zoom_to(zoom, center, min, max);
        if changed {
            self.notify(StoreChange::Viewport);
        }
        changed
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Viewport {
            zoom: viewport.zoom.clamp(self.config.min_zoom, self.config.max_zoom),
            ..viewport
        };
        self.notify(StoreChange::Viewport);
    }

    pub fn reset_zoom(&mut self, center: Option<Point>) -> bool {
        self.zoom_to(1.0, center)
    }

    /// Union bounds of every shape, `None` on an empty scene.
    pub fn content_bounds(&self) -> Option<Rect> {
        union_bounds(self.scene.iter())
    }

    /// Fit all content on a surface of `surface` pixels.
    pub fn zoom_to_fit(&mut self, surface: Size) -> bool {
        let Some(content) = self.content_bounds() else {
            return false;
        };
        let vp = Viewport::fit(
            content,
            surface,
            self.config.fit_padding,
            self.config.min_zoom,
            self.config.max_zoom,
        );
        self.set_viewport(vp);
        true
    }

    // ─── Documents ───────────────────────────────────────────────────────

    pub fn to_document(&self) -> Document {
        Document {
            shapes: self.scene.iter().cloned().collect(),
            viewport: self.viewport,
        }
    }

    /// Replace everything with `doc`. History is reset. Nothing changes if
    /// the document is invalid.
    pub fn load_document(&mut self, doc: Document) -> Result<(), DocumentError> {
        if let Err(e) = doc.validate(self.config.min_zoom, self.config.max_zoom) {
            log::warn!("rejected document: {e}");
            return Err(e);
        }
        self.scene.clear();
        for shape in doc.shapes {
            self.scene.insert(shape);
        }
        self.viewport = doc.viewport;
        self.history.clear();
        log::debug!("loaded document with {} shapes", self.scene.len());
        self.notify(StoreChange::Document);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn rect(name: &str, x: f64) -> Shape {
        Shape::rectangle(ShapeId::intern(name), x, 0.0, 10.0, 10.0)
    }

    fn ids(store: &Store) -> Vec<&str> {
        store.scene().order().iter().map(|id| id.as_str()).collect()
    }

    #[test]
    fn add_records_and_undo_removes() {
        let mut store = Store::default();
        assert!(store.add_shape(rect("st_add", 0.0), true));
        assert!(!store.add_shape(rect("st_add", 5.0), true));
        assert_eq!(store.history().len(), 1);

        assert!(store.undo());
        assert!(store.scene().is_empty());
        assert!(!store.undo());
        assert!(store.redo());
        assert_eq!(ids(&store), vec!["st_add"]);
        assert!(!store.redo());
    }

    #[test]
    fn unrecorded_mutations_leave_history_alone() {
        let mut store = Store::default();
        store.add_shape(rect("st_quiet", 0.0), false);
        store.update_shape(&ShapeId::intern("st_quiet"), &ShapePatch::position(4.0, 4.0), false);
        assert!(store.history().is_empty());
        assert_eq!(store.shape(&ShapeId::intern("st_quiet")).unwrap().x, 4.0);
    }

    #[test]
    fn update_unknown_is_noop() {
        let mut store = Store::default();
        assert!(!store.update_shape(&ShapeId::intern("st_ghost"), &ShapePatch::opacity(0.3), true));
        assert!(store.history().is_empty());
    }

    #[test]
    fn delete_undo_restores_z_position() {
        let mut store = Store::default();
        for (i, n) in ["del_a", "del_b", "del_c", "del_d"].iter().enumerate() {
            store.add_shape(rect(n, i as f64), false);
        }
        store.select(&ShapeId::intern("del_b"));
        let n = store.delete_shapes(&[ShapeId::intern("del_b"), ShapeId::intern("del_d")], true);
        assert_eq!(n, 2);
        assert_eq!(ids(&store), vec!["del_a", "del_c"]);
        assert!(store.selected_ids().is_empty());

        store.undo();
        assert_eq!(ids(&store), vec!["del_a", "del_b", "del_c", "del_d"]);
        store.scene().check_invariants();
    }

    #[test]
    fn batch_update_is_one_step() {
        let mut store = Store::default();
        let a = rect("batch_a", 0.0);
        let b = rect("batch_b", 20.0);
        store.add_shapes(vec![a.clone(), b.clone()], false);

        let mut a2 = a.clone();
        a2.x = 100.0;
        let mut b2 = b.clone();
        b2.x = 120.0;
        store.replace_shapes(vec![a2.clone(), b2.clone()], false);
        assert!(store.record_batch_update(vec![a.clone(), b.clone()], vec![a2, b2]));
        assert!(!store.record_batch_update(vec![], vec![a.clone()]));
        assert_eq!(store.history().len(), 1);

        store.undo();
        assert_eq!(store.shape(&a.id), Some(&a));
        assert_eq!(store.shape(&b.id), Some(&b));
    }

    #[test]
    fn listeners_hear_changes_until_unsubscribed() {
        let mut store = Store::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let id = store.subscribe(move |c| sink.borrow_mut().push(c));

        store.add_shape(rect("obs_a", 0.0), false);
        store.select(&ShapeId::intern("obs_a"));
        store.pan(5.0, 0.0);
        assert_eq!(
            *seen.borrow(),
            vec![StoreChange::Shapes, StoreChange::Selection, StoreChange::Viewport]
        );

        assert!(store.unsubscribe(id));
        store.pan(5.0, 0.0);
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn zoom_clamps_and_anchors() {
        let mut store = Store::default();
        let anchor = Point::new(400.0, 300.0);
        let world = store.viewport().screen_to_world(anchor);
        assert!(store.zoom(1.0, Some(anchor)));
        assert_eq!(store.viewport().zoom, 2.0);
        assert!(store.viewport().world_to_screen(world).distance(anchor) < 1e-9);

        store.zoom(100.0, None);
        assert_eq!(store.viewport().zoom, 10.0);
        assert!(!store.zoom(1.0, None));
    }

    #[test]
    fn duplicate_offsets_and_selects_copies() {
        let mut store = Store::default();
        store.add_shape(rect("dup_src", 0.0), false);
        store.select(&ShapeId::intern("dup_src"));
        let copies = store.duplicate_selection();
        assert_eq!(copies.len(), 1);
        assert_eq!(store.scene().len(), 2);
        assert_eq!(store.selected_ids(), copies);
        assert_eq!(store.shape(&copies[0]).unwrap().x, 10.0);
        assert_eq!(store.history().len(), 1);
    }

    #[test]
    fn toggle_lock_flips_selection() {
        let mut store = Store::default();
        store.add_shape(rect("lock_a", 0.0), false);
        store.select_all();
        assert!(store.toggle_lock());
        assert!(store.shape(&ShapeId::intern("lock_a")).unwrap().is_locked);
        assert!(store.toggle_lock());
        assert!(!store.shape(&ShapeId::intern("lock_a")).unwrap().is_locked);
    }

    #[test]
    fn selection_frame_single_keeps_rotation() {
        let mut store = Store::default();
        let mut s = rect("frame_rot", 0.0);
        s.rotation = 0.5;
        store.add_shape(s, false);
        store.add_shape(rect("frame_other", 50.0), false);

        store.select(&ShapeId::intern("frame_rot"));
        assert_eq!(store.selection_frame().unwrap().rotation, 0.5);

        store.select_all();
        let frame = store.selection_frame().unwrap();
        assert_eq!(frame.rotation, 0.0);
        assert_eq!(frame.bounds.x1, 60.0);
    }

    #[test]
    fn selection_frame_skips_locked_members() {
        let mut store = Store::default();
        let mut locked = rect("frame_locked", 200.0);
        locked.is_locked = true;
        store.add_shape(locked, false);
        store.add_shape(rect("frame_free", 0.0), false);

        store.select(&ShapeId::intern("frame_locked"));
        assert_eq!(store.selection_frame(), None);

        store.select_all();
        let frame = store.selection_frame().unwrap();
        assert_eq!(frame.bounds, store.shape(&ShapeId::intern("frame_free")).unwrap().rect());
    }

    #[test]
    fn load_rejects_without_touching_state() {
        let mut store = Store::default();
        store.add_shape(rect("keep_me", 0.0), false);
        let bad = Document {
            shapes: vec![],
            viewport: Viewport {
                x: 0.0,
                y: 0.0,
                zoom: 0.0,
            },
        };
        assert!(store.load_document(bad).is_err());
        assert_eq!(ids(&store), vec!["keep_me"]);
    }

    #[test]
    fn document_roundtrip_through_store() {
        let mut store = Store::default();
        store.add_shape(rect("rt_a", 0.0), true);
        store.add_shape(rect("rt_b", 30.0), true);
        let doc = store.to_document();

        let mut other = Store::default();
        other.load_document(doc.clone()).unwrap();
        assert_eq!(other.to_document(), doc);
        assert!(other.history().is_empty());
    }
}
