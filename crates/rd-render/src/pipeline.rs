//! Two-layer render pipeline.
//!
//! The static layer holds everything that only changes when the document
//! does: background, grid and committed shapes. The interactive layer is
//! rebuilt on every pointer move while a tool is active and holds the
//! shapes being dragged, tool previews, selection chrome and overlays.
//! Shapes listed in [`Transient`] are painted on the interactive layer
//! only, so a drag never repaints the static layer.

use crate::cache::DragCache;
use crate::overlay::{
    HandleMetrics, Label, OverlayItem, paint_overlay_item, paint_selection_frame, paint_shape_outline,
};
use crate::paint::{PaintContext, PainterRegistry, Run, paint_shape, placement, to_color};
use crate::scheduler::DirtyLayers;
use crate::theme::Theme;
use kurbo::{Affine, BezPath, Point, Rect, Size, Stroke};
use peniko::Fill;
use rd_core::geometry::{rects_overlap, shape_bounds};
use rd_core::{Shape, ShapeId, Store, Viewport};
use std::collections::HashSet;
use vello::Scene;

/// Grid lines closer than this many screen pixels are not drawn.
const MIN_GRID_SPACING_PX: f64 = 8.0;

/// Shapes that belong on the interactive layer this frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transient {
    /// Committed shapes currently being moved, resized or rotated.
    pub ids: HashSet<ShapeId>,
    /// Tool previews that are not in the store yet.
    pub previews: Vec<Shape>,
}

impl Transient {
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty() && self.previews.is_empty()
    }
}

/// Counters from the last pass of each layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub painted: usize,
    pub culled: usize,
    pub cache_hits: u64,
    pub cache_misses: u64,
}

pub struct RenderPipeline {
    theme: Theme,
    painters: PainterRegistry,
    cache: DragCache,
    static_scene: Scene,
    interactive_scene: Scene,
    static_runs: Vec<Run>,
    interactive_runs: Vec<Run>,
    labels: Vec<Label>,
    surface: Size,
    show_grid: bool,
    stats: RenderStats,
}

impl RenderPipeline {
    pub fn new(theme: Theme, surface: Size) -> Self {
        Self {
            theme,
            painters: PainterRegistry::default(),
            cache: DragCache::default(),
            static_scene: Scene::new(),
            interactive_scene: Scene::new(),
            static_runs: Vec::new(),
            interactive_runs: Vec::new(),
            labels: Vec::new(),
            surface,
            show_grid: true,
            stats: RenderStats::default(),
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.cache.clear();
    }

    pub fn painters_mut(&mut self) -> &mut PainterRegistry {
        &mut self.painters
    }

    pub fn surface(&self) -> Size {
        self.surface
    }

    pub fn set_surface(&mut self, surface: Size) {
        self.surface = surface;
    }

    pub fn set_show_grid(&mut self, show: bool) {
        self.show_grid = show;
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    pub fn static_scene(&self) -> &Scene {
        &self.static_scene
    }

    pub fn interactive_scene(&self) -> &Scene {
        &self.interactive_scene
    }

    /// Text and image runs of both layers, static first.
    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.static_runs.iter().chain(&self.interactive_runs)
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Repaint whichever layers are dirty.
    pub fn render(&mut self, dirty: DirtyLayers, store: &Store, transient: &Transient, overlays: &[OverlayItem], dragging: bool) {
        if dirty.static_layer {
            self.render_static(store, transient);
        }
        if dirty.interactive {
            self.render_interactive(store, transient, overlays, dragging);
        }
    }

    /// Background, grid and every visible committed shape not in `transient`.
    pub fn render_static(&mut self, store: &Store, transient: &Transient) {
        self.static_scene.reset();
        self.static_runs.clear();
        let view = store.viewport();

        let surface = Rect::from_origin_size(Point::ZERO, self.surface);
        self.static_scene
            .fill(Fill::NonZero, Affine::IDENTITY, to_color(self.theme.background), None, &surface);
        if self.show_grid {
            self.paint_grid(&view, store.config().grid_size);
        }

        let margin = store.config().cull_margin / view.zoom;
        let visible = view.visible_world_rect(self.surface).inflate(margin, margin);
        let ctx = PaintContext {
            zoom: view.zoom,
            theme: &self.theme,
            measure: store.text_measure(),
            painters: &self.painters,
        };
        let mut painted = 0;
        let mut culled = 0;
        for shape in store.scene().iter() {
            if transient.ids.contains(&shape.id) {
                continue;
            }
            if !rects_overlap(shape_bounds(shape), visible) {
                culled += 1;
                continue;
            }
            painted += 1;
            let base = view.transform() * placement(shape);
            if let Some(run) = paint_shape(&mut self.static_scene, shape, base, &ctx) {
                self.static_runs.push(run);
            }
        }
        self.stats.painted = painted;
        self.stats.culled = culled;
        log::trace!("static pass: {painted} painted, {culled} culled");
    }

    fn paint_grid(&mut self, view: &Viewport, grid_size: f64) {
        if grid_size <= 0.0 || grid_size * view.zoom < MIN_GRID_SPACING_PX {
            return;
        }
        let area = view.visible_world_rect(self.surface);
        let mut lines = BezPath::new();
        let mut x = (area.x0 / grid_size).floor() * grid_size;
        while x <= area.x1 {
            lines.move_to((x, area.y0));
            lines.line_to((x, area.y1));
            x += grid_size;
        }
        let mut y = (area.y0 / grid_size).floor() * grid_size;
        while y <= area.y1 {
            lines.move_to((area.x0, y));
            lines.line_to((area.x1, y));
            y += grid_size;
        }
        let stroke = Stroke::new(1.0 / view.zoom);
        self.static_scene
            .stroke(&stroke, view.transform(), to_color(self.theme.grid), None, &lines);
    }

    /// Transient shapes, previews, selection chrome and tool overlays.
    /// While `dragging`, transient shapes go through the drag cache.
    pub fn render_interactive(
        &mut self,
        store: &Store,
        transient: &Transient,
        overlays: &[OverlayItem],
        dragging: bool,
    ) {
        self.interactive_scene.reset();
        self.interactive_runs.clear();
        self.labels.clear();
        let view = store.viewport();
        let ctx = PaintContext {
            zoom: view.zoom,
            theme: &self.theme,
            measure: store.text_measure(),
            painters: &self.painters,
        };

        // Keep z-order among the dragged shapes.
        for id in store.scene().order() {
            if !transient.ids.contains(id) {
                continue;
            }
            let Some(shape) = store.shape(id) else { continue };
            let run = if dragging {
                self.cache.append(&mut self.interactive_scene, shape, view.transform(), &ctx)
            } else {
                paint_shape(&mut self.interactive_scene, shape, view.transform() * placement(shape), &ctx)
            };
            self.interactive_runs.extend(run);
        }
        for preview in &transient.previews {
            let base = view.transform() * placement(preview);
            self.interactive_runs
                .extend(paint_shape(&mut self.interactive_scene, preview, base, &ctx));
        }

        // Handles belong to the unlocked members, the same set a drag moves.
        let selected: Vec<&Shape> = store.scene().selected_shapes().collect();
        let transforming = selected.iter().any(|s| !s.is_locked && transient.ids.contains(&s.id));
        if !transforming {
            for shape in &selected {
                paint_shape_outline(&mut self.interactive_scene, shape.rect(), shape.rotation, &view, &self.theme);
            }
            if let Some(frame) = store.selection_frame() {
                let metrics = HandleMetrics {
                    handle_size: store.config().handle_size,
                    rotation_offset: store.config().rotation_handle_offset,
                };
                paint_selection_frame(
                    &mut self.interactive_scene,
                    &frame,
                    selected.len() > 1,
                    &view,
                    &self.theme,
                    metrics,
                );
            }
        }

        for item in overlays {
            self.labels
                .extend(paint_overlay_item(&mut self.interactive_scene, item, &view, &self.theme));
        }

        let cache = self.cache.stats();
        self.stats.cache_hits = cache.hits;
        self.stats.cache_misses = cache.misses;
    }

    /// Drop cached drag fragments; call when a drag ends.
    pub fn end_drag(&mut self) {
        self.cache.clear();
    }

    /// Both layers in one scene, interactive on top.
    pub fn composite(&self) -> Scene {
        let mut out = Scene::new();
        out.append(&self.static_scene, None);
        out.append(&self.interactive_scene, None);
        out
    }
}
