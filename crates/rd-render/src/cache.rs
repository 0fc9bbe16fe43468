//! Drag-time fragment cache.
//!
//! While shapes are dragged their geometry rarely changes, only their
//! position does. The cache keeps one pre-built scene fragment per shape,
//! painted at the local origin, and appends it at the shape's current
//! position each frame. A fragment is rebuilt when the shape's fingerprint
//! (every visually relevant field except `x`/`y`) changes, and the whole
//! cache is dropped when the drag ends.

use crate::paint::{PaintContext, Run, paint_shape, placement};
use kurbo::Affine;
use rd_core::{Shape, ShapeId};
use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use vello::Scene;

/// Hash of everything that affects how `shape` looks, except its position.
pub fn fingerprint(shape: &Shape, zoom: f64) -> u64 {
    let mut h = DefaultHasher::new();
    for v in [shape.width, shape.height, shape.rotation, shape.opacity, shape.roughness, zoom] {
        v.to_bits().hash(&mut h);
    }
    shape.seed.hash(&mut h);
    shape.id.hash(&mut h);
    // Style and props are plain serde data; their JSON form is a stable key.
    match serde_json::to_vec(&(&shape.style, &shape.props)) {
        Ok(bytes) => bytes.hash(&mut h),
        Err(e) => log::warn!("fingerprint: cannot serialize {}: {e}", shape.id),
    }
    h.finish()
}

struct Fragment {
    fingerprint: u64,
    scene: Scene,
    run: Option<Run>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

#[derive(Default)]
pub struct DragCache {
    fragments: HashMap<ShapeId, Fragment>,
    stats: CacheStats,
}

impl DragCache {
    /// Append `shape` to `scene` at its current position, reusing the
    /// cached fragment when the fingerprint still matches. `view` is the
    /// world → screen transform.
    pub fn append(&mut self, scene: &mut Scene, shape: &Shape, view: Affine, ctx: &PaintContext<'_>) -> Option<Run> {
        let fp = fingerprint(shape, ctx.zoom);
        let fresh = match self.fragments.get(&shape.id) {
            Some(f) => f.fingerprint != fp,
            None => true,
        };
        if fresh {
            self.stats.misses += 1;
            let mut fragment = Scene::new();
            let run = paint_shape(&mut fragment, shape, Affine::IDENTITY, ctx);
            self.fragments.insert(
                shape.id,
                Fragment {
                    fingerprint: fp,
                    scene: fragment,
                    run,
                },
            );
        } else {
            self.stats.hits += 1;
            log::trace!("drag cache hit for {}", shape.id);
        }

        let fragment = self.fragments.get(&shape.id)?;
        let placed = view * placement(shape);
        scene.append(&fragment.scene, Some(placed));
        fragment.run.clone().map(|r| r.placed(placed))
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn clear(&mut self) {
        if !self.fragments.is_empty() {
            log::trace!("drag cache cleared ({} fragments)", self.fragments.len());
        }
        self.fragments.clear();
        self.stats = CacheStats::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::PainterRegistry;
    use crate::theme::Theme;
    use rd_core::EstimateMeasure;

    #[test]
    fn fingerprint_ignores_position_only() {
        let a = Shape::rectangle(ShapeId::intern("fp_a"), 0.0, 0.0, 50.0, 50.0);
        let mut moved = a.clone();
        moved.x = 300.0;
        moved.y = -20.0;
        assert_eq!(fingerprint(&a, 1.0), fingerprint(&moved, 1.0));

        let mut resized = a.clone();
        resized.width = 60.0;
        assert_ne!(fingerprint(&a, 1.0), fingerprint(&resized, 1.0));

        let mut restyled = a.clone();
        restyled.style.stroke_width = 4.0;
        assert_ne!(fingerprint(&a, 1.0), fingerprint(&restyled, 1.0));
    }

    #[test]
    fn moves_hit_and_changes_miss() {
        let theme = Theme::light();
        let measure = EstimateMeasure::default();
        let painters = PainterRegistry::default();
        let ctx = PaintContext {
            zoom: 1.0,
            theme: &theme,
            measure: &measure,
            painters: &painters,
        };
        let mut cache = DragCache::default();
        let mut shape = Shape::rectangle(ShapeId::intern("cache_rect"), 0.0, 0.0, 40.0, 40.0);

        for step in 0..5 {
            shape.x = step as f64 * 10.0;
            let mut scene = Scene::new();
            cache.append(&mut scene, &shape, Affine::IDENTITY, &ctx);
            assert!(!scene.encoding().is_empty());
        }
        assert_eq!(cache.stats(), CacheStats { hits: 4, misses: 1 });

        shape.width = 80.0;
        cache.append(&mut Scene::new(), &shape, Affine::IDENTITY, &ctx);
        assert_eq!(cache.stats().misses, 2);
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }
}
