//! Behavior registry for `custom` shapes.
//!
//! Built-in variants are handled by `match` throughout the core; custom
//! shapes carry a `kind` string and look up their hit-test and resize
//! behavior here. Painting lives in the render crate's painter registry.

use crate::model::Shape;
use kurbo::Point;
use std::collections::HashMap;

pub trait ShapeBehavior {
    /// Whether `point` (in the shape's unrotated world space) hits the shape.
    fn hit_test(&self, shape: &Shape, point: Point, tolerance: f64) -> bool;

    /// Side effects of a resize beyond the new bounds, which are already
    /// applied to `shape`. `fx`/`fy` are scale factors relative to `start`.
    fn resize(&self, _shape: &mut Shape, _start: &Shape, _fx: f64, _fy: f64) {}
}

#[derive(Default)]
pub struct ShapeRegistry {
    behaviors: HashMap<String, Box<dyn ShapeBehavior>>,
}

impl ShapeRegistry {
    /// Register (or replace) the behavior for `kind`.
    pub fn register(&mut self, kind: impl Into<String>, behavior: Box<dyn ShapeBehavior>) {
        let kind = kind.into();
        log::debug!("registering custom shape behavior `{kind}`");
        self.behaviors.insert(kind, behavior);
    }

    pub fn get(&self, kind: &str) -> Option<&dyn ShapeBehavior> {
        self.behaviors.get(kind).map(|b| b.as_ref())
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.behaviors.contains_key(kind)
    }
}

impl std::fmt::Debug for ShapeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapeRegistry")
            .field("kinds", &self.behaviors.keys().collect::<Vec<_>>())
            .finish()
    }
}
