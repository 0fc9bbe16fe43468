//! Scene: shapes keyed by id plus a back-to-front z-order and a selection.
//!
//! The map and the order list always hold exactly the same id set; every
//! mutating method keeps them in lockstep and drops removed ids from the
//! selection too. `check_invariants` asserts this.

use crate::id::ShapeId;
use crate::model::Shape;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default)]
pub struct Scene {
    shapes: HashMap<ShapeId, Shape>,
    order: Vec<ShapeId>,
    selection: HashSet<ShapeId>,
}

impl Scene {
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(id)
    }

    pub fn contains(&self, id: &ShapeId) -> bool {
        self.shapes.contains_key(id)
    }

    /// Ids back-to-front.
    pub fn order(&self) -> &[ShapeId] {
        &self.order
    }

    /// Shapes back-to-front.
    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.order.iter().filter_map(|id| self.shapes.get(id))
    }

    pub fn index_of(&self, id: &ShapeId) -> Option<usize> {
        self.order.iter().position(|x| x == id)
    }

    /// Insert on top. An existing shape with the same id is replaced in place.
    pub fn insert(&mut self, shape: Shape) {
        let id = shape.id;
        if self.shapes.insert(id, shape).is_none() {
            self.order.push(id);
        }
    }

    /// Insert at z-position `index` (clamped). An existing id is replaced
    /// in place and keeps its position.
    pub fn insert_at(&mut self, shape: Shape, index: usize) {
        let id = shape.id;
        if self.shapes.insert(id, shape).is_none() {
            let index = index.min(self.order.len());
            self.order.insert(index, id);
        }
    }

    /// Remove a shape from the map, the order and the selection.
    /// Returns the shape and its former z-position.
    pub fn remove(&mut self, id: &ShapeId) -> Option<(Shape, usize)> {
        let shape = self.shapes.remove(id)?;
        let index = self.index_of(id);
        if let Some(i) = index {
            self.order.remove(i);
        }
        self.selection.remove(id);
        Some((shape, index.unwrap_or(self.order.len())))
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
        self.order.clear();
        self.selection.clear();
    }

    // ─── Z-order ─────────────────────────────────────────────────────────

    /// Move `ids` to the top, keeping their relative order.
    pub fn bring_to_front(&mut self, ids: &[ShapeId]) -> bool {
        let set: HashSet<_> = ids.iter().filter(|id| self.contains(id)).copied().collect();
        if set.is_empty() {
            return false;
        }
        let before = self.order.clone();
        let (mut rest, moved): (Vec<_>, Vec<_>) = self.order.drain(..).partition(|id| !set.contains(id));
        rest.extend(moved);
        self.order = rest;
        self.order != before
    }

    /// Move `ids` to the bottom, keeping their relative order.
    pub fn send_to_back(&mut self, ids: &[ShapeId]) -> bool {
        let set: HashSet<_> = ids.iter().filter(|id| self.contains(id)).copied().collect();
        if set.is_empty() {
            return false;
        }
        let before = self.order.clone();
        let (mut moved, rest): (Vec<_>, Vec<_>) = self.order.drain(..).partition(|id| set.contains(id));
        moved.extend(rest);
        self.order = moved;
        self.order != before
    }

    /// Move each of `ids` one step up past its next unselected neighbour.
    pub fn bring_forward(&mut self, ids: &[ShapeId]) -> bool {
        let set: HashSet<_> = ids.iter().copied().collect();
        let mut changed = false;
        for i in (0..self.order.len().saturating_sub(1)).rev() {
            if set.contains(&self.order[i]) && !set.contains(&self.order[i + 1]) {
                self.order.swap(i, i + 1);
                changed = true;
            }
        }
        changed
    }

    /// Move each of `ids` one step down past its previous unselected neighbour.
    pub fn send_backward(&mut self, ids: &[ShapeId]) -> bool {
        let set: HashSet<_> = ids.iter().copied().collect();
        let mut changed = false;
        for i in 1..self.order.len() {
            if set.contains(&self.order[i]) && !set.contains(&self.order[i - 1]) {
                self.order.swap(i, i - 1);
                changed = true;
            }
        }
        changed
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn selection(&self) -> &HashSet<ShapeId> {
        &self.selection
    }

    pub fn is_selected(&self, id: &ShapeId) -> bool {
        self.selection.contains(id)
    }

    /// Selected ids in z-order (back-to-front).
    pub fn selected_ids(&self) -> Vec<ShapeId> {
        self.order
            .iter()
            .filter(|id| self.selection.contains(id))
            .copied()
            .collect()
    }

    /// Selected shapes in z-order.
    pub fn selected_shapes(&self) -> impl Iterator<Item = &Shape> {
        self.iter().filter(|s| self.selection.contains(&s.id))
    }

    /// Replace the selection with `ids`, ignoring unknown ids.
    pub fn set_selection(&mut self, ids: impl IntoIterator<Item = ShapeId>) {
        self.selection = ids.into_iter().filter(|id| self.shapes.contains_key(id)).collect();
    }

    /// Add or remove `id`; returns whether the selection changed.
    pub fn toggle_selected(&mut self, id: ShapeId) -> bool {
        if !self.shapes.contains_key(&id) {
            return false;
        }
        if !self.selection.remove(&id) {
            self.selection.insert(id);
        }
        true
    }

    pub fn deselect(&mut self, id: &ShapeId) -> bool {
        self.selection.remove(id)
    }

    pub fn clear_selection(&mut self) -> bool {
        let had = !self.selection.is_empty();
        self.selection.clear();
        had
    }

    /// Panics if the map, the order and the selection disagree.
    pub fn check_invariants(&self) {
        assert_eq!(
            self.shapes.len(),
            self.order.len(),
            "scene map and z-order have different sizes"
        );
        let unique: HashSet<_> = self.order.iter().collect();
        assert_eq!(unique.len(), self.order.len(), "duplicate id in z-order");
        for id in &self.order {
            assert!(self.shapes.contains_key(id), "z-order id {id} has no shape");
        }
        for (id, shape) in &self.shapes {
            assert_eq!(*id, shape.id, "shape stored under the wrong key");
        }
        for id in &self.selection {
            assert!(self.shapes.contains_key(id), "selected id {id} has no shape");
        }
    }
}
