//! Two-finger pinch-zoom and pan.
//!
//! The tracker only does the arithmetic. The editor decides when touches
//! reach it: a gesture never starts while a tool drag is in flight, and
//! tool input is suppressed while a gesture runs.

use kurbo::{Point, Vec2};

/// Incremental camera change produced by one touch move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureUpdate {
    /// Multiply the current zoom by this.
    pub zoom_factor: f64,
    /// Screen point to zoom about (the current finger midpoint).
    pub anchor: Point,
    /// Screen-space pan since the previous update.
    pub pan: Vec2,
}

#[derive(Debug, Clone, Default)]
pub struct GestureTracker {
    touches: Vec<(u32, Point)>,
    /// Finger distance and midpoint at the previous update.
    last: Option<(f64, Point)>,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Two or more fingers are down.
    pub fn is_active(&self) -> bool {
        self.touches.len() >= 2
    }

    pub fn touch_count(&self) -> usize {
        self.touches.len()
    }

    fn span(&self) -> Option<(f64, Point)> {
        let [(_, a), (_, b), ..] = self.touches.as_slice() else {
            return None;
        };
        Some((a.distance(*b), a.midpoint(*b)))
    }

    /// Register a finger. Returns `true` if this starts a gesture.
    pub fn touch_down(&mut self, pointer_id: u32, position: Point) -> bool {
        let was_active = self.is_active();
        match self.touches.iter_mut().find(|(id, _)| *id == pointer_id) {
            Some((_, p)) => *p = position,
            None => self.touches.push((pointer_id, position)),
        }
        self.last = self.span();
        !was_active && self.is_active()
    }

    /// Move a finger; yields a camera update while a gesture is active.
    pub fn touch_move(&mut self, pointer_id: u32, position: Point) -> Option<GestureUpdate> {
        let (_, p) = self.touches.iter_mut().find(|(id, _)| *id == pointer_id)?;
        *p = position;
        let (prev_dist, prev_mid) = self.last?;
        let (dist, mid) = self.span()?;
        self.last = Some((dist, mid));
        let zoom_factor = if prev_dist > f64::EPSILON { dist / prev_dist } else { 1.0 };
        Some(GestureUpdate {
            zoom_factor,
            anchor: mid,
            pan: mid - prev_mid,
        })
    }

    /// Lift a finger. Returns `true` if this ends a gesture.
    pub fn touch_up(&mut self, pointer_id: u32) -> bool {
        let was_active = self.is_active();
        self.touches.retain(|(id, _)| *id != pointer_id);
        self.last = self.span();
        was_active && !self.is_active()
    }

    pub fn reset(&mut self) {
        self.touches.clear();
        self.last = None;
    }
}
