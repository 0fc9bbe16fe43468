//! Selection handles: 8 resize handles around a frame plus a rotation
//! handle above its top edge.
//!
//! Handle sizes are given in screen pixels and divided by the zoom before
//! comparing against world-space points, so handles keep a constant
//! on-screen size.

use crate::geometry::rotate_point;
use kurbo::{Point, Rect};
use smallvec::SmallVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    NorthWest,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::NorthWest,
        ResizeHandle::North,
        ResizeHandle::NorthEast,
        ResizeHandle::East,
        ResizeHandle::SouthEast,
        ResizeHandle::South,
        ResizeHandle::SouthWest,
        ResizeHandle::West,
    ];

    pub const CORNERS: [ResizeHandle; 4] = [
        ResizeHandle::NorthWest,
        ResizeHandle::NorthEast,
        ResizeHandle::SouthEast,
        ResizeHandle::SouthWest,
    ];

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            ResizeHandle::NorthWest
                | ResizeHandle::NorthEast
                | ResizeHandle::SouthEast
                | ResizeHandle::SouthWest
        )
    }

    pub fn moves_left(self) -> bool {
        matches!(self, ResizeHandle::NorthWest | ResizeHandle::West | ResizeHandle::SouthWest)
    }

    pub fn moves_right(self) -> bool {
        matches!(self, ResizeHandle::NorthEast | ResizeHandle::East | ResizeHandle::SouthEast)
    }

    pub fn moves_top(self) -> bool {
        matches!(self, ResizeHandle::NorthWest | ResizeHandle::North | ResizeHandle::NorthEast)
    }

    pub fn moves_bottom(self) -> bool {
        matches!(self, ResizeHandle::SouthWest | ResizeHandle::South | ResizeHandle::SouthEast)
    }

    /// Whether the handle changes the width.
    pub fn horizontal(self) -> bool {
        self.moves_left() || self.moves_right()
    }

    /// Whether the handle changes the height.
    pub fn vertical(self) -> bool {
        self.moves_top() || self.moves_bottom()
    }

    /// The handle on the other side of the frame; it stays put while this one drags.
    pub fn opposite(self) -> ResizeHandle {
        match self {
            ResizeHandle::NorthWest => ResizeHandle::SouthEast,
            ResizeHandle::North => ResizeHandle::South,
            ResizeHandle::NorthEast => ResizeHandle::SouthWest,
            ResizeHandle::East => ResizeHandle::West,
            ResizeHandle::SouthEast => ResizeHandle::NorthWest,
            ResizeHandle::South => ResizeHandle::North,
            ResizeHandle::SouthWest => ResizeHandle::NorthEast,
            ResizeHandle::West => ResizeHandle::East,
        }
    }

    /// Position of this handle on `bounds`.
    pub fn position(self, bounds: Rect) -> Point {
        let cx = (bounds.x0 + bounds.x1) / 2.0;
        let cy = (bounds.y0 + bounds.y1) / 2.0;
        match self {
            ResizeHandle::NorthWest => Point::new(bounds.x0, bounds.y0),
            ResizeHandle::North => Point::new(cx, bounds.y0),
            ResizeHandle::NorthEast => Point::new(bounds.x1, bounds.y0),
            ResizeHandle::East => Point::new(bounds.x1, cy),
            ResizeHandle::SouthEast => Point::new(bounds.x1, bounds.y1),
            ResizeHandle::South => Point::new(cx, bounds.y1),
            ResizeHandle::SouthWest => Point::new(bounds.x0, bounds.y1),
            ResizeHandle::West => Point::new(bounds.x0, cy),
        }
    }

    /// CSS cursor name for an unrotated frame.
    pub fn cursor_name(self) -> &'static str {
        match self {
            ResizeHandle::NorthWest | ResizeHandle::SouthEast => "nwse-resize",
            ResizeHandle::NorthEast | ResizeHandle::SouthWest => "nesw-resize",
            ResizeHandle::North | ResizeHandle::South => "ns-resize",
            ResizeHandle::East | ResizeHandle::West => "ew-resize",
        }
    }
}

/// The box that selection handles are laid out on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionFrame {
    /// Unrotated bounds in world space.
    pub bounds: Rect,
    /// Rotation about `bounds.center()`; non-zero only for a single shape.
    pub rotation: f64,
    /// Text-only selections resize from corners only.
    pub corners_only: bool,
}

impl SelectionFrame {
    /// Bring a world point into the frame's unrotated space.
    pub fn to_local(&self, point: Point) -> Point {
        rotate_point(point, self.bounds.center(), -self.rotation)
    }

    pub fn to_world(&self, point: Point) -> Point {
        rotate_point(point, self.bounds.center(), self.rotation)
    }

    /// Handles this frame exposes, in hit-test priority order (corners first).
    pub fn handles(&self) -> SmallVec<[ResizeHandle; 8]> {
        let mut out: SmallVec<[ResizeHandle; 8]> = ResizeHandle::CORNERS.into_iter().collect();
        if !self.corners_only {
            out.extend([
                ResizeHandle::North,
                ResizeHandle::East,
                ResizeHandle::South,
                ResizeHandle::West,
            ]);
        }
        out
    }

    /// Position of the rotation handle in the frame's unrotated space.
    pub fn rotation_handle(&self, offset_px: f64, zoom: f64) -> Point {
        let b = self.bounds;
        Point::new((b.x0 + b.x1) / 2.0, b.y0 - offset_px / zoom)
    }
}

/// Whether `point` (world space, unrotated frame space) falls on a square
/// handle of `size_px` screen pixels centered at `handle`.
fn within_handle(point: Point, handle: Point, size_px: f64, zoom: f64) -> bool {
    let half = size_px / 2.0 / zoom;
    (point.x - handle.x).abs() <= half && (point.y - handle.y).abs() <= half
}

/// Hit-test the resize handles of `frame`.
pub fn hit_test_handles(frame: &SelectionFrame, point: Point, size_px: f64, zoom: f64) -> Option<ResizeHandle> {
    let local = frame.to_local(point);
    frame
        .handles()
        .into_iter()
        .find(|h| within_handle(local, h.position(frame.bounds), size_px, zoom))
}

/// Hit-test the rotation handle of `frame`.
pub fn hit_test_rotation_handle(
    frame: &SelectionFrame,
    point: Point,
    size_px: f64,
    offset_px: f64,
    zoom: f64,
) -> bool {
    let local = frame.to_local(point);
    within_handle(local, frame.rotation_handle(offset_px, zoom), size_px, zoom)
}
