//! Pure geometry helpers shared by hit testing, resize and rendering.

use crate::model::Shape;
use kurbo::{Point, Rect, Vec2};

/// Rotate `point` about `center` by `angle` radians.
pub fn rotate_point(point: Point, center: Point, angle: f64) -> Point {
    if angle == 0.0 {
        return point;
    }
    let (sin, cos) = angle.sin_cos();
    let d = point - center;
    Point::new(
        center.x + d.x * cos - d.y * sin,
        center.y + d.x * sin + d.y * cos,
    )
}

/// Rotate a vector (no translation).
pub fn rotate_vec(v: Vec2, angle: f64) -> Vec2 {
    if angle == 0.0 {
        return v;
    }
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Shortest distance from `p` to the segment `a`–`b`.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len_sq = ab.hypot2();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Barycentric point-in-triangle test (edges inclusive).
pub fn point_in_triangle(p: Point, a: Point, b: Point, c: Point) -> bool {
    let v0 = c - a;
    let v1 = b - a;
    let v2 = p - a;

    let dot00 = v0.dot(v0);
    let dot01 = v0.dot(v1);
    let dot02 = v0.dot(v2);
    let dot11 = v1.dot(v1);
    let dot12 = v1.dot(v2);

    let denom = dot00 * dot11 - dot01 * dot01;
    if denom.abs() < f64::EPSILON {
        return false;
    }
    let inv = 1.0 / denom;
    let u = (dot11 * dot02 - dot01 * dot12) * inv;
    let v = (dot00 * dot12 - dot01 * dot02) * inv;
    u >= 0.0 && v >= 0.0 && u + v <= 1.0
}

/// Normalize a drag from `a` to `b` into a positive-size rectangle.
pub fn normalize_rect(a: Point, b: Point) -> Rect {
    Rect::from_points(a, b)
}

/// Axis-aligned bounds of the shape after applying its rotation.
pub fn shape_bounds(shape: &Shape) -> Rect {
    let rect = shape.rect();
    if shape.rotation == 0.0 {
        return rect;
    }
    rotated_rect_bounds(rect, shape.rotation)
}

/// Bounds of `rect` rotated about its own center.
pub fn rotated_rect_bounds(rect: Rect, angle: f64) -> Rect {
    let center = rect.center();
    let corners = [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x1, rect.y1),
        Point::new(rect.x0, rect.y1),
    ];
    points_bounds(corners.iter().map(|&c| rotate_point(c, center, angle)))
        .unwrap_or(rect)
}

/// Bounds of a point set, `None` when empty.
pub fn points_bounds(points: impl IntoIterator<Item = Point>) -> Option<Rect> {
    let mut iter = points.into_iter();
    let first = iter.next()?;
    let mut r = Rect::from_points(first, first);
    for p in iter {
        r = r.union_pt(p);
    }
    Some(r)
}

/// Union of the rotated bounds of every shape, `None` when empty.
pub fn union_bounds<'a>(shapes: impl IntoIterator<Item = &'a Shape>) -> Option<Rect> {
    shapes
        .into_iter()
        .map(shape_bounds)
        .reduce(|acc, r| acc.union(r))
}

/// Whether two rectangles overlap (touching edges count).
pub fn rects_overlap(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

/// Snap the direction `start → end` to the nearest multiple of `step`
/// radians, keeping the segment length.
pub fn snap_angle(start: Point, end: Point, step: f64) -> Point {
    let d = end - start;
    let len = d.hypot();
    if len == 0.0 || step <= 0.0 {
        return end;
    }
    let angle = (d.atan2() / step).round() * step;
    start + Vec2::from_angle(angle) * len
}

/// Snap an absolute angle to the nearest multiple of `step`.
pub fn snap_rotation(angle: f64, step: f64) -> f64 {
    if step <= 0.0 {
        return angle;
    }
    (angle / step).round() * step
}

/// Normalize an angle to `[0, 2π)`.
pub fn normalize_angle(angle: f64) -> f64 {
    angle.rem_euclid(std::f64::consts::TAU)
}
