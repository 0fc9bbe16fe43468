//! Hit testing: point → shape lookup.
//!
//! Every test takes the point in world space and brings it into the shape's
//! unrotated frame first, so the per-variant tests never deal with rotation.
//! `shape_at_point` walks the z-order in reverse (last painted = topmost).

use crate::geometry::{distance_to_segment, point_in_triangle, rotate_point, rotate_vec};
use crate::id::ShapeId;
use crate::model::{ArrowProps, Arrowhead, Shape, ShapeProps};
use crate::registry::ShapeRegistry;
use crate::scene::Scene;
use kurbo::Point;

/// Half-angle of a triangle arrowhead.
const HEAD_ANGLE: f64 = std::f64::consts::PI / 7.0;

/// Arrowhead length for a given stroke width.
pub fn arrowhead_length(stroke_width: f64) -> f64 {
    12.0 + stroke_width * 2.0
}

/// Triangle of an arrowhead whose tip is at `tip`, pointing away from `from`.
/// Returns `[tip, left, right]`, or `None` for a zero-length segment.
pub fn arrowhead_triangle(tip: Point, from: Point, stroke_width: f64) -> Option<[Point; 3]> {
    let dir = tip - from;
    let len = dir.hypot();
    if len == 0.0 {
        return None;
    }
    let back = -dir / len * arrowhead_length(stroke_width);
    let left = tip + rotate_vec(back, HEAD_ANGLE);
    let right = tip + rotate_vec(back, -HEAD_ANGLE);
    Some([tip, left, right])
}

/// Arrowhead triangles of an arrow, in shape-local coordinates.
pub fn arrow_heads(arrow: &ArrowProps, stroke_width: f64) -> Vec<[Point; 3]> {
    let pts = &arrow.points;
    let mut heads = Vec::new();
    if pts.len() < 2 {
        return heads;
    }
    if arrow.end_head == Some(Arrowhead::Triangle) {
        heads.extend(arrowhead_triangle(pts[pts.len() - 1], pts[pts.len() - 2], stroke_width));
    }
    if arrow.start_head == Some(Arrowhead::Triangle) {
        heads.extend(arrowhead_triangle(pts[0], pts[1], stroke_width));
    }
    heads
}

fn near_polyline(points: impl IntoIterator<Item = Point>, p: Point, tolerance: f64) -> bool {
    let mut iter = points.into_iter();
    let Some(mut prev) = iter.next() else {
        return false;
    };
    if p.distance(prev) <= tolerance {
        return true;
    }
    for next in iter {
        if distance_to_segment(p, prev, next) <= tolerance {
            return true;
        }
        prev = next;
    }
    false
}

/// Whether `point` (world space) hits `shape`. Locked shapes never hit.
pub fn hit_test_shape(shape: &Shape, point: Point, tolerance: f64, registry: &ShapeRegistry) -> bool {
    if shape.is_locked {
        return false;
    }
    let world = rotate_point(point, shape.center(), -shape.rotation);
    let local = world - shape.origin().to_vec2();
    let stroke_tol = tolerance.max(shape.style.stroke_width / 2.0);

    match &shape.props {
        ShapeProps::Rectangle { .. } | ShapeProps::Text(_) | ShapeProps::Image(_) => {
            shape.rect().inflate(tolerance, tolerance).contains(world)
        }
        ShapeProps::Ellipse => {
            let rx = shape.width / 2.0 + tolerance;
            let ry = shape.height / 2.0 + tolerance;
            let d = world - shape.center();
            (d.x / rx).powi(2) + (d.y / ry).powi(2) <= 1.0
        }
        ShapeProps::Line(line) => near_polyline(line.points.iter().copied(), local, stroke_tol),
        ShapeProps::Arrow(arrow) => {
            near_polyline(arrow.points.iter().copied(), local, stroke_tol)
                || arrow_heads(arrow, shape.style.stroke_width)
                    .iter()
                    .any(|[a, b, c]| point_in_triangle(local, *a, *b, *c))
        }
        ShapeProps::Path(path) => near_polyline(path.points.iter().map(|p| p.point()), local, stroke_tol),
        ShapeProps::Custom(custom) => match registry.get(&custom.kind) {
            Some(behavior) => behavior.hit_test(shape, world, tolerance),
            None => shape.rect().inflate(tolerance, tolerance).contains(world),
        },
    }
}

/// Find the topmost shape at `point`. Returns `None` on empty canvas.
pub fn shape_at_point(scene: &Scene, point: Point, tolerance: f64, registry: &ShapeRegistry) -> Option<ShapeId> {
    scene
        .order()
        .iter()
        .rev()
        .filter_map(|id| scene.get(id))
        .find(|shape| hit_test_shape(shape, point, tolerance, registry))
        .map(|shape| shape.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LinearProps, PathProps, StrokePoint};
    use crate::registry::ShapeBehavior;
    use std::f64::consts::FRAC_PI_2;

    fn reg() -> ShapeRegistry {
        ShapeRegistry::default()
    }

    #[test]
    fn rectangle_respects_tolerance() {
        let r = Shape::rectangle(ShapeId::intern("hit_rect"), 10.0, 10.0, 100.0, 50.0);
        assert!(hit_test_shape(&r, Point::new(50.0, 30.0), 5.0, &reg()));
        assert!(hit_test_shape(&r, Point::new(114.0, 30.0), 5.0, &reg()));
        assert!(!hit_test_shape(&r, Point::new(116.0, 30.0), 5.0, &reg()));
    }

    #[test]
    fn rotated_rectangle_uses_local_frame() {
        let mut r = Shape::rectangle(ShapeId::intern("hit_rot"), 0.0, 40.0, 100.0, 20.0);
        r.rotation = FRAC_PI_2;
        // Now a vertical bar centered at (50, 50).
        assert!(hit_test_shape(&r, Point::new(50.0, 5.0), 0.0, &reg()));
        assert!(!hit_test_shape(&r, Point::new(5.0, 50.0), 0.0, &reg()));
    }

    #[test]
    fn ellipse_excludes_bounding_corners() {
        let e = Shape::ellipse(ShapeId::intern("hit_ellipse"), 0.0, 0.0, 100.0, 100.0);
        assert!(hit_test_shape(&e, Point::new(50.0, 50.0), 0.0, &reg()));
        assert!(!hit_test_shape(&e, Point::new(5.0, 5.0), 0.0, &reg()));
    }

    #[test]
    fn line_uses_stroke_width_when_wider() {
        let mut line = Shape::new(
            ShapeId::intern("hit_line"),
            ShapeProps::Line(LinearProps {
                points: vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)],
            }),
            0.0,
            0.0,
            100.0,
            0.0,
        );
        assert!(!hit_test_shape(&line, Point::new(50.0, 8.0), 5.0, &reg()));
        line.style.stroke_width = 20.0;
        assert!(hit_test_shape(&line, Point::new(50.0, 8.0), 5.0, &reg()));
    }

    #[test]
    fn arrowhead_triangle_is_hit() {
        let arrow = Shape::new(
            ShapeId::intern("hit_arrow"),
            ShapeProps::Arrow(ArrowProps {
                points: vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)],
                start_head: None,
                end_head: Some(Arrowhead::Triangle),
            }),
            0.0,
            0.0,
            100.0,
            0.0,
        );
        // Off the shaft by more than tolerance but inside the head.
        assert!(hit_test_shape(&arrow, Point::new(90.0, 3.5), 1.0, &reg()));
        assert!(!hit_test_shape(&arrow, Point::new(50.0, 3.5), 1.0, &reg()));
    }

    #[test]
    fn path_points_are_relative() {
        let path = Shape::new(
            ShapeId::intern("hit_path"),
            ShapeProps::Path(PathProps {
                points: vec![StrokePoint::new(0.0, 0.0, 0.5), StrokePoint::new(10.0, 10.0, 0.5)],
                simulate_pressure: false,
            }),
            200.0,
            200.0,
            10.0,
            10.0,
        );
        assert!(hit_test_shape(&path, Point::new(205.0, 205.0), 2.0, &reg()));
        assert!(!hit_test_shape(&path, Point::new(5.0, 5.0), 2.0, &reg()));
    }

    #[test]
    fn locked_never_hits() {
        let mut r = Shape::rectangle(ShapeId::intern("hit_locked"), 0.0, 0.0, 10.0, 10.0);
        r.is_locked = true;
        assert!(!hit_test_shape(&r, Point::new(5.0, 5.0), 5.0, &reg()));
    }

    struct NeverHit;

    impl ShapeBehavior for NeverHit {
        fn hit_test(&self, _shape: &Shape, _point: Point, _tolerance: f64) -> bool {
            false
        }
    }

    #[test]
    fn custom_dispatches_to_registry_with_bounds_fallback() {
        let custom = Shape::new(
            ShapeId::intern("hit_custom"),
            ShapeProps::Custom(crate::model::CustomProps {
                kind: "sticky".to_string(),
                data: serde_json::Value::Null,
            }),
            0.0,
            0.0,
            10.0,
            10.0,
        );
        assert!(hit_test_shape(&custom, Point::new(5.0, 5.0), 0.0, &reg()));

        let mut registry = reg();
        registry.register("sticky", Box::new(NeverHit));
        assert!(!hit_test_shape(&custom, Point::new(5.0, 5.0), 0.0, &registry));
    }

    #[test]
    fn topmost_wins() {
        let mut scene = Scene::default();
        scene.insert(Shape::rectangle(ShapeId::intern("hit_bottom"), 0.0, 0.0, 100.0, 100.0));
        scene.insert(Shape::rectangle(ShapeId::intern("hit_top"), 50.0, 50.0, 100.0, 100.0));

        let hit = shape_at_point(&scene, Point::new(75.0, 75.0), 0.0, &reg());
        assert_eq!(hit, Some(ShapeId::intern("hit_top")));
        let hit = shape_at_point(&scene, Point::new(25.0, 25.0), 0.0, &reg());
        assert_eq!(hit, Some(ShapeId::intern("hit_bottom")));
        assert_eq!(shape_at_point(&scene, Point::new(500.0, 500.0), 0.0, &reg()), None);
    }
}
