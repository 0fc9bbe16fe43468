//! Hand-drawn ("rough") path generation.
//!
//! Straight segments become slightly bowed quadratics with jittered end
//! points, and each outline is stroked twice with different offsets for
//! the sketchy double-line look. All randomness comes from the shape's
//! persisted seed, so a shape wobbles the same way every frame.
//!
//! Everything here is pure kurbo geometry; `paint` turns it into Vello
//! draw calls.

use kurbo::{BezPath, Ellipse, Line, PathEl, Point, Rect, RoundedRect, Shape as _, Vec2};
use rd_core::StrokeStyle;
use rd_core::rng::Rng;
use smallvec::SmallVec;

/// Multiplier that decorrelates the second stroke from the first.
const STROKE_SEED_STRIDE: u32 = 99_991;

/// Flattening tolerance for curves turned into paths.
const TOLERANCE: f64 = 0.1;

/// Jitter `path` into a hand-drawn variant.
///
/// `roughness` 0 returns the path unchanged. Jitter shrinks as the zoom
/// grows so strokes look equally sketchy at every zoom level.
pub fn rough_path(path: &BezPath, roughness: f64, zoom: f64, seed: u32, stroke_index: u32) -> BezPath {
    if roughness <= 0.0 {
        return path.clone();
    }
    let scale = 1.0 / zoom.max(0.01).sqrt();
    let jitter = roughness * 2.0 * scale;
    let mut rng = Rng::new(seed.wrapping_add(stroke_index.wrapping_mul(STROKE_SEED_STRIDE)));

    let mut out = BezPath::new();
    let mut prev = Point::ZERO;
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                out.move_to(wobble(p, jitter, &mut rng));
                prev = p;
            }
            PathEl::LineTo(p) => {
                let d = p - prev;
                let len = d.hypot();
                let normal = if len > 1e-3 { Vec2::new(-d.y, d.x) / len } else { Vec2::ZERO };
                // Longer segments bow more.
                let bow = rng.offset(roughness * roughness * len / 200.0) * scale;
                let mid = prev.midpoint(p) + normal * bow;
                out.quad_to(mid, wobble(p, jitter, &mut rng));
                prev = p;
            }
            PathEl::QuadTo(c, p) => {
                out.quad_to(wobble(c, jitter * 0.7, &mut rng), wobble(p, jitter, &mut rng));
                prev = p;
            }
            PathEl::CurveTo(c1, c2, p) => {
                out.curve_to(
                    wobble(c1, jitter * 0.5, &mut rng),
                    wobble(c2, jitter * 0.5, &mut rng),
                    wobble(p, jitter, &mut rng),
                );
                prev = p;
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn wobble(p: Point, amount: f64, rng: &mut Rng) -> Point {
    Point::new(p.x + rng.offset(amount), p.y + rng.offset(amount))
}

/// The outlines to stroke for one path: two jittered copies when rough,
/// the path itself otherwise.
pub fn rough_strokes(path: &BezPath, roughness: f64, zoom: f64, seed: u32) -> SmallVec<[BezPath; 2]> {
    let mut out = SmallVec::new();
    if roughness <= 0.0 {
        out.push(path.clone());
        return out;
    }
    out.push(rough_path(path, roughness, zoom, seed, 0));
    out.push(rough_path(path, roughness, zoom, seed, 1));
    out
}

// ─── Outlines ────────────────────────────────────────────────────────────────

/// Rectangle outline built from explicit line segments so the rough
/// generator can bow each side.
pub fn rectangle_path(rect: Rect, corner_radius: f64) -> BezPath {
    if corner_radius > 0.0 {
        return RoundedRect::from_rect(rect, corner_radius).to_path(TOLERANCE);
    }
    let mut path = BezPath::new();
    path.move_to((rect.x0, rect.y0));
    path.line_to((rect.x1, rect.y0));
    path.line_to((rect.x1, rect.y1));
    path.line_to((rect.x0, rect.y1));
    path.close_path();
    path
}

pub fn ellipse_path(rect: Rect) -> BezPath {
    Ellipse::from_rect(rect).to_path(TOLERANCE)
}

pub fn polyline_path(points: impl IntoIterator<Item = Point>) -> BezPath {
    let mut path = BezPath::new();
    for (i, p) in points.into_iter().enumerate() {
        if i == 0 {
            path.move_to(p);
        } else {
            path.line_to(p);
        }
    }
    path
}

pub fn polygon_path(points: &[Point]) -> BezPath {
    let mut path = polyline_path(points.iter().copied());
    if !points.is_empty() {
        path.close_path();
    }
    path
}

// ─── Fills and dashes ────────────────────────────────────────────────────────

/// Parallel lines at `angle` spaced `gap` apart, long enough to cover
/// `bounds` at any angle. The painter clips them to the shape outline.
pub fn hachure_lines(bounds: Rect, angle: f64, gap: f64) -> Vec<Line> {
    if gap <= 0.0 || bounds.width() <= 0.0 || bounds.height() <= 0.0 {
        return Vec::new();
    }
    let c = bounds.center();
    let reach = bounds.width().hypot(bounds.height()) / 2.0;
    let dir = Vec2::from_angle(angle);
    let normal = Vec2::new(-dir.y, dir.x);

    let steps = (reach * 2.0 / gap).floor() as usize;
    (0..=steps)
        .map(|i| {
            let base = c + normal * (-reach + i as f64 * gap);
            Line::new(base - dir * reach, base + dir * reach)
        })
        .collect()
}

/// Hachure spacing for a stroke width.
pub fn hachure_gap(stroke_width: f64) -> f64 {
    (stroke_width * 4.0).max(4.0)
}

/// Dash pattern for a stroke style; `None` for solid.
pub fn dash_pattern(style: StrokeStyle, stroke_width: f64) -> Option<[f64; 2]> {
    match style {
        StrokeStyle::Solid => None,
        StrokeStyle::Dashed => Some([8.0, 8.0 + stroke_width]),
        StrokeStyle::Dotted => Some([1.5, 6.0 + stroke_width]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Shape as _;

    fn square() -> BezPath {
        rectangle_path(Rect::new(0.0, 0.0, 100.0, 100.0), 0.0)
    }

    #[test]
    fn zero_roughness_is_identity() {
        let p = square();
        assert_eq!(rough_path(&p, 0.0, 1.0, 7, 0), p);
        assert_eq!(rough_strokes(&p, 0.0, 1.0, 7).len(), 1);
    }

    #[test]
    fn same_seed_same_wobble() {
        let p = square();
        assert_eq!(rough_path(&p, 1.0, 1.0, 42, 0), rough_path(&p, 1.0, 1.0, 42, 0));
        assert_ne!(rough_path(&p, 1.0, 1.0, 42, 0), rough_path(&p, 1.0, 1.0, 43, 0));
    }

    #[test]
    fn double_stroke_copies_differ() {
        let strokes = rough_strokes(&square(), 1.0, 1.0, 9);
        assert_eq!(strokes.len(), 2);
        assert_ne!(strokes[0], strokes[1]);
    }

    #[test]
    fn jitter_stays_near_outline() {
        let rough = rough_path(&square(), 1.0, 1.0, 3, 0);
        let b = rough.bounding_box();
        assert!(b.x0 > -5.0 && b.y0 > -5.0 && b.x1 < 105.0 && b.y1 < 105.0, "{b:?}");
    }

    #[test]
    fn hachure_covers_bounds() {
        let lines = hachure_lines(Rect::new(0.0, 0.0, 30.0, 40.0), -0.7, 5.0);
        // diagonal 50 / gap 5 → 11 lines
        assert_eq!(lines.len(), 11);
        assert!(hachure_lines(Rect::new(0.0, 0.0, 0.0, 40.0), 0.0, 5.0).is_empty());
    }

    #[test]
    fn dashes_by_style() {
        assert_eq!(dash_pattern(StrokeStyle::Solid, 2.0), None);
        assert_eq!(dash_pattern(StrokeStyle::Dashed, 2.0), Some([8.0, 10.0]));
        assert_eq!(dash_pattern(StrokeStyle::Dotted, 2.0), Some([1.5, 8.0]));
    }
}
