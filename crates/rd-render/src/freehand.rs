//! Freehand stroke outlines.
//!
//! A pressure-sampled polyline becomes a closed, filled outline whose
//! half-width follows the pressure at each sample. Mouse input has no
//! pressure, so it is simulated from pointer speed (fast = thin).

use kurbo::{BezPath, Circle, Point, Shape as _, Vec2};
use rd_core::StrokePoint;

/// Fraction of the full width kept at zero pressure.
const MIN_THINNING: f64 = 0.3;

/// Pressures to use for `points`, simulated from speed when requested.
pub fn stroke_pressures(points: &[StrokePoint], size: f64, simulate: bool) -> Vec<f64> {
    if !simulate {
        return points.iter().map(|p| p.pressure.clamp(0.0, 1.0)).collect();
    }
    let mut out = Vec::with_capacity(points.len());
    let mut prev_pressure = 0.5;
    for (i, p) in points.iter().enumerate() {
        let target = if i == 0 {
            0.5
        } else {
            let dist = p.point().distance(points[i - 1].point());
            (1.0 - dist / (size * 4.0).max(1.0)).clamp(0.2, 1.0)
        };
        // Ease toward the target so width changes stay smooth.
        prev_pressure += (target - prev_pressure) * 0.5;
        out.push(prev_pressure);
    }
    out
}

fn radius(size: f64, pressure: f64) -> f64 {
    size / 2.0 * (MIN_THINNING + (1.0 - MIN_THINNING) * pressure)
}

/// Closed outline of a freehand stroke of nominal width `size`.
pub fn freehand_outline(points: &[StrokePoint], size: f64, simulate_pressure: bool) -> BezPath {
    let Some(first) = points.first() else {
        return BezPath::new();
    };
    let pressures = stroke_pressures(points, size, simulate_pressure);

    // Collapse consecutive duplicates; they have no direction.
    let mut samples: Vec<(Point, f64)> = Vec::with_capacity(points.len());
    for (p, pressure) in points.iter().zip(&pressures) {
        let pt = p.point();
        if samples.last().is_some_and(|(last, _)| last.distance(pt) < 1e-6) {
            continue;
        }
        samples.push((pt, *pressure));
    }

    if samples.len() < 2 {
        let r = radius(size, pressures[0]).max(0.5);
        return Circle::new(first.point(), r).to_path(0.1);
    }

    let n = samples.len();
    let mut left = Vec::with_capacity(n);
    let mut right = Vec::with_capacity(n);
    let mut tangents = Vec::with_capacity(n);
    for i in 0..n {
        let a = samples[i.saturating_sub(1)].0;
        let b = samples[(i + 1).min(n - 1)].0;
        let t = b - a;
        let t = if t.hypot() > 0.0 { t / t.hypot() } else { Vec2::new(1.0, 0.0) };
        let normal = Vec2::new(-t.y, t.x);
        let (p, pressure) = samples[i];
        let r = radius(size, pressure);
        left.push(p + normal * r);
        right.push(p - normal * r);
        tangents.push(t);
    }

    let mut path = BezPath::new();
    path.move_to(left[0]);
    for &p in &left[1..] {
        path.line_to(p);
    }
    // Round end cap.
    let (end, end_pressure) = samples[n - 1];
    let cap = end + tangents[n - 1] * radius(size, end_pressure) * 1.3;
    path.quad_to(cap, right[n - 1]);
    for &p in right[..n - 1].iter().rev() {
        path.line_to(p);
    }
    // Round start cap.
    let (start, start_pressure) = samples[0];
    let cap = start - tangents[0] * radius(size, start_pressure) * 1.3;
    path.quad_to(cap, left[0]);
    path.close_path();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Rect;

    fn line(n: usize) -> Vec<StrokePoint> {
        (0..n).map(|i| StrokePoint::new(i as f64 * 5.0, 0.0, 0.5)).collect()
    }

    #[test]
    fn empty_input_empty_outline() {
        assert!(freehand_outline(&[], 4.0, false).elements().is_empty());
    }

    #[test]
    fn single_point_is_a_dot() {
        let path = freehand_outline(&[StrokePoint::new(10.0, 10.0, 1.0)], 4.0, false);
        let b = path.bounding_box();
        assert!((b.center().x - 10.0).abs() < 1e-6);
        assert!((b.width() - 4.0).abs() < 0.1);
    }

    #[test]
    fn outline_stays_within_half_width() {
        let path = freehand_outline(&line(20), 8.0, false);
        let b = path.bounding_box();
        let expected = Rect::new(0.0, 0.0, 95.0, 0.0).inflate(8.0, 4.0);
        assert!(b.y0 >= expected.y0 - 1e-6 && b.y1 <= expected.y1 + 1e-6, "{b:?}");
        assert!(b.x0 >= expected.x0 && b.x1 <= expected.x1, "{b:?}");
    }

    #[test]
    fn higher_pressure_is_wider() {
        let light: Vec<_> = line(5).into_iter().map(|p| StrokePoint { pressure: 0.1, ..p }).collect();
        let heavy: Vec<_> = line(5).into_iter().map(|p| StrokePoint { pressure: 1.0, ..p }).collect();
        let h_light = freehand_outline(&light, 8.0, false).bounding_box().height();
        let h_heavy = freehand_outline(&heavy, 8.0, false).bounding_box().height();
        assert!(h_heavy > h_light);
    }

    #[test]
    fn simulated_pressure_thins_fast_strokes() {
        let slow: Vec<_> = (0..10).map(|i| StrokePoint::new(i as f64, 0.0, 0.5)).collect();
        let fast: Vec<_> = (0..10).map(|i| StrokePoint::new(i as f64 * 40.0, 0.0, 0.5)).collect();
        let p_slow = stroke_pressures(&slow, 4.0, true);
        let p_fast = stroke_pressures(&fast, 4.0, true);
        assert!(p_slow[9] > p_fast[9]);
    }
}
