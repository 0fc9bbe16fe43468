//! Resize math.
//!
//! `compute_resize` turns a start rectangle, a dragged handle and a pointer
//! delta into new bounds. `resize_frame` does the same for a possibly
//! rotated selection frame, and `apply_resize` writes new bounds onto a
//! shape together with its per-type side effects (text re-wrap and font
//! scaling, point-array scaling).

use crate::geometry::{rotate_point, rotate_vec};
use crate::handles::{ResizeHandle, SelectionFrame};
use crate::model::{Shape, ShapeProps};
use crate::registry::ShapeRegistry;
use crate::text::{TextMeasure, layout_text};
use kurbo::{Point, Rect, Vec2};

/// Below this a dimension is treated as degenerate (e.g. a horizontal line's height).
const DEGENERATE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeOptions {
    pub keep_aspect: bool,
    pub min_size: f64,
}

/// New bounds for dragging `handle` of `start` by `delta`.
///
/// Only the dimensions the handle touches change. Dimensions are clamped to
/// `min_size`; when the left/top edge is the one moving, the origin is
/// re-derived from the fixed right/bottom edge so the far side never jumps.
pub fn compute_resize(start: Rect, handle: ResizeHandle, delta: Vec2, opts: ResizeOptions) -> Rect {
    let (sx, sy) = (start.x0, start.y0);
    let (sw, sh) = (start.width(), start.height());

    let mut w = if handle.moves_left() {
        sw - delta.x
    } else if handle.moves_right() {
        sw + delta.x
    } else {
        sw
    };
    let mut h = if handle.moves_top() {
        sh - delta.y
    } else if handle.moves_bottom() {
        sh + delta.y
    } else {
        sh
    };

    if opts.keep_aspect && sw > DEGENERATE && sh > DEGENERATE {
        let fx = w / sw;
        let fy = h / sh;
        let scale = if handle.is_corner() {
            fx.max(fy)
        } else if handle.horizontal() {
            fx
        } else {
            fy
        };
        let scale = scale.max(opts.min_size / sw).max(opts.min_size / sh);
        w = sw * scale;
        h = sh * scale;
    } else {
        if handle.horizontal() {
            w = w.max(opts.min_size);
        }
        if handle.vertical() {
            h = h.max(opts.min_size);
        }
    }

    let x = if handle.moves_left() { sx + sw - w } else { sx };
    let y = if handle.moves_top() { sy + sh - h } else { sy };
    Rect::new(x, y, x + w, y + h)
}

/// Resize a selection frame by a world-space pointer delta.
///
/// For a rotated frame the delta is taken into the frame's local axes and
/// the result is shifted so the opposite handle stays fixed on screen.
pub fn resize_frame(frame: &SelectionFrame, handle: ResizeHandle, delta: Vec2, opts: ResizeOptions) -> Rect {
    if frame.rotation == 0.0 {
        return compute_resize(frame.bounds, handle, delta, opts);
    }
    let local_delta = rotate_vec(delta, -frame.rotation);
    let resized = compute_resize(frame.bounds, handle, local_delta, opts);

    let anchor = handle.opposite();
    let before = rotate_point(anchor.position(frame.bounds), frame.bounds.center(), frame.rotation);
    let after = rotate_point(anchor.position(resized), resized.center(), frame.rotation);
    resized + (before - after)
}

/// Map `rect` from `from` frame space into `to` frame space proportionally.
/// Used to resize every member of a multi-selection along with the frame.
pub fn map_rect(from: Rect, to: Rect, rect: Rect) -> Rect {
    let fx = if from.width() > DEGENERATE { to.width() / from.width() } else { 1.0 };
    let fy = if from.height() > DEGENERATE { to.height() / from.height() } else { 1.0 };
    let x0 = to.x0 + (rect.x0 - from.x0) * fx;
    let y0 = to.y0 + (rect.y0 - from.y0) * fy;
    Rect::new(x0, y0, x0 + rect.width() * fx, y0 + rect.height() * fy)
}

/// What `apply_resize` needs beyond the shapes themselves.
pub struct ResizeContext<'a> {
    pub measure: &'a dyn TextMeasure,
    pub min_font_size: f64,
    pub registry: &'a ShapeRegistry,
}

/// Write `new_bounds` onto `shape`, deriving everything else from the
/// drag-start snapshot `start` so repeated calls during a drag never
/// accumulate rounding.
pub fn apply_resize(shape: &mut Shape, start: &Shape, new_bounds: Rect, handle: ResizeHandle, ctx: &ResizeContext<'_>) {
    shape.x = new_bounds.x0;
    shape.y = new_bounds.y0;
    shape.width = new_bounds.width();
    shape.height = new_bounds.height();

    let fx = if start.width > DEGENERATE { shape.width / start.width } else { 1.0 };
    let fy = if start.height > DEGENERATE { shape.height / start.height } else { 1.0 };

    // A zero-extent axis (straight line) stays zero.
    if start.width <= DEGENERATE && is_pointwise(start) {
        shape.x = start.x;
        shape.width = start.width;
    }
    if start.height <= DEGENERATE && is_pointwise(start) {
        shape.y = start.y;
        shape.height = start.height;
    }

    match (&mut shape.props, &start.props) {
        (ShapeProps::Line(line), ShapeProps::Line(orig)) => {
            line.points = scale_points(&orig.points, fx, fy);
        }
        (ShapeProps::Arrow(arrow), ShapeProps::Arrow(orig)) => {
            arrow.points = scale_points(&orig.points, fx, fy);
        }
        (ShapeProps::Path(path), ShapeProps::Path(orig)) => {
            for (p, o) in path.points.iter_mut().zip(&orig.points) {
                p.x = o.x * fx;
                p.y = o.y * fy;
            }
        }
        (ShapeProps::Text(text), ShapeProps::Text(orig)) => {
            if handle.is_corner() {
                text.font_size = (orig.font_size * fx).max(ctx.min_font_size);
            }
            text.auto_width = false;
            let layout = layout_text(text, Some(shape.width), ctx.measure);
            let wrapped = fit_height(new_bounds, layout.height, handle, shape.rotation);
            shape.x = wrapped.x0;
            shape.y = wrapped.y0;
            shape.height = wrapped.height();
        }
        (ShapeProps::Custom(custom), _) => {
            if let Some(behavior) = ctx.registry.get(&custom.kind) {
                behavior.resize(shape, start, fx, fy);
            }
        }
        _ => {}
    }
}

/// `bounds` with its height replaced by `height`, keeping the corner
/// opposite `handle` where it was in world space.
fn fit_height(bounds: Rect, height: f64, handle: ResizeHandle, rotation: f64) -> Rect {
    let fixed_x = if handle.moves_left() { bounds.x1 } else { bounds.x0 };
    let fixed_y = if handle.moves_top() { bounds.y1 } else { bounds.y0 };
    let y0 = if handle.moves_top() { bounds.y1 - height } else { bounds.y0 };
    let fitted = Rect::new(bounds.x0, y0, bounds.x1, y0 + height);
    if rotation == 0.0 {
        return fitted;
    }
    let corner = Point::new(fixed_x, fixed_y);
    let before = rotate_point(corner, bounds.center(), rotation);
    let after = rotate_point(corner, fitted.center(), rotation);
    fitted + (before - after)
}

fn scale_points(points: &[Point], fx: f64, fy: f64) -> Vec<Point> {
    points.iter().map(|p| Point::new(p.x * fx, p.y * fy)).collect()
}

fn is_pointwise(shape: &Shape) -> bool {
    matches!(shape.props, ShapeProps::Line(_) | ShapeProps::Arrow(_) | ShapeProps::Path(_))
}
