//! Shape → Vello drawing commands.
//!
//! Each shape is painted in its own local frame (origin at its top-left,
//! rotation about its center); callers supply the base transform that
//! places that frame in the world and the world on screen. Keeping the
//! position out of the painted geometry is what lets the drag cache reuse
//! a fragment while a shape moves.
//!
//! Text and images are not drawn here. They come back as `Run` records for
//! the host's font and image stack.

use crate::freehand::freehand_outline;
use crate::rough::{
    dash_pattern, ellipse_path, hachure_gap, hachure_lines, polygon_path, polyline_path, rectangle_path,
    rough_path, rough_strokes,
};
use crate::theme::Theme;
use kurbo::{Affine, BezPath, Cap, Join, Point, Rect, Shape as _, Size, Stroke, Vec2};
use peniko::{Color, Fill, Mix};
use rd_core::hit::{arrow_heads, arrowhead_length};
use rd_core::text::{TextMeasure, layout_for_shape};
use rd_core::{Arrowhead, FillStyle, Shape, ShapeId, ShapeProps, TextAlign};
use std::collections::HashMap;
use vello::Scene;

/// Hachure angle in radians (lines fall to the right).
const HACHURE_ANGLE: f64 = -0.72;

/// A text block for the host to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub shape_id: ShapeId,
    /// Local text frame → screen.
    pub transform: Affine,
    pub lines: Vec<String>,
    pub font_size: f64,
    pub font_family: String,
    pub line_height: f64,
    pub align: TextAlign,
    /// Box width used for alignment.
    pub width: f64,
    pub color: rd_core::Color,
}

/// An image for the host to draw into `size` at `transform`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRun {
    pub shape_id: ShapeId,
    pub transform: Affine,
    pub source: String,
    pub size: Size,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Run {
    Text(TextRun),
    Image(ImageRun),
}

impl Run {
    /// Prepend `outer` to the run's transform.
    pub fn placed(mut self, outer: Affine) -> Self {
        match &mut self {
            Run::Text(t) => t.transform = outer * t.transform,
            Run::Image(i) => i.transform = outer * i.transform,
        }
        self
    }

    pub fn shape_id(&self) -> ShapeId {
        match self {
            Run::Text(t) => t.shape_id,
            Run::Image(i) => i.shape_id,
        }
    }
}

/// Paints `custom` shapes of one kind.
pub trait CustomPainter {
    /// Paint `shape` in its local frame; `transform` maps that frame to screen.
    fn paint(&self, scene: &mut Scene, shape: &Shape, transform: Affine);
}

#[derive(Default)]
pub struct PainterRegistry {
    painters: HashMap<String, Box<dyn CustomPainter>>,
}

impl PainterRegistry {
    pub fn register(&mut self, kind: impl Into<String>, painter: Box<dyn CustomPainter>) {
        self.painters.insert(kind.into(), painter);
    }

    pub fn get(&self, kind: &str) -> Option<&dyn CustomPainter> {
        self.painters.get(kind).map(|p| p.as_ref())
    }
}

/// Everything painting needs besides the shape.
pub struct PaintContext<'a> {
    pub zoom: f64,
    pub theme: &'a Theme,
    pub measure: &'a dyn TextMeasure,
    pub painters: &'a PainterRegistry,
}

/// Rotation about the shape center, in the shape's local frame.
pub fn local_transform(shape: &Shape) -> Affine {
    if shape.rotation == 0.0 {
        return Affine::IDENTITY;
    }
    Affine::rotate_about(shape.rotation, Point::new(shape.width / 2.0, shape.height / 2.0))
}

/// Translation that puts the local frame at the shape's position.
pub fn placement(shape: &Shape) -> Affine {
    Affine::translate(Vec2::new(shape.x, shape.y))
}

pub fn to_color(c: rd_core::Color) -> Color {
    Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn brush(c: rd_core::Color, opacity: f64) -> Color {
    to_color(c.with_opacity(opacity))
}

/// Paint `shape` with `base` mapping its local frame (before rotation) to
/// the target space. Returns a run for text and images.
pub fn paint_shape(scene: &mut Scene, shape: &Shape, base: Affine, ctx: &PaintContext<'_>) -> Option<Run> {
    if shape.opacity <= 0.0 {
        return None;
    }
    let t = base * local_transform(shape);
    let local = Rect::new(0.0, 0.0, shape.width, shape.height);

    match &shape.props {
        ShapeProps::Rectangle { corner_radius } => {
            let outline = rectangle_path(local, *corner_radius);
            paint_fill(scene, &outline, shape, t, ctx);
            paint_stroke(scene, &outline, shape, t, ctx);
        }
        ShapeProps::Ellipse => {
            let outline = ellipse_path(local);
            paint_fill(scene, &outline, shape, t, ctx);
            paint_stroke(scene, &outline, shape, t, ctx);
        }
        ShapeProps::Line(line) => {
            paint_stroke(scene, &polyline_path(line.points.iter().copied()), shape, t, ctx);
        }
        ShapeProps::Arrow(arrow) => {
            paint_stroke(scene, &polyline_path(arrow.points.iter().copied()), shape, t, ctx);
            paint_arrowheads(scene, arrow, shape, t, ctx);
        }
        ShapeProps::Path(path) => {
            let outline = freehand_outline(&path.points, shape.style.stroke_width * 3.0, path.simulate_pressure);
            let color = brush(ctx.theme.stroke_color(shape.style.stroke_color), shape.opacity);
            scene.fill(Fill::NonZero, t, color, None, &outline);
        }
        ShapeProps::Text(text) => {
            let layout = layout_for_shape(text, shape.width, ctx.measure);
            return Some(Run::Text(TextRun {
                shape_id: shape.id,
                transform: t,
                lines: layout.lines,
                font_size: text.font_size,
                font_family: text.font_family.clone(),
                line_height: text.line_height,
                align: text.text_align,
                width: shape.width,
                color: ctx
                    .theme
                    .stroke_color(shape.style.stroke_color)
                    .with_opacity(shape.opacity),
            }));
        }
        ShapeProps::Image(image) => {
            return Some(Run::Image(ImageRun {
                shape_id: shape.id,
                transform: t,
                source: image.source.clone(),
                size: Size::new(shape.width, shape.height),
                opacity: shape.opacity,
            }));
        }
        ShapeProps::Custom(custom) => match ctx.painters.get(&custom.kind) {
            Some(painter) => painter.paint(scene, shape, t),
            None => {
                log::trace!("no painter for custom kind `{}`", custom.kind);
                paint_placeholder(scene, local, t, ctx);
            }
        },
    }
    None
}

// ─── Fill and stroke ─────────────────────────────────────────────────────────

fn paint_fill(scene: &mut Scene, outline: &BezPath, shape: &Shape, t: Affine, ctx: &PaintContext<'_>) {
    let Some(background) = shape.style.background else {
        return;
    };
    let color = brush(background, shape.opacity);
    let angles: &[f64] = match shape.style.fill_style {
        FillStyle::Solid => {
            let fill_path = rough_path(outline, shape.roughness * 0.3, ctx.zoom, shape.seed, 0);
            scene.fill(Fill::NonZero, t, color, None, &fill_path);
            return;
        }
        FillStyle::Hachure => &[HACHURE_ANGLE],
        FillStyle::CrossHatch => &[HACHURE_ANGLE, -HACHURE_ANGLE],
    };

    let sw = shape.style.stroke_width.max(1.0);
    let stroke = Stroke::new(sw / 2.0).with_caps(Cap::Round);
    let bounds = outline.bounding_box();
    scene.push_layer(Mix::Clip, 1.0, t, outline);
    for (k, &angle) in angles.iter().enumerate() {
        for (i, line) in hachure_lines(bounds, angle, hachure_gap(sw)).into_iter().enumerate() {
            let seed = shape.seed.wrapping_add((k * 7919 + i) as u32);
            let path = rough_path(&polyline_path([line.p0, line.p1]), shape.roughness * 0.5, ctx.zoom, seed, 0);
            scene.stroke(&stroke, t, color, None, &path);
        }
    }
    scene.pop_layer();
}

fn paint_stroke(scene: &mut Scene, path: &BezPath, shape: &Shape, t: Affine, ctx: &PaintContext<'_>) {
    let sw = shape.style.stroke_width;
    if sw <= 0.0 {
        return;
    }
    let color = brush(ctx.theme.stroke_color(shape.style.stroke_color), shape.opacity);
    let mut stroke = Stroke::new(sw).with_caps(Cap::Round).with_join(Join::Round);
    match dash_pattern(shape.style.stroke_style, sw) {
        Some(dashes) => {
            // One pass only; a second jittered copy would fill the gaps.
            stroke = stroke.with_dashes(0.0, dashes);
            let rough = rough_path(path, shape.roughness, ctx.zoom, shape.seed, 0);
            scene.stroke(&stroke, t, color, None, &rough);
        }
        None => {
            for rough in rough_strokes(path, shape.roughness, ctx.zoom, shape.seed) {
                scene.stroke(&stroke, t, color, None, &rough);
            }
        }
    }
}

fn paint_arrowheads(
    scene: &mut Scene,
    arrow: &rd_core::ArrowProps,
    shape: &Shape,
    t: Affine,
    ctx: &PaintContext<'_>,
) {
    let sw = shape.style.stroke_width;
    let color = brush(ctx.theme.stroke_color(shape.style.stroke_color), shape.opacity);
    for head in arrow_heads(arrow, sw) {
        let path = polygon_path(&head);
        scene.fill(Fill::NonZero, t, color, None, &path);
        paint_stroke(scene, &path, shape, t, ctx);
    }

    let pts = &arrow.points;
    if pts.len() < 2 {
        return;
    }
    let bars = [
        (arrow.end_head, pts[pts.len() - 1], pts[pts.len() - 2]),
        (arrow.start_head, pts[0], pts[1]),
    ];
    for (head, tip, from) in bars {
        if head != Some(Arrowhead::Bar) {
            continue;
        }
        if let Some((a, b)) = bar_head(tip, from, sw) {
            paint_stroke(scene, &polyline_path([a, b]), shape, t, ctx);
        }
    }
}

/// Perpendicular bar across the segment end at `tip`.
fn bar_head(tip: Point, from: Point, stroke_width: f64) -> Option<(Point, Point)> {
    let d = tip - from;
    let len = d.hypot();
    if len == 0.0 {
        return None;
    }
    let half = arrowhead_length(stroke_width) / 2.0;
    let normal = Vec2::new(-d.y, d.x) / len * half;
    Some((tip + normal, tip - normal))
}

fn paint_placeholder(scene: &mut Scene, local: Rect, t: Affine, ctx: &PaintContext<'_>) {
    let stroke = Stroke::new(1.0 / ctx.zoom).with_dashes(0.0, [4.0 / ctx.zoom, 4.0 / ctx.zoom]);
    scene.stroke(&stroke, t, to_color(ctx.theme.selection), None, &local);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rd_core::{ArrowProps, Color as ShapeColor, CustomProps, EstimateMeasure, ImageProps, TextProps};
    use std::cell::Cell;
    use std::rc::Rc;

    fn with_ctx<R>(f: impl FnOnce(&PaintContext<'_>) -> R) -> R {
        let theme = Theme::light();
        let measure = EstimateMeasure::default();
        let painters = PainterRegistry::default();
        f(&PaintContext {
            zoom: 1.0,
            theme: &theme,
            measure: &measure,
            painters: &painters,
        })
    }

    #[test]
    fn rectangle_emits_geometry() {
        let mut scene = Scene::new();
        let mut rect = Shape::rectangle(ShapeId::intern("paint_rect"), 10.0, 10.0, 100.0, 50.0);
        rect.style.background = Some(ShapeColor::rgba(0xFF, 0xC9, 0xC9, 0xFF));
        let run = with_ctx(|ctx| paint_shape(&mut scene, &rect, placement(&rect), ctx));
        assert!(run.is_none());
        assert!(!scene.encoding().is_empty());
    }

    #[test]
    fn every_fill_style_paints() {
        for fill in [FillStyle::Hachure, FillStyle::CrossHatch, FillStyle::Solid] {
            let mut scene = Scene::new();
            let mut e = Shape::ellipse(ShapeId::intern("paint_fill"), 0.0, 0.0, 60.0, 40.0);
            e.style.background = Some(ShapeColor::rgba(0xA5, 0xD8, 0xFF, 0xFF));
            e.style.fill_style = fill;
            with_ctx(|ctx| paint_shape(&mut scene, &e, Affine::IDENTITY, ctx));
            assert!(!scene.encoding().is_empty(), "{fill:?}");
        }
    }

    #[test]
    fn hidden_shape_paints_nothing() {
        let mut scene = Scene::new();
        let mut rect = Shape::rectangle(ShapeId::intern("paint_hidden"), 0.0, 0.0, 10.0, 10.0);
        rect.opacity = 0.0;
        with_ctx(|ctx| paint_shape(&mut scene, &rect, Affine::IDENTITY, ctx));
        assert!(scene.encoding().is_empty());
    }

    #[test]
    fn text_becomes_a_run() {
        let mut scene = Scene::new();
        let text = Shape::new(
            ShapeId::intern("paint_text"),
            ShapeProps::Text(TextProps {
                text: "hi there".to_string(),
                font_size: 20.0,
                font_family: "Virgil".to_string(),
                text_align: TextAlign::Center,
                line_height: 1.25,
                auto_width: true,
            }),
            5.0,
            6.0,
            96.0,
            25.0,
        );
        let run = with_ctx(|ctx| paint_shape(&mut scene, &text, placement(&text), ctx));
        let Some(Run::Text(run)) = run else {
            panic!("expected a text run");
        };
        assert_eq!(run.lines, vec!["hi there"]);
        assert_eq!(run.transform * Point::ZERO, Point::new(5.0, 6.0));
        assert!(scene.encoding().is_empty());
    }

    #[test]
    fn image_becomes_a_run_and_can_be_placed() {
        let mut scene = Scene::new();
        let image = Shape::new(
            ShapeId::intern("paint_image"),
            ShapeProps::Image(ImageProps {
                source: "blob:1".to_string(),
                natural_width: 640.0,
                natural_height: 480.0,
            }),
            0.0,
            0.0,
            64.0,
            48.0,
        );
        let run = with_ctx(|ctx| paint_shape(&mut scene, &image, Affine::IDENTITY, ctx)).unwrap();
        let placed = run.placed(Affine::translate((100.0, 0.0)));
        let Run::Image(img) = placed else {
            panic!("expected an image run");
        };
        assert_eq!(img.transform * Point::ZERO, Point::new(100.0, 0.0));
        assert_eq!(img.size, Size::new(64.0, 48.0));
    }

    #[test]
    fn arrow_with_heads_paints() {
        let mut scene = Scene::new();
        let arrow = Shape::new(
            ShapeId::intern("paint_arrow"),
            ShapeProps::Arrow(ArrowProps {
                points: vec![Point::new(0.0, 0.0), Point::new(80.0, 0.0)],
                start_head: Some(Arrowhead::Bar),
                end_head: Some(Arrowhead::Triangle),
            }),
            0.0,
            0.0,
            80.0,
            0.0,
        );
        with_ctx(|ctx| paint_shape(&mut scene, &arrow, Affine::IDENTITY, ctx));
        assert!(!scene.encoding().is_empty());
    }

    struct Counting(Rc<Cell<u32>>);

    impl CustomPainter for Counting {
        fn paint(&self, _scene: &mut Scene, _shape: &Shape, _transform: Affine) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn custom_shapes_use_registered_painter() {
        let calls = Rc::new(Cell::new(0));
        let mut painters = PainterRegistry::default();
        painters.register("sticky", Box::new(Counting(calls.clone())));
        let theme = Theme::light();
        let measure = EstimateMeasure::default();
        let ctx = PaintContext {
            zoom: 1.0,
            theme: &theme,
            measure: &measure,
            painters: &painters,
        };
        let custom = Shape::new(
            ShapeId::intern("paint_custom"),
            ShapeProps::Custom(CustomProps {
                kind: "sticky".to_string(),
                data: serde_json::Value::Null,
            }),
            0.0,
            0.0,
            10.0,
            10.0,
        );
        let mut scene = Scene::new();
        paint_shape(&mut scene, &custom, Affine::IDENTITY, &ctx);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn rotation_is_about_local_center() {
        let mut rect = Shape::rectangle(ShapeId::intern("paint_rot"), 0.0, 0.0, 100.0, 20.0);
        rect.rotation = std::f64::consts::PI;
        let center = local_transform(&rect) * Point::new(50.0, 10.0);
        assert!(center.distance(Point::new(50.0, 10.0)) < 1e-9);
        let corner = local_transform(&rect) * Point::ZERO;
        assert!(corner.distance(Point::new(100.0, 20.0)) < 1e-9);
    }
}
