//! Interactive-layer decorations: selection outlines, resize and rotation
//! handles, and the transient items tools ask for (freehand preview,
//! dimension and angle labels).
//!
//! Handle and outline sizes are in screen pixels; they are divided by the
//! zoom because the world → screen transform scales them back up.

use crate::freehand::freehand_outline;
use crate::paint::to_color;
use crate::theme::Theme;
use kurbo::{Affine, Circle, Point, Rect, RoundedRect, Stroke};
use peniko::Fill;
use rd_core::geometry::normalize_angle;
use rd_core::handles::SelectionFrame;
use rd_core::{StrokePoint, Style, Viewport};
use vello::Scene;

/// Approximate label glyph advance in screen pixels.
const LABEL_CHAR_WIDTH: f64 = 7.0;
const LABEL_HEIGHT: f64 = 18.0;
const LABEL_GAP: f64 = 16.0;

/// Something a tool wants drawn on the interactive layer.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayItem {
    /// In-progress freehand stroke; points in world space.
    DrawPreview {
        points: Vec<StrokePoint>,
        style: Style,
        simulate_pressure: bool,
    },
    /// `W × H` label under `bounds` (world space).
    Dimensions { bounds: Rect },
    /// Rotation readout next to `anchor` (world space).
    Angle { anchor: Point, angle: f64 },
    /// Dashed outline around an open text editor; world space.
    TextEditBox { bounds: Rect, rotation: f64 },
}

/// A screen-space text label for the host to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub position: Point,
    pub text: String,
    pub color: rd_core::Color,
}

/// Sizes used for selection chrome, in screen pixels.
#[derive(Debug, Clone, Copy)]
pub struct HandleMetrics {
    pub handle_size: f64,
    pub rotation_offset: f64,
}

fn frame_transform(view: &Viewport, bounds: Rect, rotation: f64) -> Affine {
    if rotation == 0.0 {
        view.transform()
    } else {
        view.transform() * Affine::rotate_about(rotation, bounds.center())
    }
}

/// Thin outline around one selected shape.
pub fn paint_shape_outline(scene: &mut Scene, bounds: Rect, rotation: f64, view: &Viewport, theme: &Theme) {
    let t = frame_transform(view, bounds, rotation);
    let stroke = Stroke::new(1.0 / view.zoom);
    scene.stroke(&stroke, t, to_color(theme.selection), None, &bounds);
}

/// Frame, resize handles and rotation handle for the current selection.
pub fn paint_selection_frame(
    scene: &mut Scene,
    frame: &SelectionFrame,
    multi: bool,
    view: &Viewport,
    theme: &Theme,
    metrics: HandleMetrics,
) {
    let zoom = view.zoom;
    let t = frame_transform(view, frame.bounds, frame.rotation);
    let selection = to_color(theme.selection);
    let handle_fill = to_color(theme.handle_fill);
    let line = Stroke::new(1.0 / zoom);

    if multi {
        let dashed = Stroke::new(1.0 / zoom).with_dashes(0.0, [4.0 / zoom, 4.0 / zoom]);
        scene.stroke(&dashed, t, selection, None, &frame.bounds);
    }

    let half = metrics.handle_size / 2.0 / zoom;
    for handle in frame.handles() {
        let p = handle.position(frame.bounds);
        let square = Rect::new(p.x - half, p.y - half, p.x + half, p.y + half);
        let square = RoundedRect::from_rect(square, half * 0.4);
        scene.fill(Fill::NonZero, t, handle_fill, None, &square);
        scene.stroke(&line, t, selection, None, &square);
    }

    let knob = Circle::new(frame.rotation_handle(metrics.rotation_offset, zoom), half);
    scene.fill(Fill::NonZero, t, handle_fill, None, &knob);
    scene.stroke(&line, t, selection, None, &knob);
}

/// Paint one tool overlay item; labels come back for the host to draw.
pub fn paint_overlay_item(scene: &mut Scene, item: &OverlayItem, view: &Viewport, theme: &Theme) -> Option<Label> {
    match item {
        OverlayItem::DrawPreview {
            points,
            style,
            simulate_pressure,
        } => {
            let outline = freehand_outline(points, style.stroke_width * 3.0, *simulate_pressure);
            let color = to_color(theme.stroke_color(style.stroke_color));
            scene.fill(Fill::NonZero, view.transform(), color, None, &outline);
            None
        }
        OverlayItem::Dimensions { bounds } => {
            let text = format!("{} × {}", bounds.width().round(), bounds.height().round());
            let anchor = view.world_to_screen(Point::new(bounds.center().x, bounds.y1));
            Some(label(scene, Point::new(anchor.x, anchor.y + LABEL_GAP), text, theme))
        }
        OverlayItem::Angle { anchor, angle } => {
            let degrees = normalize_angle(*angle).to_degrees().round() % 360.0;
            let at = view.world_to_screen(*anchor);
            Some(label(scene, Point::new(at.x + LABEL_GAP, at.y - LABEL_GAP), format!("{degrees}°"), theme))
        }
        OverlayItem::TextEditBox { bounds, rotation } => {
            let zoom = view.zoom;
            let t = frame_transform(view, *bounds, *rotation);
            let dashed = Stroke::new(1.0 / zoom).with_dashes(0.0, [3.0 / zoom, 3.0 / zoom]);
            let padded = bounds.inflate(4.0 / zoom, 4.0 / zoom);
            scene.stroke(&dashed, t, to_color(theme.selection), None, &padded);
            None
        }
    }
}

/// Pill background centered on `center` (screen space).
fn label(scene: &mut Scene, center: Point, text: String, theme: &Theme) -> Label {
    let w = text.chars().count() as f64 * LABEL_CHAR_WIDTH + 12.0;
    let pill = Rect::from_center_size(center, (w, LABEL_HEIGHT));
    let pill = RoundedRect::from_rect(pill, LABEL_HEIGHT / 2.0);
    scene.fill(Fill::NonZero, Affine::IDENTITY, to_color(theme.label_background), None, &pill);
    Label {
        position: center,
        text,
        color: theme.label_text,
    }
}
