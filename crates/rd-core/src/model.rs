//! Shape data model.
//!
//! A `Shape` is a flat record of common fields (position, size, rotation,
//! opacity, lock, hand-drawn seed) plus a tagged `ShapeProps` payload for
//! the variant. Point geometry (lines, arrows, freehand paths) is stored
//! relative to the shape's `(x, y)` so a move only touches two numbers.
//!
//! Everything here is plain data and round-trips through serde.

use crate::id::ShapeId;
use kurbo::{Point, Rect};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ─── Colors ──────────────────────────────────────────────────────────────

/// 8-bit RGBA color. Serialized as a hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Helper to parse a single hex digit.
pub fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const BLACK: Color = Color::rgba(0x1E, 0x1E, 0x1E, 0xFF);
    pub const WHITE: Color = Color::rgba(0xFF, 0xFF, 0xFF, 0xFF);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA`; the `#` is optional.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        match bytes.len() {
            3 | 4 => {
                let mut out = [0xFFu8; 4];
                for (slot, &c) in out.iter_mut().zip(bytes) {
                    *slot = hex_val(c)? * 17;
                }
                Some(Self::rgba(out[0], out[1], out[2], out[3]))
            }
            6 | 8 => {
                let mut out = [0xFFu8; 4];
                for (slot, pair) in out.iter_mut().zip(bytes.chunks(2)) {
                    *slot = hex_val(pair[0])? << 4 | hex_val(pair[1])?;
                }
                Some(Self::rgba(out[0], out[1], out[2], out[3]))
            }
            _ => None,
        }
    }

    /// `#RRGGBB` when opaque, `#RRGGBBAA` otherwise.
    pub fn to_hex(&self) -> String {
        if self.a == 0xFF {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    /// Multiply alpha by `opacity` (clamped to 0..1).
    pub fn with_opacity(self, opacity: f64) -> Self {
        let a = (self.a as f64 * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid color `{s}`")))
    }
}

// ─── Style ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FillStyle {
    #[default]
    Hachure,
    CrossHatch,
    Solid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// Visual style shared by every variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Style {
    pub stroke_color: Color,
    /// `None` = no fill.
    pub background: Option<Color>,
    pub fill_style: FillStyle,
    pub stroke_width: f64,
    pub stroke_style: StrokeStyle,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            stroke_color: Color::BLACK,
            background: None,
            fill_style: FillStyle::Hachure,
            stroke_width: 2.0,
            stroke_style: StrokeStyle::Solid,
        }
    }
}

// ─── Variant payloads ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arrowhead {
    Triangle,
    Bar,
}

/// A freehand sample: position relative to the shape origin, plus pressure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokePoint {
    pub x: f64,
    pub y: f64,
    pub pressure: f64,
}

impl StrokePoint {
    pub fn new(x: f64, y: f64, pressure: f64) -> Self {
        Self { x, y, pressure }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearProps {
    /// Vertices relative to the shape origin.
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrowProps {
    pub points: Vec<Point>,
    pub start_head: Option<Arrowhead>,
    pub end_head: Option<Arrowhead>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathProps {
    pub points: Vec<StrokePoint>,
    /// Mouse input has no real pressure; the outline generator fakes it from velocity.
    pub simulate_pressure: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextProps {
    pub text: String,
    pub font_size: f64,
    pub font_family: String,
    pub text_align: TextAlign,
    /// Line height as a multiple of the font size.
    pub line_height: f64,
    /// `true` until the user resizes the box; then `width` is the wrap width.
    pub auto_width: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageProps {
    /// Opaque key or data URL resolved by the host.
    pub source: String,
    pub natural_width: f64,
    pub natural_height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomProps {
    /// Registry key for the behavior and painter of this shape.
    pub kind: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Variant-specific payload, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeProps {
    Rectangle {
        #[serde(default, rename = "cornerRadius")]
        corner_radius: f64,
    },
    Ellipse,
    Line(LinearProps),
    Arrow(ArrowProps),
    Path(PathProps),
    Text(TextProps),
    Image(ImageProps),
    Custom(CustomProps),
}

/// Discriminant of `ShapeProps`, used for tool/shape-kind lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeType {
    Rectangle,
    Ellipse,
    Line,
    Arrow,
    Path,
    Text,
    Image,
    Custom,
}

impl ShapeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeType::Rectangle => "rectangle",
            ShapeType::Ellipse => "ellipse",
            ShapeType::Line => "line",
            ShapeType::Arrow => "arrow",
            ShapeType::Path => "path",
            ShapeType::Text => "text",
            ShapeType::Image => "image",
            ShapeType::Custom => "custom",
        }
    }
}

impl ShapeProps {
    pub fn shape_type(&self) -> ShapeType {
        match self {
            ShapeProps::Rectangle { .. } => ShapeType::Rectangle,
            ShapeProps::Ellipse => ShapeType::Ellipse,
            ShapeProps::Line(_) => ShapeType::Line,
            ShapeProps::Arrow(_) => ShapeType::Arrow,
            ShapeProps::Path(_) => ShapeType::Path,
            ShapeProps::Text(_) => ShapeType::Text,
            ShapeProps::Image(_) => ShapeType::Image,
            ShapeProps::Custom(_) => ShapeType::Custom,
        }
    }
}

// ─── Shape ───────────────────────────────────────────────────────────────

fn default_opacity() -> f64 {
    1.0
}

fn default_roughness() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    pub id: ShapeId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Radians, clockwise, about the shape center.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub parent_id: Option<ShapeId>,
    #[serde(default)]
    pub seed: u32,
    #[serde(default = "default_roughness")]
    pub roughness: f64,
    #[serde(default)]
    pub style: Style,
    pub props: ShapeProps,
}

impl Shape {
    /// New unrotated, fully opaque shape with the default style.
    pub fn new(id: ShapeId, props: ShapeProps, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id,
            x,
            y,
            width,
            height,
            rotation: 0.0,
            opacity: 1.0,
            is_locked: false,
            parent_id: None,
            seed: 1,
            roughness: 1.0,
            style: Style::default(),
            props,
        }
    }

    pub fn rectangle(id: ShapeId, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(id, ShapeProps::Rectangle { corner_radius: 0.0 }, x, y, width, height)
    }

    pub fn ellipse(id: ShapeId, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(id, ShapeProps::Ellipse, x, y, width, height)
    }

    pub fn shape_type(&self) -> ShapeType {
        self.props.shape_type()
    }

    pub fn is_text(&self) -> bool {
        matches!(self.props, ShapeProps::Text(_))
    }

    /// Unrotated bounds in world space.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Vertex list for Line/Arrow shapes (relative to the origin).
    pub fn linear_points(&self) -> Option<&[Point]> {
        match &self.props {
            ShapeProps::Line(l) => Some(&l.points),
            ShapeProps::Arrow(a) => Some(&a.points),
            _ => None,
        }
    }

    pub fn text_props(&self) -> Option<&TextProps> {
        match &self.props {
            ShapeProps::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn text_props_mut(&mut self) -> Option<&mut TextProps> {
        match &mut self.props {
            ShapeProps::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Merge a partial update into this shape.
    pub fn apply_patch(&mut self, patch: &ShapePatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(w) = patch.width {
            self.width = w.max(0.0);
        }
        if let Some(h) = patch.height {
            self.height = h.max(0.0);
        }
        if let Some(r) = patch.rotation {
            self.rotation = r;
        }
        if let Some(o) = patch.opacity {
            self.opacity = o.clamp(0.0, 1.0);
        }
        if let Some(locked) = patch.is_locked {
            self.is_locked = locked;
        }
        if let Some(parent) = patch.parent_id {
            self.parent_id = parent;
        }
        if let Some(seed) = patch.seed {
            self.seed = seed;
        }
        if let Some(roughness) = patch.roughness {
            self.roughness = roughness;
        }
        if let Some(style) = &patch.style {
            self.style = style.clone();
        }
        if let Some(props) = &patch.props {
            self.props = props.clone();
        }
    }
}

/// Partial field update for `Store::update_shape`. `None` = leave unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapePatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Option<f64>,
    pub opacity: Option<f64>,
    pub is_locked: Option<bool>,
    pub parent_id: Option<Option<ShapeId>>,
    pub seed: Option<u32>,
    pub roughness: Option<f64>,
    pub style: Option<Style>,
    pub props: Option<ShapeProps>,
}

impl ShapePatch {
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    pub fn bounds(rect: Rect) -> Self {
        Self {
            x: Some(rect.x0),
            y: Some(rect.y0),
            width: Some(rect.width()),
            height: Some(rect.height()),
            ..Default::default()
        }
    }

    pub fn opacity(opacity: f64) -> Self {
        Self {
            opacity: Some(opacity),
            ..Default::default()
        }
    }

    /// Everything that differs between `from` and `to`, as a patch.
    pub fn diff(from: &Shape, to: &Shape) -> Self {
        fn changed<T: PartialEq + Clone>(a: &T, b: &T) -> Option<T> {
            (a != b).then(|| b.clone())
        }
        Self {
            x: changed(&from.x, &to.x),
            y: changed(&from.y, &to.y),
            width: changed(&from.width, &to.width),
            height: changed(&from.height, &to.height),
            rotation: changed(&from.rotation, &to.rotation),
            opacity: changed(&from.opacity, &to.opacity),
            is_locked: changed(&from.is_locked, &to.is_locked),
            parent_id: changed(&from.parent_id, &to.parent_id),
            seed: changed(&from.seed, &to.seed),
            roughness: changed(&from.roughness, &to.roughness),
            style: changed(&from.style, &to.style),
            props: changed(&from.props, &to.props),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
