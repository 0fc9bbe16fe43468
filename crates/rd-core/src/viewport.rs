//! Camera: screen-space pan plus a clamped zoom factor.
//!
//! `screen = world * zoom + (x, y)`.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    pub fn screen_to_world(&self, p: Point) -> Point {
        Point::new((p.x - self.x) / self.zoom, (p.y - self.y) / self.zoom)
    }

    pub fn world_to_screen(&self, p: Point) -> Point {
        Point::new(p.x * self.zoom + self.x, p.y * self.zoom + self.y)
    }

    /// World → screen transform for the renderer.
    pub fn transform(&self) -> Affine {
        Affine::translate(Vec2::new(self.x, self.y)) * Affine::scale(self.zoom)
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Set the zoom to `new_zoom` (clamped to `[min, max]`), keeping the
    /// world point under `anchor` (screen space) where it is on screen.
    /// Returns whether the viewport changed.
    pub fn zoom_to(&mut self, new_zoom: f64, anchor: Option<Point>, min: f64, max: f64) -> bool {
        let new_zoom = new_zoom.clamp(min, max);
        if new_zoom == self.zoom {
            return false;
        }
        if let Some(c) = anchor {
            let ratio = new_zoom / self.zoom;
            self.x = c.x - (c.x - self.x) * ratio;
            self.y = c.y - (c.y - self.y) * ratio;
        }
        self.zoom = new_zoom;
        true
    }

    /// World rectangle currently visible on a surface of `size` screen pixels.
    pub fn visible_world_rect(&self, size: Size) -> Rect {
        let tl = self.screen_to_world(Point::ZERO);
        let br = self.screen_to_world(Point::new(size.width, size.height));
        Rect::from_points(tl, br)
    }

    /// Viewport that centers `content` on a surface of `size`, leaving
    /// `padding` screen pixels on every side. The zoom is clamped to
    /// `[min, max]`.
    pub fn fit(content: Rect, size: Size, padding: f64, min: f64, max: f64) -> Self {
        let avail_w = (size.width - padding * 2.0).max(1.0);
        let avail_h = (size.height - padding * 2.0).max(1.0);
        let zoom = if content.width() > 0.0 && content.height() > 0.0 {
            (avail_w / content.width()).min(avail_h / content.height())
        } else if content.width() > 0.0 {
            avail_w / content.width()
        } else if content.height() > 0.0 {
            avail_h / content.height()
        } else {
            1.0
        }
        .clamp(min, max);

        let c = content.center();
        Self {
            x: size.width / 2.0 - c.x * zoom,
            y: size.height / 2.0 - c.y * zoom,
            zoom,
        }
    }
}
