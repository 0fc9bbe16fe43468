//! Editor tuning knobs.
//!
//! Every field has a default, so a host can load a partial JSON object and
//! override only what it cares about.

use crate::model::Style;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// History log cap; the oldest entry is dropped past this.
    pub max_history: usize,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Zoom delta per keyboard zoom step.
    pub zoom_step: f64,
    /// Zoom change per wheel pixel while Ctrl/⌘ is held.
    pub wheel_zoom_speed: f64,
    /// Drawn shapes smaller than this in both dimensions are discarded.
    pub min_shape_size: f64,
    pub min_resize_size: f64,
    /// Screen pixels.
    pub handle_size: f64,
    /// Screen pixels between the frame top and the rotation handle.
    pub rotation_handle_offset: f64,
    /// World units at zoom 1; divided by the zoom when hit-testing.
    pub hit_tolerance: f64,
    pub max_draw_points: usize,
    pub min_font_size: f64,
    pub default_font_size: f64,
    pub default_font_family: String,
    pub blur_confirm_delay_ms: f64,
    /// Screen pixels added around the visible rect before culling.
    pub cull_margin: f64,
    /// World units; 0 disables the grid.
    pub grid_size: f64,
    /// Offset applied to duplicated shapes.
    pub duplicate_offset: f64,
    /// Arrow-key nudge distance (Shift multiplies by 10).
    pub nudge_step: f64,
    /// Screen padding used by zoom-to-fit.
    pub fit_padding: f64,
    pub default_style: Style,
    pub default_roughness: f64,
    pub initial_seed: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_history: 100,
            min_zoom: 0.1,
            max_zoom: 10.0,
            zoom_step: 0.1,
            wheel_zoom_speed: 0.002,
            min_shape_size: 5.0,
            min_resize_size: 10.0,
            handle_size: 8.0,
            rotation_handle_offset: 24.0,
            hit_tolerance: 5.0,
            max_draw_points: 2000,
            min_font_size: 8.0,
            default_font_size: 20.0,
            default_font_family: "Virgil".to_string(),
            blur_confirm_delay_ms: 120.0,
            cull_margin: 100.0,
            grid_size: 20.0,
            duplicate_offset: 10.0,
            nudge_step: 1.0,
            fit_padding: 40.0,
            default_style: Style::default(),
            default_roughness: 1.0,
            initial_seed: 0x2F6E_2B1D,
        }
    }
}

impl EditorConfig {
    /// Parse a (possibly partial) JSON config.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = EditorConfig::from_json(r#"{ "maxHistory": 5, "gridSize": 0 }"#).unwrap();
        assert_eq!(cfg.max_history, 5);
        assert_eq!(cfg.grid_size, 0.0);
        assert_eq!(cfg.min_zoom, 0.1);
        assert_eq!(cfg.max_draw_points, 2000);
    }

    #[test]
    fn bad_json_is_an_error() {
        assert!(EditorConfig::from_json(r#"{ "maxHistory": "lots" }"#).is_err());
    }
}
