//! Canvas colors.
//!
//! The host can pass a flat token object (every field an optional hex
//! string). Missing or unparsable tokens fall back to the built-in light or
//! dark palette.

use rd_core::Color;
use serde::Deserialize;

/// Theme-dependent colors for the canvas renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub background: Color,
    pub grid: Color,
    pub selection: Color,
    pub handle_fill: Color,
    /// Drawn in place of the default stroke color when it would vanish on
    /// the background (dark mode).
    pub default_stroke: Color,
    pub label_background: Color,
    pub label_text: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

impl Theme {
    /// Light theme: warm white paper.
    pub fn light() -> Self {
        Self {
            background: Color::rgba(0xFF, 0xFF, 0xFF, 0xFF),
            grid: Color::rgba(0, 0, 0, 0x14),
            selection: Color::rgba(0x69, 0x65, 0xDB, 0xFF),
            handle_fill: Color::rgba(0xFF, 0xFF, 0xFF, 0xFF),
            default_stroke: Color::BLACK,
            label_background: Color::rgba(0x69, 0x65, 0xDB, 0xFF),
            label_text: Color::rgba(0xFF, 0xFF, 0xFF, 0xFF),
        }
    }

    /// Dark theme.
    pub fn dark() -> Self {
        Self {
            background: Color::rgba(0x12, 0x12, 0x12, 0xFF),
            grid: Color::rgba(0xFF, 0xFF, 0xFF, 0x0F),
            selection: Color::rgba(0xA8, 0xA5, 0xFF, 0xFF),
            handle_fill: Color::rgba(0x23, 0x23, 0x29, 0xFF),
            default_stroke: Color::rgba(0xE3, 0xE3, 0xE8, 0xFF),
            label_background: Color::rgba(0xA8, 0xA5, 0xFF, 0xFF),
            label_text: Color::rgba(0x12, 0x12, 0x12, 0xFF),
        }
    }

    /// Resolve `tokens` over the light or dark defaults.
    pub fn from_tokens(tokens: &ThemeTokens, dark: bool) -> Self {
        let base = if dark { Self::dark() } else { Self::light() };
        let pick = |token: &Option<String>, fallback: Color| match token.as_deref() {
            None => fallback,
            Some(hex) => Color::from_hex(hex).unwrap_or_else(|| {
                log::warn!("theme: ignoring invalid color token `{hex}`");
                fallback
            }),
        };
        Self {
            background: pick(&tokens.background, base.background),
            grid: pick(&tokens.grid, base.grid),
            selection: pick(&tokens.selection, base.selection),
            handle_fill: pick(&tokens.handle_fill, base.handle_fill),
            default_stroke: pick(&tokens.default_stroke, base.default_stroke),
            label_background: pick(&tokens.label_background, base.label_background),
            label_text: pick(&tokens.label_text, base.label_text),
        }
    }

    /// Stroke color to actually draw: the document default black is swapped
    /// for the theme's default stroke so it stays visible.
    pub fn stroke_color(&self, color: Color) -> Color {
        if color == Color::BLACK { self.default_stroke } else { color }
    }
}

/// Host-provided color overrides.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeTokens {
    pub background: Option<String>,
    pub grid: Option<String>,
    pub selection: Option<String>,
    pub handle_fill: Option<String>,
    pub default_stroke: Option<String>,
    pub label_background: Option<String>,
    pub label_text: Option<String>,
}

impl ThemeTokens {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_tokens_fall_back() {
        assert_eq!(Theme::from_tokens(&ThemeTokens::default(), true), Theme::dark());
        assert_eq!(Theme::from_tokens(&ThemeTokens::default(), false), Theme::light());
    }

    #[test]
    fn tokens_override_and_bad_hex_is_ignored() {
        let tokens = ThemeTokens::from_json(r##"{ "selection": "#FF0000", "grid": "nope" }"##).unwrap();
        let theme = Theme::from_tokens(&tokens, false);
        assert_eq!(theme.selection, Color::rgba(0xFF, 0, 0, 0xFF));
        assert_eq!(theme.grid, Theme::light().grid);
    }

    #[test]
    fn default_black_follows_theme() {
        let dark = Theme::dark();
        assert_eq!(dark.stroke_color(Color::BLACK), dark.default_stroke);
        let red = Color::rgba(0xE0, 0x31, 0x31, 0xFF);
        assert_eq!(dark.stroke_color(red), red);
    }
}
