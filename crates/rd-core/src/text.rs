//! Text measurement and word wrapping.
//!
//! Real glyph metrics live with the host's font stack; the core only needs
//! widths to wrap and size text shapes, so measurement is a trait the host
//! can implement. `EstimateMeasure` is the built-in fallback.

use crate::model::TextProps;

pub trait TextMeasure {
    /// Advance width of `text` on one line.
    fn line_width(&self, text: &str, font_size: f64, font_family: &str) -> f64;
}

/// Fixed per-character advance as a fraction of the font size.
#[derive(Debug, Clone, Copy)]
pub struct EstimateMeasure {
    pub char_width: f64,
}

impl Default for EstimateMeasure {
    fn default() -> Self {
        Self { char_width: 0.6 }
    }
}

impl TextMeasure for EstimateMeasure {
    fn line_width(&self, text: &str, font_size: f64, _font_family: &str) -> f64 {
        text.chars().count() as f64 * font_size * self.char_width
    }
}

/// Result of laying out a text block.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    pub lines: Vec<String>,
    pub width: f64,
    pub height: f64,
}

/// Lay out `props.text`. With `wrap_width` the text is word-wrapped to that
/// width (a single over-long word still gets its own line); without it only
/// explicit newlines break lines.
pub fn layout_text(props: &TextProps, wrap_width: Option<f64>, measure: &dyn TextMeasure) -> TextLayout {
    let width_of = |s: &str| measure.line_width(s, props.font_size, &props.font_family);
    let mut lines = Vec::new();

    for paragraph in props.text.split('\n') {
        let Some(max) = wrap_width else {
            lines.push(paragraph.to_string());
            continue;
        };

        let mut current = String::new();
        for word in paragraph.split(' ') {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }
            let candidate = format!("{current} {word}");
            if width_of(&candidate) <= max {
                current = candidate;
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
            }
        }
        lines.push(current);
    }

    let natural = lines.iter().map(|l| width_of(l)).fold(0.0, f64::max);
    let width = wrap_width.unwrap_or(natural);
    let height = lines.len() as f64 * props.font_size * props.line_height;
    TextLayout { lines, width, height }
}

/// Layout for a text shape of the given width, honoring `auto_width`.
pub fn layout_for_shape(props: &TextProps, shape_width: f64, measure: &dyn TextMeasure) -> TextLayout {
    if props.auto_width {
        layout_text(props, None, measure)
    } else {
        layout_text(props, Some(shape_width), measure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TextAlign;
    use pretty_assertions::assert_eq;

    fn props(text: &str) -> TextProps {
        TextProps {
            text: text.to_string(),
            font_size: 10.0,
            font_family: "Virgil".to_string(),
            text_align: TextAlign::Left,
            line_height: 1.25,
            auto_width: true,
        }
    }

    #[test]
    fn unwrapped_keeps_explicit_lines() {
        let m = EstimateMeasure::default();
        let layout = layout_text(&props("hello\nworld!"), None, &m);
        assert_eq!(layout.lines, vec!["hello", "world!"]);
        assert!((layout.width - 36.0).abs() < 1e-9);
        assert!((layout.height - 25.0).abs() < 1e-9);
    }

    #[test]
    fn wraps_words_at_width() {
        let m = EstimateMeasure::default();
        // each char is 6 wide; "aaa bbb" = 42 > 30
        let layout = layout_text(&props("aaa bbb ccc"), Some(30.0), &m);
        assert_eq!(layout.lines, vec!["aaa", "bbb", "ccc"]);
        assert_eq!(layout.width, 30.0);
    }

    #[test]
    fn long_word_gets_own_line() {
        let m = EstimateMeasure::default();
        let layout = layout_text(&props("a supercalifragilistic b"), Some(20.0), &m);
        assert_eq!(layout.lines, vec!["a", "supercalifragilistic", "b"]);
    }
}
