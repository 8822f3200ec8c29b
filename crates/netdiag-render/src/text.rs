use netdiag_core::FontStyle;
use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_family: Option<String>,
    pub font_size: f64,
    pub font_style: FontStyle,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: None,
            font_size: 12.0,
            font_style: FontStyle::Plain,
        }
    }
}

impl TextStyle {
    pub fn with_font_style(mut self, font_style: FontStyle) -> Self {
        self.font_style = font_style;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextMetrics {
    pub width: f64,
    /// Distance from the baseline to the top of the glyphs.
    pub ascent: f64,
    /// Distance from the baseline to the bottom of the glyphs (positive).
    pub descent: f64,
}

impl TextMetrics {
    /// Label height used for baseline placement: `ascent - descent`.
    pub fn label_height(&self) -> f64 {
        self.ascent - self.descent
    }
}

pub trait TextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics;
}

/// Font-independent measurer: every terminal column is `char_width_factor * font_size` wide.
#[derive(Debug, Clone, Default)]
pub struct DeterministicTextMeasurer {
    pub char_width_factor: f64,
    pub ascent_factor: f64,
    pub descent_factor: f64,
}

impl TextMeasurer for DeterministicTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let char_width_factor = if self.char_width_factor == 0.0 {
            0.6
        } else {
            self.char_width_factor
        };
        let ascent_factor = if self.ascent_factor == 0.0 {
            0.8
        } else {
            self.ascent_factor
        };
        let descent_factor = if self.descent_factor == 0.0 {
            0.2
        } else {
            self.descent_factor
        };

        let font_size = style.font_size.max(1.0);
        let bold = if style.font_style.is_bold() { 1.1 } else { 1.0 };
        let columns = UnicodeWidthStr::width(text);

        TextMetrics {
            width: columns as f64 * font_size * char_width_factor * bold,
            ascent: font_size * ascent_factor,
            descent: font_size * descent_factor,
        }
    }
}
