/// Width measurement of a string set in a given font, in points.
///
/// Alignment depends on it; wrapping does not.
pub trait TextMeasurer {
    fn string_width(&self, text: &str, font: &str, font_size: f32) -> f32;
}

/// Estimates every glyph at the same average width. Used when no font
/// metrics are available.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AverageWidthMeasurer {
    pub char_width_factor: f32,
}

impl Default for AverageWidthMeasurer {
    fn default() -> Self {
        Self {
            char_width_factor: 0.55,
        }
    }
}

impl TextMeasurer for AverageWidthMeasurer {
    fn string_width(&self, text: &str, _font: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * font_size * self.char_width_factor
    }
}

impl<M: TextMeasurer + ?Sized> TextMeasurer for &M {
    fn string_width(&self, text: &str, font: &str, font_size: f32) -> f32 {
        (**self).string_width(text, font, font_size)
    }
}
