//! Top-to-bottom placement of wrapped text on a page.
//!
//! The flow is single pass: every call consumes a cursor `y`, appends the
//! lines it draws to a caller-owned page buffer and returns the cursor after
//! the last line. Nothing is ever moved once placed.

use crate::text::{TextMeasurer, dedent, max_chars_per_line, wrap_line};
use crate::{LayoutConfig, PositionedElement, TextElement};
use pagescript_style::{EffectiveStyle, TextAlign};

/// Horizontal position of a line of `text_width` on a page of `page_width`
/// with left origin `x`. Right alignment mirrors the left margin.
pub fn aligned_x(align: TextAlign, x: f32, page_width: f32, text_width: f32) -> f32 {
    match align {
        TextAlign::Left => x,
        TextAlign::Center => (page_width - text_width) / 2.0,
        TextAlign::Right => page_width - text_width - x,
    }
}

pub struct TextFlow<'m> {
    page_width: f32,
    config: LayoutConfig,
    measurer: &'m dyn TextMeasurer,
}

impl<'m> TextFlow<'m> {
    pub fn new(page_width: f32, config: LayoutConfig, measurer: &'m dyn TextMeasurer) -> Self {
        Self {
            page_width,
            config,
            measurer,
        }
    }

    /// Cursor advance per emitted line.
    pub fn line_height(&self, style: &EffectiveStyle) -> f32 {
        style.font_size + self.config.line_spacing
    }

    /// Wraps `text` and places each resulting line starting at `y`.
    ///
    /// A blank explicit line draws nothing but still advances the cursor one
    /// line, wherever it sits. Empty text has no lines and leaves `y` as is.
    pub fn wrap_text(
        &self,
        text: &str,
        x: f32,
        y: f32,
        style: &EffectiveStyle,
        out: &mut Vec<PositionedElement>,
    ) -> f32 {
        let max_chars = max_chars_per_line(style.font_size, self.page_width, x, &self.config);
        let step = self.line_height(style);
        let mut y = y;
        let mut emitted = 0usize;

        for line in dedent(text).into_iter().map(str::trim_start) {
            let wrapped = wrap_line(line, max_chars);
            if wrapped.is_empty() {
                y -= step;
                continue;
            }
            for content in wrapped {
                let width = self
                    .measurer
                    .string_width(&content, &style.font, style.font_size);
                let text_x = aligned_x(style.align, x, self.page_width, width);
                out.push(PositionedElement::text(
                    text_x,
                    y,
                    width,
                    TextElement {
                        content,
                        font: style.font.clone(),
                        font_size: style.font_size,
                        color: style.color.clone(),
                    },
                ));
                emitted += 1;
                y -= step;
            }
        }

        log::debug!(
            "Placed {} line(s) of {} {}pt, budget {} chars, cursor now {:.2}",
            emitted,
            style.font,
            style.font_size,
            max_chars,
            y
        );
        y
    }

    /// Moves the cursor down by `amount` points without drawing.
    pub fn space(
        &self,
        amount: f32,
        x: f32,
        y: f32,
        style: &EffectiveStyle,
        out: &mut Vec<PositionedElement>,
    ) -> f32 {
        self.wrap_text("", x, y - amount, style, out)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::text::AverageWidthMeasurer;
    use pagescript_types::Color;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn cursor_moves_one_step_per_line(
            text in "[a-z]{1,12}( [a-z]{1,12}){0,40}",
            font_size in 6u32..60,
            start_y in 200.0f32..900.0,
        ) {
            let measurer = AverageWidthMeasurer::default();
            let flow = TextFlow::new(595.0, LayoutConfig::default(), &measurer);
            let style = EffectiveStyle {
                font: "Helvetica".to_string(),
                font_size: font_size as f32,
                color: Color::BLACK,
                align: TextAlign::Left,
            };
            let mut out = Vec::new();
            let end_y = flow.wrap_text(&text, 50.0, start_y, &style, &mut out);
            let expected = start_y - out.len() as f32 * (font_size as f32 + 5.0);
            prop_assert!((end_y - expected).abs() < 0.01);
        }
    }
}
