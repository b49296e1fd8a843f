//! Document-wide style defaults and the per-instruction effective style.

use crate::color::resolve_color;
use crate::dimension::{PageOrientation, PageSize};
use crate::parsers::{
    parse_font_size, parse_page_orientation, parse_page_size, parse_text_align, StyleParseError,
};
use crate::text::TextAlign;
use pagescript_types::Color;
use serde::{Deserialize, Serialize};

/// The document's default styling, seeded with built-in values and then
/// sparsely overridden by the entries of the document's `page-style` block.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleDefaults {
    pub font: String,
    pub font_size: f32,
    pub font_color: Color,
    pub text_align: TextAlign,
    pub page_layout: PageOrientation,
    pub page_size: PageSize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    pub title_font: String,
    pub title_font_size: f32,
}

impl Default for StyleDefaults {
    fn default() -> Self {
        Self {
            font: "Courier".to_string(),
            font_size: 20.0,
            font_color: Color::BLACK,
            text_align: TextAlign::Left,
            page_layout: PageOrientation::Portrait,
            page_size: PageSize::A4,
            background_image: None,
            title_font: "Helvetica".to_string(),
            title_font_size: 25.0,
        }
    }
}

impl StyleDefaults {
    /// Returns a copy with one style-block entry applied. Fields not named by
    /// `key` keep their current value.
    pub fn apply_entry(&self, key: &str, value: &str) -> Result<Self, StyleParseError> {
        let mut next = self.clone();
        match key.to_lowercase().as_str() {
            "font" => next.font = value.trim().to_string(),
            "font-size" | "fontsize" => next.font_size = parse_font_size("font-size", value)?,
            "font-color" | "color" => next.font_color = resolve_color(value),
            "text-align" | "align" => next.text_align = parse_text_align(value)?,
            "background-image" => {
                let path = value.trim();
                next.background_image = (!path.is_empty()).then(|| path.to_string());
            }
            "page-layout" => next.page_layout = parse_page_orientation(value)?,
            "page-size" => next.page_size = parse_page_size(value)?,
            "title-font" => next.title_font = value.trim().to_string(),
            "title-size" | "title-font-size" => {
                next.title_font_size = parse_font_size("title-size", value)?
            }
            other => return Err(StyleParseError::UnknownProperty(other.to_string())),
        }
        Ok(next)
    }

    /// The value an entry falls back to after it failed to parse. Unknown
    /// page keywords reset to the built-in page defaults; every other field
    /// keeps its prior value.
    pub fn with_fallback(&self, key: &str) -> Self {
        let mut next = self.clone();
        match key.to_lowercase().as_str() {
            "page-layout" => next.page_layout = PageOrientation::default(),
            "page-size" => next.page_size = PageSize::default(),
            _ => {}
        }
        next
    }
}

/// The final font, size, color and alignment of one instruction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectiveStyle {
    pub font: String,
    pub font_size: f32,
    pub color: Color,
    pub align: TextAlign,
}

impl Default for EffectiveStyle {
    fn default() -> Self {
        let defaults = StyleDefaults::default();
        Self {
            font: defaults.font,
            font_size: defaults.font_size,
            color: defaults.font_color,
            align: defaults.text_align,
        }
    }
}

impl EffectiveStyle {
    pub fn with_font(&self, font: &str) -> Self {
        Self {
            font: font.trim().to_string(),
            ..self.clone()
        }
    }

    pub fn with_size(&self, value: &str) -> Result<Self, StyleParseError> {
        Ok(Self {
            font_size: parse_font_size("size", value)?,
            ..self.clone()
        })
    }

    pub fn with_color(&self, value: &str) -> Self {
        Self {
            color: resolve_color(value),
            ..self.clone()
        }
    }

    pub fn with_align(&self, value: &str) -> Result<Self, StyleParseError> {
        Ok(Self {
            align: parse_text_align(value)?,
            ..self.clone()
        })
    }
}
