//! Style cascade: computes the effective style of one instruction.
//!
//! Precedence, lowest to highest:
//! 1. the document defaults (built-in values layered with the `page-style` block),
//! 2. the defaults of the instruction's command kind (titles use the title font),
//! 3. inline overrides, restricted to those targeting the instruction's own kind.

use crate::stylesheet::{EffectiveStyle, StyleDefaults};
use pagescript_types::{DiagnosticKind, Diagnostics};
use serde::Serialize;
use std::fmt;

/// The closed set of `add` commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommandKind {
    Text,
    Title,
    Space,
    BackgroundImage,
}

impl CommandKind {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_lowercase().as_str() {
            "text" => Some(CommandKind::Text),
            "title" => Some(CommandKind::Title),
            "space" => Some(CommandKind::Space),
            "background-image" => Some(CommandKind::BackgroundImage),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            CommandKind::Text => "text",
            CommandKind::Title => "title",
            CommandKind::Space => "space",
            CommandKind::BackgroundImage => "background-image",
        }
    }

    /// Whether an inline style clause may be attached to this command.
    pub fn accepts_style_clause(&self) -> bool {
        matches!(self, CommandKind::Text | CommandKind::Title)
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum StyleAttribute {
    Size,
    Color,
    Align,
    Font,
    Other(String),
}

impl StyleAttribute {
    /// Maps the optional attribute word of a style triple. A missing word
    /// selects the font, and `style` is an alias for it.
    pub fn from_keyword(keyword: Option<&str>) -> Self {
        match keyword.map(str::to_lowercase).as_deref() {
            None | Some("font") | Some("style") => StyleAttribute::Font,
            Some("size") => StyleAttribute::Size,
            Some("color") => StyleAttribute::Color,
            Some("align") => StyleAttribute::Align,
            Some(other) => StyleAttribute::Other(other.to_string()),
        }
    }
}

impl fmt::Display for StyleAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleAttribute::Size => f.write_str("size"),
            StyleAttribute::Color => f.write_str("color"),
            StyleAttribute::Align => f.write_str("align"),
            StyleAttribute::Font => f.write_str("font"),
            StyleAttribute::Other(name) => f.write_str(name),
        }
    }
}

/// One `<target> <attribute>? "<value>"` triple of an inline style clause.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleOverride {
    pub target: CommandKind,
    pub attribute: StyleAttribute,
    pub value: String,
}

impl StyleOverride {
    pub fn new(target: CommandKind, attribute: StyleAttribute, value: impl Into<String>) -> Self {
        Self {
            target,
            attribute,
            value: value.into(),
        }
    }
}

/// The style of an instruction before any inline override is applied.
pub fn base_style(defaults: &StyleDefaults, kind: CommandKind) -> EffectiveStyle {
    let (font, font_size) = match kind {
        CommandKind::Title => (defaults.title_font.clone(), defaults.title_font_size),
        _ => (defaults.font.clone(), defaults.font_size),
    };
    EffectiveStyle {
        font,
        font_size,
        color: defaults.font_color.clone(),
        align: defaults.text_align,
    }
}

/// Applies one override. Invalid values leave the style unchanged and are
/// reported.
fn apply_override(
    style: EffectiveStyle,
    ov: &StyleOverride,
    diagnostics: &mut Diagnostics,
) -> EffectiveStyle {
    let result = match &ov.attribute {
        StyleAttribute::Font => Ok(style.with_font(&ov.value)),
        StyleAttribute::Color => Ok(style.with_color(&ov.value)),
        StyleAttribute::Size => style.with_size(&ov.value),
        StyleAttribute::Align => style.with_align(&ov.value),
        StyleAttribute::Other(name) => {
            diagnostics.push(
                DiagnosticKind::UnknownAttribute,
                format!("unknown style attribute '{} {}' ignored", ov.target, name),
            );
            return style;
        }
    };
    match result {
        Ok(next) => next,
        Err(e) => {
            diagnostics.push(
                e.diagnostic_kind(),
                format!("{} {}: {}; keeping previous value", ov.target, ov.attribute, e),
            );
            style
        }
    }
}

/// Computes the effective style for an instruction of `kind` carrying
/// `overrides`.
pub fn resolve_style(
    defaults: &StyleDefaults,
    kind: CommandKind,
    overrides: &[StyleOverride],
    diagnostics: &mut Diagnostics,
) -> EffectiveStyle {
    overrides
        .iter()
        .fold(base_style(defaults, kind), |style, ov| {
            if ov.target != kind {
                log::debug!(
                    "Override for '{}' does not apply to a '{}' instruction",
                    ov.target,
                    kind
                );
                return style;
            }
            apply_override(style, ov, diagnostics)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::TextAlign;
    use pagescript_types::Color;

    fn text_size(value: &str) -> StyleOverride {
        StyleOverride::new(CommandKind::Text, StyleAttribute::Size, value)
    }

    #[test]
    fn test_builtin_defaults_apply_without_overrides() {
        let mut diags = Diagnostics::new();
        let style = resolve_style(&StyleDefaults::default(), CommandKind::Text, &[], &mut diags);
        assert_eq!(style.font, "Courier");
        assert_eq!(style.font_size, 20.0);
        assert_eq!(style.color, Color::BLACK);
        assert_eq!(style.align, TextAlign::Left);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_title_uses_title_defaults() {
        let mut diags = Diagnostics::new();
        let style = resolve_style(&StyleDefaults::default(), CommandKind::Title, &[], &mut diags);
        assert_eq!(style.font, "Helvetica");
        assert_eq!(style.font_size, 25.0);
    }

    #[test]
    fn test_precedence_inline_over_block_over_builtin() {
        let block = StyleDefaults::default().apply_entry("font-size", "14").unwrap();
        let mut diags = Diagnostics::new();

        let from_block = resolve_style(&block, CommandKind::Text, &[], &mut diags);
        assert_eq!(from_block.font_size, 14.0);

        let inline = resolve_style(&block, CommandKind::Text, &[text_size("30")], &mut diags);
        assert_eq!(inline.font_size, 30.0);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_title_override_does_not_leak_into_text() {
        let defaults = StyleDefaults::default();
        let overrides = vec![
            StyleOverride::new(CommandKind::Title, StyleAttribute::Size, "40"),
            StyleOverride::new(CommandKind::Title, StyleAttribute::Color, "red"),
        ];
        let mut diags = Diagnostics::new();

        let text = resolve_style(&defaults, CommandKind::Text, &overrides, &mut diags);
        assert_eq!(text.font_size, 20.0);
        assert_eq!(text.color, Color::BLACK);

        let title = resolve_style(&defaults, CommandKind::Title, &overrides, &mut diags);
        assert_eq!(title.font_size, 40.0);
        assert_eq!(title.color, Color::rgb(255, 0, 0));
    }

    #[test]
    fn test_text_override_does_not_leak_into_title() {
        let mut diags = Diagnostics::new();
        let title = resolve_style(
            &StyleDefaults::default(),
            CommandKind::Title,
            &[text_size("8")],
            &mut diags,
        );
        assert_eq!(title.font_size, 25.0);
    }

    #[test]
    fn test_invalid_size_keeps_previous_value() {
        let mut diags = Diagnostics::new();
        let style = resolve_style(
            &StyleDefaults::default(),
            CommandKind::Text,
            &[text_size("18"), text_size("huge")],
            &mut diags,
        );
        assert_eq!(style.font_size, 18.0);
        assert_eq!(diags.count_of(DiagnosticKind::InvalidNumericField), 1);
    }

    #[test]
    fn test_unknown_attribute_is_reported_and_ignored() {
        let mut diags = Diagnostics::new();
        let overrides = vec![StyleOverride::new(
            CommandKind::Text,
            StyleAttribute::Other("weight".to_string()),
            "bold",
        )];
        let style = resolve_style(&StyleDefaults::default(), CommandKind::Text, &overrides, &mut diags);
        assert_eq!(style, base_style(&StyleDefaults::default(), CommandKind::Text));
        assert!(diags.has_kind(DiagnosticKind::UnknownAttribute));
    }

    #[test]
    fn test_font_color_and_align_overrides() {
        let mut diags = Diagnostics::new();
        let overrides = vec![
            StyleOverride::new(CommandKind::Text, StyleAttribute::Font, "Times-Roman"),
            StyleOverride::new(CommandKind::Text, StyleAttribute::Color, "#0000FF"),
            StyleOverride::new(CommandKind::Text, StyleAttribute::Align, "center"),
            StyleOverride::new(CommandKind::Text, StyleAttribute::Align, "middle"),
        ];
        let style = resolve_style(&StyleDefaults::default(), CommandKind::Text, &overrides, &mut diags);
        assert_eq!(style.font, "Times-Roman");
        assert_eq!(style.color, Color::rgb(0, 0, 255));
        assert_eq!(style.align, TextAlign::Center);
        assert_eq!(diags.count_of(DiagnosticKind::UnknownEnumValue), 1);
    }

    #[test]
    fn test_attribute_keywords() {
        assert_eq!(StyleAttribute::from_keyword(None), StyleAttribute::Font);
        assert_eq!(StyleAttribute::from_keyword(Some("style")), StyleAttribute::Font);
        assert_eq!(StyleAttribute::from_keyword(Some("SIZE")), StyleAttribute::Size);
        assert_eq!(
            StyleAttribute::from_keyword(Some("weight")),
            StyleAttribute::Other("weight".to_string())
        );
        assert_eq!(CommandKind::from_keyword("background-image"), Some(CommandKind::BackgroundImage));
        assert_eq!(CommandKind::from_keyword("table"), None);
    }
}
